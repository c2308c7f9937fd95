use thiserror::Error;

/// Ошибки декодирования выписки MT940
///
/// Жёсткими (возвращаемыми вызывающему коду) являются только [`ParseError::EmptyInput`]
/// и [`ParseError::NothingRecognized`]. Остальные варианты возникают на уровне
/// отдельной строки и поглощаются диспетчером тегов: строка пропускается, разбор продолжается.
#[derive(Debug, Error)]
pub enum ParseError {
    // жёсткие ошибки, с привязкой к источнику

    /// пустой буфер
    #[error("{source_label}: input is empty")]
    EmptyInput { source_label: String },
    /// в буфере нет ни одного узнаваемого поля MT940
    #[error("{source_label}: no recognizable MT940 content")]
    NothingRecognized { source_label: String },

    // ошибки уровня строки

    /// очень общая ошибка плохих входных данных
    #[error("bad input: {0}")]
    BadInput(String),
    /// ошибка при парсинге денежной суммы
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// ошибка при парсинге направления (C/D)
    #[error("invalid direction: {0}")]
    InvalidDirection(String),
    /// ошибка при парсинге даты YYMMDD / MMDD
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// ошибка парсинга тега mt940
    #[error("bad mt940 tag: {0}")]
    Mt940Tag(String),

    // обёртки

    /// обёртка csv::Error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// обёртка std::io::Error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// обёртка rust_decimal::Error
    #[error("decimal error: {0}")]
    Decimal(#[from] rust_decimal::Error),
}

impl ParseError {
    /// Метка источника (имя файла и т.п.) для жёстких ошибок
    pub fn source_label(&self) -> Option<&str> {
        match self {
            ParseError::EmptyInput { source_label }
            | ParseError::NothingRecognized { source_label } => Some(source_label),
            _ => None,
        }
    }

    /// `true`, если ошибка относится ко всему входу, а не к отдельной строке
    pub fn is_fatal(&self) -> bool {
        self.source_label().is_some()
    }
}
