//! Декодер банковских выписок SWIFT MT940.
//!
//! Байты неизвестной кодировки -> текст -> строки -> поля -> [`ParsedStatement`]
//! -> (по желанию) [`BankExtract`]. Всё в памяти, без ввода-вывода и общего состояния,
//! поэтому разбор разных файлов можно спокойно запускать параллельно.

pub mod bank;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod model;
pub mod mt940;
pub mod reconcile;
pub mod serialization;

mod utils;

use tracing::debug;

pub use crate::bank::Bank;
pub use crate::encoding::{DecodedText, DEFAULT_ENCODINGS};
pub use crate::error::ParseError;
pub use crate::extract::{BankExtract, ExtractRow, ExtractTotals};
pub use crate::model::{
    Balance, BalanceRole, Direction, ParsedStatement, StatementHeader, Totals, Transaction,
};
pub use crate::reconcile::Reconciliation;

/// Разбирает одно сообщение MT940 с кодировками по умолчанию.
///
/// `source_label` (обычно имя файла) используется только в ошибках.
pub fn parse_statement(bytes: &[u8], source_label: &str) -> Result<ParsedStatement, ParseError> {
    parse_statement_with(bytes, source_label, &DEFAULT_ENCODINGS)
}

/// Как [`parse_statement`], но со своим списком кандидатов-кодировок
pub fn parse_statement_with(
    bytes: &[u8],
    source_label: &str,
    encodings: &[&str],
) -> Result<ParsedStatement, ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput {
            source_label: source_label.to_string(),
        });
    }

    let decoded = encoding::resolve_with(bytes, encodings);
    debug!(
        source = source_label,
        encoding = %decoded.encoding,
        lossy = decoded.lossy,
        "decoded input"
    );

    let lines = mt940::segment_lines(&decoded.text);
    mt940::decode_lines(&lines, source_label)
}

/// Результат пакетного разбора: успешные выписки и ошибки по файлам, каждый список в исходном порядке
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub parsed: Vec<ParsedStatement>,
    pub failed: Vec<(String, ParseError)>,
}

/// Разбирает набор независимых файлов. Ошибка одного файла не влияет на остальные.
pub fn parse_batch<I, B, L>(inputs: I) -> BatchOutcome
where
    I: IntoIterator<Item = (B, L)>,
    B: AsRef<[u8]>,
    L: Into<String>,
{
    parse_batch_with(inputs, &DEFAULT_ENCODINGS)
}

/// Как [`parse_batch`], но со своим списком кандидатов-кодировок
pub fn parse_batch_with<I, B, L>(inputs: I, encodings: &[&str]) -> BatchOutcome
where
    I: IntoIterator<Item = (B, L)>,
    B: AsRef<[u8]>,
    L: Into<String>,
{
    let mut outcome = BatchOutcome::default();

    for (bytes, label) in inputs {
        let label: String = label.into();
        match parse_statement_with(bytes.as_ref(), &label, encodings) {
            Ok(statement) => outcome.parsed.push(statement),
            Err(e) => {
                debug!(source = %label, error = %e, "file failed to parse");
                outcome.failed.push((label, e));
            }
        }
    }

    outcome
}
