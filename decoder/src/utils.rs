use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ParseError;

/// Максимальная длина поля суммы MT940 (15d), запятая входит в длину
const MAX_AMOUNT_LEN: usize = 15;

/// Парсит сумму MT940: `,` как десятичный разделитель, без разделителя тысяч.
///
/// Пробелы внутри суммы выкидываются ("1000, 00" встречается в выгрузках).
/// Суммы длиннее [`MAX_AMOUNT_LEN`] отвергаются, так что итоги по выписке не переполняют `Decimal`.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, ParseError> {
    let cleaned = raw.trim().replace(' ', "");

    if cleaned.is_empty() {
        return Err(ParseError::InvalidAmount("empty amount".into()));
    }
    if cleaned.len() > MAX_AMOUNT_LEN {
        return Err(ParseError::InvalidAmount(format!(
            "amount longer than {MAX_AMOUNT_LEN} characters: {cleaned}"
        )));
    }
    if cleaned.starts_with('-') {
        return Err(ParseError::InvalidAmount(format!("negative amount: {cleaned}")));
    }
    if cleaned.contains('.') {
        return Err(ParseError::InvalidAmount(format!(
            "unexpected '.' in amount: {cleaned}"
        )));
    }

    let mut split = cleaned.split(',');
    // cleaned точно не пусто, так что первый кусок есть всегда
    let int_part = split.next().unwrap_or("");
    let frac_part = split.next().unwrap_or("");
    if split.next().is_some() {
        return Err(ParseError::InvalidAmount(format!(
            "too many decimal separators in amount: {cleaned}"
        )));
    }

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(ParseError::InvalidAmount(format!("not a number: {cleaned}")));
    }

    // "100," допустимо и означает 100
    let normalized = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };

    Ok(Decimal::from_str(&normalized)?)
}
