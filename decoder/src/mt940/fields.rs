//! Декодеры значений тегов :60x:/:62x: и :61:.

use lazy_regex::regex_captures;

use super::utils::{derive_entry_date, parse_mt940_yy_mm_dd};
use crate::error::ParseError;
use crate::model::{Balance, BalanceRole, Direction, Transaction};
use crate::utils::parse_amount;

fn parse_direction(mark: &str) -> Result<Direction, ParseError> {
    Direction::from_mark(mark).ok_or_else(|| ParseError::InvalidDirection(mark.to_string()))
}

/// Декодирует значение баланса: `<C|D><YYMMDD><CCY><amount>`.
///
/// Всё, что идёт после суммы, игнорируется (некоторые банки дописывают туда текст).
pub fn decode_balance(role: BalanceRole, value: &str) -> Result<Balance, ParseError> {
    let value = value.trim();

    let Some((_, mark, date, currency, amount)) =
        regex_captures!(r"^([CD])(\d{6})([A-Z]{3})(\d[\d,]*)", value)
    else {
        return Err(ParseError::BadInput(format!("malformed balance: '{value}'")));
    };

    Ok(Balance {
        role,
        direction: parse_direction(mark)?,
        date: parse_mt940_yy_mm_dd(date)?,
        currency: currency.to_string(),
        amount: parse_amount(amount)?,
    })
}

/// Декодирует значение :61: вместе с текстом парной :86:.
///
/// Формат: `<YYMMDD>[MMDD]<C|D>[funds code]<amount><type code><reference>[//bank reference]`.
/// Невалидная дата проводки не роняет строку: `entry_date` просто остаётся пустой.
/// Сторно (`RC`/`RD`) не поддерживается: такая строка не проходит по формату и пропускается.
pub fn decode_statement_line(value: &str, narrative: Option<&str>) -> Result<Transaction, ParseError> {
    let value = value.trim();

    let Some((_, value_date, entry_date, mark, _funds_code, amount, type_code, rest)) = regex_captures!(
        r"^(\d{6})(\d{4})?([CD])([A-Z])?(\d[\d,]*)([A-Z])(.*)$",
        value
    ) else {
        return Err(ParseError::BadInput(format!(
            "statement line does not match :61: layout: '{value}'"
        )));
    };

    let value_date = parse_mt940_yy_mm_dd(value_date)?;

    let entry_date = if entry_date.is_empty() {
        None
    } else {
        derive_entry_date(value_date, entry_date)
            .inspect_err(|e| tracing::debug!(error = %e, "entry date ignored"))
            .ok()
    };

    let (reference, bank_reference) = match rest.split_once("//") {
        Some((cust, bank)) => (non_empty(cust), non_empty(bank)),
        None => (non_empty(rest), None),
    };

    // регулярка гарантирует ровно одну букву
    let type_code = type_code
        .chars()
        .next()
        .ok_or_else(|| ParseError::BadInput(format!("missing type code in :61: '{value}'")))?;

    Ok(Transaction {
        value_date,
        entry_date,
        direction: parse_direction(mark)?,
        amount: parse_amount(amount)?,
        type_code,
        reference,
        bank_reference,
        narrative: narrative.unwrap_or_default().to_string(),
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // decode_balance

    #[test]
    fn decode_balance_parses_credit_balance() {
        let bal = decode_balance(BalanceRole::Opening, "C230101TRY123,45").unwrap();

        assert_eq!(bal.role, BalanceRole::Opening);
        assert_eq!(bal.direction, Direction::Credit);
        assert_eq!(bal.date, date(2023, 1, 1));
        assert_eq!(bal.currency, "TRY");
        assert_eq!(bal.amount, dec("123.45"));
    }

    #[test]
    fn decode_balance_parses_debit_and_ignores_trailing_text() {
        let bal = decode_balance(BalanceRole::Closing, "D250218USD2732398848,02 d USD").unwrap();

        assert_eq!(bal.direction, Direction::Debit);
        assert_eq!(bal.amount, dec("2732398848.02"));
        assert_eq!(bal.signed_amount(), dec("-2732398848.02"));
    }

    #[test]
    fn decode_balance_expands_old_years() {
        let bal = decode_balance(BalanceRole::Opening, "C991231EUR0,00").unwrap();
        assert_eq!(bal.date, date(1999, 12, 31));
        assert_eq!(bal.amount, Decimal::ZERO);
    }

    #[test]
    fn decode_balance_rejects_malformed_values() {
        for bad in ["C2301", "X230101EUR1,00", "C230101EU1,00", "C230101EUR", "C231301EUR1,00"] {
            assert!(
                decode_balance(BalanceRole::Opening, bad).is_err(),
                "expected error for {bad:?}"
            );
        }
    }

    // decode_statement_line

    #[test]
    fn decode_statement_line_with_entry_date_and_references() {
        let tx = decode_statement_line(
            "2301010102D250,00NTRFREF123//BANKREF 77",
            Some("Kira ödemesi"),
        )
        .unwrap();

        assert_eq!(tx.value_date, date(2023, 1, 1));
        assert_eq!(tx.entry_date, Some(date(2023, 1, 2)));
        assert_eq!(tx.direction, Direction::Debit);
        assert_eq!(tx.amount, dec("250.00"));
        assert_eq!(tx.type_code, 'N');
        assert_eq!(tx.reference.as_deref(), Some("TRFREF123"));
        assert_eq!(tx.bank_reference.as_deref(), Some("BANKREF 77"));
        assert_eq!(tx.narrative, "Kira ödemesi");
    }

    #[test]
    fn decode_statement_line_without_entry_date_or_narrative() {
        let tx = decode_statement_line("230315C1000,5S", None).unwrap();

        assert_eq!(tx.value_date, date(2023, 3, 15));
        assert_eq!(tx.entry_date, None);
        assert_eq!(tx.direction, Direction::Credit);
        assert_eq!(tx.amount, dec("1000.5"));
        assert_eq!(tx.type_code, 'S');
        assert_eq!(tx.reference, None);
        assert_eq!(tx.bank_reference, None);
        assert_eq!(tx.narrative, "");
    }

    #[test]
    fn decode_statement_line_accepts_funds_code() {
        let tx = decode_statement_line("2401050105CR75,00NMSCNONREF", None).unwrap();
        assert_eq!(tx.direction, Direction::Credit);
        assert_eq!(tx.amount, dec("75.00"));
        assert_eq!(tx.reference.as_deref(), Some("MSCNONREF"));
    }

    #[test]
    fn decode_statement_line_keeps_transaction_with_bad_entry_date() {
        let tx = decode_statement_line("2301011340C10,00NTRF", None).unwrap();
        assert_eq!(tx.entry_date, None);
        assert_eq!(tx.amount, dec("10.00"));
    }

    #[test]
    fn decode_statement_line_rejects_broken_layout() {
        for bad in [
            "230101CXXXX",
            "2301C10,00N",
            "230101X10,00N",
            "230101C10,00",
            "",
            // сторно
            "230101RC10,00NTRF",
            "2301010101RD5,00NCHK",
        ] {
            assert!(
                matches!(decode_statement_line(bad, None), Err(ParseError::BadInput(_))),
                "expected BadInput for {bad:?}"
            );
        }
    }

    #[test]
    fn decode_statement_line_rejects_impossible_value_date() {
        assert!(matches!(
            decode_statement_line("231345C10,00NTRF", None),
            Err(ParseError::InvalidDate(_))
        ));
    }
}
