//! Плоское представление выписки с нарастающим остатком (bank extract).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{Balance, ParsedStatement};

/// Одна строка выписки с остатком после проводки
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractRow {
    pub date: NaiveDate,
    pub narrative: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub running_balance: Decimal,
}

/// Итоги выписки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractTotals {
    pub credit_in: Decimal,
    pub debit_out: Decimal,
    /// открывающий баланс со знаком, `None` если его нет в выписке
    pub opening_balance_signed: Option<Decimal>,
    /// заявленный банком закрывающий баланс со знаком, `None` если его нет
    pub closing_balance_signed: Option<Decimal>,
}

/// Выписка в виде, удобном для отображения в стиле главной книги.
///
/// Строится только из [`ParsedStatement`] через [`ParsedStatement::to_bank_extract`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankExtract {
    /// название банка, пустая строка если банк не определён
    pub bank: String,
    pub account_id: String,
    /// `YYYY-MM` самой ранней даты проводки, пустая строка если проводок нет
    pub period: String,
    pub rows: Vec<ExtractRow>,
    pub totals: ExtractTotals,
}

impl BankExtract {
    /// Остаток после последней строки (или открывающий, если строк нет)
    pub fn final_balance(&self) -> Decimal {
        self.rows
            .last()
            .map(|row| row.running_balance)
            .unwrap_or_else(|| self.totals.opening_balance_signed.unwrap_or_default())
    }
}

impl ParsedStatement {
    /// Прогоняет проводки в исходном порядке от открывающего баланса.
    ///
    /// Если открывающего баланса нет, отсчёт идёт от нуля, а в итогах
    /// `opening_balance_signed` остаётся `None`.
    pub fn to_bank_extract(&self) -> BankExtract {
        let opening = self.opening_balance().map(Balance::signed_amount);

        let rows: Vec<ExtractRow> = self
            .transactions()
            .iter()
            .scan(opening.unwrap_or_default(), |running, tx| {
                *running += tx.signed_amount();
                Some(ExtractRow {
                    date: tx.value_date,
                    narrative: tx.narrative.clone(),
                    debit: tx.debit_amount(),
                    credit: tx.credit_amount(),
                    running_balance: *running,
                })
            })
            .collect();

        let period = self
            .transactions()
            .iter()
            .map(|tx| tx.value_date)
            .min()
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default();

        let header = self.header();
        let totals = self.totals();

        BankExtract {
            bank: header.bank.map(|b| b.name.to_string()).unwrap_or_default(),
            account_id: header.account_id.clone(),
            period,
            rows,
            totals: ExtractTotals {
                credit_in: totals.total_credit,
                debit_out: totals.total_debit,
                opening_balance_signed: opening,
                closing_balance_signed: self.closing_balance().map(Balance::signed_amount),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::mt940::decode_lines;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn running_balance_starts_from_signed_opening() {
        let stmt = decode_lines(
            &[
                ":25:TR330006100519786457841326",
                ":60F:D240301TRY100,00",
                ":61:240305C30,00NTRF",
                ":61:240302D20,00NTRF",
            ],
            "t",
        )
        .unwrap();

        let extract = stmt.to_bank_extract();
        let balances: Vec<Decimal> = extract.rows.iter().map(|r| r.running_balance).collect();

        assert_eq!(balances, vec![dec("-70"), dec("-90")]);
        assert_eq!(extract.period, "2024-03");
        assert_eq!(extract.bank, "Türkiye İş Bankası");
        assert_eq!(extract.totals.opening_balance_signed, Some(dec("-100")));
        assert_eq!(extract.totals.closing_balance_signed, None);
        assert_eq!(extract.final_balance(), dec("-90"));
    }

    #[test]
    fn period_uses_earliest_date_not_first_row() {
        let stmt = decode_lines(
            &[":20:R", ":61:240401C1,00NTRF", ":61:240329C1,00NTRF"],
            "t",
        )
        .unwrap();
        assert_eq!(stmt.to_bank_extract().period, "2024-03");
    }

    #[test]
    fn empty_statement_projects_to_empty_extract() {
        let stmt = decode_lines(&[":20:R", ":25:DE89370400440532013000"], "t").unwrap();
        let extract = stmt.to_bank_extract();

        assert!(extract.rows.is_empty());
        assert_eq!(extract.period, "");
        assert_eq!(extract.bank, "");
        assert_eq!(extract.totals.opening_balance_signed, None);
        assert_eq!(extract.final_balance(), Decimal::ZERO);
    }

    #[test]
    fn debit_and_credit_columns_are_split() {
        let stmt = decode_lines(&[":20:R", ":61:240301D5,50NTRF", ":86:Komisyon"], "t").unwrap();
        let row = &stmt.to_bank_extract().rows[0];

        assert_eq!(row.debit, dec("5.50"));
        assert_eq!(row.credit, Decimal::ZERO);
        assert_eq!(row.narrative, "Komisyon");
    }
}
