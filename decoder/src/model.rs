use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::bank::Bank;

/// Направление (Дебет/Кредит)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Кредит, C
    Credit,
    /// Дебет, D
    Debit,
}

impl Direction {
    /// Разбирает отметку `C` / `D`
    pub fn from_mark(mark: &str) -> Option<Self> {
        match mark {
            "C" => Some(Direction::Credit),
            "D" => Some(Direction::Debit),
            _ => None,
        }
    }

    /// Применяет знак к неотрицательной сумме
    pub fn apply(self, amount: Decimal) -> Decimal {
        match self {
            Direction::Credit => amount,
            Direction::Debit => -amount,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Credit => write!(f, "Credit"),
            Direction::Debit => write!(f, "Debit"),
        }
    }
}

/// Роль баланса в выписке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BalanceRole {
    /// :60F: / :60M:
    Opening,
    /// :62F: / :62M:
    Closing,
}

/// Открывающий или закрывающий баланс.
///
/// Отсутствующий баланс моделируется как `Option<Balance>` на уровне выписки,
/// нулевая сумма здесь всегда означает реальный ноль.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub role: BalanceRole,
    pub direction: Direction,
    pub date: NaiveDate,
    /// трёхбуквенный код валюты, как в файле
    pub currency: String,
    /// неотрицательная сумма, знак хранится в `direction`
    pub amount: Decimal,
}

impl Balance {
    /// Сумма со знаком: `+amount` для кредита, `-amount` для дебета
    pub fn signed_amount(&self) -> Decimal {
        self.direction.apply(self.amount)
    }
}

/// Шапка выписки (:20:, :25:, :28C:)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementHeader {
    /// :20: (пустая строка, если тега нет)
    pub transaction_ref: String,
    /// :25: IBAN или номер счёта, как есть
    pub account_id: String,
    /// :28C: / :28:
    pub statement_no: String,
    /// банк, определённый по IBAN из :25:
    pub bank: Option<Bank>,
}

/// Одна проводка: строка :61: вместе со следующей за ней :86:
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// дата валютирования
    pub value_date: NaiveDate,
    /// дата проводки (MMDD из :61: + год даты валютирования)
    pub entry_date: Option<NaiveDate>,
    pub direction: Direction,
    /// неотрицательная сумма
    pub amount: Decimal,
    /// однобуквенный код типа операции, назначенный банком (N, S, F)
    pub type_code: char,
    /// референс до `//`
    pub reference: Option<String>,
    /// референс банка, после `//`
    pub bank_reference: Option<String>,
    /// текст из :86: (пустая строка, если его нет)
    pub narrative: String,
}

impl Transaction {
    /// Сумма по дебету: `amount` для дебета, иначе ноль
    pub fn debit_amount(&self) -> Decimal {
        match self.direction {
            Direction::Debit => self.amount,
            Direction::Credit => Decimal::ZERO,
        }
    }

    /// Сумма по кредиту: `amount` для кредита, иначе ноль
    pub fn credit_amount(&self) -> Decimal {
        match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => Decimal::ZERO,
        }
    }

    pub fn signed_amount(&self) -> Decimal {
        self.direction.apply(self.amount)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry_date_str = self
            .entry_date
            .map(|d| d.to_string())
            .unwrap_or_default();

        let reference_str = self.reference.as_deref().unwrap_or("");

        write!(
            f,
            "{:<10} {:<10} {:<6} {:>15} {} {} {}",
            self.value_date,
            entry_date_str,
            self.direction,
            self.amount,
            self.type_code,
            reference_str,
            self.narrative,
        )
    }
}

/// Итоги по списку проводок
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_credit: Decimal,
    pub total_debit: Decimal,
    pub count: usize,
    /// `total_credit - total_debit`
    pub net_change: Decimal,
}

impl Totals {
    /// Считает итоги одним проходом по проводкам
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (total_credit, total_debit, count) = transactions.iter().fold(
            (Decimal::ZERO, Decimal::ZERO, 0usize),
            |(credit, debit, count), tx| {
                (credit + tx.credit_amount(), debit + tx.debit_amount(), count + 1)
            },
        );

        Totals {
            total_credit,
            total_debit,
            count,
            net_change: total_credit - total_debit,
        }
    }
}

/// Центральная/корневая структура библиотеки: одна разобранная выписка MT940.
///
/// Создаётся только сборщиком выписки за один проход и дальше не меняется,
/// поэтому поля закрыты: итоги всегда совпадают со списком проводок.
///
/// Пример использования:
/// ```no_run
/// # use mt940_decoder::{parse_statement, ParseError};
/// # fn main() -> Result<(), ParseError> {
/// let bytes = std::fs::read("statement.sta")?;
/// let statement = parse_statement(&bytes, "statement.sta")?;
///
/// for tx in statement.transactions() {
///     println!("{tx}");
/// }
/// println!("net: {}", statement.totals().net_change);
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedStatement {
    header: StatementHeader,
    opening_balance: Option<Balance>,
    closing_balance: Option<Balance>,
    transactions: Vec<Transaction>,
    totals: Totals,
}

impl ParsedStatement {
    pub(crate) fn new(
        header: StatementHeader,
        opening_balance: Option<Balance>,
        closing_balance: Option<Balance>,
        transactions: Vec<Transaction>,
    ) -> Self {
        let totals = Totals::from_transactions(&transactions);
        ParsedStatement {
            header,
            opening_balance,
            closing_balance,
            transactions,
            totals,
        }
    }

    pub fn header(&self) -> &StatementHeader {
        &self.header
    }

    /// `None`, если :60F:/:60M: нет или строка не разобралась
    pub fn opening_balance(&self) -> Option<&Balance> {
        self.opening_balance.as_ref()
    }

    /// `None`, если :62F:/:62M: нет или строка не разобралась
    pub fn closing_balance(&self) -> Option<&Balance> {
        self.closing_balance.as_ref()
    }

    /// Проводки в порядке появления :61: во входных данных
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }
}
