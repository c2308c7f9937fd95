use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{Balance, ParsedStatement};

/// Сверка `открывающий + чистое изменение` с заявленным закрывающим балансом.
///
/// Расхождение это сигнал о качестве данных выгрузки, а не ошибка разбора.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub opening: Option<Decimal>,
    pub net_change: Decimal,
    pub computed_closing: Option<Decimal>,
    pub declared_closing: Option<Decimal>,
}

impl Reconciliation {
    /// `заявленный - вычисленный`; `None`, если какого-то из балансов нет
    pub fn difference(&self) -> Option<Decimal> {
        Some(self.declared_closing? - self.computed_closing?)
    }

    pub fn is_balanced(&self) -> Option<bool> {
        self.difference().map(|d| d.is_zero())
    }
}

impl ParsedStatement {
    pub fn reconcile(&self) -> Reconciliation {
        let opening = self.opening_balance().map(Balance::signed_amount);
        let net_change = self.totals().net_change;

        Reconciliation {
            opening,
            net_change,
            computed_closing: opening.map(|o| o + net_change),
            declared_closing: self.closing_balance().map(Balance::signed_amount),
        }
    }
}
