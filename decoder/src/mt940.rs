pub mod fields;
pub mod utils;

use tracing::{debug, warn};

use crate::bank;
use crate::error::ParseError;
use crate::model::{Balance, BalanceRole, ParsedStatement, StatementHeader, Transaction};
use fields::{decode_balance, decode_statement_line};
use utils::split_tag_line;

/// Поддерживаемые теги MT940
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// :20: Transaction Reference Number
    TransactionRef,
    /// :25: Account Identification
    AccountId,
    /// :28C: / :28: Statement Number/Sequence
    StatementNo,
    /// :60F: / :60M:
    OpeningBalance,
    /// :62F: / :62M:
    ClosingBalance,
    /// :61: Statement Line
    StatementLine,
    /// :86: Information to Account Owner
    Narrative,
}

impl Tag {
    /// Узнаёт тег в начале строки и возвращает его вместе со значением после тега.
    ///
    /// Неизвестные теги и строки без тега дают `None`.
    pub fn recognize(line: &str) -> Option<(Tag, &str)> {
        let (tag, value) = split_tag_line(line).ok()?;

        let tag = match tag {
            "20" => Tag::TransactionRef,
            "25" => Tag::AccountId,
            "28C" | "28" => Tag::StatementNo,
            "60F" | "60M" => Tag::OpeningBalance,
            "62F" | "62M" => Tag::ClosingBalance,
            "61" => Tag::StatementLine,
            "86" => Tag::Narrative,
            _ => return None,
        };

        Some((tag, value))
    }
}

/// Конец сообщения: `-}` / `}` SWIFT-конверта или одиночный `-` у выгрузок без конверта
fn is_block_terminator(line: &str) -> bool {
    line == "-" || line.starts_with("-}") || line.starts_with('}')
}

/// Режет текст на непустые обрезанные строки.
///
/// Если сообщение завернуто в SWIFT-конверт, всё до `{4:` включительно отбрасывается,
/// так что `{4::20:REF` превращается в `:20:REF`. Смотрим только строки, начинающиеся с `{`:
/// `{4:` внутри текста :86: остаётся как есть.
pub fn segment_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(|line| match line.find("{4:") {
            Some(pos) if line.trim_start().starts_with('{') => &line[pos + 3..],
            _ => line,
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Накопитель полей выписки за один проход по строкам
#[derive(Debug, Default)]
struct StatementBuilder {
    transaction_ref: Option<String>,
    account_id: Option<String>,
    statement_no: Option<String>,
    opening_balance: Option<Balance>,
    closing_balance: Option<Balance>,
    transactions: Vec<Transaction>,
}

impl StatementBuilder {
    fn set_header_field(slot: &mut Option<String>, tag: Tag, value: &str) {
        if slot.is_some() {
            debug!(?tag, value, "repeated header tag, keeping the first one");
            return;
        }
        *slot = Some(value.trim().to_string());
    }

    fn push_balance(&mut self, role: BalanceRole, value: &str) {
        let balance = match decode_balance(role, value) {
            Ok(balance) => balance,
            Err(e) => {
                warn!(?role, value, error = %e, "skipping malformed balance");
                return;
            }
        };

        match role {
            // первый :60x: считаем открывающим
            BalanceRole::Opening => {
                if self.opening_balance.is_none() {
                    self.opening_balance = Some(balance);
                } else {
                    debug!("multiple opening balances, keeping the first one");
                }
            }
            // последний :62x: считаем закрывающим
            BalanceRole::Closing => self.closing_balance = Some(balance),
        }
    }

    fn push_statement_line(&mut self, value: &str, narrative: Option<&str>) {
        match decode_statement_line(value, narrative) {
            Ok(tx) => self.transactions.push(tx),
            Err(e) => warn!(value, error = %e, "skipping malformed :61: line"),
        }
    }

    fn is_empty(&self) -> bool {
        self.transaction_ref.is_none()
            && self.account_id.is_none()
            && self.opening_balance.is_none()
            && self.closing_balance.is_none()
            && self.transactions.is_empty()
    }

    fn finish(self, source_label: &str) -> Result<ParsedStatement, ParseError> {
        if self.is_empty() {
            return Err(ParseError::NothingRecognized {
                source_label: source_label.to_string(),
            });
        }

        let account_id = self.account_id.unwrap_or_default();
        let bank = bank::resolve_iban(&account_id);
        if bank.is_none() && !account_id.is_empty() {
            debug!(account_id = %account_id, "bank not resolved from account id");
        }

        let header = StatementHeader {
            transaction_ref: self.transaction_ref.unwrap_or_default(),
            account_id,
            statement_no: self.statement_no.unwrap_or_default(),
            bank,
        };

        Ok(ParsedStatement::new(
            header,
            self.opening_balance,
            self.closing_balance,
            self.transactions,
        ))
    }
}

/// Собирает narrative из :86: и идущих за ней строк-продолжений без тега.
///
/// Возвращает текст и количество поглощённых строк.
fn collect_narrative(lines: &[&str]) -> Option<(String, usize)> {
    let first = lines.first()?;
    let (Tag::Narrative, value) = Tag::recognize(first)? else {
        return None;
    };

    let mut narrative = value.to_string();
    let mut consumed = 1;

    for line in &lines[1..] {
        if line.starts_with(':') || is_block_terminator(line) {
            break;
        }
        narrative.push(' ');
        narrative.push_str(line);
        consumed += 1;
    }

    Some((narrative, consumed))
}

/// Проходит по строкам одного сообщения и собирает [`ParsedStatement`].
///
/// Битые строки пропускаются. Ошибка возвращается только если во входе нет
/// ни :20:, ни :25:, ни одного баланса и ни одной проводки.
pub fn decode_lines(lines: &[&str], source_label: &str) -> Result<ParsedStatement, ParseError> {
    let mut builder = StatementBuilder::default();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        idx += 1;

        let Some((tag, value)) = Tag::recognize(line) else {
            debug!(line, "skipping unrecognized line");
            continue;
        };

        match tag {
            Tag::TransactionRef => {
                StatementBuilder::set_header_field(&mut builder.transaction_ref, tag, value)
            }
            Tag::AccountId => StatementBuilder::set_header_field(&mut builder.account_id, tag, value),
            Tag::StatementNo => {
                StatementBuilder::set_header_field(&mut builder.statement_no, tag, value)
            }
            Tag::OpeningBalance => builder.push_balance(BalanceRole::Opening, value),
            Tag::ClosingBalance => builder.push_balance(BalanceRole::Closing, value),
            Tag::StatementLine => {
                // :86: сразу за :61: принадлежит этой проводке и повторно не разбирается
                let narrative = collect_narrative(&lines[idx..]);
                let text = narrative.as_ref().map(|(text, _)| text.as_str());
                builder.push_statement_line(value, text);
                if let Some((_, consumed)) = narrative {
                    idx += consumed;
                }
            }
            Tag::Narrative => {
                debug!(value, ":86: without preceding :61:, skipping");
            }
        }
    }

    builder.finish(source_label)
}
