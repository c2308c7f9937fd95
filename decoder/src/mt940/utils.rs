use crate::ParseError;
use chrono::{Datelike, NaiveDate};

/// Порог века для двузначного года: `YY > 50` -> 19YY, иначе 20YY.
///
/// Унаследованное правило. Менять нельзя: поменяется трактовка старых выписок.
pub const CENTURY_PIVOT: i32 = 50;

/// Разворачивает двузначный год по [`CENTURY_PIVOT`]
pub fn expand_year(yy: i32) -> i32 {
    if yy > CENTURY_PIVOT {
        1900 + yy
    } else {
        2000 + yy
    }
}

/// Разделяет строку с тегом на сам тег и строку после него
pub(super) fn split_tag_line(line: &str) -> Result<(&str, &str), ParseError> {
    let line = line.trim_start();
    let Some(rest) = line.strip_prefix(':') else {
        return Err(ParseError::Mt940Tag("tag line must start with ':'".into()));
    };

    let tag_end_pos = rest
        .find(':')
        .ok_or_else(|| ParseError::Mt940Tag(format!("bad tag line (unclosed tag): {line}")))?;

    let (tag_raw, value_with_colon) = rest.split_at(tag_end_pos);
    let tag = tag_raw.trim();
    let value = &value_with_colon[1..]; // пропускаем двоеточие

    Ok((tag, value))
}

fn parse_two_digits(s: &str, what: &str, whole: &str) -> Result<u32, ParseError> {
    if s.len() != 2 || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::InvalidDate(format!("invalid {what} in '{whole}'")));
    }
    s.parse()
        .map_err(|_| ParseError::InvalidDate(format!("invalid {what} in '{whole}'")))
}

/// Парсит дату YYMMDD
pub(crate) fn parse_mt940_yy_mm_dd(s: &str) -> Result<NaiveDate, ParseError> {
    if s.len() != 6 || !s.is_ascii() {
        return Err(ParseError::InvalidDate(format!("invalid YYMMDD date: '{s}'")));
    }

    let yy = parse_two_digits(&s[0..2], "year", s)?;
    let mm = parse_two_digits(&s[2..4], "month", s)?;
    let dd = parse_two_digits(&s[4..6], "day", s)?;

    let year = expand_year(yy as i32);

    NaiveDate::from_ymd_opt(year, mm, dd)
        .ok_or_else(|| ParseError::InvalidDate(format!("invalid YYMMDD date components: '{s}'")))
}

/// Дата проводки из MMDD :61: и года даты валютирования
pub(super) fn derive_entry_date(value_date: NaiveDate, mmdd: &str) -> Result<NaiveDate, ParseError> {
    if mmdd.len() != 4 || !mmdd.is_ascii() {
        return Err(ParseError::InvalidDate(format!("entry date must be MMDD, got '{mmdd}'")));
    }

    let mm = parse_two_digits(&mmdd[0..2], "month", mmdd)?;
    let dd = parse_two_digits(&mmdd[2..4], "day", mmdd)?;

    NaiveDate::from_ymd_opt(value_date.year(), mm, dd)
        .ok_or_else(|| ParseError::InvalidDate(format!("invalid MMDD entry date: '{mmdd}'")))
}
