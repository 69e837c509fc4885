//! Durations of `MM/YYYY — MM/YYYY` ranges, as shown on job and education cards.

use thiserror::Error;
use time::{Date, Month};

/// Separator between the two ends of a range.
pub const RANGE_SEPARATOR: char = '—';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("Invalid date '{0}'")]
    InvalidDate(String),
    #[error("Date range '{0}' ends before it starts")]
    Reversed(String),
}

/// Parse `MM/YYYY`, or anything containing `present`, which means `today`'s month.
pub fn parse_month(text: &str, today: Date) -> Result<Date, DateRangeError> {
    if text.to_lowercase().contains("present") {
        return Ok(today.replace_day(1).unwrap_or(today));
    }
    let invalid = || DateRangeError::InvalidDate(text.trim().to_string());
    let (month, year) = text.trim().split_once('/').ok_or_else(invalid)?;
    let month: u8 = month.trim().parse().map_err(|_| invalid())?;
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, 1).map_err(|_| invalid())
}

/// Human duration of a range: `"1 yr"`, `"2 yrs 3 mos"`, `"1 mo"`.
///
/// A range that starts and ends in the same month reads `"1 mos"`. Text that is
/// not a two-ended range (a single date) has no duration and yields `""`.
pub fn duration_text(range: &str, today: Date) -> Result<String, DateRangeError> {
    let Some((start, end)) = range.trim().split_once(RANGE_SEPARATOR) else {
        return Ok(String::new());
    };
    if end.contains(RANGE_SEPARATOR) {
        return Ok(String::new());
    }
    let start = parse_month(start, today)?;
    let end = parse_month(end, today)?;

    let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    if months < 0 {
        return Err(DateRangeError::Reversed(range.trim().to_string()));
    }
    if months == 0 {
        return Ok("1 mos".to_string());
    }
    let (years, months) = (months / 12, months % 12);
    let parts: Vec<String> = [
        match years {
            0 => None,
            1 => Some("1 yr".to_string()),
            n => Some(format!("{n} yrs")),
        },
        match months {
            0 => None,
            1 => Some("1 mo".to_string()),
            n => Some(format!("{n} mos")),
        },
    ]
    .into_iter()
    .flatten()
    .collect();
    Ok(parts.join(" "))
}
