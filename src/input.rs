//! Conversion of raw console text into validated values for the entity layer.

use crate::error::ParseLabelError;
use crate::task::{FieldUpdate, Priority, TaskStatus};
use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Typed into the deadline prompt of an edit to remove the deadline.
pub const CLEAR_DEADLINE: &str = "-";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("invalid date `{0}`, use dd/mm/yyyy")]
    InvalidDate(String),
    #[error("invalid status: {0}")]
    InvalidStatus(ParseLabelError),
    #[error("invalid priority: {0}")]
    InvalidPriority(ParseLabelError),
}

/// Parses a `dd/mm/yyyy` date. Blank input means "no date".
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    // `%Y` alone would take `25` as year 0025.
    let year_ok = trimmed
        .rsplit('/')
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));
    if !year_ok {
        return Err(InputError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| InputError::InvalidDate(trimmed.to_string()))
}

/// Deadline answer of an edit: blank keeps, `-` clears, a date replaces.
pub fn parse_deadline_edit(input: &str) -> Result<FieldUpdate<Option<NaiveDate>>, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(FieldUpdate::Keep);
    }
    if trimmed == CLEAR_DEADLINE {
        return Ok(FieldUpdate::Set(None));
    }
    parse_date(trimmed).map(FieldUpdate::Set)
}

/// Blank keeps the current value, anything else replaces it.
pub fn text_edit(input: &str) -> FieldUpdate<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        FieldUpdate::Keep
    } else {
        FieldUpdate::Set(trimmed.to_string())
    }
}

pub fn format_deadline(deadline: Option<NaiveDate>) -> String {
    match deadline {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => "No deadline".to_string(),
    }
}

pub fn require_name(input: &str) -> Result<String, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(InputError::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_status(input: &str) -> Result<TaskStatus, InputError> {
    input.parse().map_err(InputError::InvalidStatus)
}

/// Blank input falls back to `Priority::Medium`.
pub fn parse_priority(input: &str) -> Result<Priority, InputError> {
    if input.trim().is_empty() {
        return Ok(Priority::default());
    }
    input.parse().map_err(InputError::InvalidPriority)
}

pub fn priority_edit(input: &str) -> Result<FieldUpdate<Priority>, InputError> {
    if input.trim().is_empty() {
        return Ok(FieldUpdate::Keep);
    }
    input
        .parse()
        .map(FieldUpdate::Set)
        .map_err(InputError::InvalidPriority)
}

pub fn is_confirmation(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parses_day_month_year() {
        assert_eq!(
            parse_date("31/12/2025"),
            Ok(NaiveDate::from_ymd_opt(2025, 12, 31))
        );
    }

    #[test]
    fn iso_dates_are_rejected() {
        assert_eq!(
            parse_date("2025-12-31"),
            Err(InputError::InvalidDate("2025-12-31".to_string()))
        );
    }

    #[test]
    fn blank_date_means_no_deadline() {
        assert_eq!(parse_date(""), Ok(None));
        assert_eq!(parse_date("   "), Ok(None));
    }

    #[rstest]
    #[case("31/02/2025")]
    #[case("tomorrow")]
    #[case("12/31/2025")]
    #[case("31/12/25")]
    #[case("31/12/02025")]
    fn impossible_dates_are_rejected(#[case] input: &str) {
        assert!(parse_date(input).is_err());
    }

    #[test]
    fn deadline_edit_distinguishes_keep_and_clear() {
        assert_eq!(parse_deadline_edit(""), Ok(FieldUpdate::Keep));
        assert_eq!(parse_deadline_edit(" - "), Ok(FieldUpdate::Set(None)));
        assert_eq!(
            parse_deadline_edit("01/02/2026"),
            Ok(FieldUpdate::Set(NaiveDate::from_ymd_opt(2026, 2, 1)))
        );
        assert!(parse_deadline_edit("2026-02-01").is_err());
    }

    #[test]
    fn formats_deadline_back() {
        assert_eq!(
            format_deadline(NaiveDate::from_ymd_opt(2025, 1, 5)),
            "05/01/2025"
        );
        assert_eq!(format_deadline(None), "No deadline");
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(parse_priority(""), Ok(Priority::Medium));
        assert_eq!(parse_priority("alta"), Ok(Priority::High));
        assert!(matches!(
            parse_priority("urgent"),
            Err(InputError::InvalidPriority(_))
        ));
    }

    #[test]
    fn name_must_not_be_blank() {
        assert_eq!(require_name("  "), Err(InputError::EmptyName));
        assert_eq!(require_name(" Ana "), Ok("Ana".to_string()));
    }

    #[rstest]
    #[case("y", true)]
    #[case("S", true)]
    #[case("sim", true)]
    #[case("", false)]
    #[case("n", false)]
    fn confirmations(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_confirmation(input), expected);
    }
}
