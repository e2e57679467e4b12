//! Date references accepted by `view`

use crate::error::{Result, TcacheError};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// A date reference that resolves to one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDate {
    Today,
    Yesterday,
    /// Today if it matches, otherwise the most recent occurrence
    Weekday(Weekday),
    /// Strictly before today
    LastWeekday(Weekday),
    Specific(NaiveDate),
}

impl LogDate {
    /// Parse a date reference string
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        if let Some(day) = normalized.strip_prefix("last ") {
            return parse_weekday(day.trim())
                .map(LogDate::LastWeekday)
                .ok_or_else(|| TcacheError::InvalidDate(input.to_string()));
        }

        match normalized.as_str() {
            "today" | "now" => Ok(LogDate::Today),
            "yesterday" => Ok(LogDate::Yesterday),
            other => {
                if let Some(weekday) = parse_weekday(other) {
                    return Ok(LogDate::Weekday(weekday));
                }
                NaiveDate::parse_from_str(other, "%Y-%m-%d")
                    .map(LogDate::Specific)
                    .map_err(|_| TcacheError::InvalidDate(input.to_string()))
            }
        }
    }

    /// Resolve against `today`
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            LogDate::Today => today,
            LogDate::Yesterday => today - Duration::days(1),
            LogDate::Weekday(target) => today - Duration::days(days_back(today, *target)),
            LogDate::LastWeekday(target) => {
                let back = match days_back(today, *target) {
                    0 => 7,
                    n => n,
                };
                today - Duration::days(back)
            }
            LogDate::Specific(date) => *date,
        }
    }
}

fn days_back(today: NaiveDate, target: Weekday) -> i64 {
    let current = today.weekday().num_days_from_monday();
    ((current + 7 - target.num_days_from_monday()) % 7) as i64
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Filename of the document for `date`
pub fn filename_for_date(date: NaiveDate) -> String {
    format!("{}.md", date.format("%Y-%m-%d"))
}

/// Inverse of [`filename_for_date`]; `None` for anything that is not a document
pub fn date_from_filename(filename: &str) -> Option<NaiveDate> {
    let stem = filename.strip_suffix(".md")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}
