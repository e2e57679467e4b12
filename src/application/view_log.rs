//! View log use case

use crate::domain::LogDate;
use crate::error::Result;
use crate::infrastructure::LogRepository;
use chrono::NaiveDate;

/// A document looked up by date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewedLog {
    pub date: NaiveDate,
    /// `None` when nothing was captured that day
    pub content: Option<String>,
}

/// Resolve a date reference (default today) and read that day's document.
pub fn view_log(
    repository: &LogRepository,
    reference: Option<&str>,
    today: NaiveDate,
) -> Result<ViewedLog> {
    let date = match reference {
        Some(reference) => LogDate::parse(reference)?.resolve(today),
        None => today,
    };

    Ok(ViewedLog {
        date,
        content: repository.read_log(date)?,
    })
}
