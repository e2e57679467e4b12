//! List logs use case

use crate::error::Result;
use crate::infrastructure::{LogEntry, LogRepository};

/// List captured documents, newest first, optionally capped at `limit`.
pub fn list_logs(repository: &LogRepository, limit: Option<usize>) -> Result<Vec<LogEntry>> {
    let mut logs = repository.list_logs()?;
    if let Some(limit) = limit {
        logs.truncate(limit);
    }
    Ok(logs)
}
