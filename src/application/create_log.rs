//! Create log use case

use crate::domain::formatter::format_log;
use crate::domain::template::DAILY_TEMPLATE;
use crate::error::Result;
use crate::infrastructure::{LogRepository, Prompter};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use tracing::info;

/// Result of an interactive capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Saved(PathBuf),
    Cancelled,
}

/// Service for capturing today's log from prompts
pub struct CreateLogService {
    repository: LogRepository,
}

impl CreateLogService {
    pub fn new(repository: LogRepository) -> Self {
        CreateLogService { repository }
    }

    /// Ask the daily questions and save the formatted document for `now`.
    ///
    /// An existing document for the same day is only replaced after the user
    /// confirms.
    pub fn execute<P: Prompter>(
        &self,
        prompter: &mut P,
        now: NaiveDateTime,
    ) -> Result<CreateOutcome> {
        let date = now.date();

        // 1. Guard an existing document
        if self.repository.log_exists(date) {
            let question = format!(
                "A task cache for {} already exists. Overwrite? (y/n) ",
                date.format("%Y-%m-%d")
            );
            if !prompter.confirm(&question)? {
                info!(%date, "kept existing log");
                return Ok(CreateOutcome::Cancelled);
            }
        }

        // 2. Collect one answer per question
        let mut answers = Vec::with_capacity(DAILY_TEMPLATE.len());
        for item in DAILY_TEMPLATE.iter() {
            answers.push(prompter.ask(&format!("{}\n> ", item.prompt))?);
        }

        // 3. Format and store
        let content = format_log(&DAILY_TEMPLATE, &answers, now);
        let path = self.repository.write_log(date, &content)?;
        info!(path = %path.display(), "saved log");

        Ok(CreateOutcome::Saved(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::prompt::ScriptedPrompter;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 17)
            .unwrap()
            .and_hms_opt(12, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_creates_new_log() {
        let temp = TempDir::new().unwrap();
        let service = CreateLogService::new(LogRepository::new(temp.path().to_path_buf()));
        let mut prompter =
            ScriptedPrompter::new(&["shipped the parser", "write tests", "", "  "]);

        let outcome = service.execute(&mut prompter, noon()).unwrap();
        let path = temp.path().join("2025-01-17.md");
        assert_eq!(outcome, CreateOutcome::Saved(path.clone()));
        assert_eq!(prompter.asked.len(), 4);
        assert!(prompter.asked[0].starts_with("What did you do today?"));

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("# Task Cache: Friday, January 17th, 2025\n"));
        assert!(content.contains("## What I Did\n- shipped the parser\n"));
        assert!(content.contains("## What's Next\n- write tests\n"));
        assert!(!content.contains("## What Broke or Got Weird"));
        assert!(content.ends_with("*Cached at 12:05 PM*\n"));
    }

    #[test]
    fn test_declined_overwrite_keeps_existing() {
        let temp = TempDir::new().unwrap();
        let repo = LogRepository::new(temp.path().to_path_buf());
        repo.write_log(noon().date(), "# original").unwrap();

        let service = CreateLogService::new(repo.clone());
        let mut prompter = ScriptedPrompter::new(&["n"]);

        assert_eq!(
            service.execute(&mut prompter, noon()).unwrap(),
            CreateOutcome::Cancelled
        );
        assert_eq!(prompter.asked.len(), 1);
        assert!(prompter.asked[0].contains("2025-01-17"));
        assert_eq!(repo.read_log(noon().date()).unwrap().as_deref(), Some("# original"));
    }

    #[test]
    fn test_confirmed_overwrite_replaces() {
        let temp = TempDir::new().unwrap();
        let repo = LogRepository::new(temp.path().to_path_buf());
        repo.write_log(noon().date(), "# original").unwrap();

        let service = CreateLogService::new(repo.clone());
        let mut prompter = ScriptedPrompter::new(&["yes", "new work", "", "", ""]);

        assert!(matches!(
            service.execute(&mut prompter, noon()).unwrap(),
            CreateOutcome::Saved(_)
        ));
        let content = repo.read_log(noon().date()).unwrap().unwrap();
        assert!(content.contains("- new work"));
    }
}
