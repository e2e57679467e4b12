//! Error types for tcache

use crate::domain::sync::ConflictDescriptor;
use crate::infrastructure::git::GitError;
use thiserror::Error;

/// Main error type for tcache application
#[derive(Debug, Error)]
pub enum TcacheError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Git is not installed or not in PATH")]
    ToolUnavailable,

    #[error("Automatic merge failed: {0}")]
    ManualResolutionRequired(ConflictDescriptor),

    #[error("Unable to sync with remote after pulling: {source}")]
    PushRetryFailed { branch: String, source: GitError },

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("GitHub API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Please provide a search term.")]
    EmptySearchTerm,

    #[error("Cannot determine home directory. Set {0} to choose a log directory.")]
    LogDirUnavailable(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {file}: {source}")]
    ConfigParse {
        file: &'static str,
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl TcacheError {
    /// Get the exit code for this error.
    ///
    /// Only failures that stop tcache from working at all are non-zero. A
    /// command that fails after reporting its problem exits 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            TcacheError::ConfigParse { .. } | TcacheError::LogDirUnavailable(_) => 2,
            TcacheError::Io(_) | TcacheError::TomlSerialize(_) => 1,
            _ => 0,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            TcacheError::Configuration(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Run 'tcache github setup' to configure GitHub sync\n\
                    • Check the repository is in 'owner/name' form\n\
                    • Run 'tcache github debug' to inspect the current settings",
                    msg
                )
            }
            TcacheError::ToolUnavailable => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Install git from https://git-scm.com/downloads\n\
                    • Make sure 'git --version' works in this shell",
                    self
                )
            }
            TcacheError::ManualResolutionRequired(conflict) => {
                let mut msg = format!(
                    "{}\n\nRun the following commands to resolve:\n",
                    self
                );
                for step in conflict.remediation_steps() {
                    msg.push_str(&format!("  {}\n", step));
                }
                msg
            }
            TcacheError::PushRetryFailed { branch, .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Run 'tcache github pull' and resolve any conflicts\n\
                    • Then run 'git push origin {}' in the log directory",
                    self, branch
                )
            }
            TcacheError::Api { status: 401, .. } | TcacheError::Api { status: 403, .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check your token at https://github.com/settings/tokens\n\
                    • The token needs the 'repo' scope for private repositories",
                    self
                )
            }
            TcacheError::InvalidDate(input) => {
                format!(
                    "Invalid date: '{}'\n\n\
                    Valid dates:\n\
                    • today, yesterday\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, last friday, etc.\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2025-05-20)\n\n\
                    Examples:\n\
                    tcache view yesterday\n\
                    tcache view 2025-05-20",
                    input
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using TcacheError
pub type Result<T> = std::result::Result<T, TcacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::git::{GitFailure, GitFailureReason};
    use std::path::PathBuf;

    #[test]
    fn test_fatal_exit_codes() {
        let source = toml::from_str::<toml::Table>("enabled = [").unwrap_err();
        let err = TcacheError::ConfigParse {
            file: ".github-config.toml",
            source,
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("Failed to parse .github-config.toml"));
        assert_eq!(TcacheError::LogDirUnavailable("TCACHE_DIR").exit_code(), 2);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(TcacheError::Io(io).exit_code(), 1);
    }

    #[test]
    fn test_reported_failures_exit_zero() {
        assert_eq!(TcacheError::Configuration("x".into()).exit_code(), 0);
        assert_eq!(TcacheError::InvalidDate("x".into()).exit_code(), 0);
        assert_eq!(TcacheError::EmptySearchTerm.exit_code(), 0);
        assert_eq!(TcacheError::ToolUnavailable.exit_code(), 0);
        assert_eq!(
            TcacheError::Api {
                status: 422,
                body: String::new()
            }
            .exit_code(),
            0
        );
    }

    #[test]
    fn test_empty_search_term_has_no_setup_hint() {
        let msg = TcacheError::EmptySearchTerm.display_with_suggestions();
        assert_eq!(msg, "Please provide a search term.");
    }

    #[test]
    fn test_configuration_suggestions() {
        let err = TcacheError::Configuration("GitHub sync is not configured".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("tcache github setup"));
        assert!(msg.contains("owner/name"));
    }

    #[test]
    fn test_invalid_date_examples() {
        let err = TcacheError::InvalidDate("someday".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("'someday'"));
        assert!(msg.contains("YYYY-MM-DD"));
        assert!(msg.contains("tcache view yesterday"));
    }

    #[test]
    fn test_manual_resolution_lists_steps() {
        let conflict = ConflictDescriptor {
            directory: PathBuf::from("/tmp/logs"),
            branch: "main".to_string(),
            upstream: "origin/main".to_string(),
            detail: "CONFLICT (content)".to_string(),
        };
        let err = TcacheError::ManualResolutionRequired(conflict);
        assert_eq!(err.exit_code(), 0);

        let msg = err.display_with_suggestions();
        assert!(msg.contains("cd /tmp/logs"));
        assert!(msg.contains("git status"));
        assert!(msg.contains("git push origin main"));
        assert!(!msg.contains("tcache github push"));
    }

    #[test]
    fn test_push_retry_failed_suggestions() {
        let err = TcacheError::PushRetryFailed {
            branch: "trunk".to_string(),
            source: GitError::Failed(GitFailure::new(
                GitFailureReason::Rejected,
                "! [rejected] main -> main (fetch first)",
            )),
        };
        let msg = err.display_with_suggestions();
        assert!(msg.contains("tcache github pull"));
        assert!(msg.contains("git push origin trunk"));
    }

    #[test]
    fn test_other_errors_fallback() {
        let err = TcacheError::Api {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.display_with_suggestions(), "GitHub API returned 500: boom");
    }
}
