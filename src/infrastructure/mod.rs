//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod git;
pub mod github;
pub mod prompt;
pub mod repository;

pub use config::SyncConfig;
pub use git::{GitOps, RealGit};
pub use github::{GitHubClient, HostingApi, RepositoryId};
pub use prompt::{Prompter, TerminalPrompter};
pub use repository::{LogEntry, LogRepository, LogStore, SearchResult};
