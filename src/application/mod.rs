//! Application layer - Use cases and orchestration

pub mod create_log;
pub mod create_repo;
pub mod list_logs;
pub mod search_logs;
pub mod sync;
pub mod view_log;

pub use create_log::{CreateLogService, CreateOutcome};
pub use create_repo::{ensure_remote_repository, RepoProvisioning};
pub use list_logs::list_logs;
pub use search_logs::search_logs;
pub use sync::{SetupAnswers, SyncController};
pub use view_log::{view_log, ViewedLog};
