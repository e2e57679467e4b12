//! Domain layer - Business logic and domain models

pub mod formatter;
pub mod log_date;
pub mod search;
pub mod sync;
pub mod template;

pub use formatter::format_log;
pub use log_date::LogDate;
pub use sync::{ConflictDescriptor, PullOutcome, PushOutcome, SyncState, SyncStatus};
pub use template::{TemplateItem, DAILY_TEMPLATE};
