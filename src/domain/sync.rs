//! Sync state and outcomes.
//!
//! The controller in `application::sync` walks these states; the CLI only ever
//! sees the outcomes and a [`ConflictDescriptor`] when it has to stop.

use std::fmt;
use std::path::PathBuf;

/// Where the sync controller stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Unconfigured,
    Configuring,
    Ready,
    Syncing,
    /// Automatic merge failed; nothing more is attempted until the operator
    /// resolves it and pushes again
    ConflictPendingManualResolution(ConflictDescriptor),
}

/// Machine-readable description of a merge the controller could not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictDescriptor {
    pub directory: PathBuf,
    pub branch: String,
    /// Remote-tracking ref that failed to merge, e.g. `origin/main`
    pub upstream: String,
    pub detail: String,
}

impl ConflictDescriptor {
    /// Shell steps that finish the merge by hand
    pub fn remediation_steps(&self) -> Vec<String> {
        vec![
            format!("cd {}", self.directory.display()),
            "git status".to_string(),
            "# Resolve any conflicts, then:".to_string(),
            "git add .".to_string(),
            "git commit -m \"Resolve merge conflicts\"".to_string(),
            format!("git push origin {}", self.branch),
        ]
    }
}

impl fmt::Display for ConflictDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not merge {} into {} in {}",
            self.upstream,
            self.branch,
            self.directory.display()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Working tree was clean; no network call was made
    NothingToCommit,
    Pushed,
    /// Push was rejected, a pull succeeded and the second push went through
    PushedAfterPull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    RemoteBranchMissing,
    Pulled,
    /// Local and remote histories were merged automatically
    Merged,
}

/// Snapshot for `github status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Disabled { reason: String },
    Enabled {
        repository: String,
        branch: String,
        auto_sync: bool,
        sync_on_start: bool,
        last_sync: Option<String>,
    },
}
