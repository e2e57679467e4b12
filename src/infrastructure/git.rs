//! Git operations for sync.
//!
//! `GitOps` wraps the handful of git commands the sync controller needs so the
//! controller can be exercised against a mock. Failures carry a
//! [`GitFailureReason`] parsed from git's output instead of raw text.

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Why a git command failed, as far as sync cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitFailureReason {
    NothingToCommit,
    /// Push refused because the remote has commits we lack
    Rejected,
    /// Pull refused because local and remote histories diverged
    DivergentBranches,
    Other,
}

impl GitFailureReason {
    /// Classify a failed command from its combined output
    pub fn classify(output: &str) -> Self {
        if output.contains("nothing to commit") || output.contains("working tree clean") {
            GitFailureReason::NothingToCommit
        } else if output.contains("divergent branches")
            || output.contains("Need to specify how to reconcile")
        {
            GitFailureReason::DivergentBranches
        } else if output.contains("[rejected]")
            || output.contains("non-fast-forward")
            || output.contains("fetch first")
            || output.contains("Updates were rejected because")
        {
            GitFailureReason::Rejected
        } else {
            GitFailureReason::Other
        }
    }
}

/// A failed git command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitFailure {
    pub reason: GitFailureReason,
    pub detail: String,
}

impl GitFailure {
    pub fn new(reason: GitFailureReason, detail: impl Into<String>) -> Self {
        GitFailure {
            reason,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for GitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail.trim())
    }
}

/// Errors that can occur during git operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    #[error("Git not installed or not in PATH")]
    NotInstalled,

    #[error("Failed to run git: {0}")]
    Spawn(String),

    #[error("{0}")]
    Failed(GitFailure),
}

impl GitError {
    /// Reason of a failed command, `None` if git never ran
    pub fn reason(&self) -> Option<GitFailureReason> {
        match self {
            GitError::Failed(failure) => Some(failure.reason),
            _ => None,
        }
    }
}

/// Trait for git operations. Can be mocked in tests.
///
/// Methods returning `String` yield the command's trimmed stdout.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Check that git can be run at all.
    fn version(&self) -> Result<String, GitError>;

    fn init(&self, path: &Path) -> Result<(), GitError>;

    fn config_set(&self, path: &Path, key: &str, value: &str) -> Result<(), GitError>;

    /// Read a local config value, `None` when unset.
    fn config_get(&self, path: &Path, key: &str) -> Result<Option<String>, GitError>;

    fn config_unset_all(&self, path: &Path, key: &str) -> Result<(), GitError>;

    fn remote_add(&self, path: &Path, name: &str, url: &str) -> Result<(), GitError>;

    fn remote_remove(&self, path: &Path, name: &str) -> Result<(), GitError>;

    fn remote_get_url(&self, path: &Path, name: &str) -> Result<String, GitError>;

    fn checkout(&self, path: &Path, branch: &str) -> Result<(), GitError>;

    /// Create `branch` and switch to it.
    fn checkout_new(&self, path: &Path, branch: &str) -> Result<(), GitError>;

    /// Create `branch` tracking `upstream` and switch to it.
    fn checkout_tracking(&self, path: &Path, branch: &str, upstream: &str)
        -> Result<(), GitError>;

    fn current_branch(&self, path: &Path) -> Result<String, GitError>;

    /// Stage all changes under the given pathspecs.
    fn add(&self, path: &Path, pathspecs: &[String]) -> Result<(), GitError>;

    fn status_porcelain(&self, path: &Path) -> Result<String, GitError>;

    /// Whether the index differs from HEAD.
    fn has_staged_changes(&self, path: &Path) -> Result<bool, GitError>;

    fn commit(&self, path: &Path, message: &str) -> Result<(), GitError>;

    /// Push `branch` to a remote name or URL.
    fn push(&self, path: &Path, remote: &str, branch: &str) -> Result<(), GitError>;

    fn pull(&self, path: &Path, remote: &str, branch: &str) -> Result<(), GitError>;

    fn fetch(&self, path: &Path, remote: &str, branch: &str) -> Result<(), GitError>;

    /// Merge `upstream`, allowing unrelated histories.
    fn merge_unrelated(&self, path: &Path, upstream: &str, message: &str)
        -> Result<(), GitError>;

    /// Whether `branch` exists on `remote`.
    fn remote_branch_exists(&self, path: &Path, remote: &str, branch: &str)
        -> Result<bool, GitError>;

    /// Number of commits reachable from HEAD.
    fn commit_count(&self, path: &Path) -> Result<u64, GitError>;
}

/// Real implementation of GitOps using std::process::Command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealGit;

impl RealGit {
    pub fn new() -> Self {
        Self
    }

    /// Run git in `path` and return its raw output.
    fn run_git(&self, path: Option<&Path>, args: &[&str]) -> Result<Output, GitError> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = path {
            command.current_dir(dir);
        }

        debug!(command = %redact_args(args), "running git");

        command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::NotInstalled
            } else {
                GitError::Spawn(e.to_string())
            }
        })
    }

    /// Run git and turn a non-zero exit into a classified failure.
    fn run_checked(&self, path: &Path, args: &[&str]) -> Result<String, GitError> {
        let output = self.run_git(Some(path), args)?;
        check_output(output)
    }
}

fn check_output(output: Output) -> Result<String, GitError> {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if output.status.success() {
        return Ok(stdout.trim().to_string());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let combined = match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (false, false) => format!("{}\n{}", stdout.trim(), stderr.trim()),
        (false, true) => stdout.trim().to_string(),
        _ => stderr.trim().to_string(),
    };

    Err(GitError::Failed(GitFailure::new(
        GitFailureReason::classify(&combined),
        redact(&combined),
    )))
}

/// Mask credentials embedded in `https://<token>@host` URLs.
pub fn redact(text: &str) -> String {
    credentials_regex().replace_all(text, "://***@").to_string()
}

fn credentials_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"://[^@\s/]+@").unwrap())
}

fn redact_args(args: &[&str]) -> String {
    redact(&args.join(" "))
}

impl GitOps for RealGit {
    fn version(&self) -> Result<String, GitError> {
        let output = self.run_git(None, &["--version"])?;
        check_output(output)
    }

    fn init(&self, path: &Path) -> Result<(), GitError> {
        self.run_checked(path, &["init"]).map(|_| ())
    }

    fn config_set(&self, path: &Path, key: &str, value: &str) -> Result<(), GitError> {
        self.run_checked(path, &["config", key, value]).map(|_| ())
    }

    fn config_get(&self, path: &Path, key: &str) -> Result<Option<String>, GitError> {
        let output = self.run_git(Some(path), &["config", key])?;
        // git config exits 1 when the key is unset
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        check_output(output).map(|v| if v.is_empty() { None } else { Some(v) })
    }

    fn config_unset_all(&self, path: &Path, key: &str) -> Result<(), GitError> {
        let output = self.run_git(Some(path), &["config", "--unset-all", key])?;
        // exit 5 means the key was not set
        if output.status.code() == Some(5) {
            return Ok(());
        }
        check_output(output).map(|_| ())
    }

    fn remote_add(&self, path: &Path, name: &str, url: &str) -> Result<(), GitError> {
        self.run_checked(path, &["remote", "add", name, url])
            .map(|_| ())
    }

    fn remote_remove(&self, path: &Path, name: &str) -> Result<(), GitError> {
        self.run_checked(path, &["remote", "remove", name]).map(|_| ())
    }

    fn remote_get_url(&self, path: &Path, name: &str) -> Result<String, GitError> {
        self.run_checked(path, &["remote", "get-url", name])
    }

    fn checkout(&self, path: &Path, branch: &str) -> Result<(), GitError> {
        self.run_checked(path, &["checkout", branch]).map(|_| ())
    }

    fn checkout_new(&self, path: &Path, branch: &str) -> Result<(), GitError> {
        self.run_checked(path, &["checkout", "-b", branch]).map(|_| ())
    }

    fn checkout_tracking(
        &self,
        path: &Path,
        branch: &str,
        upstream: &str,
    ) -> Result<(), GitError> {
        self.run_checked(path, &["checkout", "-b", branch, upstream])
            .map(|_| ())
    }

    fn current_branch(&self, path: &Path) -> Result<String, GitError> {
        self.run_checked(path, &["branch", "--show-current"])
    }

    fn add(&self, path: &Path, pathspecs: &[String]) -> Result<(), GitError> {
        // An empty pathspec list would stage the whole tree
        if pathspecs.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--all", "--"];
        args.extend(pathspecs.iter().map(String::as_str));
        self.run_checked(path, &args).map(|_| ())
    }

    fn status_porcelain(&self, path: &Path) -> Result<String, GitError> {
        self.run_checked(path, &["status", "--porcelain"])
    }

    fn has_staged_changes(&self, path: &Path) -> Result<bool, GitError> {
        let output = self.run_git(Some(path), &["diff", "--cached", "--quiet"])?;
        // --quiet exits 1 when there are differences
        if output.status.code() == Some(1) {
            return Ok(true);
        }
        check_output(output).map(|_| false)
    }

    fn commit(&self, path: &Path, message: &str) -> Result<(), GitError> {
        self.run_checked(path, &["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, path: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run_checked(path, &["push", remote, branch]).map(|_| ())
    }

    fn pull(&self, path: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run_checked(path, &["pull", remote, branch]).map(|_| ())
    }

    fn fetch(&self, path: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run_checked(path, &["fetch", remote, branch]).map(|_| ())
    }

    fn merge_unrelated(
        &self,
        path: &Path,
        upstream: &str,
        message: &str,
    ) -> Result<(), GitError> {
        self.run_checked(
            path,
            &["merge", upstream, "--allow-unrelated-histories", "-m", message],
        )
        .map(|_| ())
    }

    fn remote_branch_exists(
        &self,
        path: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<bool, GitError> {
        let output = self.run_git(
            Some(path),
            &["ls-remote", "--exit-code", "--heads", remote, branch],
        )?;
        // --exit-code makes ls-remote exit 2 when no ref matched
        if output.status.code() == Some(2) {
            return Ok(false);
        }
        check_output(output).map(|_| true)
    }

    fn commit_count(&self, path: &Path) -> Result<u64, GitError> {
        let count = self.run_checked(path, &["rev-list", "--count", "HEAD"])?;
        count
            .parse()
            .map_err(|_| GitError::Spawn(format!("unexpected rev-list output: {}", count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_nothing_to_commit() {
        assert_eq!(
            GitFailureReason::classify("On branch main\nnothing to commit, working tree clean"),
            GitFailureReason::NothingToCommit
        );
    }

    #[test]
    fn test_classify_rejected_push() {
        let output = " ! [rejected]        main -> main (non-fast-forward)\n\
                      error: failed to push some refs";
        assert_eq!(GitFailureReason::classify(output), GitFailureReason::Rejected);
        assert_eq!(
            GitFailureReason::classify("Updates were rejected because the remote contains work"),
            GitFailureReason::Rejected
        );
    }

    #[test]
    fn test_classify_remote_rejection_is_not_divergence() {
        let output = " ! [remote rejected] main -> main (protected branch hook declined)\n\
                      error: failed to push some refs to 'https://github.com/dev/logs.git'";
        assert_eq!(GitFailureReason::classify(output), GitFailureReason::Other);
    }

    #[test]
    fn test_classify_divergent_pull() {
        let output = "hint: You have divergent branches and need to specify how to \
                      reconcile them.\n\
                      fatal: Need to specify how to reconcile divergent branches.";
        assert_eq!(
            GitFailureReason::classify(output),
            GitFailureReason::DivergentBranches
        );
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(
            GitFailureReason::classify("fatal: Authentication failed"),
            GitFailureReason::Other
        );
    }

    #[test]
    fn test_error_reason() {
        let err = GitError::Failed(GitFailure::new(GitFailureReason::Rejected, "x"));
        assert_eq!(err.reason(), Some(GitFailureReason::Rejected));
        assert_eq!(GitError::NotInstalled.reason(), None);
    }

    #[test]
    fn test_redact_token_in_url() {
        assert_eq!(
            redact("push https://ghp_abc123@github.com/dev/logs.git main"),
            "push https://***@github.com/dev/logs.git main"
        );
        assert_eq!(
            redact("fatal: unable to access 'https://tok@github.com/dev/logs.git/'"),
            "fatal: unable to access 'https://***@github.com/dev/logs.git/'"
        );
    }

    #[test]
    fn test_redact_leaves_plain_urls() {
        assert_eq!(
            redact("https://github.com/dev/logs.git"),
            "https://github.com/dev/logs.git"
        );
        assert_eq!(redact("no urls here"), "no urls here");
    }

    #[test]
    fn test_failure_display_is_trimmed_detail() {
        let failure = GitFailure::new(GitFailureReason::Other, "  fatal: boom\n");
        assert_eq!(failure.to_string(), "fatal: boom");
    }
}
