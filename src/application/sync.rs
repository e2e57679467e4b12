//! GitHub sync use cases
//!
//! `SyncController` drives git through push and pull against one remote branch.
//! It recovers once from diverging histories (pull-then-retry on push, one
//! automatic merge on pull) and otherwise stops with an error. Only the
//! outermost successful operation stamps `last_sync`.

use crate::domain::sync::{ConflictDescriptor, PullOutcome, PushOutcome, SyncState, SyncStatus};
use crate::error::{Result, TcacheError};
use crate::infrastructure::git::{redact, GitError, GitFailureReason, GitOps};
use crate::infrastructure::{LogRepository, LogStore, Prompter, SyncConfig};
use chrono::{Local, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const REMOTE: &str = "origin";
const MERGE_MESSAGE: &str = "Merge remote changes";
const FALLBACK_EMAIL: &str = "task-cache-sync@example.com";
const FALLBACK_NAME: &str = "Task Cache Sync";

/// Values collected by `github setup`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupAnswers {
    pub repository: String,
    pub branch: String,
    pub token: String,
    pub auto_sync: bool,
    pub sync_on_start: bool,
}

impl SetupAnswers {
    /// Ask for each setting, keeping the current value on a blank answer
    pub fn prompt<P: Prompter>(prompter: &mut P, current: &SyncConfig) -> Result<Self> {
        let repository = prompter.ask(&format!(
            "GitHub repository (format: username/repo): {}",
            bracketed(&current.repository)
        ))?;
        let branch = prompter.ask(&format!("Branch to use: [{}] ", current.branch))?;

        let token_hint = if current.token.is_empty() {
            ""
        } else {
            "[Already set] "
        };
        let token = prompter.ask(&format!("GitHub Personal Access Token: {}", token_hint))?;

        let auto_sync = ask_flag(
            prompter,
            "Automatically sync after creating a task cache?",
            current.auto_sync,
        )?;
        let sync_on_start = ask_flag(
            prompter,
            "Sync task cache when starting tcache?",
            current.sync_on_start,
        )?;

        Ok(SetupAnswers {
            repository: or_current(repository, &current.repository),
            branch: or_current(branch, &current.branch),
            token: or_current(token, &current.token),
            auto_sync,
            sync_on_start,
        })
    }
}

fn bracketed(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("[{}] ", value)
    }
}

fn or_current(answer: String, current: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        current.to_string()
    } else {
        answer.to_string()
    }
}

fn ask_flag<P: Prompter>(prompter: &mut P, question: &str, current: bool) -> Result<bool> {
    let default = if current { "y" } else { "n" };
    let answer = prompter.ask(&format!("{} (y/n) [{}] ", question, default))?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || (answer.is_empty() && current))
}

/// What `github debug` reports about the working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitDebugInfo {
    NotInitialized,
    Repository {
        remote_url: String,
        has_uncommitted: bool,
        current_branch: String,
    },
    Error(String),
}

/// Snapshot for `github debug`; never contains the token itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugReport {
    pub directory: PathBuf,
    pub config_path: PathBuf,
    pub config_exists: bool,
    pub enabled: bool,
    pub repository: String,
    pub branch: String,
    pub token_length: Option<usize>,
    pub auto_sync: bool,
    pub git: GitDebugInfo,
}

/// Push/pull state machine over a log directory
pub struct SyncController<G: GitOps> {
    git: G,
    repository: LogRepository,
    config: SyncConfig,
    state: SyncState,
}

impl<G: GitOps> SyncController<G> {
    pub fn new(git: G, repository: LogRepository, config: SyncConfig) -> Self {
        let state = if config.is_enabled() {
            SyncState::Ready
        } else {
            SyncState::Unconfigured
        };

        SyncController {
            git,
            repository,
            config,
            state,
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn dir(&self) -> &Path {
        self.repository.root()
    }

    /// Whether git can be run at all
    pub fn git_available(&self) -> bool {
        self.git.version().is_ok()
    }

    pub fn status(&self) -> SyncStatus {
        if !self.config.enabled {
            return SyncStatus::Disabled {
                reason: "GitHub sync is not enabled.".to_string(),
            };
        }
        if !self.config.has_credentials() {
            return SyncStatus::Disabled {
                reason: "GitHub sync is not fully configured.".to_string(),
            };
        }

        SyncStatus::Enabled {
            repository: self.config.repository.clone(),
            branch: self.config.branch.clone(),
            auto_sync: self.config.auto_sync,
            sync_on_start: self.config.sync_on_start,
            last_sync: self.config.last_sync.map(|t| {
                t.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            }),
        }
    }

    /// Apply setup answers and link the directory to the remote.
    ///
    /// Leaves sync disabled if git is missing, credentials are incomplete, or
    /// linking fails.
    pub fn configure(&mut self, answers: SetupAnswers) -> Result<()> {
        self.state = SyncState::Configuring;
        info!("configuring GitHub sync");

        if let Err(e) = self.git.version() {
            self.abort_setup()?;
            return Err(match e {
                GitError::NotInstalled => TcacheError::ToolUnavailable,
                other => other.into(),
            });
        }

        self.config.repository = answers.repository.trim().to_string();
        self.config.branch = answers.branch.trim().to_string();
        self.config.token = answers.token.trim().to_string();
        self.config.auto_sync = answers.auto_sync;
        self.config.sync_on_start = answers.sync_on_start;

        if !self.config.has_credentials() {
            self.abort_setup()?;
            return Err(TcacheError::Configuration(
                "Missing repository or token. GitHub sync will not be enabled.".to_string(),
            ));
        }
        if self.config.branch.is_empty() {
            self.config.branch = SyncConfig::default().branch;
        }

        let linked = self
            .config
            .repository
            .parse::<crate::infrastructure::RepositoryId>()
            .and_then(|_| self.link_repository());
        if let Err(e) = linked {
            self.abort_setup()?;
            return Err(e);
        }

        self.config.enabled = true;
        self.repository.save_sync_config(&self.config)?;
        self.state = SyncState::Ready;
        info!(repository = %self.config.repository, "GitHub sync configured");
        Ok(())
    }

    fn abort_setup(&mut self) -> Result<()> {
        warn!("GitHub sync setup aborted");
        self.config.enabled = false;
        self.state = SyncState::Unconfigured;
        self.repository.save_sync_config(&self.config)
    }

    /// Initialise the working tree and point `origin` at the remote
    fn link_repository(&self) -> Result<()> {
        let dir = self.dir();
        self.repository.initialize()?;

        if !self.repository.is_git_repo() {
            info!(dir = %dir.display(), "initializing git repository");
            self.git.init(dir)?;
        }
        self.repository.ensure_sync_exclusion()?;

        // Preferences only
        let _ = self.git.config_set(dir, "pull.rebase", "false");
        let _ = self.git.config_set(dir, "init.defaultBranch", "main");
        self.clear_credential_helpers();

        let _ = self.git.remote_remove(dir, REMOTE);
        self.git
            .remote_add(dir, REMOTE, &self.config.authenticated_url())?;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        if !self.config.is_enabled() {
            return Err(TcacheError::Configuration(
                "GitHub sync is not configured. Run 'tcache github setup' first.".to_string(),
            ));
        }
        Ok(())
    }

    /// Commit local changes and push them.
    ///
    /// A clean working tree succeeds without touching the network. A push
    /// rejected for diverging history is retried once after a pull.
    pub fn push(&mut self) -> Result<PushOutcome> {
        self.ensure_ready()?;
        self.state = SyncState::Syncing;
        info!(branch = %self.config.branch, "pushing task cache");

        let result = self.push_once();
        let stamp = matches!(
            result,
            Ok(PushOutcome::Pushed) | Ok(PushOutcome::PushedAfterPull)
        );
        self.finish(result, stamp)
    }

    /// Bring remote changes into the working tree.
    pub fn pull(&mut self) -> Result<PullOutcome> {
        self.ensure_ready()?;
        self.state = SyncState::Syncing;
        info!(branch = %self.config.branch, "pulling task cache");

        let result = self.pull_once();
        let stamp = matches!(result, Ok(PullOutcome::Pulled) | Ok(PullOutcome::Merged));
        self.finish(result, stamp)
    }

    fn finish<T>(&mut self, result: Result<T>, stamp: bool) -> Result<T> {
        match result {
            Ok(outcome) => {
                self.state = SyncState::Ready;
                if stamp {
                    self.config.last_sync = Some(Utc::now());
                    self.repository.save_sync_config(&self.config)?;
                }
                Ok(outcome)
            }
            Err(TcacheError::ManualResolutionRequired(conflict)) => {
                self.state = SyncState::ConflictPendingManualResolution(conflict.clone());
                Err(TcacheError::ManualResolutionRequired(conflict))
            }
            Err(e) => {
                self.state = SyncState::Ready;
                Err(e)
            }
        }
    }

    fn push_once(&self) -> Result<PushOutcome> {
        let dir = self.dir();
        let branch = self.config.branch.as_str();

        self.clear_credential_helpers();
        self.ensure_identity()?;

        if self.git.checkout(dir, branch).is_err() {
            // Ignore if it already exists
            let _ = self.git.checkout_new(dir, branch);
        }

        // Only documents and .gitignore; the sync config holds the token
        self.repository.ensure_sync_exclusion()?;
        let pathspecs = self.repository.sync_pathspecs()?;
        self.git.add(dir, &pathspecs)?;

        if !self.git.has_staged_changes(dir)? {
            info!("no changes to commit");
            return Ok(PushOutcome::NothingToCommit);
        }

        let message = format!(
            "Update task cache: {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        match self.git.commit(dir, &message) {
            Err(e) if e.reason() == Some(GitFailureReason::NothingToCommit) => {
                info!("no changes to commit");
                return Ok(PushOutcome::NothingToCommit);
            }
            other => other?,
        }

        let url = self.config.authenticated_url();
        match self.git.push(dir, &url, branch) {
            Ok(()) => Ok(PushOutcome::Pushed),
            Err(e) if is_divergence(&e) => {
                warn!(detail = %redact(&e.to_string()), "remote has changes, pulling first");
                self.pull_once()?;
                self.git
                    .push(dir, &url, branch)
                    .map_err(|source| TcacheError::PushRetryFailed {
                        branch: branch.to_string(),
                        source,
                    })?;
                Ok(PushOutcome::PushedAfterPull)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn pull_once(&self) -> Result<PullOutcome> {
        let dir = self.dir();
        let branch = self.config.branch.as_str();
        let upstream = format!("{}/{}", REMOTE, branch);

        if !self.git.remote_branch_exists(dir, REMOTE, branch)? {
            info!(branch, "remote branch not found, nothing to pull");
            return Ok(PullOutcome::RemoteBranchMissing);
        }

        let has_history = self.git.commit_count(dir).map(|n| n > 0).unwrap_or(false);

        if !has_history {
            if let Err(e) = self.git.pull(dir, REMOTE, branch) {
                debug!(error = %e, "plain pull failed, fetching instead");
                self.git.fetch(dir, REMOTE, branch)?;
                self.git.checkout_tracking(dir, branch, &upstream)?;
            }
            return Ok(PullOutcome::Pulled);
        }

        match self.git.pull(dir, REMOTE, branch) {
            Ok(()) => Ok(PullOutcome::Pulled),
            Err(e) if e.reason() == Some(GitFailureReason::DivergentBranches) => {
                warn!("divergent branches detected, attempting merge");
                let merged = self
                    .git
                    .fetch(dir, REMOTE, branch)
                    .and_then(|_| self.git.merge_unrelated(dir, &upstream, MERGE_MESSAGE));

                match merged {
                    Ok(()) => Ok(PullOutcome::Merged),
                    Err(merge_err) => Err(TcacheError::ManualResolutionRequired(
                        ConflictDescriptor {
                            directory: dir.to_path_buf(),
                            branch: branch.to_string(),
                            upstream,
                            detail: merge_err.to_string(),
                        },
                    )),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Credential helpers would shadow the token in the remote URL
    fn clear_credential_helpers(&self) {
        if let Err(e) = self.git.config_unset_all(self.dir(), "credential.helper") {
            debug!(error = %e, "could not clear credential helpers");
        }
    }

    fn ensure_identity(&self) -> Result<()> {
        let dir = self.dir();
        match self.git.config_get(dir, "user.email") {
            Ok(Some(_)) => Ok(()),
            _ => {
                self.git.config_set(dir, "user.email", FALLBACK_EMAIL)?;
                self.git.config_set(dir, "user.name", FALLBACK_NAME)?;
                Ok(())
            }
        }
    }

    pub fn debug_report(&self) -> DebugReport {
        let config_path = self.repository.sync_config_path();

        let git = if self.repository.is_git_repo() {
            self.git_debug_info()
                .unwrap_or_else(|e| GitDebugInfo::Error(e.to_string()))
        } else {
            GitDebugInfo::NotInitialized
        };

        DebugReport {
            directory: self.dir().to_path_buf(),
            config_exists: config_path.exists(),
            config_path,
            enabled: self.config.enabled,
            repository: self.config.repository.clone(),
            branch: self.config.branch.clone(),
            token_length: if self.config.token.is_empty() {
                None
            } else {
                Some(self.config.token.chars().count())
            },
            auto_sync: self.config.auto_sync,
            git,
        }
    }

    fn git_debug_info(&self) -> std::result::Result<GitDebugInfo, GitError> {
        let dir = self.dir();
        let remote_url = redact(&self.git.remote_get_url(dir, REMOTE)?);
        let has_uncommitted = !self.git.status_porcelain(dir)?.trim().is_empty();
        let current_branch = self.git.current_branch(dir)?;

        Ok(GitDebugInfo::Repository {
            remote_url,
            has_uncommitted,
            current_branch,
        })
    }
}

fn is_divergence(error: &GitError) -> bool {
    matches!(
        error.reason(),
        Some(GitFailureReason::Rejected) | Some(GitFailureReason::DivergentBranches)
    )
}
