//! Output formatting utilities

use crate::application::sync::{DebugReport, GitDebugInfo};
use crate::domain::sync::{PullOutcome, PushOutcome, SyncStatus};
use crate::infrastructure::{LogEntry, SearchResult};

/// Format a list of log entries for display
pub fn format_log_list(logs: &[LogEntry]) -> String {
    if logs.is_empty() {
        return "No cached task logs found".to_string();
    }

    let mut output = String::from("Cached task logs:\n");
    for entry in logs {
        output.push_str(&format!(" - {}\n", entry.date.format("%Y-%m-%d")));
    }
    output
}

/// Format search hits grouped by document
pub fn format_search_results(term: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No cached tasks containing \"{}\" found.", term);
    }

    let mut output = format!("Searching task cache for \"{}\":\n", term);
    for result in results {
        output.push_str(&format!("\nFound in {}:\n", result.entry.date.format("%Y-%m-%d")));
        for hit in &result.hits {
            if !hit.section.is_empty() {
                output.push_str(&format!("In section: {}\n", hit.section));
            }
            for line in &hit.lines {
                output.push_str(&line.text);
                output.push('\n');
            }
        }
    }
    output
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn format_sync_status(status: &SyncStatus) -> String {
    match status {
        SyncStatus::Disabled { reason } => format!(
            "GitHub Sync Status:\n  {}\n  Run \"tcache github setup\" to configure GitHub sync.\n",
            reason
        ),
        SyncStatus::Enabled {
            repository,
            branch,
            auto_sync,
            sync_on_start,
            last_sync,
        } => format!(
            "GitHub Sync Status:\n  Enabled: Yes\n  Repository: {}\n  Branch: {}\n  \
             Auto Sync: {}\n  Sync on Start: {}\n  Last Sync: {}\n",
            repository,
            branch,
            yes_no(*auto_sync),
            yes_no(*sync_on_start),
            last_sync.as_deref().unwrap_or("Never")
        ),
    }
}

pub fn format_push_outcome(outcome: PushOutcome) -> &'static str {
    match outcome {
        PushOutcome::NothingToCommit => "No changes to commit.",
        PushOutcome::Pushed | PushOutcome::PushedAfterPull => {
            "Task cache pushed to GitHub successfully."
        }
    }
}

pub fn format_pull_outcome(outcome: PullOutcome, branch: &str) -> String {
    match outcome {
        PullOutcome::RemoteBranchMissing => {
            format!("Remote branch {} not found. Nothing to pull.", branch)
        }
        PullOutcome::Pulled | PullOutcome::Merged => {
            "Task cache pulled from GitHub successfully.".to_string()
        }
    }
}

fn or_not_set(value: &str) -> &str {
    if value.is_empty() {
        "Not set"
    } else {
        value
    }
}

pub fn format_debug_report(report: &DebugReport) -> String {
    let mut output = String::from("GitHub Sync Debug Information:\n\n");
    output.push_str(&format!("Directory: {}\n", report.directory.display()));
    output.push_str(&format!("Config file: {}\n", report.config_path.display()));
    output.push_str(&format!("Config exists: {}\n", report.config_exists));
    output.push_str(&format!("Enabled: {}\n", report.enabled));
    output.push_str(&format!("Repository: {}\n", or_not_set(&report.repository)));
    output.push_str(&format!("Branch: {}\n", or_not_set(&report.branch)));
    output.push_str(&format!(
        "Token length: {}\n",
        report
            .token_length
            .map(|n| format!("{} characters", n))
            .unwrap_or_else(|| "Not set".to_string())
    ));
    output.push_str(&format!("Auto sync: {}\n", report.auto_sync));

    match &report.git {
        GitDebugInfo::NotInitialized => output.push_str("\nGit: Not initialized\n"),
        GitDebugInfo::Repository {
            remote_url,
            has_uncommitted,
            current_branch,
        } => {
            output.push_str("\nGit Configuration:\n");
            output.push_str(&format!("Remote URL: {}\n", remote_url));
            output.push_str(&format!("Uncommitted files: {}\n", yes_no(*has_uncommitted)));
            output.push_str(&format!(
                "Current branch: {}\n",
                if current_branch.is_empty() {
                    "Not on any branch"
                } else {
                    current_branch
                }
            ));
        }
        GitDebugInfo::Error(message) => {
            output.push_str(&format!("\nGit error: {}\n", message));
        }
    }

    output
}
