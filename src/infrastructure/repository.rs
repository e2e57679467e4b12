//! File system storage for daily documents

use crate::domain::log_date::{date_from_filename, filename_for_date};
use crate::domain::search::{contains_term, find_section_hits, SectionHit};
use crate::error::{Result, TcacheError};
use crate::infrastructure::config::{SyncConfig, CONFIG_FILENAME};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the log directory
pub const LOG_DIR_ENV: &str = "TCACHE_DIR";

/// Default directory name under the user's home
const DEFAULT_DIR_NAME: &str = ".task-cache";

const GITIGNORE: &str = ".gitignore";

/// A document on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub filename: String,
    pub date: NaiveDate,
}

impl LogEntry {
    pub fn new(filename: String, date: NaiveDate) -> Self {
        LogEntry { filename, date }
    }
}

/// Documents of one file that matched a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub entry: LogEntry,
    pub hits: Vec<SectionHit>,
}

/// Abstract storage for the log directory
pub trait LogStore {
    /// Get the root directory of this store
    fn root(&self) -> &Path;

    /// Load sync configuration, defaults if none saved yet
    fn load_sync_config(&self) -> Result<SyncConfig>;

    /// Persist sync configuration
    fn save_sync_config(&self, config: &SyncConfig) -> Result<()>;

    /// Create the root directory if needed
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of LogStore
#[derive(Debug, Clone)]
pub struct LogRepository {
    pub root: PathBuf,
}

impl LogRepository {
    /// Create a repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        LogRepository { root }
    }

    /// Resolve the log directory: `TCACHE_DIR` first, then `~/.task-cache`
    pub fn discover() -> Result<Self> {
        if let Ok(dir) = std::env::var(LOG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(LogRepository::new(PathBuf::from(dir)));
            }
        }

        let home = dirs::home_dir().ok_or(TcacheError::LogDirUnavailable(LOG_DIR_ENV))?;

        Ok(LogRepository::new(home.join(DEFAULT_DIR_NAME)))
    }

    /// Path of the document for `date`
    pub fn log_path(&self, date: NaiveDate) -> PathBuf {
        self.root.join(filename_for_date(date))
    }

    pub fn log_exists(&self, date: NaiveDate) -> bool {
        self.log_path(date).exists()
    }

    /// Read the document for `date`, `None` if there is none
    pub fn read_log(&self, date: NaiveDate) -> Result<Option<String>> {
        let path = self.log_path(date);

        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path).map(Some).map_err(TcacheError::Io)
    }

    /// Write the document for `date`, replacing any existing one.
    ///
    /// Writes to a temp file beside the target and renames it into place.
    pub fn write_log(&self, date: NaiveDate, content: &str) -> Result<PathBuf> {
        self.initialize()?;

        let path = self.log_path(date);
        let tmp_path = self
            .root
            .join(format!(".{}.tmp-{}", filename_for_date(date), std::process::id()));

        fs::write(&tmp_path, content)?;

        if path.exists() {
            // rename does not overwrite on Windows
            fs::remove_file(&path)?;
        }

        fs::rename(&tmp_path, &path)?;
        debug!(path = %path.display(), "wrote log");
        Ok(path)
    }

    /// All dated documents, newest first
    pub fn list_logs(&self) -> Result<Vec<LogEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut logs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let Ok(entry) = entry else {
                continue;
            };
            if !entry.path().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Some(date) = date_from_filename(&name) {
                logs.push(LogEntry::new(name, date));
            }
        }

        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(logs)
    }

    /// Case-insensitive search across all documents, newest first
    pub fn search(&self, term: &str) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();

        for entry in self.list_logs()? {
            let content = fs::read_to_string(self.root.join(&entry.filename))?;
            if !contains_term(&content, term) {
                continue;
            }
            let hits = find_section_hits(&content, term);
            results.push(SearchResult { entry, hits });
        }

        Ok(results)
    }

    /// Check if the directory is a git working tree
    pub fn is_git_repo(&self) -> bool {
        self.root.join(".git").exists()
    }

    /// Make sure `.gitignore` lists the sync config, keeping any other entries
    pub fn ensure_sync_exclusion(&self) -> Result<()> {
        let path = self.root.join(GITIGNORE);
        let mut content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(TcacheError::Io(e)),
        };

        if content.lines().any(|line| line.trim() == CONFIG_FILENAME) {
            return Ok(());
        }

        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(CONFIG_FILENAME);
        content.push('\n');
        fs::write(&path, content)?;
        debug!(path = %path.display(), "excluded sync config from git");
        Ok(())
    }

    /// Paths that sync is allowed to stage: dated documents and `.gitignore`
    pub fn sync_pathspecs(&self) -> Result<Vec<String>> {
        let mut paths: Vec<String> = self
            .list_logs()?
            .into_iter()
            .map(|entry| entry.filename)
            .collect();
        if self.root.join(GITIGNORE).is_file() {
            paths.push(GITIGNORE.to_string());
        }
        Ok(paths)
    }

    pub fn sync_config_path(&self) -> PathBuf {
        SyncConfig::path_in(&self.root)
    }
}

impl LogStore for LogRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_sync_config(&self) -> Result<SyncConfig> {
        SyncConfig::load_from_dir(&self.root)
    }

    fn save_sync_config(&self, config: &SyncConfig) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}
