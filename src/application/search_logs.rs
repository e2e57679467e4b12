//! Search logs use case

use crate::error::{Result, TcacheError};
use crate::infrastructure::{LogRepository, SearchResult};

/// Search every document for `term`, case-insensitively.
pub fn search_logs(repository: &LogRepository, term: &str) -> Result<Vec<SearchResult>> {
    if term.trim().is_empty() {
        return Err(TcacheError::EmptySearchTerm);
    }
    repository.search(term.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blank_term_rejected() {
        let temp = TempDir::new().unwrap();
        let repo = LogRepository::new(temp.path().to_path_buf());
        assert!(matches!(
            search_logs(&repo, "   "),
            Err(TcacheError::EmptySearchTerm)
        ));
    }

    #[test]
    fn test_search_finds_term() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("2025-01-17.md"),
            "## What I Did\n- Tuned the Cache\n",
        )
        .unwrap();
        let repo = LogRepository::new(temp.path().to_path_buf());

        let results = search_logs(&repo, " cache ").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hits[0].section, "What I Did");
        assert!(search_logs(&repo, "nothing").unwrap().is_empty());
    }
}
