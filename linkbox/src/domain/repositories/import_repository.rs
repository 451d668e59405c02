// src/domain/repositories/import_repository.rs
use crate::domain::bookmark::BookmarkCandidate;
use crate::domain::error::DomainResult;
use std::fmt::Debug;
use std::path::Path;

/// Source of candidate records for a batch import
pub trait ImportRepository: Send + Sync + Debug {
    /// Parse delimited text, one candidate per non-blank line
    fn parse_text(&self, content: &str) -> DomainResult<Vec<BookmarkCandidate>>;

    /// Read a UTF-8 file and parse its content
    fn import_text_file(&self, path: &Path) -> DomainResult<Vec<BookmarkCandidate>> {
        let content = std::fs::read_to_string(path)?;
        self.parse_text(&content)
    }
}
