// src/domain/repositories/repository.rs

use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainError;

/// Repository trait for bookmark persistence operations
pub trait BookmarkRepository: std::fmt::Debug + Send + Sync {
    /// Get a bookmark by its ID
    fn get_by_id(&self, id: i32) -> Result<Option<Bookmark>, DomainError>;

    /// Get all bookmarks, ordered by ID
    fn get_all(&self) -> Result<Vec<Bookmark>, DomainError>;

    /// Get the bookmarks owned by one user, ordered by ID
    fn get_by_user(&self, user_id: i32) -> Result<Vec<Bookmark>, DomainError>;

    /// Get the bookmarks filed under `category` (exact match), ordered by ID
    fn get_by_category(&self, category: &str) -> Result<Vec<Bookmark>, DomainError>;

    /// Distinct categories in use, sorted by name
    fn get_categories(&self) -> Result<Vec<String>, DomainError>;

    /// Add a new bookmark, assigning its ID
    fn add(&self, bookmark: &mut Bookmark) -> Result<(), DomainError>;

    /// Add all bookmarks in a single transaction.
    ///
    /// Either every bookmark is stored and receives its ID, or none is.
    fn add_all(&self, bookmarks: &mut [Bookmark]) -> Result<usize, DomainError>;

    /// Number of stored bookmarks
    fn count(&self) -> Result<usize, DomainError>;
}
