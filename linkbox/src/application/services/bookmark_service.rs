// src/application/services/bookmark_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::bookmark::{Bookmark, BookmarkCandidate};
use crate::domain::caller::CallerId;
use std::fmt::Debug;

/// Service interface for single-bookmark operations
pub trait BookmarkService: Send + Sync + Debug {
    /// Validate one candidate, fill its defaults and store it for `caller`
    fn add_bookmark(
        &self,
        caller: CallerId,
        candidate: &BookmarkCandidate,
    ) -> ApplicationResult<Bookmark>;

    /// Get a bookmark by ID
    fn get_bookmark(&self, id: i32) -> ApplicationResult<Option<Bookmark>>;

    /// Get all bookmarks, no pagination
    fn get_all_bookmarks(&self) -> ApplicationResult<Vec<Bookmark>>;

    /// Get the bookmarks owned by `caller`
    fn get_bookmarks_for(&self, caller: CallerId) -> ApplicationResult<Vec<Bookmark>>;

    /// Get the bookmarks filed under `category`
    fn get_bookmarks_in(&self, category: &str) -> ApplicationResult<Vec<Bookmark>>;

    /// Categories in use, sorted by name
    fn get_categories(&self) -> ApplicationResult<Vec<String>>;
}
