// src/application/services/bookmark_service_impl.rs
use std::sync::Arc;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::bookmark_service::BookmarkService;
use crate::domain::bookmark::{Bookmark, BookmarkCandidate};
use crate::domain::caller::CallerId;
use crate::domain::repositories::repository::BookmarkRepository;
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct BookmarkServiceImpl<R: BookmarkRepository> {
    repository: Arc<R>,
}

impl<R: BookmarkRepository> BookmarkServiceImpl<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self), level = "trace")]
    fn validate_bookmark_id(&self, id: i32) -> ApplicationResult<()> {
        if id <= 0 {
            return Err(ApplicationError::Validation(format!(
                "Invalid bookmark ID: {}",
                id
            )));
        }
        Ok(())
    }
}

impl<R: BookmarkRepository> BookmarkService for BookmarkServiceImpl<R> {
    #[instrument(skip(self, candidate), level = "debug", fields(caller = %caller))]
    fn add_bookmark(
        &self,
        caller: CallerId,
        candidate: &BookmarkCandidate,
    ) -> ApplicationResult<Bookmark> {
        let mut bookmark = Bookmark::from_candidate(candidate, caller)?;
        self.repository.add(&mut bookmark)?;
        debug!("Added bookmark: {}", bookmark);
        Ok(bookmark)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_bookmark(&self, id: i32) -> ApplicationResult<Option<Bookmark>> {
        self.validate_bookmark_id(id)?;
        Ok(self.repository.get_by_id(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_all_bookmarks(&self) -> ApplicationResult<Vec<Bookmark>> {
        Ok(self.repository.get_all()?)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_bookmarks_for(&self, caller: CallerId) -> ApplicationResult<Vec<Bookmark>> {
        Ok(self.repository.get_by_user(caller.value())?)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_bookmarks_in(&self, category: &str) -> ApplicationResult<Vec<Bookmark>> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ApplicationError::Validation(
                "Category must not be empty".to_string(),
            ));
        }
        Ok(self.repository.get_by_category(category)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_categories(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.repository.get_categories()?)
    }
}
