//! Isolated test environments: a throwaway database plus wired services.

use std::sync::Arc;

use tempfile::TempDir;

use crate::application::services::{BookmarkService, ImportService};
use crate::application::{BookmarkServiceImpl, ImportServiceImpl};
use crate::config::DEFAULT_MAX_CONCURRENCY;
use crate::domain::import::ImportPolicy;
use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;
use crate::server::AppState;
use crate::util::testing::{init_test_env, setup_test_db};

/// Fresh database and services; the database lives as long as the context
#[derive(Debug)]
pub struct TestContext {
    repository: Arc<SqliteBookmarkRepository>,
    bookmark_service: Arc<dyn BookmarkService>,
    import_service: Arc<dyn ImportService>,
    _db_dir: TempDir,
}

impl TestContext {
    /// Context with the atomic import policy
    pub fn new() -> Self {
        Self::with_policy(ImportPolicy::Atomic, DEFAULT_MAX_CONCURRENCY)
    }

    pub fn with_policy(policy: ImportPolicy, max_concurrency: usize) -> Self {
        init_test_env();
        let (repository, db_dir) = setup_test_db();
        let repository = Arc::new(repository);
        let bookmark_service = Arc::new(BookmarkServiceImpl::new(repository.clone()));
        let import_service = Arc::new(ImportServiceImpl::new(
            repository.clone(),
            policy,
            max_concurrency,
        ));

        Self {
            repository,
            bookmark_service,
            import_service,
            _db_dir: db_dir,
        }
    }

    pub fn repository(&self) -> Arc<SqliteBookmarkRepository> {
        self.repository.clone()
    }

    pub fn bookmark_service(&self) -> Arc<dyn BookmarkService> {
        self.bookmark_service.clone()
    }

    pub fn import_service(&self) -> Arc<dyn ImportService> {
        self.import_service.clone()
    }

    /// Handler state backed by this context's services
    pub fn app_state(&self) -> AppState {
        AppState {
            bookmark_service: self.bookmark_service.clone(),
            import_service: self.import_service.clone(),
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::repository::BookmarkRepository;

    #[test]
    fn test_context_creation() {
        let ctx = TestContext::new();
        assert!(ctx.bookmark_service().get_all_bookmarks().unwrap().is_empty());
        assert_eq!(ctx.import_service().policy(), ImportPolicy::Atomic);
    }

    #[test]
    fn test_contexts_are_isolated() {
        let first = TestContext::with_policy(ImportPolicy::Independent, 2);
        let second = TestContext::new();
        first
            .bookmark_service()
            .add_bookmark(
                crate::domain::caller::CallerId::new(1).unwrap(),
                &crate::domain::bookmark::BookmarkCandidate {
                    title: Some("t".into()),
                    url: Some("http://t".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(first.repository().count().unwrap(), 1);
        assert_eq!(second.repository().count().unwrap(), 0);
    }
}
