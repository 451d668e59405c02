use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{BookmarkService, ImportService};
use crate::application::{BookmarkServiceImpl, ImportServiceImpl};
use crate::config::Settings;
use crate::domain::services::browser::BrowserService;
use crate::infrastructure::browser::SystemBrowser;
use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;
use crate::server::AppState;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Production service container - single source of truth for service creation
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    pub bookmark_repository: Arc<SqliteBookmarkRepository>,
    pub bookmark_service: Arc<dyn BookmarkService>,
    pub import_service: Arc<dyn ImportService>,
    pub browser_service: Arc<dyn BrowserService>,
}

impl ServiceContainer {
    /// Wire services on an existing database
    pub fn new(config: &Settings) -> ApplicationResult<Self> {
        if !Path::new(&config.db_url).exists() {
            return Err(ApplicationError::Other(format!(
                "Database not found at '{}'. Set LINKBOX_DB_URL or create one with 'linkbox create-db <path>'",
                config.db_url
            )));
        }
        Self::open(config)
    }

    /// Wire services, creating the database and its schema when missing
    pub fn new_or_create(config: &Settings) -> ApplicationResult<Self> {
        if !Path::new(&config.db_url).exists() {
            info!("Creating database at {}", config.db_url);
        }
        Self::open(config)
    }

    fn open(config: &Settings) -> ApplicationResult<Self> {
        let bookmark_repository = Self::create_repository(&config.db_url)?;

        let bookmark_service = Arc::new(BookmarkServiceImpl::new(bookmark_repository.clone()));
        let import_service = Arc::new(ImportServiceImpl::new(
            bookmark_repository.clone(),
            config.import.policy,
            config.import.max_concurrency,
        ));
        debug!(
            "Services ready: policy={}, max_concurrency={}",
            config.import.policy, config.import.max_concurrency
        );

        Ok(Self {
            bookmark_repository,
            bookmark_service,
            import_service,
            browser_service: Arc::new(SystemBrowser::new()),
        })
    }

    fn create_repository(db_url: &str) -> ApplicationResult<Arc<SqliteBookmarkRepository>> {
        // runs pending migrations
        let repository = SqliteBookmarkRepository::from_url(db_url).map_err(|e| {
            ApplicationError::Other(format!(
                "Failed to create SQLite bookmark repository: {}",
                e
            ))
        })?;
        Ok(Arc::new(repository))
    }

    /// Handler state for the HTTP server
    pub fn app_state(&self) -> AppState {
        AppState {
            bookmark_service: self.bookmark_service.clone(),
            import_service: self.import_service.clone(),
        }
    }
}
