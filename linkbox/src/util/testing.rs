// src/util/testing.rs

use std::collections::{BTreeSet, HashSet};
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainError;
use crate::domain::repositories::repository::BookmarkRepository;
use crate::infrastructure::repositories::sqlite::migration;
use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;

/// Environment variables read by `load_settings`
pub const SETTINGS_ENV_VARS: [&str; 4] = [
    "LINKBOX_DB_URL",
    "LINKBOX_BIND",
    "LINKBOX_IMPORT_POLICY",
    "LINKBOX_IMPORT_MAX_CONCURRENCY",
];

static TEST_LOGGING: OnceLock<()> = OnceLock::new();

/// Initializes test logging exactly once per process
pub fn init_test_env() {
    TEST_LOGGING.get_or_init(|| {
        setup_test_logging();
        info!("Test environment initialized");
    });
}

fn setup_test_logging() {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["hyper", "hyper_util", "reqwest", "mio", "want", "h2"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Restores the `LINKBOX_*` variables on drop
#[derive(Debug, Clone)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            saved: SETTINGS_ENV_VARS
                .iter()
                .map(|name| (*name, env::var(name).ok()))
                .collect(),
        }
    }

    /// Clear every settings variable for the lifetime of the guard
    pub fn cleared() -> Self {
        let guard = Self::new();
        for name in SETTINGS_ENV_VARS {
            env::remove_var(name);
        }
        guard
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(val) => env::set_var(name, val),
                None => env::remove_var(name),
            }
        }
    }
}

/// Creates a repository on a fresh database inside a temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped, keep it
/// alive for as long as the repository is used.
pub fn setup_test_db() -> (SqliteBookmarkRepository, TempDir) {
    init_test_env();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("linkbox_test.db");
    let repository = SqliteBookmarkRepository::from_url(db_path.to_string_lossy().as_ref())
        .expect("Failed to create SqliteBookmarkRepository");
    let mut conn = repository
        .get_connection()
        .expect("Failed to get connection from SqliteBookmarkRepository");
    migration::init_db(&mut conn).expect("Failed to initialize DB schema");
    (repository, dir)
}

/// In-memory repository with failure injection and concurrency tracking
#[derive(Debug, Default)]
pub struct InMemoryBookmarkRepository {
    bookmarks: Mutex<Vec<Bookmark>>,
    failing_urls: HashSet<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    add_calls: AtomicUsize,
}

impl InMemoryBookmarkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any create of a bookmark with this URL fails with a repository error
    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    /// Every create sleeps for `delay` before storing
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Highest number of creates observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of create attempts, failed ones included
    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<Bookmark> {
        self.bookmarks.lock().expect("poisoned").clone()
    }

    fn check(&self, bookmark: &Bookmark) -> Result<(), DomainError> {
        if self.failing_urls.contains(&bookmark.url) {
            return Err(DomainError::RepositoryError(format!(
                "simulated storage failure for {}",
                bookmark.url
            )));
        }
        Ok(())
    }

    fn store(&self, bookmark: &mut Bookmark) {
        let mut bookmarks = self.bookmarks.lock().expect("poisoned");
        bookmark.set_id(bookmarks.len() as i32 + 1);
        bookmarks.push(bookmark.clone());
    }
}

impl BookmarkRepository for InMemoryBookmarkRepository {
    fn get_by_id(&self, id: i32) -> Result<Option<Bookmark>, DomainError> {
        Ok(self.stored().into_iter().find(|b| b.id == Some(id)))
    }

    fn get_all(&self) -> Result<Vec<Bookmark>, DomainError> {
        Ok(self.stored())
    }

    fn get_by_user(&self, user_id: i32) -> Result<Vec<Bookmark>, DomainError> {
        Ok(self
            .stored()
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .collect())
    }

    fn get_by_category(&self, category: &str) -> Result<Vec<Bookmark>, DomainError> {
        Ok(self
            .stored()
            .into_iter()
            .filter(|b| b.category == category)
            .collect())
    }

    fn get_categories(&self) -> Result<Vec<String>, DomainError> {
        let categories: BTreeSet<String> =
            self.stored().into_iter().map(|b| b.category).collect();
        Ok(categories.into_iter().collect())
    }

    fn add(&self, bookmark: &mut Bookmark) -> Result<(), DomainError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let result = self.check(bookmark).map(|_| self.store(bookmark));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn add_all(&self, bookmarks: &mut [Bookmark]) -> Result<usize, DomainError> {
        self.add_calls.fetch_add(bookmarks.len(), Ordering::SeqCst);
        bookmarks.iter().try_for_each(|b| self.check(b))?;
        bookmarks.iter_mut().for_each(|b| self.store(b));
        Ok(bookmarks.len())
    }

    fn count(&self) -> Result<usize, DomainError> {
        Ok(self.stored().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bookmark::BookmarkBuilder;

    fn bookmark(url: &str) -> Bookmark {
        BookmarkBuilder::default()
            .user_id(1)
            .category("c")
            .title("t")
            .url(url)
            .build()
            .unwrap()
    }

    #[test]
    fn test_setup_test_db() {
        let (repo, dir) = setup_test_db();
        assert!(repo.get_connection().is_ok());
        assert!(dir.path().join("linkbox_test.db").exists());
    }

    #[test]
    fn test_in_memory_add_all_is_all_or_nothing() {
        let repo = InMemoryBookmarkRepository::new().failing_on("http://bad");
        let mut batch = vec![bookmark("http://good"), bookmark("http://bad")];

        assert!(repo.add_all(&mut batch).is_err());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_in_memory_add_assigns_sequential_ids() {
        let repo = InMemoryBookmarkRepository::new();
        let mut first = bookmark("http://1");
        let mut second = bookmark("http://2");
        repo.add(&mut first).unwrap();
        repo.add(&mut second).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.max_in_flight(), 1);
    }
}
