// src/application/services/import_service_impl.rs
use std::sync::Arc;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::import_service::ImportService;
use crate::domain::bookmark::{Bookmark, BookmarkCandidate};
use crate::domain::caller::CallerId;
use crate::domain::import::{self, ImportPolicy, ImportSummary};
use crate::domain::repositories::repository::BookmarkRepository;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct ImportServiceImpl<R: BookmarkRepository> {
    repository: Arc<R>,
    policy: ImportPolicy,
    max_concurrency: usize,
}

impl<R: BookmarkRepository + 'static> ImportServiceImpl<R> {
    pub fn new(repository: Arc<R>, policy: ImportPolicy, max_concurrency: usize) -> Self {
        Self {
            repository,
            policy,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Whole batch in one storage transaction
    async fn persist_atomic(&self, bookmarks: Vec<Bookmark>) -> ApplicationResult<ImportSummary> {
        let repository = self.repository.clone();
        let count = tokio::task::spawn_blocking(move || {
            let mut bookmarks = bookmarks;
            repository.add_all(&mut bookmarks)
        })
        .await??;

        Ok(ImportSummary { count })
    }

    /// One create per record, at most `max_concurrency` in flight.
    ///
    /// Nothing is cancelled on failure: every create settles, then the
    /// failure of the earliest record in submission order is returned.
    async fn persist_independent(
        &self,
        bookmarks: Vec<Bookmark>,
    ) -> ApplicationResult<ImportSummary> {
        let total = bookmarks.len();
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, mut bookmark) in bookmarks.into_iter().enumerate() {
            let permit = permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| ApplicationError::Other(format!("Import limiter closed: {}", e)))?;
            let repository = self.repository.clone();
            tasks.spawn_blocking(move || {
                let result = repository.add(&mut bookmark);
                drop(permit);
                (index, result)
            });
        }

        let mut written = 0;
        let mut first_failure: Option<(usize, ApplicationError)> = None;
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = match joined {
                Ok((index, result)) => (index, result.map_err(ApplicationError::from)),
                Err(e) => (usize::MAX, Err(ApplicationError::from(e))),
            };
            match result {
                Ok(()) => written += 1,
                Err(e) => {
                    debug!("Record {} failed: {}", index, e);
                    let earlier = match &first_failure {
                        Some((first, _)) => index < *first,
                        None => true,
                    };
                    if earlier {
                        first_failure = Some((index, e));
                    }
                }
            }
        }

        match first_failure {
            None => Ok(ImportSummary { count: written }),
            Some((index, err)) => {
                warn!(
                    "Import failed at record {} of {}; {} records were written and remain stored",
                    index, total, written
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl<R: BookmarkRepository + 'static> ImportService for ImportServiceImpl<R> {
    #[instrument(skip(self, payload), level = "debug", fields(caller = %caller))]
    async fn import_bookmarks(
        &self,
        caller: CallerId,
        payload: &Value,
    ) -> ApplicationResult<ImportSummary> {
        let candidates = import::parse_batch(payload)?;
        self.import_candidates(caller, candidates).await
    }

    #[instrument(skip(self, candidates), level = "debug",
               fields(caller = %caller, batch = candidates.len()))]
    async fn import_candidates(
        &self,
        caller: CallerId,
        candidates: Vec<BookmarkCandidate>,
    ) -> ApplicationResult<ImportSummary> {
        let bookmarks = import::prepare_batch(&candidates, caller)?;
        if bookmarks.is_empty() {
            return Ok(ImportSummary { count: 0 });
        }

        let summary = match self.policy {
            ImportPolicy::Atomic => self.persist_atomic(bookmarks).await?,
            ImportPolicy::Independent => self.persist_independent(bookmarks).await?,
        };
        info!("Imported {} bookmarks for user {}", summary.count, caller);
        Ok(summary)
    }

    fn policy(&self) -> ImportPolicy {
        self.policy
    }
}
