// src/application/services/import_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::bookmark::BookmarkCandidate;
use crate::domain::caller::CallerId;
use crate::domain::import::{ImportPolicy, ImportSummary};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// Batch import: validate a whole batch, then persist it under a policy
#[async_trait]
pub trait ImportService: Send + Sync + Debug {
    /// Import the raw `bookmarks` value of a request.
    ///
    /// Fails with `InvalidDataFormat` unless `payload` is an array and with
    /// `InvalidBookmarkData` if any element lacks a title or url. Neither
    /// failure creates anything.
    async fn import_bookmarks(
        &self,
        caller: CallerId,
        payload: &Value,
    ) -> ApplicationResult<ImportSummary>;

    /// Import already decoded candidates, same validation rules
    async fn import_candidates(
        &self,
        caller: CallerId,
        candidates: Vec<BookmarkCandidate>,
    ) -> ApplicationResult<ImportSummary>;

    /// Policy applied to validated batches
    fn policy(&self) -> ImportPolicy;
}
