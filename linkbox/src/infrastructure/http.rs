use crate::domain::bookmark::BookmarkCandidate;
use crate::domain::caller::CallerId;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::import::ImportSummary;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Header carrying the authenticated caller's id
pub const CALLER_HEADER: &str = "x-user-id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ImportRequest<'a> {
    bookmarks: &'a [BookmarkCandidate],
}

#[derive(Deserialize)]
struct ImportResponse {
    count: usize,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Submit a parsed batch to a running server as one import request
#[instrument(skip(candidates), fields(batch = candidates.len()))]
pub fn post_import(
    base_url: &str,
    caller: CallerId,
    candidates: &[BookmarkCandidate],
) -> DomainResult<ImportSummary> {
    let endpoint = format!("{}/api/bookmarks/import", base_url.trim_end_matches('/'));
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| DomainError::Other(format!("Failed to build HTTP client: {}", e)))?;

    let response = client
        .post(&endpoint)
        .header(CALLER_HEADER, caller.to_string())
        .json(&ImportRequest {
            bookmarks: candidates,
        })
        .send()
        .map_err(|e| DomainError::ServerUnavailable(format!("{}: {}", endpoint, e)))?;

    let status = response.status();
    debug!("Import response status: {}", status);

    if status.is_success() {
        let body: ImportResponse = response
            .json()
            .map_err(|e| DomainError::Other(format!("Unexpected import response: {}", e)))?;
        return Ok(ImportSummary { count: body.count });
    }

    let message = response
        .json::<ErrorResponse>()
        .map(|body| body.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
    Err(DomainError::Other(format!(
        "Server rejected import ({}): {}",
        status.as_u16(),
        message
    )))
}
