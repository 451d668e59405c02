// linkbox/src/domain/import.rs
//! Batch import rules: payload shape, all-or-nothing validation and the
//! persistence policies a validated batch can be written with.

use crate::domain::bookmark::{Bookmark, BookmarkCandidate};
use crate::domain::caller::CallerId;
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How a validated batch reaches storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// One transaction for the whole batch, any failure rolls everything back
    #[default]
    Atomic,
    /// One create per record, run concurrently; rows already written stay
    Independent,
}

impl FromStr for ImportPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atomic" => Ok(ImportPolicy::Atomic),
            "independent" => Ok(ImportPolicy::Independent),
            other => Err(DomainError::Other(format!(
                "Unknown import policy '{}', expected 'atomic' or 'independent'",
                other
            ))),
        }
    }
}

impl fmt::Display for ImportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportPolicy::Atomic => write!(f, "atomic"),
            ImportPolicy::Independent => write!(f, "independent"),
        }
    }
}

/// Outcome of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub count: usize,
}

/// Decode the `bookmarks` value of an import request.
///
/// Anything but an array is rejected; elements are decoded leniently.
pub fn parse_batch(value: &Value) -> DomainResult<Vec<BookmarkCandidate>> {
    let elements = value.as_array().ok_or(DomainError::InvalidDataFormat)?;
    Ok(elements.iter().map(BookmarkCandidate::from_json).collect())
}

/// One incomplete record rejects the whole batch
pub fn validate_batch(candidates: &[BookmarkCandidate]) -> DomainResult<()> {
    if candidates.iter().all(BookmarkCandidate::is_complete) {
        Ok(())
    } else {
        Err(DomainError::InvalidBookmarkData)
    }
}

/// Validate the batch, then turn every candidate into a bookmark owned by
/// `caller`. Input order is preserved.
pub fn prepare_batch(
    candidates: &[BookmarkCandidate],
    caller: CallerId,
) -> DomainResult<Vec<Bookmark>> {
    validate_batch(candidates)?;
    candidates
        .iter()
        .map(|candidate| Bookmark::from_candidate(candidate, caller))
        .collect()
}
