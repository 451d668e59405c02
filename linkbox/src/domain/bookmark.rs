// linkbox/src/domain/bookmark.rs
use crate::domain::caller::CallerId;
use crate::domain::error::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Category assigned to records that arrive without one
pub const DEFAULT_CATEGORY: &str = "Default Category";

/// Candidate record as produced by the import parser or sent by a client.
///
/// Nothing is validated at this stage; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_browser: Option<String>,
}

impl BookmarkCandidate {
    /// Lenient decoding of one client supplied element.
    ///
    /// A non-object element yields an empty candidate and a non-string field
    /// counts as absent, so both end up failing validation instead of
    /// failing deserialization.
    pub fn from_json(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            category: field("category"),
            title: field("title"),
            url: field("url"),
            username: field("username"),
            default_browser: field("defaultBrowser"),
        }
    }

    /// Both required fields present and non-empty
    pub fn is_complete(&self) -> bool {
        non_empty(&self.title).is_some() && non_empty(&self.url).is_some()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Represents a persisted bookmark
#[derive(Builder, Clone, Debug, PartialEq, Serialize)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[builder(default)]
    pub id: Option<i32>,
    pub user_id: i32,
    pub category: String,
    pub title: String,
    pub url: String,
    #[builder(default)]
    pub username: String,
    #[builder(default)]
    pub default_browser: String,
    #[builder(default = "Utc::now()")]
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    /// Validate a candidate and fill defaults for its optional fields.
    ///
    /// Empty strings are treated like missing values.
    pub fn from_candidate(candidate: &BookmarkCandidate, caller: CallerId) -> DomainResult<Self> {
        let title = non_empty(&candidate.title).ok_or(DomainError::InvalidBookmarkData)?;
        let url = non_empty(&candidate.url).ok_or(DomainError::InvalidBookmarkData)?;

        let bookmark = BookmarkBuilder::default()
            .user_id(caller.value())
            .category(non_empty(&candidate.category).unwrap_or(DEFAULT_CATEGORY))
            .title(title)
            .url(url)
            .username(non_empty(&candidate.username).unwrap_or_default())
            .default_browser(non_empty(&candidate.default_browser).unwrap_or_default())
            .build()?;
        Ok(bookmark)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: i32,
        user_id: i32,
        category: String,
        title: String,
        url: String,
        username: String,
        default_browser: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            user_id,
            category,
            title,
            url,
            username,
            default_browser,
            created_at,
        }
    }

    /// Set the ID (typically used after storage)
    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {} <{}>",
            self.id.map_or("-".to_string(), |id| id.to_string()),
            self.category,
            self.title,
            self.url
        )
    }
}
