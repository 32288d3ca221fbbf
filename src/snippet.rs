//! Snippet records as stored by the management UI
//!
//! The engine never creates or deletes snippets. It reads the whole set and
//! writes back a single field, `lastUsed`, after a successful insertion.
//!
//! Timestamps are Unix epoch milliseconds, the unit the extension's storage
//! has always used.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A stored snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Opaque identifier, stable across renames
    pub id: String,
    /// Display and match key
    pub title: String,
    /// Raw body, may contain `{{placeholder}}` tokens
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<i64>,
}

impl Snippet {
    /// Create a snippet with a fresh id and `createdAt`/`updatedAt` set to now.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            is_favorite: false,
            created_at: Some(now),
            updated_at: Some(now),
            last_used: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    pub fn updated(mut self, updated_at: i64) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn used(mut self, last_used: i64) -> Self {
        self.last_used = Some(last_used);
        self
    }

    /// Key for "recently edited" ordering. Records written before `updatedAt`
    /// existed sort as oldest.
    pub fn edit_recency(&self) -> i64 {
        self.updated_at.unwrap_or(0)
    }

    /// `lastUsed` if it is a real timestamp. Zero is how the storage format
    /// spelled "never" in older records.
    pub fn usage_time(&self) -> Option<i64> {
        self.last_used.filter(|t| *t > 0)
    }

    /// Case-insensitive substring match against the title or any tag.
    /// `query_lower` must already be lowercase.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.title.to_lowercase().contains(query_lower)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(query_lower))
    }
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
