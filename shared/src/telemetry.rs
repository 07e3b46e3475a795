//! Anonymous session telemetry and aggregate content stats.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::Collection;

/// What a visitor did with a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionActionKind {
    /// Opened the detail page.
    View,
    /// Liked the item.
    Like,
    /// Shared the item.
    Share,
}

impl SessionActionKind {
    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionActionKind::View => "view",
            SessionActionKind::Like => "like",
            SessionActionKind::Share => "share",
        }
    }
}

impl fmt::Display for SessionActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a session action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown session action `{0}` (expected view, like or share)")]
pub struct UnknownSessionActionKind(pub String);

impl FromStr for SessionActionKind {
    type Err = UnknownSessionActionKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(SessionActionKind::View),
            "like" => Ok(SessionActionKind::Like),
            "share" => Ok(SessionActionKind::Share),
            _ => Err(UnknownSessionActionKind(value.to_string())),
        }
    }
}

/// A telemetry event before it is stamped for sending.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAction {
    /// Action type.
    pub kind: SessionActionKind,
    /// Collection the content belongs to.
    pub content_type: Collection,
    /// Content identifier within the collection.
    pub content_id: u64,
    /// Free-form extra fields.
    pub metadata: Option<Map<String, Value>>,
}

impl SessionAction {
    /// An action without metadata.
    pub fn new(kind: SessionActionKind, content_type: Collection, content_id: u64) -> Self {
        Self {
            kind,
            content_type,
            content_id,
            metadata: None,
        }
    }

    /// Attach metadata to the action.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Stamp the action for sending under `session_id`.
    pub fn into_record(self, session_id: &str, timestamp: DateTime<Utc>) -> SessionActionRecord {
        SessionActionRecord {
            session_id: session_id.to_string(),
            action: self.kind,
            content_type: self.content_type,
            content_id: self.content_id,
            metadata: self.metadata,
            timestamp,
        }
    }
}

/// The `data` record posted to `/user-sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionActionRecord {
    /// Opaque client-generated session id.
    pub session_id: String,
    /// Action type.
    pub action: SessionActionKind,
    /// Collection the content belongs to.
    pub content_type: Collection,
    /// Content identifier.
    pub content_id: u64,
    /// Free-form extra fields, omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Send time.
    pub timestamp: DateTime<Utc>,
}

/// Site-wide counters served by `/content-stats`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    /// Views across all content.
    pub total_views: u64,
    /// Number of published items.
    pub total_content: u64,
    /// Recently active sessions.
    pub active_users: u64,
    /// Mean rating across rated items.
    pub average_rating: f64,
}

impl ContentStats {
    /// Figures shown when the stats endpoint is unavailable.
    pub const FALLBACK: ContentStats = ContentStats {
        total_views: 2458,
        total_content: 347,
        active_users: 89,
        average_rating: 4.7,
    };
}
