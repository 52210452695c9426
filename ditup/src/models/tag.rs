//! Tag model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A globally unique tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Unique tag name.
    pub tagname: String,
    /// Username of the creator (absent when the creator was deleted).
    pub creator: Option<String>,
    /// When the tag was created.
    pub created: DateTime<Utc>,
}

/// A tag found by a graph query, with its accumulated relevance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedTag {
    pub tagname: String,
    pub created: DateTime<Utc>,
    pub relevance: f64,
}
