//! User-tag edge model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default relevance when a user does not give one.
pub const DEFAULT_RELEVANCE: u8 = 3;

/// Edge between a user and a tag in their profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTag {
    /// Username of the tag owner.
    pub username: String,
    /// Name of the tag.
    pub tagname: String,
    /// Why the user has this tag.
    pub story: String,
    /// How much the tag matters to the user (1..=5).
    pub relevance: u8,
    /// When the edge was created.
    pub created: DateTime<Utc>,
}
