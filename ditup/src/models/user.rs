//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique username.
    pub username: String,
    /// Verified email address.
    pub email: Option<String>,
    /// Email address waiting for verification.
    pub email_temporary: Option<String>,
    /// Whether the user verified an email address.
    pub email_verified: bool,
    /// Profile: given name.
    pub given_name: String,
    /// Profile: family name.
    pub family_name: String,
    /// Profile: free text about the user.
    pub description: String,
    /// When the user signed up.
    pub created: DateTime<Utc>,
}

/// Data needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub email_verification_code_hash: String,
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub description: Option<String>,
}

impl ProfilePatch {
    /// Whether the patch changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.given_name.is_none() && self.family_name.is_none() && self.description.is_none()
    }
}

/// A user found by a graph query, with its accumulated relevance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedUser {
    pub username: String,
    pub relevance: f64,
    /// Tags which contributed to the relevance.
    pub tags: Vec<String>,
}
