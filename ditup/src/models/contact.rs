//! Contact model: a trust edge between two users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Strength of trust attached to a contact edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TrustLevel {
    /// Met once, knows nothing much.
    Stranger,
    /// Knows the person a little.
    Acquaintance,
    /// Knows the person well.
    Friend,
    /// Would vouch for the person.
    Family,
}

impl TrustLevel {
    /// All accepted levels, in ascending order.
    pub const ALL: [Self; 4] = [Self::Stranger, Self::Acquaintance, Self::Friend, Self::Family];

    /// Numeric value used on the wire and in the database.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Stranger => 1,
            Self::Acquaintance => 2,
            Self::Friend => 4,
            Self::Family => 8,
        }
    }

    /// Parse a level from its numeric value.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Stranger),
            2 => Some(Self::Acquaintance),
            4 => Some(Self::Friend),
            8 => Some(Self::Family),
            _ => None,
        }
    }

    /// Parse a level from a database integer.
    pub fn from_i64(value: i64) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::from_u8)
    }
}

impl From<TrustLevel> for u8 {
    fn from(level: TrustLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for TrustLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or_else(|| format!("invalid trust level: {value}"))
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A directed contact edge `from -> to`.
///
/// A confirmed contact consists of two edges, one per direction, each
/// carrying the trust and reference its author gave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Username of the edge author.
    pub from: String,
    /// Username of the other party.
    pub to: String,
    /// Trust the author places in the other party.
    pub trust: TrustLevel,
    /// Public reference written by the author.
    pub reference: String,
    /// Note sent along with the request; cleared on confirmation.
    pub message: Option<String>,
    /// Whether the other party confirmed the contact.
    pub is_confirmed: bool,
    /// When the edge was created.
    pub created: DateTime<Utc>,
    /// When the contact was confirmed.
    pub confirmed: Option<DateTime<Utc>>,
}

impl Contact {
    /// JSON:API identifier of the edge.
    pub fn document_id(&self) -> String {
        format!("{}--{}", self.from, self.to)
    }
}
