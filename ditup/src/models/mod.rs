//! Data models for ditup entities.

mod contact;
mod message;
mod tag;
mod user;
mod user_tag;

pub use contact::{Contact, TrustLevel};
pub use message::Message;
pub use tag::{RelatedTag, Tag};
pub use user::{NewUser, ProfilePatch, RankedUser, User};
pub use user_tag::{UserTag, DEFAULT_RELEVANCE};
