//! Storage for the trust graph, backed by `SQLite`.
//!
//! Users and tags are vertices; user-tag, contact and message rows are the
//! edges between them. Traversals live in [`graph`].

mod connection;
mod graph;
mod queries;

use thiserror::Error;

pub use connection::Database;
pub use graph::GraphQueries;
pub use queries::{
    ContactQueries, Credentials, MessageQueries, PendingVerification, TagQueries, UserQueries,
    UserTagQueries,
};

#[cfg(test)]
pub(crate) use queries::tests::add_user;

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid value stored in {column}: {value}")]
    Corrupt { column: &'static str, value: String },

    #[error("failed to prepare database directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("database lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;
