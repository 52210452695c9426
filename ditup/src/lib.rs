//! ditup - server for a network of people connected by trust and shared tags.
//!
//! Users describe themselves with tags, connect with contacts carrying a
//! trust level, and exchange messages. Tags are recommended by walking the
//! user-tag graph.
//!
//! Architecture:
//! - `server` routes JSON:API requests through `validation` to `db`
//! - `db` keeps the graph in SQLite; `db::GraphQueries` does the traversals
//! - `auth` resolves HTTP Basic credentials for every request
//! - `mailer` sends email verification links

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod jobs;
pub mod jsonapi;
pub mod logging;
pub mod mailer;
pub mod models;
pub mod server;
pub mod validation;
