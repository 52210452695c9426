//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::db::GraphQueries;

/// ditup - a network of people who trust each other, built around shared tags
#[derive(Parser, Debug)]
#[command(name = "ditup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory with default.toml and {RUN_MODE}.toml
    #[arg(long, global = true, env = "DITUP_CONFIG_DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// Database file (overrides database.path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log at debug level, ignoring RUST_LOG
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Delete tags which no user has
    PruneTags,

    /// Show tags related to the tags of a user
    RelatedTags {
        /// Username to recommend tags for
        username: String,

        /// Maximum number of tags to show
        #[arg(short, long, default_value_t = GraphQueries::DEFAULT_RELATED_TAGS_LIMIT)]
        limit: usize,
    },

    /// Show counts of users and tags
    Stats,
}
