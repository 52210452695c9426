//! Command implementations.

use std::time::Duration;

use anyhow::{Context, Result};

use super::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::db::{Database, GraphQueries, TagQueries, UserQueries};
use crate::server::{self, AppState};
use crate::{jobs, logging, mailer};

/// Execute the CLI command.
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(&cli.config_dir).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            cli.config_dir.display()
        )
    })?;
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }
    logging::init(config.log.format, cli.verbose)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::PruneTags => prune_tags(&config),
        Commands::RelatedTags { username, limit } => related_tags(&config, &username, limit),
        Commands::Stats => stats(&config),
    }
}

fn open_database(config: &AppConfig) -> Result<Database> {
    let path = config
        .database_path()
        .context("Could not determine database path; set database.path")?;
    Database::open_at(&path)
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

async fn serve(config: AppConfig) -> Result<()> {
    let db = open_database(&config)?;
    let mailer = mailer::from_config(&config.mailer);
    let pruning = jobs::spawn_tag_pruning(
        db.clone(),
        Duration::from_secs(config.jobs.prune_tags_interval_secs),
    );

    let result = server::start_server(AppState::new(db, config, mailer)).await;
    if let Some(pruning) = pruning {
        pruning.abort();
    }
    result
}

fn prune_tags(config: &AppConfig) -> Result<()> {
    let db = open_database(config)?;
    let deleted = jobs::prune_abandoned_tags(&db).context("Failed to delete abandoned tags")?;

    if deleted.is_empty() {
        println!("No abandoned tags.");
    } else {
        println!("Deleted {} abandoned tag(s):", deleted.len());
        for tagname in deleted {
            println!("  {tagname}");
        }
    }
    Ok(())
}

fn related_tags(config: &AppConfig, username: &str, limit: usize) -> Result<()> {
    let db = open_database(config)?;
    let tags = db
        .call(|conn| GraphQueries::related_tags_of_user(conn, username, limit))
        .with_context(|| format!("Failed to find tags related to {username}"))?;

    if tags.is_empty() {
        println!("No related tags found for {username}.");
        return Ok(());
    }

    println!("{:<40} {:>10}", "TAG", "RELEVANCE");
    println!("{}", "-".repeat(51));
    for tag in tags {
        println!("{:<40} {:>10.3}", tag.tagname, tag.relevance);
    }
    Ok(())
}

fn stats(config: &AppConfig) -> Result<()> {
    let db = open_database(config)?;
    let (users, tags) = db
        .call(|conn| Ok((UserQueries::count(conn)?, TagQueries::count(conn)?)))
        .context("Failed to count records")?;

    println!("users: {users}");
    println!("tags:  {tags}");
    Ok(())
}
