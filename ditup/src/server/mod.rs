//! HTTP API server.
//!
//! Endpoints (all bodies are JSON:API documents):
//! - POST /users, GET /users?filter[tag]=..|filter[withMyTags]
//! - GET|PATCH|DELETE /users/{username}, PATCH /users/{username}/account
//! - GET|POST /users/{username}/tags, GET|PATCH|DELETE /users/{username}/tags/{tagname}
//! - POST /tags, GET /tags?filter[..], GET /tags/{tagname}
//! - POST /contacts, GET /users/{username}/contacts
//! - GET|PATCH|DELETE /users/{username}/contacts/{to}
//! - POST /messages, GET /messages?filter[..], PATCH /messages/{id}

mod contacts;
mod messages;
mod tags;
mod user_tags;
mod users;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::db::Database;
use crate::jsonapi::Links;
use crate::mailer::Mailer;
use crate::validation::ValidationError;

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
    pub links: Links,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        let links = Links::new(config.url.base());
        Self {
            db,
            config: Arc::new(config),
            mailer,
            links,
        }
    }
}

/// Query string as a flat map, e.g. `filter[tag]` -> `a,b`.
pub(crate) type QueryParams = HashMap<String, String>;

/// Parse `page[limit]`, defaulting to `default`.
pub(crate) fn page_limit(params: &QueryParams, default: usize) -> AppResult<usize> {
    match params.get("page[limit]") {
        None => Ok(default),
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|limit| (1..=100).contains(limit))
            .ok_or_else(|| {
                AppError::Validation(vec![ValidationError::new(
                    "page[limit]",
                    "limit must be an integer between 1 and 100",
                    Value::String(raw.clone()),
                )])
            }),
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(users::create).get(users::list))
        .route(
            "/users/{username}",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route("/users/{username}/account", patch(users::verify_email))
        .route(
            "/users/{username}/tags",
            get(user_tags::list).post(user_tags::create),
        )
        .route(
            "/users/{username}/tags/{tagname}",
            get(user_tags::get)
                .patch(user_tags::update)
                .delete(user_tags::delete),
        )
        .route("/users/{username}/contacts", get(contacts::list))
        .route(
            "/users/{username}/contacts/{to}",
            get(contacts::get)
                .patch(contacts::update)
                .delete(contacts::delete),
        )
        .route("/tags", post(tags::create).get(tags::list))
        .route("/tags/{tagname}", get(tags::get))
        .route("/contacts", post(contacts::create))
        .route("/messages", post(messages::create).get(messages::list))
        .route("/messages/{id}", patch(messages::update))
        .layer(middleware::from_fn_with_state(
            state.db.clone(),
            auth::authenticate,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until interrupted.
pub async fn start_server(state: AppState) -> Result<()> {
    let server = &state.config.server;
    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", server.host, server.port))?;

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "ditup server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
