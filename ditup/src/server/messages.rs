//! Messages between users.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{AppState, QueryParams};
use crate::auth::Auth;
use crate::db::MessageQueries;
use crate::error::{AppError, AppResult};
use crate::jsonapi::{resource, Document, JsonApi, Links};
use crate::models::Message;
use crate::validation::{
    validate_message_patch, validate_new_message, validate_username, ValidationError,
};

fn message_resource(links: &Links, message: &Message) -> Value {
    let id = message.id.to_string();
    let mut data = resource(
        "messages",
        &id,
        json!({
            "body": message.body,
            "read": message.read,
            "created": message.created.timestamp_millis(),
        }),
    );
    data["links"] = json!({ "self": links.message(&id) });
    data["relationships"] = json!({
        "from": { "data": { "type": "users", "id": message.from } },
        "to": { "data": { "type": "users", "id": message.to } },
    });
    data
}

fn messages_document(links: &Links, messages: &[Message]) -> Document {
    let data: Vec<Value> = messages
        .iter()
        .map(|message| message_resource(links, message))
        .collect();
    Document::ok(json!({ "data": data }))
}

/// POST /messages
pub(super) async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    let me = auth.require_logged()?;
    let fields = body.into_fields("messages")?;
    let input = validate_new_message(&fields, me)?;

    let message = Message::new(me.to_string(), input.to, input.body);
    state.db.call(|conn| MessageQueries::insert(conn, &message))?;
    tracing::info!(id = %message.id, from = %message.from, to = %message.to, "message sent");

    let location = state.links.message(&message.id.to_string());
    let body = json!({
        "data": message_resource(&state.links, &message),
        "links": { "self": location },
    });
    Ok(Document::created(body, location))
}

/// GET /messages with `filter[with]=username` or `filter[threads]`.
pub(super) async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Query(params): Query<QueryParams>,
) -> AppResult<Document> {
    let me = auth.require_logged()?;

    if let Some(other) = params.get("filter[with]") {
        validate_username(other)?;
        let thread = state
            .db
            .call(|conn| MessageQueries::thread(conn, me, other))?;
        return Ok(messages_document(&state.links, &thread));
    }

    if params.contains_key("filter[threads]") {
        let threads = state
            .db
            .call(|conn| MessageQueries::last_of_threads(conn, me))?;
        return Ok(messages_document(&state.links, &threads));
    }

    Err(AppError::BadRequest(
        "use filter[with] or filter[threads] to list messages".into(),
    ))
}

/// PATCH /messages/{id}
///
/// Marks the message and every earlier unread message of the same thread
/// direction as read.
pub(super) async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    JsonApi(body): JsonApi,
) -> AppResult<StatusCode> {
    let me = auth.require_logged()?;
    let fields = body.into_fields("messages")?;
    validate_message_patch(&fields, &id)?;
    let uuid = Uuid::parse_str(&id).map_err(|_| {
        AppError::Validation(vec![ValidationError::new(
            "id",
            "invalid message id",
            Value::String(id.clone()),
        )])
    })?;

    let message = state
        .db
        .call(|conn| MessageQueries::get(conn, &uuid))?
        .ok_or(AppError::NotFound("message"))?;
    if message.to != me {
        return Err(AppError::Forbidden("only the receiver can mark a message read"));
    }

    let updated = state
        .db
        .call(|conn| MessageQueries::mark_read_up_to(conn, &message))?;
    tracing::info!(id = %uuid, reader = %me, updated, "messages marked read");
    Ok(StatusCode::NO_CONTENT)
}
