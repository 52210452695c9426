//! Contacts: trust edges between users.
//!
//! A request creates an unconfirmed edge `from -> to`. The receiver confirms
//! it with `PATCH /users/{receiver}/contacts/{requester}`, which adds the
//! reverse edge and marks both confirmed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
};
use serde_json::{json, Value};

use super::{AppState, QueryParams};
use crate::auth::Auth;
use crate::db::{ContactQueries, UserQueries};
use crate::error::{AppError, AppResult};
use crate::jsonapi::{resource, Document, JsonApi, Links};
use crate::models::Contact;
use crate::validation::{
    validate_contact_confirmation, validate_contact_params, validate_contact_update,
    validate_new_contact, validate_username,
};

/// How much of an edge a viewer may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Full,
    /// The receiver of a pending request sees the note, not the trust.
    Receiver,
}

fn contact_resource(links: &Links, contact: &Contact, visibility: Visibility) -> Value {
    let mut attributes = json!({
        "isConfirmed": contact.is_confirmed,
        "created": contact.created.timestamp_millis(),
    });
    if visibility == Visibility::Full {
        attributes["trust"] = json!(contact.trust);
        attributes["reference"] = json!(contact.reference);
    }
    if let Some(confirmed) = contact.confirmed {
        attributes["confirmed"] = json!(confirmed.timestamp_millis());
    }
    if let Some(message) = &contact.message {
        attributes["message"] = json!(message);
    }

    let mut data = resource("contacts", &contact.document_id(), attributes);
    data["links"] = json!({ "self": links.contact(&contact.from, &contact.to) });
    data["relationships"] = json!({
        "from": { "data": { "type": "users", "id": contact.from } },
        "to": { "data": { "type": "users", "id": contact.to } },
    });
    data
}

fn contacts_document(links: &Links, contacts: &[Contact], visibility: Visibility) -> Document {
    let data: Vec<Value> = contacts
        .iter()
        .map(|contact| contact_resource(links, contact, visibility))
        .collect();
    Document::ok(json!({ "data": data }))
}

/// POST /contacts
pub(super) async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    let me = auth.require_logged()?;
    let fields = body.into_fields("contacts")?;
    let input = validate_new_contact(&fields, me)?;

    let contact = state.db.call(|conn| {
        ContactQueries::insert_request(
            conn,
            me,
            &input.to,
            input.trust,
            &input.reference,
            &input.message,
        )
    })?;
    tracing::info!(from = %me, to = %input.to, "contact requested");

    let location = state.links.contact(&contact.from, &contact.to);
    let body = json!({
        "data": contact_resource(&state.links, &contact, Visibility::Full),
        "links": { "self": location },
    });
    Ok(Document::created(body, location))
}

/// GET /users/{username}/contacts/{to}
pub(super) async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path((from, to)): Path<(String, String)>,
) -> AppResult<Document> {
    let me = auth.require_logged()?;
    validate_contact_params(&from, &to)?;

    let contact = state
        .db
        .call(|conn| ContactQueries::get(conn, &from, &to))?
        .ok_or(AppError::NotFound("contact"))?;

    let visibility = if contact.is_confirmed || me == contact.from {
        Visibility::Full
    } else if me == contact.to {
        Visibility::Receiver
    } else {
        return Err(AppError::NotFound("contact"));
    };

    Ok(Document::ok(json!({
        "data": contact_resource(&state.links, &contact, visibility),
        "links": { "self": state.links.contact(&from, &to) },
    })))
}

/// PATCH /users/{username}/contacts/{to}
///
/// With `isConfirmed`, confirms the pending request `to -> username`.
/// Otherwise updates trust and reference of the edge `username -> to`.
pub(super) async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path((from, to)): Path<(String, String)>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    if !auth.is_logged_as(&from) {
        return Err(AppError::Forbidden("you can only update your own contacts"));
    }
    validate_contact_params(&from, &to)?;
    let fields = body.into_fields("contacts")?;

    let contact = if fields.contains_key("isConfirmed") {
        let confirmation = validate_contact_confirmation(&fields, &from, &to)?;
        let contact = state
            .db
            .call(|conn| {
                ContactQueries::confirm(
                    conn,
                    &from,
                    &to,
                    confirmation.trust,
                    &confirmation.reference,
                )
            })?
            .ok_or(AppError::NotFound("contact request"))?;
        tracing::info!(%from, %to, "contact confirmed");
        contact
    } else {
        let update = validate_contact_update(&fields, &from, &to)?;
        let contact = state
            .db
            .call(|conn| {
                ContactQueries::update(conn, &from, &to, update.trust, update.reference.as_deref())
            })?
            .ok_or(AppError::NotFound("contact"))?;
        tracing::info!(%from, %to, "contact updated");
        contact
    };

    Ok(Document::ok(json!({
        "data": contact_resource(&state.links, &contact, Visibility::Full),
        "links": { "self": state.links.contact(&from, &to) },
    })))
}

/// DELETE /users/{username}/contacts/{to}
pub(super) async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path((from, to)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let me = auth.require_logged()?;
    if me != from && me != to {
        return Err(AppError::Forbidden("you can only remove your own contacts"));
    }
    validate_contact_params(&from, &to)?;

    if !state.db.call(|conn| ContactQueries::delete(conn, &from, &to))? {
        return Err(AppError::NotFound("contact"));
    }
    tracing::info!(%from, %to, "contact removed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{username}/contacts, optionally with `filter[unconfirmed]`.
pub(super) async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(username): Path<String>,
    Query(params): Query<QueryParams>,
) -> AppResult<Document> {
    let me = auth.require_logged()?;
    validate_username(&username)?;

    if params.contains_key("filter[unconfirmed]") {
        if me != username {
            return Err(AppError::Forbidden(
                "you can only see contact requests sent to you",
            ));
        }
        let pending = state
            .db
            .call(|conn| ContactQueries::list_pending_for(conn, &username))?;
        return Ok(contacts_document(&state.links, &pending, Visibility::Receiver));
    }

    let contacts = state.db.call(|conn| {
        if UserQueries::exists(conn, &username)? {
            ContactQueries::list_confirmed(conn, &username).map(Some)
        } else {
            Ok(None)
        }
    })?;
    let contacts = contacts.ok_or(AppError::NotFound("user"))?;
    Ok(contacts_document(&state.links, &contacts, Visibility::Full))
}
