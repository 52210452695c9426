//! Tags of a user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use serde_json::{json, Value};

use super::AppState;
use crate::auth::Auth;
use crate::db::{UserQueries, UserTagQueries};
use crate::error::{AppError, AppResult};
use crate::jsonapi::{Document, JsonApi, Links};
use crate::models::UserTag;
use crate::validation::{
    merge, validate_new_user_tag, validate_tagname, validate_user_tag_patch, validate_username,
};

fn user_tag_resource(links: &Links, user_tag: &UserTag) -> Value {
    json!({
        "type": "tags",
        "id": user_tag.tagname,
        "links": {
            "self": links.user_tag_relationship(&user_tag.username, &user_tag.tagname),
            "related": links.user_tag(&user_tag.username, &user_tag.tagname),
        },
        "meta": {
            "story": user_tag.story,
            "relevance": user_tag.relevance,
            "created": user_tag.created.timestamp_millis(),
        },
    })
}

fn user_tag_document(links: &Links, user_tag: &UserTag) -> Value {
    json!({
        "data": user_tag_resource(links, user_tag),
        "links": {
            "self": links.user_tag_relationship(&user_tag.username, &user_tag.tagname),
            "related": links.user_tag(&user_tag.username, &user_tag.tagname),
        },
        "meta": {
            "story": user_tag.story,
            "relevance": user_tag.relevance,
            "created": user_tag.created.timestamp_millis(),
        },
    })
}

fn validate_params(username: &str, tagname: &str) -> AppResult<()> {
    merge([validate_username(username), validate_tagname(tagname)])?;
    Ok(())
}

/// GET /users/{username}/tags
pub(super) async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(username): Path<String>,
) -> AppResult<Document> {
    auth.require_logged()?;
    validate_username(&username)?;

    let user_tags = state.db.call(|conn| {
        if UserQueries::exists(conn, &username)? {
            UserTagQueries::list_for_user(conn, &username).map(Some)
        } else {
            Ok(None)
        }
    })?;
    let user_tags = user_tags.ok_or(AppError::NotFound("user"))?;

    let data: Vec<Value> = user_tags
        .iter()
        .map(|user_tag| user_tag_resource(&state.links, user_tag))
        .collect();
    Ok(Document::ok(json!({
        "data": data,
        "links": { "self": state.links.to(&["users", &username, "tags"]) },
    })))
}

/// POST /users/{username}/tags
pub(super) async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(username): Path<String>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    if !auth.is_logged_as(&username) {
        return Err(AppError::Forbidden("you can only add tags to yourself"));
    }
    let fields = body.into_fields("user-tags")?;
    let input = validate_new_user_tag(&fields)?;

    let user_tag = state.db.call(|conn| {
        UserTagQueries::insert(
            conn,
            &username,
            &input.tagname,
            &input.story,
            input.relevance,
        )
    })?;
    tracing::info!(%username, tagname = %user_tag.tagname, "tag added to user");

    let location = state.links.user_tag(&username, &user_tag.tagname);
    Ok(Document::created(
        user_tag_document(&state.links, &user_tag),
        location,
    ))
}

/// GET /users/{username}/tags/{tagname}
pub(super) async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path((username, tagname)): Path<(String, String)>,
) -> AppResult<Document> {
    auth.require_logged()?;
    validate_params(&username, &tagname)?;

    let user_tag = state
        .db
        .call(|conn| UserTagQueries::get(conn, &username, &tagname))?
        .ok_or(AppError::NotFound("user tag"))?;
    Ok(Document::ok(user_tag_document(&state.links, &user_tag)))
}

/// PATCH /users/{username}/tags/{tagname}
pub(super) async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path((username, tagname)): Path<(String, String)>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    if !auth.is_logged_as(&username) {
        return Err(AppError::Forbidden("you can only update your own tags"));
    }
    validate_params(&username, &tagname)?;
    let fields = body.into_fields("user-tags")?;
    let patch = validate_user_tag_patch(&fields, &username, &tagname)?;

    let user_tag = state
        .db
        .call(|conn| {
            UserTagQueries::update(
                conn,
                &username,
                &tagname,
                patch.story.as_deref(),
                patch.relevance,
            )
        })?
        .ok_or(AppError::NotFound("user tag"))?;
    tracing::info!(%username, %tagname, "user tag updated");

    Ok(Document::ok(user_tag_document(&state.links, &user_tag)))
}

/// DELETE /users/{username}/tags/{tagname}
pub(super) async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path((username, tagname)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    if !auth.is_logged_as(&username) {
        return Err(AppError::Forbidden("you can only remove your own tags"));
    }
    validate_params(&username, &tagname)?;

    if !state
        .db
        .call(|conn| UserTagQueries::delete(conn, &username, &tagname))?
    {
        return Err(AppError::NotFound("user tag"));
    }
    tracing::info!(%username, %tagname, "tag removed from user");
    Ok(StatusCode::NO_CONTENT)
}
