//! User accounts and profiles.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
};
use chrono::{TimeDelta, Utc};
use serde_json::{json, Value};

use super::{page_limit, AppState, QueryParams};
use crate::auth::{self, Auth};
use crate::db::{DbError, GraphQueries, UserQueries};
use crate::error::{AppError, AppResult};
use crate::jsonapi::{resource, Document, JsonApi, Links};
use crate::mailer::Mail;
use crate::models::{NewUser, RankedUser, User};
use crate::validation::{
    validate_email_verification, validate_new_user, validate_profile_patch, validate_tagname,
    validate_username, ValidationError,
};

/// How long an email verification code stays valid.
const EMAIL_VERIFICATION_TTL_HOURS: i64 = 2;

/// Serialize a user. `full` reveals the profile, `own` the email.
fn user_resource(links: &Links, user: &User, full: bool, own: bool) -> Value {
    let mut attributes = json!({ "username": user.username });
    if full {
        attributes["givenName"] = json!(user.given_name);
        attributes["familyName"] = json!(user.family_name);
        attributes["description"] = json!(user.description);
        attributes["created"] = json!(user.created.timestamp_millis());
    }
    if own {
        attributes["email"] = json!(user.email);
        attributes["emailVerified"] = json!(user.email_verified);
    }

    let mut data = resource("users", &user.username, attributes);
    data["links"] = json!({ "self": links.user(&user.username) });
    data
}

fn ranked_users_document(links: &Links, users: &[RankedUser]) -> Document {
    let data: Vec<Value> = users
        .iter()
        .map(|user| {
            let mut data = resource("users", &user.username, json!({ "username": user.username }));
            data["links"] = json!({ "self": links.user(&user.username) });
            data["meta"] = json!({ "relevance": user.relevance, "tags": user.tags });
            data
        })
        .collect();
    Document::ok(json!({ "data": data }))
}

/// POST /users
pub(super) async fn create(
    State(state): State<AppState>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    let fields = body.into_fields("users")?;
    let input = validate_new_user(&fields)?;

    let cost = state.config.auth.bcrypt_cost;
    let code = auth::verification_code();
    let new_user = NewUser {
        username: input.username,
        email: input.email,
        password_hash: auth::hash_password(input.password, cost).await?,
        email_verification_code_hash: auth::hash_password(code.clone(), cost).await?,
    };

    let user = state.db.call(|conn| {
        if UserQueries::email_taken(conn, &new_user.email)? {
            return Err(DbError::Conflict("email"));
        }
        UserQueries::insert(conn, &new_user)
    })?;
    tracing::info!(username = %user.username, "user created");

    let mail = Mail::email_verification(&state.config, &user.username, &new_user.email, &code);
    if let Err(err) = state.mailer.send(mail).await {
        tracing::warn!(username = %user.username, error = %err, "failed to send verification email");
    }

    let location = state.links.user(&user.username);
    let body = json!({
        "data": user_resource(&state.links, &user, false, false),
        "links": { "self": location },
    });
    Ok(Document::created(body, location))
}

/// GET /users/{username}
pub(super) async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(username): Path<String>,
) -> AppResult<Document> {
    validate_username(&username)?;
    let user = state
        .db
        .call(|conn| UserQueries::get(conn, &username))?
        .ok_or(AppError::NotFound("user"))?;

    let own = auth.is(&username);
    let full = own || auth.logged_user().is_some();
    Ok(Document::ok(json!({
        "data": user_resource(&state.links, &user, full, own),
        "links": { "self": state.links.user(&username) },
    })))
}

/// PATCH /users/{username}
pub(super) async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(username): Path<String>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    if !auth.is_logged_as(&username) {
        return Err(AppError::Forbidden("you can only update your own profile"));
    }
    let fields = body.into_fields("users")?;
    let patch = validate_profile_patch(&fields, &username)?;

    let user = state
        .db
        .call(|conn| UserQueries::update_profile(conn, &username, &patch))?
        .ok_or(AppError::NotFound("user"))?;
    tracing::info!(%username, "profile updated");

    Ok(Document::ok(json!({
        "data": user_resource(&state.links, &user, true, true),
        "links": { "self": state.links.user(&username) },
    })))
}

/// PATCH /users/{username}/account
pub(super) async fn verify_email(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    validate_username(&username)?;
    let fields = body.into_fields("users")?;
    let code = validate_email_verification(&fields, &username)?;

    let (exists, pending) = state.db.call(|conn| {
        Ok((
            UserQueries::exists(conn, &username)?,
            UserQueries::pending_verification(conn, &username)?,
        ))
    })?;
    if !exists {
        return Err(AppError::NotFound("user"));
    }
    let invalid_code = || {
        AppError::Validation(vec![ValidationError::new(
            "emailVerificationCode",
            "wrong or expired code",
            Value::String(code.clone()),
        )])
    };
    let Some(pending) = pending else {
        return Err(invalid_code());
    };

    if Utc::now() - pending.created > TimeDelta::hours(EMAIL_VERIFICATION_TTL_HOURS) {
        tracing::debug!(%username, "email verification code expired");
        return Err(invalid_code());
    }
    if !auth::verify_password(code.clone(), pending.code_hash).await? {
        return Err(invalid_code());
    }

    let user = state
        .db
        .call(|conn| {
            if UserQueries::email_taken(conn, &pending.email_temporary)? {
                return Err(DbError::Conflict("email"));
            }
            UserQueries::finish_email_verification(conn, &username)
        })?
        .ok_or(AppError::NotFound("user"))?;
    tracing::info!(%username, "email verified");

    Ok(Document::ok(json!({
        "data": user_resource(&state.links, &user, true, true),
        "links": { "self": state.links.user(&username) },
    })))
}

/// DELETE /users/{username}
pub(super) async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    if !auth.is_logged_as(&username) {
        return Err(AppError::Forbidden("you can only delete your own account"));
    }
    if !state.db.call(|conn| UserQueries::delete(conn, &username))? {
        return Err(AppError::NotFound("user"));
    }
    tracing::info!(%username, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users?filter[tag]=a,b or GET /users?filter[withMyTags]
pub(super) async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Query(params): Query<QueryParams>,
) -> AppResult<Document> {
    let me = auth.require_logged()?;

    if let Some(tags) = params.get("filter[tag]") {
        let tagnames: Vec<String> = tags
            .split(',')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let errors: Vec<ValidationError> = tagnames
            .iter()
            .filter_map(|t| validate_tagname(t).err())
            .flatten()
            .collect();
        if tagnames.is_empty() || !errors.is_empty() {
            return Err(AppError::Validation(if errors.is_empty() {
                vec![ValidationError::new(
                    "filter[tag]",
                    "provide at least one tagname",
                    Value::String(tags.clone()),
                )]
            } else {
                errors
            }));
        }

        let users = state
            .db
            .call(|conn| GraphQueries::users_with_tags(conn, &tagnames))?;
        return Ok(ranked_users_document(&state.links, &users));
    }

    if params.contains_key("filter[withMyTags]") {
        let limit = page_limit(&params, GraphQueries::DEFAULT_USERS_LIMIT)?;
        let users = state
            .db
            .call(|conn| GraphQueries::users_with_my_tags(conn, me, limit))?;
        return Ok(ranked_users_document(&state.links, &users));
    }

    Err(AppError::BadRequest(
        "use filter[tag] or filter[withMyTags] to list users".into(),
    ))
}
