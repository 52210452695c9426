//! Tags.

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde_json::{json, Value};

use super::{page_limit, AppState, QueryParams};
use crate::auth::Auth;
use crate::db::{GraphQueries, TagQueries};
use crate::error::{AppError, AppResult};
use crate::jsonapi::{resource, Document, JsonApi, Links};
use crate::models::{RelatedTag, Tag};
use crate::validation::{validate_like_fragment, validate_new_tag, validate_tagname};

pub(super) fn tag_resource(links: &Links, tag: &Tag) -> Value {
    let mut data = resource(
        "tags",
        &tag.tagname,
        json!({ "tagname": tag.tagname, "created": tag.created.timestamp_millis() }),
    );
    data["links"] = json!({ "self": links.tag(&tag.tagname) });
    if let Some(creator) = &tag.creator {
        data["relationships"] = json!({
            "creator": {
                "data": { "type": "users", "id": creator },
                "links": { "related": links.user(creator) },
            }
        });
    }
    data
}

fn related_tag_resource(links: &Links, tag: &RelatedTag) -> Value {
    let mut data = resource(
        "tags",
        &tag.tagname,
        json!({ "tagname": tag.tagname, "created": tag.created.timestamp_millis() }),
    );
    data["links"] = json!({ "self": links.tag(&tag.tagname) });
    data["meta"] = json!({ "relevance": tag.relevance });
    data
}

fn tags_document(links: &Links, tags: &[Tag]) -> Document {
    let data: Vec<Value> = tags.iter().map(|tag| tag_resource(links, tag)).collect();
    Document::ok(json!({ "data": data }))
}

/// POST /tags
pub(super) async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    JsonApi(body): JsonApi,
) -> AppResult<Document> {
    let me = auth.require_logged()?;
    let fields = body.into_fields("tags")?;
    let tagname = validate_new_tag(&fields)?;

    let tag = state
        .db
        .call(|conn| TagQueries::insert(conn, &tagname, me))?;
    tracing::info!(tagname = %tag.tagname, creator = %me, "tag created");

    let location = state.links.tag(&tag.tagname);
    let body = json!({
        "data": tag_resource(&state.links, &tag),
        "links": { "self": location },
    });
    Ok(Document::created(body, location))
}

/// GET /tags/{tagname}
pub(super) async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(tagname): Path<String>,
) -> AppResult<Document> {
    auth.require_logged()?;
    validate_tagname(&tagname)?;

    let tag = state
        .db
        .call(|conn| TagQueries::get(conn, &tagname))?
        .ok_or(AppError::NotFound("tag"))?;
    Ok(Document::ok(json!({
        "data": tag_resource(&state.links, &tag),
        "links": { "self": state.links.tag(&tagname) },
    })))
}

/// GET /tags with one of `filter[tagname][like]`, `filter[relatedToMyTags]`
/// or `filter[random]`.
pub(super) async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Query(params): Query<QueryParams>,
) -> AppResult<Document> {
    if let Some(fragment) = params.get("filter[tagname][like]") {
        validate_like_fragment(fragment)?;
        let tags = state
            .db
            .call(|conn| TagQueries::filter_like(conn, fragment))?;
        return Ok(tags_document(&state.links, &tags));
    }

    if params.contains_key("filter[relatedToMyTags]") {
        let me = auth.require_logged()?;
        let limit = page_limit(&params, GraphQueries::DEFAULT_RELATED_TAGS_LIMIT)?;
        let tags = state
            .db
            .call(|conn| GraphQueries::related_tags_of_user(conn, me, limit))?;
        let data: Vec<Value> = tags
            .iter()
            .map(|tag| related_tag_resource(&state.links, tag))
            .collect();
        return Ok(Document::ok(json!({ "data": data })));
    }

    if params.contains_key("filter[random]") {
        let limit = page_limit(&params, 1)?;
        let limit = u32::try_from(limit).unwrap_or(1);
        let tags = state.db.call(|conn| TagQueries::random(conn, limit))?;
        return Ok(tags_document(&state.links, &tags));
    }

    Err(AppError::BadRequest(
        "use filter[tagname][like], filter[relatedToMyTags] or filter[random] to list tags".into(),
    ))
}
