//! JSON:API request and response documents.

use axum::{
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::AppError;
use crate::validation::ValidationError;

/// Media type of every response.
pub const JSON_API: &str = "application/vnd.api+json";

#[derive(Debug, Deserialize)]
struct RequestDocument {
    data: ResourceObject,
}

/// The primary resource of a request body.
#[derive(Debug, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: Map<String, Value>,
}

impl ResourceObject {
    /// Flatten the resource into one attribute map for validation.
    ///
    /// `id` and the linkage id of every to-one relationship land next to the
    /// attributes, so `relationships.to.data.id` becomes `to`. Linkage that
    /// isn't a resource identifier is kept as is and rejected by validators.
    pub fn into_fields(self, kind: &str) -> Result<Map<String, Value>, AppError> {
        if self.kind != kind {
            return Err(AppError::Validation(vec![ValidationError::new(
                "type",
                format!("resource type must be {kind}"),
                Value::String(self.kind),
            )]));
        }

        let mut fields = self.attributes;
        if let Some(id) = self.id {
            fields.insert("id".into(), Value::String(id));
        }
        for (name, relationship) in self.relationships {
            let linkage = match relationship.pointer("/data/id") {
                Some(id) => id.clone(),
                None => relationship,
            };
            fields.insert(name, linkage);
        }
        Ok(fields)
    }
}

/// Extracts the resource object of a JSON:API request body.
///
/// Rejections become JSON:API `400` documents instead of axum's plain text.
pub struct JsonApi(pub ResourceObject);

impl<S> FromRequest<S> for JsonApi
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(document) = Json::<RequestDocument>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(document.data))
    }
}

/// A successful JSON:API response.
#[derive(Debug)]
pub struct Document {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

impl Document {
    pub const fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            location: None,
            body,
        }
    }

    /// `201 Created` with a `Location` header.
    pub const fn created(body: Value, location: String) -> Self {
        Self {
            status: StatusCode::CREATED,
            location: Some(location),
            body,
        }
    }
}

impl IntoResponse for Document {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            [(header::CONTENT_TYPE, JSON_API)],
            Json(self.body),
        )
            .into_response();
        if let Some(location) = self.location.and_then(|l| l.parse().ok()) {
            response.headers_mut().insert(header::LOCATION, location);
        }
        response
    }
}

/// Build a resource object.
pub fn resource(kind: &str, id: &str, attributes: Value) -> Value {
    json!({ "type": kind, "id": id, "attributes": attributes })
}

/// Absolute links to API resources.
#[derive(Debug, Clone)]
pub struct Links {
    base: String,
}

impl Links {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Join url-encoded path segments onto the base url.
    pub fn to(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    pub fn user(&self, username: &str) -> String {
        self.to(&["users", username])
    }

    pub fn tag(&self, tagname: &str) -> String {
        self.to(&["tags", tagname])
    }

    pub fn user_tag(&self, username: &str, tagname: &str) -> String {
        self.to(&["users", username, "tags", tagname])
    }

    pub fn user_tag_relationship(&self, username: &str, tagname: &str) -> String {
        self.to(&["users", username, "relationships", "tags", tagname])
    }

    pub fn contact(&self, from: &str, to: &str) -> String {
        self.to(&["users", from, "contacts", to])
    }

    pub fn message(&self, id: &str) -> String {
        self.to(&["messages", id])
    }
}
