//! Shared helpers for HTTP contract tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use ditup::config::AppConfig;
use ditup::db::Database;
use ditup::mailer::Outbox;
use ditup::server::{router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "asdfasdf";

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub outbox: Outbox,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("open database");
        let outbox = Outbox::new();
        let state = AppState::new(db.clone(), AppConfig::for_test(), Arc::new(outbox.clone()));
        Self {
            app: router(state),
            db,
            outbox,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(username) = auth {
            let credentials = STANDARD.encode(format!("{username}:{PASSWORD}"));
            builder = builder.header(header::AUTHORIZATION, format!("Basic {credentials}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/vnd.api+json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("request should be served");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body should be json")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, auth: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, auth, None).await
    }

    pub async fn post(&self, uri: &str, auth: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, auth, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, auth: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, auth, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, auth: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, auth, None).await
    }

    /// Sign up without verifying the email.
    pub async fn sign_up(&self, username: &str) -> TestResponse {
        self.post(
            "/users",
            None,
            json!({
                "data": {
                    "type": "users",
                    "attributes": {
                        "username": username,
                        "email": format!("{username}@example.com"),
                        "password": PASSWORD,
                    }
                }
            }),
        )
        .await
    }

    /// The code from the last verification email.
    pub fn last_verification_code(&self) -> String {
        let mail = self.outbox.last().expect("a verification email was sent");
        mail.text
            .lines()
            .find(|line| line.contains("/verify-email/"))
            .and_then(|line| line.trim().rsplit('/').next())
            .expect("email contains a verification link")
            .to_string()
    }

    pub async fn verify_email(&self, username: &str, code: &str) -> TestResponse {
        self.patch(
            &format!("/users/{username}/account"),
            None,
            json!({
                "data": {
                    "type": "users",
                    "id": username,
                    "attributes": { "emailVerificationCode": code }
                }
            }),
        )
        .await
    }

    /// Sign up and verify the email.
    pub async fn create_user(&self, username: &str) {
        let response = self.sign_up(username).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        let code = self.last_verification_code();
        let response = self.verify_email(username, &code).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    }

    pub async fn create_tag(&self, tagname: &str, by: &str) {
        let response = self
            .post(
                "/tags",
                Some(by),
                json!({ "data": { "type": "tags", "attributes": { "tagname": tagname } } }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    }

    pub async fn add_user_tag(&self, username: &str, tagname: &str, relevance: u8) {
        let response = self
            .post(
                &format!("/users/{username}/tags"),
                Some(username),
                user_tag_body(tagname, "", Some(relevance)),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    }
}

pub fn user_tag_body(tagname: &str, story: &str, relevance: Option<u8>) -> Value {
    let mut attributes = json!({ "story": story });
    if let Some(relevance) = relevance {
        attributes["relevance"] = json!(relevance);
    }
    json!({
        "data": {
            "type": "user-tags",
            "attributes": attributes,
            "relationships": { "tag": { "data": { "type": "tags", "id": tagname } } }
        }
    })
}

pub fn contact_body(to: &str, trust: u8) -> Value {
    json!({
        "data": {
            "type": "contacts",
            "attributes": {
                "trust": trust,
                "reference": "we met at a workshop",
                "message": "let's connect",
            },
            "relationships": { "to": { "data": { "type": "users", "id": to } } }
        }
    })
}

pub fn message_body(to: &str, body: &str) -> Value {
    json!({
        "data": {
            "type": "messages",
            "attributes": { "body": body },
            "relationships": { "to": { "data": { "type": "users", "id": to } } }
        }
    })
}

pub fn is_json_api(response: &TestResponse) -> bool {
    response.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
        == Some("application/vnd.api+json")
}
