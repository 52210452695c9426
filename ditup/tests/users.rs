mod common;

use axum::http::{header, StatusCode};
use chrono::{TimeDelta, Utc};
use common::{is_json_api, TestApp};
use serde_json::json;

#[tokio::test]
async fn sign_up_creates_user_and_sends_verification_email() {
    let app = TestApp::new();
    let response = app.sign_up("test").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(is_json_api(&response));
    assert_eq!(
        response.headers[header::LOCATION],
        "http://localhost:3000/users/test"
    );
    assert_eq!(response.body["links"]["self"], "http://localhost:3000/users/test");
    assert_eq!(response.body["data"]["id"], "test");

    let mail = app.outbox.last().expect("verification email");
    assert_eq!(mail.to, "test@example.com");
    assert!(mail
        .text
        .contains("http://localhost:4200/user/test/verify-email/"));
}

#[tokio::test]
async fn sign_up_reports_every_invalid_attribute() {
    let app = TestApp::new();
    let response = app
        .post(
            "/users",
            None,
            json!({
                "data": {
                    "type": "users",
                    "attributes": {
                        "username": "this--is-an-invalid--username",
                        "email": "test@example",
                        "password": "short",
                    }
                }
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(is_json_api(&response));
    let params: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["meta"]["param"].as_str().unwrap())
        .collect();
    assert_eq!(params, ["username", "email", "password"]);
    assert!(app.outbox.sent().is_empty());
}

#[tokio::test]
async fn sign_up_rejects_malformed_document() {
    let app = TestApp::new();
    let response = app.post("/users", None, json!({ "username": "test" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["status"], "400");
}

#[tokio::test]
async fn sign_up_conflicts() {
    let app = TestApp::new();
    app.create_user("test").await;

    let response = app.sign_up("test").await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .post(
            "/users",
            None,
            json!({
                "data": {
                    "type": "users",
                    "attributes": {
                        "username": "other",
                        "email": "test@example.com",
                        "password": "asdfasdf",
                    }
                }
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn email_verification() {
    let app = TestApp::new();
    app.sign_up("test").await;
    let code = app.last_verification_code();

    let response = app
        .verify_email("test", "0123456789abcdef0123456789abcdef")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.verify_email("missing", &code).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.verify_email("test", &code).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["attributes"]["email"], "test@example.com");
    assert_eq!(response.body["data"]["attributes"]["emailVerified"], true);

    // the code is spent
    let response = app.verify_email("test", &code).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

fn backdate_verification(app: &TestApp, username: &str, age: TimeDelta) {
    let created = (Utc::now() - age).timestamp_millis();
    app.db
        .call(|conn| {
            conn.execute(
                "UPDATE users SET email_verification_created = ?1 WHERE username = ?2",
                rusqlite::params![created, username],
            )?;
            Ok(())
        })
        .unwrap();
}

#[tokio::test]
async fn email_verification_code_expires_after_two_hours() {
    let app = TestApp::new();
    app.sign_up("test").await;
    let code = app.last_verification_code();

    backdate_verification(&app, "test", TimeDelta::hours(2) + TimeDelta::minutes(1));
    let response = app.verify_email("test", &code).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["errors"][0]["meta"]["param"],
        "emailVerificationCode"
    );

    let profile = app.get("/users/test", Some("test")).await;
    assert_eq!(profile.body["data"]["attributes"]["emailVerified"], false);

    backdate_verification(&app, "test", TimeDelta::minutes(119));
    let response = app.verify_email("test", &code).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn profile_visibility() {
    let app = TestApp::new();
    app.create_user("test").await;
    app.create_user("other").await;
    app.sign_up("newbie").await;

    let anonymous = app.get("/users/test", None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body["data"]["attributes"], json!({ "username": "test" }));

    let logged = app.get("/users/test", Some("other")).await;
    assert!(logged.body["data"]["attributes"]["givenName"].is_string());
    assert!(logged.body["data"]["attributes"].get("email").is_none());

    let unverified_self = app.get("/users/newbie", Some("newbie")).await;
    assert_eq!(unverified_self.status, StatusCode::OK);
    assert!(unverified_self.body["data"]["attributes"]["description"].is_string());

    let unverified_other = app.get("/users/test", Some("newbie")).await;
    assert_eq!(
        unverified_other.body["data"]["attributes"],
        json!({ "username": "test" })
    );

    assert_eq!(app.get("/users/missing", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/users/Test", None).await.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_is_anonymous() {
    use axum::body::Body;
    use axum::http::Request;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use tower::ServiceExt;

    let app = TestApp::new();
    app.create_user("test").await;

    let request = Request::builder()
        .method("POST")
        .uri("/tags")
        .header(header::CONTENT_TYPE, "application/vnd.api+json")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("test:wrong-password")),
        )
        .body(Body::from(
            json!({ "data": { "type": "tags", "attributes": { "tagname": "cooking" } } })
                .to_string(),
        ))
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_profile() {
    let app = TestApp::new();
    app.create_user("test").await;
    app.create_user("other").await;

    let patch = json!({
        "data": {
            "type": "users",
            "id": "test",
            "attributes": { "givenName": "Test", "description": "I like testing" }
        }
    });

    let response = app.patch("/users/test", Some("other"), patch.clone()).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.patch("/users/test", Some("test"), patch).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["attributes"]["givenName"], "Test");
    assert_eq!(response.body["data"]["attributes"]["familyName"], "");
    assert_eq!(response.body["data"]["attributes"]["description"], "I like testing");

    let mismatch = json!({
        "data": { "type": "users", "id": "other", "attributes": { "givenName": "X" } }
    });
    let response = app.patch("/users/test", Some("test"), mismatch).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mixed = json!({
        "data": {
            "type": "users",
            "id": "test",
            "attributes": { "givenName": "X", "email": "new@example.com" }
        }
    });
    let response = app.patch("/users/test", Some("test"), mixed).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_user() {
    let app = TestApp::new();
    app.create_user("test").await;
    app.create_user("other").await;

    assert_eq!(
        app.delete("/users/test", Some("other")).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.delete("/users/test", Some("test")).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(app.get("/users/test", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_with_tags() {
    let app = TestApp::new();
    app.create_user("me").await;
    app.create_user("alice").await;
    app.create_user("bob").await;
    app.create_tag("cooking", "me").await;
    app.create_tag("hiking", "me").await;
    app.add_user_tag("me", "cooking", 5).await;
    app.add_user_tag("alice", "cooking", 5).await;
    app.add_user_tag("bob", "cooking", 1).await;
    app.add_user_tag("bob", "hiking", 2).await;

    let response = app.get("/users?filter[tag]=cooking,hiking", None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.get("/users?filter[tag]=cooking,hiking", Some("me")).await;
    assert_eq!(response.status, StatusCode::OK);
    let ranked: Vec<(&str, f64)> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| {
            (
                u["id"].as_str().unwrap(),
                u["meta"]["relevance"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(ranked, vec![("alice", 5.0), ("me", 5.0), ("bob", 3.0)]);

    let response = app.get("/users?filter[withMyTags]", Some("me")).await;
    assert_eq!(response.status, StatusCode::OK);
    let ids: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["alice", "bob"]);
    assert_eq!(response.body["data"][0]["meta"]["relevance"], 5.0);

    let response = app.get("/users?filter[tag]=Bad_Tag", Some("me")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
