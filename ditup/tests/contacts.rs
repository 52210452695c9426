mod common;

use axum::http::{header, StatusCode};
use common::{contact_body, TestApp};
use serde_json::{json, Value};

fn confirmation(from: &str, to: &str, trust: u8) -> Value {
    json!({
        "data": {
            "type": "contacts",
            "id": format!("{from}--{to}"),
            "attributes": {
                "isConfirmed": true,
                "trust": trust,
                "reference": "good person",
            }
        }
    })
}

async fn setup() -> TestApp {
    let app = TestApp::new();
    for username in ["test", "other", "third"] {
        app.create_user(username).await;
    }
    app
}

#[tokio::test]
async fn request_contact() {
    let app = setup().await;

    let response = app.post("/contacts", Some("test"), contact_body("other", 4)).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.headers[header::LOCATION],
        "http://localhost:3000/users/test/contacts/other"
    );
    assert_eq!(response.body["data"]["id"], "test--other");
    assert_eq!(response.body["data"]["attributes"]["trust"], 4);
    assert_eq!(response.body["data"]["attributes"]["isConfirmed"], false);
}

#[tokio::test]
async fn request_contact_errors() {
    let app = setup().await;

    assert_eq!(
        app.post("/contacts", None, contact_body("other", 4)).await.status,
        StatusCode::FORBIDDEN
    );

    let response = app.post("/contacts", Some("test"), contact_body("other", 3)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["meta"]["param"], "trust");

    let response = app.post("/contacts", Some("test"), contact_body("test", 4)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["errors"][0]["meta"]["msg"],
        "you cannot create a contact to yourself"
    );

    assert_eq!(
        app.post("/contacts", Some("test"), contact_body("missing", 4))
            .await
            .status,
        StatusCode::NOT_FOUND
    );

    app.post("/contacts", Some("test"), contact_body("other", 4)).await;
    assert_eq!(
        app.post("/contacts", Some("test"), contact_body("other", 2))
            .await
            .status,
        StatusCode::CONFLICT
    );
    assert_eq!(
        app.post("/contacts", Some("other"), contact_body("test", 2))
            .await
            .status,
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn pending_contact_visibility() {
    let app = setup().await;
    app.post("/contacts", Some("test"), contact_body("other", 4)).await;

    let creator = app.get("/users/test/contacts/other", Some("test")).await;
    assert_eq!(creator.status, StatusCode::OK);
    assert_eq!(creator.body["data"]["attributes"]["trust"], 4);
    assert_eq!(creator.body["data"]["attributes"]["message"], "let's connect");

    let receiver = app.get("/users/test/contacts/other", Some("other")).await;
    assert_eq!(receiver.status, StatusCode::OK);
    assert_eq!(receiver.body["data"]["attributes"]["message"], "let's connect");
    assert!(receiver.body["data"]["attributes"].get("trust").is_none());
    assert!(receiver.body["data"]["attributes"].get("reference").is_none());

    let stranger = app.get("/users/test/contacts/other", Some("third")).await;
    assert_eq!(stranger.status, StatusCode::NOT_FOUND);

    let pending = app
        .get("/users/other/contacts?filter[unconfirmed]", Some("other"))
        .await;
    assert_eq!(pending.status, StatusCode::OK);
    assert_eq!(pending.body["data"][0]["id"], "test--other");

    let someone_else = app
        .get("/users/other/contacts?filter[unconfirmed]", Some("test"))
        .await;
    assert_eq!(someone_else.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn confirm_contact() {
    let app = setup().await;
    app.post("/contacts", Some("test"), contact_body("other", 4)).await;

    // only the receiver can confirm, through their own edge
    let response = app
        .patch("/users/other/contacts/test", Some("test"), confirmation("other", "test", 2))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let mut refuse = confirmation("other", "test", 2);
    refuse["data"]["attributes"]["isConfirmed"] = json!(false);
    let response = app
        .patch("/users/other/contacts/test", Some("other"), refuse)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .patch("/users/other/contacts/test", Some("other"), confirmation("test", "other", 2))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .patch("/users/other/contacts/test", Some("other"), confirmation("other", "test", 2))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["attributes"]["isConfirmed"], true);
    assert_eq!(response.body["data"]["attributes"]["trust"], 2);

    // both directions are now confirmed and visible to logged users
    let forward = app.get("/users/test/contacts/other", Some("third")).await;
    assert_eq!(forward.status, StatusCode::OK);
    assert_eq!(forward.body["data"]["attributes"]["trust"], 4);
    assert_eq!(forward.body["data"]["attributes"]["isConfirmed"], true);

    let contacts = app.get("/users/test/contacts", Some("third")).await;
    assert_eq!(contacts.body["data"][0]["id"], "test--other");

    // nothing is pending anymore
    let response = app
        .patch("/users/other/contacts/test", Some("other"), confirmation("other", "test", 2))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_delete_contact() {
    let app = setup().await;
    app.post("/contacts", Some("test"), contact_body("other", 4)).await;

    let update = json!({
        "data": {
            "type": "contacts",
            "id": "test--other",
            "attributes": { "trust": 8, "reference": "updated" }
        }
    });
    let response = app
        .patch("/users/test/contacts/other", Some("test"), update)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["attributes"]["trust"], 8);
    assert_eq!(response.body["data"]["attributes"]["reference"], "updated");

    assert_eq!(
        app.delete("/users/test/contacts/other", Some("third")).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.delete("/users/test/contacts/other", Some("other")).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.get("/users/test/contacts/other", Some("test")).await.status,
        StatusCode::NOT_FOUND
    );
}
