use serde_json::{Map, Value};

use super::{rules, Checker, Validated};

/// Input for sending a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessageInput {
    pub to: String,
    pub body: String,
}

/// Validate a message sent by `me`. The body is trimmed.
pub fn validate_new_message(fields: &Map<String, Value>, me: &str) -> Validated<NewMessageInput> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["body", "to"], &[]);

    let body = checker.trimmed("body", rules::message_body);
    let to = checker.string("to", rules::username);
    if to.as_deref() == Some(me) {
        checker.push("to", "Receiver can't be the sender", Value::String(me.to_string()));
    }

    checker.finish(|| {
        Some(NewMessageInput {
            to: to?,
            body: body?,
        })
    })
}

/// Validate marking message `id` as read.
pub fn validate_message_patch(fields: &Map<String, Value>, id: &str) -> Validated<()> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["id", "read"], &[]);

    if let Some(body_id) = checker.get("id") {
        if body_id.as_str() != Some(id) {
            checker.push("id", "ids in request body and url don't match", body_id.clone());
        }
    }
    if let Some(false) = checker.boolean("read") {
        checker.push("read", "read can only be set to true", Value::Bool(false));
    }

    checker.finish(|| Some(()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::fields;

    #[test]
    fn test_new_message_trims_body() {
        let body = fields(json!({ "body": "  hello there \n", "to": "other" }));
        let input = validate_new_message(&body, "me").unwrap();
        assert_eq!(input.body, "hello there");
    }

    #[test]
    fn test_new_message_blank_body() {
        let body = fields(json!({ "body": "   ", "to": "other" }));
        let errors = validate_new_message(&body, "me").unwrap_err();
        assert_eq!(errors[0].param, "body");
    }

    #[test]
    fn test_new_message_to_self() {
        let body = fields(json!({ "body": "hi", "to": "me" }));
        let errors = validate_new_message(&body, "me").unwrap_err();
        assert_eq!(errors[0].msg, "Receiver can't be the sender");
    }

    #[test]
    fn test_message_patch() {
        let id = "0190a5c0-0000-7000-8000-000000000000";
        assert!(validate_message_patch(&fields(json!({ "id": id, "read": true })), id).is_ok());

        let errors =
            validate_message_patch(&fields(json!({ "id": "x", "read": false })), id).unwrap_err();
        assert_eq!(errors.len(), 2);

        let errors = validate_message_patch(
            &fields(json!({ "id": id, "read": true, "body": "edited" })),
            id,
        )
        .unwrap_err();
        assert_eq!(errors[0].msg, "invalid request");
    }
}
