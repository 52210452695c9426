use serde_json::{Map, Value};

use super::{check_param, merge, rules, Checker, Validated};
use crate::models::TrustLevel;

/// Input for a contact request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactInput {
    pub to: String,
    pub trust: TrustLevel,
    pub reference: String,
    pub message: String,
}

/// Input for confirming a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfirmation {
    pub trust: TrustLevel,
    pub reference: String,
}

/// Changes to an existing contact edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub trust: Option<TrustLevel>,
    pub reference: Option<String>,
}

fn trust(value: u64) -> Result<TrustLevel, &'static str> {
    u8::try_from(value)
        .ok()
        .and_then(TrustLevel::from_u8)
        .ok_or("the trust level is invalid (must be one of 1, 2, 4, 8)")
}

/// Validate the `:from` and `:to` path parameters.
pub fn validate_contact_params(from: &str, to: &str) -> Validated<()> {
    merge([
        check_param("from", from, rules::username),
        check_param("to", to, rules::username),
    ])
}

/// Validate a contact request sent by `me`.
pub fn validate_new_contact(fields: &Map<String, Value>, me: &str) -> Validated<NewContactInput> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["to", "trust", "reference", "message"], &[]);

    let to = checker.string("to", rules::username);
    if to.as_deref() == Some(me) {
        checker.push(
            "to",
            "you cannot create a contact to yourself",
            Value::String(me.to_string()),
        );
    }
    let trust = checker.integer("trust", trust);
    let reference = checker.string("reference", rules::reference);
    let message = checker.string("message", rules::contact_message);

    checker.finish(|| {
        Some(NewContactInput {
            to: to?,
            trust: trust?,
            reference: reference?,
            message: message?,
        })
    })
}

/// Validate the confirmation of the request `to -> from` by `from`.
pub fn validate_contact_confirmation(
    fields: &Map<String, Value>,
    from: &str,
    to: &str,
) -> Validated<ContactConfirmation> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["id", "isConfirmed", "trust", "reference"], &[]);
    check_document_id(&mut checker, from, to);

    if let Some(false) = checker.boolean("isConfirmed") {
        checker.push(
            "isConfirmed",
            "isConfirmed must be true; use DELETE to refuse the contact",
            Value::Bool(false),
        );
    }
    let trust = checker.integer("trust", trust);
    let reference = checker.string("reference", rules::reference);

    checker.finish(|| {
        Some(ContactConfirmation {
            trust: trust?,
            reference: reference?,
        })
    })
}

/// Validate an update of the edge `from -> to`.
pub fn validate_contact_update(
    fields: &Map<String, Value>,
    from: &str,
    to: &str,
) -> Validated<ContactUpdate> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["id"], &["trust", "reference"]);
    check_document_id(&mut checker, from, to);

    let update = ContactUpdate {
        trust: checker.integer("trust", trust),
        reference: checker.string("reference", rules::reference),
    };
    if checker.is_clean() && update == ContactUpdate::default() {
        checker.push(
            "attributes",
            "incomplete request",
            Value::String("nothing to update".into()),
        );
    }

    checker.finish(|| Some(update))
}

fn check_document_id(checker: &mut Checker<'_>, from: &str, to: &str) {
    let expected = format!("{from}--{to}");
    if let Some(id) = checker.get("id") {
        if id.as_str() != Some(expected.as_str()) {
            checker.push("id", "document id doesn't match the url parameters", id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::fields;

    fn request(to: &str, trust: Value) -> Map<String, Value> {
        fields(json!({
            "to": to,
            "trust": trust,
            "reference": "we met at a conference",
            "message": "hello",
        }))
    }

    #[test]
    fn test_new_contact() {
        let input = validate_new_contact(&request("other", json!(4)), "me").unwrap();
        assert_eq!(input.to, "other");
        assert_eq!(input.trust, TrustLevel::Friend);
    }

    #[test]
    fn test_new_contact_invalid_trust() {
        for invalid in [json!(3), json!(0), json!(16), json!("4")] {
            let errors = validate_new_contact(&request("other", invalid), "me").unwrap_err();
            assert_eq!(errors[0].param, "trust");
        }
    }

    #[test]
    fn test_new_contact_to_self() {
        let errors = validate_new_contact(&request("me", json!(2)), "me").unwrap_err();
        assert_eq!(errors[0].msg, "you cannot create a contact to yourself");
    }

    #[test]
    fn test_confirmation() {
        let body = fields(json!({
            "id": "me--other",
            "isConfirmed": true,
            "trust": 8,
            "reference": "family",
        }));
        let confirmation = validate_contact_confirmation(&body, "me", "other").unwrap();
        assert_eq!(confirmation.trust, TrustLevel::Family);
    }

    #[test]
    fn test_confirmation_rejects_false_and_wrong_id() {
        let body = fields(json!({
            "id": "other--me",
            "isConfirmed": false,
            "trust": 8,
            "reference": "",
        }));
        let errors = validate_contact_confirmation(&body, "me", "other").unwrap_err();
        let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, ["id", "isConfirmed"]);
    }

    #[test]
    fn test_update() {
        let body = fields(json!({ "id": "me--other", "reference": "updated" }));
        let update = validate_contact_update(&body, "me", "other").unwrap();
        assert_eq!(update.reference.as_deref(), Some("updated"));
        assert_eq!(update.trust, None);
    }

    #[test]
    fn test_params() {
        assert!(validate_contact_params("me", "other").is_ok());
        assert_eq!(validate_contact_params("Me", "-x").unwrap_err().len(), 2);
    }
}
