use serde_json::{Map, Value};

use super::{check_param, rules, Checker, Validated};
use crate::models::ProfilePatch;

/// Input for user creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn validate_username(username: &str) -> Validated<()> {
    check_param("username", username, rules::username)
}

pub fn validate_new_user(fields: &Map<String, Value>) -> Validated<NewUserInput> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["username", "email", "password"], &[]);

    let username = checker.string("username", rules::username);
    let email = checker.string("email", rules::email);
    let password = checker.string("password", rules::password);

    checker.finish(|| {
        Some(NewUserInput {
            username: username?,
            email: email?,
            password: password?,
        })
    })
}

/// Validate a profile update of `username`.
pub fn validate_profile_patch(
    fields: &Map<String, Value>,
    username: &str,
) -> Validated<ProfilePatch> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["id"], &["givenName", "familyName", "description"]);
    check_id(&mut checker, username);

    let patch = ProfilePatch {
        given_name: checker.string("givenName", rules::name),
        family_name: checker.string("familyName", rules::name),
        description: checker.string("description", rules::description),
    };
    if checker.is_clean() && patch.is_empty() {
        checker.push(
            "attributes",
            "incomplete request",
            Value::String("nothing to update".into()),
        );
    }

    checker.finish(|| Some(patch))
}

/// Validate an email verification of `username`. Returns the code.
pub fn validate_email_verification(
    fields: &Map<String, Value>,
    username: &str,
) -> Validated<String> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["id", "emailVerificationCode"], &[]);
    check_id(&mut checker, username);
    let code = checker.string("emailVerificationCode", rules::verification_code);
    checker.finish(|| code)
}

fn check_id(checker: &mut Checker<'_>, username: &str) {
    if let Some(id) = checker.get("id") {
        if id.as_str() != Some(username) {
            checker.push("id", "document id doesn't match the url username", id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::fields;

    #[test]
    fn test_new_user_valid() {
        let body = fields(json!({
            "username": "test",
            "email": "test@example.com",
            "password": "asdfasdf",
        }));
        let input = validate_new_user(&body).unwrap();
        assert_eq!(input.username, "test");
        assert_eq!(input.email, "test@example.com");
    }

    #[test]
    fn test_new_user_collects_every_error() {
        let body = fields(json!({
            "username": "test*",
            "email": "test@example",
            "password": "short",
        }));
        let errors = validate_new_user(&body).unwrap_err();
        let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, ["username", "email", "password"]);
    }

    #[test]
    fn test_new_user_missing_attribute() {
        let body = fields(json!({ "username": "test", "password": "asdfasdf" }));
        let errors = validate_new_user(&body).unwrap_err();
        assert_eq!(errors[0].msg, "incomplete request");
    }

    #[test]
    fn test_profile_patch() {
        let body = fields(json!({ "id": "test", "givenName": "Test", "description": "hi" }));
        let patch = validate_profile_patch(&body, "test").unwrap();
        assert_eq!(patch.given_name.as_deref(), Some("Test"));
        assert_eq!(patch.family_name, None);
        assert_eq!(patch.description.as_deref(), Some("hi"));
    }

    #[test]
    fn test_profile_patch_rejects_mixing_with_email() {
        let body = fields(json!({ "id": "test", "givenName": "Test", "email": "a@b.cz" }));
        let errors = validate_profile_patch(&body, "test").unwrap_err();
        assert_eq!(errors[0].msg, "invalid request");
    }

    #[test]
    fn test_profile_patch_id_mismatch() {
        let body = fields(json!({ "id": "other", "givenName": "Test" }));
        let errors = validate_profile_patch(&body, "test").unwrap_err();
        assert_eq!(errors[0].param, "id");
    }

    #[test]
    fn test_profile_patch_too_long() {
        let body = fields(json!({ "id": "test", "givenName": ".".repeat(129) }));
        assert!(validate_profile_patch(&body, "test").is_err());
    }

    #[test]
    fn test_email_verification() {
        let code = "0123456789abcdef0123456789abcdef";
        let body = fields(json!({ "id": "test", "emailVerificationCode": code }));
        assert_eq!(validate_email_verification(&body, "test").unwrap(), code);

        let body = fields(json!({ "id": "test", "emailVerificationCode": "nope" }));
        assert!(validate_email_verification(&body, "test").is_err());
    }
}
