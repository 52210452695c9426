//! Request validation.
//!
//! Validators take the flattened attribute set of a JSON:API request body
//! and return either a typed input or every problem found in it.

pub mod rules;

mod contacts;
mod messages;
mod tags;
mod users;

use serde::Serialize;
use serde_json::{Map, Value};

pub use contacts::{
    validate_contact_confirmation, validate_contact_params, validate_contact_update,
    validate_new_contact, ContactConfirmation, ContactUpdate, NewContactInput,
};
pub use messages::{validate_message_patch, validate_new_message, NewMessageInput};
pub use tags::{
    validate_like_fragment, validate_new_tag, validate_new_user_tag, validate_tagname,
    validate_user_tag_patch, NewUserTagInput, UserTagPatch,
};
pub use users::{
    validate_email_verification, validate_new_user, validate_profile_patch, validate_username,
    NewUserInput,
};

/// A single failed check, reported in the `meta` of a JSON:API error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub param: String,
    pub msg: String,
    pub value: Value,
}

impl ValidationError {
    pub fn new(param: impl Into<String>, msg: impl Into<String>, value: Value) -> Self {
        Self {
            param: param.into(),
            msg: msg.into(),
            value,
        }
    }
}

/// Result of a validator.
pub type Validated<T> = Result<T, Vec<ValidationError>>;

/// Collects errors while reading fields out of a request body.
pub struct Checker<'a> {
    fields: &'a Map<String, Value>,
    errors: Vec<ValidationError>,
}

impl<'a> Checker<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    /// Require every name in `required`, allow those in `optional`, and
    /// reject anything else.
    pub fn expect_fields(&mut self, required: &[&str], optional: &[&str]) {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| !self.fields.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            self.push(
                "attributes",
                "incomplete request",
                Value::String(format!("missing attributes: {}", missing.join(", "))),
            );
        }

        let unexpected: Vec<&str> = self
            .fields
            .keys()
            .map(String::as_str)
            .filter(|name| !required.contains(name) && !optional.contains(name))
            .collect();
        if !unexpected.is_empty() {
            self.push(
                "attributes",
                "invalid request",
                Value::String(format!("invalid attributes: {}", unexpected.join(", "))),
            );
        }
    }

    /// Read a string field and check it against `rule`.
    ///
    /// Returns `None` when the field is absent or invalid; absence is
    /// reported by [`Checker::expect_fields`], not here.
    pub fn string(&mut self, name: &str, rule: rules::Rule) -> Option<String> {
        self.string_with(name, rule, |s| s.to_string())
    }

    /// Like [`Checker::string`], but trims the value before checking.
    pub fn trimmed(&mut self, name: &str, rule: rules::Rule) -> Option<String> {
        self.string_with(name, rule, |s| s.trim().to_string())
    }

    fn string_with(
        &mut self,
        name: &str,
        rule: rules::Rule,
        prepare: impl FnOnce(&str) -> String,
    ) -> Option<String> {
        let value = self.fields.get(name)?;
        let Some(raw) = value.as_str() else {
            self.push(name, "must be a string", value.clone());
            return None;
        };
        let prepared = prepare(raw);
        match rule(&prepared) {
            Ok(()) => Some(prepared),
            Err(msg) => {
                self.push(name, msg, value.clone());
                None
            }
        }
    }

    /// Read an integer field, mapping it through `convert`.
    pub fn integer<T>(
        &mut self,
        name: &str,
        convert: impl FnOnce(u64) -> Result<T, &'static str>,
    ) -> Option<T> {
        let value = self.fields.get(name)?;
        let Some(raw) = value.as_u64() else {
            self.push(name, "must be a positive integer", value.clone());
            return None;
        };
        match convert(raw) {
            Ok(converted) => Some(converted),
            Err(msg) => {
                self.push(name, msg, value.clone());
                None
            }
        }
    }

    /// Read a boolean field.
    pub fn boolean(&mut self, name: &str) -> Option<bool> {
        let value = self.fields.get(name)?;
        if let Some(b) = value.as_bool() {
            Some(b)
        } else {
            self.push(name, "must be a boolean", value.clone());
            None
        }
    }

    /// Raw access to a field.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name)
    }

    pub fn push(&mut self, param: &str, msg: impl Into<String>, value: Value) {
        self.errors.push(ValidationError::new(param, msg, value));
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish validation, producing `value` if nothing failed.
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Validated<T> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        // Every field a constructor needs was either read successfully or
        // reported as missing, so `None` here means a missing field.
        value().ok_or_else(|| {
            vec![ValidationError::new(
                "attributes",
                "incomplete request",
                Value::Null,
            )]
        })
    }
}

/// Validate a single path parameter.
pub(crate) fn check_param(name: &str, value: &str, rule: rules::Rule) -> Validated<()> {
    rule(value).map_err(|msg| vec![ValidationError::new(name, msg, Value::String(value.into()))])
}

/// Merge the outcome of several independent checks.
pub(crate) fn merge(results: impl IntoIterator<Item = Validated<()>>) -> Validated<()> {
    let errors: Vec<ValidationError> = results
        .into_iter()
        .filter_map(Result::err)
        .flatten()
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
pub(crate) fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}
