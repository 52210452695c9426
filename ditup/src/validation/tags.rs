use serde_json::{Map, Value};

use super::{check_param, rules, Checker, Validated};
use crate::models::DEFAULT_RELEVANCE;

/// Input for adding a tag to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserTagInput {
    pub tagname: String,
    pub story: String,
    pub relevance: u8,
}

/// Changes to a user-tag edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTagPatch {
    pub story: Option<String>,
    pub relevance: Option<u8>,
}

pub fn validate_tagname(tagname: &str) -> Validated<()> {
    check_param("tagname", tagname, rules::tagname)
}

pub fn validate_like_fragment(fragment: &str) -> Validated<()> {
    check_param("filter[tagname][like]", fragment, rules::like_fragment)
}

/// Validate a new tag. Returns the tagname.
pub fn validate_new_tag(fields: &Map<String, Value>) -> Validated<String> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["tagname"], &[]);
    let tagname = checker.string("tagname", rules::tagname);
    checker.finish(|| tagname)
}

/// Validate a new user-tag edge. The tag comes from the `tag` relationship.
pub fn validate_new_user_tag(fields: &Map<String, Value>) -> Validated<NewUserTagInput> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["tag", "story"], &["relevance"]);

    let tagname = checker.string("tag", rules::tagname);
    let story = checker.string("story", rules::story);
    let relevance = checker.integer("relevance", rules::relevance);

    checker.finish(|| {
        Some(NewUserTagInput {
            tagname: tagname?,
            story: story?,
            relevance: relevance.unwrap_or(DEFAULT_RELEVANCE),
        })
    })
}

/// Validate an update of the edge `username -> tagname`.
pub fn validate_user_tag_patch(
    fields: &Map<String, Value>,
    username: &str,
    tagname: &str,
) -> Validated<UserTagPatch> {
    let mut checker = Checker::new(fields);
    checker.expect_fields(&["id"], &["story", "relevance"]);

    let expected_id = format!("{username}--{tagname}");
    if let Some(id) = checker.get("id") {
        if id.as_str() != Some(expected_id.as_str()) {
            checker.push("id", "document id doesn't match the url parameters", id.clone());
        }
    }

    let patch = UserTagPatch {
        story: checker.string("story", rules::story),
        relevance: checker.integer("relevance", rules::relevance),
    };
    if checker.is_clean() && patch == UserTagPatch::default() {
        checker.push(
            "attributes",
            "incomplete request",
            Value::String("nothing to update".into()),
        );
    }

    checker.finish(|| Some(patch))
}
