//! Field rules shared by the request validators.
//!
//! Each rule returns `Err(message)` describing what a valid value looks like.

use std::sync::LazyLock;

use regex::Regex;

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+([_.\-][a-z0-9]+)*$").expect("valid username regex"));

static TAGNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid tagname regex"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid email regex"));

static LIKE_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9\-]+$").expect("valid fragment regex"));

static VERIFICATION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-f0-9]{32}$").expect("valid code regex"));

pub type Rule = fn(&str) -> Result<(), &'static str>;

fn length_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

pub fn username(value: &str) -> Result<(), &'static str> {
    if length_between(value, 2, 32) && USERNAME.is_match(value) {
        Ok(())
    } else {
        Err("username must be 2-32 characters of a-z, 0-9, separated by single - _ or .")
    }
}

pub fn tagname(value: &str) -> Result<(), &'static str> {
    if length_between(value, 2, 64) && TAGNAME.is_match(value) {
        Ok(())
    } else {
        Err("tagname must be 2-64 characters of a-z, 0-9, separated by single -")
    }
}

pub fn email(value: &str) -> Result<(), &'static str> {
    if length_between(value, 3, 512) && EMAIL.is_match(value) {
        Ok(())
    } else {
        Err("invalid email address")
    }
}

pub fn password(value: &str) -> Result<(), &'static str> {
    if length_between(value, 8, 512) {
        Ok(())
    } else {
        Err("password must be 8-512 characters long")
    }
}

pub fn name(value: &str) -> Result<(), &'static str> {
    if length_between(value, 0, 128) {
        Ok(())
    } else {
        Err("too long (max 128 characters)")
    }
}

pub fn description(value: &str) -> Result<(), &'static str> {
    if length_between(value, 0, 2048) {
        Ok(())
    } else {
        Err("too long (max 2048 characters)")
    }
}

pub fn story(value: &str) -> Result<(), &'static str> {
    if length_between(value, 0, 1024) {
        Ok(())
    } else {
        Err("story is too long (max 1024 characters)")
    }
}

pub fn reference(value: &str) -> Result<(), &'static str> {
    if length_between(value, 0, 2048) {
        Ok(())
    } else {
        Err("reference is too long (max 2048 characters)")
    }
}

pub fn contact_message(value: &str) -> Result<(), &'static str> {
    if length_between(value, 0, 2048) {
        Ok(())
    } else {
        Err("message is too long (max 2048 characters)")
    }
}

pub fn message_body(value: &str) -> Result<(), &'static str> {
    if length_between(value, 1, 2048) {
        Ok(())
    } else {
        Err("message must be 1-2048 characters long")
    }
}

pub fn like_fragment(value: &str) -> Result<(), &'static str> {
    if length_between(value, 1, 64) && LIKE_FRAGMENT.is_match(value) {
        Ok(())
    } else {
        Err("filter must be 1-64 characters of a-z, 0-9 and -")
    }
}

pub fn verification_code(value: &str) -> Result<(), &'static str> {
    if VERIFICATION_CODE.is_match(value) {
        Ok(())
    } else {
        Err("invalid email verification code")
    }
}

/// Relevance of a tag to its user.
pub fn relevance(value: u64) -> Result<u8, &'static str> {
    u8::try_from(value)
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or("relevance must be an integer between 1 and 5")
}
