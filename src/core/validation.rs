//! Request parameter validation.
//!
//! Every value coming from a client passes through one of these functions before it
//! reaches a service, so services only ever see well-formed input.

use crate::infrastructure::entities::{MAX_CONTENT_CHARS, VoteOption};
use thiserror::Error;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("option must be one of double, single, alternate (got `{0}`)")]
    UnknownOption(String),

    #[error("content must be between 1 and {MAX_CONTENT_CHARS} characters (got {0})")]
    ContentLength(usize),

    #[error("`{name}` must be an integer (got `{value}`)")]
    NotAnInteger { name: &'static str, value: String },

    #[error("limit must be between 1 and {MAX_PAGE_LIMIT} (got {0})")]
    LimitOutOfRange(i64),

    #[error("offset must not be negative (got {0})")]
    NegativeOffset(i64),
}

/// A message that passed validation and may be handed to the message service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub content: String,
    pub option: VoteOption,
}

/// A validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

pub fn validate_option(option: &str) -> Result<VoteOption, ValidationError> {
    option
        .parse()
        .map_err(|_| ValidationError::UnknownOption(option.to_owned()))
}

pub fn validate_content(content: String) -> Result<String, ValidationError> {
    let length = content.chars().count();
    if (1..=MAX_CONTENT_CHARS).contains(&length) {
        Ok(content)
    } else {
        Err(ValidationError::ContentLength(length))
    }
}

pub fn validate_message(content: String, option: &str) -> Result<NewMessage, ValidationError> {
    Ok(NewMessage {
        content: validate_content(content)?,
        option: validate_option(option)?,
    })
}

/// Validates raw `limit` and `offset` query values, applying defaults for missing ones.
pub fn validate_page(limit: Option<&str>, offset: Option<&str>) -> Result<Page, ValidationError> {
    let limit = match limit {
        Some(raw) => parse_integer("limit", raw)?,
        None => DEFAULT_PAGE_LIMIT,
    };
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(ValidationError::LimitOutOfRange(limit));
    }

    let offset = match offset {
        Some(raw) => parse_integer("offset", raw)?,
        None => 0,
    };
    if offset < 0 {
        return Err(ValidationError::NegativeOffset(offset));
    }

    Ok(Page { limit, offset })
}

fn parse_integer(name: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            name,
            value: raw.to_owned(),
        })
}
