//! Scalar values carried by content edits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value of a content block edit: a string, a boolean toggle, or a number.
///
/// Serialized untagged, so the wire shape is the bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    Flag(bool),
    Number(f64),
}

impl ContentValue {
    /// The string payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ContentValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ContentValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Empty text value, used as the baseline for never-published content.
    pub fn empty() -> Self {
        ContentValue::Text(String::new())
    }
}

impl fmt::Display for ContentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentValue::Text(s) => write!(f, "{}", s),
            ContentValue::Flag(b) => write!(f, "{}", b),
            ContentValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::Text(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::Text(s)
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Flag(b)
    }
}

impl From<f64> for ContentValue {
    fn from(n: f64) -> Self {
        ContentValue::Number(n)
    }
}

/// What kind of content a change touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Text,
    Image,
    Toggle,
    Config,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Text => write!(f, "text"),
            ChangeKind::Image => write!(f, "image"),
            ChangeKind::Toggle => write!(f, "toggle"),
            ChangeKind::Config => write!(f, "config"),
        }
    }
}
