//! Option identity and entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an option within one select.
///
/// Serialized untagged, so TOML `default_value = "model3"` and
/// `default_value = 3` both parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    Int(i64),
    Str(String),
}

impl From<&str> for OptionId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for OptionId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for OptionId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for OptionId {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

/// Content carried by options and displayed by the value part.
///
/// The widget never interprets content; it only stores and hands it back.
pub trait OptionContent: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> OptionContent for T {}

/// An option id together with its content.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry<C> {
    pub id: OptionId,
    pub content: C,
}

impl<C> OptionEntry<C> {
    pub fn new(id: impl Into<OptionId>, content: C) -> Self {
        Self {
            id: id.into(),
            content,
        }
    }
}
