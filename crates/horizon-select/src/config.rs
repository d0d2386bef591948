//! Select and content configuration.
//!
//! Both structs are plain data with builder methods and serde support, so a
//! select can be described in code or loaded from a TOML table:
//!
//! ```
//! use horizon_select::{OptionId, SelectConfig};
//!
//! let config = SelectConfig::from_toml_str(r#"
//!     default_value = "modelY"
//!     placeholder = "Choose a model"
//! "#).unwrap();
//!
//! assert_eq!(config.default_value, Some(OptionId::from("modelY")));
//! assert!(!config.disabled);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SelectResult;
use crate::option_id::OptionId;

/// Configuration of a select container. Immutable once the container exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Option to preselect once it attaches.
    pub default_value: Option<OptionId>,
    /// Text shown by the value part while nothing is selected.
    pub placeholder: Option<String>,
    /// A disabled select ignores trigger clicks and programmatic opening.
    pub disabled: bool,
    /// Initial validation state. An invalid select behaves normally; the flag
    /// is only there for styling.
    pub invalid: bool,
}

impl SelectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_value(mut self, value: impl Into<OptionId>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    /// Parse a configuration from a TOML table. Missing keys take their
    /// defaults.
    pub fn from_toml_str(source: &str) -> SelectResult<Self> {
        Ok(toml::from_str(source)?)
    }
}

/// Horizontal placement of the floating panel relative to the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    /// Panel's left edge on the trigger's left edge.
    Left,
    /// Panel centered under the trigger.
    #[default]
    Center,
    /// Panel's right edge on the trigger's right edge.
    Right,
}

/// Configuration of the content part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub align: HorizontalAlign,
}

impl ContentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }

    /// Parse a configuration from a TOML table.
    pub fn from_toml_str(source: &str) -> SelectResult<Self> {
        Ok(toml::from_str(source)?)
    }
}
