//! Autodoc configuration
//!
//! The flags steering member visibility and docstring precedence. They are
//! resolved booleans by the time a builder sees them; this module only
//! supplies defaults and TOML loading.

use crate::diagnostics::{EtchError, EtchResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Flags shared by the module, class and callable builders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutodocConfig {
    /// Take the class summary and description from `__init__`
    pub class_from_init: bool,
    /// Skip `__dunder__` members
    pub ignore_dunder: bool,
    /// Skip members starting with `_`
    pub ignore_private: bool,
    /// Document every module member regardless of `__all__`
    pub ignore_all: bool,
    /// Only document members declared on the class itself
    pub ignore_inherited: bool,
    /// Render defaults from the docstring's "Defaults to" text when present
    pub prefer_docstring: bool,
    /// Document child modules of a package
    pub follow_module_tree: bool,
}

impl Default for AutodocConfig {
    fn default() -> Self {
        Self {
            class_from_init: false,
            ignore_dunder: true,
            ignore_private: true,
            ignore_all: false,
            ignore_inherited: true,
            prefer_docstring: true,
            follow_module_tree: false,
        }
    }
}

impl AutodocConfig {
    /// Parse a configuration from TOML text
    ///
    /// Keys may sit at the top level or under an `[autodoc]` table.
    pub fn from_toml_str(text: &str) -> EtchResult<Self> {
        let value: toml::Value = text.parse()?;
        let table = match value.get("autodoc") {
            Some(toml::Value::Table(table)) => toml::Value::Table(table.clone()),
            Some(other) => {
                return Err(EtchError::config(format!(
                    "[autodoc] must be a table, found {}",
                    other.type_str()
                )))
            }
            None => value,
        };
        Ok(table.try_into()?)
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> EtchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Set `class_from_init`
    pub fn with_class_from_init(mut self, value: bool) -> Self {
        self.class_from_init = value;
        self
    }

    /// Set `ignore_dunder`
    pub fn with_ignore_dunder(mut self, value: bool) -> Self {
        self.ignore_dunder = value;
        self
    }

    /// Set `ignore_private`
    pub fn with_ignore_private(mut self, value: bool) -> Self {
        self.ignore_private = value;
        self
    }

    /// Set `ignore_all`
    pub fn with_ignore_all(mut self, value: bool) -> Self {
        self.ignore_all = value;
        self
    }

    /// Set `ignore_inherited`
    pub fn with_ignore_inherited(mut self, value: bool) -> Self {
        self.ignore_inherited = value;
        self
    }

    /// Set `prefer_docstring`
    pub fn with_prefer_docstring(mut self, value: bool) -> Self {
        self.prefer_docstring = value;
        self
    }

    /// Set `follow_module_tree`
    pub fn with_follow_module_tree(mut self, value: bool) -> Self {
        self.follow_module_tree = value;
        self
    }

    /// Whether a member name is hidden by the dunder and private filters
    pub fn hides(&self, name: &str) -> bool {
        (self.ignore_dunder && is_dunder(name)) || (self.ignore_private && name.starts_with('_'))
    }
}

/// `__name__`-shaped names
pub fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}
