//! Argument descriptors
//!
//! One entry per rendered parameter of a callable, plus the synthetic `/`
//! and `*` markers at parameter-kind boundaries.

use crate::callables::CallableType;
use crate::descriptor::{Describe, DescriptorKind};
use crate::docstring::Docstring;
use crate::types::resolve_type_name;
use pydoc_weld::{ParameterKind, Signature, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker placed before the first positional-only parameter
pub const POSITIONAL_ONLY: &str = "/";

/// Marker placed before the first keyword-only parameter
pub const KEYWORD_ONLY: &str = "*";

/// The default of an argument
///
/// `Empty` means no default was declared. It is distinct from a declared
/// default of `None`, which is `Value(Value::None)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// No default
    #[default]
    Empty,
    /// Default as written in the docstring ("Defaults to X.")
    Text(String),
    /// The declared default value
    Value(Value),
}

impl DefaultValue {
    /// Check whether no default was declared
    pub fn is_empty(&self) -> bool {
        matches!(self, DefaultValue::Empty)
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Empty => Ok(()),
            DefaultValue::Text(text) => f.write_str(text),
            DefaultValue::Value(value) => write!(f, "{}", value),
        }
    }
}

/// A documented argument or attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    /// Parameter name, `*args`/`**kwargs` style for variadics, or a marker
    pub name: String,

    /// Display type
    #[serde(rename = "type")]
    pub type_: Option<String>,

    /// Description from the docstring
    pub description: Option<String>,

    /// Default value
    #[serde(default)]
    pub default: DefaultValue,
}

impl ArgumentDescriptor {
    /// Create an argument without a default
    pub fn new(name: impl Into<String>, type_: Option<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_,
            description,
            default: DefaultValue::Empty,
        }
    }

    /// Create a `/` or `*` marker
    pub fn marker(marker: &str) -> Self {
        Self::new(marker, None, None)
    }

    /// Set the default
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = default;
        self
    }

    /// An argument is optional when it has a default
    pub fn is_optional(&self) -> bool {
        !self.default.is_empty()
    }

    /// Whether this is a `/` or `*` marker
    pub fn is_marker(&self) -> bool {
        self.type_.is_none()
            && self.description.is_none()
            && (self.name == POSITIONAL_ONLY || self.name == KEYWORD_ONLY)
    }
}

impl Describe for ArgumentDescriptor {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Argument
    }
}

impl fmt::Display for ArgumentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(type_) = &self.type_ {
            write!(f, ": {}", type_)?;
        }
        if self.is_optional() {
            write!(f, " = {}", self.default)?;
        }
        Ok(())
    }
}

/// Build the rendered argument list of a signature
///
/// Methods, class methods and constructors lose their first parameter.
/// Variadics carry no type and never a default. A `/` marker precedes the
/// first positional-only parameter and a `*` marker the first keyword-only
/// one, each at most once.
pub fn build_arguments(
    signature: &Signature,
    docstring: &Docstring,
    role: CallableType,
    prefer_docstring: bool,
) -> Vec<ArgumentDescriptor> {
    let skip = usize::from(role.binds_first_parameter());
    let mut arguments = Vec::with_capacity(signature.parameters.len() + 2);
    let mut positional_only_marked = false;
    let mut keyword_only_marked = false;

    for parameter in signature.parameters.iter().skip(skip) {
        let prefix = match parameter.kind {
            ParameterKind::VarPositional => Some("*"),
            ParameterKind::VarKeyword => Some("**"),
            _ => None,
        };
        if let Some(prefix) = prefix {
            let name = format!("{}{}", prefix, parameter.name);
            let description = docstring
                .param(&name)
                .or_else(|| docstring.param(&parameter.name))
                .and_then(|p| p.description)
                .map(str::to_string);
            arguments.push(ArgumentDescriptor::new(name, None, description));
            continue;
        }

        if parameter.kind == ParameterKind::PositionalOnly && !positional_only_marked {
            arguments.push(ArgumentDescriptor::marker(POSITIONAL_ONLY));
            positional_only_marked = true;
        } else if parameter.kind == ParameterKind::KeywordOnly && !keyword_only_marked {
            arguments.push(ArgumentDescriptor::marker(KEYWORD_ONLY));
            keyword_only_marked = true;
        }

        let documented = docstring.param(&parameter.name);
        let type_name = resolve_type_name(&parameter.annotation, documented.as_ref());
        let default = match (&parameter.default, documented.and_then(|p| p.default)) {
            (None, _) => DefaultValue::Empty,
            (Some(_), Some(text)) if prefer_docstring => DefaultValue::Text(text.to_string()),
            (Some(value), _) => DefaultValue::Value(value.clone()),
        };

        arguments.push(
            ArgumentDescriptor::new(
                parameter.name.clone(),
                Some(type_name),
                documented.and_then(|p| p.description).map(str::to_string),
            )
            .with_default(default),
        );
    }

    arguments
}
