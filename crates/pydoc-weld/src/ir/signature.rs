//! Callable signatures
//!
//! A `Signature` mirrors what `inspect.signature` reports for the declared
//! (unbound) callable: methods, class methods and `__init__`/`__new__` keep
//! their leading `self`/`cls` parameter.

use crate::ir::value::Value;
use serde::{Deserialize, Serialize};

/// Parameter kinds, in the order Python allows them to be declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Declared before a `/`
    PositionalOnly,
    /// Ordinary parameter
    PositionalOrKeyword,
    /// `*args`
    VarPositional,
    /// Declared after `*` or `*args`
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

impl ParameterKind {
    /// Whether this is `*args` or `**kwargs`
    pub fn is_variadic(&self) -> bool {
        matches!(self, ParameterKind::VarPositional | ParameterKind::VarKeyword)
    }
}

/// A type annotation as seen through reflection
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// No annotation was given (`Parameter.empty`)
    #[default]
    Empty,
    /// An annotation object
    Type {
        /// The object's `__name__`, when it exposes one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// The object's `str()` form
        repr: String,
    },
}

impl Annotation {
    /// An annotation that exposes a short name (classes such as `int`)
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Annotation::Type {
            repr: format!("<class '{}'>", name),
            name: Some(name),
        }
    }

    /// An annotation known only by its string form (`typing.List[int]`)
    pub fn repr(repr: impl Into<String>) -> Self {
        Annotation::Type {
            name: None,
            repr: repr.into(),
        }
    }

    /// Check whether no annotation was given
    pub fn is_empty(&self) -> bool {
        matches!(self, Annotation::Empty)
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name without `*`/`**`
    pub name: String,

    /// Parameter kind
    pub kind: ParameterKind,

    /// Declared default; `None` means no default was declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Type annotation
    #[serde(default)]
    pub annotation: Annotation,
}

impl Parameter {
    /// Create an ordinary positional-or-keyword parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::PositionalOrKeyword,
            default: None,
            annotation: Annotation::Empty,
        }
    }

    /// Set the kind
    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the annotation
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A callable's reflected signature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Return annotation
    #[serde(default)]
    pub return_annotation: Annotation,
}

impl Signature {
    /// Create an empty signature
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Set the return annotation
    pub fn returns(mut self, annotation: Annotation) -> Self {
        self.return_annotation = annotation;
        self
    }
}

/// How a function body behaves when called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionFlavor {
    /// `def f(): return ...`
    #[default]
    Plain,
    /// `async def f(): ...`
    Coroutine,
    /// `def f(): yield ...`
    Generator,
    /// `async def f(): yield ...`
    AsyncGenerator,
}

impl FunctionFlavor {
    /// Coroutine or async generator
    pub fn is_async(&self) -> bool {
        matches!(self, FunctionFlavor::Coroutine | FunctionFlavor::AsyncGenerator)
    }

    /// Ordinary or async generator
    pub fn is_generator(&self) -> bool {
        matches!(self, FunctionFlavor::Generator | FunctionFlavor::AsyncGenerator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_flags() {
        assert!(!FunctionFlavor::Plain.is_async());
        assert!(FunctionFlavor::Coroutine.is_async());
        assert!(!FunctionFlavor::Coroutine.is_generator());
        assert!(FunctionFlavor::AsyncGenerator.is_async());
        assert!(FunctionFlavor::AsyncGenerator.is_generator());
    }

    #[test]
    fn test_parameter_builder() {
        let param = Parameter::new("arg_two")
            .with_annotation(Annotation::repr("typing.Optional[int]"))
            .with_default(1i64);
        assert_eq!(param.kind, ParameterKind::PositionalOrKeyword);
        assert_eq!(param.default, Some(Value::Int(1)));
        assert!(!param.annotation.is_empty());
    }

    #[test]
    fn test_annotation_default_is_empty() {
        let param: Parameter = serde_json::from_str(r#"{"name":"x","kind":"keyword_only"}"#).unwrap();
        assert!(param.annotation.is_empty());
        assert!(param.default.is_none());
    }
}
