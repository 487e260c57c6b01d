//! Type name resolution
//!
//! Merges a docstring-declared type with a reflected annotation into one
//! display string. The docstring wins; no information at all degrades to
//! "Any".

use crate::docstring::DeclaresType;
use lazy_static::lazy_static;
use pydoc_weld::Annotation;
use regex::Regex;

/// The generic type used when nothing is known
pub const ANY: &str = "Any";

/// The "no value" type
pub const NONE: &str = "None";

lazy_static! {
    /// `typing.` qualifiers anywhere in a type expression
    static ref TYPING_PREFIX_REGEX: Regex =
        Regex::new(r"\btyping\.([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

/// Resolve the display name of a parameter or return type
///
/// A type written in the docstring is used verbatim. Otherwise an empty
/// annotation is "Any", and a present one is its short name (or its string
/// form when it has none) with `typing.` qualifiers removed.
pub fn resolve_type_name<D: DeclaresType>(annotation: &Annotation, record: Option<&D>) -> String {
    if let Some(declared) = record.and_then(|r| r.declared_type()).filter(|t| !t.is_empty()) {
        return declared.to_string();
    }
    match annotation {
        Annotation::Empty => ANY.to_string(),
        Annotation::Type { name, repr } => {
            let raw = name.as_deref().filter(|n| !n.is_empty()).unwrap_or(repr);
            strip_typing_prefix(raw)
        }
    }
}

/// Drop `typing.` qualifiers: `typing.List[typing.Any]` gives `List[Any]`
pub fn strip_typing_prefix(name: &str) -> String {
    TYPING_PREFIX_REGEX.replace_all(name, "$1").into_owned()
}
