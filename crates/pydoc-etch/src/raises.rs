//! Raises, examples and attributes pulled from docstring metadata

use crate::arguments::ArgumentDescriptor;
use crate::descriptor::{Describe, DescriptorKind};
use crate::docstring::{split_typed_head, Docstring};
use serde::{Deserialize, Serialize};

/// A documented exception
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaisesDescriptor {
    /// Exception type name
    #[serde(rename = "type")]
    pub type_: String,
    /// When and why it is raised
    pub description: Option<String>,
}

impl RaisesDescriptor {
    /// Create a raises descriptor
    pub fn new(type_: impl Into<String>, description: Option<String>) -> Self {
        Self {
            type_: type_.into(),
            description,
        }
    }
}

impl Describe for RaisesDescriptor {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Raises
    }
}

/// The documented exceptions, or `None` when the docstring declares none
pub fn extract_raises(docstring: &Docstring) -> Option<Vec<RaisesDescriptor>> {
    let raises: Vec<_> = docstring
        .raises()
        .map(|r| {
            RaisesDescriptor::new(
                r.type_name.unwrap_or_default(),
                r.description.map(str::to_string),
            )
        })
        .collect();
    (!raises.is_empty()).then_some(raises)
}

/// Example blocks in order, or `None` when there are none
pub fn extract_examples(docstring: &Docstring) -> Option<Vec<String>> {
    let examples: Vec<String> = docstring.examples().map(str::to_string).collect();
    (!examples.is_empty()).then_some(examples)
}

/// Attributes declared in the docstring (not real fields)
///
/// Each entry head is a name optionally followed by a parenthesised type.
pub fn extract_attributes(docstring: &Docstring) -> Vec<ArgumentDescriptor> {
    docstring
        .attributes()
        .map(|(head, description)| {
            let (name, type_) = split_typed_head(head);
            ArgumentDescriptor::new(
                name,
                type_.map(str::to_string),
                description.map(str::to_string),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raises_absent_when_undocumented() {
        let docstring = Docstring::parse("Nothing raised here");
        assert_eq!(extract_raises(&docstring), None);
        assert_eq!(extract_examples(&docstring), None);
        assert!(extract_attributes(&docstring).is_empty());
    }

    #[test]
    fn test_raises_in_order() {
        let docstring = Docstring::parse(
            "Summary\n\nRaises:\n    ValueError: Bad value\n    KeyError: Missing key\n",
        );
        assert_eq!(
            extract_raises(&docstring),
            Some(vec![
                RaisesDescriptor::new("ValueError", Some("Bad value".into())),
                RaisesDescriptor::new("KeyError", Some("Missing key".into())),
            ])
        );
    }

    #[test]
    fn test_examples_and_attributes() {
        let docstring = Docstring::parse(
            "Summary\n\nAttributes:\n    size (int): The size\n    label: The label\n\nExample:\n    >>> make()\n",
        );
        assert_eq!(extract_examples(&docstring), Some(vec![">>> make()".to_string()]));
        assert_eq!(
            extract_attributes(&docstring),
            vec![
                ArgumentDescriptor::new("size", Some("int".into()), Some("The size".into())),
                ArgumentDescriptor::new("label", None, Some("The label".into())),
            ]
        );
    }
}
