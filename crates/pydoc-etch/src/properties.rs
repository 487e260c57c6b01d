//! Property descriptors
//!
//! Named-tuple fields look like properties but have no getter, setter or
//! docstring of their own; they are documented from the owning class's
//! docstring instead.

use crate::descriptor::{Describe, DescriptorKind};
use crate::diagnostics::{EtchError, EtchResult};
use crate::docstring::Docstring;
use crate::raises::{extract_examples, extract_raises, RaisesDescriptor};
use crate::types::resolve_type_name;
use pydoc_weld::{ObjectGraph, ObjectId, Signature};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A documented property or named-tuple field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Short name of the owning class
    pub qualifier: String,

    /// Attribute name on the class
    pub name: String,

    /// First paragraph of the docstring
    pub summary: Option<String>,

    /// Remaining docstring prose
    pub description: Option<String>,

    /// Display type, "Any" when unresolved
    #[serde(rename = "type")]
    pub type_: String,

    /// Whether the property has a setter
    pub is_settable: bool,

    /// Whether the property has a deleter
    pub is_deletable: bool,

    /// Documented exceptions, absent when none are documented
    pub raises: Option<Vec<RaisesDescriptor>>,

    /// Docstring examples, absent when there are none
    pub examples: Option<Vec<String>>,
}

impl PropertyDescriptor {
    /// Build the descriptor of member `name` of `class`
    pub fn create(
        graph: &ObjectGraph,
        property: ObjectId,
        class: ObjectId,
        name: &str,
    ) -> EtchResult<Self> {
        let qualifier = graph
            .as_class(class)
            .map(|c| c.name.clone())
            .ok_or_else(|| EtchError::unexpected_kind(graph, class, "class"))?;

        let is_field = graph
            .named_tuple_fields(class)
            .is_some_and(|fields| fields.contains(&name));
        if is_field {
            return Ok(Self::named_tuple_field(graph, class, qualifier, name));
        }

        let object = graph
            .as_property(property)
            .ok_or_else(|| EtchError::unexpected_kind(graph, property, "property"))?;
        trace!(class = %qualifier, name, "describing property");

        let docstring = Docstring::parse_opt(graph.getdoc(property).as_deref());
        let default_signature = Signature::default();
        let signature = object
            .fget
            .and_then(|fget| graph.as_function(fget))
            .map(|fget| &fget.signature)
            .unwrap_or(&default_signature);
        let type_ = resolve_type_name(&signature.return_annotation, docstring.returns().as_ref());

        Ok(Self {
            qualifier,
            name: name.to_string(),
            summary: docstring.short_description.clone(),
            description: docstring.long_description.clone(),
            type_,
            is_settable: object.fset.is_some(),
            is_deletable: object.fdel.is_some(),
            raises: extract_raises(&docstring),
            examples: extract_examples(&docstring),
        })
    }

    fn named_tuple_field(graph: &ObjectGraph, class: ObjectId, qualifier: String, name: &str) -> Self {
        trace!(class = %qualifier, name, "describing named tuple field");
        let docstring = Docstring::parse_opt(graph.getdoc(class).as_deref());
        let documented = docstring.param(name);
        let annotation = graph.field_annotation(class, name);
        Self {
            qualifier,
            name: name.to_string(),
            summary: documented.and_then(|p| p.description).map(str::to_string),
            description: None,
            type_: resolve_type_name(&annotation, documented.as_ref()),
            is_settable: false,
            is_deletable: false,
            raises: None,
            examples: None,
        }
    }
}

impl Describe for PropertyDescriptor {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Property
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::mock_module;
    use pretty_assertions::assert_eq;

    fn member(graph: &ObjectGraph, class: ObjectId, name: &str) -> ObjectId {
        graph.getattr(class, name).unwrap().id()
    }

    #[test]
    fn test_named_tuple_field() {
        let mock = mock_module().unwrap();
        let class = mock.mock_named_tuple;
        let field = member(&mock.graph, class, "optional_int_with_default");
        let desc = PropertyDescriptor::create(&mock.graph, field, class, "optional_int_with_default")
            .unwrap();
        assert_eq!(
            desc,
            PropertyDescriptor {
                qualifier: "MockNamedTuple".into(),
                name: "optional_int_with_default".into(),
                summary: Some("An optional int\nargument. Defaults to None.".into()),
                description: None,
                type_: "Optional[int]".into(),
                is_settable: false,
                is_deletable: false,
                raises: None,
                examples: None,
            }
        );
    }

    #[test]
    fn test_named_tuple_field_type_from_annotation() {
        let mock = mock_module().unwrap();
        let class = mock.mock_named_tuple;
        let field = member(&mock.graph, class, "str_arg");
        let desc = PropertyDescriptor::create(&mock.graph, field, class, "str_arg").unwrap();
        assert_eq!(desc.type_, "str");
        assert_eq!(desc.summary.as_deref(), Some("A string argument"));
    }

    #[test]
    fn test_true_property() {
        let mock = mock_module().unwrap();
        let class = mock.mock_properties;
        let value = member(&mock.graph, class, "value");
        let desc = PropertyDescriptor::create(&mock.graph, value, class, "value").unwrap();
        assert_eq!(desc.qualifier, "MockProperties");
        assert_eq!(desc.summary.as_deref(), Some("The value"));
        assert_eq!(desc.description.as_deref(), Some("More about the value."));
        assert_eq!(desc.type_, "int");
        assert!(desc.is_settable);
        assert!(!desc.is_deletable);
        assert_eq!(
            desc.raises,
            Some(vec![RaisesDescriptor::new("ValueError", Some("When unset".into()))])
        );
    }

    #[test]
    fn test_property_without_annotation_is_any() {
        let mock = mock_module().unwrap();
        let class = mock.mock_properties;
        let label = member(&mock.graph, class, "label");
        let desc = PropertyDescriptor::create(&mock.graph, label, class, "label").unwrap();
        assert_eq!(desc.type_, "Any");
        assert_eq!(desc.summary.as_deref(), Some("A read only label"));
        assert!(!desc.is_settable);
        assert_eq!(desc.raises, None);
    }

    #[test]
    fn test_deletable_property() {
        let mock = mock_module().unwrap();
        let class = mock.mock_properties;
        let cache = member(&mock.graph, class, "cache");
        let desc = PropertyDescriptor::create(&mock.graph, cache, class, "cache").unwrap();
        assert_eq!(desc.type_, "Dict[str, int]");
        assert_eq!(desc.summary.as_deref(), Some("Cached results"));
        assert!(desc.is_settable);
        assert!(desc.is_deletable);
    }

    #[test]
    fn test_non_property_is_rejected() {
        let mock = mock_module().unwrap();
        let err = PropertyDescriptor::create(&mock.graph, mock.mock_func, mock.mock_class, "f")
            .unwrap_err();
        assert!(matches!(err, EtchError::UnexpectedKind { expected: "property", .. }));
    }
}
