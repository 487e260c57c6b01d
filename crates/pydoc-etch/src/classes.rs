//! Class descriptors
//!
//! A class is documented through its constructor, the attributes its
//! docstring declares, its visible members and, recursively, its bases.
//! Base recursion carries the path of classes being built so a malformed
//! hierarchy that loops back on itself is cut instead of recursing forever.

use crate::arguments::ArgumentDescriptor;
use crate::callables::{CallableDescriptor, CallableOptions, CallableType};
use crate::config::AutodocConfig;
use crate::descriptor::{Describe, DescriptorKind};
use crate::diagnostics::{EtchError, EtchResult};
use crate::docstring::Docstring;
use crate::properties::PropertyDescriptor;
use crate::raises::{extract_attributes, extract_examples};
use pydoc_weld::{MemberRef, ObjectGraph, ObjectId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// A documented class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Class name
    pub name: String,

    /// First paragraph of the class docstring
    pub summary: Option<String>,

    /// Remaining docstring prose
    pub description: Option<String>,

    /// The class called as a constructor
    pub constructor: CallableDescriptor,

    /// Attributes declared in the docstring
    pub attributes: Vec<ArgumentDescriptor>,

    /// Properties and named-tuple fields
    pub properties: Vec<PropertyDescriptor>,

    /// Methods bound to the class
    pub class_methods: Vec<CallableDescriptor>,

    /// Instance methods and static methods
    pub methods: Vec<CallableDescriptor>,

    /// Docstring examples, absent when there are none
    pub examples: Option<Vec<String>>,

    /// Importing module when reached through one, else the defining module
    pub module: String,

    /// Package of the defining module
    pub package: Option<String>,

    /// Source file relative to the snapshot's search paths
    pub file: Option<String>,

    /// Direct bases other than `object`
    pub bases: Vec<ClassDescriptor>,
}

impl ClassDescriptor {
    /// Build the descriptor of a class
    ///
    /// `importing_module` overrides the reported module, as when a module
    /// documents a class it re-exports.
    pub fn create(
        graph: &ObjectGraph,
        class: ObjectId,
        config: &AutodocConfig,
        importing_module: Option<&str>,
    ) -> EtchResult<Self> {
        Self::build(graph, class, config, importing_module, &mut Vec::new())
    }

    pub(crate) fn build(
        graph: &ObjectGraph,
        id: ObjectId,
        config: &AutodocConfig,
        importing_module: Option<&str>,
        ancestry: &mut Vec<ObjectId>,
    ) -> EtchResult<Self> {
        let class = graph
            .as_class(id)
            .ok_or_else(|| EtchError::unexpected_kind(graph, id, "class"))?;
        debug!(class = %class.qualname, "describing class");

        let is_named_tuple = graph.is_named_tuple_type(id);

        let mut members = graph.getmembers(id);
        if config.ignore_inherited {
            let own = graph.own_member_names(id);
            members.retain(|(name, _)| own.contains(name.as_str()));
        }

        let doc_source = if config.class_from_init && !is_named_tuple {
            graph
                .getattr(id, "__init__")
                .map(|init| init.id())
                .unwrap_or(id)
        } else {
            id
        };
        let docstring = Docstring::parse_opt(graph.getdoc(doc_source).as_deref());

        let constructor = CallableDescriptor::create(
            graph,
            id,
            CallableOptions::new(CallableType::Constructor)
                .prefer_docstring(config.prefer_docstring)
                .qualifier(class.module.clone())
                .docstring(docstring.clone()),
        )?;

        let mut properties = Vec::new();
        let mut methods = Vec::new();
        let mut class_methods = Vec::new();
        let field_names = graph.named_tuple_fields(id).unwrap_or_default();

        for (name, member) in &members {
            if name == "__init__" || config.hides(name) {
                continue;
            }
            let method_options = |role| {
                CallableOptions::new(role)
                    .prefer_docstring(config.prefer_docstring)
                    .qualifier(class.qualname.clone())
            };
            match *member {
                MemberRef::Object(mid)
                    if graph.is_property(mid) || field_names.contains(&name.as_str()) =>
                {
                    properties.push(PropertyDescriptor::create(graph, mid, id, name)?);
                }
                MemberRef::Object(mid) if graph.is_function(mid) => {
                    methods.push(CallableDescriptor::create(
                        graph,
                        mid,
                        method_options(CallableType::Method),
                    )?);
                }
                MemberRef::StaticFunction(fid) => {
                    methods.push(CallableDescriptor::create(
                        graph,
                        fid,
                        method_options(CallableType::Function),
                    )?);
                }
                MemberRef::BoundMethod(fid) => {
                    class_methods.push(CallableDescriptor::create(
                        graph,
                        fid,
                        method_options(CallableType::ClassMethod),
                    )?);
                }
                MemberRef::Object(mid) => {
                    trace!(class = %class.qualname, member = %name, id = %mid, "skipping member");
                }
            }
        }

        let root = graph.root_object();
        let mut bases = Vec::new();
        ancestry.push(id);
        for base in class.bases.iter().copied().filter(|base| *base != root) {
            if ancestry.contains(&base) {
                warn!(
                    class = %class.qualname,
                    base = graph.qualname(base).unwrap_or("?"),
                    "base class cycle, skipping repeated base"
                );
                continue;
            }
            match Self::build(graph, base, config, importing_module, ancestry) {
                Ok(descriptor) => bases.push(descriptor),
                Err(err) => {
                    ancestry.pop();
                    return Err(err);
                }
            }
        }
        ancestry.pop();

        let module_object = graph.module_of(id).and_then(|m| graph.as_module(m));

        Ok(Self {
            name: class.qualname.clone(),
            summary: docstring.short_description.clone(),
            description: docstring.long_description.clone(),
            constructor,
            attributes: extract_attributes(&docstring),
            properties,
            class_methods,
            methods,
            examples: extract_examples(&docstring),
            module: importing_module.unwrap_or(&class.module).to_string(),
            package: module_object.and_then(|m| m.package.clone()),
            file: graph.make_file_relative(module_object.and_then(|m| m.file.as_deref())),
            bases,
        })
    }

    /// Names of the documented methods, class methods and properties
    pub fn member_names(&self) -> Vec<&str> {
        self.methods
            .iter()
            .chain(&self.class_methods)
            .map(|m| m.name.as_str())
            .chain(self.properties.iter().map(|p| p.name.as_str()))
            .collect()
    }
}

impl Describe for ClassDescriptor {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::DefaultValue;
    use crate::test::mock_module;
    use pretty_assertions::assert_eq;
    use pydoc_weld::{ClassObject, FunctionObject, Parameter, Signature, Value};

    fn all_members() -> AutodocConfig {
        AutodocConfig::default().with_ignore_inherited(false)
    }

    #[test]
    fn test_mock_class() {
        let mock = mock_module().unwrap();
        let desc = ClassDescriptor::create(&mock.graph, mock.mock_class, &all_members(), None)
            .unwrap();
        assert_eq!(desc.name, "MockClass");
        assert_eq!(desc.summary.as_deref(), Some("A mock class"));
        assert_eq!(desc.module, "mocks");
        assert_eq!(desc.file.as_deref(), Some("mocks.py"));
        assert!(desc.bases.is_empty());

        assert_eq!(desc.constructor.callable_type, CallableType::Constructor);
        assert_eq!(desc.constructor.qualifier, "mocks");
        assert_eq!(desc.constructor.return_type, "None");
        assert_eq!(desc.constructor.arguments.len(), 1);

        let methods: Vec<_> = desc.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, vec!["an_instance_method", "create", "stream"]);
        assert!(desc.methods.iter().all(|m| m.qualifier == "MockClass"));

        assert_eq!(desc.class_methods.len(), 1);
        let class_method = &desc.class_methods[0];
        assert_eq!(class_method.name, "a_class_method");
        assert_eq!(class_method.callable_type, CallableType::ClassMethod);
        assert_eq!(class_method.return_type, "Optional[str]");
        assert_eq!(class_method.arguments[0].type_.as_deref(), Some("int"));
    }

    #[test]
    fn test_static_method_keeps_first_parameter() {
        let mock = mock_module().unwrap();
        let desc = ClassDescriptor::create(&mock.graph, mock.mock_class, &all_members(), None)
            .unwrap();
        let create = desc.methods.iter().find(|m| m.name == "create").unwrap();
        assert_eq!(create.callable_type, CallableType::Function);
        assert_eq!(create.arguments[0].name, "value");
        assert_eq!(create.return_type, "MockClass");
    }

    #[test]
    fn test_async_generator_method_markers() {
        let mock = mock_module().unwrap();
        let desc = ClassDescriptor::create(&mock.graph, mock.mock_class, &all_members(), None)
            .unwrap();
        let stream = desc.methods.iter().find(|m| m.name == "stream").unwrap();
        assert_eq!(stream.callable_type_description(), "async generator method");
        let names: Vec<_> = stream.arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["*items", "*", "limit"]);
        assert_eq!(stream.arguments[2].default, DefaultValue::Value(Value::Int(10)));
    }

    #[test]
    fn test_dunder_and_private_filters() {
        let mock = mock_module().unwrap();
        let desc = ClassDescriptor::create(&mock.graph, mock.mock_class, &all_members(), None)
            .unwrap();
        let names = desc.member_names();
        assert!(!names.contains(&"__repr__"));
        assert!(!names.contains(&"_helper"));
        assert!(!names.contains(&"__init__"));

        let config = all_members().with_ignore_private(false).with_ignore_dunder(false);
        let desc = ClassDescriptor::create(&mock.graph, mock.mock_class, &config, None).unwrap();
        let names = desc.member_names();
        assert!(names.contains(&"__repr__"));
        assert!(names.contains(&"_helper"));
        assert!(!names.contains(&"__init__"));
    }

    #[test]
    fn test_class_from_init() {
        let mock = mock_module().unwrap();
        let config = all_members().with_class_from_init(true);
        let desc = ClassDescriptor::create(&mock.graph, mock.mock_class, &config, None).unwrap();
        assert_eq!(desc.summary.as_deref(), Some("Initialise the class"));
        assert_eq!(
            desc.constructor.arguments[0].description.as_deref(),
            Some("The first arg")
        );
    }

    #[test]
    fn test_named_tuple_class() {
        let mock = mock_module().unwrap();
        let config = all_members().with_class_from_init(true);
        let desc = ClassDescriptor::create(&mock.graph, mock.mock_named_tuple, &config, None)
            .unwrap();
        assert_eq!(desc.summary.as_deref(), Some("A named tuple"));
        let fields: Vec<_> = desc.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            fields,
            vec!["optional_int", "optional_int_with_default", "str_arg", "str_with_default"]
        );
        assert!(desc.properties.iter().all(|p| !p.is_settable));
        assert!(desc.bases.iter().all(|b| b.name != "object"));

        let ctor = &desc.constructor;
        assert_eq!(ctor.arguments.len(), 4);
        assert_eq!(ctor.arguments[2].default, DefaultValue::Text("'string'".into()));
        assert_eq!(ctor.arguments[3].default, DefaultValue::Text("None".into()));
        assert_eq!(ctor.arguments[1].description.as_deref(), Some("An optional int argument"));
    }

    #[test]
    fn test_ignore_inherited() {
        let mock = mock_module().unwrap();
        let config = AutodocConfig::default().with_ignore_inherited(true);
        let desc = ClassDescriptor::create(&mock.graph, mock.mock_derived, &config, None).unwrap();
        let names: Vec<_> = desc.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["derived_method", "shared"]);
        let shared = desc.methods.iter().find(|m| m.name == "shared").unwrap();
        assert_eq!(shared.summary.as_deref(), Some("Documented on the base"));

        let desc = ClassDescriptor::create(&mock.graph, mock.mock_derived, &all_members(), None)
            .unwrap();
        let names: Vec<_> = desc.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["base_method", "derived_method", "shared"]);
    }

    #[test]
    fn test_bases_exclude_root_and_propagate_module() {
        let mock = mock_module().unwrap();
        let desc =
            ClassDescriptor::create(&mock.graph, mock.mock_derived, &all_members(), Some("facade"))
                .unwrap();
        assert_eq!(desc.module, "facade");
        assert_eq!(desc.bases.len(), 1);
        let base = &desc.bases[0];
        assert_eq!(base.name, "MockBase");
        assert_eq!(base.module, "facade");
        assert!(base.bases.is_empty());
    }

    #[test]
    fn test_attributes_and_examples_from_docstring() {
        let mock = mock_module().unwrap();
        let desc =
            ClassDescriptor::create(&mock.graph, mock.mock_properties, &all_members(), None)
                .unwrap();
        assert_eq!(
            desc.attributes,
            vec![ArgumentDescriptor::new("count", Some("int".into()), Some("A counter".into()))]
        );
        assert_eq!(desc.examples, Some(vec![">>> MockProperties().value\n1".to_string()]));
        let names: Vec<_> = desc.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cache", "label", "value"]);
    }

    #[test]
    fn test_cyclic_bases_terminate() {
        let mut graph = ObjectGraph::new();
        let a_id = ObjectId(graph.len());
        let b_id = ObjectId(graph.len() + 1);
        graph.add_class(ClassObject::new("A", "m").with_base(b_id));
        graph.add_class(ClassObject::new("B", "m").with_base(a_id));
        let method = graph.add_function(
            FunctionObject::new("run", "m")
                .with_qualname("A.run")
                .with_signature(Signature::new().with_param(Parameter::new("self"))),
        );
        graph.bind(a_id, "run", method).unwrap();

        let desc = ClassDescriptor::create(&graph, a_id, &all_members(), None).unwrap();
        assert_eq!(desc.bases.len(), 1);
        assert_eq!(desc.bases[0].name, "B");
        assert!(desc.bases[0].bases.is_empty());
    }

    #[test]
    fn test_diamond_is_expanded_per_parent() {
        let mut graph = ObjectGraph::new();
        let root = graph.root_object();
        let a = graph.add_class(ClassObject::new("A", "m").with_base(root));
        let b = graph.add_class(ClassObject::new("B", "m").with_base(a));
        let c = graph.add_class(ClassObject::new("C", "m").with_base(a));
        let d = graph.add_class(ClassObject::new("D", "m").with_base(b).with_base(c));

        let desc = ClassDescriptor::create(&graph, d, &all_members(), None).unwrap();
        let grandparents: Vec<_> = desc
            .bases
            .iter()
            .flat_map(|base| base.bases.iter().map(|g| g.name.as_str()))
            .collect();
        assert_eq!(grandparents, vec!["A", "A"]);
    }

    #[test]
    fn test_rejects_non_class() {
        let mock = mock_module().unwrap();
        let err = ClassDescriptor::create(&mock.graph, mock.mock_func, &all_members(), None)
            .unwrap_err();
        assert!(matches!(err, EtchError::UnexpectedKind { expected: "class", .. }));
    }
}
