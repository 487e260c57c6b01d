//! Introspected objects
//!
//! Every entity reachable from a module lives in the graph as a `PyObject`
//! and is referred to by `ObjectId`. Identity matters: two names bound to the
//! same class share one id, which is what cycle detection keys on.

use crate::ir::signature::{Annotation, FunctionFlavor, Signature};
use crate::ir::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of an object in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub usize);

impl ObjectId {
    /// Position in the graph's arena
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A module object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleObject {
    /// `__name__`, e.g. "pkg.sub"
    pub name: String,

    /// `__package__`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// `__file__`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// `__doc__`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// `__all__`, when the module declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<String>>,

    /// Module attributes in definition order
    #[serde(default)]
    pub members: IndexMap<String, ObjectId>,
}

impl ModuleObject {
    /// Create a module with no members
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            file: None,
            doc: None,
            all: None,
            members: IndexMap::new(),
        }
    }

    /// Set the package name
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Set the source file
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the docstring
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set `__all__`
    pub fn with_all(mut self, names: &[&str]) -> Self {
        self.all = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }
}

/// A class object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassObject {
    /// `__name__`
    pub name: String,

    /// `__qualname__`
    pub qualname: String,

    /// `__module__`
    pub module: String,

    /// `__doc__`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// `__bases__` in declaration order
    #[serde(default)]
    pub bases: Vec<ObjectId>,

    /// The class's own `__dict__`
    #[serde(default)]
    pub namespace: IndexMap<String, ObjectId>,

    /// `__slots__`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<String>,

    /// `__annotations__` (for named tuples, the field types)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, Annotation>,
}

impl ClassObject {
    /// Create a top-level class in a module
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            qualname: name.clone(),
            name,
            module: module.into(),
            doc: None,
            bases: Vec::new(),
            namespace: IndexMap::new(),
            slots: Vec::new(),
            annotations: IndexMap::new(),
        }
    }

    /// Set the qualified name
    pub fn with_qualname(mut self, qualname: impl Into<String>) -> Self {
        self.qualname = qualname.into();
        self
    }

    /// Set the docstring
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a base class
    pub fn with_base(mut self, base: ObjectId) -> Self {
        self.bases.push(base);
        self
    }

    /// Set `__slots__`
    pub fn with_slots(mut self, slots: &[&str]) -> Self {
        self.slots = slots.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a field annotation
    pub fn with_annotation(mut self, name: impl Into<String>, annotation: Annotation) -> Self {
        self.annotations.insert(name.into(), annotation);
        self
    }
}

/// A function object (plain function, or the function behind a method)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionObject {
    /// `__name__`
    pub name: String,

    /// `__qualname__`, e.g. "MockClass.an_instance_method"
    pub qualname: String,

    /// `__module__`
    pub module: String,

    /// `__doc__`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Declared signature
    #[serde(default)]
    pub signature: Signature,

    /// Plain, coroutine, generator or async generator
    #[serde(default)]
    pub flavor: FunctionFlavor,
}

impl FunctionObject {
    /// Create a top-level function in a module
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            qualname: name.clone(),
            name,
            module: module.into(),
            doc: None,
            signature: Signature::default(),
            flavor: FunctionFlavor::Plain,
        }
    }

    /// Set the qualified name
    pub fn with_qualname(mut self, qualname: impl Into<String>) -> Self {
        self.qualname = qualname.into();
        self
    }

    /// Set the docstring
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the signature
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Set the flavor
    pub fn with_flavor(mut self, flavor: FunctionFlavor) -> Self {
        self.flavor = flavor;
        self
    }
}

/// A `property` object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyObject {
    /// The property's own `__doc__`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Getter function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fget: Option<ObjectId>,

    /// Setter function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fset: Option<ObjectId>,

    /// Deleter function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fdel: Option<ObjectId>,
}

/// Any introspected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PyObject {
    /// A module
    Module(ModuleObject),
    /// A class
    Class(ClassObject),
    /// A function
    Function(FunctionObject),
    /// A `classmethod` wrapper as stored in a class namespace
    ClassMethod { function: ObjectId },
    /// A `staticmethod` wrapper as stored in a class namespace
    StaticMethod { function: ObjectId },
    /// A `property`
    Property(PropertyObject),
    /// Anything else
    Value { value: Value },
}

impl PyObject {
    /// Short kind name, as used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            PyObject::Module(_) => "module",
            PyObject::Class(_) => "class",
            PyObject::Function(_) => "function",
            PyObject::ClassMethod { .. } => "classmethod",
            PyObject::StaticMethod { .. } => "staticmethod",
            PyObject::Property(_) => "property",
            PyObject::Value { .. } => "value",
        }
    }

    /// Ids this object refers to
    pub(crate) fn references(&self) -> Vec<ObjectId> {
        match self {
            PyObject::Module(m) => m.members.values().copied().collect(),
            PyObject::Class(c) => c
                .bases
                .iter()
                .chain(c.namespace.values())
                .copied()
                .collect(),
            PyObject::ClassMethod { function } | PyObject::StaticMethod { function } => {
                vec![*function]
            }
            PyObject::Property(p) => [p.fget, p.fset, p.fdel].into_iter().flatten().collect(),
            PyObject::Function(_) | PyObject::Value { .. } => Vec::new(),
        }
    }
}

/// The result of attribute lookup on a module or class
///
/// Looking a `classmethod` up on its class produces a bound method, and a
/// `staticmethod` produces its plain function, just as `getattr` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRef {
    /// The object itself
    Object(ObjectId),
    /// A function bound to its class
    BoundMethod(ObjectId),
    /// The function behind a `staticmethod`
    StaticFunction(ObjectId),
}

impl MemberRef {
    /// The underlying object id
    pub fn id(&self) -> ObjectId {
        match self {
            MemberRef::Object(id) | MemberRef::BoundMethod(id) | MemberRef::StaticFunction(id) => {
                *id
            }
        }
    }
}
