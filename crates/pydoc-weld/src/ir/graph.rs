//! The object graph
//!
//! `ObjectGraph` owns every introspected object and the module registry
//! (the `sys.modules` analogue). It is assembled once, either from a JSON
//! snapshot or through the `add_*`/`bind` methods, and then only read.

use crate::error::{WeldError, WeldResult};
use crate::ir::object::{
    ClassObject, FunctionObject, ModuleObject, ObjectId, PropertyObject, PyObject,
};
use crate::ir::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::path::Path;

/// Module holding the builtin classes
pub const BUILTINS_MODULE: &str = "builtins";

/// An immutable snapshot of introspected Python objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectGraph {
    /// Arena of objects, indexed by `ObjectId`
    objects: Vec<PyObject>,

    /// Importable modules by dotted name
    #[serde(default)]
    modules: IndexMap<String, ObjectId>,

    /// Modules whose import fails, mapped to the dependency that is missing
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    broken_imports: IndexMap<String, String>,

    /// Path prefixes used to make source files relative (`sys.path`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    search_paths: Vec<String>,

    #[serde(skip, default = "ObjectId::root")]
    root_object: ObjectId,

    #[serde(skip, default = "ObjectId::tuple")]
    tuple_type: ObjectId,
}

impl ObjectId {
    fn root() -> Self {
        ObjectId(0)
    }

    fn tuple() -> Self {
        ObjectId(1)
    }
}

impl Default for ObjectGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectGraph {
    /// Create a graph holding only the builtin `object` and `tuple` classes
    pub fn new() -> Self {
        let mut graph = Self {
            objects: Vec::new(),
            modules: IndexMap::new(),
            broken_imports: IndexMap::new(),
            search_paths: Vec::new(),
            root_object: ObjectId::root(),
            tuple_type: ObjectId::tuple(),
        };
        graph.locate_builtins();
        graph
    }

    /// Load and validate a graph from JSON text
    pub fn from_json(json: &str) -> WeldResult<Self> {
        let mut graph: ObjectGraph = serde_json::from_str(json)?;
        graph.locate_builtins();
        graph.validate()?;
        Ok(graph)
    }

    /// Load and validate a graph from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> WeldResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WeldError::SnapshotNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the graph to pretty JSON
    pub fn to_json(&self) -> WeldResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every reference and registry entry points at a real object
    pub fn validate(&self) -> WeldResult<()> {
        let len = self.objects.len();
        for (index, object) in self.objects.iter().enumerate() {
            if let Some(missing) = object.references().into_iter().find(|id| id.0 >= len) {
                return Err(WeldError::DanglingObject {
                    from: index,
                    missing: missing.0,
                    len,
                });
            }
        }
        for (name, id) in &self.modules {
            match self.get(*id) {
                Some(PyObject::Module(_)) => {}
                _ => return Err(WeldError::NotAModule(name.clone())),
            }
        }
        Ok(())
    }

    // Snapshots may omit the builtins; they are appended so ids stay stable.
    fn locate_builtins(&mut self) {
        self.root_object = match self.find_builtin_class("object") {
            Some(id) => id,
            None => self.insert(PyObject::Class(ClassObject::new("object", BUILTINS_MODULE))),
        };
        self.tuple_type = match self.find_builtin_class("tuple") {
            Some(id) => id,
            None => {
                let root = self.root_object;
                self.insert(PyObject::Class(
                    ClassObject::new("tuple", BUILTINS_MODULE).with_base(root),
                ))
            }
        };
    }

    fn find_builtin_class(&self, name: &str) -> Option<ObjectId> {
        self.objects.iter().position(|object| {
            matches!(object, PyObject::Class(c) if c.module == BUILTINS_MODULE && c.name == name)
        })
        .map(ObjectId)
    }

    /// Add any object
    pub fn insert(&mut self, object: PyObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Add a module and register it for import
    pub fn add_module(&mut self, module: ModuleObject) -> ObjectId {
        let name = module.name.clone();
        let id = self.insert(PyObject::Module(module));
        self.modules.insert(name, id);
        id
    }

    /// Add a class
    pub fn add_class(&mut self, class: ClassObject) -> ObjectId {
        self.insert(PyObject::Class(class))
    }

    /// Add a function
    pub fn add_function(&mut self, function: FunctionObject) -> ObjectId {
        self.insert(PyObject::Function(function))
    }

    /// Add a property
    pub fn add_property(&mut self, property: PropertyObject) -> ObjectId {
        self.insert(PyObject::Property(property))
    }

    /// Add a `classmethod` wrapper around a function
    pub fn add_class_method(&mut self, function: ObjectId) -> ObjectId {
        self.insert(PyObject::ClassMethod { function })
    }

    /// Add a `staticmethod` wrapper around a function
    pub fn add_static_method(&mut self, function: ObjectId) -> ObjectId {
        self.insert(PyObject::StaticMethod { function })
    }

    /// Add a plain value
    pub fn add_value(&mut self, value: Value) -> ObjectId {
        self.insert(PyObject::Value { value })
    }

    /// Bind `name` to `member` in a module's attributes or a class's namespace
    pub fn bind(&mut self, owner: ObjectId, name: &str, member: ObjectId) -> WeldResult<()> {
        match self.objects.get_mut(owner.0) {
            Some(PyObject::Module(m)) => {
                m.members.insert(name.to_string(), member);
                Ok(())
            }
            Some(PyObject::Class(c)) => {
                c.namespace.insert(name.to_string(), member);
                Ok(())
            }
            other => Err(WeldError::NotANamespace {
                id: owner.0,
                name: name.to_string(),
                kind: other.map(|o| o.kind_name()).unwrap_or("missing object"),
            }),
        }
    }

    /// Record that importing `module` fails because `missing` cannot be found
    pub fn add_broken_import(&mut self, module: impl Into<String>, missing: impl Into<String>) {
        self.broken_imports.insert(module.into(), missing.into());
    }

    /// Add a search path prefix
    pub fn add_search_path(&mut self, path: impl Into<String>) {
        self.search_paths.push(path.into());
    }

    /// Number of objects in the graph
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the graph holds no objects (never true once builtins exist)
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look an object up by id
    pub fn get(&self, id: ObjectId) -> Option<&PyObject> {
        self.objects.get(id.0)
    }

    /// Look a registered module up by dotted name
    pub fn module(&self, name: &str) -> Option<ObjectId> {
        self.modules.get(name).copied()
    }

    /// Names of every registered module
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// The missing dependency recorded for a module that fails to import
    pub fn broken_import(&self, name: &str) -> Option<&str> {
        self.broken_imports.get(name).map(String::as_str)
    }

    /// Every module that fails to import, with its missing dependency
    pub fn broken_imports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.broken_imports
            .iter()
            .map(|(module, missing)| (module.as_str(), missing.as_str()))
    }

    /// Search path prefixes
    pub fn search_paths(&self) -> &[String] {
        &self.search_paths
    }

    /// The universal root base, `builtins.object`
    pub fn root_object(&self) -> ObjectId {
        self.root_object
    }

    /// `builtins.tuple`
    pub fn tuple_type(&self) -> ObjectId {
        self.tuple_type
    }

    /// Borrow a module
    pub fn as_module(&self, id: ObjectId) -> Option<&ModuleObject> {
        match self.get(id) {
            Some(PyObject::Module(m)) => Some(m),
            _ => None,
        }
    }

    /// Borrow a class
    pub fn as_class(&self, id: ObjectId) -> Option<&ClassObject> {
        match self.get(id) {
            Some(PyObject::Class(c)) => Some(c),
            _ => None,
        }
    }

    /// Borrow a function
    pub fn as_function(&self, id: ObjectId) -> Option<&FunctionObject> {
        match self.get(id) {
            Some(PyObject::Function(f)) => Some(f),
            _ => None,
        }
    }

    /// Borrow a property
    pub fn as_property(&self, id: ObjectId) -> Option<&PropertyObject> {
        match self.get(id) {
            Some(PyObject::Property(p)) => Some(p),
            _ => None,
        }
    }

    /// Borrow a plain value
    pub fn as_value(&self, id: ObjectId) -> Option<&Value> {
        match self.get(id) {
            Some(PyObject::Value { value }) => Some(value),
            _ => None,
        }
    }
}

impl Index<ObjectId> for ObjectGraph {
    type Output = PyObject;

    /// Panics on an id from another graph; ids handed out by this graph
    /// and validated snapshots are always in range.
    fn index(&self, id: ObjectId) -> &PyObject {
        &self.objects[id.0]
    }
}
