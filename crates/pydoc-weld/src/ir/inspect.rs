//! Reflection queries over the object graph
//!
//! These mirror the parts of Python's `inspect` module a documentation
//! builder relies on. They never fail: a query that does not apply to an
//! object's kind answers `None`, `false` or an empty collection.

use crate::ir::graph::ObjectGraph;
use crate::ir::object::{MemberRef, ObjectId, PyObject};
use crate::ir::signature::Annotation;
use std::collections::{BTreeMap, HashSet};

/// Clean up indentation from a docstring, like `inspect.cleandoc`
///
/// The first line loses its leading whitespace, the common indentation of
/// the remaining lines is removed and blank lines at either end are dropped.
pub fn clean_doc(doc: &str) -> String {
    let expanded = doc.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let margin = lines[1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    cleaned.push(lines[0].trim_start());
    for line in &lines[1..] {
        match (line.get(..margin), line.get(margin..)) {
            (Some(indent), Some(rest)) if indent.trim().is_empty() => cleaned.push(rest),
            _ => cleaned.push(line.trim_start()),
        }
    }

    while cleaned.first().is_some_and(|l| l.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }

    cleaned
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

impl ObjectGraph {
    /// `inspect.ismodule`
    pub fn is_module(&self, id: ObjectId) -> bool {
        matches!(self.get(id), Some(PyObject::Module(_)))
    }

    /// `inspect.isclass`
    pub fn is_class(&self, id: ObjectId) -> bool {
        matches!(self.get(id), Some(PyObject::Class(_)))
    }

    /// `inspect.isfunction`
    pub fn is_function(&self, id: ObjectId) -> bool {
        matches!(self.get(id), Some(PyObject::Function(_)))
    }

    /// `isinstance(obj, property)`
    pub fn is_property(&self, id: ObjectId) -> bool {
        matches!(self.get(id), Some(PyObject::Property(_)))
    }

    /// `__name__`
    pub fn name(&self, id: ObjectId) -> Option<&str> {
        match self.get(id)? {
            PyObject::Module(m) => Some(&m.name),
            PyObject::Class(c) => Some(&c.name),
            PyObject::Function(f) => Some(&f.name),
            PyObject::ClassMethod { function } | PyObject::StaticMethod { function } => {
                self.name(*function)
            }
            PyObject::Property(_) | PyObject::Value { .. } => None,
        }
    }

    /// `__qualname__`, falling back to `__name__`
    pub fn qualname(&self, id: ObjectId) -> Option<&str> {
        match self.get(id)? {
            PyObject::Class(c) => Some(&c.qualname),
            PyObject::Function(f) => Some(&f.qualname),
            PyObject::ClassMethod { function } | PyObject::StaticMethod { function } => {
                self.qualname(*function)
            }
            _ => self.name(id),
        }
    }

    /// `__module__` (a module answers with its own name)
    pub fn module_name(&self, id: ObjectId) -> Option<&str> {
        match self.get(id)? {
            PyObject::Module(m) => Some(&m.name),
            PyObject::Class(c) => Some(&c.module),
            PyObject::Function(f) => Some(&f.module),
            PyObject::ClassMethod { function } | PyObject::StaticMethod { function } => {
                self.module_name(*function)
            }
            PyObject::Property(p) => p.fget.and_then(|fget| self.module_name(fget)),
            PyObject::Value { .. } => None,
        }
    }

    /// `inspect.getmodule`: the registered module an object was defined in
    pub fn module_of(&self, id: ObjectId) -> Option<ObjectId> {
        match self.get(id)? {
            PyObject::Module(_) => Some(id),
            _ => self.module(self.module_name(id)?),
        }
    }

    /// `inspect.getdoc`: the cleaned docstring
    ///
    /// Classes without a docstring inherit the first one found along their
    /// MRO, methods the one from the same-named method of a base class, and
    /// properties fall back to their getter's docstring.
    pub fn getdoc(&self, id: ObjectId) -> Option<String> {
        let raw = match self.get(id)? {
            PyObject::Module(m) => m.doc.clone(),
            PyObject::Class(c) => c.doc.clone().or_else(|| self.inherited_class_doc(id)),
            PyObject::Function(f) => f.doc.clone().or_else(|| self.inherited_method_doc(id)),
            PyObject::ClassMethod { function } | PyObject::StaticMethod { function } => {
                return self.getdoc(*function);
            }
            PyObject::Property(p) => match (&p.doc, p.fget) {
                (Some(doc), _) => Some(doc.clone()),
                (None, Some(fget)) => return self.getdoc(fget),
                (None, None) => None,
            },
            PyObject::Value { .. } => None,
        };
        raw.map(|doc| clean_doc(&doc))
    }

    fn inherited_class_doc(&self, class: ObjectId) -> Option<String> {
        let root = self.root_object();
        self.mro(class)
            .into_iter()
            .skip(1)
            .filter(|base| *base != root)
            .find_map(|base| self.as_class(base).and_then(|c| c.doc.clone()))
    }

    fn inherited_method_doc(&self, function: ObjectId) -> Option<String> {
        let func = self.as_function(function)?;
        let (owner_path, _) = func.qualname.rsplit_once('.')?;
        let mut owner = self.module(&func.module)?;
        for segment in owner_path.split('.') {
            owner = self.getattr(owner, segment)?.id();
        }
        if !self.is_class(owner) {
            return None;
        }
        self.mro(owner).into_iter().skip(1).find_map(|base| {
            let member = self.as_class(base)?.namespace.get(&func.name)?;
            let inherited = match self.get(*member)? {
                PyObject::Function(f) => f,
                PyObject::ClassMethod { function } | PyObject::StaticMethod { function } => {
                    self.as_function(*function)?
                }
                _ => return None,
            };
            inherited.doc.clone()
        })
    }

    /// Method resolution order of a class (C3), starting with the class
    ///
    /// An inconsistent hierarchy falls back to depth-first order and cyclic
    /// bases in a malformed snapshot are cut, so this always terminates.
    pub fn mro(&self, class: ObjectId) -> Vec<ObjectId> {
        self.linearize(class, &mut Vec::new())
    }

    fn linearize(&self, class: ObjectId, path: &mut Vec<ObjectId>) -> Vec<ObjectId> {
        if path.contains(&class) {
            return Vec::new();
        }
        let bases = match self.as_class(class) {
            Some(c) => c.bases.clone(),
            None => return Vec::new(),
        };

        path.push(class);
        let mut sequences: Vec<Vec<ObjectId>> = bases
            .iter()
            .map(|base| self.linearize(*base, path))
            .collect();
        path.pop();
        sequences.push(bases);

        let tail = c3_merge(sequences.clone())
            .unwrap_or_else(|| sequences.into_iter().flatten().collect());

        // A cut cycle can bring the class back in its own tail.
        let mut order = vec![class];
        for id in tail {
            if !order.contains(&id) {
                order.push(id);
            }
        }
        order
    }

    /// `inspect.getmembers`: name-sorted attributes
    ///
    /// Class members are collected along the MRO, nearest definition first.
    pub fn getmembers(&self, id: ObjectId) -> Vec<(String, MemberRef)> {
        let mut members: BTreeMap<String, MemberRef> = BTreeMap::new();
        match self.get(id) {
            Some(PyObject::Module(m)) => {
                for (name, member) in &m.members {
                    members.insert(name.clone(), MemberRef::Object(*member));
                }
            }
            Some(PyObject::Class(_)) => {
                for class in self.mro(id) {
                    let Some(c) = self.as_class(class) else {
                        continue;
                    };
                    for (name, member) in &c.namespace {
                        members
                            .entry(name.clone())
                            .or_insert_with(|| self.resolve_member(*member));
                    }
                }
            }
            _ => {}
        }
        members.into_iter().collect()
    }

    /// Names declared directly on a class: its own namespace and slots
    pub fn own_member_names(&self, class: ObjectId) -> HashSet<&str> {
        match self.as_class(class) {
            Some(c) => c
                .namespace
                .keys()
                .map(String::as_str)
                .chain(c.slots.iter().map(String::as_str))
                .collect(),
            None => HashSet::new(),
        }
    }

    /// `getattr(obj, name)` on a module or class
    pub fn getattr(&self, id: ObjectId, name: &str) -> Option<MemberRef> {
        match self.get(id)? {
            PyObject::Module(m) => m.members.get(name).map(|member| MemberRef::Object(*member)),
            PyObject::Class(_) => self.mro(id).into_iter().find_map(|class| {
                let member = self.as_class(class)?.namespace.get(name)?;
                Some(self.resolve_member(*member))
            }),
            _ => None,
        }
    }

    fn resolve_member(&self, member: ObjectId) -> MemberRef {
        match self.get(member) {
            Some(PyObject::ClassMethod { function }) => MemberRef::BoundMethod(*function),
            Some(PyObject::StaticMethod { function }) => MemberRef::StaticFunction(*function),
            _ => MemberRef::Object(member),
        }
    }

    /// Whether a class is a named tuple
    ///
    /// It must list `tuple` among its direct bases and expose `_fields` as a
    /// tuple made only of strings.
    pub fn is_named_tuple_type(&self, id: ObjectId) -> bool {
        self.named_tuple_fields(id).is_some()
    }

    /// The `_fields` of a named tuple
    pub fn named_tuple_fields(&self, id: ObjectId) -> Option<Vec<&str>> {
        let class = self.as_class(id)?;
        if !class.bases.contains(&self.tuple_type()) {
            return None;
        }
        let fields = self.getattr(id, "_fields")?;
        let items = self.as_value(fields.id())?.as_tuple()?;
        items.iter().map(|item| item.as_str()).collect()
    }

    /// Declared type of a class field (`__annotations__` along the MRO)
    pub fn field_annotation(&self, class: ObjectId, name: &str) -> Annotation {
        self.mro(class)
            .into_iter()
            .find_map(|c| self.as_class(c)?.annotations.get(name).cloned())
            .unwrap_or_default()
    }

    /// Whether `child` is a module whose package lies under `parent`'s
    pub fn is_child_module(&self, parent: ObjectId, child: ObjectId) -> bool {
        let (Some(parent), Some(child)) = (self.as_module(parent), self.as_module(child)) else {
            return false;
        };
        let parent_package = parent.package.as_deref().unwrap_or("");
        child
            .package
            .as_deref()
            .unwrap_or("")
            .starts_with(parent_package)
    }

    /// The function whose signature describes calling the class
    ///
    /// The first `__new__` or `__init__` found along the MRO, skipping the
    /// root `object`.
    pub fn constructor_function(&self, class: ObjectId) -> Option<ObjectId> {
        let root = self.root_object();
        self.mro(class)
            .into_iter()
            .filter(|c| *c != root)
            .find_map(|c| {
                let namespace = &self.as_class(c)?.namespace;
                ["__new__", "__init__"].iter().find_map(|dunder| {
                    let member = self.resolve_member(*namespace.get(*dunder)?);
                    self.as_function(member.id()).map(|_| member.id())
                })
            })
    }

    /// Strip the first matching search path from a source file
    pub fn make_file_relative(&self, file: Option<&str>) -> Option<String> {
        let file = file?;
        for path in self.search_paths().iter().filter(|p| !p.is_empty()) {
            if let Some(rest) = file.strip_prefix(path.as_str()) {
                return Some(rest.trim_start_matches(['/', '\\']).to_string());
            }
        }
        Some(file.to_string())
    }
}

fn c3_merge(mut sequences: Vec<Vec<ObjectId>>) -> Option<Vec<ObjectId>> {
    let mut merged = Vec::new();
    loop {
        sequences.retain(|s| !s.is_empty());
        if sequences.is_empty() {
            return Some(merged);
        }
        let head = sequences
            .iter()
            .map(|s| s[0])
            .find(|candidate| !sequences.iter().any(|s| s[1..].contains(candidate)))?;
        merged.push(head);
        for sequence in sequences.iter_mut() {
            if sequence[0] == head {
                sequence.remove(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::object::{ClassObject, FunctionObject, ModuleObject, PropertyObject};
    use crate::ir::signature::{Parameter, Signature};
    use crate::ir::value::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_doc() {
        let doc = "The short description\n\n    The long description\n\n    Args:\n        x (int): value\n    ";
        assert_eq!(
            clean_doc(doc),
            "The short description\n\nThe long description\n\nArgs:\n    x (int): value"
        );
        assert_eq!(clean_doc("  \n  One line\n"), "One line");
    }

    #[test]
    fn test_mro_diamond_is_c3() {
        let mut graph = ObjectGraph::new();
        let root = graph.root_object();
        let a = graph.add_class(ClassObject::new("A", "m").with_base(root));
        let b = graph.add_class(ClassObject::new("B", "m").with_base(a));
        let c = graph.add_class(ClassObject::new("C", "m").with_base(a));
        let d = graph.add_class(ClassObject::new("D", "m").with_base(b).with_base(c));

        assert_eq!(graph.mro(d), vec![d, b, c, a, root]);
    }

    #[test]
    fn test_mro_survives_cyclic_bases() {
        let mut graph = ObjectGraph::new();
        // A names B as its base before B exists; B then names A.
        let next = ObjectId(graph.len() + 1);
        let a = graph.add_class(ClassObject::new("A", "m").with_base(next));
        let b = graph.add_class(ClassObject::new("B", "m").with_base(a));
        assert_eq!(b, next);
        let order = graph.mro(a);
        assert_eq!(order[0], a);
        assert!(order.len() <= 2);
    }

    #[test]
    fn test_getmembers_merges_bases_and_binds_class_methods() {
        let mut graph = ObjectGraph::new();
        let root = graph.root_object();
        let base = graph.add_class(ClassObject::new("Base", "m").with_base(root));
        let inherited = graph.add_function(FunctionObject::new("inherited", "m"));
        graph.bind(base, "inherited", inherited).unwrap();

        let derived = graph.add_class(ClassObject::new("Derived", "m").with_base(base));
        let func = graph.add_function(FunctionObject::new("make", "m"));
        let wrapper = graph.add_class_method(func);
        graph.bind(derived, "make", wrapper).unwrap();

        let members = graph.getmembers(derived);
        let names: Vec<&str> = members.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["inherited", "make"]);
        assert_eq!(members[1].1, MemberRef::BoundMethod(func));

        let own = graph.own_member_names(derived);
        assert!(own.contains("make"));
        assert!(!own.contains("inherited"));
    }

    #[test]
    fn test_named_tuple_detection() {
        let mut graph = ObjectGraph::new();
        let tuple = graph.tuple_type();
        let root = graph.root_object();
        let point = graph.add_class(ClassObject::new("Point", "m").with_base(tuple));
        let fields = graph.add_value(Value::Tuple(vec![Value::str("x"), Value::str("y")]));
        graph.bind(point, "_fields", fields).unwrap();

        let plain = graph.add_class(ClassObject::new("Plain", "m").with_base(root));
        let bad = graph.add_class(ClassObject::new("Bad", "m").with_base(tuple));
        let bad_fields = graph.add_value(Value::Tuple(vec![Value::str("x"), Value::Int(1)]));
        graph.bind(bad, "_fields", bad_fields).unwrap();
        let func = graph.add_function(FunctionObject::new("f", "m"));

        assert!(graph.is_named_tuple_type(point));
        assert_eq!(graph.named_tuple_fields(point), Some(vec!["x", "y"]));
        assert!(!graph.is_named_tuple_type(plain));
        assert!(!graph.is_named_tuple_type(bad));
        assert!(!graph.is_named_tuple_type(func));
    }

    #[test]
    fn test_getdoc_inherits_and_falls_back() {
        let mut graph = ObjectGraph::new();
        let root = graph.root_object();
        let module = graph.add_module(ModuleObject::new("m"));
        let base = graph.add_class(ClassObject::new("Base", "m").with_base(root).with_doc("Base doc"));
        let base_run = graph.add_function(
            FunctionObject::new("run", "m")
                .with_qualname("Base.run")
                .with_doc("Run it"),
        );
        graph.bind(base, "run", base_run).unwrap();
        let child = graph.add_class(ClassObject::new("Child", "m").with_base(base));
        let child_run = graph.add_function(FunctionObject::new("run", "m").with_qualname("Child.run"));
        graph.bind(child, "run", child_run).unwrap();
        graph.bind(module, "Base", base).unwrap();
        graph.bind(module, "Child", child).unwrap();

        let getter = graph.add_function(FunctionObject::new("size", "m").with_doc("The size"));
        let prop = graph.add_property(PropertyObject {
            fget: Some(getter),
            ..Default::default()
        });

        assert_eq!(graph.getdoc(child).as_deref(), Some("Base doc"));
        assert_eq!(graph.getdoc(child_run).as_deref(), Some("Run it"));
        assert_eq!(graph.getdoc(prop).as_deref(), Some("The size"));
        assert_eq!(graph.getdoc(root), None);
    }

    #[test]
    fn test_constructor_function_prefers_nearest() {
        let mut graph = ObjectGraph::new();
        let root = graph.root_object();
        let base = graph.add_class(ClassObject::new("Base", "m").with_base(root));
        let init = graph.add_function(
            FunctionObject::new("__init__", "m").with_signature(
                Signature::new()
                    .with_param(Parameter::new("self"))
                    .with_param(Parameter::new("x")),
            ),
        );
        graph.bind(base, "__init__", init).unwrap();
        let child = graph.add_class(ClassObject::new("Child", "m").with_base(base));

        assert_eq!(graph.constructor_function(child), Some(init));
        assert_eq!(graph.constructor_function(root), None);
    }

    #[test]
    fn test_child_module_and_relative_file() {
        let mut graph = ObjectGraph::new();
        graph.add_search_path("/site-packages");
        let pkg = graph.add_module(ModuleObject::new("pkg").with_package("pkg"));
        let sub = graph.add_module(ModuleObject::new("pkg.sub").with_package("pkg"));
        let other = graph.add_module(ModuleObject::new("other").with_package("other"));

        assert!(graph.is_child_module(pkg, sub));
        assert!(!graph.is_child_module(pkg, other));
        assert_eq!(
            graph.make_file_relative(Some("/site-packages/pkg/sub.py")).as_deref(),
            Some("pkg/sub.py")
        );
        assert_eq!(
            graph.make_file_relative(Some("/elsewhere/x.py")).as_deref(),
            Some("/elsewhere/x.py")
        );
        assert_eq!(graph.make_file_relative(None), None);
    }
}
