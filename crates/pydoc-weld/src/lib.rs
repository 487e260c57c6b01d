//! pydoc-weld: reflection snapshot IR for Python autodoc
//!
//! This crate holds an immutable snapshot of introspected Python objects
//! (modules, classes, functions, properties and plain values) together with
//! the queries a documentation builder needs: docstrings, signatures, method
//! resolution order, own namespaces, `__all__`, named-tuple fields and the
//! module registry used for import resolution.
//!
//! # Architecture
//!
//! - `ir`: object graph, signatures, values and the `inspect`-style queries
//! - `error`: loading and validation errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use pydoc_weld::ObjectGraph;
//!
//! let graph = ObjectGraph::from_file("snapshot.json")?;
//! let module = graph.module("example").expect("module is registered");
//! for (name, member) in graph.getmembers(module) {
//!     println!("{name}: {member:?}");
//! }
//! ```

pub mod error;
pub mod ir;

// Re-export commonly used types
pub use error::{WeldError, WeldResult};
pub use ir::{
    clean_doc, Annotation, ClassObject, FunctionFlavor, FunctionObject, MemberRef, ModuleObject,
    ObjectGraph, ObjectId, Parameter, ParameterKind, PropertyObject, PyObject, Signature, Value,
};
