//! Intermediate Representation (IR) of introspected Python objects
//!
//! This module provides the object graph and the reflection queries the
//! descriptor builders are written against.

pub mod graph;
pub mod inspect;
pub mod object;
pub mod signature;
pub mod value;

pub use graph::*;
pub use inspect::clean_doc;
pub use object::*;
pub use signature::*;
pub use value::*;
