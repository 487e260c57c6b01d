//! pydoc-etch: descriptor builder for Python autodoc
//!
//! This crate turns an introspected Python object (a module, class,
//! function or property held in a pydoc-weld snapshot) into an immutable,
//! renderer-agnostic descriptor tree:
//! - Parsing Google-style and reStructuredText docstrings
//! - Reconciling docstring types with signature annotations
//! - Building argument lists with positional-only and keyword-only markers
//! - Recursing through base classes and, optionally, child modules
//!
//! # Architecture
//!
//! ```text
//!   import path ──► resolve ──► Etcher
//!                                 │
//!                                 ▼
//!                          ModuleDescriptor
//!                                 │
//!                          ClassDescriptor ──► bases
//!                                 │
//!                 ┌───────────────┴───────────────┐
//!                 ▼                               ▼
//!        CallableDescriptor              PropertyDescriptor
//!                 │
//!                 ▼
//!        ArgumentDescriptor
//! ```
//!
//! # Usage
//!
//! ```
//! use pydoc_etch::test::mock_module;
//! use pydoc_etch::{AutodocConfig, Describe, DescriptorKind, Etcher};
//!
//! let mock = mock_module().unwrap();
//! let etcher = Etcher::new(&mock.graph, AutodocConfig::default());
//! let descriptor = etcher.describe("mocks:MockClass").unwrap();
//! assert_eq!(descriptor.kind(), DescriptorKind::Class);
//! ```

// Docstrings and types
pub mod docstring;
pub mod types;

// Descriptors
pub mod arguments;
pub mod callables;
pub mod classes;
pub mod descriptor;
pub mod modules;
pub mod properties;
pub mod raises;

// Resolution and dispatch
pub mod config;
pub mod diagnostics;
pub mod etcher;
pub mod resolve;

// Re-exports for convenience
pub use arguments::{build_arguments, ArgumentDescriptor, DefaultValue};
pub use callables::{CallableDescriptor, CallableOptions, CallableType};
pub use classes::ClassDescriptor;
pub use config::AutodocConfig;
pub use descriptor::{Describe, Descriptor, DescriptorKind};
pub use diagnostics::{EtchError, EtchResult};
pub use docstring::Docstring;
pub use etcher::{load_snapshot, Etcher};
pub use modules::ModuleDescriptor;
pub use properties::PropertyDescriptor;
pub use raises::RaisesDescriptor;
pub use resolve::{import_from_string, Resolved};
pub use types::resolve_type_name;
