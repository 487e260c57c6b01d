//! The descriptor tree
//!
//! Every descriptor reports its kind so a renderer can dispatch without
//! knowing concrete types. A root `Descriptor` serializes with the same
//! `kind` tag.

use crate::callables::CallableDescriptor;
use crate::classes::ClassDescriptor;
use crate::diagnostics::EtchResult;
use crate::modules::ModuleDescriptor;
use crate::properties::PropertyDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag shared by all descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    Argument,
    Raises,
    Property,
    Callable,
    Class,
    Module,
}

impl DescriptorKind {
    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKind::Argument => "argument",
            DescriptorKind::Raises => "raises",
            DescriptorKind::Property => "property",
            DescriptorKind::Callable => "callable",
            DescriptorKind::Class => "class",
            DescriptorKind::Module => "module",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every descriptor
pub trait Describe {
    /// The descriptor's kind tag
    fn kind(&self) -> DescriptorKind;
}

/// A root descriptor handed to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    Module(ModuleDescriptor),
    Class(ClassDescriptor),
    Callable(CallableDescriptor),
    Property(PropertyDescriptor),
}

impl Descriptor {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> EtchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to single-line JSON
    pub fn to_compact_json(&self) -> EtchResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The documented entity's name
    pub fn name(&self) -> &str {
        match self {
            Descriptor::Module(m) => &m.name,
            Descriptor::Class(c) => &c.name,
            Descriptor::Callable(c) => &c.name,
            Descriptor::Property(p) => &p.name,
        }
    }
}

impl Describe for Descriptor {
    fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Module(m) => m.kind(),
            Descriptor::Class(c) => c.kind(),
            Descriptor::Callable(c) => c.kind(),
            Descriptor::Property(p) => p.kind(),
        }
    }
}

impl From<ModuleDescriptor> for Descriptor {
    fn from(d: ModuleDescriptor) -> Self {
        Descriptor::Module(d)
    }
}

impl From<ClassDescriptor> for Descriptor {
    fn from(d: ClassDescriptor) -> Self {
        Descriptor::Class(d)
    }
}

impl From<CallableDescriptor> for Descriptor {
    fn from(d: CallableDescriptor) -> Self {
        Descriptor::Callable(d)
    }
}

impl From<PropertyDescriptor> for Descriptor {
    fn from(d: PropertyDescriptor) -> Self {
        Descriptor::Property(d)
    }
}
