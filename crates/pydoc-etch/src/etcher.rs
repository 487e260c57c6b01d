//! Top-level dispatch
//!
//! `Etcher` turns an import path into the root descriptor a renderer
//! consumes, choosing the builder from the kind of object the path names.

use crate::callables::{CallableDescriptor, CallableOptions, CallableType};
use crate::classes::ClassDescriptor;
use crate::config::AutodocConfig;
use crate::descriptor::{Describe, Descriptor};
use crate::diagnostics::{EtchError, EtchResult};
use crate::modules::ModuleDescriptor;
use crate::properties::PropertyDescriptor;
use crate::resolve::{import_from_string, Resolved};
use pydoc_weld::{MemberRef, ObjectGraph, ObjectId, PyObject};
use std::path::Path;
use tracing::debug;

/// Load and validate a snapshot written by the reflection dumper
pub fn load_snapshot(path: impl AsRef<Path>) -> EtchResult<ObjectGraph> {
    let path = path.as_ref();
    let graph = ObjectGraph::from_file(path)?;
    debug!(path = %path.display(), objects = graph.len(), "loaded snapshot");
    Ok(graph)
}

/// Builds descriptors from a snapshot
#[derive(Debug, Clone)]
pub struct Etcher<'g> {
    graph: &'g ObjectGraph,
    config: AutodocConfig,
}

impl<'g> Etcher<'g> {
    /// Create an etcher over a snapshot
    pub fn new(graph: &'g ObjectGraph, config: AutodocConfig) -> Self {
        Self { graph, config }
    }

    /// The configuration in use
    pub fn config(&self) -> &AutodocConfig {
        &self.config
    }

    /// Resolve `path` and describe what it names
    pub fn describe(&self, path: &str) -> EtchResult<Descriptor> {
        let descriptor = match import_from_string(self.graph, path)? {
            Resolved::Module(module) => self.describe_module(module)?,
            Resolved::Member { owner, name, member } => {
                self.describe_member(path, owner, &name, member)?
            }
        };
        debug!(path, kind = %descriptor.kind(), "described");
        Ok(descriptor)
    }

    fn describe_module(&self, module: ObjectId) -> EtchResult<Descriptor> {
        Ok(ModuleDescriptor::create(self.graph, module, &self.config)?.into())
    }

    fn describe_member(
        &self,
        path: &str,
        owner: ObjectId,
        name: &str,
        member: MemberRef,
    ) -> EtchResult<Descriptor> {
        let graph = self.graph;
        let owner_class = graph.as_class(owner);
        let options = |role| {
            let options =
                CallableOptions::new(role).prefer_docstring(self.config.prefer_docstring);
            match owner_class {
                Some(class) => options.qualifier(class.qualname.clone()),
                None => options,
            }
        };

        let id = match member {
            MemberRef::BoundMethod(function) => {
                let descriptor =
                    CallableDescriptor::create(graph, function, options(CallableType::ClassMethod))?;
                return Ok(descriptor.into());
            }
            MemberRef::StaticFunction(function) => {
                let descriptor =
                    CallableDescriptor::create(graph, function, options(CallableType::Function))?;
                return Ok(descriptor.into());
            }
            MemberRef::Object(id) => id,
        };

        // Fields are documented by name, whatever the tuple stores for them
        let is_field = graph
            .named_tuple_fields(owner)
            .is_some_and(|fields| fields.contains(&name));
        if is_field {
            return Ok(PropertyDescriptor::create(graph, id, owner, name)?.into());
        }

        match graph.get(id) {
            Some(PyObject::Module(_)) => self.describe_module(id),
            Some(PyObject::Class(_)) => {
                Ok(ClassDescriptor::create(graph, id, &self.config, None)?.into())
            }
            Some(PyObject::Function(_)) if owner_class.is_some() => {
                Ok(CallableDescriptor::create(graph, id, options(CallableType::Method))?.into())
            }
            Some(PyObject::Function(_)) => Ok(CallableDescriptor::create(
                graph,
                id,
                CallableOptions::new(CallableType::Function)
                    .prefer_docstring(self.config.prefer_docstring),
            )?
            .into()),
            Some(PyObject::Property(_)) if owner_class.is_some() => {
                Ok(PropertyDescriptor::create(graph, id, owner, name)?.into())
            }
            Some(object) => Err(EtchError::UnsupportedEntity {
                path: path.to_string(),
                kind: object.kind_name(),
            }),
            None => Err(EtchError::unexpected_kind(graph, id, "documentable object")),
        }
    }
}
