//! Import path resolution
//!
//! An import path is `module.path` or `module.path:attribute`. The module
//! part is looked up in the snapshot's module registry; the attribute part
//! is a chain of attribute lookups starting at that module.

use crate::diagnostics::{EtchError, EtchResult};
use pydoc_weld::{MemberRef, ObjectGraph, ObjectId};
use tracing::debug;

/// What an import path resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// The path named a module
    Module(ObjectId),
    /// The path named an attribute, reached from `owner` as `name`
    Member {
        owner: ObjectId,
        name: String,
        member: MemberRef,
    },
}

/// Resolve an import path against the snapshot
///
/// A module that does not exist is a `ModuleNotFound` error. A module that
/// exists but fails to import because something it depends on is missing
/// is reported as `Import`, naming the missing dependency. A missing
/// attribute is `AttributeNotFound`.
pub fn import_from_string(graph: &ObjectGraph, path: &str) -> EtchResult<Resolved> {
    let (module_str, attr_str) = path.split_once(':').unwrap_or((path, ""));
    debug!(module = module_str, attribute = attr_str, "resolving import path");

    let module = import_module(graph, module_str)?;
    if attr_str.is_empty() {
        return Ok(Resolved::Module(module));
    }

    let (owner_path, name) = match attr_str.rsplit_once('.') {
        Some((owner_path, name)) => (Some(owner_path), name),
        None => (None, attr_str),
    };
    let missing = || EtchError::attribute_not_found(module_str, attr_str);

    let mut owner = module;
    for segment in owner_path.into_iter().flat_map(|p| p.split('.')) {
        owner = graph.getattr(owner, segment).ok_or_else(missing)?.id();
    }
    let member = graph.getattr(owner, name).ok_or_else(missing)?;

    Ok(Resolved::Member {
        owner,
        name: name.to_string(),
        member,
    })
}

/// Find a module by dotted name, importing each parent package first
fn import_module(graph: &ObjectGraph, module_str: &str) -> EtchResult<ObjectId> {
    let root = module_str.split('.').next().unwrap_or_default();

    let mut end = 0;
    loop {
        end = module_str[end..]
            .find('.')
            .map_or(module_str.len(), |dot| end + dot);
        let prefix = &module_str[..end];

        // The name Python's import machinery would report as missing
        let missing = match graph.broken_import(prefix) {
            Some(dependency) => Some(dependency),
            None if graph.module(prefix).is_none() => Some(prefix),
            None => None,
        };
        if let Some(missing) = missing {
            if missing == root {
                return Err(EtchError::ModuleNotFound(module_str.to_string()));
            }
            return Err(EtchError::Import {
                module: module_str.to_string(),
                missing: missing.to_string(),
            });
        }

        if end == module_str.len() {
            break;
        }
        end += 1;
    }

    graph
        .module(module_str)
        .ok_or_else(|| EtchError::ModuleNotFound(module_str.to_string()))
}
