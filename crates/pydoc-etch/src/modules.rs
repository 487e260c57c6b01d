//! Module descriptors
//!
//! A module documents the classes and functions it exports. With
//! `__all__` the export list decides; without it only members defined in
//! the module itself are documented, so imports are left out. With
//! `ignore_all` every member is documented.
//!
//! When following the module tree, child modules are documented too. The
//! path of modules being built is carried along so packages that refer
//! back to their parents do not recurse forever.

use crate::arguments::ArgumentDescriptor;
use crate::callables::{CallableDescriptor, CallableOptions, CallableType};
use crate::classes::ClassDescriptor;
use crate::config::AutodocConfig;
use crate::descriptor::{Describe, DescriptorKind};
use crate::diagnostics::{EtchError, EtchResult};
use crate::docstring::Docstring;
use crate::raises::{extract_attributes, extract_examples};
use pydoc_weld::{ModuleObject, ObjectGraph, ObjectId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// A documented module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Dotted module name
    pub name: String,

    /// First paragraph of the module docstring
    pub summary: Option<String>,

    /// Remaining docstring prose
    pub description: Option<String>,

    /// Attributes declared in the docstring
    pub attributes: Vec<ArgumentDescriptor>,

    /// Docstring examples, absent when there are none
    pub examples: Option<Vec<String>>,

    /// Package the module belongs to
    pub package: Option<String>,

    /// Source file relative to the snapshot's search paths
    pub file: Option<String>,

    /// Exported classes
    pub classes: Vec<ClassDescriptor>,

    /// Exported functions
    pub functions: Vec<CallableDescriptor>,

    /// Child modules, only when following the module tree
    pub modules: Vec<ModuleDescriptor>,
}

impl ModuleDescriptor {
    /// Build the descriptor of a module
    pub fn create(graph: &ObjectGraph, module: ObjectId, config: &AutodocConfig) -> EtchResult<Self> {
        Self::build(graph, module, config, &mut Vec::new())
    }

    fn build(
        graph: &ObjectGraph,
        id: ObjectId,
        config: &AutodocConfig,
        ancestry: &mut Vec<ObjectId>,
    ) -> EtchResult<Self> {
        let module = graph
            .as_module(id)
            .ok_or_else(|| EtchError::unexpected_kind(graph, id, "module"))?;
        debug!(module = %module.name, "describing module");

        let docstring = Docstring::parse_opt(graph.getdoc(id).as_deref());

        let mut classes = Vec::new();
        let mut functions = Vec::new();
        let mut modules = Vec::new();

        ancestry.push(id);
        let members = Self::collect_members(
            graph,
            id,
            module,
            config,
            ancestry,
            &mut classes,
            &mut functions,
            &mut modules,
        );
        ancestry.pop();
        members?;

        Ok(Self {
            name: module.name.clone(),
            summary: docstring.short_description.clone(),
            description: docstring.long_description.clone(),
            attributes: extract_attributes(&docstring),
            examples: extract_examples(&docstring),
            package: module.package.clone(),
            file: graph.make_file_relative(module.file.as_deref()),
            classes,
            functions,
            modules,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_members(
        graph: &ObjectGraph,
        id: ObjectId,
        module: &ModuleObject,
        config: &AutodocConfig,
        ancestry: &mut Vec<ObjectId>,
        classes: &mut Vec<ClassDescriptor>,
        functions: &mut Vec<CallableDescriptor>,
        modules: &mut Vec<ModuleDescriptor>,
    ) -> EtchResult<()> {
        for (name, member) in graph.getmembers(id) {
            let member = member.id();
            if config.hides(&name) {
                continue;
            }

            if config.follow_module_tree
                && member != id
                && graph.is_module(member)
                && graph.is_child_module(id, member)
            {
                if ancestry.contains(&member) {
                    warn!(
                        module = %module.name,
                        child = graph.name(member).unwrap_or("?"),
                        "module cycle, skipping repeated module"
                    );
                    continue;
                }
                modules.push(Self::build(graph, member, config, ancestry)?);
                continue;
            }

            if !is_exported(graph, id, module, config, &name, member) {
                trace!(module = %module.name, member = %name, "not exported");
                continue;
            }

            if graph.is_class(member) {
                classes.push(ClassDescriptor::build(
                    graph,
                    member,
                    config,
                    Some(module.name.as_str()),
                    ancestry,
                )?);
            } else if graph.is_function(member) {
                functions.push(CallableDescriptor::create(
                    graph,
                    member,
                    CallableOptions::new(CallableType::Function)
                        .prefer_docstring(config.prefer_docstring),
                )?);
            } else {
                trace!(module = %module.name, member = %name, "skipping member");
            }
        }
        Ok(())
    }

    /// Find a documented child module by name, searching the whole tree
    pub fn find_module(&self, name: &str) -> Option<&ModuleDescriptor> {
        if self.name == name {
            return Some(self);
        }
        self.modules.iter().find_map(|m| m.find_module(name))
    }
}

/// Whether a module member passes the export filter
///
/// An empty `__all__` behaves like no `__all__` at all.
fn is_exported(
    graph: &ObjectGraph,
    id: ObjectId,
    module: &ModuleObject,
    config: &AutodocConfig,
    name: &str,
    member: ObjectId,
) -> bool {
    if config.ignore_all {
        return true;
    }
    match module.all.as_deref() {
        Some(all) if !all.is_empty() => all.iter().any(|exported| exported == name),
        _ => graph.module_of(member) == Some(id),
    }
}

impl Describe for ModuleDescriptor {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{mock_module, mock_package};
    use pretty_assertions::assert_eq;

    fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<&str> {
        items.iter().map(name).collect()
    }

    #[test]
    fn test_mock_module_skips_imports() {
        let mock = mock_module().unwrap();
        let desc = ModuleDescriptor::create(&mock.graph, mock.module, &AutodocConfig::default())
            .unwrap();
        assert_eq!(desc.name, "mocks");
        assert_eq!(desc.summary.as_deref(), Some("Mocks"));
        assert_eq!(desc.file.as_deref(), Some("mocks.py"));
        assert_eq!(
            names(&desc.classes, |c| &c.name),
            vec!["MockBase", "MockClass", "MockDerived", "MockNamedTuple", "MockProperties"]
        );
        assert_eq!(names(&desc.functions, |f| &f.name), vec!["mock_func"]);
        assert!(desc.modules.is_empty());
        assert!(desc.classes.iter().all(|c| c.module == "mocks"));
    }

    #[test]
    fn test_ignore_all_includes_imports() {
        let mock = mock_module().unwrap();
        let config = AutodocConfig::default().with_ignore_all(true);
        let desc = ModuleDescriptor::create(&mock.graph, mock.module, &config).unwrap();
        let classes = names(&desc.classes, |c| &c.name);
        assert!(classes.contains(&"OrderedDict"));
        let ordered = desc.classes.iter().find(|c| c.name == "OrderedDict").unwrap();
        assert_eq!(ordered.module, "mocks");
    }

    #[test]
    fn test_all_restricts_exports() {
        let mock = mock_package().unwrap();
        let desc =
            ModuleDescriptor::create(&mock.graph, mock.package, &AutodocConfig::default()).unwrap();
        assert_eq!(desc.summary.as_deref(), Some("A package"));
        assert_eq!(desc.description.as_deref(), Some("It has submodules."));
        assert_eq!(
            desc.attributes,
            vec![ArgumentDescriptor::new(
                "VERSION",
                Some("str".into()),
                Some("The package version".into())
            )]
        );
        assert_eq!(
            desc.examples,
            Some(vec![">>> import pkg\n>>> pkg.make_widget()".to_string()])
        );
        assert_eq!(names(&desc.classes, |c| &c.name), vec!["Widget"]);
        assert_eq!(desc.classes[0].module, "pkg");
        assert_eq!(names(&desc.functions, |f| &f.name), vec!["make_widget"]);
        assert_eq!(desc.functions[0].qualifier, "pkg");
        assert!(desc.modules.is_empty());
    }

    #[test]
    fn test_private_members_hidden_even_when_exported() {
        let mock = mock_package().unwrap();
        let config = AutodocConfig::default().with_ignore_all(true);
        let desc = ModuleDescriptor::create(&mock.graph, mock.package, &config).unwrap();
        let functions = names(&desc.functions, |f| &f.name);
        assert_eq!(functions, vec!["helper", "make_widget"]);

        let config = config.with_ignore_private(false);
        let desc = ModuleDescriptor::create(&mock.graph, mock.package, &config).unwrap();
        assert!(desc.functions.iter().any(|f| f.name == "_internal"));
    }

    #[test]
    fn test_follow_module_tree_terminates_on_cycles() {
        let mock = mock_package().unwrap();
        let config = AutodocConfig::default().with_follow_module_tree(true);
        let desc = ModuleDescriptor::create(&mock.graph, mock.package, &config).unwrap();
        assert_eq!(names(&desc.modules, |m| &m.name), vec!["pkg.shapes", "pkg.util"]);

        let util = desc.find_module("pkg.util").unwrap();
        assert!(util.modules.is_empty());
        assert_eq!(names(&util.functions, |f| &f.name), vec!["helper"]);

        let shapes = desc.find_module("pkg.shapes").unwrap();
        assert_eq!(names(&shapes.classes, |c| &c.name), vec!["Widget"]);
        assert_eq!(names(&shapes.modules, |m| &m.name), vec!["pkg.util"]);
        assert_eq!(shapes.file.as_deref(), Some("pkg/shapes.py"));
    }

    #[test]
    fn test_rejects_non_module() {
        let mock = mock_package().unwrap();
        let err = ModuleDescriptor::create(&mock.graph, mock.widget, &AutodocConfig::default())
            .unwrap_err();
        assert!(matches!(err, EtchError::UnexpectedKind { expected: "module", .. }));
    }
}
