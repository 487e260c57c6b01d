//! Callable descriptors
//!
//! Functions, methods, class methods and constructors. The signature and
//! docstring default to the object's own, but callers may pass pre-computed
//! ones (a class passes its resolved docstring to its constructor).

use crate::arguments::{build_arguments, ArgumentDescriptor};
use crate::descriptor::{Describe, DescriptorKind};
use crate::diagnostics::{EtchError, EtchResult};
use crate::docstring::Docstring;
use crate::raises::{extract_examples, extract_raises, RaisesDescriptor};
use crate::types::{resolve_type_name, ANY, NONE};
use pydoc_weld::{FunctionFlavor, ObjectGraph, ObjectId, PyObject, Signature};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The role a callable plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallableType {
    /// A plain or static function
    #[default]
    Function,
    /// The call signature of a class
    Constructor,
    /// An instance method
    Method,
    /// A method bound to its class
    ClassMethod,
}

impl CallableType {
    /// Whether the first declared parameter is `self`/`cls` and not rendered
    pub fn binds_first_parameter(&self) -> bool {
        matches!(
            self,
            CallableType::Method | CallableType::ClassMethod | CallableType::Constructor
        )
    }
}

/// Inputs of `CallableDescriptor::create` beyond the object itself
#[derive(Debug, Clone)]
pub struct CallableOptions {
    /// The callable's role
    pub role: CallableType,
    /// Prefer docstring default text over declared defaults
    pub prefer_docstring: bool,
    /// Qualifier override; when set, the bare name is used
    pub qualifier: Option<String>,
    /// Signature override
    pub signature: Option<Signature>,
    /// Docstring override
    pub docstring: Option<Docstring>,
}

impl Default for CallableOptions {
    fn default() -> Self {
        Self {
            role: CallableType::Function,
            prefer_docstring: true,
            qualifier: None,
            signature: None,
            docstring: None,
        }
    }
}

impl CallableOptions {
    /// Options for a callable playing `role`
    pub fn new(role: CallableType) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Set docstring preference
    pub fn prefer_docstring(mut self, prefer: bool) -> Self {
        self.prefer_docstring = prefer;
        self
    }

    /// Set the qualifier
    pub fn qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Use this signature instead of the object's own
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Use this docstring instead of the object's own
    pub fn docstring(mut self, docstring: Docstring) -> Self {
        self.docstring = Some(docstring);
        self
    }
}

/// A documented callable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallableDescriptor {
    /// Enclosing class or module, or empty
    pub qualifier: String,

    /// Short name of the callable
    pub name: String,

    /// First paragraph of the docstring
    pub summary: Option<String>,

    /// Remaining docstring prose
    pub description: Option<String>,

    /// Parameters in declaration order, with `/` and `*` markers
    pub arguments: Vec<ArgumentDescriptor>,

    /// Display type of the return value ("None" for constructors)
    pub return_type: String,

    /// Returns section of the docstring
    pub return_description: Option<String>,

    /// Role the callable plays
    pub callable_type: CallableType,

    /// Whether this is a coroutine or async generator
    pub is_async: bool,

    /// Whether this is a generator or async generator
    pub is_generator: bool,

    /// Documented exceptions, absent when none are documented
    pub raises: Option<Vec<RaisesDescriptor>>,

    /// Docstring examples, absent when there are none
    pub examples: Option<Vec<String>>,

    /// Module the callable is defined in
    pub module: String,

    /// Package of the defining module
    pub package: Option<String>,

    /// Source file relative to the snapshot's search paths
    pub file: Option<String>,
}

/// The reflected facts a callable descriptor is built from
struct CallableSource<'g> {
    name: &'g str,
    qualname: &'g str,
    module: &'g str,
    flavor: FunctionFlavor,
    signature: Option<&'g Signature>,
}

impl CallableDescriptor {
    /// Build the descriptor of a function, or of a class as a constructor
    pub fn create(graph: &ObjectGraph, id: ObjectId, options: CallableOptions) -> EtchResult<Self> {
        let source = match graph.get(id) {
            Some(PyObject::Function(f)) => CallableSource {
                name: &f.name,
                qualname: &f.qualname,
                module: &f.module,
                flavor: f.flavor,
                signature: Some(&f.signature),
            },
            Some(PyObject::Class(c)) if options.role == CallableType::Constructor => {
                CallableSource {
                    name: &c.name,
                    qualname: &c.qualname,
                    module: &c.module,
                    flavor: FunctionFlavor::Plain,
                    signature: graph
                        .constructor_function(id)
                        .and_then(|ctor| graph.as_function(ctor))
                        .map(|ctor| &ctor.signature),
                }
            }
            _ => return Err(EtchError::unexpected_kind(graph, id, "function")),
        };
        trace!(name = source.qualname, role = ?options.role, "describing callable");

        let CallableOptions {
            role,
            prefer_docstring,
            qualifier,
            signature,
            docstring,
        } = options;
        let docstring = docstring.unwrap_or_else(|| Docstring::parse_opt(graph.getdoc(id).as_deref()));
        let default_signature = Signature::default();
        let signature = signature
            .as_ref()
            .or(source.signature)
            .unwrap_or(&default_signature);

        let arguments = build_arguments(signature, &docstring, role, prefer_docstring);

        let (return_type, return_description) = if role == CallableType::Constructor {
            (NONE.to_string(), None)
        } else if signature.return_annotation.is_empty() {
            (ANY.to_string(), None)
        } else {
            let returns = docstring.returns();
            (
                resolve_type_name(&signature.return_annotation, returns.as_ref()),
                returns.and_then(|r| r.description).map(str::to_string),
            )
        };

        let module_object = graph.module_of(id).and_then(|m| graph.as_module(m));
        let package = module_object.and_then(|m| m.package.clone());
        let file = graph.make_file_relative(module_object.and_then(|m| m.file.as_deref()));

        let (qualifier, name) = match qualifier {
            Some(qualifier) => (qualifier, source.name.to_string()),
            None => match source.qualname.rsplit_once('.') {
                Some((qualifier, name)) => (qualifier.to_string(), name.to_string()),
                None => (package.clone().unwrap_or_default(), source.qualname.to_string()),
            },
        };

        Ok(Self {
            qualifier,
            name,
            summary: docstring.short_description.clone(),
            description: docstring.long_description.clone(),
            arguments,
            return_type,
            return_description,
            callable_type: role,
            is_async: source.flavor.is_async(),
            is_generator: source.flavor.is_generator(),
            raises: extract_raises(&docstring),
            examples: extract_examples(&docstring),
            module: source.module.to_string(),
            package,
            file,
        })
    }

    /// Display label derived from the role and flags
    ///
    /// "class" for constructors, otherwise optional "async " and
    /// "generator " followed by "method", "class method" or "function".
    pub fn callable_type_description(&self) -> String {
        if self.callable_type == CallableType::Constructor {
            return "class".to_string();
        }
        let mut label = String::new();
        if self.is_async {
            label.push_str("async ");
        }
        if self.is_generator {
            label.push_str("generator ");
        }
        label.push_str(match self.callable_type {
            CallableType::Method => "method",
            CallableType::ClassMethod => "class method",
            _ => "function",
        });
        label
    }
}

impl Describe for CallableDescriptor {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Callable
    }
}
