//! Docstring parsing
//!
//! Splits a cleaned docstring into a short description, a long description
//! and tagged metadata entries. Google style sections (`Args:`, `Returns:`,
//! `Raises:`, `Attributes:`, `Examples:`) are the primary grammar; a
//! docstring using reStructuredText field lists (`:param x:`) is parsed with
//! the field-list grammar instead.
//!
//! Every entry keeps its raw `args` (`["param", "arg_two (int, optional)"]`)
//! the way free-form metadata is addressed, plus a typed detail for params,
//! returns and raises.

use lazy_static::lazy_static;
use pydoc_weld::clean_doc;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tag of a parameter entry
pub const PARAM: &str = "param";
/// Tag of a returns entry
pub const RETURNS: &str = "returns";
/// Tag of a yields entry
pub const YIELDS: &str = "yields";
/// Tag of a raises entry
pub const RAISES: &str = "raises";
/// Tag of an attribute entry
pub const ATTRIBUTE: &str = "attribute";
/// Tag of an examples entry
pub const EXAMPLES: &str = "examples";

lazy_static! {
    /// A Google section title on a line of its own
    static ref SECTION_REGEX: Regex = Regex::new(
        r"^(Args|Arguments|Parameters|Params|Returns|Return|Yields|Yield|Raises|Exceptions|Except|Attributes|Attribute|Examples|Example)\s*:\s*$"
    ).unwrap();

    /// `name (type)` entry heads
    static ref TYPED_HEAD_REGEX: Regex = Regex::new(r"^\s*(.+?)\s*\(\s*(.*\S)\s*\)\s*$").unwrap();

    /// "Defaults to X." inside a parameter description
    static ref DEFAULT_REGEX: Regex = Regex::new(
        r"(?m)\b[Dd]efaults?(?:\s+to|\s+is|:|\s*=)\s+(.+?)\.?\s*$"
    ).unwrap();

    /// A reStructuredText field: `:param int x: text`
    static ref FIELD_REGEX: Regex = Regex::new(
        r"^:(param|parameter|arg|argument|key|keyword|type|returns|return|rtype|yields|yield|ytype|raises|raise|except|exception|ivar|var|cvar|example|examples)\b([^:]*):\s*(.*)$"
    ).unwrap();
}

/// Typed detail of a metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetaDetail {
    /// A documented parameter
    Param {
        arg_name: String,
        type_name: Option<String>,
        is_optional: bool,
        default: Option<String>,
    },
    /// A documented return or yield value
    Returns {
        type_name: Option<String>,
        is_generator: bool,
    },
    /// A documented exception
    Raises { type_name: Option<String> },
    /// Free-form metadata (attributes, examples)
    Plain,
}

/// One metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocstringMeta {
    /// Tag followed by the raw entry head, if any
    pub args: Vec<String>,
    /// Entry text
    pub description: Option<String>,
    /// Typed view of the entry
    pub detail: MetaDetail,
}

impl DocstringMeta {
    /// Create a free-form entry
    pub fn plain(args: Vec<String>, description: Option<String>) -> Self {
        Self {
            args,
            description,
            detail: MetaDetail::Plain,
        }
    }

    /// The entry's tag (`param`, `returns`, ...)
    pub fn tag(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }

    /// Whether the args contain `tag`
    pub fn has_arg(&self, tag: &str) -> bool {
        self.args.iter().any(|a| a == tag)
    }
}

/// A parameter entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocstringParam<'a> {
    pub arg_name: &'a str,
    pub type_name: Option<&'a str>,
    pub is_optional: bool,
    pub default: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// A returns or yields entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocstringReturns<'a> {
    pub type_name: Option<&'a str>,
    pub is_generator: bool,
    pub description: Option<&'a str>,
}

/// A raises entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocstringRaises<'a> {
    pub type_name: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// A docstring record that may declare a type
pub trait DeclaresType {
    /// The type name written in the docstring
    fn declared_type(&self) -> Option<&str>;
}

impl DeclaresType for DocstringParam<'_> {
    fn declared_type(&self) -> Option<&str> {
        self.type_name
    }
}

impl DeclaresType for DocstringReturns<'_> {
    fn declared_type(&self) -> Option<&str> {
        self.type_name
    }
}

/// A parsed docstring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docstring {
    /// First line of the description
    pub short_description: Option<String>,
    /// Remaining description text
    pub long_description: Option<String>,
    /// Tagged entries in order of appearance
    pub meta: Vec<DocstringMeta>,
}

impl Docstring {
    /// Create an empty docstring
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse docstring text
    ///
    /// The text is dedented first, so both raw `__doc__` values and
    /// already-cleaned docstrings are accepted.
    pub fn parse(text: &str) -> Self {
        let text = clean_doc(text);
        if text.lines().any(|line| FIELD_REGEX.is_match(line)) {
            parse_rest(&text)
        } else {
            parse_google(&text)
        }
    }

    /// Parse an optional docstring; `None` gives an empty docstring
    pub fn parse_opt(text: Option<&str>) -> Self {
        text.map(Self::parse).unwrap_or_default()
    }

    /// Whether nothing was documented
    pub fn is_empty(&self) -> bool {
        self.short_description.is_none() && self.long_description.is_none() && self.meta.is_empty()
    }

    /// All parameter entries
    pub fn params(&self) -> impl Iterator<Item = DocstringParam<'_>> {
        self.meta.iter().filter_map(|meta| match &meta.detail {
            MetaDetail::Param {
                arg_name,
                type_name,
                is_optional,
                default,
            } => Some(DocstringParam {
                arg_name,
                type_name: type_name.as_deref(),
                is_optional: *is_optional,
                default: default.as_deref(),
                description: meta.description.as_deref(),
            }),
            _ => None,
        })
    }

    /// The parameter entry whose name is exactly `name`
    pub fn param(&self, name: &str) -> Option<DocstringParam<'_>> {
        self.params().find(|p| p.arg_name == name)
    }

    /// The first returns or yields entry
    pub fn returns(&self) -> Option<DocstringReturns<'_>> {
        self.meta.iter().find_map(|meta| match &meta.detail {
            MetaDetail::Returns {
                type_name,
                is_generator,
            } => Some(DocstringReturns {
                type_name: type_name.as_deref(),
                is_generator: *is_generator,
                description: meta.description.as_deref(),
            }),
            _ => None,
        })
    }

    /// All raises entries
    pub fn raises(&self) -> impl Iterator<Item = DocstringRaises<'_>> {
        self.meta.iter().filter_map(|meta| match &meta.detail {
            MetaDetail::Raises { type_name } => Some(DocstringRaises {
                type_name: type_name.as_deref(),
                description: meta.description.as_deref(),
            }),
            _ => None,
        })
    }

    /// Entries tagged `attribute`, as (raw head, description)
    pub fn attributes(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.meta
            .iter()
            .filter(|meta| meta.has_arg(ATTRIBUTE))
            .map(|meta| {
                (
                    meta.args.get(1).map(String::as_str).unwrap_or(""),
                    meta.description.as_deref(),
                )
            })
    }

    /// Descriptions of entries tagged `examples`, in order
    pub fn examples(&self) -> impl Iterator<Item = &str> {
        self.meta
            .iter()
            .filter(|meta| meta.has_arg(EXAMPLES))
            .filter_map(|meta| meta.description.as_deref())
    }
}

/// Split `name (type)` into name and type
pub fn split_typed_head(head: &str) -> (&str, Option<&str>) {
    match TYPED_HEAD_REGEX.captures(head) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(name), Some(ty)) => (name.as_str(), Some(ty.as_str())),
            _ => (head.trim(), None),
        },
        None => (head.trim(), None),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn split_description(text: &str) -> (Option<String>, Option<String>) {
    let text = text.trim();
    match text.split_once('\n') {
        Some((short, long)) => (non_empty(short), non_empty(long)),
        None => (non_empty(text), None),
    }
}

/// First `:` outside brackets and parentheses
fn find_head_colon(line: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (index, ch) in line.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ':' if depth <= 0 => return Some(index),
            _ => {}
        }
    }
    None
}

fn param_meta(head: &str, description: Option<String>) -> DocstringMeta {
    let (name, type_name) = split_typed_head(head);
    let (type_name, is_optional) = match type_name {
        Some(ty) => match ty.strip_suffix("optional") {
            Some(rest) if rest.trim_end().ends_with(',') || rest.trim().is_empty() => {
                let ty = rest.trim_end().trim_end_matches(',').trim();
                (non_empty(ty), true)
            }
            _ => (Some(ty.to_string()), false),
        },
        None => (None, false),
    };
    let default = description
        .as_deref()
        .and_then(|d| DEFAULT_REGEX.captures(d))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    DocstringMeta {
        args: vec![PARAM.to_string(), head.trim().to_string()],
        description,
        detail: MetaDetail::Param {
            arg_name: name.to_string(),
            type_name,
            is_optional,
            default,
        },
    }
}

fn returns_meta(tag: &str, type_name: Option<String>, description: Option<String>) -> DocstringMeta {
    let mut args = vec![tag.to_string()];
    args.extend(type_name.clone());
    DocstringMeta {
        args,
        description,
        detail: MetaDetail::Returns {
            type_name,
            is_generator: tag == YIELDS,
        },
    }
}

fn raises_meta(type_name: &str, description: Option<String>) -> DocstringMeta {
    let type_name = non_empty(type_name);
    let mut args = vec![RAISES.to_string()];
    args.extend(type_name.clone());
    DocstringMeta {
        args,
        description,
        detail: MetaDetail::Raises { type_name },
    }
}

fn attribute_meta(head: &str, description: Option<String>) -> DocstringMeta {
    DocstringMeta::plain(
        vec![ATTRIBUTE.to_string(), head.trim().to_string()],
        description,
    )
}

/// Remove the indentation common to every non-blank line, keeping
/// relative indentation, and drop blank lines at either end
fn dedent(lines: &[&str]) -> String {
    let margin = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let dedented: Vec<&str> = lines
        .iter()
        .map(|line| line.get(margin..).unwrap_or("").trim_end())
        .collect();
    dedented.join("\n").trim_matches('\n').to_string()
}

// Google style

fn section_tag(title: &str) -> &'static str {
    match title {
        "Args" | "Arguments" | "Parameters" | "Params" => PARAM,
        "Returns" | "Return" => RETURNS,
        "Yields" | "Yield" => YIELDS,
        "Raises" | "Exceptions" | "Except" => RAISES,
        "Attributes" | "Attribute" => ATTRIBUTE,
        _ => EXAMPLES,
    }
}

fn parse_google(text: &str) -> Docstring {
    let mut description: Vec<&str> = Vec::new();
    let mut sections: Vec<(&'static str, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        if let Some(title) = SECTION_REGEX.captures(line).and_then(|caps| caps.get(1)) {
            sections.push((section_tag(title.as_str()), Vec::new()));
            continue;
        }
        match sections.last_mut() {
            Some((_, body)) => body.push(line),
            None => description.push(line),
        }
    }

    let (short_description, long_description) = split_description(&description.join("\n"));
    let mut meta = Vec::new();
    for (tag, body) in sections {
        let body = dedent(&body);
        if body.is_empty() {
            continue;
        }
        match tag {
            EXAMPLES => meta.push(DocstringMeta::plain(vec![EXAMPLES.to_string()], Some(body))),
            RETURNS | YIELDS => {
                let (type_name, desc) = match body.lines().next().and_then(find_head_colon) {
                    Some(colon) => (non_empty(&body[..colon]), non_empty(&body[colon + 1..])),
                    None => (None, non_empty(&body)),
                };
                meta.push(returns_meta(tag, type_name, desc.map(|d| clean_doc(&d))));
            }
            _ => {
                for (head, desc) in google_entries(&body) {
                    meta.push(match tag {
                        PARAM => param_meta(head, desc),
                        RAISES => raises_meta(head, desc),
                        _ => attribute_meta(head, desc),
                    });
                }
            }
        }
    }

    Docstring {
        short_description,
        long_description,
        meta,
    }
}

/// Entries of a multi-item section: unindented lines start an entry and
/// indented lines continue it
fn google_entries(body: &str) -> Vec<(&str, Option<String>)> {
    let mut entries: Vec<(&str, Vec<&str>)> = Vec::new();
    for line in body.lines() {
        let continues = line.starts_with(char::is_whitespace) || line.trim().is_empty();
        if continues {
            if let Some((_, rest)) = entries.last_mut() {
                rest.push(line);
            }
            continue;
        }
        match find_head_colon(line) {
            Some(colon) => entries.push((&line[..colon], vec![&line[colon + 1..]])),
            None => entries.push((line, Vec::new())),
        }
    }
    entries
        .into_iter()
        .map(|(head, rest)| {
            let text = clean_doc(&rest.join("\n"));
            (head.trim(), non_empty(&text))
        })
        .collect()
}

// reStructuredText field lists

fn parse_rest(text: &str) -> Docstring {
    let mut description: Vec<&str> = Vec::new();
    let mut fields: Vec<(&str, &str, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        match FIELD_REGEX.captures(line) {
            Some(caps) => {
                let get = |i| caps.get(i).map(|m| m.as_str()).unwrap_or("");
                fields.push((get(1), get(2).trim(), vec![get(3)]));
            }
            None => match fields.last_mut() {
                Some((_, _, body)) => body.push(line),
                None => description.push(line),
            },
        }
    }

    let (short_description, long_description) = split_description(&description.join("\n"));
    let mut meta: Vec<DocstringMeta> = Vec::new();
    let mut types: Vec<(&str, &str)> = Vec::new();
    let mut return_type: Option<&str> = None;

    for (field, head, body) in &fields {
        let desc = non_empty(&clean_doc(&body.join("\n")));
        match *field {
            "param" | "parameter" | "arg" | "argument" | "key" | "keyword" => {
                let head = match head.rsplit_once(char::is_whitespace) {
                    Some((ty, name)) => format!("{} ({})", name, ty.trim()),
                    None => head.to_string(),
                };
                meta.push(param_meta(&head, desc));
            }
            "type" => {
                if let Some(desc) = body.first() {
                    types.push((*head, desc.trim()));
                }
            }
            "returns" | "return" => meta.push(returns_meta(RETURNS, None, desc)),
            "yields" | "yield" => meta.push(returns_meta(YIELDS, None, desc)),
            "rtype" | "ytype" => return_type = body.first().map(|t| t.trim()),
            "raises" | "raise" | "except" | "exception" => meta.push(raises_meta(head, desc)),
            "ivar" | "var" | "cvar" => {
                let head = match head.rsplit_once(char::is_whitespace) {
                    Some((ty, name)) => format!("{} ({})", name, ty.trim()),
                    None => head.to_string(),
                };
                meta.push(attribute_meta(&head, desc));
            }
            _ => meta.push(DocstringMeta::plain(vec![EXAMPLES.to_string()], desc)),
        }
    }

    for (name, ty) in types {
        let Some(entry) = meta.iter_mut().find(|m| {
            matches!(&m.detail, MetaDetail::Param { arg_name, .. } if arg_name == name)
        }) else {
            continue;
        };
        let rebuilt = param_meta(&format!("{} ({})", name, ty), entry.description.take());
        *entry = rebuilt;
    }

    if let Some(rtype) = return_type.and_then(non_empty) {
        match meta
            .iter_mut()
            .find(|m| matches!(m.detail, MetaDetail::Returns { .. }))
        {
            Some(entry) => {
                let tag = entry.tag().to_string();
                let rebuilt = returns_meta(&tag, Some(rtype), entry.description.take());
                *entry = rebuilt;
            }
            None => meta.push(returns_meta(RETURNS, Some(rtype), None)),
        }
    }

    Docstring {
        short_description,
        long_description,
        meta,
    }
}
