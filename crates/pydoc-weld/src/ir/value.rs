//! Snapshot of plain Python values
//!
//! Values appear as parameter defaults and as module or class attributes
//! that are neither callables nor properties. They render with Python's
//! `repr` syntax so documentation shows what the author wrote.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Python value captured at snapshot time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// An `int` that fits in 64 bits
    Int(i64),
    /// A `float`
    Float(f64),
    /// A `str`
    Str(String),
    /// A `tuple` of values
    Tuple(Vec<Value>),
    /// Any other object, kept as its `repr()`
    Repr(String),
}

impl Value {
    /// Create a string value
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Create an opaque value from its repr
    pub fn repr(s: impl Into<String>) -> Self {
        Value::Repr(s.into())
    }

    /// Borrow the string payload, if this is a `str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the items, if this is a `tuple`
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write_float(f, *x),
            Value::Str(s) => write_str_repr(f, s),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Repr(r) => write!(f, "{}", r),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        write!(f, "nan")
    } else if x.is_infinite() {
        write!(f, "{}", if x > 0.0 { "inf" } else { "-inf" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{:.1}", x)
    } else {
        write!(f, "{}", x)
    }
}

// Python prefers single quotes unless the text contains one and no double quote.
fn write_str_repr(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    f.write_str(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_repr() {
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_str_repr_quotes() {
        assert_eq!(Value::str("string").to_string(), "'string'");
        assert_eq!(Value::str("it's").to_string(), "\"it's\"");
        assert_eq!(Value::str("a\nb").to_string(), "'a\\nb'");
    }

    #[test]
    fn test_tuple_repr() {
        let single = Value::Tuple(vec![Value::Int(1)]);
        assert_eq!(single.to_string(), "(1,)");

        let pair = Value::Tuple(vec![Value::str("a"), Value::None]);
        assert_eq!(pair.to_string(), "('a', None)");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Value::Int(1)).unwrap();
        assert_eq!(json, r#"{"int":1}"#);
        let none: Value = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(none, Value::None);
    }
}
