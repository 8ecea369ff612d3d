//! Runtime values handed to the validator.
//!
//! JSON only covers part of what a running program can hold, so the engine
//! works on its own closed value model: `undefined`, bigints and callables
//! exist here even though `serde_json::Value` cannot express them.
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    /// Decimal digits with an optional leading `-`.
    BigInt(String),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    /// A callable, optionally named for diagnostics.
    Function(Option<String>),
}

impl Value {
    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Some(name.into()))
    }

    pub fn bigint(digits: impl AsRef<str>) -> Self {
        Value::BigInt(normalize_bigint(digits.as_ref()))
    }

    /// Runtime kind, as named in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// The value as it would appear in a literal, for messages.
    pub fn display(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::BigInt(digits) => format!("{digits}n"),
            Value::String(s) => format!("{s:?}"),
            Value::Array(items) => format!("array({})", items.len()),
            Value::Object(_) => "object".to_string(),
            Value::Function(Some(name)) => format!("function {name}"),
            Value::Function(None) => "function".to_string(),
        }
    }

    pub fn get(&self, member: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members.get(member),
            _ => None,
        }
    }
}

/// Canonical decimal text of a bigint literal: no `n` suffix, no `+`, no
/// leading zeros, and no negative zero.
pub fn normalize_bigint(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_suffix('n').unwrap_or(text);
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        "0".to_string()
    } else if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONVERSIONS
// ————————————————————————————————————————————————————————————————————————————

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(members) => Value::Object(
                members.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(members: IndexMap<String, Value>) -> Self {
        Value::Object(members)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// Mirrors JSON.stringify: undefined and functions vanish from objects and
// turn into null elsewhere.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::BigInt(digits) => serializer.serialize_str(digits),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(members) => {
                let kept = members
                    .iter()
                    .filter(|(_, v)| !matches!(v, Value::Undefined | Value::Function(_)));
                let mut map = serializer.serialize_map(None)?;
                for (k, v) in kept {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
