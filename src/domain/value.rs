// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration tree value type.
//!
//! This module provides the `Value` type, the node type of every configuration tree,
//! and `Mapping`, the ordered string-keyed map that forms its branches.

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered mapping from string keys to values.
///
/// Insertion order is preserved: declaration order is meaningful for provider queues
/// and for flattening.
pub type Mapping = IndexMap<String, Value>;

/// A node in a configuration tree.
///
/// Trees are usually produced by a declaration loader (YAML) or built in code from Rust
/// literals through the `From` implementations. When deserializing, scalar mapping keys
/// are stringified the way [`Value::to_key_string`] does (`1` becomes `"1"`, `true`
/// becomes `"1"`); sequence and mapping keys are rejected.
///
/// # Examples
///
/// ```
/// use fulcrum::domain::Value;
///
/// let value = Value::from([("handle", Value::from("main-js")), ("in_footer", Value::from(true))]);
/// assert!(value.as_mapping().is_some());
/// assert_eq!(value.as_mapping().unwrap()["handle"].as_str(), Some("main-js"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An absent or null value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Sequence(Vec<Value>),
    /// A nested mapping.
    Mapping(Mapping),
}

impl Value {
    /// Creates an empty mapping value.
    pub fn mapping() -> Self {
        Value::Mapping(Mapping::new())
    }

    /// Returns the string slice if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this value is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the nested mapping if this value is a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the nested mapping mutably if this value is a mapping.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements if this value is a sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this value is a mapping or a sequence.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Mapping(_) | Value::Sequence(_))
    }

    /// Returns the element count of a mapping or sequence.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Value::Mapping(map) => Some(map.len()),
            Value::Sequence(seq) => Some(seq.len()),
            _ => None,
        }
    }

    /// Returns `true` if this value is null or the empty string.
    ///
    /// This is the emptiness test applied to provider template keys: `false`, `0` and
    /// empty collections are configured values.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the truthiness of this value.
    ///
    /// Null, `false`, `0`, `0.0`, `""`, `"0"` and empty collections are falsy; everything
    /// else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !(s.is_empty() || s == "0"),
            Value::Sequence(seq) => !seq.is_empty(),
            Value::Mapping(map) => !map.is_empty(),
        }
    }

    /// Returns a short name for the kind of this value, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Converts a scalar into the string used when it becomes a mapping key.
    ///
    /// Booleans become `"1"`/`"0"` and null becomes the empty string. Collections cannot
    /// be keys and yield `None`.
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    /// Appends `other` onto this value.
    ///
    /// Sequences grow (a sequence argument is spliced in), scalars concatenate as text,
    /// and a null receiver simply takes the new value.
    pub fn concat(self, other: Value) -> Value {
        match (self, other) {
            (Value::Null, other) => other,
            (Value::Sequence(mut seq), Value::Sequence(more)) => {
                seq.extend(more);
                Value::Sequence(seq)
            }
            (Value::Sequence(mut seq), other) => {
                seq.push(other);
                Value::Sequence(seq)
            }
            (current, other) => match (current.scalar_text(), other.scalar_text()) {
                (Some(head), Some(tail)) => Value::String(head + &tail),
                _ => other,
            },
        }
    }

    fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Bool(true) => Some("1".to_string()),
            Value::Bool(false) | Value::Null => Some(String::new()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(seq: Vec<Value>) -> Self {
        Value::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Value {
    fn from(entries: [(K, V); N]) -> Self {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> std::result::Result<Value, E> {
        Ok(Value::Int(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> std::result::Result<Value, E> {
        // Out of range integers degrade to floats, as YAML readers commonly do.
        Ok(i64::try_from(n).map_or(Value::Float(n as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Mapping::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<Value, Value>()? {
            let key = key.to_key_string().ok_or_else(|| {
                <A::Error as de::Error>::custom(format!(
                    "a {} cannot be used as a mapping key",
                    key.type_name()
                ))
            })?;
            entries.insert(key, value);
        }
        Ok(Value::Mapping(entries))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(seq) => write!(f, "[{} items]", seq.len()),
            Value::Mapping(map) => write!(f, "{{{} keys}}", map.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_literals() {
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7), Value::Int(7));
        assert_eq!(Value::from(1.5), Value::Float(1.5));
        assert_eq!(Value::from(None::<&str>), Value::Null);
    }

    #[test]
    fn test_value_from_pairs_keeps_order() {
        let value = Value::from([("b", 1), ("a", 2)]);
        let keys: Vec<&String> = value.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_is_blank() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from(false).is_blank());
        assert!(!Value::from(0).is_blank());
        assert!(!Value::mapping().is_blank());
    }

    #[test]
    fn test_is_truthy() {
        let falsy = vec![
            Value::Null,
            Value::from(false),
            Value::from(0),
            Value::from(0.0),
            Value::from(""),
            Value::from("0"),
            Value::Sequence(vec![]),
            Value::mapping(),
        ];
        for value in falsy {
            assert!(!value.is_truthy(), "expected falsy: {:?}", value);
        }

        let truthy = vec![
            Value::from(true),
            Value::from(-1),
            Value::from("no"),
            Value::Sequence(vec![Value::Null]),
        ];
        for value in truthy {
            assert!(value.is_truthy(), "expected truthy: {:?}", value);
        }
    }

    #[test]
    fn test_to_key_string() {
        assert_eq!(Value::from("id").to_key_string(), Some("id".to_string()));
        assert_eq!(Value::from(3).to_key_string(), Some("3".to_string()));
        assert_eq!(Value::from(true).to_key_string(), Some("1".to_string()));
        assert_eq!(Value::Null.to_key_string(), Some(String::new()));
        assert_eq!(Value::mapping().to_key_string(), None);
    }

    #[test]
    fn test_concat() {
        assert_eq!(
            Value::from("foo").concat(Value::from("bar")),
            Value::from("foobar")
        );
        assert_eq!(Value::from("v").concat(Value::from(2)), Value::from("v2"));
        assert_eq!(
            Value::Sequence(vec![Value::from(1)]).concat(Value::from(2)),
            Value::Sequence(vec![Value::from(1), Value::from(2)])
        );
        assert_eq!(Value::Null.concat(Value::from("x")), Value::from("x"));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = "name: Tonya\ncount: 3\nratio: 0.5\nenabled: true\nnothing: ~\nlist: [a, b]\nnested:\n  key: value\n";
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        let map = value.as_mapping().unwrap();

        assert_eq!(map["name"], Value::from("Tonya"));
        assert_eq!(map["count"], Value::Int(3));
        assert_eq!(map["ratio"], Value::Float(0.5));
        assert_eq!(map["enabled"], Value::Bool(true));
        assert_eq!(map["nothing"], Value::Null);
        assert_eq!(
            map["list"],
            Value::Sequence(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(map["nested"], Value::from([("key", "value")]));
    }

    #[test]
    fn test_deserialize_scalar_keys() {
        let value: Value = serde_yaml::from_str("1: first\nfalse: off\n~: blank\n2.5: half\n").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["1", "0", "", "2.5"]);
        assert_eq!(map["1"], Value::from("first"));
        assert_eq!(map[""], Value::from("blank"));

        // `true` and `1` name the same key; the later entry wins in place.
        let value: Value = serde_yaml::from_str("1: first\ntrue: second\n").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["1"], Value::from("second"));
    }

    #[test]
    fn test_deserialize_rejects_collection_keys() {
        let err = serde_yaml::from_str::<Value>("? [a, b]\n: pair\n").unwrap_err();
        assert!(err.to_string().contains("sequence cannot be used as a mapping key"));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::mapping().type_name(), "mapping");
        assert_eq!(Value::Sequence(vec![]).type_name(), "sequence");
    }
}
