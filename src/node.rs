//! The format-independent tree representation.
//!
//! [`Node`] is the middle stage of every conversion chain: text in any mode parses into a
//! `Node`, typed values serialize into one, and a `Node` renders back to text in any mode.
//! Because the tree does not belong to a particular format, a JSON document can be
//! parsed and rendered as YAML without going through a Rust type.
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_fluent::{node, Node};
//!
//! let number = Node::from(42);
//! let text = Node::from("hello");
//!
//! let obj = node!({
//!     "name": "Alice",
//!     "tags": ["rust", "serde"]
//! });
//! assert_eq!(obj.get("name").and_then(Node::as_str), Some("Alice"));
//! ```
//!
//! ## Extracting Values
//!
//! ```rust
//! use serde_fluent::Node;
//!
//! let value = Node::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::NodeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed tree value.
///
/// The variants are the shapes every supported mode can express. Temporal and
/// decimal values appear as strings or numbers depending on converter options.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Node>),
    Object(NodeMap),
}

/// A numeric tree value.
///
/// Integers that fit in `i64` are always stored as [`Number::Integer`];
/// [`Number::Unsigned`] only holds values above `i64::MAX`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    /// Builds a number from a `u64`, normalizing small values to [`Number::Integer`].
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        i64::try_from(value).map_or(Number::Unsigned(value), Number::Integer)
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::Unsigned(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it is integral and in range.
    ///
    /// ```rust
    /// use serde_fluent::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Integer(i) => Some(i),
            Number::Unsigned(_) => None,
            Number::Float(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts this number to a `u64` if it is integral and non-negative.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::Integer(i) => u64::try_from(i).ok(),
            Number::Unsigned(u) => Some(u),
            Number::Float(f) => {
                if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
                    Some(f as u64)
                } else {
                    None
                }
            }
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Unsigned(u) => u as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Unsigned(u) => write!(f, "{}", u),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Integer(value as i64)
                }
            }

            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::from_u64(value)
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Node::Number(Number::from_u64(value))
    }
}

impl From<f32> for Node {
    fn from(value: f32) -> Self {
        Node::Number(Number::Float(value as f64))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Number(Number::Float(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Array(value)
    }
}

impl From<NodeMap> for Node {
    fn from(value: NodeMap) -> Self {
        Node::Object(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Null, Into::into)
    }
}

impl Node {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Node::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Node::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Node::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    /// Returns `true` for an object with no fields or an array with no elements.
    #[must_use]
    pub fn is_empty_container(&self) -> bool {
        match self {
            Node::Array(arr) => arr.is_empty(),
            Node::Object(obj) => obj.is_empty(),
            _ => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&NodeMap> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up a field of an object node.
    ///
    /// Returns `None` for missing fields and for nodes that are not objects.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Returns a short name of the node's shape, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }
}

/// Renders the node as compact JSON.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Node::Number(Number::Unsigned(u)) => serializer.serialize_u64(*u),
            Node::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Node::String(s) => serializer.serialize_str(s),
            Node::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Node::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any tree value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Node::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Node::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Node::Number(Number::from_u64(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Node::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Node::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Node::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Node::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Node::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Node::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = NodeMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<NodeKey, Node>()? {
                    values.insert(key.0, value);
                }
                Ok(Node::Object(values))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}

/// Object key accepting scalar keys, which YAML allows and JSON does not.
struct NodeKey(String);

impl<'de> Deserialize<'de> for NodeKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = NodeKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar object key")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<NodeKey, E> {
                Ok(NodeKey(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<NodeKey, E> {
                Ok(NodeKey(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<NodeKey, E> {
                Ok(NodeKey(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<NodeKey, E> {
                Ok(NodeKey(value.to_string()))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<NodeKey, E> {
                Ok(NodeKey(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<NodeKey, E> {
                Ok(NodeKey(value))
            }

            fn visit_unit<E: de::Error>(self) -> Result<NodeKey, E> {
                Ok(NodeKey("null".to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

impl TryFrom<Node> for i64 {
    type Error = crate::Error;

    fn try_from(value: Node) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::custom(format!("expected integer, found {}", value.kind())))
    }
}

impl TryFrom<Node> for f64 {
    type Error = crate::Error;

    fn try_from(value: Node) -> crate::Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| crate::Error::custom(format!("expected number, found {}", value.kind())))
    }
}

impl TryFrom<Node> for bool {
    type Error = crate::Error;

    fn try_from(value: Node) -> crate::Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| crate::Error::custom(format!("expected bool, found {}", value.kind())))
    }
}

impl TryFrom<Node> for String {
    type Error = crate::Error;

    fn try_from(value: Node) -> crate::Result<Self> {
        match value {
            Node::String(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_normalization() {
        assert_eq!(Number::from_u64(5), Number::Integer(5));
        assert_eq!(Number::from_u64(u64::MAX), Number::Unsigned(u64::MAX));
        assert_eq!(Number::Unsigned(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Number::Integer(-1).as_u64(), None);
    }

    #[test]
    fn test_float_bounds_do_not_saturate() {
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        assert_eq!(Number::Float(two_pow_63).as_i64(), None);
        assert_eq!(Number::Float(-two_pow_63).as_i64(), Some(i64::MIN));
        assert_eq!(Number::Float(two_pow_63).as_u64(), Some(1 << 63));
        assert_eq!(Number::Float(two_pow_63 * 2.0).as_u64(), None);
    }

    #[test]
    fn test_display_is_compact_json() {
        let mut map = NodeMap::new();
        map.insert("a".to_string(), Node::from(1));
        map.insert("b".to_string(), Node::Array(vec![Node::Null, Node::from("x")]));
        assert_eq!(Node::Object(map).to_string(), r#"{"a":1,"b":[null,"x"]}"#);
    }

    #[test]
    fn test_yaml_scalar_keys() {
        let node: Node = serde_yaml::from_str("1: one\ntrue: yes").unwrap();
        assert_eq!(node.get("1").and_then(Node::as_str), Some("one"));
        assert!(node.get("true").is_some());
    }

    #[test]
    fn test_try_from() {
        assert_eq!(i64::try_from(Node::from(7)).unwrap(), 7);
        assert!(bool::try_from(Node::from("no")).is_err());
        assert_eq!(String::try_from(Node::from("s")).unwrap(), "s");
    }
}
