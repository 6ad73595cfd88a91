//! Serialization of typed values into a [`Node`] tree.
//!
//! [`NodeSerializer`] is the object → tree stage of the pipeline. Enums use the
//! externally tagged layout every mode understands (`{"Variant": value}`), and map keys
//! that are numbers, booleans or chars become strings.
//!
//! Under a converter with `fail_on_empty_objects` set, unit structs and structs
//! without fields are rejected instead of becoming `null` / `{}`.

use crate::{context, Error, Node, NodeMap, Number, Result};
use serde::ser::{self, Serialize};

/// Serializes any `T: Serialize` into a [`Node`].
///
/// ```rust
/// use serde_fluent::{to_node, Node};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let node = to_node(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(node.get("x").and_then(Node::as_i64), Some(1));
/// ```
pub fn to_node<T>(value: &T) -> Result<Node>
where
    T: ?Sized + Serialize,
{
    value.serialize(NodeSerializer)
}

/// A serializer producing [`Node`] values.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeSerializer;

pub struct SerializeVec {
    vec: Vec<Node>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: NodeMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn reject_empty(name: &'static str) -> Result<()> {
    if context::fail_on_empty_objects() {
        Err(Error::custom(format!(
            "no serializable fields found for `{}`",
            name
        )))
    } else {
        Ok(())
    }
}

fn tagged(variant: &'static str, value: Node) -> Node {
    let mut object = NodeMap::with_capacity(1);
    object.insert(variant.to_string(), value);
    Node::Object(object)
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        Ok(Node::Number(Number::Integer(v as i64)))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        Ok(Node::Number(Number::Integer(v as i64)))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        Ok(Node::Number(Number::Integer(v as i64)))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        Ok(Node::Number(Number::Integer(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        if let Ok(v) = i64::try_from(v) {
            Ok(Node::Number(Number::Integer(v)))
        } else if let Ok(v) = u64::try_from(v) {
            Ok(Node::Number(Number::Unsigned(v)))
        } else {
            Err(Error::custom(format!("integer {} out of range", v)))
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        Ok(Node::Number(Number::Integer(v as i64)))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        Ok(Node::Number(Number::Integer(v as i64)))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        Ok(Node::Number(Number::Integer(v as i64)))
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        Ok(Node::Number(Number::from_u64(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        u64::try_from(v)
            .map(|v| Node::Number(Number::from_u64(v)))
            .map_err(|_| Error::custom(format!("integer {} out of range", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::Number(Number::Float(v as f64)))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        let vec = v
            .iter()
            .map(|&b| Node::Number(Number::Integer(b as i64)))
            .collect();
        Ok(Node::Array(vec))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Node> {
        reject_empty(name)?;
        Ok(Node::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_node(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeMap> {
        if len == 0 {
            reject_empty(name)?;
        }
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_node(value)?);
        Ok(())
    }

    fn finish(self) -> Node {
        let array = Node::Array(self.vec);
        match self.variant {
            Some(variant) => tagged(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: NodeMap::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Node {
        let object = Node::Object(self.map);
        match self.variant {
            Some(variant) => tagged(variant, object),
            None => object,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_node(key)? {
            Node::String(s) => s,
            Node::Number(n) => n.to_string(),
            Node::Bool(b) => b.to_string(),
            other => {
                return Err(Error::custom(format!(
                    "map keys must be scalars, found {}",
                    other.kind()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}
