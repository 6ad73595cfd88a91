/// Builds a [`Node`](crate::Node) from JSON-like syntax.
///
/// ```rust
/// use serde_fluent::{node, Node};
///
/// let value = node!({
///     "index": 1,
///     "name": "a",
///     "tags": ["x", "y"],
///     "parent": null
/// });
///
/// assert_eq!(value.get("index").and_then(Node::as_i64), Some(1));
/// assert!(value.get("parent").map_or(false, Node::is_null));
/// ```
///
/// Any other expression is converted with [`Node::from`](crate::Node).
#[macro_export]
macro_rules! node {
    (null) => {
        $crate::Node::Null
    };

    (true) => {
        $crate::Node::Bool(true)
    };

    (false) => {
        $crate::Node::Bool(false)
    };

    ([]) => {
        $crate::Node::Array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Node::Array(vec![$($crate::node!($elem)),*])
    };

    ({}) => {
        $crate::Node::Object($crate::NodeMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::NodeMap::new();
        $(
            object.insert($key.to_string(), $crate::node!($value));
        )*
        $crate::Node::Object(object)
    }};

    ($other:expr) => {
        $crate::Node::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Node, NodeMap, Number};

    #[test]
    fn test_node_macro_primitives() {
        assert_eq!(node!(null), Node::Null);
        assert_eq!(node!(true), Node::Bool(true));
        assert_eq!(node!(42), Node::Number(Number::Integer(42)));
        assert_eq!(node!(3.5), Node::Number(Number::Float(3.5)));
        assert_eq!(node!("hello"), Node::String("hello".to_string()));
    }

    #[test]
    fn test_node_macro_nested() {
        assert_eq!(node!({}), Node::Object(NodeMap::new()));
        assert_eq!(node!([]), Node::Array(vec![]));

        let obj = node!({
            "name": "Alice",
            "scores": [1, 2],
            "meta": { "active": false }
        });

        assert_eq!(obj.get("name").and_then(Node::as_str), Some("Alice"));
        assert_eq!(obj.get("scores").and_then(Node::as_array).map(Vec::len), Some(2));
        assert_eq!(
            obj.get("meta").and_then(|m| m.get("active")),
            Some(&Node::Bool(false))
        );
    }
}
