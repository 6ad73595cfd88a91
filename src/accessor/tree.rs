use super::factory::Shared;
use super::{Held, Instance, TextAccessor};
use crate::{Mode, Node, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Weak};

/// Holds a parsed [`Node`] tree.
pub struct TreeAccessor {
    held: Held<Node>,
}

impl TreeAccessor {
    pub(crate) fn new(factory: Weak<Shared>) -> Self {
        TreeAccessor {
            held: Held::new("tree", factory),
        }
    }

    /// Seeds the calling thread with `node`; a missing value is an error.
    pub fn initialize(&self, node: impl Into<Option<Node>>) -> Result<&Self> {
        self.held.initialize(node)?;
        Ok(self)
    }

    /// Returns the held tree and clears it.
    pub fn get(&self) -> Result<Node> {
        self.held.take()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.held.is_set()
    }

    /// Writes the tree as compact JSON.
    pub fn as_text(&self) -> Result<Arc<TextAccessor>> {
        self.as_text_in(Mode::Json)
    }

    pub fn as_text_in(&self, mode: Mode) -> Result<Arc<TextAccessor>> {
        self.held.convert(|factory, tree| {
            let text = factory.converter(mode).render(&tree)?;
            tracing::trace!(%mode, "tree -> text");
            factory.text(text)
        })
    }

    /// Writes the tree as indented text of `mode`.
    pub fn as_pretty_text_in(&self, mode: Mode) -> Result<Arc<TextAccessor>> {
        self.held.convert(|factory, tree| {
            let text = factory.converter(mode).render_pretty(&tree)?;
            tracing::trace!(%mode, "tree -> pretty text");
            factory.text(text)
        })
    }

    pub fn as_type<T>(&self) -> Result<Instance<T>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        self.held.convert(|factory, tree| {
            let value: T = factory.converter(Mode::Json).from_tree(tree)?;
            tracing::trace!(to = std::any::type_name::<T>(), "tree -> object");
            factory.object(value)
        })
    }
}

impl fmt::Debug for TreeAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeAccessor")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{node, AccessorFactory, ConverterRegistry, Error, Mode};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn factory() -> AccessorFactory {
        AccessorFactory::new(Arc::new(ConverterRegistry::new()))
    }

    #[test]
    fn test_as_text_modes() {
        let factory = factory();
        let tree = node!({ "a": 1, "b": [true, null] });

        let json = factory.tree(tree.clone()).unwrap().as_text().unwrap().get().unwrap();
        assert_eq!(json, r#"{"a":1,"b":[true,null]}"#);

        let yaml = factory
            .tree(tree)
            .unwrap()
            .as_text_in(Mode::Yaml)
            .unwrap()
            .get()
            .unwrap();
        assert_eq!(yaml, "a: 1\nb:\n- true\n- null\n");
    }

    #[test]
    fn test_as_pretty_text() {
        let factory = factory();
        let text = factory
            .tree(node!({ "a": [1] }))
            .unwrap()
            .as_pretty_text_in(Mode::Json)
            .unwrap()
            .get()
            .unwrap();
        assert_eq!(text, "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_as_type_shape_mismatch() {
        let factory = factory();
        let tree = factory.tree(node!([1, 2])).unwrap();
        let result = tree.as_type::<BTreeMap<String, i64>>();
        assert!(matches!(result, Err(Error::Encoding { .. })));
        assert!(matches!(tree.get(), Err(Error::EmptyAccessor("tree"))));
    }
}
