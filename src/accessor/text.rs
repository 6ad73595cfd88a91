use super::factory::Shared;
use super::{Held, Instance, TreeAccessor};
use crate::{Mode, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Weak};

/// Holds encoded text.
///
/// Methods without a mode read JSON; the `_in` and `_from` variants name the mode of
/// the held text.
pub struct TextAccessor {
    held: Held<String>,
}

impl TextAccessor {
    pub(crate) fn new(factory: Weak<Shared>) -> Self {
        TextAccessor {
            held: Held::new("text", factory),
        }
    }

    /// Seeds the calling thread with `text`; a missing value is an error.
    pub fn initialize(&self, text: impl Into<Option<String>>) -> Result<&Self> {
        self.held.initialize(text)?;
        Ok(self)
    }

    /// Returns the held text and clears it.
    pub fn get(&self) -> Result<String> {
        self.held.take()
    }

    /// Returns `true` if the calling thread holds text here.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.held.is_set()
    }

    /// Re-indents the held JSON.
    ///
    /// ```rust
    /// use serde_fluent::Fluent;
    ///
    /// let pretty = Fluent::new().text(r#"{"a":[1,2]}"#).unwrap().pretty().unwrap();
    /// assert_eq!(pretty, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    /// ```
    pub fn pretty(&self) -> Result<String> {
        self.pretty_in(Mode::Json)
    }

    /// Re-indents the held text of `mode`.
    pub fn pretty_in(&self, mode: Mode) -> Result<String> {
        self.held.convert(|factory, text| {
            let converter = factory.converter(mode);
            converter.render_pretty(&converter.parse(&text)?)
        })
    }

    pub fn as_tree(&self) -> Result<Arc<TreeAccessor>> {
        self.as_tree_from(Mode::Json)
    }

    /// Parses the held text of `mode` into a tree.
    pub fn as_tree_from(&self, mode: Mode) -> Result<Arc<TreeAccessor>> {
        self.held.convert(|factory, text| {
            let tree = factory.converter(mode).parse(&text)?;
            tracing::trace!(%mode, "text -> tree");
            factory.tree(tree)
        })
    }

    pub fn as_type<T>(&self) -> Result<Instance<T>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        self.as_type_from(Mode::Json)
    }

    /// Decodes the held text of `mode` into a `T`.
    pub fn as_type_from<T>(&self, mode: Mode) -> Result<Instance<T>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        self.held.convert(|factory, text| {
            let value: T = factory.converter(mode).decode(&text)?;
            tracing::trace!(%mode, to = std::any::type_name::<T>(), "text -> object");
            factory.object(value)
        })
    }
}

impl fmt::Debug for TextAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextAccessor")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{node, AccessorFactory, ConverterRegistry, Error, Mode};
    use std::sync::Arc;

    fn factory() -> AccessorFactory {
        AccessorFactory::new(Arc::new(ConverterRegistry::new()))
    }

    #[test]
    fn test_get_consumes() {
        let factory = factory();
        let text = factory.text("[1]").unwrap();
        assert_eq!(text.get().unwrap(), "[1]");
        assert!(matches!(text.get(), Err(Error::EmptyAccessor("text"))));
    }

    #[test]
    fn test_initialize_requires_value() {
        let factory = factory();
        let text = factory.text("x").unwrap();
        assert!(matches!(text.initialize(None), Err(Error::MissingValue(_))));
        assert_eq!(text.get().unwrap(), "x");
    }

    #[test]
    fn test_as_tree_from_yaml() {
        let factory = factory();
        let tree = factory
            .text("name: a\ntags: [x, y]\n")
            .unwrap()
            .as_tree_from(Mode::Yaml)
            .unwrap()
            .get()
            .unwrap();
        assert_eq!(tree, node!({ "name": "a", "tags": ["x", "y"] }));
    }

    #[test]
    fn test_failed_hop_leaves_both_accessors_empty() {
        let factory = factory();
        let tree = factory.tree(node!(null)).unwrap();
        tree.get().unwrap();

        let text = factory.text("{ broken").unwrap();
        let err = text.as_tree().unwrap_err();
        assert!(matches!(err, Error::Encoding { mode: Mode::Json, .. }));
        assert!(!text.is_set());
        assert!(!tree.is_set());
    }

    #[test]
    fn test_pretty_yaml() {
        let factory = factory();
        let pretty = factory
            .text("{a: 1, b: [x]}")
            .unwrap()
            .pretty_in(Mode::Yaml)
            .unwrap();
        assert_eq!(pretty, "a: 1\nb:\n- x\n");
    }
}
