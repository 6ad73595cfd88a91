use super::object::{Payload, Typed};
use super::{Instance, ObjectAccessor, TextAccessor, TreeAccessor};
use crate::{Converter, ConverterResolver, Lazy, Mode, Node, Result};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Weak};

/// State shared between a factory and the accessors it created.
pub(crate) struct Shared {
    resolver: Arc<dyn ConverterResolver>,
    text: Lazy<TextAccessor>,
    tree: Lazy<TreeAccessor>,
    object: Lazy<ObjectAccessor>,
}

impl Shared {
    pub(crate) fn converter(&self, mode: Mode) -> Arc<Converter> {
        self.resolver.resolve_for(mode)
    }

    pub(crate) fn text(&self, text: String) -> Result<Arc<TextAccessor>> {
        let accessor = self.text.get()?;
        accessor.initialize(text)?;
        Ok(accessor)
    }

    pub(crate) fn tree(&self, node: Node) -> Result<Arc<TreeAccessor>> {
        let accessor = self.tree.get()?;
        accessor.initialize(node)?;
        Ok(accessor)
    }

    pub(crate) fn object<T>(&self, value: T) -> Result<Instance<T>>
    where
        T: Serialize + Send + 'static,
    {
        let accessor = self.object.get()?;
        accessor.seed(Box::new(Typed(value)) as Box<dyn Payload>)?;
        Ok(Instance::new(accessor))
    }
}

/// Hands out the shared accessors, seeded for the calling thread.
///
/// The factory owns one accessor per kind, each created on first use. Accessors keep
/// only a weak link back, so using one after its factory is dropped fails with
/// [`Error::FactoryDropped`](crate::Error::FactoryDropped).
///
/// ```rust
/// use serde_fluent::{AccessorFactory, ConverterRegistry};
/// use std::sync::Arc;
///
/// let factory = AccessorFactory::new(Arc::new(ConverterRegistry::new()));
/// let first = factory.text("[1]").unwrap();
/// let second = factory.text("[2]").unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(second.get().unwrap(), "[2]");
/// ```
pub struct AccessorFactory {
    shared: Arc<Shared>,
}

impl AccessorFactory {
    pub fn new(resolver: Arc<dyn ConverterResolver>) -> Self {
        let shared = Arc::new_cyclic(|factory: &Weak<Shared>| {
            let text = {
                let factory = factory.clone();
                Lazy::named("text accessor", move || Some(TextAccessor::new(factory.clone())))
            };
            let tree = {
                let factory = factory.clone();
                Lazy::named("tree accessor", move || Some(TreeAccessor::new(factory.clone())))
            };
            let object = {
                let factory = factory.clone();
                Lazy::named("object accessor", move || Some(ObjectAccessor::new(factory.clone())))
            };
            Shared {
                resolver,
                text,
                tree,
                object,
            }
        });
        AccessorFactory { shared }
    }

    /// Seeds the text accessor with `text` for the calling thread.
    pub fn text(&self, text: impl Into<String>) -> Result<Arc<TextAccessor>> {
        self.shared.text(text.into())
    }

    /// Seeds the tree accessor with `node` for the calling thread.
    pub fn tree(&self, node: Node) -> Result<Arc<TreeAccessor>> {
        self.shared.tree(node)
    }

    /// Seeds the object accessor with `value` for the calling thread.
    pub fn object<T>(&self, value: T) -> Result<Instance<T>>
    where
        T: Serialize + Send + 'static,
    {
        self.shared.object(value)
    }

    pub fn converter(&self, mode: Mode) -> Arc<Converter> {
        self.shared.converter(mode)
    }
}

impl fmt::Debug for AccessorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorFactory")
            .field("text", &self.shared.text.is_initialized())
            .field("tree", &self.shared.tree.is_initialized())
            .field("object", &self.shared.object.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConverterRegistry, Error};

    fn factory() -> AccessorFactory {
        AccessorFactory::new(Arc::new(ConverterRegistry::new()))
    }

    #[test]
    fn test_accessors_are_created_lazily() {
        let factory = factory();
        assert!(!factory.shared.tree.is_initialized());
        factory.tree(Node::Null).unwrap();
        assert!(factory.shared.tree.is_initialized());
        assert!(!factory.shared.text.is_initialized());
    }

    #[test]
    fn test_reuses_one_accessor_per_kind() {
        let factory = factory();
        let a = factory.object(1u8).unwrap();
        let b = factory.object("two").unwrap();
        assert!(Arc::ptr_eq(a.accessor(), b.accessor()));
    }

    #[test]
    fn test_dropped_factory() {
        let factory = factory();
        let text = factory.text("{}").unwrap();
        drop(factory);
        assert!(matches!(text.as_tree(), Err(Error::FactoryDropped)));
        assert!(!text.is_set());
        assert!(matches!(text.get(), Err(Error::EmptyAccessor("text"))));
    }
}
