//! The entry point of the pipeline.

use crate::builder::{Builder, NullPolicy};
use crate::registry::ensure_mode;
use crate::{
    AccessorFactory, Converter, ConverterRegistry, ConverterResolver, Instance, Mode, Node, Result,
    TextAccessor, TreeAccessor,
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Owns a converter registry and the accessor factory built on it.
///
/// A `Fluent` is meant to be created once and shared; every thread seeds its own
/// values into the same accessors.
///
/// ```rust
/// use serde_fluent::{node, Fluent};
///
/// let fluent = Fluent::new();
/// let json = fluent.tree(node!({ "ok": true })).unwrap().as_text().unwrap().get().unwrap();
/// assert_eq!(json, r#"{"ok":true}"#);
/// ```
pub struct Fluent {
    registry: Arc<ConverterRegistry>,
    factory: AccessorFactory,
}

impl Fluent {
    /// Creates a pipeline whose converters are built with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ConverterRegistry::new()))
    }

    /// Creates a pipeline over an existing registry.
    #[must_use]
    pub fn with_registry(registry: Arc<ConverterRegistry>) -> Self {
        let resolver: Arc<dyn ConverterResolver> = registry.clone();
        Fluent {
            factory: AccessorFactory::new(resolver),
            registry,
        }
    }

    /// Starts a pipeline with caller-configured converters.
    ///
    /// ```rust
    /// use serde_fluent::{ConverterBuilder, Fluent, Mode};
    ///
    /// let fluent = Fluent::builder()
    ///     .with_converter(Mode::Json, ConverterBuilder::for_mode(Mode::Json).configured(|o| o.indent = 4).build())
    ///     .unwrap()
    ///     .build();
    /// let pretty = fluent.text("[1]").unwrap().pretty().unwrap();
    /// assert_eq!(pretty, "[\n    1\n]");
    /// ```
    #[must_use]
    pub fn builder() -> FluentBuilder {
        FluentBuilder::default()
    }

    pub fn text(&self, text: impl Into<String>) -> Result<Arc<TextAccessor>> {
        self.factory.text(text)
    }

    pub fn tree(&self, node: Node) -> Result<Arc<TreeAccessor>> {
        self.factory.tree(node)
    }

    pub fn object<T>(&self, value: T) -> Result<Instance<T>>
    where
        T: Serialize + Send + 'static,
    {
        self.factory.object(value)
    }

    pub fn converter(&self, mode: Mode) -> Arc<Converter> {
        self.registry.resolve_for(mode)
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn factory(&self) -> &AccessorFactory {
        &self.factory
    }
}

impl Default for Fluent {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fluent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fluent")
            .field("registry", &self.registry)
            .field("factory", &self.factory)
            .finish()
    }
}

/// Collects converters for a private registry; see [`Fluent::builder`].
#[derive(Debug, Default)]
pub struct FluentBuilder {
    converters: HashMap<Mode, Converter>,
}

impl Builder for FluentBuilder {}

impl FluentBuilder {
    /// Uses `converter` for `mode`. A later call for the same mode replaces it.
    ///
    /// The converter is required; `None` fails with
    /// [`Error::MissingValue`](crate::Error::MissingValue), and a converter built for
    /// another mode fails with [`Error::Configuration`](crate::Error::Configuration).
    pub fn with_converter(self, mode: Mode, converter: impl Into<Option<Converter>>) -> Result<Self> {
        let converter = converter.into();
        if let Some(converter) = &converter {
            ensure_mode(mode, converter)?;
        }
        self.set_and_return_this(
            "converter",
            converter,
            |builder, converter| {
                if let Some(converter) = converter {
                    builder.converters.insert(mode, converter);
                }
            },
            NullPolicy::Throw,
        )
    }

    #[must_use]
    pub fn build(self) -> Fluent {
        let converters = self
            .converters
            .into_iter()
            .map(|(mode, converter)| (mode, Arc::new(converter)))
            .collect();
        Fluent::with_registry(Arc::new(ConverterRegistry::from_converters(converters)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConverterBuilder, Error};

    #[test]
    fn test_builder_seeds_registry() {
        let yaml = ConverterBuilder::for_mode(Mode::Yaml).build();
        let fluent = Fluent::builder().with_converter(Mode::Yaml, yaml).unwrap().build();
        assert!(fluent.registry().contains(Mode::Yaml));
        assert!(!fluent.registry().contains(Mode::Json));
        assert!(fluent.converter(Mode::Yaml).config().module_names().next().is_none());
    }

    #[test]
    fn test_builder_rejects_missing_and_mismatched() {
        assert!(matches!(
            Fluent::builder().with_converter(Mode::Json, None),
            Err(Error::MissingValue("converter"))
        ));
        assert!(matches!(
            Fluent::builder().with_converter(Mode::Json, ConverterBuilder::for_mode(Mode::Yaml).build()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Fluent::new();
        let b = Fluent::new();
        let text = a.text("[1]").unwrap();
        b.text("[2]").unwrap();
        assert_eq!(text.get().unwrap(), "[1]");
        assert!(!Arc::ptr_eq(&a.converter(Mode::Json), &b.converter(Mode::Json)));
    }
}
