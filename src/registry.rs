//! Mode-keyed converter registry.

use crate::builder::{require, NullPolicy};
use crate::{Converter, Error, Mode, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Looks up the converter for a mode.
///
/// The accessor pipeline reaches converters only through this trait, so a registry
/// can be swapped for any other source of converters.
pub trait ConverterResolver: Send + Sync {
    fn resolve_for(&self, mode: Mode) -> Arc<Converter>;
}

/// Holds at most one converter per mode, building missing ones on first use.
///
/// Converters built on demand use [`Converter::with_defaults`]. Once a mode has a
/// converter every caller observes that same instance for the lifetime of the
/// registry, however many threads race on the first lookup.
///
/// ```rust
/// use serde_fluent::{ConverterRegistry, ConverterResolver, Mode};
/// use std::sync::Arc;
///
/// let registry = ConverterRegistry::new();
/// let json = registry.resolve_for(Mode::Json);
/// assert!(Arc::ptr_eq(&json, &registry.resolve_for(Mode::Json)));
/// assert!(!registry.contains(Mode::Yaml));
/// ```
#[derive(Default)]
pub struct ConverterRegistry {
    converters: RwLock<HashMap<Mode, Arc<Converter>>>,
}

impl ConverterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a caller-configured converter for `mode`.
    ///
    /// The converter is required: `None` fails with [`Error::MissingValue`]. A
    /// converter built for another mode, or a mode that already has a converter,
    /// fails with [`Error::Configuration`].
    ///
    /// ```rust
    /// use serde_fluent::{ConverterBuilder, ConverterRegistry, Mode};
    ///
    /// let registry = ConverterRegistry::new();
    /// let yaml = ConverterBuilder::for_mode(Mode::Yaml).build();
    /// registry.register(Mode::Yaml, yaml).unwrap();
    /// assert!(registry.contains(Mode::Yaml));
    /// assert!(registry.register(Mode::Json, None).is_err());
    /// ```
    pub fn register(&self, mode: Mode, converter: impl Into<Option<Converter>>) -> Result<&Self> {
        let Some(converter) = require("converter", converter.into(), NullPolicy::Throw)? else {
            return Ok(self);
        };
        ensure_mode(mode, &converter)?;

        let mut converters = self.converters.write();
        if converters.contains_key(&mode) {
            return Err(Error::configuration(format!(
                "a {} converter is already registered",
                mode
            )));
        }
        converters.insert(mode, Arc::new(converter));
        tracing::debug!(%mode, "converter registered");
        Ok(self)
    }

    pub(crate) fn from_converters(converters: HashMap<Mode, Arc<Converter>>) -> Self {
        ConverterRegistry {
            converters: RwLock::new(converters),
        }
    }

    #[must_use]
    pub fn contains(&self, mode: Mode) -> bool {
        self.converters.read().contains_key(&mode)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.read().is_empty()
    }
}

/// Fails unless `converter` was built for `mode`.
pub(crate) fn ensure_mode(mode: Mode, converter: &Converter) -> Result<()> {
    if converter.mode() == mode {
        return Ok(());
    }
    Err(Error::configuration(format!(
        "cannot register a {} converter as {}",
        converter.mode(),
        mode
    )))
}

impl ConverterResolver for ConverterRegistry {
    fn resolve_for(&self, mode: Mode) -> Arc<Converter> {
        if let Some(converter) = self.converters.read().get(&mode) {
            return Arc::clone(converter);
        }

        let mut converters = self.converters.write();
        let converter = converters.entry(mode).or_insert_with(|| {
            tracing::debug!(%mode, "building default converter");
            Arc::new(Converter::with_defaults(mode))
        });
        Arc::clone(converter)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modes: Vec<Mode> = self.converters.read().keys().copied().collect();
        modes.sort();
        f.debug_struct("ConverterRegistry")
            .field("modes", &modes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConverterBuilder, ConverterOptions, TEMPORAL_MODULE};

    #[test]
    fn test_resolve_builds_defaults() {
        let registry = ConverterRegistry::new();
        assert!(registry.is_empty());

        let yaml = registry.resolve_for(Mode::Yaml);
        assert_eq!(yaml.mode(), Mode::Yaml);
        assert!(yaml.config().has_module(TEMPORAL_MODULE));
        assert_eq!(yaml.config().options(), &ConverterOptions::default());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_modes_are_distinct_and_stable() {
        let registry = ConverterRegistry::new();
        let json = registry.resolve_for(Mode::Json);
        let yaml = registry.resolve_for(Mode::Yaml);
        assert!(!Arc::ptr_eq(&json, &yaml));
        assert!(Arc::ptr_eq(&json, &registry.resolve_for(Mode::Json)));
        assert!(Arc::ptr_eq(&yaml, &registry.resolve_for(Mode::Yaml)));
    }

    #[test]
    fn test_registered_converter_wins() {
        let registry = ConverterRegistry::new();
        let custom = ConverterBuilder::for_mode(Mode::Json)
            .configured(|options| options.indent = 8)
            .build();
        registry.register(Mode::Json, custom).unwrap();
        assert_eq!(registry.resolve_for(Mode::Json).config().options().indent, 8);
    }

    #[test]
    fn test_register_rejections() {
        let registry = ConverterRegistry::new();
        let missing = registry.register(Mode::Json, None);
        assert!(matches!(missing, Err(Error::MissingValue("converter"))));

        let mismatched = registry.register(Mode::Json, ConverterBuilder::for_mode(Mode::Yaml).build());
        assert!(matches!(mismatched, Err(Error::Configuration(_))));

        registry.resolve_for(Mode::Yaml);
        let taken = registry.register(Mode::Yaml, ConverterBuilder::for_mode(Mode::Yaml).build());
        assert!(matches!(taken, Err(Error::Configuration(_))));
    }
}
