//! Configured serialization engines.
//!
//! A [`Converter`] binds one [`Mode`] to a fixed [`ConverterConfig`] and exposes the
//! whole-value operations the pipeline needs:
//!
//! | Operation | From | To |
//! |---|---|---|
//! | [`encode`](Converter::encode), [`encode_pretty`](Converter::encode_pretty) | object | text |
//! | [`decode`](Converter::decode) | text | object |
//! | [`parse`](Converter::parse) | text | tree |
//! | [`to_tree`](Converter::to_tree) | object | tree |
//! | [`from_tree`](Converter::from_tree) | tree | object |
//! | [`render`](Converter::render), [`render_pretty`](Converter::render_pretty) | tree | text |
//!
//! Every operation runs inside the encoding [`context`](crate::context) of its
//! converter and reports engine failures as [`Error::Encoding`].
//!
//! Converters are immutable once built.
//!
//! ```rust
//! use serde_fluent::{Converter, Mode};
//!
//! let yaml = Converter::with_defaults(Mode::Yaml);
//! let tree = yaml.parse("name: a\nindex: 1\n").unwrap();
//! assert_eq!(Converter::with_defaults(Mode::Json).render(&tree).unwrap(), r#"{"name":"a","index":1}"#);
//! ```

use crate::builder::Builder;
use crate::module::{default_modules, Module};
use crate::{context, from_node, to_node, ConverterOptions, Error, Mode, Node, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The configuration a converter was built with.
pub struct ConverterConfig {
    mode: Mode,
    options: ConverterOptions,
    modules: Vec<Arc<dyn Module>>,
}

impl ConverterConfig {
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Returns `true` if a module registered under `name` is present.
    #[must_use]
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.iter().any(|module| module.name() == name)
    }

    /// Names of the registered modules, in registration order.
    pub fn module_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.iter().map(|module| module.name())
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("mode", &self.mode)
            .field("options", &self.options)
            .field("modules", &self.module_names().collect::<Vec<_>>())
            .finish()
    }
}

/// A serialization engine configured for one mode.
#[derive(Clone, Debug)]
pub struct Converter {
    config: Arc<ConverterConfig>,
}

impl Converter {
    /// Builds a converter for `mode` with the default options and modules.
    #[must_use]
    pub fn with_defaults(mode: Mode) -> Self {
        ConverterBuilder::for_mode(mode)
            .with_modules(default_modules())
            .build()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    #[must_use]
    pub fn config(&self) -> &Arc<ConverterConfig> {
        &self.config
    }

    /// Serializes `value` to compact text.
    pub fn encode<T>(&self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        self.encode_with(value, false)
    }

    /// Serializes `value` to indented, multi-line text.
    ///
    /// JSON indents with [`ConverterOptions::indent`] spaces; YAML output is always in
    /// block style.
    pub fn encode_pretty<T>(&self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        self.encode_with(value, true)
    }

    fn encode_with<T>(&self, value: &T, pretty: bool) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        let _context = context::enter(Arc::clone(&self.config));
        // Text engines never see empty structs, so strict encoding goes through a tree.
        if self.config.options.fail_on_empty_objects {
            let tree = to_node(value).map_err(|e| Error::encoding(self.mode(), e))?;
            return self.write(&tree, pretty);
        }
        self.write(value, pretty)
    }

    fn write<T>(&self, value: &T, pretty: bool) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        let mode = self.mode();
        match (mode, pretty) {
            (Mode::Json, false) => serde_json::to_string(value).map_err(|e| Error::encoding(mode, e)),
            (Mode::Json, true) => {
                let indent = " ".repeat(self.config.options.indent);
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut buffer = Vec::with_capacity(128);
                let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
                value
                    .serialize(&mut serializer)
                    .map_err(|e| Error::encoding(mode, e))?;
                String::from_utf8(buffer).map_err(|e| Error::encoding(mode, e))
            }
            (Mode::Yaml, _) => serde_yaml::to_string(value).map_err(|e| Error::encoding(mode, e)),
        }
    }

    /// Deserializes a `T` from text.
    pub fn decode<T>(&self, text: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let _context = context::enter(Arc::clone(&self.config));
        let mode = self.mode();
        match mode {
            Mode::Json => serde_json::from_str(text).map_err(|e| Error::encoding(mode, e)),
            Mode::Yaml => serde_yaml::from_str(text).map_err(|e| Error::encoding(mode, e)),
        }
    }

    /// Parses text into a tree.
    pub fn parse(&self, text: &str) -> Result<Node> {
        self.decode(text)
    }

    /// Converts `value` into a tree without going through text.
    pub fn to_tree<T>(&self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        let _context = context::enter(Arc::clone(&self.config));
        to_node(value).map_err(|e| Error::encoding(self.mode(), e))
    }

    /// Converts a tree into a `T`.
    pub fn from_tree<T>(&self, node: Node) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let _context = context::enter(Arc::clone(&self.config));
        from_node(node).map_err(|e| Error::encoding(self.mode(), e))
    }

    /// Writes a tree as compact text.
    pub fn render(&self, node: &Node) -> Result<String> {
        self.encode(node)
    }

    /// Writes a tree as indented text.
    pub fn render_pretty(&self, node: &Node) -> Result<String> {
        self.encode_pretty(node)
    }
}

/// Builds a [`Converter`] for one mode.
///
/// Starts from [`ConverterOptions::default`] and no modules. Registering a module
/// whose name is already present replaces the earlier one.
///
/// ```rust
/// use serde_fluent::{ConverterBuilder, Mode, TemporalFormat, TemporalModule};
///
/// let converter = ConverterBuilder::for_mode(Mode::Json)
///     .configured(|options| options.temporal = TemporalFormat::EpochMillis)
///     .with_module(TemporalModule)
///     .build();
/// assert_eq!(converter.config().options().temporal, TemporalFormat::EpochMillis);
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    mode: Mode,
    options: ConverterOptions,
    modules: Vec<Arc<dyn Module>>,
}

impl Builder for ConverterBuilder {}

impl ConverterBuilder {
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        ConverterBuilder {
            mode,
            options: ConverterOptions::default(),
            modules: Vec::new(),
        }
    }

    /// Replaces the option set; `None` keeps the current one.
    #[must_use]
    pub fn with_options(self, options: impl Into<Option<ConverterOptions>>) -> Self {
        self.set_optional(options.into(), |builder, options| builder.options = options)
    }

    /// Adjusts the option set in place.
    #[must_use]
    pub fn configured<F>(self, configurator: F) -> Self
    where
        F: FnOnce(&mut ConverterOptions),
    {
        self.run_and_return_this(Some(|builder: &mut Self| configurator(&mut builder.options)))
    }

    #[must_use]
    pub fn with_module<M>(self, module: M) -> Self
    where
        M: Module + 'static,
    {
        self.with_shared_module(Arc::new(module))
    }

    #[must_use]
    pub fn with_shared_module(mut self, module: Arc<dyn Module>) -> Self {
        self.modules.retain(|existing| existing.name() != module.name());
        self.modules.push(module);
        self
    }

    #[must_use]
    pub fn with_modules<I>(self, modules: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Module>>,
    {
        modules
            .into_iter()
            .fold(self, |builder, module| builder.with_shared_module(module))
    }

    #[must_use]
    pub fn build(self) -> Converter {
        let config = ConverterConfig {
            mode: self.mode,
            options: self.options,
            modules: self.modules,
        };
        tracing::debug!(
            mode = %config.mode,
            modules = ?config.module_names().collect::<Vec<_>>(),
            "converter constructed"
        );
        Converter {
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{node, Decimal, DecimalFormat, TemporalModule, TEMPORAL_MODULE};
    use chrono::{DateTime, TimeZone, Utc};
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Record {
        index: i64,
        name: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Stamp {
        #[serde(with = "crate::temporal")]
        at: DateTime<Utc>,
    }

    #[derive(Serialize)]
    struct Empty {}

    fn record() -> Record {
        Record {
            index: 1,
            name: "a".to_string(),
        }
    }

    #[test]
    fn test_encode_decode_each_mode() {
        for mode in Mode::ALL {
            let converter = Converter::with_defaults(mode);
            let text = converter.encode(&record()).unwrap();
            assert_eq!(converter.decode::<Record>(&text).unwrap(), record());
        }
    }

    #[test]
    fn test_pretty_json_uses_indent() {
        let converter = ConverterBuilder::for_mode(Mode::Json)
            .configured(|options| options.indent = 4)
            .build();
        let text = converter.encode_pretty(&record()).unwrap();
        assert!(text.contains("\n    \"index\": 1"));
    }

    #[test]
    fn test_tree_operations() {
        let converter = Converter::with_defaults(Mode::Json);
        let tree = converter.to_tree(&record()).unwrap();
        assert_eq!(tree, node!({ "index": 1, "name": "a" }));
        assert_eq!(converter.render(&tree).unwrap(), r#"{"index":1,"name":"a"}"#);
        assert_eq!(converter.from_tree::<Record>(tree).unwrap(), record());
    }

    #[test]
    fn test_yaml_parse_renders_as_json() {
        let yaml = Converter::with_defaults(Mode::Yaml);
        let tree = yaml.parse("index: 1\nname: a\n").unwrap();
        assert_eq!(tree, node!({ "index": 1, "name": "a" }));
    }

    #[test]
    fn test_engine_error_is_wrapped() {
        let converter = Converter::with_defaults(Mode::Json);
        let err = converter.decode::<Record>("{\"index\": \"one\"}").unwrap_err();
        assert!(matches!(err, Error::Encoding { mode: Mode::Json, .. }));
    }

    #[test]
    fn test_empty_objects_follow_options() {
        let lenient = Converter::with_defaults(Mode::Json);
        assert_eq!(lenient.encode(&Empty {}).unwrap(), "{}");
        assert_eq!(lenient.to_tree(&Empty {}).unwrap(), node!({}));

        let strict = ConverterBuilder::for_mode(Mode::Json)
            .configured(|options| options.fail_on_empty_objects = true)
            .build();
        assert!(strict.to_tree(&Empty {}).unwrap_err().is_encoding());
        assert!(strict.encode(&Empty {}).unwrap_err().is_encoding());
        assert_eq!(strict.encode(&record()).unwrap(), r#"{"index":1,"name":"a"}"#);
    }

    #[test]
    fn test_temporal_requires_module() {
        let stamp = Stamp {
            at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        };

        let bare = ConverterBuilder::for_mode(Mode::Json).build();
        assert!(!bare.config().has_module(TEMPORAL_MODULE));
        assert!(bare.encode(&stamp).is_err());

        let with_module = ConverterBuilder::for_mode(Mode::Json)
            .with_module(TemporalModule)
            .build();
        let text = with_module.encode(&stamp).unwrap();
        assert_eq!(text, r#"{"at":"2024-01-15T10:30:00Z"}"#);
        assert_eq!(with_module.decode::<Stamp>(&text).unwrap(), stamp);
    }

    #[test]
    fn test_decimal_format() {
        let value: Decimal = "12.50".parse().unwrap();
        let text = Converter::with_defaults(Mode::Json).encode(&value).unwrap();
        assert_eq!(text, "\"12.50\"");

        let numeric = ConverterBuilder::for_mode(Mode::Json)
            .configured(|options| options.decimal = DecimalFormat::Number)
            .build();
        assert_eq!(numeric.encode(&value).unwrap(), "12.5");
    }

    #[test]
    fn test_modules_deduplicate_by_name() {
        let converter = ConverterBuilder::for_mode(Mode::Yaml)
            .with_module(TemporalModule)
            .with_modules(default_modules())
            .build();
        assert_eq!(converter.config().module_names().count(), 1);
    }
}
