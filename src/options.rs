//! Configuration options applied when a converter is built.
//!
//! - [`ConverterOptions`]: the option set of one converter
//! - [`TemporalFormat`]: how date-time values are written
//! - [`DecimalFormat`]: how arbitrary-precision decimals are written
//!
//! The [`Default`] value is the fixed configuration used by
//! [`ConverterRegistry`](crate::ConverterRegistry) for every mode it builds on demand:
//! empty objects are accepted, date-times are written as ISO-8601 text and decimals as
//! strings.
//!
//! ## Examples
//!
//! ```rust
//! use serde_fluent::{ConverterOptions, TemporalFormat};
//!
//! let options = ConverterOptions::new()
//!     .with_temporal(TemporalFormat::EpochMillis)
//!     .with_indent(4);
//! assert_eq!(options.indent, 4);
//! assert!(!options.fail_on_empty_objects);
//! ```

/// How temporal values are written by [`temporal`](crate::temporal) fields.
///
/// ```rust
/// use serde_fluent::TemporalFormat;
///
/// assert_eq!(TemporalFormat::default(), TemporalFormat::Iso8601);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TemporalFormat {
    /// RFC 3339 / ISO-8601 text, e.g. `2024-01-15T10:30:00Z`.
    #[default]
    Iso8601,
    /// Milliseconds since the Unix epoch as an integer.
    EpochMillis,
}

/// How [`Decimal`](crate::Decimal) values are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DecimalFormat {
    /// Canonical decimal text, keeping every digit and the scale.
    #[default]
    String,
    /// A floating-point number. Digits beyond `f64` precision are lost.
    Number,
}

/// Configuration options of one converter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Reject unit structs and field-less structs during encoding.
    pub fail_on_empty_objects: bool,
    pub temporal: TemporalFormat,
    pub decimal: DecimalFormat,
    /// Spaces per level in pretty-printed JSON.
    pub indent: usize,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        ConverterOptions {
            fail_on_empty_objects: false,
            temporal: TemporalFormat::default(),
            decimal: DecimalFormat::default(),
            indent: 2,
        }
    }
}

impl ConverterOptions {
    /// Creates the default option set.
    ///
    /// ```rust
    /// use serde_fluent::{ConverterOptions, DecimalFormat};
    ///
    /// let options = ConverterOptions::new();
    /// assert_eq!(options.indent, 2);
    /// assert_eq!(options.decimal, DecimalFormat::String);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fail_on_empty_objects(mut self, fail: bool) -> Self {
        self.fail_on_empty_objects = fail;
        self
    }

    #[must_use]
    pub fn with_temporal(mut self, temporal: TemporalFormat) -> Self {
        self.temporal = temporal;
        self
    }

    #[must_use]
    pub fn with_decimal(mut self, decimal: DecimalFormat) -> Self {
        self.decimal = decimal;
        self
    }

    /// Sets the indentation used by pretty-printed output.
    ///
    /// Only JSON honors it; YAML output always uses two spaces.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}
