//! Error types for the conversion pipeline.
//!
//! Every failure in this crate is reported through a single [`Error`] enum so callers
//! see one error type per category with the original cause preserved.
//!
//! ## Error Categories
//!
//! - **Configuration**: unknown mode names, missing required builder values
//! - **Encoding**: the serialization engine rejected the input or output shape
//! - **Reflection**: unknown type names, unsupported supertypes, failed construction
//! - **Invariant violations**: a lazy factory produced nothing
//! - **Pipeline**: reading an accessor that holds no value, or as the wrong type
//!
//! None of these are retried internally. Encoding and construction errors keep
//! their cause reachable through [`std::error::Error::source`].
//!
//! ## Examples
//!
//! ```rust
//! use serde_fluent::{Error, Fluent};
//!
//! let fluent = Fluent::new();
//! let result = fluent.text("{ not json").and_then(|text| text.as_tree());
//!
//! match result {
//!     Err(Error::Encoding { mode, .. }) => assert_eq!(mode.as_str(), "json"),
//!     _ => panic!("expected an encoding failure"),
//! }
//! ```

use crate::Mode;
use std::fmt;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Represents all possible errors raised by the conversion pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration, e.g. an unknown mode name
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required value was missing under the throw null-policy
    #[error("Missing value: {0}")]
    MissingValue(&'static str),

    /// The serialization engine failed for the given mode
    #[error("Encoding failure ({mode}): {source}")]
    Encoding {
        mode: Mode,
        #[source]
        source: BoxError,
    },

    /// A type name is not known to the metadata registry
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// The supertype name does not carry a generic parameter
    #[error("Unsupported supertype: {0}")]
    UnsupportedSupertype(String),

    /// Constructing a value through its descriptor failed
    #[error("Failed to create new instance of {type_name} (Error: {source})")]
    Construction {
        type_name: String,
        #[source]
        source: BoxError,
    },

    /// A reflective query ran without a bound subject
    #[error("No {0} bound to the current thread")]
    MissingSubject(&'static str),

    /// A lazy factory produced no value
    #[error("Invalid factory instance for {0}: factory should never produce an empty value")]
    EmptyFactoryResult(&'static str),

    /// An accessor was read without holding a value on this thread
    #[error("The {0} accessor holds no value on this thread")]
    EmptyAccessor(&'static str),

    /// The object accessor holds a value of another type
    #[error("Type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },

    /// The factory owning an accessor has been dropped
    #[error("The accessor factory has been dropped")]
    FactoryDropped,

    /// Error raised inside the tree serializer or deserializer
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_fluent::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Wraps an engine failure for `mode`, keeping the original error as the source.
    pub fn encoding<E>(mode: Mode, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source = source.into();
        tracing::warn!(%mode, error = %source, "encoding failure");
        Error::Encoding { mode, source }
    }

    /// Wraps a failed reflective construction of `type_name`.
    pub fn construction<E>(type_name: &str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Construction {
            type_name: type_name.to_string(),
            source: source.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration<T: fmt::Display>(msg: T) -> Self {
        Error::Configuration(msg.to_string())
    }

    /// Returns `true` for errors produced by the serialization engine.
    #[must_use]
    pub const fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding { .. })
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_encoding_keeps_source() {
        let cause = Error::custom("bad shape");
        let err = Error::encoding(Mode::Yaml, cause);
        assert!(err.is_encoding());
        assert!(err.to_string().contains("yaml"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("bad shape".to_string()));
    }

    #[test]
    fn test_construction_message() {
        let err = Error::construction("app::User", "no matching constructor");
        assert!(err
            .to_string()
            .contains("Failed to create new instance of app::User"));
        assert!(err.source().is_some());
    }
}
