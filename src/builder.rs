//! Chaining helpers shared by every configurable component.
//!
//! [`Builder::set_and_return_this`] applies a setter to an optional value and hands the
//! builder back, deciding what a missing value means through a [`NullPolicy`].
//!
//! ```rust
//! use serde_fluent::{ConverterBuilder, Mode};
//!
//! // `None` is skipped for optional configuration
//! let converter = ConverterBuilder::for_mode(Mode::Json)
//!     .with_options(None)
//!     .build();
//! assert_eq!(converter.mode(), Mode::Json);
//! ```

use crate::{Error, Result};

/// What to do when a builder receives a missing value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Call the setter anyway.
    Accept,
    /// Fail with [`Error::MissingValue`].
    Throw,
    /// Leave the builder unchanged.
    #[default]
    Skip,
}

/// Fluent setter discipline.
///
/// Implemented by value-style builders; the provided methods consume and return `Self`.
pub trait Builder: Sized {
    /// Applies `setter` to `value` and returns the builder for chaining.
    ///
    /// A missing `value` follows `policy`: [`NullPolicy::Accept`] passes `None` through,
    /// [`NullPolicy::Throw`] fails with [`Error::MissingValue`] naming `what`, and
    /// [`NullPolicy::Skip`] returns the builder untouched.
    fn set_and_return_this<V, F>(
        mut self,
        what: &'static str,
        value: Option<V>,
        setter: F,
        policy: NullPolicy,
    ) -> Result<Self>
    where
        F: FnOnce(&mut Self, Option<V>),
    {
        match (value, policy) {
            (Some(value), _) => setter(&mut self, Some(value)),
            (None, NullPolicy::Accept) => setter(&mut self, None),
            (None, NullPolicy::Throw) => return Err(Error::MissingValue(what)),
            (None, NullPolicy::Skip) => {}
        }
        Ok(self)
    }

    /// Like [`Builder::set_and_return_this`] with the [`NullPolicy::Skip`] default,
    /// which cannot fail.
    fn set_optional<V, F>(mut self, value: Option<V>, setter: F) -> Self
    where
        F: FnOnce(&mut Self, V),
    {
        if let Some(value) = value {
            setter(&mut self, value);
        }
        self
    }

    /// Runs `action` against the builder, if any, and returns it.
    fn run_and_return_this<F>(mut self, action: Option<F>) -> Self
    where
        F: FnOnce(&mut Self),
    {
        if let Some(action) = action {
            action(&mut self);
        }
        self
    }
}

/// Applies `policy` to a missing value outside of a builder chain.
///
/// Returns `Ok(None)` when the value may be skipped and `Err` when it is required.
pub(crate) fn require<V>(what: &'static str, value: Option<V>, policy: NullPolicy) -> Result<Option<V>> {
    match (value, policy) {
        (None, NullPolicy::Throw) => Err(Error::MissingValue(what)),
        (value, _) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Probe {
        name: Option<String>,
        calls: usize,
    }

    impl Builder for Probe {}

    fn set_name(probe: &mut Probe, name: Option<String>) {
        probe.name = name;
        probe.calls += 1;
    }

    #[test]
    fn test_present_value_is_set_under_every_policy() {
        for policy in [NullPolicy::Accept, NullPolicy::Throw, NullPolicy::Skip] {
            let probe = Probe::default()
                .set_and_return_this("name", Some("a".to_string()), set_name, policy)
                .unwrap();
            assert_eq!(probe.name.as_deref(), Some("a"));
        }
    }

    #[test]
    fn test_missing_value_policies() {
        let accepted = Probe::default()
            .set_and_return_this("name", None, set_name, NullPolicy::Accept)
            .unwrap();
        assert_eq!(accepted.calls, 1);

        let skipped = Probe::default()
            .set_and_return_this("name", None, set_name, NullPolicy::Skip)
            .unwrap();
        assert_eq!(skipped, Probe::default());

        let thrown = Probe::default().set_and_return_this("name", None, set_name, NullPolicy::Throw);
        assert!(matches!(thrown, Err(Error::MissingValue("name"))));
    }

    #[test]
    fn test_run_and_return_this() {
        let probe = Probe::default().run_and_return_this(Some(|p: &mut Probe| p.calls = 7));
        assert_eq!(probe.calls, 7);

        let untouched = Probe::default().run_and_return_this(None::<fn(&mut Probe)>);
        assert_eq!(untouched.calls, 0);
    }

    #[test]
    fn test_require() {
        assert_eq!(require("v", Some(1), NullPolicy::Throw).unwrap(), Some(1));
        assert_eq!(require::<i32>("v", None, NullPolicy::Skip).unwrap(), None);
        assert!(require::<i32>("v", None, NullPolicy::Throw).is_err());
    }
}
