//! The encoding context of the calling thread.
//!
//! While a [`Converter`](crate::Converter) runs an engine operation it publishes its
//! configuration here, so `Serialize` and `Deserialize` impls deep inside the value can
//! honor converter options without having them passed in. Contexts nest: a conversion
//! started from inside another one shadows it until it finishes.
//!
//! Outside of any converter, [`current`] returns `None` and types fall back to their
//! default behavior.

use crate::{ConverterConfig, Error, Result};
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    static STACK: RefCell<Vec<Arc<ConverterConfig>>> = RefCell::new(Vec::new());
}

/// Guard returned by [`enter`]; leaves the context when dropped.
#[must_use = "the context is left as soon as the guard is dropped"]
pub(crate) struct ContextGuard {
    _private: (),
}

/// Makes `config` the current context of the calling thread until the guard drops.
pub(crate) fn enter(config: Arc<ConverterConfig>) -> ContextGuard {
    STACK.with(|stack| stack.borrow_mut().push(config));
    ContextGuard { _private: () }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let _ = STACK.try_with(|stack| stack.borrow_mut().pop());
    }
}

/// Returns the configuration of the innermost running converter, if any.
#[must_use]
pub fn current() -> Option<Arc<ConverterConfig>> {
    STACK.with(|stack| stack.borrow().last().cloned())
}

/// Returns the current configuration, failing when it lacks `module`.
///
/// `Ok(None)` means no converter is running on this thread.
///
/// ```rust
/// use serde_fluent::{context, TEMPORAL_MODULE};
///
/// assert!(context::requiring(TEMPORAL_MODULE).unwrap().is_none());
/// ```
pub fn requiring(module: &'static str) -> Result<Option<Arc<ConverterConfig>>> {
    match current() {
        Some(config) if !config.has_module(module) => Err(Error::configuration(format!(
            "the `{}` module is not registered on this {} converter",
            module,
            config.mode()
        ))),
        config => Ok(config),
    }
}

pub(crate) fn fail_on_empty_objects() -> bool {
    current().map_or(false, |config| config.options().fail_on_empty_objects)
}
