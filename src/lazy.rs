//! Deferred, at-most-once construction.
//!
//! [`Lazy`] runs its factory on the first [`get`](Lazy::get) and shares the result
//! afterwards. Reads after construction never take a lock: the instance is published
//! through an [`ArcSwapOption`], and only the construction path is serialized by a
//! private mutex that re-checks before calling the factory.

use crate::{Error, Result};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

type Factory<T> = Box<dyn Fn() -> Option<T> + Send + Sync>;

/// A value constructed at most once, on first demand.
///
/// The factory must never produce `None`; doing so is reported as
/// [`Error::EmptyFactoryResult`] and nothing is cached.
///
/// ```rust
/// use serde_fluent::Lazy;
///
/// let lazy = Lazy::new(|| Some(String::from("ready")));
/// assert!(!lazy.is_initialized());
/// assert_eq!(lazy.get().unwrap().as_str(), "ready");
/// assert!(lazy.is_initialized());
/// ```
pub struct Lazy<T> {
    instance: ArcSwapOption<T>,
    factory: Factory<T>,
    sync_root: Mutex<()>,
    name: &'static str,
}

impl<T> Lazy<T> {
    /// Creates a lazy value built by `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Option<T> + Send + Sync + 'static,
    {
        Self::named(std::any::type_name::<T>(), factory)
    }

    /// Creates a lazy value whose errors and logs refer to it as `name`.
    pub fn named<F>(name: &'static str, factory: F) -> Self
    where
        F: Fn() -> Option<T> + Send + Sync + 'static,
    {
        Lazy {
            instance: ArcSwapOption::empty(),
            factory: Box::new(factory),
            sync_root: Mutex::new(()),
            name,
        }
    }

    /// Returns the shared instance, constructing it on first use.
    ///
    /// Exactly one factory call happens however many threads race on the first
    /// `get`; later callers observe the same instance until [`reset`](Lazy::reset).
    pub fn get(&self) -> Result<Arc<T>> {
        if let Some(instance) = self.instance.load_full() {
            return Ok(instance);
        }

        let _guard = self.sync_root.lock();
        if let Some(instance) = self.instance.load_full() {
            return Ok(instance);
        }

        tracing::debug!(name = self.name, "constructing lazy instance");
        let instance = (self.factory)()
            .map(Arc::new)
            .ok_or(Error::EmptyFactoryResult(self.name))?;
        self.instance.store(Some(Arc::clone(&instance)));
        Ok(instance)
    }

    /// Returns `true` if the instance has been constructed. Never blocks.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.instance.load().is_some()
    }

    /// Drops the cached instance so the next [`get`](Lazy::get) rebuilds it.
    ///
    /// Holders of a previously returned `Arc` keep their instance.
    pub fn reset(&self) {
        let _guard = self.sync_root.lock();
        self.instance.store(None);
    }
}

impl<T> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
