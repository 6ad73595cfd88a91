//! Thread-bound single-value slots.
//!
//! A [`ScopedSlot`] lives inside an object shared between threads, but the value it
//! holds is bound to the thread that stored it. Two threads using the same slot never
//! observe each other's values, which lets one accessor object serve every thread
//! without allocating a wrapper per call.
//!
//! Values live in a per-thread map keyed by a process-unique slot id. Slot ids are
//! never reused, so an entry left behind by a dropped slot can never be read again;
//! it is freed when its thread exits.
//!
//! ```rust
//! use serde_fluent::ScopedSlot;
//! use std::sync::Arc;
//!
//! let slot = Arc::new(ScopedSlot::new());
//! slot.set(1);
//!
//! let other = Arc::clone(&slot);
//! std::thread::spawn(move || assert_eq!(other.get(), None))
//!     .join()
//!     .unwrap();
//!
//! assert_eq!(slot.take(), Some(1));
//! assert_eq!(slot.get(), None);
//! ```

use crate::builder::{require, NullPolicy};
use crate::Result;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static SLOTS: RefCell<HashMap<u64, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

type DefaultFactory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A single value bound to the calling thread.
///
/// Lifecycle: initialized on every use, read, then cleared exactly once by
/// [`take`](ScopedSlot::take), [`close`](ScopedSlot::close) or a [`SlotScope`] guard.
pub struct ScopedSlot<T> {
    id: u64,
    default: Option<DefaultFactory<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ScopedSlot<T> {
    /// Creates an empty slot without a default.
    #[must_use]
    pub fn new() -> Self {
        ScopedSlot {
            id: NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed),
            default: None,
            _marker: PhantomData,
        }
    }

    /// Creates a slot whose reads fall back to `factory` when nothing is bound.
    ///
    /// ```rust
    /// use serde_fluent::ScopedSlot;
    ///
    /// let slot = ScopedSlot::with_default(|| 10);
    /// assert_eq!(slot.get(), Some(10));
    /// slot.set(3);
    /// assert_eq!(slot.take(), Some(3));
    /// assert_eq!(slot.take(), Some(10));
    /// ```
    #[must_use]
    pub fn with_default<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        ScopedSlot {
            default: Some(Box::new(factory)),
            ..Self::new()
        }
    }

    /// Binds `value` to the calling thread, applying `policy` when it is missing.
    ///
    /// Under [`NullPolicy::Throw`] a missing value fails with
    /// [`Error::MissingValue`](crate::Error::MissingValue). [`NullPolicy::Accept`]
    /// clears the slot, and [`NullPolicy::Skip`] leaves it as it was.
    pub fn initialize(&self, value: impl Into<Option<T>>, policy: NullPolicy) -> Result<&Self> {
        match require("slot value", value.into(), policy)? {
            Some(value) => {
                self.set(value);
            }
            None if policy == NullPolicy::Accept => self.close(),
            None => {}
        }
        Ok(self)
    }

    /// Binds `value` to the calling thread, replacing any previous value.
    pub fn set(&self, value: T) -> &Self {
        // The replaced value drops after the borrow ends.
        let _previous = SLOTS.with(|slots| slots.borrow_mut().insert(self.id, Box::new(value)));
        self
    }

    /// Reads and clears the value bound to the calling thread.
    ///
    /// Falls back to the default factory when nothing is bound.
    pub fn take(&self) -> Option<T> {
        self.take_raw().or_else(|| self.default.as_ref().map(|f| f()))
    }

    /// Removes the value bound to the calling thread, if any.
    pub fn close(&self) {
        self.take_raw();
    }

    /// Returns `true` if the calling thread has a value bound.
    #[must_use]
    pub fn is_set(&self) -> bool {
        SLOTS.with(|slots| slots.borrow().contains_key(&self.id))
    }

    /// Opens a scope over the slot; the bound value is released when the guard drops.
    pub fn scope(&self) -> SlotScope<'_, T> {
        SlotScope { slot: self }
    }

    fn take_raw(&self) -> Option<T> {
        SLOTS
            .with(|slots| slots.borrow_mut().remove(&self.id))
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }
}

impl<T: Clone + 'static> ScopedSlot<T> {
    /// Returns a copy of the value bound to the calling thread.
    ///
    /// When nothing is bound and a default factory exists, its result is bound and
    /// returned. Otherwise returns `None`.
    pub fn get(&self) -> Option<T> {
        let bound = SLOTS.with(|slots| {
            slots
                .borrow()
                .get(&self.id)
                .and_then(|value| value.downcast_ref::<T>())
                .cloned()
        });

        match (bound, &self.default) {
            (Some(value), _) => Some(value),
            (None, Some(factory)) => {
                // The factory runs outside the borrow so it may use other slots.
                let value = factory();
                self.set(value.clone());
                Some(value)
            }
            (None, None) => None,
        }
    }
}

impl<T: 'static> Default for ScopedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ScopedSlot<T> {
    fn drop(&mut self) {
        let id = self.id;
        // The thread-local may already be gone during thread teardown.
        let _ = SLOTS.try_with(|slots| {
            if let Ok(mut slots) = slots.try_borrow_mut() {
                slots.remove(&id);
            }
        });
    }
}

impl<T> fmt::Debug for ScopedSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSlot")
            .field("id", &self.id)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

/// Guard over a [`ScopedSlot`] that closes it on every exit path.
pub struct SlotScope<'a, T: 'static> {
    slot: &'a ScopedSlot<T>,
}

impl<T: Clone + 'static> SlotScope<'_, T> {
    /// Reads the value bound to the calling thread.
    pub fn get(&self) -> Option<T> {
        self.slot.get()
    }
}

impl<T: 'static> Drop for SlotScope<'_, T> {
    fn drop(&mut self) {
        self.slot.close();
    }
}
