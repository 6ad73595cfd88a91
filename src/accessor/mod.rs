//! The fluent accessor pipeline.
//!
//! An accessor wraps one representation of a value: [`TextAccessor`] holds encoded
//! text, [`TreeAccessor`] a parsed [`Node`](crate::Node) and [`ObjectAccessor`] a typed
//! value, reached through the typed handle [`Instance`]. There is one accessor of each
//! kind per [`AccessorFactory`], shared by every thread; the value it holds is bound
//! to the calling thread.
//!
//! Each conversion consumes the held value, runs the converter and seeds the target
//! accessor with the result, so a chain reads left to right:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_fluent::{Fluent, Mode};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Record {
//!     index: i64,
//!     name: String,
//! }
//!
//! let fluent = Fluent::new();
//! let record = fluent
//!     .text(r#"{"index":1,"name":"a"}"#)?
//!     .as_tree()?
//!     .as_type::<Record>()?
//!     .get()?;
//! assert_eq!(record, Record { index: 1, name: "a".to_string() });
//!
//! let yaml = fluent.object(record)?.as_tree()?.as_text_in(Mode::Yaml)?.get()?;
//! assert_eq!(yaml, "index: 1\nname: a\n");
//! # Ok::<(), serde_fluent::Error>(())
//! ```
//!
//! A held value is read once. Reading it again without re-seeding fails with
//! [`Error::EmptyAccessor`](crate::Error::EmptyAccessor).

mod factory;
mod object;
mod text;
mod tree;

pub use factory::AccessorFactory;
pub use object::{Instance, ObjectAccessor};
pub use text::TextAccessor;
pub use tree::TreeAccessor;

use crate::builder::NullPolicy;
use crate::{Error, Result, ScopedSlot};
use factory::Shared;
use std::sync::{Arc, Weak};

/// The thread-bound value of one accessor and the way back to its factory.
struct Held<T: 'static> {
    slot: ScopedSlot<T>,
    kind: &'static str,
    factory: Weak<Shared>,
}

impl<T: 'static> Held<T> {
    fn new(kind: &'static str, factory: Weak<Shared>) -> Self {
        Held {
            slot: ScopedSlot::new(),
            kind,
            factory,
        }
    }

    /// Seeds the calling thread's slot; the value is required.
    fn initialize(&self, value: impl Into<Option<T>>) -> Result<()> {
        self.slot.initialize(value, NullPolicy::Throw)?;
        Ok(())
    }

    fn take(&self) -> Result<T> {
        self.slot.take().ok_or(Error::EmptyAccessor(self.kind))
    }

    /// Consumes the held value and hands it to `hop` together with the factory.
    ///
    /// The slot is empty afterwards whether or not `hop` succeeds.
    fn convert<R>(&self, hop: impl FnOnce(&Shared, T) -> Result<R>) -> Result<R> {
        let value = self.take()?;
        hop(&*self.factory()?, value)
    }

    fn factory(&self) -> Result<Arc<Shared>> {
        self.factory.upgrade().ok_or(Error::FactoryDropped)
    }

    fn is_set(&self) -> bool {
        self.slot.is_set()
    }
}
