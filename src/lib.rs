//! # serde_fluent
//!
//! A fluent, thread-safe conversion pipeline between three representations of data:
//!
//! - **text**: an encoded `String` in one of the supported [`Mode`]s (JSON, YAML)
//! - **tree**: a format-independent [`Node`] tree
//! - **object**: any typed value implementing `Serialize` / `Deserialize`
//!
//! Plus a reflective metadata cache ([`reflect`]) for inspecting types by descriptor.
//!
//! ## Key Features
//!
//! - **Shared accessors**: one accessor object per representation, used by every
//!   thread at once; each thread sees only the value it seeded
//! - **Single construction**: converters are built at most once per mode, accessors at
//!   most once per factory, even when first requested concurrently
//! - **Fixed engine configuration**: empty objects are accepted, date-times are written
//!   as ISO-8601 text and decimals as strings, unless a converter is built otherwise
//! - **One error type**: every failure is an [`Error`] with its cause preserved
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_fluent::Fluent;
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Record {
//!     index: i64,
//!     name: String,
//! }
//!
//! let fluent = Fluent::new();
//!
//! // text -> object
//! let record = fluent
//!     .text(r#"{"index":1,"name":"a"}"#)?
//!     .as_type::<Record>()?
//!     .get()?;
//! assert_eq!(record, Record { index: 1, name: "a".to_string() });
//!
//! // object -> text -> object
//! let back = fluent.object(record)?.as_text()?.as_type::<Record>()?.get()?;
//! assert_eq!(back.name, "a");
//! # Ok::<(), serde_fluent::Error>(())
//! ```
//!
//! ### Transcoding between modes
//!
//! ```rust
//! use serde_fluent::{Fluent, Mode};
//!
//! let yaml = Fluent::new()
//!     .text(r#"{"name":"a","tags":["x"]}"#)?
//!     .as_tree()?
//!     .as_text_in(Mode::Yaml)?
//!     .get()?;
//! assert_eq!(yaml, "name: a\ntags:\n- x\n");
//! # Ok::<(), serde_fluent::Error>(())
//! ```
//!
//! ### Sharing one pipeline between threads
//!
//! ```rust
//! use serde_fluent::Fluent;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let fluent = Arc::new(Fluent::new());
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let fluent = Arc::clone(&fluent);
//!         thread::spawn(move || fluent.object(i)?.as_text()?.get())
//!     })
//!     .collect();
//!
//! for (i, handle) in handles.into_iter().enumerate() {
//!     assert_eq!(handle.join().unwrap().unwrap(), i.to_string());
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` when converters and lazy values are
//! constructed, `trace` for every pipeline hop and `warn` when an engine error is
//! wrapped. No subscriber is installed.

#[macro_use]
pub mod macros;

pub mod accessor;
pub mod builder;
pub mod context;
pub mod converter;
pub mod de;
pub mod decimal;
pub mod error;
pub mod fluent;
pub mod lazy;
pub mod map;
pub mod mode;
pub mod module;
pub mod node;
pub mod options;
pub mod reflect;
pub mod registry;
pub mod scope;
pub mod ser;
pub mod temporal;

pub use accessor::{AccessorFactory, Instance, ObjectAccessor, TextAccessor, TreeAccessor};
pub use builder::{Builder, NullPolicy};
pub use converter::{Converter, ConverterBuilder, ConverterConfig};
pub use de::{from_node, NodeDeserializer};
pub use decimal::Decimal;
pub use error::{Error, Result};
pub use fluent::{Fluent, FluentBuilder};
pub use lazy::Lazy;
pub use map::NodeMap;
pub use mode::Mode;
pub use module::{Module, TemporalModule, TEMPORAL_MODULE};
pub use node::{Node, Number};
pub use options::{ConverterOptions, DecimalFormat, TemporalFormat};
pub use reflect::Reflector;
pub use registry::{ConverterRegistry, ConverterResolver};
pub use scope::{ScopedSlot, SlotScope};
pub use ser::{to_node, NodeSerializer};
