//! Format-extension modules.
//!
//! A module switches on support for a family of types inside one converter. Types
//! that need a module look it up in the encoding [`context`](crate::context) and
//! refuse to encode or decode when the active converter did not register it.
//!
//! ```rust
//! use serde_fluent::{ConverterBuilder, Mode, TemporalModule, TEMPORAL_MODULE};
//!
//! let converter = ConverterBuilder::for_mode(Mode::Json)
//!     .with_module(TemporalModule)
//!     .build();
//! assert!(converter.config().has_module(TEMPORAL_MODULE));
//! ```

use std::fmt;
use std::sync::Arc;

/// Name under which [`TemporalModule`] registers.
pub const TEMPORAL_MODULE: &str = "temporal";

/// An extension registered on a converter.
///
/// Modules are identified by [`name`](Module::name); registering a second module with
/// the same name replaces the first.
pub trait Module: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
}

/// Enables `chrono` date-time support for [`temporal`](crate::temporal) fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemporalModule;

impl Module for TemporalModule {
    fn name(&self) -> &'static str {
        TEMPORAL_MODULE
    }
}

/// The modules every converter built by the registry receives.
pub(crate) fn default_modules() -> Vec<Arc<dyn Module>> {
    vec![Arc::new(TemporalModule)]
}
