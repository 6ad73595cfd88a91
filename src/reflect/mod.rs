//! Reflective metadata cache.
//!
//! Types describe themselves through [`Reflect`], producing a [`TypeDescriptor`] that
//! lists their kind, supertype, interfaces, annotations, methods, fields and
//! constructors. A [`MetadataRegistry`] keeps the descriptors, and a [`Reflector`]
//! hands out one shared accessor per metadata kind:
//!
//! - [`TypeAccessor`]: classification, annotations, construction, generic supertypes
//! - [`MethodAccessor`]: annotation lookup through overridden methods, serialized names
//! - [`FieldAccessor`]: field annotations
//!
//! Binding a subject is per thread, and each query releases it.
//!
//! ## Examples
//!
//! ```rust
//! use serde_fluent::reflect::{
//!     Annotation, ConstructorDescriptor, MethodDescriptor, Reflect, Reflector,
//!     TypeDescriptor, TypeKind,
//! };
//!
//! struct User {
//!     name: String,
//! }
//!
//! impl Reflect for User {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder("app::User", TypeKind::Struct)
//!             .method(MethodDescriptor::new("get_name").annotated(Annotation::rename("full_name")))
//!             .constructor(ConstructorDescriptor::new(|(name,): (String,)| User { name }))
//!             .build()
//!     }
//! }
//!
//! let reflector = Reflector::new();
//! assert!(!reflector.type_of::<User>().is_effectively_primitive().unwrap());
//!
//! let user: User = reflector
//!     .type_of::<User>()
//!     .new_instance(("ada".to_string(),))
//!     .unwrap();
//! assert_eq!(user.name, "ada");
//!
//! let user_type = reflector.registry().require("app::User").unwrap();
//! let getter = user_type.method("get_name").unwrap();
//! assert_eq!(reflector.method(getter).serialized_name().unwrap(), "full_name");
//! ```

mod accessors;
mod descriptor;
mod impls;
mod registry;

pub use accessors::{FieldAccessor, MethodAccessor, TypeAccessor};
pub use descriptor::{
    Annotation, Args, ConstructorDescriptor, FieldDescriptor, MethodDescriptor, TypeDescriptor,
    TypeDescriptorBuilder, TypeKind, RENAME,
};
pub use registry::MetadataRegistry;

use crate::Result;
use std::fmt;
use std::sync::Arc;

/// Implemented by types that can describe themselves to the metadata cache.
pub trait Reflect: 'static {
    fn descriptor() -> TypeDescriptor;
}

/// Entry point of the metadata cache.
///
/// Owns one accessor per metadata kind. The reflector is meant to be shared: every
/// thread binds its own subject, so concurrent queries never see each other.
pub struct Reflector {
    registry: Arc<MetadataRegistry>,
    types: TypeAccessor,
    methods: MethodAccessor,
    fields: FieldAccessor,
}

impl Reflector {
    /// A reflector over a registry preloaded with the built-in types.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(MetadataRegistry::with_builtins()))
    }

    #[must_use]
    pub fn with_registry(registry: Arc<MetadataRegistry>) -> Self {
        Reflector {
            types: TypeAccessor::new(Arc::clone(&registry)),
            methods: MethodAccessor::new(Arc::clone(&registry)),
            fields: FieldAccessor::new(),
            registry,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<MetadataRegistry> {
        &self.registry
    }

    /// Registers `T` so it can be found by name.
    pub fn register<T: Reflect>(&self) -> Arc<TypeDescriptor> {
        self.registry.register::<T>()
    }

    /// Binds the descriptor of `T`, registering it on first use.
    pub fn type_of<T: Reflect>(&self) -> &TypeAccessor {
        self.types.bind(self.registry.resolve::<T>())
    }

    /// Binds the type registered as `name`.
    ///
    /// Fails with [`Error::UnknownType`](crate::Error::UnknownType) for unregistered names.
    pub fn type_named(&self, name: &str) -> Result<&TypeAccessor> {
        let descriptor = self.registry.require(name)?;
        Ok(self.types.bind(descriptor))
    }

    pub fn method(&self, method: &Arc<MethodDescriptor>) -> &MethodAccessor {
        self.methods.bind(Arc::clone(method))
    }

    pub fn field(&self, field: &Arc<FieldDescriptor>) -> &FieldAccessor {
        self.fields.bind(Arc::clone(field))
    }
}

impl Default for Reflector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decimal, Error};
    use std::collections::HashMap;

    #[test]
    fn test_builtin_classification() {
        let reflector = Reflector::new();
        assert!(reflector.type_of::<i32>().is_primitive().unwrap());
        assert!(reflector.type_of::<String>().is_primitive_wrapper().unwrap());
        assert!(reflector.type_of::<Decimal>().is_effectively_primitive().unwrap());
        assert!(reflector.type_of::<HashMap<String, i64>>().is_map().unwrap());
        assert!(reflector.type_of::<Vec<u8>>().is_iterable().unwrap());
        assert!(reflector.type_of::<[u8; 2]>().is_array().unwrap());
        assert!(!reflector.type_of::<Vec<u8>>().is_effectively_primitive().unwrap());
    }

    #[test]
    fn test_query_releases_subject() {
        let reflector = Reflector::new();
        let accessor = reflector.type_of::<bool>();
        assert!(accessor.is_primitive().unwrap());
        assert!(matches!(accessor.is_primitive(), Err(Error::MissingSubject("type"))));
    }

    #[test]
    fn test_type_named_unknown() {
        let reflector = Reflector::new();
        assert!(matches!(reflector.type_named("app::Missing"), Err(Error::UnknownType(_))));
        assert_eq!(reflector.type_named("u16").unwrap().get().unwrap().name(), "u16");
    }
}
