//! The process-scoped store of type descriptors.

use super::{impls, Reflect, TypeDescriptor};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

#[derive(Default)]
struct Entries {
    by_name: HashMap<String, Arc<TypeDescriptor>>,
    by_type: HashMap<TypeId, Arc<TypeDescriptor>>,
}

/// Type descriptors keyed by registered name and, for Rust types, by [`TypeId`].
///
/// Descriptors are immutable once registered. Registering a name again replaces the
/// earlier descriptor for later lookups; accessors already holding it keep theirs.
#[derive(Default)]
pub struct MetadataRegistry {
    entries: RwLock<Entries>,
}

impl MetadataRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the scalar, text, temporal, decimal and identifier
    /// types.
    ///
    /// ```rust
    /// use serde_fluent::reflect::{MetadataRegistry, TypeKind};
    ///
    /// let registry = MetadataRegistry::with_builtins();
    /// assert_eq!(registry.by_name("i64").unwrap().kind(), TypeKind::Primitive);
    /// assert_eq!(registry.by_name("Uuid").unwrap().kind(), TypeKind::Wrapper);
    /// ```
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        impls::register_builtins(&registry);
        registry
    }

    /// Registers the descriptor of `T`.
    pub fn register<T: Reflect>(&self) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(T::descriptor());
        let mut entries = self.entries.write();
        entries
            .by_name
            .insert(descriptor.name().to_string(), Arc::clone(&descriptor));
        entries.by_type.insert(TypeId::of::<T>(), Arc::clone(&descriptor));
        tracing::trace!(name = descriptor.name(), "type registered");
        descriptor
    }

    /// Registers a descriptor reachable by name only, such as an interface.
    pub fn insert(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.entries
            .write()
            .by_name
            .insert(descriptor.name().to_string(), Arc::clone(&descriptor));
        descriptor
    }

    /// Returns the descriptor of `T`, registering it on first use.
    pub fn resolve<T: Reflect>(&self) -> Arc<TypeDescriptor> {
        if let Some(descriptor) = self.entries.read().by_type.get(&TypeId::of::<T>()) {
            return Arc::clone(descriptor);
        }
        self.register::<T>()
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.entries.read().by_name.get(name).cloned()
    }

    /// Like [`by_name`](Self::by_name), failing with [`Error::UnknownType`].
    pub fn require(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        self.by_name(name)
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().by_name.is_empty()
    }

    /// The declaring type of `name`, then its supertypes nearest first.
    ///
    /// Stops at the first name that is not registered or already visited.
    pub(crate) fn lineage(&self, name: &str) -> Vec<Arc<TypeDescriptor>> {
        let mut lineage: Vec<Arc<TypeDescriptor>> = Vec::new();
        let mut next = self.by_name(name);
        while let Some(descriptor) = next {
            if lineage.iter().any(|seen| seen.name() == descriptor.name()) {
                break;
            }
            next = descriptor.supertype_name().and_then(|name| self.by_name(name));
            lineage.push(descriptor);
        }
        lineage
    }

    /// Every interface reachable from `descriptor`, breadth first, without repeats.
    pub(crate) fn interfaces_of(&self, descriptor: &TypeDescriptor) -> Vec<Arc<TypeDescriptor>> {
        let mut found: Vec<Arc<TypeDescriptor>> = Vec::new();
        let mut pending: VecDeque<String> = descriptor.interfaces().iter().cloned().collect();
        while let Some(name) = pending.pop_front() {
            if found.iter().any(|seen| seen.name() == name) {
                continue;
            }
            if let Some(interface) = self.by_name(&name) {
                pending.extend(interface.interfaces().iter().cloned());
                found.push(interface);
            }
        }
        found
    }
}

impl fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("types", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::TypeKind;

    struct Account;

    impl Reflect for Account {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder("bank::Account", TypeKind::Struct)
                .supertype("bank::Entity<u64>")
                .interface("bank::Audited")
                .build()
        }
    }

    #[test]
    fn test_resolve_registers_once() {
        let registry = MetadataRegistry::new();
        let first = registry.resolve::<Account>();
        let second = registry.resolve::<Account>();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.contains("bank::Account"));
    }

    #[test]
    fn test_require_unknown() {
        let registry = MetadataRegistry::new();
        assert!(matches!(registry.require("nope"), Err(Error::UnknownType(name)) if name == "nope"));
    }

    #[test]
    fn test_lineage_and_interfaces() {
        let registry = MetadataRegistry::new();
        registry.register::<Account>();
        registry.insert(
            TypeDescriptor::builder("bank::Entity", TypeKind::Struct)
                .interface("bank::Identified")
                .build(),
        );
        registry.insert(
            TypeDescriptor::builder("bank::Audited", TypeKind::Opaque)
                .interface("bank::Identified")
                .build(),
        );
        registry.insert(TypeDescriptor::builder("bank::Identified", TypeKind::Opaque).build());

        let names: Vec<_> = registry
            .lineage("bank::Account")
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, ["bank::Account", "bank::Entity"]);

        let account = registry.require("bank::Account").unwrap();
        let interfaces: Vec<_> = registry
            .interfaces_of(&account)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(interfaces, ["bank::Audited", "bank::Identified"]);
    }

    #[test]
    fn test_lineage_stops_on_cycle() {
        let registry = MetadataRegistry::new();
        registry.insert(TypeDescriptor::builder("A", TypeKind::Struct).supertype("B").build());
        registry.insert(TypeDescriptor::builder("B", TypeKind::Struct).supertype("A").build());
        assert_eq!(registry.lineage("A").len(), 2);
    }
}
