//! The per-kind introspection accessors.
//!
//! Each accessor is shared by every thread using its [`Reflector`](super::Reflector).
//! Binding a subject stores it in the calling thread's slot; every query then takes
//! the subject out through a [`SlotScope`](crate::SlotScope), so a second query needs
//! a fresh binding.

use super::descriptor::{Annotation, Args, FieldDescriptor, MethodDescriptor, TypeDescriptor, TypeKind, RENAME};
use super::MetadataRegistry;
use crate::{Error, Result, ScopedSlot};
use once_cell::sync::Lazy;
use regex::Regex;
use std::any::type_name;
use std::sync::Arc;

static GENERIC_TYPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".*<(.*)>").expect("generic type pattern is valid"));

const GETTER_PREFIX: &str = "get_";

/// A thread-bound subject of kind `T`.
struct Subject<T: 'static> {
    slot: ScopedSlot<Arc<T>>,
    kind: &'static str,
}

impl<T: 'static> Subject<T> {
    fn new(kind: &'static str) -> Self {
        Subject {
            slot: ScopedSlot::new(),
            kind,
        }
    }

    fn bind(&self, subject: Arc<T>) {
        self.slot.set(subject);
    }

    /// Runs `query` against the bound subject and releases it.
    fn access<R>(&self, query: impl FnOnce(&Arc<T>) -> Result<R>) -> Result<R> {
        let scope = self.slot.scope();
        let subject = scope.get().ok_or(Error::MissingSubject(self.kind))?;
        query(&subject)
    }
}

/// Queries against a bound [`TypeDescriptor`].
pub struct TypeAccessor {
    subject: Subject<TypeDescriptor>,
    registry: Arc<MetadataRegistry>,
}

impl TypeAccessor {
    pub(crate) fn new(registry: Arc<MetadataRegistry>) -> Self {
        TypeAccessor {
            subject: Subject::new("type"),
            registry,
        }
    }

    pub(crate) fn bind(&self, descriptor: Arc<TypeDescriptor>) -> &Self {
        self.subject.bind(descriptor);
        self
    }

    pub fn get(&self) -> Result<Arc<TypeDescriptor>> {
        self.subject.access(|ty| Ok(Arc::clone(ty)))
    }

    /// Primitives, wrapper types and enums.
    pub fn is_effectively_primitive(&self) -> Result<bool> {
        self.is(|kind| matches!(kind, TypeKind::Primitive | TypeKind::Wrapper | TypeKind::Enum))
    }

    pub fn is_primitive(&self) -> Result<bool> {
        self.is(|kind| kind == TypeKind::Primitive)
    }

    pub fn is_primitive_wrapper(&self) -> Result<bool> {
        self.is(|kind| kind == TypeKind::Wrapper)
    }

    pub fn is_enum(&self) -> Result<bool> {
        self.is(|kind| kind == TypeKind::Enum)
    }

    pub fn is_map(&self) -> Result<bool> {
        self.is(|kind| kind == TypeKind::Map)
    }

    pub fn is_iterable(&self) -> Result<bool> {
        self.is(|kind| kind == TypeKind::Iterable)
    }

    pub fn is_array(&self) -> Result<bool> {
        self.is(|kind| kind == TypeKind::Array)
    }

    fn is(&self, predicate: impl FnOnce(TypeKind) -> bool) -> Result<bool> {
        self.subject.access(|ty| Ok(predicate(ty.kind())))
    }

    pub fn annotation(&self, name: &str) -> Result<Option<Annotation>> {
        self.subject.access(|ty| Ok(ty.annotation(name).cloned()))
    }

    pub fn has_annotation(&self, name: &str) -> Result<bool> {
        self.annotation(name).map(|annotation| annotation.is_some())
    }

    /// Builds an `R` with the constructor whose parameter types match `args`.
    ///
    /// Fails with [`Error::Construction`] when no constructor matches, when the
    /// constructor rejects its arguments or when it produces something other than `R`.
    pub fn new_instance<R, A>(&self, args: A) -> Result<R>
    where
        R: 'static,
        A: Args,
    {
        self.subject.access(|ty| {
            let constructor = ty.constructor_for(&A::type_ids()).ok_or_else(|| {
                Error::construction(
                    ty.name(),
                    format!("no constructor taking ({})", A::type_names().join(", ")),
                )
            })?;
            let instance = constructor
                .invoke(args.into_values())
                .map_err(|e| Error::construction(ty.name(), e))?;
            instance
                .downcast::<R>()
                .map(|instance| *instance)
                .map_err(|_| {
                    Error::construction(ty.name(), format!("constructor does not produce {}", type_name::<R>()))
                })
        })
    }

    /// Resolves the single generic argument of the supertype.
    ///
    /// For a type declared with supertype `app::Repository<app::User>` this returns the
    /// descriptor registered as `app::User`.
    pub fn superclass_generic_parameter(&self) -> Result<Arc<TypeDescriptor>> {
        self.subject.access(|ty| {
            let supertype = ty.supertype().unwrap_or_default();
            let parameter = GENERIC_TYPE_PATTERN
                .captures(supertype)
                .and_then(|captures| captures.get(1))
                .map(|group| group.as_str().trim())
                .ok_or_else(|| Error::UnsupportedSupertype(ty.name().to_string()))?;
            self.registry.require(parameter)
        })
    }
}

/// Queries against a bound [`MethodDescriptor`].
pub struct MethodAccessor {
    subject: Subject<MethodDescriptor>,
    registry: Arc<MetadataRegistry>,
}

impl MethodAccessor {
    pub(crate) fn new(registry: Arc<MetadataRegistry>) -> Self {
        MethodAccessor {
            subject: Subject::new("method"),
            registry,
        }
    }

    pub(crate) fn bind(&self, descriptor: Arc<MethodDescriptor>) -> &Self {
        self.subject.bind(descriptor);
        self
    }

    pub fn get(&self) -> Result<Arc<MethodDescriptor>> {
        self.subject.access(|method| Ok(Arc::clone(method)))
    }

    /// Finds the annotation on the method or on any method it overrides.
    ///
    /// Searches the declaring type and its supertypes, then every interface reachable
    /// from them, for a method with the same name and parameter types.
    pub fn annotation(&self, name: &str) -> Result<Option<Annotation>> {
        self.subject
            .access(|method| Ok(self.find_annotation(method, name)))
    }

    pub fn has_annotation(&self, name: &str) -> Result<bool> {
        self.annotation(name).map(|annotation| annotation.is_some())
    }

    /// The name this method's value is serialized under.
    ///
    /// A non-empty [`RENAME`] annotation wins; otherwise the method name with the
    /// `get_` prefix removed.
    pub fn serialized_name(&self) -> Result<String> {
        self.subject.access(|method| {
            let renamed = self
                .find_annotation(method, RENAME)
                .and_then(|annotation| annotation.value().map(str::to_string))
                .filter(|value| !value.is_empty());
            Ok(renamed.unwrap_or_else(|| {
                let name = method.name();
                name.strip_prefix(GETTER_PREFIX).unwrap_or(name).to_string()
            }))
        })
    }

    fn find_annotation(&self, method: &MethodDescriptor, name: &str) -> Option<Annotation> {
        if let Some(annotation) = method.annotation(name) {
            return Some(annotation.clone());
        }

        let lineage = self.registry.lineage(method.declaring_type());
        let interfaces = lineage
            .iter()
            .flat_map(|ty| self.registry.interfaces_of(ty))
            .collect::<Vec<_>>();

        lineage
            .iter()
            .chain(interfaces.iter())
            .flat_map(|ty| ty.methods().iter())
            .filter(|candidate| candidate.overrides(method))
            .find_map(|candidate| candidate.annotation(name).cloned())
    }
}

/// Queries against a bound [`FieldDescriptor`].
pub struct FieldAccessor {
    subject: Subject<FieldDescriptor>,
}

impl FieldAccessor {
    pub(crate) fn new() -> Self {
        FieldAccessor {
            subject: Subject::new("field"),
        }
    }

    pub(crate) fn bind(&self, descriptor: Arc<FieldDescriptor>) -> &Self {
        self.subject.bind(descriptor);
        self
    }

    pub fn get(&self) -> Result<Arc<FieldDescriptor>> {
        self.subject.access(|field| Ok(Arc::clone(field)))
    }

    pub fn annotation(&self, name: &str) -> Result<Option<Annotation>> {
        self.subject.access(|field| Ok(field.annotation(name).cloned()))
    }

    pub fn has_annotation(&self, name: &str) -> Result<bool> {
        self.annotation(name).map(|annotation| annotation.is_some())
    }
}
