use super::factory::Shared;
use super::{Held, TextAccessor, TreeAccessor};
use crate::{Converter, Error, Mode, Node, Result};
use serde::Serialize;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

/// A typed value with its type erased.
pub(crate) trait Payload: Send {
    fn encode(&self, converter: &Converter) -> Result<String>;

    fn to_tree(&self, converter: &Converter) -> Result<Node>;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    fn value_type(&self) -> TypeId;

    fn type_name(&self) -> &'static str;
}

pub(crate) struct Typed<T>(pub(crate) T);

impl<T> Payload for Typed<T>
where
    T: Serialize + Send + 'static,
{
    fn encode(&self, converter: &Converter) -> Result<String> {
        converter.encode(&self.0)
    }

    fn to_tree(&self, converter: &Converter) -> Result<Node> {
        converter.to_tree(&self.0)
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        Box::new(self.0)
    }

    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Holds a typed value of any serializable type.
///
/// The payload type is erased here and recovered through the [`Instance`] handle
/// returned when the accessor is seeded.
pub struct ObjectAccessor {
    held: Held<Box<dyn Payload>>,
}

impl ObjectAccessor {
    pub(crate) fn new(factory: Weak<Shared>) -> Self {
        ObjectAccessor {
            held: Held::new("object", factory),
        }
    }

    pub(crate) fn seed(&self, payload: Box<dyn Payload>) -> Result<()> {
        self.held.initialize(payload)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.held.is_set()
    }

    /// Encodes the held value as text of `mode`.
    pub fn as_text_in(&self, mode: Mode) -> Result<Arc<TextAccessor>> {
        self.held.convert(|factory, payload| {
            let text = payload.encode(&factory.converter(mode))?;
            tracing::trace!(%mode, from = payload.type_name(), "object -> text");
            factory.text(text)
        })
    }

    /// Converts the held value into a tree.
    pub fn as_tree(&self) -> Result<Arc<TreeAccessor>> {
        self.held.convert(|factory, payload| {
            let tree = payload.to_tree(&factory.converter(Mode::Json))?;
            tracing::trace!(from = payload.type_name(), "object -> tree");
            factory.tree(tree)
        })
    }

    /// Takes the held value as a `T`. A value of another type stays bound.
    fn take<T: 'static>(&self) -> Result<T> {
        let payload = self.held.take()?;
        let mismatch = Error::TypeMismatch {
            expected: type_name::<T>(),
        };
        if payload.value_type() != TypeId::of::<T>() {
            self.held.initialize(payload)?;
            return Err(mismatch);
        }
        payload
            .into_any()
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| mismatch)
    }
}

impl fmt::Debug for ObjectAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectAccessor")
            .field("is_set", &self.is_set())
            .finish()
    }
}

/// Typed handle on the shared [`ObjectAccessor`].
///
/// Cloning the handle does not clone the value: all handles read the one value bound
/// to the calling thread.
pub struct Instance<T> {
    accessor: Arc<ObjectAccessor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Instance<T>
where
    T: Serialize + Send + 'static,
{
    pub(crate) fn new(accessor: Arc<ObjectAccessor>) -> Self {
        Instance {
            accessor,
            _marker: PhantomData,
        }
    }

    /// Returns the held value and clears it.
    ///
    /// Fails with [`Error::TypeMismatch`] if the accessor was re-seeded with a value of
    /// another type since this handle was created. That value stays bound for the
    /// handle that seeded it.
    pub fn get(&self) -> Result<T> {
        self.accessor.take()
    }

    /// Encodes the held value as compact JSON.
    pub fn as_text(&self) -> Result<Arc<TextAccessor>> {
        self.accessor.as_text_in(Mode::Json)
    }

    pub fn as_text_in(&self, mode: Mode) -> Result<Arc<TextAccessor>> {
        self.accessor.as_text_in(mode)
    }

    pub fn as_tree(&self) -> Result<Arc<TreeAccessor>> {
        self.accessor.as_tree()
    }

    #[must_use]
    pub fn accessor(&self) -> &Arc<ObjectAccessor> {
        &self.accessor
    }
}

impl<T> Clone for Instance<T> {
    fn clone(&self) -> Self {
        Instance {
            accessor: Arc::clone(&self.accessor),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &type_name::<T>())
            .field("is_set", &self.accessor.is_set())
            .finish()
    }
}
