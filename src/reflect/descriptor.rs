//! Type, method and field descriptors.

use crate::builder::Builder;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type Values = Vec<Box<dyn Any + Send>>;
type Construct = dyn Fn(Values) -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync;

/// Name of the annotation that overrides a serialized name.
pub const RENAME: &str = "rename";

/// The classification of a described type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `bool`, `char`, integers and floats.
    Primitive,
    /// Scalar library types written as a single value: text, temporal, decimal and
    /// identifier types.
    Wrapper,
    Enum,
    Map,
    /// Sequences and sets.
    Iterable,
    /// Fixed-size arrays.
    Array,
    Struct,
    /// Types described only by name, such as interfaces.
    Opaque,
}

/// A named marker attached to a type, method or field, with an optional value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    name: String,
    value: Option<String>,
}

impl Annotation {
    /// An annotation without a value.
    pub fn marker(name: impl Into<String>) -> Self {
        Annotation {
            name: name.into(),
            value: None,
        }
    }

    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Annotation {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// A [`RENAME`] annotation carrying the serialized name.
    pub fn rename(value: impl Into<String>) -> Self {
        Self::new(RENAME, value)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

fn find<'a>(annotations: &'a [Annotation], name: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|annotation| annotation.name == name)
}

/// Describes one method: its name, parameter signature and annotations.
///
/// Parameters are identified by their Rust type names, so two methods match when
/// they share a name and parameter types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    declaring_type: String,
    params: Vec<&'static str>,
    annotations: Vec<Annotation>,
}

impl MethodDescriptor {
    /// A method without parameters. The declaring type is filled in when the method
    /// is added to a [`TypeDescriptorBuilder`].
    pub fn new(name: impl Into<String>) -> Self {
        MethodDescriptor {
            name: name.into(),
            declaring_type: String::new(),
            params: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Appends a parameter of type `P`.
    #[must_use]
    pub fn param<P: ?Sized + 'static>(mut self) -> Self {
        self.params.push(type_name::<P>());
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    #[must_use]
    pub fn params(&self) -> &[&'static str] {
        &self.params
    }

    /// Returns `true` if `other` has the same name and parameter types.
    #[must_use]
    pub fn overrides(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name && self.params == other.params
    }

    /// The annotation declared directly on this method.
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        find(&self.annotations, name)
    }
}

/// Describes one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    declaring_type: String,
    type_name: String,
    annotations: Vec<Annotation>,
}

impl FieldDescriptor {
    /// A field holding a value of type `F`.
    pub fn of<F: ?Sized + 'static>(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            declaring_type: String::new(),
            type_name: type_name::<F>().to_string(),
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        find(&self.annotations, name)
    }
}

/// A list of constructor arguments, implemented for tuples of up to four values.
///
/// ```rust
/// use serde_fluent::reflect::Args;
/// use std::any::TypeId;
///
/// assert_eq!(<(String, i64)>::type_ids(), vec![TypeId::of::<String>(), TypeId::of::<i64>()]);
/// ```
pub trait Args: Sized + 'static {
    fn type_ids() -> Vec<TypeId>;

    fn type_names() -> Vec<&'static str>;

    fn into_values(self) -> Values;

    /// Rebuilds the tuple, or returns `None` if a value has another type.
    fn from_values(values: Values) -> Option<Self>;
}

macro_rules! impl_args {
    ($($name:ident),*) => {
        impl<$($name: Send + 'static),*> Args for ($($name,)*) {
            fn type_ids() -> Vec<TypeId> {
                vec![$(TypeId::of::<$name>()),*]
            }

            fn type_names() -> Vec<&'static str> {
                vec![$(type_name::<$name>()),*]
            }

            #[allow(non_snake_case)]
            fn into_values(self) -> Values {
                let ($($name,)*) = self;
                vec![$(Box::new($name) as Box<dyn Any + Send>),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn from_values(values: Values) -> Option<Self> {
                let mut values = values.into_iter();
                let args = ($(*values.next()?.downcast::<$name>().ok()?,)*);
                values.next().is_none().then_some(args)
            }
        }
    };
}

impl_args!();
impl_args!(A);
impl_args!(A, B);
impl_args!(A, B, C);
impl_args!(A, B, C, D);

/// A constructor selected by the types of its arguments.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    params: Vec<TypeId>,
    param_names: Vec<&'static str>,
    construct: Arc<Construct>,
}

impl ConstructorDescriptor {
    /// A constructor that cannot fail.
    pub fn new<A, R, F>(constructor: F) -> Self
    where
        A: Args,
        R: Send + 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::fallible(move |args: A| Ok::<R, BoxError>(constructor(args)))
    }

    /// A constructor that may reject its arguments.
    pub fn fallible<A, R, E, F>(constructor: F) -> Self
    where
        A: Args,
        R: Send + 'static,
        E: Into<BoxError>,
        F: Fn(A) -> Result<R, E> + Send + Sync + 'static,
    {
        ConstructorDescriptor {
            params: A::type_ids(),
            param_names: A::type_names(),
            construct: Arc::new(move |values: Values| -> Result<Box<dyn Any + Send>, BoxError> {
                let args = A::from_values(values).ok_or("argument types do not match")?;
                constructor(args)
                    .map(|value| Box::new(value) as Box<dyn Any + Send>)
                    .map_err(Into::into)
            }),
        }
    }

    #[must_use]
    pub fn accepts(&self, params: &[TypeId]) -> bool {
        self.params == params
    }

    #[must_use]
    pub fn param_names(&self) -> &[&'static str] {
        &self.param_names
    }

    pub(crate) fn invoke(&self, values: Values) -> Result<Box<dyn Any + Send>, BoxError> {
        (self.construct)(values)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConstructorDescriptor")
            .field(&self.param_names)
            .finish()
    }
}

/// Everything the metadata cache knows about one type.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    supertype: Option<String>,
    interfaces: Vec<String>,
    annotations: Vec<Annotation>,
    methods: Vec<Arc<MethodDescriptor>>,
    fields: Vec<Arc<FieldDescriptor>>,
    constructors: Vec<ConstructorDescriptor>,
}

impl TypeDescriptor {
    /// Starts describing a type registered under `name`.
    ///
    /// ```rust
    /// use serde_fluent::reflect::{Annotation, MethodDescriptor, TypeDescriptor, TypeKind};
    ///
    /// let descriptor = TypeDescriptor::builder("app::User", TypeKind::Struct)
    ///     .supertype("app::Entity<i64>")
    ///     .method(MethodDescriptor::new("get_name").annotated(Annotation::rename("full_name")))
    ///     .build();
    /// assert_eq!(descriptor.method("get_name").unwrap().declaring_type(), "app::User");
    /// ```
    pub fn builder(name: impl Into<String>, kind: TypeKind) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            descriptor: TypeDescriptor {
                name: name.into(),
                kind,
                supertype: None,
                interfaces: Vec::new(),
                annotations: Vec::new(),
                methods: Vec::new(),
                fields: Vec::new(),
                constructors: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The printable name of the direct supertype, generic arguments included.
    #[must_use]
    pub fn supertype(&self) -> Option<&str> {
        self.supertype.as_deref()
    }

    /// The registered name of the direct supertype, generic arguments stripped.
    #[must_use]
    pub fn supertype_name(&self) -> Option<&str> {
        self.supertype
            .as_deref()
            .map(|name| name.split('<').next().unwrap_or(name).trim())
    }

    #[must_use]
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        find(&self.annotations, name)
    }

    #[must_use]
    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.iter().find(|method| method.name == name)
    }

    #[must_use]
    pub fn fields(&self) -> &[Arc<FieldDescriptor>] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub(crate) fn constructor_for(&self, params: &[TypeId]) -> Option<&ConstructorDescriptor> {
        self.constructors.iter().find(|ctor| ctor.accepts(params))
    }
}

/// Builds a [`TypeDescriptor`].
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    descriptor: TypeDescriptor,
}

impl Builder for TypeDescriptorBuilder {}

impl TypeDescriptorBuilder {
    /// Sets the printable supertype name, e.g. `app::Repository<app::User>`.
    #[must_use]
    pub fn supertype(self, name: impl Into<String>) -> Self {
        self.set_optional(Some(name.into()), |builder, name| {
            builder.descriptor.supertype = Some(name)
        })
    }

    #[must_use]
    pub fn interface(mut self, name: impl Into<String>) -> Self {
        self.descriptor.interfaces.push(name.into());
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.descriptor.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn method(mut self, mut method: MethodDescriptor) -> Self {
        method.declaring_type = self.descriptor.name.clone();
        self.descriptor.methods.push(Arc::new(method));
        self
    }

    #[must_use]
    pub fn field(mut self, mut field: FieldDescriptor) -> Self {
        field.declaring_type = self.descriptor.name.clone();
        self.descriptor.fields.push(Arc::new(field));
        self
    }

    #[must_use]
    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.descriptor.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}
