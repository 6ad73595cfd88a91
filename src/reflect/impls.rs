use super::{MetadataRegistry, Reflect, TypeDescriptor, TypeKind};
use crate::Decimal;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use num_bigint::BigInt;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use uuid::Uuid;

macro_rules! reflect_scalar {
    ($kind:ident: $($ty:ident),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::builder(stringify!($ty), TypeKind::$kind).build()
                }
            }
        )+
    };
}

reflect_scalar!(Primitive: bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
reflect_scalar!(Wrapper: String, Decimal, BigInt, Uuid, NaiveDate, NaiveDateTime, NaiveTime, Duration);

impl Reflect for () {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder("()", TypeKind::Wrapper).build()
    }
}

impl Reflect for DateTime<Utc> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder("DateTime<Utc>", TypeKind::Wrapper).build()
    }
}

impl Reflect for DateTime<FixedOffset> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder("DateTime<FixedOffset>", TypeKind::Wrapper).build()
    }
}

macro_rules! reflect_container {
    ($kind:ident: $($ty:ident<$($param:ident),+>),+ $(,)?) => {
        $(
            impl<$($param: Reflect),+> Reflect for $ty<$($param),+> {
                fn descriptor() -> TypeDescriptor {
                    let params: Vec<String> = vec![$($param::descriptor().name().to_string()),+];
                    let name = format!("{}<{}>", stringify!($ty), params.join(", "));
                    TypeDescriptor::builder(name, TypeKind::$kind).build()
                }
            }
        )+
    };
}

reflect_container!(Iterable: Vec<T>, VecDeque<T>, HashSet<T>, BTreeSet<T>);
reflect_container!(Map: HashMap<K, V>, BTreeMap<K, V>);

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn descriptor() -> TypeDescriptor {
        let name = format!("[{}; {}]", T::descriptor().name(), N);
        TypeDescriptor::builder(name, TypeKind::Array).build()
    }
}

pub(crate) fn register_builtins(registry: &MetadataRegistry) {
    macro_rules! register {
        ($($ty:ty),+ $(,)?) => {
            $(registry.register::<$ty>();)+
        };
    }

    register!(
        bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
        (), String, Decimal, BigInt, Uuid, NaiveDate, NaiveDateTime, NaiveTime, Duration,
        DateTime<Utc>, DateTime<FixedOffset>,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_names() {
        assert_eq!(Vec::<i64>::descriptor().name(), "Vec<i64>");
        assert_eq!(HashMap::<String, Vec<u8>>::descriptor().name(), "HashMap<String, Vec<u8>>");
        assert_eq!(<[bool; 3]>::descriptor().name(), "[bool; 3]");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(<DateTime<Utc>>::descriptor().kind(), TypeKind::Wrapper);
        assert_eq!(BTreeSet::<char>::descriptor().kind(), TypeKind::Iterable);
        assert_eq!(<[u8; 4]>::descriptor().kind(), TypeKind::Array);
        assert_eq!(u128::descriptor().kind(), TypeKind::Primitive);
    }
}
