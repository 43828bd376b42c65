//! [`Reflect`] implementations for std types.
//!
//! Scalars report [`ReflectRef::Scalar`] and are read back by downcasting to
//! their exact type, so the kind in the shape must name that type. Sequences,
//! arrays and maps reflect with their length only; the engine has no coder for
//! them, but omit-empty still needs to know whether they are empty.
use {
    super::*,
    crate::util::type_equal,
    std::collections::{BTreeMap, HashMap},
};

macro_rules! impl_scalar {
    ($($type:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $type {
                #[inline]
                fn type_shape() -> Shape {
                    Shape::of::<$type>(stringify!($type), Kind::$kind)
                }

                #[inline]
                fn shape(&self) -> Shape {
                    Self::type_shape()
                }

                #[inline]
                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Scalar
                }

                #[inline]
                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Scalar
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_shape() -> Shape {
        // Only a sequence of single bytes is a byte string.
        let kind = if type_equal::<T, u8>() {
            Kind::Bytes
        } else {
            Kind::Sequence
        };
        Shape::of::<Self>(core::any::type_name::<Self>(), kind)
    }

    #[inline]
    fn shape(&self) -> Shape {
        Self::type_shape()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        if type_equal::<T, u8>() {
            ReflectRef::Scalar
        } else {
            ReflectRef::Collection { len: self.len() }
        }
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        if type_equal::<T, u8>() {
            ReflectMut::Scalar
        } else {
            ReflectMut::Collection
        }
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_shape() -> Shape {
        Shape::of::<Self>(core::any::type_name::<Self>(), Kind::Array)
    }

    #[inline]
    fn shape(&self) -> Shape {
        Self::type_shape()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Collection { len: N }
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Collection
    }
}

macro_rules! impl_map {
    ($($map:ident),*) => {
        $(
            impl<K: Reflect, V: Reflect> Reflect for $map<K, V> {
                fn type_shape() -> Shape {
                    Shape::of::<Self>(core::any::type_name::<Self>(), Kind::Map)
                }

                #[inline]
                fn shape(&self) -> Shape {
                    Self::type_shape()
                }

                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Collection { len: self.len() }
                }

                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Collection
                }
            }
        )*
    };
}

impl_map!(HashMap, BTreeMap);

impl<T: Reflect + Default> Reflect for Option<T> {
    fn type_shape() -> Shape {
        Shape::of::<Self>(core::any::type_name::<Self>(), Kind::Optional(T::type_shape))
    }

    #[inline]
    fn shape(&self) -> Shape {
        Self::type_shape()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Optional(self)
    }
}

impl<T: Reflect + Default> Optional for Option<T> {
    fn get(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|v| v as &dyn Reflect)
    }

    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|v| v as &mut dyn Reflect)
    }

    fn insert_default(&mut self) -> &mut dyn Reflect {
        self.get_or_insert_with(T::default)
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn fresh(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }
}

impl<T: Reflect + Default> Reflect for Box<T> {
    fn type_shape() -> Shape {
        Shape::of::<Self>(core::any::type_name::<Self>(), Kind::Optional(T::type_shape))
    }

    #[inline]
    fn shape(&self) -> Shape {
        Self::type_shape()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Optional(self)
    }
}

/// A box always holds a value; clearing resets it to the zero value.
impl<T: Reflect + Default> Optional for Box<T> {
    fn get(&self) -> Option<&dyn Reflect> {
        Some(&**self)
    }

    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        Some(&mut **self)
    }

    fn insert_default(&mut self) -> &mut dyn Reflect {
        &mut **self
    }

    fn clear(&mut self) {
        **self = T::default();
    }

    fn fresh(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }

    fn nullable(&self) -> bool {
        false
    }
}

impl Reflect for Dynamic {
    fn type_shape() -> Shape {
        Shape::of::<Self>("Dynamic", Kind::Dynamic)
    }

    #[inline]
    fn shape(&self) -> Shape {
        Self::type_shape()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Dynamic(self.0.as_deref())
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Dynamic(self.0.as_deref_mut().map(|v| v as &mut dyn Reflect))
    }
}
