//! Compile-time reflection used to drive the engine.
//!
//! Every value the engine can visit implements [`Reflect`]. A [`Shape`]
//! carries the stable type identity, the closed [`Kind`] the coder resolver
//! dispatches on, and the optional custom capabilities. Composite types
//! expose their fields through [`Record`], usually via `#[derive(Reflect)]`:
//!
//! ```
//! # #[cfg(feature = "derive")] {
//! use tagwire::{Kind, Reflect};
//!
//! #[derive(Reflect, Default)]
//! pub struct Header {
//!     #[tag(fixed = "4,0,r")]
//!     pub id: u32,
//!     #[tag(fixed = "-")]
//!     pub scratch: String,
//! }
//!
//! let shape = Header::type_shape();
//! assert_eq!(shape.name, "Header");
//! assert!(matches!(shape.kind, Kind::Record(_)));
//! # }
//! ```
use {
    crate::{error::BoxError, tag::Marshal, tag::Unmarshal},
    core::{
        any::{Any, TypeId},
        fmt,
    },
};

mod impls;

/// Encodes a value through its custom marshal capability.
pub type MarshalFn = fn(&dyn Reflect) -> Result<Vec<u8>, BoxError>;
/// Decodes raw bytes into a value through its custom unmarshal capability.
pub type UnmarshalFn = fn(&mut dyn Reflect, &[u8]) -> Result<(), BoxError>;

/// Closed set of kinds the coder resolver knows about.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
    /// `Vec<u8>`.
    Bytes,
    /// A sequence of anything other than bytes.
    Sequence,
    Array,
    Map,
    /// A struct-like type; the function lists its declared fields.
    Record(fn() -> Vec<FieldInfo>),
    /// A pointer-like type; the function returns the pointee's shape.
    Optional(fn() -> Shape),
    /// An interface-like holder of some other [`Reflect`] value.
    Dynamic,
}

/// Static description of a type.
#[derive(Clone, Copy)]
pub struct Shape {
    pub id: TypeId,
    pub name: &'static str,
    pub kind: Kind,
    /// Whether the type is visible outside its module (`pub` or `pub(..)`).
    pub exported: bool,
    pub marshal: Option<MarshalFn>,
    pub unmarshal: Option<UnmarshalFn>,
}

impl Shape {
    pub fn of<T: Any>(name: &'static str, kind: Kind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
            kind,
            exported: true,
            marshal: None,
            unmarshal: None,
        }
    }

    pub const fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    pub const fn with_marshal(mut self, marshal: MarshalFn) -> Self {
        self.marshal = Some(marshal);
        self
    }

    pub const fn with_unmarshal(mut self, unmarshal: UnmarshalFn) -> Self {
        self.unmarshal = Some(unmarshal);
        self
    }

    #[inline]
    pub const fn is_record(&self) -> bool {
        matches!(self.kind, Kind::Record(_))
    }

    /// The pointee's shape for optional kinds, otherwise `self`.
    pub fn pointee(self) -> Shape {
        match self.kind {
            Kind::Optional(inner) => inner().pointee(),
            _ => self,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("exported", &self.exported)
            .field("marshal", &self.marshal.is_some())
            .field("unmarshal", &self.unmarshal.is_some())
            .finish()
    }
}

/// One declared field of a [`Record`].
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo {
    /// Position among the declared fields, used for [`Record::field`].
    pub index: usize,
    pub name: &'static str,
    pub exported: bool,
    /// Anonymous field whose own fields are flattened into the parent.
    pub embedded: bool,
    /// Tag strings keyed by tag name.
    pub tags: &'static [(&'static str, &'static str)],
    pub shape: fn() -> Shape,
}

impl FieldInfo {
    /// The tag string stored under `key`.
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find_map(|&(name, value)| (name == key).then_some(value))
    }
}

/// `Any` access for every [`Reflect`] type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Kind-specific view of a value.
pub enum ReflectRef<'a> {
    /// Bool, number, string or bytes; read through [`downcast_ref`](trait.Reflect.html#method.downcast_ref).
    Scalar,
    Record(&'a dyn Record),
    Optional(&'a dyn Optional),
    Dynamic(Option<&'a dyn Reflect>),
    Collection { len: usize },
}

/// Mutable counterpart of [`ReflectRef`].
pub enum ReflectMut<'a> {
    Scalar,
    Record(&'a mut dyn Record),
    Optional(&'a mut dyn Optional),
    Dynamic(Option<&'a mut dyn Reflect>),
    Collection,
}

/// A value the engine can encode and decode.
pub trait Reflect: AsAny + 'static {
    fn type_shape() -> Shape
    where
        Self: Sized;

    fn shape(&self) -> Shape;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

impl dyn Reflect {
    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    #[inline]
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Struct-like values with indexed fields.
pub trait Record: Reflect {
    fn fields() -> Vec<FieldInfo>
    where
        Self: Sized;

    fn field(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// Pointer-like values (`Option<T>`, `Box<T>`).
pub trait Optional {
    fn get(&self) -> Option<&dyn Reflect>;

    fn get_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Point at a zero value of the pointee unless something is already held.
    fn insert_default(&mut self) -> &mut dyn Reflect;

    /// Drop the held value, if the pointer may be absent.
    fn clear(&mut self);

    /// A detached zero value of the pointee.
    fn fresh(&self) -> Box<dyn Reflect>;

    /// Whether the pointer can hold nothing at all.
    fn nullable(&self) -> bool {
        true
    }
}

/// Interface-like holder of any [`Reflect`] value.
///
/// The engine never invents a concrete type for an empty holder: decoding
/// into a nil `Dynamic` fails, so callers pre-populate it.
#[derive(Default)]
pub struct Dynamic(pub Option<Box<dyn Reflect>>);

impl Dynamic {
    pub fn new(value: impl Reflect) -> Self {
        Self(Some(Box::new(value)))
    }

    pub const fn nil() -> Self {
        Self(None)
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_none()
    }

    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref())
    }

    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.0.as_deref_mut().and_then(|v| v.downcast_mut())
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_deref() {
            Some(v) => write!(f, "Dynamic({})", v.shape().name),
            None => f.write_str("Dynamic(nil)"),
        }
    }
}

/// The shape of `T`.
#[inline]
pub fn shape_of<T: Reflect>() -> Shape {
    T::type_shape()
}

#[doc(hidden)]
pub mod __private {
    use super::*;

    pub fn marshal_thunk<T: Marshal + Reflect>(value: &dyn Reflect) -> Result<Vec<u8>, BoxError> {
        match value.downcast_ref::<T>() {
            Some(value) => value.marshal(),
            None => Err(format!("marshal capability bound to {}", value.shape().name).into()),
        }
    }

    pub fn unmarshal_thunk<T: Unmarshal + Reflect + Default>(
        value: &mut dyn Reflect,
        raw: &[u8],
    ) -> Result<(), BoxError> {
        let mut fresh = T::default();
        fresh.unmarshal(raw)?;
        match value.downcast_mut::<T>() {
            Some(dst) => {
                *dst = fresh;
                Ok(())
            }
            None => Err(format!("unmarshal capability bound to {}", value.shape().name).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::collections::BTreeMap};

    #[test]
    fn byte_vectors_are_bytes() {
        assert!(matches!(shape_of::<Vec<u8>>().kind, Kind::Bytes));
        assert!(matches!(shape_of::<Vec<u16>>().kind, Kind::Sequence));
        assert!(matches!(shape_of::<[u8; 4]>().kind, Kind::Array));
        assert!(matches!(shape_of::<BTreeMap<u8, u8>>().kind, Kind::Map));
    }

    #[test]
    fn pointee_unwraps_nested_pointers() {
        let shape = shape_of::<Option<Box<i32>>>();
        assert!(matches!(shape.kind, Kind::Optional(_)));
        assert_eq!(shape.pointee().id, TypeId::of::<i32>());
    }

    #[test]
    fn option_insert_and_clear() {
        let mut value: Option<u8> = None;
        let view: &mut dyn Optional = &mut value;
        assert!(view.get().is_none());
        *view.insert_default().downcast_mut::<u8>().unwrap() = 9;
        assert_eq!(view.get().and_then(|v| v.downcast_ref::<u8>()), Some(&9));
        view.clear();
        assert_eq!(value, None);
    }

    #[test]
    fn dynamic_downcasts() {
        let mut value = Dynamic::new(String::from("abc"));
        assert!(!value.is_nil());
        assert_eq!(value.downcast_ref::<u8>(), None);
        value.downcast_mut::<String>().unwrap().push('d');
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("abcd"));
        assert_eq!(format!("{:?}", Dynamic::nil()), "Dynamic(nil)");
    }
}
