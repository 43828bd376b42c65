//! Error types and helpers.
use {
    core::{
        fmt,
        num::{ParseFloatError, ParseIntError},
        str::Utf8Error,
    },
    std::sync::Arc,
    thiserror::Error,
};

/// Boxed error returned by tag extensions and custom capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
/// A tag parse error, shared by every call that hits the malformed field.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Direction of the operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encode => f.write_str("encode data from"),
            Direction::Decode => f.write_str("decode data into"),
        }
    }
}

/// The underlying reason a value or field could not be processed.
#[derive(Error, Debug)]
pub enum Cause {
    #[error("cannot support type")]
    UnsupportedType,
    #[error("dynamic value is nil")]
    NilDynamic,
    #[error("embedded type {0} embeds itself")]
    RecursiveEmbedding(&'static str),
    #[error(transparent)]
    InvalidInt(#[from] ParseIntError),
    #[error(transparent)]
    InvalidFloat(#[from] ParseFloatError),
    #[error("invalid boolean syntax: {0:?}")]
    InvalidBool(String),
    #[error(transparent)]
    InvalidUtf8(#[from] Utf8Error),
    #[error(transparent)]
    Transform(BoxError),
    #[error(transparent)]
    Capability(BoxError),
}

/// Errors surfaced by [`Engine::marshal`](crate::Engine::marshal) and
/// [`Engine::unmarshal`](crate::Engine::unmarshal).
///
/// Every message starts with the engine's tag name.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{tag}: cannot {direction} value of type {ty}: {cause}")]
    Value {
        tag: String,
        direction: Direction,
        ty: &'static str,
        #[source]
        cause: Cause,
    },
    #[error("{tag}: cannot {direction} struct field {record}.{field} of type {ty}: {cause}")]
    Field {
        tag: String,
        direction: Direction,
        record: &'static str,
        field: &'static str,
        ty: &'static str,
        #[source]
        cause: Cause,
    },
    #[error("{tag}: tag {value} of struct field {record}.{field}: {cause}")]
    InvalidTag {
        tag: String,
        value: &'static str,
        record: &'static str,
        field: &'static str,
        #[source]
        cause: SharedError,
    },
    #[error("{tag}: the raw data has an invalid format for an object value")]
    InvalidFormat { tag: String },
    #[error("{tag}: cannot set embedded pointer to unexported struct: {ty}")]
    PointerToUnexported { tag: String, ty: &'static str },
}

impl Error {
    /// The underlying cause, for value and field errors.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Error::Value { cause, .. } | Error::Field { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// Stop signal threaded through the walkers.
///
/// `Recorded` carries the first error of the traversal, already complete;
/// `Cause` still needs provenance from the top-level entry point.
#[derive(Debug)]
pub(crate) enum Fault {
    Recorded(Box<Error>),
    Cause(Cause),
}

macro_rules! impl_fault_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Fault {
                #[inline]
                fn from(err: $source) -> Self {
                    Fault::Cause(err.into())
                }
            }
        )*
    };
}

impl_fault_from!(Cause, ParseIntError, ParseFloatError, Utf8Error);

pub(crate) type Walk = core::result::Result<(), Fault>;

#[cold]
pub(crate) fn recorded(err: Error) -> Fault {
    Fault::Recorded(Box::new(err))
}

#[cold]
pub(crate) const fn unsupported_type() -> Fault {
    Fault::Cause(Cause::UnsupportedType)
}

#[cold]
pub(crate) const fn nil_dynamic() -> Fault {
    Fault::Cause(Cause::NilDynamic)
}

#[cold]
pub(crate) fn invalid_bool(raw: &str) -> Cause {
    Cause::InvalidBool(raw.to_owned())
}

#[cold]
pub(crate) fn transform(err: impl Into<BoxError>) -> Cause {
    Cause::Transform(err.into())
}
