//! Engine configuration.
//!
//! A [`Config`] names the tag key an engine reads from field attributes and
//! describes the framing bytes around records and between fields. The
//! framing flags the walkers use are derived once, when the engine is built.
//!
//! ```
//! use tagwire::Config;
//!
//! let config = Config::new("fixed")
//!     .with_struct_opener("{")
//!     .with_struct_closer("}")
//!     .with_unwrap_when_decoding(true)
//!     .with_value_separator(",")
//!     .with_remove_separator_when_decoding(true);
//! assert_eq!(config.name, "fixed");
//! assert_eq!(config.value_separator, b",");
//! ```
#[cfg(feature = "serde")]
mod serde;

/// Working states whose buffers grew past this many bytes are dropped
/// instead of being returned to the pool.
pub const MAX_POOLED_STATE_SIZE: usize = 1 << 16; // 64 KiB
/// Default number of idle working states kept per direction.
pub const DEFAULT_POOL_CAPACITY: usize = 32;

/// Framing and naming for one engine.
///
/// Defaults:
/// - No opener, closer or separator.
/// - Decoding neither unwraps nor strips separators.
/// - Pool capacity is [`DEFAULT_POOL_CAPACITY`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Key under which fields carry their tag strings. Also prefixes every
    /// error message.
    pub name: String,
    /// Written before every record when encoding.
    #[cfg_attr(feature = "serde", serde(with = "self::serde::delimiter"))]
    pub struct_opener: Vec<u8>,
    /// Written after every record when encoding.
    #[cfg_attr(feature = "serde", serde(with = "self::serde::delimiter"))]
    pub struct_closer: Vec<u8>,
    /// Require and strip the opener and closer when decoding.
    pub unwrap_when_decoding: bool,
    /// Written between sibling fields when encoding.
    #[cfg_attr(feature = "serde", serde(with = "self::serde::delimiter"))]
    pub value_separator: Vec<u8>,
    /// Require and strip the separator between fields when decoding.
    pub remove_separator_when_decoding: bool,
    pub pool_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: String::new(),
            struct_opener: Vec::new(),
            struct_closer: Vec::new(),
            unwrap_when_decoding: false,
            value_separator: Vec::new(),
            remove_separator_when_decoding: false,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_struct_opener(mut self, opener: impl AsRef<[u8]>) -> Self {
        self.struct_opener = opener.as_ref().to_vec();
        self
    }

    pub fn with_struct_closer(mut self, closer: impl AsRef<[u8]>) -> Self {
        self.struct_closer = closer.as_ref().to_vec();
        self
    }

    pub fn with_unwrap_when_decoding(mut self, unwrap: bool) -> Self {
        self.unwrap_when_decoding = unwrap;
        self
    }

    pub fn with_value_separator(mut self, separator: impl AsRef<[u8]>) -> Self {
        self.value_separator = separator.as_ref().to_vec();
        self
    }

    pub fn with_remove_separator_when_decoding(mut self, remove: bool) -> Self {
        self.remove_separator_when_decoding = remove;
        self
    }

    /// Number of idle working states kept per direction. Zero disables
    /// pooling.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    pub(crate) fn framing(&self) -> Framing {
        let wrap = !self.struct_opener.is_empty() || !self.struct_closer.is_empty();
        let separate = !self.value_separator.is_empty();
        Framing {
            wrap,
            unwrap: wrap && self.unwrap_when_decoding,
            separate,
            remove_separator: separate && self.remove_separator_when_decoding,
            opener: self.struct_opener.clone(),
            closer: self.struct_closer.clone(),
            separator: self.value_separator.clone(),
        }
    }
}

/// Flags derived from a [`Config`].
#[derive(Debug, Clone)]
pub(crate) struct Framing {
    /// Either delimiter is set.
    pub wrap: bool,
    pub unwrap: bool,
    /// The separator is set.
    pub separate: bool,
    pub remove_separator: bool,
    pub opener: Vec<u8>,
    pub closer: Vec<u8>,
    pub separator: Vec<u8>,
}
