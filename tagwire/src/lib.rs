//! tagwire is a pluggable encoding engine for records whose wire format is
//! described by per-field tags.
//!
//! In short, the [`Engine`] walks a value through compile-time reflection,
//! handles record framing (opener, closer and separators), and hands every leaf
//! field to a [`Tag`] extension that owns the byte grammar of one field.
//!
//! # Quickstart
//!
//! [`Reflect`] is implemented for booleans, integers, floats, `String`,
//! `Vec<u8>`, `Option`, `Box` and [`Dynamic`]. Your own records get it from the
//! derive macro, and carry their field tags as `#[tag(name = "value")]`.
//!
//! ```
//! # #[cfg(feature = "derive")] {
//! use tagwire::{io::{Reader, Writer}, BoxError, Config, Engine, Reflect, Tag};
//!
//! /// Upper-cases every field it encodes.
//! struct Shout;
//!
//! impl Tag for Shout {
//!     type Options = ();
//!     type Error = BoxError;
//!
//!     fn encode(
//!         &self,
//!         _field: &str,
//!         _options: Option<&()>,
//!         raw: &[u8],
//!         out: &mut dyn Writer,
//!     ) -> Result<(), BoxError> {
//!         out.write(&raw.to_ascii_uppercase());
//!         Ok(())
//!     }
//!
//!     fn decode(
//!         &self,
//!         _field: &str,
//!         _options: Option<&()>,
//!         input: &mut &[u8],
//!         out: &mut dyn Writer,
//!     ) -> Result<(), BoxError> {
//!         out.write(&input.take_until(|b| b == b';').to_ascii_lowercase());
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! pub struct Greeting {
//!     pub word: String,
//!     pub times: u8,
//!     #[tag(shout = "-")]
//!     pub cache: String,
//! }
//!
//! let engine = Engine::new(
//!     Shout,
//!     Config::new("shout")
//!         .with_value_separator(";")
//!         .with_remove_separator_when_decoding(true),
//! );
//! let value = Greeting { word: "hi".into(), times: 3, cache: "x".into() };
//! let bytes = engine.marshal(&value).unwrap();
//! assert_eq!(bytes, b"HI;3");
//!
//! let mut back = Greeting::default();
//! engine.unmarshal(&bytes, &mut back).unwrap();
//! assert_eq!(back, Greeting { word: "hi".into(), times: 3, cache: String::new() });
//! # }
//! ```
//!
//! # Framing
//!
//! Each nested record is surrounded by [`Config::struct_opener`] and
//! [`Config::struct_closer`], and consecutive fields are joined by
//! [`Config::value_separator`]. Decoding only requires the delimiters when
//! asked to ([`Config::unwrap_when_decoding`] and
//! [`Config::remove_separator_when_decoding`]). Fields marked with
//! `#[tagwire(flatten)]` are walked inline, as if declared in the parent.
//!
//! Decoding stops early, and successfully, when the input runs out; fields
//! past that point keep their values.
//!
//! # Derive attributes
//!
//! ## Top level
//! |Attribute|Type|Default|Description
//! |---|---|---|---|
//! |`marshal`|`bool`|`false`|Encode the type through its [`Marshal`] implementation|
//! |`unmarshal`|`bool`|`false`|Decode the type through its [`Unmarshal`] implementation; requires `Default`|
//!
//! ## Field level
//! |Attribute|Type|Default|Description
//! |---|---|---|---|
//! |`flatten`|`bool`|`false`|Walk the fields of this record (or pointer to a record) inline|
//! |`skip`|`bool`|`false`|Hide the field from reflection altogether|
//!
//! Tag strings go in a separate `#[tag(...)]` attribute, one `key = "value"`
//! pair per engine name. A value of `"-"` excludes the field for that engine
//! only.
//!
//! # Logging
//!
//! Resolution of coders and field plans, malformed tags and recursive
//! embedding are reported through [`tracing`] at `debug` level. Nothing is
//! logged per encoded value.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub use config::Config;
mod engine;
pub use engine::{Codec, Engine};
pub mod error;
pub use error::{BoxError, Cause, Direction, Error, Result, SharedError};
pub mod io;
pub mod reflect;
pub use reflect::{
    Dynamic, FieldInfo, Kind, MarshalFn, Optional, Record, Reflect, ReflectMut, ReflectRef,
    Shape, UnmarshalFn,
};
pub mod tag;
pub use tag::{Marshal, Tag, Unmarshal};
#[cfg(test)]
mod proptest_config;
#[cfg(test)]
mod test_support;
mod util;
#[cfg(feature = "derive")]
pub use tagwire_derive::*;
