//! The extension point a concrete format implements.
use {
    crate::{
        error::BoxError,
        io::Writer,
        reflect::{MarshalFn, Shape, UnmarshalFn},
    },
    core::fmt::Debug,
};

/// Byte grammar of a concrete format, plugged into an [`Engine`](crate::Engine).
///
/// The engine walks the value and handles delimiters and separators; the tag
/// only formats and parses single leaf fields. Each field's tag string (found
/// under the engine's tag name) is parsed once into [`Tag::Options`] when the
/// field plan of its record is built.
///
/// ```
/// use tagwire::{io::{Reader, Writer}, BoxError, Tag};
///
/// /// Every field is written as-is and runs until the next `|`.
/// struct Pipe;
///
/// impl Tag for Pipe {
///     type Options = ();
///     type Error = BoxError;
///
///     fn decode(
///         &self,
///         _field: &str,
///         _options: Option<&()>,
///         input: &mut &[u8],
///         out: &mut dyn Writer,
///     ) -> Result<(), BoxError> {
///         out.write(input.take_until(|b| b == b'|'));
///         Ok(())
///     }
/// }
/// ```
pub trait Tag: Send + Sync + 'static {
    /// Per-field options parsed from a tag string.
    type Options: Default + Debug + Send + Sync + 'static;
    type Error: Into<BoxError>;

    /// Parse `tag_value` into `options`.
    ///
    /// Returns whether the field is skipped when its value is empty. The
    /// default leaves the options untouched and never omits.
    #[allow(unused_variables)]
    fn parse(&self, tag_value: &str, options: &mut Self::Options) -> Result<bool, Self::Error> {
        Ok(false)
    }

    /// Secondary formatting of the canonical bytes of one leaf field.
    ///
    /// `options` is `None` when the field carries no tag. The default writes
    /// `raw` through unchanged.
    #[allow(unused_variables)]
    fn encode(
        &self,
        field: &str,
        options: Option<&Self::Options>,
        raw: &[u8],
        out: &mut dyn Writer,
    ) -> Result<(), Self::Error> {
        out.write(raw);
        Ok(())
    }

    /// Take the bytes of one leaf field off the front of `input` and write
    /// their unformatted content to `out`.
    ///
    /// `input` holds everything not consumed yet; implementations must
    /// advance it by exactly the bytes that belong to this field.
    fn decode(
        &self,
        field: &str,
        options: Option<&Self::Options>,
        input: &mut &[u8],
        out: &mut dyn Writer,
    ) -> Result<(), Self::Error>;

    /// Custom encoding capability for values of `shape`.
    ///
    /// Probed once per type during coder resolution. The default uses the
    /// type's own [`Marshal`] implementation when it was wired into its shape.
    fn marshaller(&self, shape: &Shape) -> Option<MarshalFn> {
        shape.marshal
    }

    /// Custom decoding capability for values of `shape`.
    fn unmarshaler(&self, shape: &Shape) -> Option<UnmarshalFn> {
        shape.unmarshal
    }
}

/// Types that render themselves to raw field bytes.
///
/// Wire it into the type's shape with `#[tagwire(marshal)]`. The output still
/// passes through the tag's leaf encode transform.
pub trait Marshal {
    fn marshal(&self) -> Result<Vec<u8>, BoxError>;
}

/// Types that parse themselves from raw field bytes.
///
/// Wire it into the type's shape with `#[tagwire(unmarshal)]`. Decoding
/// starts from `Self::default()` and replaces the target only on success.
pub trait Unmarshal {
    fn unmarshal(&mut self, raw: &[u8]) -> Result<(), BoxError>;
}
