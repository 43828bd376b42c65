//! The engine: cached plans, pooled state and the public entry points.
use {
    crate::{
        config::{Config, Framing},
        error::{Direction, Result},
        reflect::Reflect,
        tag::Tag,
    },
    coders::Coders,
    core::{any::TypeId, fmt},
    dashmap::DashMap,
    fields::FieldPlan,
    pool::Pool,
    state::{DecodeState, EncodeState},
    std::sync::Arc,
};

mod coders;
mod decode;
mod encode;
mod fields;
mod pool;
mod state;

/// Encoder and decoder for one tag extension and one framing.
///
/// Field plans and coder pairs are resolved the first time a type is seen and
/// cached for the life of the engine. An engine is `Send + Sync`; share it
/// behind an `Arc` or a `static` and call it from any thread.
///
/// ```
/// # #[cfg(feature = "derive")] {
/// use tagwire::{io::{Reader, Writer}, BoxError, Config, Engine, Reflect, Tag};
///
/// /// Fields are comma free text.
/// struct Csv;
///
/// impl Tag for Csv {
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
///         out.write(input.take_until(|b| b == b',' || b == b']'));
///         Ok(())
///     }
/// }
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// pub struct Point {
///     pub x: i32,
///     pub y: i32,
/// }
///
/// let engine = Engine::new(
///     Csv,
///     Config::new("csv")
///         .with_struct_opener("[")
///         .with_struct_closer("]")
///         .with_unwrap_when_decoding(true)
///         .with_value_separator(",")
///         .with_remove_separator_when_decoding(true),
/// );
///
/// let bytes = engine.marshal(&Point { x: 3, y: -4 }).unwrap();
/// assert_eq!(bytes, b"[3,-4]");
///
/// let mut point = Point::default();
/// engine.unmarshal(&bytes, &mut point).unwrap();
/// assert_eq!(point, Point { x: 3, y: -4 });
/// # }
/// ```
pub struct Engine<E: Tag> {
    tag: E,
    name: String,
    framing: Framing,
    coder_cache: DashMap<TypeId, Arc<Coders<E>>>,
    plan_cache: DashMap<TypeId, Arc<FieldPlan<E>>>,
    encode_pool: Pool<EncodeState>,
    decode_pool: Pool<DecodeState>,
}

impl<E: Tag> Engine<E> {
    pub fn new(tag: E, config: Config) -> Self {
        Self {
            tag,
            framing: config.framing(),
            coder_cache: DashMap::new(),
            plan_cache: DashMap::new(),
            encode_pool: Pool::new(config.pool_capacity),
            decode_pool: Pool::new(config.pool_capacity),
            name: config.name,
        }
    }

    /// The tag name this engine reads field tags from.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn tag(&self) -> &E {
        &self.tag
    }

    /// Encode `value` into a new buffer.
    pub fn marshal<T: Reflect>(&self, value: &T) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.marshal_value(value, &mut out)?;
        Ok(out)
    }

    /// Encode `value`, appending to `out`.
    ///
    /// `out` is left as it was when encoding fails.
    pub fn marshal_into<T: Reflect>(&self, value: &T, out: &mut Vec<u8>) -> Result<()> {
        self.marshal_value(value, out)
    }

    /// Decode `data` into `value`.
    ///
    /// Fields missing from the end of the input keep their current values.
    /// When decoding fails, fields assigned before the failure keep their new
    /// values.
    pub fn unmarshal<T: Reflect>(&self, data: &[u8], value: &mut T) -> Result<()> {
        self.unmarshal_value(data, value)
    }

    fn marshal_value(&self, value: &dyn Reflect, out: &mut Vec<u8>) -> Result<()> {
        let mut state = self.encode_pool.acquire(EncodeState::default);
        state.ctx.ty = value.shape().pointee().name;
        match self.encode_value(&mut state, None, value) {
            Ok(()) => {
                out.extend_from_slice(&state.buf);
                Ok(())
            }
            Err(fault) => Err(state.ctx.error(fault, &self.name, Direction::Encode)),
        }
    }

    fn unmarshal_value(&self, data: &[u8], value: &mut dyn Reflect) -> Result<()> {
        let mut state = self.decode_pool.acquire(DecodeState::default);
        state.load(data);
        state.ctx.ty = value.shape().pointee().name;
        self.decode_value(&mut state, None, value)
            .map_err(|fault| state.ctx.error(fault, &self.name, Direction::Decode))
    }
}

impl<E: Tag> fmt::Debug for Engine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .field("framing", &self.framing)
            .field("coders", &self.coder_cache.len())
            .field("plans", &self.plan_cache.len())
            .finish_non_exhaustive()
    }
}

/// Object-safe view of an [`Engine`], for callers that hold values as
/// `dyn Reflect` or pick the format at runtime.
pub trait Codec: Send + Sync {
    /// The tag name of the underlying engine.
    fn name(&self) -> &str;

    fn marshal(&self, value: &dyn Reflect) -> Result<Vec<u8>>;

    fn unmarshal(&self, data: &[u8], value: &mut dyn Reflect) -> Result<()>;
}

impl<E: Tag> Codec for Engine<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn marshal(&self, value: &dyn Reflect) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.marshal_value(value, &mut out)?;
        Ok(out)
    }

    fn unmarshal(&self, data: &[u8], value: &mut dyn Reflect) -> Result<()> {
        self.unmarshal_value(data, value)
    }
}
