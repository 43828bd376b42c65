//! Per-type coder pairs.
use {
    super::{
        decode, encode,
        fields::Field,
        state::{DecodeState, EncodeState},
        Engine,
    },
    crate::{
        error::{recorded, Cause, Error, Fault, SharedError, Walk},
        reflect::{Kind, Reflect, Shape},
        tag::Tag,
    },
    std::sync::Arc,
    tracing::debug,
};

/// The field a coder runs for; `None` for the value handed to the entry
/// point.
pub(crate) type Site<'a, E> = Option<&'a Field<E>>;

pub(crate) type EncodeFn<E> =
    dyn Fn(&Engine<E>, &mut EncodeState, Site<'_, E>, &dyn Reflect) -> Walk + Send + Sync;
pub(crate) type DecodeFn<E> =
    dyn Fn(&Engine<E>, &mut DecodeState, Site<'_, E>, &mut dyn Reflect) -> Walk + Send + Sync;

/// Encode and decode primitives selected for one type.
pub(crate) struct Coders<E: Tag> {
    pub(crate) encode: Box<EncodeFn<E>>,
    pub(crate) decode: Box<DecodeFn<E>>,
}

#[inline]
fn encoder<E: Tag, F>(f: F) -> Box<EncodeFn<E>>
where
    F: Fn(&Engine<E>, &mut EncodeState, Site<'_, E>, &dyn Reflect) -> Walk + Send + Sync + 'static,
{
    Box::new(f)
}

#[inline]
fn decoder<E: Tag, F>(f: F) -> Box<DecodeFn<E>>
where
    F: Fn(&Engine<E>, &mut DecodeState, Site<'_, E>, &mut dyn Reflect) -> Walk
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

impl<E: Tag> Coders<E> {
    fn new<Enc, Dec>(encode: Enc, decode: Dec) -> Self
    where
        Enc: Fn(&Engine<E>, &mut EncodeState, Site<'_, E>, &dyn Reflect) -> Walk
            + Send
            + Sync
            + 'static,
        Dec: Fn(&Engine<E>, &mut DecodeState, Site<'_, E>, &mut dyn Reflect) -> Walk
            + Send
            + Sync
            + 'static,
    {
        Self {
            encode: encoder(encode),
            decode: decoder(decode),
        }
    }

    fn unsupported() -> Self {
        Self::new(encode::unsupported::<E>, decode::unsupported::<E>)
    }

    /// Coders for a field whose tag failed to parse.
    pub(crate) fn invalid_tag(
        value: &'static str,
        record: &'static str,
        field: &'static str,
        cause: SharedError,
    ) -> Self {
        let fail = move |engine: &Engine<E>| {
            recorded(Error::InvalidTag {
                tag: engine.name.clone(),
                value,
                record,
                field,
                cause: cause.clone(),
            })
        };
        let fail_decode = fail.clone();
        Self::new(
            move |engine, _, _, _| Err(fail(engine)),
            move |engine, _, _, _| Err(fail_decode(engine)),
        )
    }

    /// Coders for an embedded field whose type is already being flattened.
    pub(crate) fn recursive_embedding(ty: &'static str) -> Self {
        Self::new(
            move |_, _, _, _| Err(Fault::Cause(Cause::RecursiveEmbedding(ty))),
            move |_, _, _, _| Err(Fault::Cause(Cause::RecursiveEmbedding(ty))),
        )
    }
}

macro_rules! parsed {
    ($type:ty) => {
        Coders::new(encode::display::<E, $type>, decode::parsed::<E, $type>)
    };
}

impl<E: Tag> Engine<E> {
    /// Coders for `shape`, resolved once per type.
    pub(crate) fn coders(&self, shape: &Shape) -> Arc<Coders<E>> {
        if let Some(coders) = self.coder_cache.get(&shape.id) {
            return coders.value().clone();
        }
        // Resolve without holding a shard lock; the first stored pair wins.
        let coders = Arc::new(self.resolve_coders(shape));
        debug!(tag = %self.name, ty = shape.name, kind = ?shape.kind, "resolved coders");
        self.coder_cache
            .entry(shape.id)
            .or_insert(coders)
            .value()
            .clone()
    }

    fn resolve_coders(&self, shape: &Shape) -> Coders<E> {
        let mut coders = match shape.kind {
            Kind::Bool => Coders::new(encode::display::<E, bool>, decode::boolean::<E>),
            Kind::I8 => parsed!(i8),
            Kind::I16 => parsed!(i16),
            Kind::I32 => parsed!(i32),
            Kind::I64 => parsed!(i64),
            Kind::I128 => parsed!(i128),
            Kind::Isize => parsed!(isize),
            Kind::U8 => parsed!(u8),
            Kind::U16 => parsed!(u16),
            Kind::U32 => parsed!(u32),
            Kind::U64 => parsed!(u64),
            Kind::U128 => parsed!(u128),
            Kind::Usize => parsed!(usize),
            Kind::F32 => Coders::new(encode::float::<E, f32>, decode::parsed::<E, f32>),
            Kind::F64 => Coders::new(encode::float::<E, f64>, decode::parsed::<E, f64>),
            Kind::String => Coders::new(encode::string::<E>, decode::string::<E>),
            Kind::Bytes => Coders::new(encode::bytes::<E>, decode::bytes::<E>),
            Kind::Record(_) => Coders::new(encode::record::<E>, decode::record::<E>),
            Kind::Optional(_) => Coders::new(encode::optional::<E>, decode::optional::<E>),
            Kind::Dynamic => Coders::new(encode::dynamic::<E>, decode::dynamic::<E>),
            Kind::Sequence | Kind::Array | Kind::Map => Coders::unsupported(),
        };

        // Pointers defer to their pointee's coders.
        if !matches!(shape.kind, Kind::Optional(_)) {
            if let Some(marshal) = self.tag.marshaller(shape) {
                coders.encode = encoder::<E, _>(move |engine, state, site, value| {
                    let raw = marshal(value).map_err(|err| Fault::Cause(Cause::Capability(err)))?;
                    engine.emit(site, &raw, &mut state.buf)
                });
            }
            if let Some(unmarshal) = self.tag.unmarshaler(shape) {
                coders.decode = decoder::<E, _>(move |engine, state, site, value| {
                    if !engine.take_leaf(state, site)? {
                        return Ok(());
                    }
                    unmarshal(value, &state.out).map_err(|err| Fault::Cause(Cause::Capability(err)))
                });
            }
        }

        coders
    }
}
