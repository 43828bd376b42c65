//! Encode walker and encode primitives.
use {
    super::{
        coders::Site,
        fields::{FieldKind, FieldPlan},
        state::EncodeState,
        Engine,
    },
    crate::{
        error::{nil_dynamic, transform, unsupported_type, Fault, Walk},
        reflect::{Record, Reflect, ReflectRef},
        tag::Tag,
        util::{is_empty_value, write_float},
    },
    core::fmt::{Display, LowerExp, Write as _},
};

impl<E: Tag> Engine<E> {
    #[inline]
    pub(crate) fn encode_value(
        &self,
        state: &mut EncodeState,
        site: Site<'_, E>,
        value: &dyn Reflect,
    ) -> Walk {
        let coders = self.coders(&value.shape());
        (coders.encode)(self, state, site, value)
    }

    /// Hand canonical leaf bytes to the tag's encode transform.
    pub(crate) fn emit(&self, site: Site<'_, E>, raw: &[u8], out: &mut Vec<u8>) -> Walk {
        let (name, options) = match site {
            Some(field) => (field.name, field.options.as_ref()),
            None => ("", None),
        };
        self.tag
            .encode(name, options, raw, out)
            .map_err(|err| Fault::Cause(transform(err)))
    }

    /// Walk `plan` over `record`, optionally framed by the record delimiters.
    pub(crate) fn encode_fields(
        &self,
        state: &mut EncodeState,
        plan: &FieldPlan<E>,
        name: &'static str,
        record: &dyn Record,
        wrap: bool,
    ) -> Walk {
        if wrap {
            state.buf.extend_from_slice(&self.framing.opener);
        }

        let mut sep = false;
        for field in plan {
            let value = record.field(field.index).ok_or_else(unsupported_type)?;

            if field.omit_empty && is_empty_value(value) {
                continue;
            }

            if sep {
                state.buf.extend_from_slice(&self.framing.separator);
            }
            sep = self.framing.separate;

            match &field.kind {
                FieldKind::Embedded { plan, record: nested } => {
                    self.encode_embedded(state, plan, *nested, value)?;
                }
                FieldKind::Leaf(coders) => {
                    state.ctx.enter(name, field);
                    (coders.encode)(self, state, Some(field), value)?;
                }
            }
        }

        if wrap {
            state.buf.extend_from_slice(&self.framing.closer);
        }
        Ok(())
    }

    /// An absent embedded pointer encodes the zero value of its record.
    fn encode_embedded(
        &self,
        state: &mut EncodeState,
        plan: &FieldPlan<E>,
        name: &'static str,
        value: &dyn Reflect,
    ) -> Walk {
        match value.reflect_ref() {
            ReflectRef::Record(record) => self.encode_fields(state, plan, name, record, false),
            ReflectRef::Optional(ptr) => match ptr.get() {
                Some(inner) => self.encode_embedded(state, plan, name, inner),
                None => self.encode_embedded(state, plan, name, &*ptr.fresh()),
            },
            _ => Err(unsupported_type()),
        }
    }
}

pub(super) fn unsupported<E: Tag>(
    _: &Engine<E>,
    _: &mut EncodeState,
    _: Site<'_, E>,
    _: &dyn Reflect,
) -> Walk {
    Err(unsupported_type())
}

/// Booleans and integers, rendered through `Display`.
pub(super) fn display<E: Tag, T: Reflect + Display>(
    engine: &Engine<E>,
    state: &mut EncodeState,
    site: Site<'_, E>,
    value: &dyn Reflect,
) -> Walk {
    let value = value.downcast_ref::<T>().ok_or_else(unsupported_type)?;
    state.scratch.clear();
    // Writing to a `String` cannot fail.
    let _ = write!(state.scratch, "{value}");
    engine.emit(site, state.scratch.as_bytes(), &mut state.buf)
}

pub(super) fn float<E: Tag, T: Reflect + Display + LowerExp>(
    engine: &Engine<E>,
    state: &mut EncodeState,
    site: Site<'_, E>,
    value: &dyn Reflect,
) -> Walk {
    let value = value.downcast_ref::<T>().ok_or_else(unsupported_type)?;
    state.scratch.clear();
    write_float(&mut state.scratch, value);
    engine.emit(site, state.scratch.as_bytes(), &mut state.buf)
}

pub(super) fn string<E: Tag>(
    engine: &Engine<E>,
    state: &mut EncodeState,
    site: Site<'_, E>,
    value: &dyn Reflect,
) -> Walk {
    let value = value.downcast_ref::<String>().ok_or_else(unsupported_type)?;
    engine.emit(site, value.as_bytes(), &mut state.buf)
}

pub(super) fn bytes<E: Tag>(
    engine: &Engine<E>,
    state: &mut EncodeState,
    site: Site<'_, E>,
    value: &dyn Reflect,
) -> Walk {
    let value = value.downcast_ref::<Vec<u8>>().ok_or_else(unsupported_type)?;
    engine.emit(site, value, &mut state.buf)
}

pub(super) fn record<E: Tag>(
    engine: &Engine<E>,
    state: &mut EncodeState,
    _: Site<'_, E>,
    value: &dyn Reflect,
) -> Walk {
    let shape = value.shape();
    let plan = engine.fields(&shape);
    let ReflectRef::Record(record) = value.reflect_ref() else {
        return Err(unsupported_type());
    };
    engine.encode_fields(state, &plan, shape.name, record, engine.framing.wrap)
}

/// An absent pointer encodes the zero value of its pointee.
pub(super) fn optional<E: Tag>(
    engine: &Engine<E>,
    state: &mut EncodeState,
    site: Site<'_, E>,
    value: &dyn Reflect,
) -> Walk {
    let ReflectRef::Optional(ptr) = value.reflect_ref() else {
        return Err(unsupported_type());
    };
    match ptr.get() {
        Some(inner) => engine.encode_value(state, site, inner),
        None => engine.encode_value(state, site, &*ptr.fresh()),
    }
}

pub(super) fn dynamic<E: Tag>(
    engine: &Engine<E>,
    state: &mut EncodeState,
    site: Site<'_, E>,
    value: &dyn Reflect,
) -> Walk {
    match value.reflect_ref() {
        ReflectRef::Dynamic(Some(inner)) => engine.encode_value(state, site, inner),
        ReflectRef::Dynamic(None) => Err(nil_dynamic()),
        _ => Err(unsupported_type()),
    }
}
