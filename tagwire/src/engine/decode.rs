//! Decode walker and decode primitives.
use {
    super::{
        coders::Site,
        fields::{FieldKind, FieldPlan},
        state::DecodeState,
        Engine,
    },
    crate::{
        error::{nil_dynamic, recorded, transform, unsupported_type, Error, Fault, Walk},
        reflect::{Record, Reflect, ReflectMut},
        tag::Tag,
        util::{is_zero_value, parse_bool},
    },
    core::str::{from_utf8, FromStr},
};

impl<E: Tag> Engine<E> {
    #[inline]
    pub(crate) fn decode_value(
        &self,
        state: &mut DecodeState,
        site: Site<'_, E>,
        value: &mut dyn Reflect,
    ) -> Walk {
        let coders = self.coders(&value.shape());
        (coders.decode)(self, state, site, value)
    }

    /// Let the tag's decode transform take one leaf field off the input.
    ///
    /// Returns whether it produced any raw content.
    pub(crate) fn take_leaf(&self, state: &mut DecodeState, site: Site<'_, E>) -> Result<bool, Fault> {
        let (name, options) = match site {
            Some(field) => (field.name, field.options.as_ref()),
            None => ("", None),
        };
        state
            .take_with(|input, out| self.tag.decode(name, options, input, out))
            .map_err(|err| Fault::Cause(transform(err)))?;
        Ok(!state.out.is_empty())
    }

    fn expect_prefix(&self, state: &mut DecodeState, prefix: &[u8]) -> Walk {
        if state.skip_prefix(prefix) {
            return Ok(());
        }
        Err(recorded(Error::InvalidFormat {
            tag: self.name.clone(),
        }))
    }

    /// Walk `plan` over `record`, optionally requiring the record delimiters.
    ///
    /// Decoding stops early, without error, once the input runs out or
    /// reaches the record's closer.
    pub(crate) fn decode_fields(
        &self,
        state: &mut DecodeState,
        plan: &FieldPlan<E>,
        name: &'static str,
        record: &mut dyn Record,
        unwrap: bool,
    ) -> Walk {
        let closer = &self.framing.closer;
        if unwrap {
            self.expect_prefix(state, &self.framing.opener)?;
        }

        let mut sep = false;
        for field in plan {
            state.trim_end();
            let rest = state.rest();
            if rest.is_empty() || unwrap && !closer.is_empty() && rest.starts_with(closer) {
                break;
            }

            if sep {
                self.expect_prefix(state, &self.framing.separator)?;
            }
            sep = self.framing.remove_separator;

            let value = record.field_mut(field.index).ok_or_else(unsupported_type)?;
            match &field.kind {
                FieldKind::Embedded { plan, record: nested } => {
                    self.decode_embedded(state, plan, *nested, value)?;
                }
                FieldKind::Leaf(coders) => {
                    state.ctx.enter(name, field);
                    (coders.decode)(self, state, Some(field), value)?;
                }
            }
        }

        if unwrap {
            self.expect_prefix(state, closer)?;
        }
        Ok(())
    }

    /// An absent embedded pointer is allocated when its record type is
    /// public.
    fn decode_embedded(
        &self,
        state: &mut DecodeState,
        plan: &FieldPlan<E>,
        name: &'static str,
        value: &mut dyn Reflect,
    ) -> Walk {
        let shape = value.shape();
        match value.reflect_mut() {
            ReflectMut::Record(record) => self.decode_fields(state, plan, name, record, false),
            ReflectMut::Optional(ptr) => {
                if ptr.get().is_none() {
                    let pointee = shape.pointee();
                    if !pointee.exported {
                        return Err(recorded(Error::PointerToUnexported {
                            tag: self.name.clone(),
                            ty: pointee.name,
                        }));
                    }
                }
                self.decode_embedded(state, plan, name, ptr.insert_default())
            }
            _ => Err(unsupported_type()),
        }
    }
}

pub(super) fn unsupported<E: Tag>(
    _: &Engine<E>,
    _: &mut DecodeState,
    _: Site<'_, E>,
    _: &mut dyn Reflect,
) -> Walk {
    Err(unsupported_type())
}

/// Numbers, parsed from their decimal text.
pub(super) fn parsed<E: Tag, T: Reflect + FromStr>(
    engine: &Engine<E>,
    state: &mut DecodeState,
    site: Site<'_, E>,
    value: &mut dyn Reflect,
) -> Walk
where
    Fault: From<T::Err>,
{
    if !engine.take_leaf(state, site)? {
        return Ok(());
    }
    let parsed = from_utf8(&state.out)?.parse::<T>()?;
    *value.downcast_mut::<T>().ok_or_else(unsupported_type)? = parsed;
    Ok(())
}

pub(super) fn boolean<E: Tag>(
    engine: &Engine<E>,
    state: &mut DecodeState,
    site: Site<'_, E>,
    value: &mut dyn Reflect,
) -> Walk {
    if !engine.take_leaf(state, site)? {
        return Ok(());
    }
    let parsed = parse_bool(from_utf8(&state.out)?)?;
    *value.downcast_mut::<bool>().ok_or_else(unsupported_type)? = parsed;
    Ok(())
}

pub(super) fn string<E: Tag>(
    engine: &Engine<E>,
    state: &mut DecodeState,
    site: Site<'_, E>,
    value: &mut dyn Reflect,
) -> Walk {
    if !engine.take_leaf(state, site)? {
        return Ok(());
    }
    let text = from_utf8(&state.out)?;
    let dst = value.downcast_mut::<String>().ok_or_else(unsupported_type)?;
    dst.clear();
    dst.push_str(text);
    Ok(())
}

pub(super) fn bytes<E: Tag>(
    engine: &Engine<E>,
    state: &mut DecodeState,
    site: Site<'_, E>,
    value: &mut dyn Reflect,
) -> Walk {
    if !engine.take_leaf(state, site)? {
        return Ok(());
    }
    let dst = value.downcast_mut::<Vec<u8>>().ok_or_else(unsupported_type)?;
    dst.clear();
    dst.extend_from_slice(&state.out);
    Ok(())
}

pub(super) fn record<E: Tag>(
    engine: &Engine<E>,
    state: &mut DecodeState,
    _: Site<'_, E>,
    value: &mut dyn Reflect,
) -> Walk {
    let shape = value.shape();
    let plan = engine.fields(&shape);
    let ReflectMut::Record(record) = value.reflect_mut() else {
        return Err(unsupported_type());
    };
    engine.decode_fields(state, &plan, shape.name, record, engine.framing.unwrap)
}

/// An absent pointer is only populated when the decoded pointee is not the
/// zero value.
pub(super) fn optional<E: Tag>(
    engine: &Engine<E>,
    state: &mut DecodeState,
    site: Site<'_, E>,
    value: &mut dyn Reflect,
) -> Walk {
    let ReflectMut::Optional(ptr) = value.reflect_mut() else {
        return Err(unsupported_type());
    };
    let was_absent = ptr.get().is_none();
    let result = engine.decode_value(state, site, ptr.insert_default());
    if was_absent && (result.is_err() || ptr.get().map_or(true, is_zero_value)) {
        ptr.clear();
    }
    result
}

pub(super) fn dynamic<E: Tag>(
    engine: &Engine<E>,
    state: &mut DecodeState,
    site: Site<'_, E>,
    value: &mut dyn Reflect,
) -> Walk {
    match value.reflect_mut() {
        ReflectMut::Dynamic(Some(inner)) => engine.decode_value(state, site, inner),
        ReflectMut::Dynamic(None) => Err(nil_dynamic()),
        _ => Err(unsupported_type()),
    }
}
