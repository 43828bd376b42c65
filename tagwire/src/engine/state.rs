//! Per-call working state.
use {
    super::{fields::Field, pool::Pooled},
    crate::{
        error::{Cause, Direction, Error, Fault},
        tag::Tag,
        util::trim_end_whitespace,
    },
};

/// Where the traversal currently is, for error attribution.
#[derive(Debug, Default)]
pub(crate) struct Context {
    /// Record declaring the field being processed.
    record: Option<&'static str>,
    field: Option<&'static str>,
    field_type: &'static str,
    /// Type of the value handed to the entry point, pointers removed.
    pub(crate) ty: &'static str,
}

impl Context {
    #[inline]
    pub(crate) fn enter<E: Tag>(&mut self, record: &'static str, field: &Field<E>) {
        self.record = Some(record);
        self.field = Some(field.name);
        self.field_type = field.type_name;
    }

    /// Turn the stop signal of a failed traversal into the error it reports.
    pub(crate) fn error(&self, fault: Fault, tag: &str, direction: Direction) -> Error {
        let cause = match fault {
            Fault::Recorded(err) => return *err,
            Fault::Cause(cause) => cause,
        };
        self.attribute(cause, tag, direction)
    }

    fn attribute(&self, cause: Cause, tag: &str, direction: Direction) -> Error {
        match (self.record, self.field) {
            (Some(record), Some(field)) => Error::Field {
                tag: tag.to_owned(),
                direction,
                record,
                field,
                ty: self.field_type,
                cause,
            },
            _ => Error::Value {
                tag: tag.to_owned(),
                direction,
                ty: self.ty,
                cause,
            },
        }
    }
}

#[derive(Default)]
pub(crate) struct EncodeState {
    /// Accumulated output.
    pub(crate) buf: Vec<u8>,
    /// Canonical text of the scalar being encoded.
    pub(crate) scratch: String,
    pub(crate) ctx: Context,
}

impl Pooled for EncodeState {
    fn reset(&mut self) {
        self.buf.clear();
        self.scratch.clear();
        self.ctx = Context::default();
    }

    fn footprint(&self) -> usize {
        self.buf.capacity().max(self.scratch.capacity())
    }
}

pub(crate) struct DecodeState {
    /// Copy of the input.
    data: Vec<u8>,
    /// Start of the unconsumed input.
    pos: usize,
    /// End of the unconsumed input; trailing whitespace is cut off lazily.
    end: usize,
    /// Raw content of the last leaf field.
    pub(crate) out: Vec<u8>,
    pub(crate) ctx: Context,
}

impl Default for DecodeState {
    fn default() -> Self {
        Self {
            data: Vec::with_capacity(512),
            pos: 0,
            end: 0,
            out: Vec::new(),
            ctx: Context::default(),
        }
    }
}

impl DecodeState {
    pub(crate) fn load(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
        self.pos = 0;
        self.end = self.data.len();
    }

    #[inline]
    pub(crate) fn rest(&self) -> &[u8] {
        &self.data[self.pos..self.end]
    }

    pub(crate) fn trim_end(&mut self) {
        self.end = self.pos + trim_end_whitespace(self.rest()).len();
    }

    /// Advance past `prefix` if the input starts with it.
    pub(crate) fn skip_prefix(&mut self, prefix: &[u8]) -> bool {
        if !self.rest().starts_with(prefix) {
            return false;
        }
        self.pos += prefix.len();
        true
    }

    /// Let `take` consume from the front of the input, writing to `out`.
    ///
    /// The cursor moves by however much `take` shortened the slice it was
    /// given.
    pub(crate) fn take_with<R>(&mut self, take: impl FnOnce(&mut &[u8], &mut Vec<u8>) -> R) -> R {
        self.out.clear();
        let mut rest = &self.data[self.pos..self.end];
        let before = rest.len();
        let result = take(&mut rest, &mut self.out);
        self.pos += before.saturating_sub(rest.len());
        result
    }
}

impl Pooled for DecodeState {
    fn reset(&mut self) {
        self.data.clear();
        self.out.clear();
        self.pos = 0;
        self.end = 0;
        self.ctx = Context::default();
    }

    fn footprint(&self) -> usize {
        self.data.capacity().max(self.out.capacity())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::io::Reader};

    #[test]
    fn cursor_follows_the_taker() {
        let mut state = DecodeState::default();
        state.load(b"{0007,hi___}  \n");
        assert!(state.skip_prefix(b"{"));
        state.trim_end();
        assert_eq!(state.rest(), b"0007,hi___}");

        let taken = state.take_with(|input, out| {
            out.extend_from_slice(input.take_exact(4).unwrap());
            input.len()
        });
        assert_eq!(taken, 7);
        assert_eq!(state.out, b"0007");
        assert_eq!(state.rest(), b",hi___}");
    }

    #[test]
    fn reset_forgets_the_input() {
        let mut state = DecodeState::default();
        state.load(b"abc");
        state.reset();
        assert!(state.rest().is_empty());
        state.load(b"de");
        assert_eq!(state.rest(), b"de");
    }
}
