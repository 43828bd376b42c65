#![allow(dead_code)]

use tagwire::{
    io::{Reader, Writer},
    BoxError, Config, Dynamic, Engine, Reflect, Tag,
};

/// Fields run up to the next `,` or `]`; tagged fields are right-aligned in
/// `*` padding to the width in their tag.
pub struct Starred;

impl Tag for Starred {
    type Options = usize;
    type Error = BoxError;

    fn parse(&self, tag_value: &str, width: &mut usize) -> Result<bool, BoxError> {
        let (width_str, omit) = match tag_value.split_once(',') {
            Some((width, rest)) => (width, rest == "omitempty"),
            None => (tag_value, false),
        };
        *width = width_str.parse()?;
        Ok(omit)
    }

    fn encode(
        &self,
        _field: &str,
        width: Option<&usize>,
        raw: &[u8],
        out: &mut dyn Writer,
    ) -> Result<(), BoxError> {
        let width = width.copied().unwrap_or(0);
        if raw.len() > width && width != 0 {
            return Err(format!("{} bytes do not fit in {width}", raw.len()).into());
        }
        out.write_fill(b'*', width.saturating_sub(raw.len()));
        out.write(raw);
        Ok(())
    }

    fn decode(
        &self,
        _field: &str,
        width: Option<&usize>,
        input: &mut &[u8],
        out: &mut dyn Writer,
    ) -> Result<(), BoxError> {
        let raw = match width {
            Some(&width) if width != 0 => input.take_exact(width.min(input.len()))?,
            _ => input.take_until(|b| b == b',' || b == b']'),
        };
        let start = raw.iter().position(|&b| b != b'*').unwrap_or(raw.len());
        out.write(&raw[start..]);
        Ok(())
    }
}

pub fn engine() -> Engine<Starred> {
    Engine::new(
        Starred,
        Config::new("starred")
            .with_struct_opener("[")
            .with_struct_closer("]")
            .with_unwrap_when_decoding(true)
            .with_value_separator(",")
            .with_remove_separator_when_decoding(true),
    )
}

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
pub struct Inner {
    #[tag(starred = "6")]
    pub code: i32,
    pub label: String,
}

#[derive(Reflect, Default, Debug)]
pub struct Outer {
    #[tag(starred = "1")]
    pub flag: bool,
    #[tagwire(flatten)]
    pub inner: Option<Box<Inner>>,
    #[tag(starred = "20")]
    pub ratio: f64,
    pub nested: Inner,
    #[tag(starred = "8,omitempty")]
    pub maybe: Option<u32>,
    pub raw: Vec<u8>,
    pub any: Dynamic,
}

impl Outer {
    pub fn seeded() -> Self {
        Self {
            any: Dynamic::new(Inner::default()),
            ..Self::default()
        }
    }
}
