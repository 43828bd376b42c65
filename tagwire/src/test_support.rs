//! Fixed-width tag and fixture records shared by the in-crate tests.
pub(crate) use crate::reflect::Dynamic;
use {
    crate::{
        io::{ReadError, Reader, Writer},
        tag::Tag,
        Config,
    },
    core::num::ParseIntError,
    proptest_derive::Arbitrary,
    thiserror::Error,
};

/// Options of a `fixed` tag: `len,filler,align[,omitempty]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Width {
    pub len: usize,
    pub filler: u8,
    /// `l` pads on the right; anything else pads on the left.
    pub align: u8,
}

#[derive(Error, Debug)]
pub enum WidthError {
    #[error(transparent)]
    Len(#[from] ParseIntError),
    #[error("filler and align must be single bytes: {0:?}")]
    NotAByte(String),
    #[error("data for encoding [{got}] more than field length [{len}]")]
    Overflow { got: usize, len: usize },
    #[error(transparent)]
    Read(#[from] ReadError),
}

fn single_byte(part: &str) -> Result<u8, WidthError> {
    match part.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(WidthError::NotAByte(part.to_owned())),
    }
}

/// Pads every tagged field to a fixed width.
///
/// Untagged or zero-width fields are written as-is and read up to the next
/// `,` or `}`.
pub struct FixedWidth;

impl Tag for FixedWidth {
    type Options = Width;
    type Error = WidthError;

    fn parse(&self, tag_value: &str, options: &mut Width) -> Result<bool, WidthError> {
        let mut omit = false;
        for (i, part) in tag_value.split(',').enumerate() {
            match i {
                0 => options.len = part.parse()?,
                1 => options.filler = single_byte(part)?,
                2 => options.align = single_byte(part)?,
                _ => omit |= part == "omitempty",
            }
        }
        Ok(omit)
    }

    fn encode(
        &self,
        _field: &str,
        options: Option<&Width>,
        raw: &[u8],
        out: &mut dyn Writer,
    ) -> Result<(), WidthError> {
        let Some(width) = options.filter(|w| w.len != 0 && w.len != raw.len()) else {
            out.write(raw);
            return Ok(());
        };
        if raw.len() > width.len {
            return Err(WidthError::Overflow {
                got: raw.len(),
                len: width.len,
            });
        }
        let fill = width.len - raw.len();
        if width.align == b'l' {
            out.write(raw);
            out.write_fill(width.filler, fill);
        } else {
            out.write_fill(width.filler, fill);
            out.write(raw);
        }
        Ok(())
    }

    fn decode(
        &self,
        _field: &str,
        options: Option<&Width>,
        input: &mut &[u8],
        out: &mut dyn Writer,
    ) -> Result<(), WidthError> {
        let Some(width) = options.filter(|w| w.len != 0) else {
            out.write(input.take_until(|b| b == b',' || b == b'}'));
            return Ok(());
        };
        let len = width.len.min(input.len());
        let raw = input.take_exact(len)?;
        let content = if width.align == b'l' {
            let end = raw
                .iter()
                .rposition(|&b| b != width.filler)
                .map_or(0, |i| i + 1);
            &raw[..end]
        } else {
            let start = raw
                .iter()
                .position(|&b| b != width.filler)
                .unwrap_or(raw.len());
            &raw[start..]
        };
        out.write(content);
        Ok(())
    }
}

/// `{a,b}` framing under the `fixed` tag name.
pub fn braces() -> Config {
    Config::new("fixed")
        .with_struct_opener("{")
        .with_struct_closer("}")
        .with_unwrap_when_decoding(true)
        .with_value_separator(",")
        .with_remove_separator_when_decoding(true)
}

#[derive(tagwire_derive::Reflect, Debug, Default, Clone, PartialEq)]
#[tagwire(internal)]
pub struct Pair {
    #[tag(fixed = "4,0,r")]
    pub a: i64,
    #[tag(fixed = "5,_,l")]
    pub b: String,
}

#[derive(tagwire_derive::Reflect, Debug, Default, Clone, PartialEq)]
#[tagwire(internal)]
pub struct BaseTypes {
    #[tag(fixed = "5, ,l")]
    pub boolean: bool,
    #[tag(fixed = "4,0,r")]
    pub int: i64,
    #[tag(fixed = "4,0,r")]
    pub int8: i8,
    #[tag(fixed = "4,0,r")]
    pub int16: i16,
    #[tag(fixed = "4,0,r")]
    pub int32: i32,
    #[tag(fixed = "4,0,r")]
    pub int64: i64,
    #[tag(fixed = "4,0,r")]
    pub uint: u64,
    #[tag(fixed = "4,0,r")]
    pub uint8: u8,
    #[tag(fixed = "4,0,r")]
    pub uint16: u16,
    #[tag(fixed = "4,0,r")]
    pub uint32: u32,
    #[tag(fixed = "4,0,r")]
    pub uint64: u64,
    #[tag(fixed = "4,0,r")]
    pub uintptr: usize,
    #[tag(fixed = "5,0,r")]
    pub float32: f32,
    #[tag(fixed = "5,0,r")]
    pub float64: f64,
    #[tag(fixed = "10,_,l")]
    pub text: String,
    #[tag(fixed = "4, ,l")]
    pub bytes: Vec<u8>,

    #[tag(fixed = "5, ,l")]
    pub p_bool: Option<bool>,
    #[tag(fixed = "4,0,r")]
    pub p_int: Option<i64>,
    #[tag(fixed = "4,0,r")]
    pub p_int8: Option<i8>,
    #[tag(fixed = "4,0,r")]
    pub p_int16: Option<i16>,
    #[tag(fixed = "4,0,r")]
    pub p_int32: Option<i32>,
    #[tag(fixed = "4,0,r")]
    pub p_int64: Option<i64>,
    #[tag(fixed = "4,0,r")]
    pub p_uint: Option<u64>,
    #[tag(fixed = "4,0,r")]
    pub p_uint8: Option<u8>,
    #[tag(fixed = "4,0,r")]
    pub p_uint16: Option<u16>,
    #[tag(fixed = "4,0,r")]
    pub p_uint32: Option<u32>,
    #[tag(fixed = "4,0,r")]
    pub p_uint64: Option<u64>,
    #[tag(fixed = "4,0,r")]
    pub p_uintptr: Option<usize>,
    #[tag(fixed = "5,0,r")]
    pub p_float32: Option<f32>,
    #[tag(fixed = "5,0,r")]
    pub p_float64: Option<f64>,
    #[tag(fixed = "10,_,l")]
    pub p_text: Option<String>,
    #[tag(fixed = "4, ,l")]
    pub p_bytes: Option<Vec<u8>>,
}

impl BaseTypes {
    pub fn sample() -> Self {
        Self {
            boolean: false,
            int: 99,
            int8: 98,
            int16: 97,
            int32: 96,
            int64: 95,
            uint: 89,
            uint8: 88,
            uint16: 87,
            uint32: 86,
            uint64: 85,
            uintptr: 84,
            float32: 77.7,
            float64: 6.66,
            text: "Hel Wor".into(),
            bytes: b"TEST".to_vec(),
            p_bool: Some(true),
            p_int: Some(11),
            p_int8: Some(12),
            p_int16: Some(13),
            p_int32: Some(14),
            p_int64: Some(15),
            p_uint: Some(21),
            p_uint8: Some(22),
            p_uint16: Some(23),
            p_uint32: Some(24),
            p_uint64: Some(25),
            p_uintptr: Some(26),
            p_float32: Some(33.3),
            p_float64: Some(4.44),
            p_text: Some("test".into()),
            p_bytes: Some(b"TEST".to_vec()),
        }
    }
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Wrapped {
    #[tag(fixed = "10,_,l")]
    pub text: Option<String>,
}

#[derive(tagwire_derive::Reflect, Debug, Default, Clone, PartialEq)]
#[tagwire(internal)]
pub struct Sub {
    #[tag(fixed = "10,?,l")]
    pub text: String,
    #[tag(fixed = "10,-,r")]
    pub ptr_text: Option<String>,
    #[tag(fixed = "-")]
    pub ha: String,
}

impl Sub {
    pub fn sample() -> Self {
        Self {
            text: "Sub test".into(),
            ptr_text: Some("test".into()),
            ha: String::new(),
        }
    }
}

#[derive(tagwire_derive::Reflect, Debug, Default)]
#[tagwire(internal)]
pub struct HasDynamic {
    pub inner: Dynamic,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct SubFields {
    pub sub: Sub,
    pub p_sub: Option<Box<Sub>>,
}

impl SubFields {
    pub fn sample() -> Self {
        Self {
            sub: Sub::sample(),
            p_sub: Some(Box::new(Sub::sample())),
        }
    }
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Nested {
    #[tagwire(flatten)]
    pub sub: Sub,
    #[tag(fixed = "4,0,r")]
    pub i: i64,
}

impl Nested {
    pub fn sample() -> Self {
        Self {
            sub: Sub::sample(),
            i: 7,
        }
    }
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct NestedPtr {
    #[tagwire(flatten)]
    pub sub: Option<Box<Sub>>,
    #[tag(fixed = "4,0,r")]
    pub i: i64,
}

impl NestedPtr {
    pub fn sample() -> Self {
        Self {
            sub: Some(Box::new(Sub::sample())),
            i: 7,
        }
    }
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Sandwich {
    #[tag(fixed = "2,0,r")]
    pub head: u8,
    #[tagwire(flatten)]
    pub sub: Sub,
    #[tag(fixed = "2,0,r")]
    pub tail: u8,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Sparse {
    #[tag(fixed = "0, ,r,omitempty")]
    pub a: i64,
    #[tag(fixed = "0, ,r,omitempty")]
    pub b: String,
    #[tag(fixed = "0, ,r,omitempty")]
    pub c: Option<i64>,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Unsupported {
    pub list: Vec<i32>,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct BadTag {
    #[tag(fixed = "4,0,r")]
    pub ok: i64,
    #[tag(fixed = "x,0,r")]
    pub bad: i64,
    #[tag(fixed = "4,0,r")]
    pub after: i64,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Ouroboros {
    #[tagwire(flatten)]
    pub inner: Option<Box<Ouroboros>>,
    #[tag(fixed = "4,0,r")]
    pub n: i64,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Untagged {
    pub a: String,
    pub b: i64,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Empty {}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct EmbedsNothing {
    #[tagwire(flatten)]
    pub nothing: Empty,
    #[tag(fixed = "4,0,r")]
    pub n: u8,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct MaybeSub {
    pub sub: Option<Box<Sub>>,
}

#[derive(tagwire_derive::Reflect, Debug, Default, PartialEq)]
#[tagwire(internal)]
pub struct Flags {
    #[tag(fixed = "5, ,l")]
    pub flag: bool,
}

/// Every field fits its width and survives the filler trim, so any value
/// round-trips. `tail` goes last because trailing whitespace of the input is
/// trimmed.
#[derive(tagwire_derive::Reflect, Arbitrary, Debug, Default, Clone, PartialEq)]
#[tagwire(internal)]
pub struct Roundtrip {
    #[tag(fixed = "5, ,l")]
    pub flag: bool,
    #[tag(fixed = "20,0,r")]
    pub count: u64,
    #[tag(fixed = "6, ,r")]
    pub small: i16,
    #[tag(fixed = "12,_,l")]
    #[proptest(regex = "[a-z0-9 ]{0,12}")]
    pub name: String,
    #[tag(fixed = "12, ,r")]
    #[proptest(
        strategy = "proptest::strategy::Strategy::prop_map(-1_000_000i32..1_000_000, |v| f64::from(v) / 100.0)"
    )]
    pub ratio: f64,
    #[tag(fixed = "8,~,l")]
    #[proptest(strategy = "proptest::collection::vec(b'a'..=b'z', 0..8)")]
    pub raw: Vec<u8>,
    #[tag(fixed = "10,0,r")]
    #[proptest(strategy = "proptest::option::of(1u32..)")]
    pub maybe: Option<u32>,
    #[tag(fixed = "5,0,r")]
    pub tail: u16,
}
