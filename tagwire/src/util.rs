use {
    crate::{
        error::{invalid_bool, Cause},
        reflect::{Kind, Reflect, ReflectRef},
    },
    core::{
        any::TypeId,
        fmt::{Display, LowerExp, Write as _},
    },
};

/// Forced inline so the compiler can DCE the branch.
#[inline(always)]
pub(crate) fn type_equal<Src: 'static, Target: 'static>() -> bool {
    TypeId::of::<Src>() == TypeId::of::<Target>()
}

/// Parse the boolean spellings `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
pub(crate) fn parse_bool(raw: &str) -> Result<bool, Cause> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(invalid_bool(raw)),
    }
}

/// Strip trailing Unicode whitespace.
pub(crate) fn trim_end_whitespace(data: &[u8]) -> &[u8] {
    let mut end = data.len();
    while end > 0 {
        let last = data[end - 1];
        if last.is_ascii() {
            if !matches!(last, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r') {
                break;
            }
            end -= 1;
            continue;
        }
        // Closest start of a complete trailing code point.
        let Some(start) = (end.saturating_sub(4)..end)
            .rev()
            .find(|&i| core::str::from_utf8(&data[i..end]).is_ok())
        else {
            break;
        };
        let is_space = core::str::from_utf8(&data[start..end])
            .ok()
            .and_then(|s| s.chars().next())
            .is_some_and(char::is_whitespace);
        if !is_space {
            break;
        }
        end = start;
    }
    &data[..end]
}

macro_rules! scalar_is_zero {
    ($value:expr, $kind:expr, { $($variant:ident => $type:ty),* $(,)? }) => {
        match $kind {
            $(Kind::$variant => $value.downcast_ref::<$type>().is_some_and(|v| *v == <$type>::default()),)*
            // Bit comparison, so `-0.0` is not zero.
            Kind::F32 => $value.downcast_ref::<f32>().is_some_and(|v| v.to_bits() == 0),
            Kind::F64 => $value.downcast_ref::<f64>().is_some_and(|v| v.to_bits() == 0),
            Kind::String => $value.downcast_ref::<String>().is_some_and(String::is_empty),
            Kind::Bytes => $value.downcast_ref::<Vec<u8>>().is_some_and(Vec::is_empty),
            _ => false,
        }
    };
}

fn scalar_is_zero(value: &dyn Reflect) -> bool {
    scalar_is_zero!(value, value.shape().kind, {
        Bool => bool,
        I8 => i8,
        I16 => i16,
        I32 => i32,
        I64 => i64,
        I128 => i128,
        Isize => isize,
        U8 => u8,
        U16 => u16,
        U32 => u32,
        U64 => u64,
        U128 => u128,
        Usize => usize,
    })
}

/// Append the shortest text that parses back to `value`.
///
/// Exponents below -4 or from 6 up use exponent form with a signed, two-digit
/// exponent (`1e+06`, `1.5e-07`); everything else is positional.
pub(crate) fn write_float<T: Display + LowerExp>(out: &mut String, value: &T) {
    let start = out.len();
    // Writing to a `String` cannot fail.
    let _ = write!(out, "{value:e}");
    // `inf` and `NaN` carry no exponent.
    let Some(at) = out[start..].find('e').map(|at| start + at) else {
        return;
    };
    let Ok(exp) = out[at + 1..].parse::<i32>() else {
        return;
    };
    if (-4..6).contains(&exp) {
        out.truncate(start);
        let _ = write!(out, "{value}");
    } else {
        out.truncate(at);
        let sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exp.unsigned_abs());
    }
}

/// Whether an omit-empty field holding `value` is skipped.
///
/// Records are never empty; pointers and dynamic values are empty when
/// nothing is held.
pub(crate) fn is_empty_value(value: &dyn Reflect) -> bool {
    match value.reflect_ref() {
        ReflectRef::Scalar => scalar_is_zero(value),
        ReflectRef::Record(_) => false,
        ReflectRef::Optional(ptr) => ptr.get().is_none(),
        ReflectRef::Dynamic(inner) => inner.is_none(),
        ReflectRef::Collection { len } => len == 0,
    }
}

/// Whether `value` equals the zero value of its type, looking through
/// records field by field.
pub(crate) fn is_zero_value(value: &dyn Reflect) -> bool {
    match value.reflect_ref() {
        ReflectRef::Record(record) => (0..)
            .map_while(|index| record.field(index))
            .all(is_zero_value),
        ReflectRef::Optional(ptr) => match ptr.get() {
            None => true,
            Some(inner) => !ptr.nullable() && is_zero_value(inner),
        },
        _ => is_empty_value(value),
    }
}
