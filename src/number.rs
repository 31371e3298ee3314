use std::str::{from_utf8, FromStr, Utf8Error};

use btoi::ParseIntegerError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// An error that can happen when reading the current value's byte slice as
/// UTF-8. Since the reader has already validated ASCII control bytes and
/// `\uXXXX` escapes while tokenizing, this can only fail on multi-byte
/// sequences the reader does not otherwise validate.
#[derive(Error, Debug)]
#[error("invalid UTF-8 in value: {0}")]
pub struct InvalidStringValueError(#[from] Utf8Error);

/// An error that can happen when converting the current value to an
/// integer.
#[derive(Error, Debug)]
#[error("invalid integer value: {0}")]
pub struct InvalidIntValueError(#[from] ParseIntegerError);

/// An error that can happen when converting the current value to a
/// floating-point number.
#[derive(Error, Debug)]
pub enum InvalidFloatValueError {
    #[error("unable to read value as a string: {0}")]
    String(#[from] InvalidStringValueError),

    #[error("unable to parse value as a float: {0}")]
    Float(#[from] std::num::ParseFloatError),
}

/// An error that can happen when converting the current value to a
/// [`Decimal`].
#[derive(Error, Debug)]
pub enum InvalidDecimalValueError {
    #[error("unable to read value as a string: {0}")]
    String(#[from] InvalidStringValueError),

    #[error("unable to parse value as a decimal: {0}")]
    Decimal(#[from] rust_decimal::Error),
}

/// The result of [`Reader::as_number()`](crate::Reader::as_number()): the
/// narrowest type that represents the current JSON number losslessly.
///
/// Callers who need a stable, predictable numeric type across different
/// input documents should prefer one of the dedicated accessors
/// ([`Reader::as_i64()`](crate::Reader::as_i64()),
/// [`Reader::as_f64()`](crate::Reader::as_f64()),
/// [`Reader::as_decimal()`](crate::Reader::as_decimal())) instead — the
/// type this enum picks depends on the exact digits of the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JsonNumber {
    I32(i32),
    I64(i64),
    Decimal(Decimal),
    F64(f64),
    F32(f32),
}

pub(crate) fn str_from_slice(slice: &[u8]) -> Result<&str, InvalidStringValueError> {
    Ok(from_utf8(slice)?)
}

pub(crate) fn i32_from_slice(slice: &[u8]) -> Result<i32, InvalidIntValueError> {
    Ok(btoi::btoi(slice)?)
}

pub(crate) fn i64_from_slice(slice: &[u8]) -> Result<i64, InvalidIntValueError> {
    Ok(btoi::btoi(slice)?)
}

pub(crate) fn f32_from_slice(slice: &[u8]) -> Result<f32, InvalidFloatValueError> {
    // `f32::from_str` and `f64::from_str` both accept RFC-8259-compatible
    // scientific notation (`1e3`, `1E-3`) as well as plain decimals in a
    // single pass, so there is no need to branch on whether the slice
    // contains `e`/`E` the way the decimal accessor below does.
    Ok(str_from_slice(slice)?.parse()?)
}

pub(crate) fn f64_from_slice(slice: &[u8]) -> Result<f64, InvalidFloatValueError> {
    Ok(str_from_slice(slice)?.parse()?)
}

pub(crate) fn decimal_from_slice(slice: &[u8]) -> Result<Decimal, InvalidDecimalValueError> {
    let s = str_from_slice(slice)?;
    if s.contains('e') || s.contains('E') {
        Ok(Decimal::from_scientific(s)?)
    } else {
        Ok(Decimal::from_str(s)?)
    }
}

/// Try to collapse a floating value into the narrowest integer type that
/// represents it exactly, per §4.8/§9: "a floating parse yields a value
/// whose floor equals itself and fits in i32/i64".
fn narrow_to_integer(value: f64) -> Option<JsonNumber> {
    if !value.is_finite() || value.floor() != value {
        return None;
    }
    if (i32::MIN as f64..=i32::MAX as f64).contains(&value) {
        return Some(JsonNumber::I32(value as i32));
    }
    if (i64::MIN as f64..=i64::MAX as f64).contains(&value) {
        return Some(JsonNumber::I64(value as i64));
    }
    None
}

pub(crate) fn number_from_slice(slice: &[u8]) -> Result<JsonNumber, InvalidFloatValueError> {
    let has_fraction_or_exponent = slice.iter().any(|&b| matches!(b, b'.' | b'e' | b'E'));

    if !has_fraction_or_exponent {
        if let Ok(i) = btoi::btoi::<i32>(slice) {
            return Ok(JsonNumber::I32(i));
        }
        if let Ok(i) = btoi::btoi::<i64>(slice) {
            return Ok(JsonNumber::I64(i));
        }
    }

    let s = str_from_slice(slice)?;

    if let Ok(d) = if s.contains('e') || s.contains('E') {
        Decimal::from_scientific(s)
    } else {
        Decimal::from_str(s)
    } {
        if let Some(n) = d.to_f64().and_then(narrow_to_integer) {
            return Ok(n);
        }
        return Ok(JsonNumber::Decimal(d));
    }

    if let Ok(f) = s.parse::<f64>() {
        if let Some(n) = narrow_to_integer(f) {
            return Ok(n);
        }
        return Ok(JsonNumber::F64(f));
    }

    let f: f32 = s.parse()?;
    if let Some(n) = narrow_to_integer(f as f64) {
        return Ok(n);
    }
    Ok(JsonNumber::F32(f))
}
