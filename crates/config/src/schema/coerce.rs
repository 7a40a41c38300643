//! Conversion of tree values into typed scalars.
//!
//! Every rule is an explicit match over [`Value`], so adding a variant forces
//! every target kind to decide what to do with it.
//!
//! | found   | string | integer                  | float                 | bool        |
//! |---------|--------|--------------------------|-----------------------|-------------|
//! | String  | copy   | base-10 parse, range     | decimal parse, range  | word sets   |
//! | Integer | -      | range check              | widen                 | -           |
//! | Float   | -      | truncate toward zero     | range (f32)           | -           |
//! | Bool    | -      | -                        | -                     | copy        |
//! | Nil     | -      | -                        | -                     | -           |
//!
//! `-` is a type mismatch. Nil is only accepted by `Option` fields that are
//! currently `None` (see `leaf`). Numeric and boolean text is trimmed first.

use std::num::IntErrorKind;

use super::LeafKind;
use crate::constants::{FALSY, TRUTHY};
use crate::tree::Value;

/// Why a value could not be stored in a field.
///
/// The binder adds the field path and the offending value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceError {
    /// No rule converts the value's shape into the target kind.
    Mismatch { expected: &'static str },
    /// The value parsed but does not fit the target type.
    Overflow { target: &'static str },
}

impl CoerceError {
    pub(crate) fn mismatch(kind: LeafKind) -> Self {
        CoerceError::Mismatch {
            expected: kind.name(),
        }
    }
}

/// 2^127 as f64; the first float above `i128::MAX`.
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

pub fn to_string(value: &Value) -> Result<String, CoerceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Nil | Value::Integer(_) | Value::Float(_) | Value::Bool(_) => {
            Err(CoerceError::mismatch(LeafKind::String))
        }
    }
}

pub fn to_bool(value: &Value) -> Result<bool, CoerceError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => parse_bool(s).ok_or(CoerceError::mismatch(LeafKind::Bool)),
        Value::Nil | Value::Integer(_) | Value::Float(_) => {
            Err(CoerceError::mismatch(LeafKind::Bool))
        }
    }
}

/// Match `s` case-insensitively against the truthy and falsy word sets.
pub fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if TRUTHY.iter().any(|word| s.eq_ignore_ascii_case(word)) {
        Some(true)
    } else if FALSY.iter().any(|word| s.eq_ignore_ascii_case(word)) {
        Some(false)
    } else {
        None
    }
}

/// Convert `value` into the integer type `T`, named `target` in errors.
pub fn to_integer<T>(value: &Value, target: &'static str) -> Result<T, CoerceError>
where
    T: TryFrom<i128>,
{
    let overflow = CoerceError::Overflow { target };
    let wide: i128 = match value {
        Value::Integer(i) => i128::from(*i),
        Value::Float(f) => {
            let truncated = f.trunc();
            if !truncated.is_finite() || truncated < -I128_LIMIT || truncated >= I128_LIMIT {
                return Err(overflow);
            }
            truncated as i128
        }
        Value::String(s) => match s.trim().parse::<i128>() {
            Ok(parsed) => parsed,
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                return Err(overflow);
            }
            Err(_) => return Err(CoerceError::mismatch(LeafKind::Integer)),
        },
        Value::Nil | Value::Bool(_) => return Err(CoerceError::mismatch(LeafKind::Integer)),
    };
    T::try_from(wide).map_err(|_| overflow)
}

/// Convert `value` into a float; `narrow` selects the `f32` range check.
pub fn to_float(value: &Value, narrow: bool, target: &'static str) -> Result<f64, CoerceError> {
    let wide = match value {
        Value::Float(f) => *f,
        Value::Integer(i) => return Ok(*i as f64),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CoerceError::mismatch(LeafKind::Float))?,
        Value::Nil | Value::Bool(_) => return Err(CoerceError::mismatch(LeafKind::Float)),
    };
    if narrow && wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
        return Err(CoerceError::Overflow { target });
    }
    Ok(wide)
}
