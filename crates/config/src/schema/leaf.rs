//! Scalar field types the binder can assign and the sanitizer can read.
//!
//! Responsibilities:
//! - Implement [`Leaf`] and [`LeafType`] for strings, secrets, booleans,
//!   every primitive integer width and both float widths.
//! - Give `Option<L>` nullable semantics.
//!
//! Invariants:
//! - A failed assignment leaves the field unchanged.
//! - `Nil` assigned to an `Option` that is `None` is a no-op; any other `Nil`
//!   assignment is a type mismatch.
//! - `SecretString` never reports its contents: its value is the mask token.

use secrecy::SecretString;

use super::LeafKind;
use super::coerce::{self, CoerceError};
use crate::constants::MASK;
use crate::tree::Value;

/// A field that holds one scalar value.
///
/// Object safe, so the binder can work through `&mut dyn Leaf`.
pub trait Leaf {
    /// Coerce `value` and store it in the field.
    fn assign(&mut self, value: &Value) -> Result<(), CoerceError>;

    /// The field's current value, as it should appear in redacted output.
    fn to_value(&self) -> Value;

    /// True when the type itself holds secret material.
    fn is_sensitive(&self) -> bool {
        false
    }
}

/// Static information about a scalar field type.
pub trait LeafType: Leaf + Sized {
    const KIND: LeafKind;
    const NULLABLE: bool = false;
    const SENSITIVE: bool = false;

    /// Build a value of this type from a tree value.
    fn from_value(value: &Value) -> Result<Self, CoerceError>;
}

macro_rules! scalar_leaf {
    ($ty:ty, $to_value:expr) => {
        impl Leaf for $ty {
            fn assign(&mut self, value: &Value) -> Result<(), CoerceError> {
                *self = <$ty as LeafType>::from_value(value)?;
                Ok(())
            }

            fn to_value(&self) -> Value {
                let render: fn(&$ty) -> Value = $to_value;
                render(self)
            }

            fn is_sensitive(&self) -> bool {
                <$ty as LeafType>::SENSITIVE
            }
        }
    };
}

macro_rules! integer_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl LeafType for $ty {
                const KIND: LeafKind = LeafKind::Integer;

                fn from_value(value: &Value) -> Result<Self, CoerceError> {
                    coerce::to_integer::<$ty>(value, stringify!($ty))
                }
            }

            // Widths beyond i64 render as decimal text rather than lose digits.
            scalar_leaf!($ty, |n| {
                i64::try_from(*n).map_or_else(|_| Value::String(n.to_string()), Value::Integer)
            });
        )*
    };
}

integer_leaf!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl LeafType for f64 {
    const KIND: LeafKind = LeafKind::Float;

    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        coerce::to_float(value, false, "f64")
    }
}

scalar_leaf!(f64, |x| Value::Float(*x));

impl LeafType for f32 {
    const KIND: LeafKind = LeafKind::Float;

    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        coerce::to_float(value, true, "f32").map(|wide| wide as f32)
    }
}

scalar_leaf!(f32, |x| Value::Float(f64::from(*x)));

impl LeafType for bool {
    const KIND: LeafKind = LeafKind::Bool;

    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        coerce::to_bool(value)
    }
}

scalar_leaf!(bool, |b| Value::Bool(*b));

impl LeafType for String {
    const KIND: LeafKind = LeafKind::String;

    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        coerce::to_string(value)
    }
}

scalar_leaf!(String, |s| Value::String(s.clone()));

impl LeafType for SecretString {
    const KIND: LeafKind = LeafKind::String;
    const SENSITIVE: bool = true;

    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        coerce::to_string(value).map(|s| SecretString::new(s.into()))
    }
}

// Masked even when empty, so redacted output does not reveal whether it is set.
scalar_leaf!(SecretString, |_| Value::String(MASK.to_string()));

impl<L: LeafType> Leaf for Option<L> {
    fn assign(&mut self, value: &Value) -> Result<(), CoerceError> {
        if value.is_nil() {
            return match self {
                None => Ok(()),
                Some(_) => Err(CoerceError::mismatch(L::KIND)),
            };
        }
        *self = Some(L::from_value(value)?);
        Ok(())
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Nil,
        }
    }

    fn is_sensitive(&self) -> bool {
        L::SENSITIVE
    }
}

impl<L: LeafType> LeafType for Option<L> {
    const KIND: LeafKind = L::KIND;
    const NULLABLE: bool = true;
    const SENSITIVE: bool = L::SENSITIVE;

    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::Nil => Ok(None),
            value => L::from_value(value).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_failed_assignment_leaves_field_unchanged() {
        let mut port: u16 = 8080;
        assert!(port.assign(&Value::from("99999")).is_err());
        assert!(port.assign(&Value::from("abc")).is_err());
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_nil_is_a_type_mismatch_for_plain_scalars() {
        let mut host = String::from("localhost");
        assert_eq!(
            host.assign(&Value::Nil),
            Err(CoerceError::Mismatch { expected: "string" })
        );
        assert_eq!(host, "localhost");
    }

    #[test]
    fn test_option_nil_semantics() {
        let mut unset: Option<i64> = None;
        assert_eq!(unset.assign(&Value::Nil), Ok(()));
        assert_eq!(unset, None);

        let mut set: Option<i64> = Some(3);
        assert_eq!(
            set.assign(&Value::Nil),
            Err(CoerceError::Mismatch {
                expected: "integer"
            })
        );
        assert_eq!(set, Some(3));
    }

    #[test]
    fn test_option_assigns_inner_value() {
        let mut timeout: Option<u32> = None;
        timeout.assign(&Value::Float(30.0)).unwrap();
        assert_eq!(timeout, Some(30));
        assert_eq!(timeout.to_value(), Value::Integer(30));
        assert_eq!(None::<u32>.to_value(), Value::Nil);
    }

    #[test]
    fn test_large_unsigned_renders_as_text() {
        assert_eq!(u64::MAX.to_value(), Value::String(u64::MAX.to_string()));
        assert_eq!(7u64.to_value(), Value::Integer(7));
    }

    #[test]
    fn test_secret_string_is_always_masked() {
        let mut secret = SecretString::new("".into());
        assert!(secret.is_sensitive());
        assert_eq!(secret.to_value(), Value::String(MASK.to_string()));

        secret.assign(&Value::from("hunter2")).unwrap();
        assert_eq!(secret.expose_secret(), "hunter2");
        assert_eq!(secret.to_value(), Value::String(MASK.to_string()));
    }

    #[test]
    fn test_static_kinds() {
        assert_eq!(<u16 as LeafType>::KIND, LeafKind::Integer);
        assert_eq!(<Option<f32> as LeafType>::KIND, LeafKind::Float);
        assert!(<Option<f32> as LeafType>::NULLABLE);
        assert!(!<bool as LeafType>::NULLABLE);
        assert!(<SecretString as LeafType>::SENSITIVE);
    }
}
