//! Dynamically typed field values.
//!
//! Codecs resolved by name from a [crate::Registry] do not have a static value type, so they
//! exchange [Value]s instead. Typed codecs convert through [FieldValue].

use crate::Error;
use bytes::Bytes;

/// A value carried by a dynamically selected codec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i128),
    Bytes(Bytes),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }
}

/// Conversion between a typed codec's value and [Value].
pub trait FieldValue: Sized {
    /// Name of the matching [Value] variant.
    const KIND: &'static str;

    /// Extracts a typed value, failing with [Error::TypeMismatch] on the wrong variant.
    fn from_value(value: &Value) -> Result<Self, Error>;

    /// Wraps a typed value.
    fn into_value(self) -> Value;
}

macro_rules! impl_field_value {
    ($type:ty, $variant:ident, $kind:literal) => {
        impl FieldValue for $type {
            const KIND: &'static str = $kind;

            fn from_value(value: &Value) -> Result<Self, Error> {
                match value {
                    Value::$variant(inner) => Ok(inner.clone()),
                    other => Err(Error::TypeMismatch {
                        expected: Self::KIND,
                        found: other.kind(),
                    }),
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                value.into_value()
            }
        }
    };
}

impl_field_value!(bool, Bool, "bool");
impl_field_value!(i128, Int, "int");
impl_field_value!(Bytes, Bytes, "bytes");
impl_field_value!(String, String, "string");
impl_field_value!(Vec<Value>, Array, "array");

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(i128::from_value(&Value::Int(-5)).unwrap(), -5);
        assert_eq!(Value::from("bot"), Value::String("bot".into()));
        assert_eq!(
            Value::from(vec![Value::Int(1)]),
            Value::Array(vec![Value::Int(1)])
        );
    }

    #[test]
    fn test_mismatch() {
        let err = String::from_value(&Value::Int(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "string",
                found: "int"
            }
        ));
    }
}
