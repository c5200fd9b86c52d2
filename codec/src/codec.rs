//! Core codec traits

use crate::{
    bits::{BitReader, BitWriter, Bits},
    value::{FieldValue, Value},
    Error,
};
use std::fmt::Debug;

/// Bounds on the number of bits a codec emits.
///
/// Both bounds are fixed at construction and are additive across the fields of a message, so a
/// caller can sum them to check a message against a transport's payload limit.
pub trait BitSize {
    /// Smallest number of bits any encoding occupies.
    fn min_length_bits(&self) -> usize;

    /// Largest number of bits any encoding occupies.
    fn max_length_bits(&self) -> usize;
}

/// A codec with a statically known value type.
///
/// Encoding never fails: out-of-range integers saturate, oversized payloads are truncated and
/// unrepresentable characters are substituted. The value actually encoded is returned so the
/// caller can observe the loss.
pub trait Codec: BitSize {
    /// The type of value this codec encodes.
    type Value;

    /// Appends the encoding of `value` to `buf`, returning the value as it will decode.
    fn encode_into(&self, value: &Self::Value, buf: &mut BitWriter) -> Self::Value;

    /// Reads a value from `buf`, consuming exactly the bits it was encoded with.
    ///
    /// On failure the position of `buf` is unchanged.
    fn decode(&self, buf: &mut BitReader<'_>) -> Result<Self::Value, Error>;

    /// Encodes `value` into a fresh bit sequence.
    ///
    /// (Provided method).
    fn encode(&self, value: &Self::Value) -> (Bits, Self::Value) {
        let mut buf = BitWriter::with_capacity(self.max_length_bits());
        let encoded = self.encode_into(value, &mut buf);
        (buf.finish(), encoded)
    }
}

/// An object-safe codec over [Value]s.
///
/// This is what the [crate::Registry] produces and what arrays and messages own. Every [Codec]
/// whose value converts to and from [Value] implements it automatically.
pub trait DynCodec: BitSize + Debug + Send + Sync {
    /// Appends the encoding of `value` to `buf`, returning the value as it will decode.
    fn encode_value_into(&self, value: &Value, buf: &mut BitWriter) -> Result<Value, Error>;

    /// Reads a value from `buf`. On failure the position of `buf` is unchanged.
    fn decode_value(&self, buf: &mut BitReader<'_>) -> Result<Value, Error>;

    /// Encodes `value` into a fresh bit sequence.
    ///
    /// (Provided method).
    fn encode_value(&self, value: &Value) -> Result<(Bits, Value), Error> {
        let mut buf = BitWriter::with_capacity(self.max_length_bits());
        let encoded = self.encode_value_into(value, &mut buf)?;
        Ok((buf.finish(), encoded))
    }
}

impl<C> DynCodec for C
where
    C: Codec + Debug + Send + Sync,
    C::Value: FieldValue,
{
    fn encode_value_into(&self, value: &Value, buf: &mut BitWriter) -> Result<Value, Error> {
        let value = C::Value::from_value(value)?;
        Ok(self.encode_into(&value, buf).into_value())
    }

    fn decode_value(&self, buf: &mut BitReader<'_>) -> Result<Value, Error> {
        self.decode(buf).map(FieldValue::into_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoolCodec, VarintCfg, VarintCodec};

    #[test]
    fn test_dyn_matches_typed() {
        let codec = VarintCodec::new(VarintCfg::new(-10, 10)).unwrap();
        let (typed, _) = codec.encode(&7);
        let (dynamic, encoded) = codec.encode_value(&Value::Int(7)).unwrap();
        assert_eq!(typed, dynamic);
        assert_eq!(encoded, Value::Int(7));
        assert_eq!(
            codec.decode_value(&mut dynamic.reader()).unwrap(),
            Value::Int(7)
        );
    }

    #[test]
    fn test_dyn_type_mismatch() {
        let codec: Box<dyn DynCodec> = Box::new(BoolCodec::new());
        let mut buf = BitWriter::new();
        assert!(matches!(
            codec.encode_value_into(&Value::Int(1), &mut buf),
            Err(Error::TypeMismatch {
                expected: "bool",
                found: "int"
            })
        ));
        assert!(buf.is_empty());
    }
}
