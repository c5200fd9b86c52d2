//! Codec for length-prefixed homogeneous arrays.
//!
//! The element count is encoded by a [VarintCodec] over `[0, max_length]`, followed by each
//! element in order. Every element is handled by the same element codec, resolved once by name
//! from a [Registry]. Arrays longer than `max_length` keep their first `max_length` elements.

use crate::{
    bits::{BitReader, BitWriter, Bits},
    types::length_codec,
    ArrayCfg, BitSize, Codec, DynCodec, Error, Registry, Value, VarintCodec,
};
use tracing::trace;

/// Encodes a bounded-length sequence of values through a nested element codec.
#[derive(Debug)]
pub struct VariableLenArrayCodec {
    max_length: usize,
    length: VarintCodec,
    element: Box<dyn DynCodec>,
    max_length_bits: usize,
}

impl VariableLenArrayCodec {
    /// Resolves `cfg.element_type` in `registry` and builds the array around it.
    ///
    /// Fails with [Error::UnknownCodecType] if the element type is not registered.
    pub fn new(registry: &Registry, cfg: ArrayCfg) -> Result<Self, Error> {
        let element = registry.build(&cfg.element_type, cfg.element_params.as_ref())?;
        Self::with_element(element, cfg.max_length)
    }

    /// Builds an array of at most `max_length` elements around an existing element codec.
    pub fn with_element(element: Box<dyn DynCodec>, max_length: usize) -> Result<Self, Error> {
        let length = length_codec("variable_len_array", max_length)?;
        let max_length_bits = max_length
            .checked_mul(element.max_length_bits())
            .and_then(|payload| payload.checked_add(length.num_bits()))
            .ok_or_else(|| Error::config("variable_len_array", "max_length_bits overflows"))?;
        Ok(Self {
            max_length,
            length,
            element,
            max_length_bits,
        })
    }

    /// Longest array in elements.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// The codec shared by every element.
    pub fn element(&self) -> &dyn DynCodec {
        self.element.as_ref()
    }

    /// Encodes `values` into a fresh bit sequence, returning the elements as they will decode.
    pub fn encode(&self, values: &[Value]) -> Result<(Bits, Vec<Value>), Error> {
        let mut buf = BitWriter::with_capacity(self.max_length_bits);
        let encoded = self.encode_elements(values, &mut buf)?;
        Ok((buf.finish(), encoded))
    }

    /// Reads an array from `buf`.
    pub fn decode(&self, buf: &mut BitReader<'_>) -> Result<Vec<Value>, Error> {
        buf.rewind_on_error(|buf| {
            let len = self.length.decode(buf)? as usize;
            let mut values = Vec::with_capacity(len);
            for _ in 0..len {
                values.push(self.element.decode_value(buf)?);
            }
            Ok(values)
        })
    }

    fn encode_elements(&self, values: &[Value], buf: &mut BitWriter) -> Result<Vec<Value>, Error> {
        if values.len() > self.max_length {
            trace!(len = values.len(), max = self.max_length, "truncated array");
        }
        let values = &values[..values.len().min(self.max_length)];

        // Nothing reaches `buf` unless every element encodes.
        let mut scratch = BitWriter::new();
        self.length.encode_into(&(values.len() as i128), &mut scratch);
        let mut encoded = Vec::with_capacity(values.len());
        for value in values {
            encoded.push(self.element.encode_value_into(value, &mut scratch)?);
        }
        buf.extend(&scratch);
        Ok(encoded)
    }
}

impl BitSize for VariableLenArrayCodec {
    fn min_length_bits(&self) -> usize {
        self.length.num_bits()
    }

    fn max_length_bits(&self) -> usize {
        self.max_length_bits
    }
}

impl DynCodec for VariableLenArrayCodec {
    fn encode_value_into(&self, value: &Value, buf: &mut BitWriter) -> Result<Value, Error> {
        match value {
            Value::Array(values) => self.encode_elements(values, buf).map(Value::Array),
            other => Err(Error::TypeMismatch {
                expected: "array",
                found: other.kind(),
            }),
        }
    }

    fn decode_value(&self, buf: &mut BitReader<'_>) -> Result<Value, Error> {
        self.decode(buf).map(Value::Array)
    }
}
