//! Bounded integer encoding and decoding
//!
//! A [VarintCodec] covers the closed range `[min_value, max_value]` quantized to multiples of
//! `resolution` above `min_value`. Each value is sent as its step index in the fewest bits that
//! can hold every step:
//!
//! ```text
//! steps    = (max_value - min_value) / resolution + 1
//! num_bits = ceil(log2(steps))
//! ```
//!
//! The width is fixed at construction, so every encoding has the same length.
//!
//! # Saturation
//!
//! Out-of-range input is clamped to the nearest bound rather than rejected, and in-range input is
//! floored onto the quantization grid. Encoding returns the value that will actually decode.

use crate::{
    bits::{BitReader, BitWriter},
    BitSize, Codec, Error, VarintCfg,
};
use tracing::trace;

/// Number of bits needed to distinguish `steps` values.
pub(crate) fn bits_for(steps: u128) -> usize {
    if steps <= 1 {
        return 0;
    }
    (u128::BITS - (steps - 1).leading_zeros()) as usize
}

/// Encodes integers from a closed, quantized range in a fixed number of bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarintCodec {
    min_value: i128,
    max_value: i128,
    resolution: i128,
    little_endian: bool,
    max_offset: u128,
    num_bits: usize,
}

impl VarintCodec {
    /// Creates a codec for the configured range.
    ///
    /// Fails if `resolution < 1`, if `max_value <= min_value`, if the range does not fit in an
    /// `i128`, or if `little_endian` is set on a width that is not a whole number of bytes.
    pub fn new(cfg: VarintCfg) -> Result<Self, Error> {
        let VarintCfg {
            min_value,
            max_value,
            resolution,
            little_endian,
        } = cfg;
        if resolution < 1 {
            return Err(Error::InvalidResolution(resolution));
        }
        let invalid = Error::InvalidRange {
            min: min_value,
            max: max_value,
        };
        if max_value <= min_value {
            return Err(invalid);
        }
        let span = max_value.checked_sub(min_value).ok_or(invalid)?;

        // The span is positive, so the step index fits in a u128 with room to spare.
        let max_offset = (span / resolution) as u128;
        let num_bits = bits_for(max_offset + 1);
        if little_endian && !num_bits.is_multiple_of(8) {
            return Err(Error::config(
                "varint",
                format!("little-endian requires whole bytes, got {num_bits} bits"),
            ));
        }

        Ok(Self {
            min_value,
            max_value,
            resolution,
            little_endian,
            max_offset,
            num_bits,
        })
    }

    /// Width of every encoding.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Smallest encodable value.
    pub fn min_value(&self) -> i128 {
        self.min_value
    }

    /// Largest encodable value.
    pub fn max_value(&self) -> i128 {
        self.max_value
    }

    /// Quantization step.
    pub fn resolution(&self) -> i128 {
        self.resolution
    }

    /// Whether whole bytes are emitted least significant first.
    pub fn little_endian(&self) -> bool {
        self.little_endian
    }

    /// Maps `value` to its step index, saturating at the bounds.
    fn quantize(&self, value: i128) -> u128 {
        let clamped = value.clamp(self.min_value, self.max_value);
        if clamped != value {
            trace!(
                %value,
                %clamped,
                min = %self.min_value,
                max = %self.max_value,
                "saturated out-of-range value"
            );
        }
        // Non-negative after clamping.
        let offset = (clamped - self.min_value) as u128;
        offset / self.resolution as u128
    }

    /// The value a step index decodes to.
    fn dequantize(&self, index: u128) -> i128 {
        // `index <= max_offset`, so the product never passes `max_value`.
        self.min_value + index as i128 * self.resolution
    }
}

impl BitSize for VarintCodec {
    fn min_length_bits(&self) -> usize {
        self.num_bits
    }

    fn max_length_bits(&self) -> usize {
        self.num_bits
    }
}

impl Codec for VarintCodec {
    type Value = i128;

    fn encode_into(&self, value: &i128, buf: &mut BitWriter) -> i128 {
        let index = self.quantize(*value);
        if self.little_endian {
            for byte in 0..self.num_bits / 8 {
                buf.write_bits((index >> (8 * byte)) & 0xFF, 8);
            }
        } else {
            buf.write_bits(index, self.num_bits);
        }
        self.dequantize(index)
    }

    fn decode(&self, buf: &mut BitReader<'_>) -> Result<i128, Error> {
        if buf.remaining() < self.num_bits {
            return Err(Error::Underrun {
                requested: self.num_bits,
                remaining: buf.remaining(),
            });
        }
        let index = if self.little_endian {
            let mut index = 0u128;
            for byte in 0..self.num_bits / 8 {
                index |= buf.read_bits(8)? << (8 * byte);
            }
            index
        } else {
            buf.read_bits(self.num_bits)?
        };

        // The width may hold more patterns than there are steps.
        Ok(self.dequantize(index.min(self.max_offset)))
    }
}
