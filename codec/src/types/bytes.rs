//! Codec for length-prefixed byte payloads.
//!
//! The payload is preceded by its length, encoded by a [VarintCodec] over `[0, max_length]`.
//! Payloads longer than `max_length` keep their first `max_length` bytes.

use crate::{
    bits::{BitReader, BitWriter},
    types::length_codec,
    BitSize, BytesCfg, Codec, Error, VarintCodec,
};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

/// Encodes a bounded-length byte string, eight bits per byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BytesCodec {
    max_length: usize,
    length: VarintCodec,
}

impl BytesCodec {
    /// Creates a codec for payloads of at most `cfg.max_length` bytes.
    pub fn new(cfg: BytesCfg) -> Result<Self, Error> {
        Ok(Self {
            max_length: cfg.max_length,
            length: length_codec("bytes", cfg.max_length)?,
        })
    }

    /// Longest payload in bytes.
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl BitSize for BytesCodec {
    fn min_length_bits(&self) -> usize {
        self.length.num_bits()
    }

    fn max_length_bits(&self) -> usize {
        self.length.num_bits() + 8 * self.max_length
    }
}

impl Codec for BytesCodec {
    type Value = Bytes;

    fn encode_into(&self, value: &Bytes, buf: &mut BitWriter) -> Bytes {
        let value = if value.len() > self.max_length {
            trace!(
                len = value.len(),
                max = self.max_length,
                "truncated byte payload"
            );
            value.slice(..self.max_length)
        } else {
            value.clone()
        };
        self.length.encode_into(&(value.len() as i128), buf);
        for &byte in value.iter() {
            buf.write_bits(byte as u128, 8);
        }
        value
    }

    fn decode(&self, buf: &mut BitReader<'_>) -> Result<Bytes, Error> {
        buf.rewind_on_error(|buf| {
            let len = self.length.decode(buf)? as usize;
            if buf.remaining() < 8 * len {
                return Err(Error::Underrun {
                    requested: 8 * len,
                    remaining: buf.remaining(),
                });
            }
            let mut out = BytesMut::with_capacity(len);
            for _ in 0..len {
                out.put_u8(buf.read_bits(8)? as u8);
            }
            Ok(out.freeze())
        })
    }
}
