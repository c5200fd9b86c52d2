//! Bit-granular buffers.
//!
//! Encoded fields are not byte aligned: a 7-bit character follows a 3-bit length prefix with no
//! padding in between. [BitWriter] appends bits MSB-first into a growable buffer, [Bits] is the
//! frozen, exactly-sized result, and [BitReader] consumes bits sequentially from a byte slice.
//!
//! The final partial byte of a buffer is always zero-padded.

use crate::Error;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// Largest number of bits that can be moved in a single read or write.
pub const MAX_BITS: usize = u128::BITS as usize;

/// Append-only bit buffer.
#[derive(Clone, Debug, Default)]
pub struct BitWriter {
    buf: BytesMut,
    len: usize,
}

impl BitWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for at least `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Appends the low `count` bits of `value`, most significant bit first.
    ///
    /// Panics if `count` exceeds [MAX_BITS].
    pub fn write_bits(&mut self, value: u128, count: usize) {
        assert!(count <= MAX_BITS, "cannot write {count} bits at once");
        let mut remaining = count;
        while remaining > 0 {
            let offset = self.len % 8;
            if offset == 0 {
                self.buf.put_u8(0);
            }
            let take = remaining.min(8 - offset);
            let shift = remaining - take;
            let chunk = ((value >> shift) as u8) & low_mask(take);
            let last = self.buf.len() - 1;
            self.buf[last] |= chunk << (8 - offset - take);
            self.len += take;
            remaining -= take;
        }
    }

    /// Appends a single bit.
    pub fn write_bool(&mut self, value: bool) {
        self.write_bits(value as u128, 1);
    }

    /// Appends every bit of `other`.
    pub fn extend(&mut self, other: &BitWriter) {
        if self.len.is_multiple_of(8) {
            self.buf.extend_from_slice(&other.buf);
            self.len += other.len;
            return;
        }
        let full = other.len / 8;
        for &byte in &other.buf[..full] {
            self.write_bits(byte as u128, 8);
        }
        let tail = other.len % 8;
        if tail > 0 {
            self.write_bits((other.buf[full] >> (8 - tail)) as u128, tail);
        }
    }

    /// Number of bits written.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Freezes the writer into an immutable bit sequence.
    pub fn finish(self) -> Bits {
        Bits {
            bytes: self.buf.freeze(),
            len: self.len,
        }
    }
}

/// An immutable sequence of bits with an exact length.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Bits {
    bytes: Bytes,
    len: usize,
}

impl Bits {
    /// Number of bits in the sequence.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the sequence holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The underlying bytes, with the final partial byte zero-padded.
    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns a reader positioned at the first bit.
    pub fn reader(&self) -> BitReader<'_> {
        BitReader::with_len(&self.bytes, self.len)
    }

    /// Renders the sequence as a string of `0` and `1` characters.
    pub fn to_bit_string(&self) -> String {
        (0..self.len)
            .map(|i| {
                if self.bytes[i / 8] & (0x80 >> (i % 8)) != 0 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits({}: {})", self.len, self.to_bit_string())
    }
}

/// Sequential reader over a bit sequence.
///
/// Decoding several fields of one message shares a single reader: each read advances the
/// position past the bits it consumed.
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    len: usize,
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_len(data, data.len() * 8)
    }

    /// Creates a reader over the first `len` bits of `data`.
    ///
    /// `len` is capped at the number of bits in `data`.
    pub fn with_len(data: &'a [u8], len: usize) -> Self {
        Self {
            data,
            len: len.min(data.len() * 8),
            position: 0,
        }
    }

    /// Number of bits consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bits left to read.
    pub fn remaining(&self) -> usize {
        self.len - self.position
    }

    /// Reads `count` bits, most significant bit first.
    ///
    /// The position is left untouched if fewer than `count` bits remain.
    ///
    /// Panics if `count` exceeds [MAX_BITS].
    pub fn read_bits(&mut self, count: usize) -> Result<u128, Error> {
        assert!(count <= MAX_BITS, "cannot read {count} bits at once");
        let remaining = self.remaining();
        if count > remaining {
            return Err(Error::Underrun {
                requested: count,
                remaining,
            });
        }

        let mut value = 0u128;
        let mut left = count;
        while left > 0 {
            let offset = self.position % 8;
            let take = left.min(8 - offset);
            let byte = self.data[self.position / 8];
            let chunk = (byte >> (8 - offset - take)) & low_mask(take);
            value = (value << take) | chunk as u128;
            self.position += take;
            left -= take;
        }
        Ok(value)
    }

    /// Reads a single bit.
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Runs `read` against this reader, moving the position back to where it started if `read`
    /// fails.
    pub fn rewind_on_error<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let start = self.position;
        let result = read(self);
        if result.is_err() {
            self.position = start;
        }
        result
    }
}

#[inline]
fn low_mask(bits: usize) -> u8 {
    ((1u16 << bits) - 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_msb_first() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3);
        writer.write_bits(0b11, 2);
        assert_eq!(writer.len(), 5);

        let bits = writer.finish();
        assert_eq!(bits.as_bytes().as_ref(), &[0b1011_1000]);
        assert_eq!(bits.to_bit_string(), "10111");
    }

    #[test]
    fn test_write_across_bytes() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1, 1);
        writer.write_bits(0xABCD, 16);
        let bits = writer.finish();
        assert_eq!(bits.len(), 17);
        assert_eq!(bits.as_bytes().as_ref(), &[0xD5, 0xE6, 0x80]);

        let mut reader = bits.reader();
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(16).unwrap(), 0xABCD);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_ignores_high_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFF, 4);
        assert_eq!(writer.finish().to_bit_string(), "1111");
    }

    #[test]
    fn test_wide_values() {
        let mut writer = BitWriter::new();
        writer.write_bool(true);
        writer.write_bits(u128::MAX, 128);
        writer.write_bits(u64::MAX as u128, 64);
        let bits = writer.finish();
        assert_eq!(bits.len(), 193);

        let mut reader = bits.reader();
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_bits(128).unwrap(), u128::MAX);
        assert_eq!(reader.read_bits(64).unwrap(), u64::MAX as u128);
    }

    #[test]
    fn test_extend_unaligned() {
        let mut head = BitWriter::new();
        head.write_bits(0b110, 3);

        let mut tail = BitWriter::new();
        tail.write_bits(0x5A, 8);
        tail.write_bits(0b01, 2);

        head.extend(&tail);
        assert_eq!(head.len(), 13);
        assert_eq!(head.finish().to_bit_string(), "1100101101001");
    }

    #[test]
    fn test_extend_aligned() {
        let mut head = BitWriter::new();
        head.write_bits(0xFF, 8);

        let mut tail = BitWriter::new();
        tail.write_bits(0b101, 3);

        head.extend(&tail);
        let bits = head.finish();
        assert_eq!(bits.len(), 11);
        assert_eq!(bits.to_bit_string(), "11111111101");
    }

    #[test]
    fn test_underrun() {
        let mut reader = BitReader::with_len(&[0xFF], 5);
        assert_eq!(reader.read_bits(3).unwrap(), 0b111);
        assert!(matches!(
            reader.read_bits(3),
            Err(Error::Underrun {
                requested: 3,
                remaining: 2
            })
        ));

        // A failed read leaves the cursor in place.
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.read_bits(2).unwrap(), 0b11);
    }

    #[test]
    fn test_rewind_on_error() {
        let mut reader = BitReader::new(&[0xA5]);
        let result = reader.rewind_on_error(|reader| {
            reader.read_bits(4)?;
            reader.read_bits(8)
        });
        assert!(matches!(result, Err(Error::Underrun { .. })));
        assert_eq!(reader.position(), 0);

        let value = reader.rewind_on_error(|reader| reader.read_bits(4));
        assert_eq!(value.unwrap(), 0xA);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_len_capped_to_data() {
        let reader = BitReader::with_len(&[0x00], 100);
        assert_eq!(reader.remaining(), 8);
    }

    #[test]
    fn test_zero_width() {
        let mut writer = BitWriter::new();
        writer.write_bits(42, 0);
        assert!(writer.is_empty());

        let mut reader = BitReader::new(&[]);
        assert_eq!(reader.read_bits(0).unwrap(), 0);
    }

    #[test]
    #[should_panic(expected = "cannot write 129 bits at once")]
    fn test_write_too_wide() {
        BitWriter::new().write_bits(0, 129);
    }
}
