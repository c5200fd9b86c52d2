//! Codec for length-prefixed text at a configurable width per character.
//!
//! | width | accepted characters     | anything else |
//! |-------|-------------------------|---------------|
//! | 8     | `U+0000..=U+00FF`       | `?`           |
//! | 7     | ASCII (`0x00..=0x7f`)   | `?`           |
//! | 6     | `0x20..=0x5f`           | `?`           |
//!
//! Six-bit mode folds `0x40..=0x5f` (`@`, upper-case letters, `[\]^_`) onto `0x00..=0x1f` and
//! keeps `0x20..=0x3f` (space, digits, punctuation) as-is. Lower-case letters are not in the
//! subset and are substituted.
//!
//! Strings longer than `max_length` characters keep their first `max_length` characters, or
//! their last when `tail` is set.

use crate::{
    bits::{BitReader, BitWriter},
    types::length_codec,
    AsciiStringCfg, BitSize, CharWidth, Codec, Error, VarintCodec,
};
use tracing::trace;

const SUBSTITUTE: u8 = b'?';

/// Maps an ASCII byte into the six-bit subset.
pub fn to_sixbit_ascii(byte: u8) -> u8 {
    match byte {
        0x40..=0x5f => byte - 0x40,
        0x20..=0x3f => byte,
        _ => SUBSTITUTE,
    }
}

/// Maps a six-bit code back to ASCII. Only the low six bits of `code` are considered.
pub fn from_sixbit_ascii(code: u8) -> u8 {
    match code & 0x3f {
        code @ 0x00..=0x1f => code + 0x40,
        code => code,
    }
}

/// Encodes a bounded-length string at a fixed number of bits per character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiStringCodec {
    max_length: usize,
    width: CharWidth,
    tail: bool,
    length: VarintCodec,
}

impl AsciiStringCodec {
    /// Creates a codec for strings of at most `cfg.max_length` characters.
    pub fn new(cfg: AsciiStringCfg) -> Result<Self, Error> {
        Ok(Self {
            max_length: cfg.max_length,
            width: cfg.bits_per_char,
            tail: cfg.tail,
            length: length_codec("ascii_string", cfg.max_length)?,
        })
    }

    /// Longest string in characters.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Bits per character.
    pub fn bits_per_char(&self) -> usize {
        self.width.bits()
    }

    /// The code emitted for `c`.
    fn encode_char(&self, c: char) -> u8 {
        let c = c as u32;
        match self.width {
            CharWidth::Eight if c <= 0xff => c as u8,
            CharWidth::Seven if c <= 0x7f => c as u8,
            CharWidth::Six if c <= 0x7f => to_sixbit_ascii(c as u8),
            CharWidth::Six => to_sixbit_ascii(SUBSTITUTE),
            _ => SUBSTITUTE,
        }
    }

    /// The character `code` decodes to.
    fn decode_char(&self, code: u8) -> char {
        match self.width {
            CharWidth::Six => from_sixbit_ascii(code) as char,
            CharWidth::Seven | CharWidth::Eight => code as char,
        }
    }
}

impl BitSize for AsciiStringCodec {
    fn min_length_bits(&self) -> usize {
        self.length.num_bits()
    }

    fn max_length_bits(&self) -> usize {
        self.length.num_bits() + self.max_length * self.width.bits()
    }
}

impl Codec for AsciiStringCodec {
    type Value = String;

    fn encode_into(&self, value: &String, buf: &mut BitWriter) -> String {
        let count = value.chars().count();
        let skip = if self.tail {
            count.saturating_sub(self.max_length)
        } else {
            0
        };
        if count > self.max_length {
            trace!(
                len = count,
                max = self.max_length,
                tail = self.tail,
                "truncated string"
            );
        }

        let len = count.min(self.max_length);
        self.length.encode_into(&(len as i128), buf);

        let bits = self.width.bits();
        let mut encoded = String::with_capacity(len);
        for c in value.chars().skip(skip).take(len) {
            let code = self.encode_char(c);
            buf.write_bits(code as u128, bits);
            encoded.push(self.decode_char(code));
        }
        if encoded != *value {
            trace!(%value, %encoded, "string altered by encoding");
        }
        encoded
    }

    fn decode(&self, buf: &mut BitReader<'_>) -> Result<String, Error> {
        buf.rewind_on_error(|buf| {
            let len = self.length.decode(buf)? as usize;
            let bits = self.width.bits();
            if buf.remaining() < len * bits {
                return Err(Error::Underrun {
                    requested: len * bits,
                    remaining: buf.remaining(),
                });
            }
            let mut out = String::with_capacity(len);
            for _ in 0..len {
                let code = buf.read_bits(bits)? as u8;
                out.push(self.decode_char(code));
            }
            Ok(out)
        })
    }
}
