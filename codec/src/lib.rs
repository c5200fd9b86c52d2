//! Pack typed values into compact, bit-aligned messages.
//!
//! # Overview
//!
//! A bit-level serialization library for links where every bit counts (acoustic modems,
//! narrowband radio, satellite short-burst data):
//! - Each field is encoded in exactly as many bits as its configured range requires
//! - Fields are concatenated without byte alignment
//! - Every codec reports its minimum and maximum encoded length so a message can be checked
//!   against a transport's payload limit before it is sent
//!
//! # Supported Types
//!
//! - Bounded integers: [VarintCodec] (arbitrary range and resolution), [FixedIntCodec] and the
//!   native-width aliases [Int8Codec] through [UInt64Codec]
//! - Booleans: [BoolCodec]
//! - Length-prefixed payloads: [BytesCodec], [AsciiStringCodec] (8, 7 or 6 bits per character)
//! - Arrays: [VariableLenArrayCodec], whose element codec is resolved by name from a [Registry]
//! - Messages: [MessageCodec], an ordered list of named fields
//!
//! # Lossy by design
//!
//! Encoding never fails on a well-typed value. Integers outside their range saturate, values are
//! floored onto their quantization grid, oversized payloads are truncated and characters outside
//! the configured alphabet become `?`. Every encode returns the value as it will decode so the
//! caller can see what was lost. Decoding fails only when the input runs out
//! ([Error::Underrun]).
//!
//! # Example
//!
//! ```
//! use ltcodec::{
//!     ArrayCfg, AsciiStringCfg, AsciiStringCodec, BitWriter, Codec, DynCodec, Registry,
//!     UInt16Codec, Value, VariableLenArrayCodec,
//! };
//!
//! let registry = Registry::builtin();
//! let id = UInt16Codec::new();
//! let name = AsciiStringCodec::new(AsciiStringCfg::new(8).bits_per_char(7)).unwrap();
//! let tags = VariableLenArrayCodec::new(&registry, ArrayCfg::new("uint8", 3)).unwrap();
//!
//! // Encode each field, in order, into one buffer.
//! let mut buf = BitWriter::new();
//! id.encode_into(&1000, &mut buf);
//! name.encode_into(&"bot".to_string(), &mut buf);
//! tags.encode_value_into(&Value::Array(vec![Value::Int(1), Value::Int(2)]), &mut buf)
//!     .unwrap();
//! let bits = buf.finish();
//! assert_eq!(bits.len(), 16 + (4 + 3 * 7) + (2 + 2 * 8));
//!
//! // Decode them back, in the same order, from one cursor.
//! let mut reader = bits.reader();
//! assert_eq!(id.decode(&mut reader).unwrap(), 1000);
//! assert_eq!(name.decode(&mut reader).unwrap(), "bot");
//! assert_eq!(
//!     tags.decode(&mut reader).unwrap(),
//!     vec![Value::Int(1), Value::Int(2)]
//! );
//! ```

pub mod bits;
pub mod codec;
pub mod config;
pub mod error;
pub mod message;
pub mod registry;
pub mod types;
pub mod value;
pub mod varint;

// Re-export main types and traits
pub use bits::{BitReader, BitWriter, Bits};
pub use codec::{BitSize, Codec, DynCodec};
pub use config::{ArrayCfg, AsciiStringCfg, BoolCfg, BytesCfg, CharWidth, FixedIntCfg, VarintCfg};
pub use error::Error;
pub use message::{FieldSchema, MessageCodec, MessageSchema};
pub use registry::Registry;
pub use types::{
    bytes::BytesCodec,
    primitives::{
        BoolCodec, FixedIntCodec, Int16Codec, Int32Codec, Int64Codec, Int8Codec, UInt16Codec,
        UInt32Codec, UInt64Codec, UInt8Codec,
    },
    string::{from_sixbit_ascii, to_sixbit_ascii, AsciiStringCodec},
    vec::VariableLenArrayCodec,
};
pub use value::{FieldValue, Value};
pub use varint::VarintCodec;
