#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use ltcodec::{
    AsciiStringCfg, AsciiStringCodec, BitReader, BitSize, BitWriter, BoolCodec, BytesCfg,
    BytesCodec, Codec, DynCodec, FixedIntCfg, FixedIntCodec, Int16Codec, MessageCodec, Registry,
    Value, VarintCfg, VarintCodec,
};
use std::fmt::Debug;

/// Encodes `value`, checks the length against the codec's bounds, then checks that decoding
/// yields exactly the reported value and that re-encoding it is stable.
fn roundtrip<C>(codec: &C, value: &C::Value)
where
    C: Codec,
    C::Value: PartialEq + Debug,
{
    let (bits, encoded) = codec.encode(value);
    assert!(bits.len() >= codec.min_length_bits());
    assert!(bits.len() <= codec.max_length_bits());

    let mut reader = bits.reader();
    let decoded = codec
        .decode(&mut reader)
        .expect("Failed to decode a successfully encoded input!");
    assert_eq!(decoded, encoded);
    assert_eq!(reader.remaining(), 0);

    let (again, _) = codec.encode(&encoded);
    assert_eq!(again, bits);
}

fn roundtrip_dyn(codec: &dyn DynCodec, value: &Value) {
    let Ok((bits, encoded)) = codec.encode_value(value) else {
        return;
    };
    assert!(bits.len() >= codec.min_length_bits());
    assert!(bits.len() <= codec.max_length_bits());
    let decoded = codec
        .decode_value(&mut bits.reader())
        .expect("Failed to decode a successfully encoded input!");
    assert_eq!(decoded, encoded);
}

/// Decoding garbage may fail but must never panic or overrun the cursor.
fn decode_garbage(codec: &dyn DynCodec, data: &[u8], len: usize) {
    let len = len.min(data.len() * 8);
    let mut reader = BitReader::with_len(data, len);
    let start = reader.remaining();
    if codec.decode_value(&mut reader).is_err() {
        return;
    }
    assert!(start - reader.remaining() <= codec.max_length_bits());
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    Varint {
        min: i64,
        span: u64,
        resolution: u16,
        little_endian: bool,
        value: i128,
    },
    FixedInt {
        num_bits: u8,
        signed: bool,
        resolution: u8,
        value: i128,
    },
    Bytes {
        max_length: u8,
        value: &'a [u8],
    },
    String {
        max_length: u8,
        bits_per_char: u8,
        tail: bool,
        value: String,
    },
    Array {
        element_type: u8,
        max_length: u8,
        value: Vec<i64>,
    },
    Message {
        flag: bool,
        level: i128,
        note: String,
        payload: &'a [u8],
    },
    Garbage {
        codec: u8,
        data: &'a [u8],
        len: usize,
    },
}

const ELEMENT_TYPES: [&str; 10] = [
    "bool",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "fixed_int",
];

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Varint {
            min,
            span,
            resolution,
            little_endian,
            value,
        } => {
            let min = min as i128;
            let cfg = VarintCfg::new(min, min + span as i128)
                .resolution(resolution as i128)
                .little_endian(little_endian);
            if let Ok(codec) = VarintCodec::new(cfg) {
                roundtrip(&codec, &value);
            }
        }
        FuzzInput::FixedInt {
            num_bits,
            signed,
            resolution,
            value,
        } => {
            let cfg = FixedIntCfg::new(num_bits as u32, signed).resolution(resolution as i128);
            if let Ok(codec) = FixedIntCodec::new(cfg) {
                roundtrip(&codec, &value);
            }
        }
        FuzzInput::Bytes { max_length, value } => {
            let cfg = BytesCfg {
                max_length: max_length as usize,
            };
            if let Ok(codec) = BytesCodec::new(cfg) {
                roundtrip(&codec, &Bytes::copy_from_slice(value));
            }
        }
        FuzzInput::String {
            max_length,
            bits_per_char,
            tail,
            value,
        } => {
            let cfg = AsciiStringCfg::new(max_length as usize)
                .bits_per_char(bits_per_char)
                .tail(tail);
            if let Ok(codec) = AsciiStringCodec::new(cfg) {
                roundtrip(&codec, &value);
            }
        }
        FuzzInput::Array {
            element_type,
            max_length,
            value,
        } => {
            let registry = Registry::builtin();
            let element_type = ELEMENT_TYPES[element_type as usize % ELEMENT_TYPES.len()];
            let params = serde_json::json!({
                "element_type": element_type,
                "max_length": max_length,
            });
            let Ok(codec) = registry.build("variable_len_array", Some(&params)) else {
                return;
            };
            let values = value
                .into_iter()
                .map(|v| match element_type {
                    "bool" => Value::Bool(v & 1 == 1),
                    _ => Value::Int(v as i128),
                })
                .collect();
            roundtrip_dyn(codec.as_ref(), &Value::Array(values));
        }
        FuzzInput::Message {
            flag,
            level,
            note,
            payload,
        } => {
            let note_cfg = AsciiStringCfg::new(12).bits_per_char(6);
            let payload_cfg = BytesCfg { max_length: 9 };
            let message = MessageCodec::new()
                .field("flag", BoolCodec::new())
                .field("level", Int16Codec::new())
                .field("note", AsciiStringCodec::new(note_cfg).unwrap())
                .field("payload", BytesCodec::new(payload_cfg).unwrap());
            let values = [
                Value::Bool(flag),
                Value::Int(level),
                Value::String(note),
                Value::Bytes(Bytes::copy_from_slice(payload)),
            ];
            let (bits, encoded) = message.encode(&values).unwrap();
            assert!(bits.len() <= message.max_length_bits());
            assert_eq!(message.decode_exact(bits.as_bytes()).unwrap(), encoded);

            // A failed encode must leave the buffer untouched.
            let mut buf = BitWriter::new();
            assert!(message.encode_into(&values[..2], &mut buf).is_err());
            assert!(buf.is_empty());
        }
        FuzzInput::Garbage { codec, data, len } => {
            let registry = Registry::builtin();
            let name = ELEMENT_TYPES[codec as usize % ELEMENT_TYPES.len()];
            let codec = registry.build(name, None).unwrap();
            decode_garbage(codec.as_ref(), data, len);

            let array = registry
                .build(
                    "variable_len_array",
                    Some(&serde_json::json!({
                        "element_type": "ascii_string",
                        "max_length": 7,
                        "element_params": { "max_length": 5, "bits_per_char": 6 },
                    })),
                )
                .unwrap();
            decode_garbage(array.as_ref(), data, len);
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
