//! Ordered collections of named fields.
//!
//! A [MessageCodec] encodes one value per field, in field order, into a single bit sequence and
//! decodes them back from a shared cursor. Its bit bounds are the sums of its fields' bounds, so
//! [MessageCodec::fits] can check a message against a link's payload limit before anything is
//! sent.
//!
//! Messages can be assembled in code or described by a [MessageSchema], typically loaded from
//! YAML:
//!
//! ```
//! use ltcodec::{MessageCodec, MessageSchema, Registry, Value};
//!
//! let schema: MessageSchema = serde_json::from_str(r#"{
//!     "name": "status",
//!     "fields": [
//!         { "name": "id", "codec": "uint16" },
//!         { "name": "depth", "codec": "varint",
//!           "params": { "min_value": 0, "max_value": 6000, "resolution": 10 } }
//!     ]
//! }"#).unwrap();
//! let message = MessageCodec::from_schema(&Registry::builtin(), &schema).unwrap();
//!
//! let (bits, encoded) = message.encode(&[Value::Int(7), Value::Int(1234)]).unwrap();
//! assert_eq!(encoded, vec![Value::Int(7), Value::Int(1230)]);
//! assert_eq!(message.decode(&mut bits.reader()).unwrap(), encoded);
//! ```

use crate::{
    bits::{BitReader, BitWriter, Bits},
    BitSize, DynCodec, Error, Registry, Value,
};
use serde::Deserialize;
use tracing::debug;

/// One field of a [MessageSchema].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSchema {
    /// Field name.
    pub name: String,

    /// Registry key of the field's codec.
    pub codec: String,

    /// Configuration passed to the codec.
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// A serializable description of a message.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageSchema {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug)]
struct Field {
    name: String,
    codec: Box<dyn DynCodec>,
}

/// Encodes and decodes a fixed sequence of named fields.
#[derive(Debug, Default)]
pub struct MessageCodec {
    fields: Vec<Field>,
}

impl MessageCodec {
    /// A message with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn field(self, name: impl Into<String>, codec: impl DynCodec + 'static) -> Self {
        self.boxed_field(name, Box::new(codec))
    }

    /// Appends a field whose codec is already boxed, e.g. one built by a [Registry].
    pub fn boxed_field(mut self, name: impl Into<String>, codec: Box<dyn DynCodec>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            codec,
        });
        self
    }

    /// Builds every field of `schema` through `registry`.
    pub fn from_schema(registry: &Registry, schema: &MessageSchema) -> Result<Self, Error> {
        let mut message = Self::new();
        for field in &schema.fields {
            let codec = registry.build(&field.codec, field.params.as_ref())?;
            message = message.boxed_field(field.name.clone(), codec);
        }
        debug!(
            name = schema.name.as_deref().unwrap_or("<unnamed>"),
            fields = message.len(),
            max_bits = message.max_length_bits(),
            "built message codec"
        );
        Ok(message)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the message has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names, in encoding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Returns true if every possible encoding fits in `budget_bits`.
    pub fn fits(&self, budget_bits: usize) -> bool {
        self.max_length_bits() <= budget_bits
    }

    /// Encodes one value per field into a fresh bit sequence, returning the values as they will
    /// decode.
    pub fn encode(&self, values: &[Value]) -> Result<(Bits, Vec<Value>), Error> {
        let mut buf = BitWriter::with_capacity(self.max_length_bits());
        let encoded = self.encode_into(values, &mut buf)?;
        Ok((buf.finish(), encoded))
    }

    /// Appends one value per field to `buf`. Nothing is appended if any field fails.
    pub fn encode_into(&self, values: &[Value], buf: &mut BitWriter) -> Result<Vec<Value>, Error> {
        if values.len() != self.fields.len() {
            return Err(Error::FieldCount {
                expected: self.fields.len(),
                found: values.len(),
            });
        }
        let mut scratch = BitWriter::new();
        let encoded = self
            .fields
            .iter()
            .zip(values)
            .map(|(field, value)| field.codec.encode_value_into(value, &mut scratch))
            .collect::<Result<Vec<_>, _>>()?;
        buf.extend(&scratch);
        Ok(encoded)
    }

    /// Reads one value per field from `buf`, leaving the cursor after the last field. If any
    /// field fails the cursor is left where it started.
    pub fn decode(&self, buf: &mut BitReader<'_>) -> Result<Vec<Value>, Error> {
        buf.rewind_on_error(|buf| {
            self.fields
                .iter()
                .map(|field| field.codec.decode_value(buf))
                .collect()
        })
    }

    /// Decodes a whole payload. Anything beyond the padding of the final byte is rejected.
    pub fn decode_exact(&self, data: &[u8]) -> Result<Vec<Value>, Error> {
        let mut reader = BitReader::new(data);
        let values = self.decode(&mut reader)?;
        let remaining = reader.remaining();
        if remaining >= 8 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(values)
    }
}

impl BitSize for MessageCodec {
    fn min_length_bits(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.codec.min_length_bits())
            .sum()
    }

    fn max_length_bits(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.codec.max_length_bits())
            .sum()
    }
}

/// A message nested inside another message (or an array) is an array of its field values.
impl DynCodec for MessageCodec {
    fn encode_value_into(&self, value: &Value, buf: &mut BitWriter) -> Result<Value, Error> {
        match value {
            Value::Array(values) => self.encode_into(values, buf).map(Value::Array),
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
