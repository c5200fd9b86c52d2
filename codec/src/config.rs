//! Codec configuration.
//!
//! Every codec is built from one of these structs. They deserialize with [serde] so message
//! schemas (and the `element_params` of arrays) can be written in JSON or YAML; optional fields
//! take the defaults listed on each field.

use serde::Deserialize;

fn one() -> i128 {
    1
}

/// Configuration for [crate::VarintCodec].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarintCfg {
    /// Smallest encodable value.
    pub min_value: i128,

    /// Largest encodable value. Must exceed `min_value`.
    pub max_value: i128,

    /// Quantization step. Defaults to 1.
    #[serde(default = "one")]
    pub resolution: i128,

    /// Emit whole bytes least significant first. Defaults to false.
    #[serde(default)]
    pub little_endian: bool,
}

impl VarintCfg {
    /// Covers `[min_value, max_value]` at unit resolution, big-endian.
    pub fn new(min_value: i128, max_value: i128) -> Self {
        Self {
            min_value,
            max_value,
            resolution: 1,
            little_endian: false,
        }
    }

    /// Sets the quantization step.
    pub fn resolution(mut self, resolution: i128) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the byte order.
    pub fn little_endian(mut self, little_endian: bool) -> Self {
        self.little_endian = little_endian;
        self
    }
}

/// Configuration for [crate::FixedIntCodec] and its fixed-width aliases.
///
/// The aliases (`int8`, `uint16`, ...) ignore `num_bits` and `signed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixedIntCfg {
    /// Width of the integer. Defaults to 32.
    pub num_bits: u32,

    /// Whether the default range is centered on zero. Defaults to true.
    pub signed: bool,

    /// Overrides the lower bound derived from `num_bits` and `signed`.
    pub min_value: Option<i128>,

    /// Quantization step. Defaults to 1.
    pub resolution: i128,

    /// Emit whole bytes least significant first. Defaults to false.
    pub little_endian: bool,
}

impl Default for FixedIntCfg {
    fn default() -> Self {
        Self {
            num_bits: 32,
            signed: true,
            min_value: None,
            resolution: 1,
            little_endian: false,
        }
    }
}

impl FixedIntCfg {
    /// A native-width integer at unit resolution.
    pub fn new(num_bits: u32, signed: bool) -> Self {
        Self {
            num_bits,
            signed,
            ..Self::default()
        }
    }

    /// Sets the lower bound.
    pub fn min_value(mut self, min_value: i128) -> Self {
        self.min_value = Some(min_value);
        self
    }

    /// Sets the quantization step.
    pub fn resolution(mut self, resolution: i128) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the byte order.
    pub fn little_endian(mut self, little_endian: bool) -> Self {
        self.little_endian = little_endian;
        self
    }
}

/// Configuration for [crate::BytesCodec].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BytesCfg {
    /// Longest payload in bytes. Longer payloads keep their first `max_length` bytes.
    pub max_length: usize,
}

/// Bits emitted per character by [crate::AsciiStringCodec].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum CharWidth {
    /// Six-bit teleprinter subset (`0x20..=0x5f`).
    Six,
    /// Seven-bit ASCII.
    Seven,
    /// One full byte per character.
    #[default]
    Eight,
}

impl CharWidth {
    /// Number of bits per character.
    pub fn bits(self) -> usize {
        match self {
            CharWidth::Six => 6,
            CharWidth::Seven => 7,
            CharWidth::Eight => 8,
        }
    }
}

/// Any width other than 6 or 7 selects full bytes.
impl From<u8> for CharWidth {
    fn from(bits: u8) -> Self {
        match bits {
            6 => CharWidth::Six,
            7 => CharWidth::Seven,
            _ => CharWidth::Eight,
        }
    }
}

/// Configuration for [crate::AsciiStringCodec].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AsciiStringCfg {
    /// Longest string in characters.
    pub max_length: usize,

    /// Bits per character. Defaults to 8.
    #[serde(default)]
    pub bits_per_char: CharWidth,

    /// Keep the last `max_length` characters of a long string instead of the first.
    #[serde(default)]
    pub tail: bool,
}

impl AsciiStringCfg {
    /// Full-byte characters, head truncation.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            bits_per_char: CharWidth::Eight,
            tail: false,
        }
    }

    /// Sets the character width.
    pub fn bits_per_char(mut self, bits_per_char: impl Into<CharWidth>) -> Self {
        self.bits_per_char = bits_per_char.into();
        self
    }

    /// Sets the truncation side.
    pub fn tail(mut self, tail: bool) -> Self {
        self.tail = tail;
        self
    }
}

/// Configuration for [crate::VariableLenArrayCodec].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrayCfg {
    /// Registry key of the element codec.
    pub element_type: String,

    /// Longest array in elements. Longer arrays keep their first `max_length` elements.
    pub max_length: usize,

    /// Configuration forwarded to the element codec. Its defaults apply when absent.
    #[serde(default)]
    pub element_params: Option<serde_json::Value>,
}

impl ArrayCfg {
    /// An array of default-configured `element_type` elements.
    pub fn new(element_type: impl Into<String>, max_length: usize) -> Self {
        Self {
            element_type: element_type.into(),
            max_length,
            element_params: None,
        }
    }

    /// Sets the element codec's configuration.
    pub fn element_params(mut self, params: serde_json::Value) -> Self {
        self.element_params = Some(params);
        self
    }
}

/// Configuration for [crate::BoolCodec]. It has no options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoolCfg {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_varint_defaults() {
        let cfg: VarintCfg = serde_json::from_value(json!({
            "min_value": -5,
            "max_value": 5,
        }))
        .unwrap();
        assert_eq!(cfg, VarintCfg::new(-5, 5));
    }

    #[test]
    fn test_varint_missing_bound() {
        assert!(serde_json::from_value::<VarintCfg>(json!({ "min_value": 0 })).is_err());
    }

    #[test]
    fn test_fixed_int_defaults() {
        let cfg: FixedIntCfg = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg, FixedIntCfg::new(32, true));

        let cfg: FixedIntCfg =
            serde_json::from_value(json!({ "num_bits": 12, "signed": false, "min_value": 100 }))
                .unwrap();
        assert_eq!(cfg, FixedIntCfg::new(12, false).min_value(100));
    }

    #[test]
    fn test_char_width() {
        let cfg: AsciiStringCfg =
            serde_json::from_value(json!({ "max_length": 4, "bits_per_char": 6 })).unwrap();
        assert_eq!(cfg.bits_per_char, CharWidth::Six);

        // Anything unrecognized falls back to full bytes.
        let cfg: AsciiStringCfg =
            serde_json::from_value(json!({ "max_length": 4, "bits_per_char": 5 })).unwrap();
        assert_eq!(cfg.bits_per_char, CharWidth::Eight);

        let cfg: AsciiStringCfg = serde_json::from_value(json!({ "max_length": 4 })).unwrap();
        assert_eq!(cfg, AsciiStringCfg::new(4));
    }

    #[test]
    fn test_array_params() {
        let cfg: ArrayCfg = serde_json::from_value(json!({
            "element_type": "varint",
            "max_length": 3,
            "element_params": { "min_value": 0, "max_value": 9 },
        }))
        .unwrap();
        assert_eq!(
            cfg,
            ArrayCfg::new("varint", 3).element_params(json!({ "min_value": 0, "max_value": 9 }))
        );
    }

    #[test]
    fn test_unknown_field() {
        assert!(serde_json::from_value::<BytesCfg>(json!({ "max_len": 3 })).is_err());
    }
}
