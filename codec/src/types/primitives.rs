//! Codecs for booleans and native-width integers.
//!
//! # Fixed-width integers
//!
//! [FixedIntCodec] is a [VarintCodec] whose range is derived from a bit width instead of
//! being given directly:
//!
//! ```text
//! min_value = signed ? -resolution * 2^(num_bits - 1) : 0     (unless overridden)
//! max_value = min_value + (2^num_bits - 1) * resolution
//! ```
//!
//! so exactly `2^num_bits` steps fit in `num_bits` bits. The aliases ([Int8Codec] through
//! [UInt64Codec]) fix the width and signedness and otherwise behave identically, including
//! saturation of out-of-range input.

use crate::{
    bits::{BitReader, BitWriter},
    BitSize, BoolCfg, Codec, Error, FixedIntCfg, VarintCfg, VarintCodec,
};
use paste::paste;
use std::ops::Deref;

/// Encodes a boolean as a single bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoolCodec;

impl BoolCodec {
    pub fn new() -> Self {
        Self
    }

    pub fn with_cfg(_: BoolCfg) -> Result<Self, Error> {
        Ok(Self)
    }
}

impl BitSize for BoolCodec {
    fn min_length_bits(&self) -> usize {
        1
    }

    fn max_length_bits(&self) -> usize {
        1
    }
}

impl Codec for BoolCodec {
    type Value = bool;

    fn encode_into(&self, value: &bool, buf: &mut BitWriter) -> bool {
        buf.write_bool(*value);
        *value
    }

    fn decode(&self, buf: &mut BitReader<'_>) -> Result<bool, Error> {
        buf.read_bool()
    }
}

/// Encodes integers of a given bit width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedIntCodec {
    signed: bool,
    inner: VarintCodec,
}

impl FixedIntCodec {
    /// Creates a codec for the configured width.
    pub fn new(cfg: FixedIntCfg) -> Result<Self, Error> {
        let FixedIntCfg {
            num_bits,
            signed,
            min_value,
            resolution,
            little_endian,
        } = cfg;
        if num_bits == 0 {
            return Err(Error::config("fixed_int", "num_bits must be positive"));
        }
        if resolution < 1 {
            return Err(Error::InvalidResolution(resolution));
        }
        let overflow = || Error::config("fixed_int", format!("{num_bits} bits overflows i128"));
        if num_bits >= i128::BITS - 1 {
            return Err(overflow());
        }

        let steps = 1i128 << num_bits;
        let min_value = match min_value {
            Some(min_value) => min_value,
            None if signed => (steps / 2)
                .checked_mul(resolution)
                .map(|half| -half)
                .ok_or_else(overflow)?,
            None => 0,
        };
        let max_value = (steps - 1)
            .checked_mul(resolution)
            .and_then(|span| min_value.checked_add(span))
            .ok_or_else(overflow)?;

        let inner = VarintCodec::new(VarintCfg {
            min_value,
            max_value,
            resolution,
            little_endian,
        })?;
        Ok(Self { signed, inner })
    }

    /// Width of every encoding.
    pub fn num_bits(&self) -> usize {
        self.inner.num_bits()
    }

    /// Whether the default range is centered on zero.
    pub fn signed(&self) -> bool {
        self.signed
    }

    /// Smallest encodable value.
    pub fn min_value(&self) -> i128 {
        self.inner.min_value()
    }

    /// Largest encodable value.
    pub fn max_value(&self) -> i128 {
        self.inner.max_value()
    }

    /// Quantization step.
    pub fn resolution(&self) -> i128 {
        self.inner.resolution()
    }
}

impl BitSize for FixedIntCodec {
    fn min_length_bits(&self) -> usize {
        self.inner.min_length_bits()
    }

    fn max_length_bits(&self) -> usize {
        self.inner.max_length_bits()
    }
}

impl Codec for FixedIntCodec {
    type Value = i128;

    #[inline]
    fn encode_into(&self, value: &i128, buf: &mut BitWriter) -> i128 {
        self.inner.encode_into(value, buf)
    }

    #[inline]
    fn decode(&self, buf: &mut BitReader<'_>) -> Result<i128, Error> {
        self.inner.decode(buf)
    }
}

// Native-width aliases of `FixedIntCodec`
macro_rules! impl_fixed_int {
    ($name:ident, $bits:literal, $signed:literal) => {
        paste! {
            #[doc = concat!("A ", stringify!($bits), "-bit `", stringify!($name), "` codec.")]
            #[derive(Clone, Debug, PartialEq, Eq)]
            pub struct [<$name Codec>](FixedIntCodec);

            impl [<$name Codec>] {
                /// Registry key.
                pub const NAME: &'static str = stringify!([<$name:lower>]);

                /// Covers the native range at unit resolution.
                pub fn new() -> Self {
                    Self::with_cfg(FixedIntCfg::default())
                        .expect("native integer widths always form a valid range")
                }

                /// Applies `cfg`, ignoring its `num_bits` and `signed`.
                pub fn with_cfg(cfg: FixedIntCfg) -> Result<Self, Error> {
                    FixedIntCodec::new(FixedIntCfg {
                        num_bits: $bits,
                        signed: $signed,
                        ..cfg
                    })
                    .map(Self)
                }
            }

            impl Default for [<$name Codec>] {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl Deref for [<$name Codec>] {
                type Target = FixedIntCodec;

                fn deref(&self) -> &FixedIntCodec {
                    &self.0
                }
            }

            impl BitSize for [<$name Codec>] {
                fn min_length_bits(&self) -> usize {
                    self.0.min_length_bits()
                }

                fn max_length_bits(&self) -> usize {
                    self.0.max_length_bits()
                }
            }

            impl Codec for [<$name Codec>] {
                type Value = i128;

                #[inline]
                fn encode_into(&self, value: &i128, buf: &mut BitWriter) -> i128 {
                    self.0.encode_into(value, buf)
                }

                #[inline]
                fn decode(&self, buf: &mut BitReader<'_>) -> Result<i128, Error> {
                    self.0.decode(buf)
                }
            }
        }
    };
}

impl_fixed_int!(Int8, 8, true);
impl_fixed_int!(Int16, 16, true);
impl_fixed_int!(Int32, 32, true);
impl_fixed_int!(Int64, 64, true);
impl_fixed_int!(UInt8, 8, false);
impl_fixed_int!(UInt16, 16, false);
impl_fixed_int!(UInt32, 32, false);
impl_fixed_int!(UInt64, 64, false);

#[cfg(test)]
mod tests {
    use super::*;
    use paste::paste;

    macro_rules! impl_native_test {
        ($name:ident, $type:ty) => {
            paste! {
                #[test]
                fn [<test_ $name:lower>]() {
                    let codec = [<$name Codec>]::new();
                    assert_eq!(codec.num_bits(), <$type>::BITS as usize);
                    assert_eq!(codec.min_value(), <$type>::MIN as i128);
                    assert_eq!(codec.max_value(), <$type>::MAX as i128);

                    for value in [0, 1, <$type>::MIN, <$type>::MAX] {
                        let (bits, encoded) = codec.encode(&(value as i128));
                        assert_eq!(bits.len(), <$type>::BITS as usize);
                        assert_eq!(encoded, value as i128);
                        assert_eq!(codec.decode(&mut bits.reader()).unwrap(), value as i128);
                    }

                    // Saturates one past either end.
                    assert_eq!(codec.encode(&(<$type>::MAX as i128 + 1)).1, <$type>::MAX as i128);
                    assert_eq!(codec.encode(&(<$type>::MIN as i128 - 1)).1, <$type>::MIN as i128);
                }
            }
        };
    }

    impl_native_test!(Int8, i8);
    impl_native_test!(Int16, i16);
    impl_native_test!(Int32, i32);
    impl_native_test!(Int64, i64);
    impl_native_test!(UInt8, u8);
    impl_native_test!(UInt16, u16);
    impl_native_test!(UInt32, u32);
    impl_native_test!(UInt64, u64);

    #[test]
    fn test_uint64_is_64_bits() {
        let codec = UInt64Codec::new();
        assert_eq!(codec.num_bits(), 64);
        assert!(!codec.signed());
        assert_eq!(UInt64Codec::NAME, "uint64");
    }

    #[test]
    fn test_names() {
        assert_eq!(Int8Codec::NAME, "int8");
        assert_eq!(UInt16Codec::NAME, "uint16");
    }

    #[test]
    fn test_signed_resolution() {
        // Default lower bound scales with the resolution.
        let codec = FixedIntCodec::new(FixedIntCfg::new(4, true).resolution(10)).unwrap();
        assert_eq!(codec.num_bits(), 4);
        assert_eq!(codec.min_value(), -80);
        assert_eq!(codec.max_value(), 70);
        assert_eq!(codec.encode(&-75).1, -80);
        assert_eq!(codec.encode(&39).1, 30);
    }

    #[test]
    fn test_min_value_override() {
        let codec = FixedIntCodec::new(FixedIntCfg::new(3, false).min_value(100)).unwrap();
        assert_eq!(codec.min_value(), 100);
        assert_eq!(codec.max_value(), 107);
        let (bits, _) = codec.encode(&103);
        assert_eq!(bits.to_bit_string(), "011");
    }

    #[test]
    fn test_alias_ignores_width() {
        let codec = UInt8Codec::with_cfg(FixedIntCfg::new(32, true).resolution(2)).unwrap();
        assert_eq!(codec.num_bits(), 8);
        assert_eq!(codec.min_value(), 0);
        assert_eq!(codec.max_value(), 510);
    }

    #[test]
    fn test_little_endian() {
        let codec = UInt16Codec::with_cfg(FixedIntCfg::default().little_endian(true)).unwrap();
        let (bits, _) = codec.encode(&0xBEEF);
        assert_eq!(bits.as_bytes().as_ref(), &[0xEF, 0xBE]);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            FixedIntCodec::new(FixedIntCfg::new(0, false)),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            FixedIntCodec::new(FixedIntCfg::new(128, true)),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            FixedIntCodec::new(FixedIntCfg::new(8, true).resolution(0)),
            Err(Error::InvalidResolution(0))
        ));
    }

    #[test]
    fn test_bool() {
        let codec = BoolCodec::new();
        let mut buf = BitWriter::new();
        codec.encode_into(&true, &mut buf);
        codec.encode_into(&false, &mut buf);
        codec.encode_into(&true, &mut buf);
        let bits = buf.finish();
        assert_eq!(bits.to_bit_string(), "101");

        let mut reader = bits.reader();
        assert!(codec.decode(&mut reader).unwrap());
        assert!(!codec.decode(&mut reader).unwrap());
        assert!(codec.decode(&mut reader).unwrap());
        assert!(matches!(
            codec.decode(&mut reader),
            Err(Error::Underrun { .. })
        ));
    }
}
