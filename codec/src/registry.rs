//! Name-keyed codec construction.
//!
//! Array elements and message fields name their codec by a string key plus an optional
//! parameter map. A [Registry] turns that pair into a [DynCodec]. It is assembled up front
//! (usually with [Registry::builtin], optionally extended with [Registry::register]) and then
//! shared by reference with everything that resolves codecs by name.
//!
//! # Example
//!
//! ```
//! use ltcodec::{BitSize, Registry};
//! use serde_json::json;
//!
//! let registry = Registry::builtin();
//! let codec = registry
//!     .build("ascii_string", Some(&json!({ "max_length": 8, "bits_per_char": 7 })))
//!     .unwrap();
//! assert_eq!(codec.max_length_bits(), 4 + 8 * 7);
//! ```

use crate::{
    types::primitives::{
        Int16Codec, Int32Codec, Int64Codec, Int8Codec, UInt16Codec, UInt32Codec, UInt64Codec,
        UInt8Codec,
    },
    AsciiStringCodec, BoolCodec, BytesCodec, DynCodec, Error, FixedIntCodec, VariableLenArrayCodec,
    VarintCodec,
};
use serde::de::DeserializeOwned;
use std::{collections::BTreeMap, fmt};
use tracing::debug;

/// Builds a codec from its parameters. The registry is passed so nested codecs can resolve
/// their own element types.
pub type Factory =
    Box<dyn Fn(&Registry, Option<&Params>) -> Result<Box<dyn DynCodec>, Error> + Send + Sync>;

/// Codec parameters, as carried by array `element_params` and message schemas.
pub type Params = serde_json::Value;

/// Parses `params` into a codec configuration. Absent parameters parse as an empty map, so
/// configurations with only optional fields fall back to their defaults.
pub fn parse_params<T: DeserializeOwned>(
    codec: &str,
    params: Option<&serde_json::Value>,
) -> Result<T, Error> {
    let empty = serde_json::Value::Object(serde_json::Map::new());
    T::deserialize(params.unwrap_or(&empty)).map_err(|e| Error::config(codec, e))
}

/// A mapping from codec names to factories.
#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, Factory>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in codec.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_cfg("bool", BoolCodec::with_cfg);
        registry.register_cfg("varint", VarintCodec::new);
        registry.register_cfg("fixed_int", FixedIntCodec::new);
        registry.register_cfg(Int8Codec::NAME, Int8Codec::with_cfg);
        registry.register_cfg(Int16Codec::NAME, Int16Codec::with_cfg);
        registry.register_cfg(Int32Codec::NAME, Int32Codec::with_cfg);
        registry.register_cfg(Int64Codec::NAME, Int64Codec::with_cfg);
        registry.register_cfg(UInt8Codec::NAME, UInt8Codec::with_cfg);
        registry.register_cfg(UInt16Codec::NAME, UInt16Codec::with_cfg);
        registry.register_cfg(UInt32Codec::NAME, UInt32Codec::with_cfg);
        registry.register_cfg(UInt64Codec::NAME, UInt64Codec::with_cfg);
        registry.register_cfg("bytes", BytesCodec::new);
        registry.register_cfg("ascii_string", AsciiStringCodec::new);
        registry.register_cfg("string", AsciiStringCodec::new);
        registry.register("variable_len_array", |registry, params| {
            let cfg = parse_params("variable_len_array", params)?;
            let codec = VariableLenArrayCodec::new(registry, cfg)?;
            Ok(Box::new(codec))
        });
        registry
    }

    /// Adds `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Registry, Option<&serde_json::Value>) -> Result<Box<dyn DynCodec>, Error>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Adds a codec built from a deserializable configuration.
    pub fn register_cfg<Cfg, C>(
        &mut self,
        name: &str,
        constructor: impl Fn(Cfg) -> Result<C, Error> + Send + Sync + 'static,
    ) where
        Cfg: DeserializeOwned,
        C: DynCodec + 'static,
    {
        let key = name.to_string();
        self.register(name, move |_, params| {
            let cfg = parse_params(&key, params)?;
            Ok(Box::new(constructor(cfg)?))
        });
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Builds the codec registered under `name`.
    pub fn build(
        &self,
        name: &str,
        params: Option<&serde_json::Value>,
    ) -> Result<Box<dyn DynCodec>, Error> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::UnknownCodecType(name.to_string()))?;
        let codec = factory(self, params)?;
        debug!(
            codec = name,
            min_bits = codec.min_length_bits(),
            max_bits = codec.max_length_bits(),
            "built codec"
        );
        Ok(codec)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitWriter, Value, VarintCfg};
    use serde_json::json;

    #[test]
    fn test_builtin_names() {
        let registry = Registry::builtin();
        for name in [
            "bool",
            "varint",
            "fixed_int",
            "int8",
            "int16",
            "int32",
            "int64",
            "uint8",
            "uint16",
            "uint32",
            "uint64",
            "bytes",
            "ascii_string",
            "string",
            "variable_len_array",
        ] {
            assert!(registry.contains(name), "{name} missing");
        }
        assert_eq!(registry.names().count(), 15);
    }

    #[test]
    fn test_defaults() {
        let registry = Registry::builtin();
        let max_bits = |name: &str| registry.build(name, None).unwrap().max_length_bits();
        assert_eq!(max_bits("uint64"), 64);
        assert_eq!(max_bits("fixed_int"), 32);
        assert_eq!(max_bits("bool"), 1);
    }

    #[test]
    fn test_params() {
        let registry = Registry::builtin();
        let codec = registry
            .build("int16", Some(&json!({ "resolution": 4, "min_value": 0 })))
            .unwrap();
        assert_eq!(codec.max_length_bits(), 16);
        let (_, encoded) = codec.encode_value(&Value::Int(7)).unwrap();
        assert_eq!(encoded, Value::Int(4));
    }

    #[test]
    fn test_unknown() {
        let registry = Registry::builtin();
        assert!(matches!(
            registry.build("float", None),
            Err(Error::UnknownCodecType(name)) if name == "float"
        ));
    }

    #[test]
    fn test_missing_params() {
        let registry = Registry::builtin();
        assert!(matches!(
            registry.build("varint", None),
            Err(Error::InvalidConfig { codec, .. }) if codec == "varint"
        ));
        assert!(matches!(
            registry.build("bytes", Some(&json!({ "max_length": "four" }))),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_register_custom() {
        let mut registry = Registry::builtin();
        registry.register("percent", |_, _| {
            Ok(Box::new(VarintCodec::new(VarintCfg::new(0, 100))?))
        });
        let registry = registry;

        let array = registry
            .build(
                "variable_len_array",
                Some(&json!({ "element_type": "percent", "max_length": 4 })),
            )
            .unwrap();
        assert_eq!(array.max_length_bits(), 3 + 4 * 7);

        let mut buf = BitWriter::new();
        let encoded = array
            .encode_value_into(&Value::Array(vec![Value::Int(150)]), &mut buf)
            .unwrap();
        assert_eq!(encoded, Value::Array(vec![Value::Int(100)]));
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(matches!(
            VariableLenArrayCodec::new(&registry, crate::ArrayCfg::new("uint8", 3)),
            Err(Error::UnknownCodecType(_))
        ));
    }
}
