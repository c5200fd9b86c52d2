//! Codec implementations for each field type.

use crate::{Error, VarintCfg, VarintCodec};

pub mod bytes;
pub mod primitives;
pub mod string;
pub mod vec;

/// The length prefix shared by variable-size fields: a varint over `[0, max_length]`.
pub(crate) fn length_codec(codec: &str, max_length: usize) -> Result<VarintCodec, Error> {
    if max_length == 0 {
        return Err(Error::config(codec, "max_length must be positive"));
    }
    let max_value = i128::try_from(max_length).map_err(|e| Error::config(codec, e))?;
    VarintCodec::new(VarintCfg::new(0, max_value))
}
