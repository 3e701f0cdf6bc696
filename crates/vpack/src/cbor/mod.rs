//! CBOR binary codec (RFC 8949 core data model).

pub mod constants;
mod decoder;
mod encoder;

pub use decoder::CborDecoder;
pub use encoder::CborEncoder;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::error::ParseError;
use crate::value::Value;

/// What the decoder does with a tag it meets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagPolicy {
    /// Keep the tag as [`Value::Tagged`].
    #[default]
    Preserve,
    /// Keep only the tagged item.
    Drop,
    /// Fail with `UnsupportedTag`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CborDecodeOptions {
    pub max_depth: usize,
    pub tags: TagPolicy,
}

impl Default for CborDecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            tags: TagPolicy::Preserve,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CborEncodeOptions {
    /// Emit map keys shortest first, ties broken bytewise.
    pub sort_keys: bool,
}

/// Decodes exactly one item; trailing bytes are an error.
pub fn decode(data: &[u8]) -> Result<Value, ParseError> {
    decode_with_options(data, &CborDecodeOptions::default())
}

pub fn decode_with_options(data: &[u8], opts: &CborDecodeOptions) -> Result<Value, ParseError> {
    CborDecoder::new(data, opts).decode()
}

/// Decodes the first item and returns it with the number of bytes it
/// occupied; whatever follows is left alone.
pub fn decode_with_consumed(
    data: &[u8],
    opts: &CborDecodeOptions,
) -> Result<(Value, usize), ParseError> {
    let mut decoder = CborDecoder::new(data, opts);
    let value = decoder.read_any()?;
    Ok((value, decoder.position()))
}

pub fn encode(value: &Value) -> Vec<u8> {
    CborEncoder::new(CborEncodeOptions::default()).encode(value)
}

pub fn encode_with_options(value: &Value, opts: &CborEncodeOptions) -> Vec<u8> {
    CborEncoder::new(opts.clone()).encode(value)
}
