//! JSON text codec (RFC 8259).
//!
//! Byte strings have no JSON form of their own, so they travel as
//! `data:application/octet-stream;base64,...` data URIs and are turned back
//! into [`Value::Bytes`] on decode.

mod decoder;
mod encoder;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::error::{EncodeError, ParseError, ParseErrorKind};
use crate::value::Value;

pub(crate) const BIN_PREFIX: &str = "data:application/octet-stream;base64,";

/// Which data model the shared reader and writer follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    Json,
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonDecodeOptions {
    /// Maximum nesting of arrays and objects.
    pub max_depth: usize,
    /// Decode binary data URIs into [`Value::Bytes`].
    pub binary_data_uri: bool,
}

impl Default for JsonDecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            binary_data_uri: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonEncodeOptions {
    /// Two-space indentation.
    pub pretty: bool,
    /// Emit map keys shortest first, ties broken bytewise.
    pub sort_keys: bool,
}

pub fn decode(text: &str) -> Result<Value, ParseError> {
    decode_with_options(text.as_bytes(), &JsonDecodeOptions::default())
}

/// Decodes UTF-8 bytes, failing with `InvalidUtf8` at the first bad byte.
pub fn decode_slice(data: &[u8]) -> Result<Value, ParseError> {
    decode_with_options(data, &JsonDecodeOptions::default())
}

pub fn decode_with_options(data: &[u8], opts: &JsonDecodeOptions) -> Result<Value, ParseError> {
    if let Err(e) = std::str::from_utf8(data) {
        return Err(ParseError::at(
            ParseErrorKind::InvalidUtf8,
            e.valid_up_to(),
            "input is not valid utf-8",
        ));
    }
    JsonDecoder::new(data, opts).decode()
}

/// Compact encoding in stored key order.
pub fn encode(value: &Value) -> Result<String, EncodeError> {
    JsonEncoder::new(JsonEncodeOptions::default()).encode(value)
}

pub fn encode_with_options(value: &Value, opts: &JsonEncodeOptions) -> Result<String, EncodeError> {
    JsonEncoder::new(opts.clone()).encode(value)
}

/// Renders bytes as the data URI the decoder recognizes.
pub fn bytes_to_data_uri(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(BIN_PREFIX.len() + bytes.len().div_ceil(3) * 4);
    out.push_str(BIN_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut out);
    out
}
