//! Legacy message data model.
//!
//! Text form is the signing encoding: JSON indented by two spaces with
//! ECMAScript number text. Every number is a double, so only integral
//! values within the safe integer range come back as [`Value::Int`].
//! Objects may not repeat a key, and entries whose keys are natural
//! numbers are ordered before all others.
//!
//! The binary form wraps the text in a length-prefixed record (see
//! [`frame`]).

mod content;
pub mod frame;
pub(crate) mod order;

pub use content::{check_content, legacy_length, CONTENT_TYPE_MAX_LEN, CONTENT_TYPE_MIN_LEN};
pub use frame::Frames;
pub use order::{is_natural_key, legacy_key_cmp, MAX_SAFE_INTEGER};

use serde::{Deserialize, Serialize};
use vpack_buffers::Writer;

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::error::{EncodeError, ParseError, ParseErrorKind};
use crate::json::{JsonDecodeOptions, JsonDecoder, JsonEncoder};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyDecodeOptions {
    pub max_depth: usize,
    /// Apply [`check_content`] to the decoded value.
    pub require_content: bool,
}

impl Default for LegacyDecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            require_content: false,
        }
    }
}

pub fn decode_text(text: &str) -> Result<Value, ParseError> {
    decode_text_bytes(text.as_bytes(), &LegacyDecodeOptions::default())
}

pub fn decode_text_with_options(
    text: &str,
    opts: &LegacyDecodeOptions,
) -> Result<Value, ParseError> {
    decode_text_bytes(text.as_bytes(), opts)
}

/// Decodes a single length-prefixed record.
pub fn decode_bytes(data: &[u8]) -> Result<Value, ParseError> {
    frame::decode_frame(data, &LegacyDecodeOptions::default())
}

pub fn decode_bytes_with_options(
    data: &[u8],
    opts: &LegacyDecodeOptions,
) -> Result<Value, ParseError> {
    frame::decode_frame(data, opts)
}

/// Iterates the records of a buffer holding several back to back.
pub fn frames(data: &[u8]) -> Frames<'_> {
    Frames::new(data, LegacyDecodeOptions::default())
}

pub fn encode_text(value: &Value) -> Result<String, EncodeError> {
    JsonEncoder::legacy().encode(value)
}

pub fn encode_bytes(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let text = encode_text(value)?;
    let mut writer = Writer::with_capacity(frame::FRAME_HEADER_LEN + text.len());
    frame::write_frame(&mut writer, &text)?;
    Ok(writer.into_inner())
}

pub(crate) fn decode_text_bytes(
    data: &[u8],
    opts: &LegacyDecodeOptions,
) -> Result<Value, ParseError> {
    if let Err(e) = std::str::from_utf8(data) {
        return Err(ParseError::at(
            ParseErrorKind::InvalidUtf8,
            e.valid_up_to(),
            "legacy text is not valid utf-8",
        ));
    }
    let json_opts = JsonDecodeOptions {
        max_depth: opts.max_depth,
        binary_data_uri: false,
    };
    let value = JsonDecoder::legacy(data, &json_opts)
        .decode()
        .map_err(coarsen)?;
    if opts.require_content {
        check_content(&value)?;
    }
    Ok(value)
}

/// Structural errors all surface as `InvalidLegacyFormat`.
fn coarsen(e: ParseError) -> ParseError {
    match e.kind {
        ParseErrorKind::InvalidUtf8 | ParseErrorKind::InvalidLegacyFormat => e,
        kind => ParseError {
            kind: ParseErrorKind::InvalidLegacyFormat,
            offset: e.offset,
            message: format!("{kind}: {}", e.message),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;

    #[test]
    fn signing_encoding_layout() {
        let map: Map = [
            ("type", Value::from("post")),
            ("n", Value::Float(1.5)),
            ("xs", Value::Array(vec![Value::Int(1), Value::Null])),
            ("e", Value::Map(Map::new())),
        ]
        .into_iter()
        .collect();
        let text = encode_text(&Value::Map(map)).unwrap();
        assert_eq!(
            text,
            "{\n  \"type\": \"post\",\n  \"n\": 1.5,\n  \"xs\": [\n    1,\n    null\n  ],\n  \"e\": {}\n}"
        );
    }

    #[test]
    fn numbers_follow_ecmascript() {
        assert_eq!(encode_text(&Value::Float(1e21)).unwrap(), "1e+21");
        assert_eq!(encode_text(&Value::Float(2.0)).unwrap(), "2");
        assert_eq!(decode_text("2.0").unwrap(), Value::Int(2));
        assert_eq!(decode_text("1e3").unwrap(), Value::Int(1000));
        assert_eq!(
            encode_text(&Value::Int(9007199254740993)).unwrap(),
            "9007199254740992"
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let e = decode_text(r#"{"a": 1, "a": 2}"#).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::InvalidLegacyFormat);
        assert_eq!(e.offset, Some(9));
    }

    #[test]
    fn natural_keys_come_first() {
        let v = decode_text(r#"{"b": 1, "10": 2, "a": 3, "2": 4}"#).unwrap();
        let keys: Vec<&String> = v.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["2", "10", "b", "a"]);
        let map: Map = [("z", 1), ("1", 2)].into_iter().collect();
        assert_eq!(
            encode_text(&Value::Map(map)).unwrap(),
            "{\n  \"1\": 2,\n  \"z\": 1\n}"
        );
    }

    #[test]
    fn errors_are_coarse() {
        let e = decode_text("[1,").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::InvalidLegacyFormat);
        assert_eq!(e.offset, Some(3));
        let e = decode_text("1e999").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::InvalidLegacyFormat);
    }

    #[test]
    fn unrepresentable_values() {
        use crate::error::EncodeErrorKind;
        let e = encode_text(&Value::bytes(vec![1])).unwrap_err();
        assert_eq!(e.kind, EncodeErrorKind::UnsupportedFormat);
        let e = encode_text(&Value::Array(vec![Value::tagged(1, 1)])).unwrap_err();
        assert_eq!(e.kind, EncodeErrorKind::UnsupportedFormat);
        assert_eq!(e.path.to_string(), "/0");
        let e = encode_text(&Value::Float(f64::NAN)).unwrap_err();
        assert_eq!(e.kind, EncodeErrorKind::NonFiniteNumber);
    }

    #[test]
    fn frames_and_text_agree() {
        let v = decode_text(r#"{"type": "post", "text": "hi"}"#).unwrap();
        let buf = encode_bytes(&v).unwrap();
        assert_eq!(&buf[..4], &(buf.len() as u32 - 4).to_be_bytes());
        assert_eq!(decode_bytes(&buf).unwrap(), v);
    }

    #[test]
    fn frame_errors() {
        let e = decode_bytes(&[0, 0]).unwrap_err();
        assert_eq!((e.kind, e.offset), (ParseErrorKind::InvalidLegacyFormat, Some(0)));
        let e = decode_bytes(&[0, 0, 0, 5, b'1']).unwrap_err();
        assert_eq!((e.kind, e.offset), (ParseErrorKind::InvalidLegacyFormat, Some(4)));
        let e = decode_bytes(&[0, 0, 0, 1, b'1', b'2']).unwrap_err();
        assert_eq!((e.kind, e.offset), (ParseErrorKind::InvalidLegacyFormat, Some(5)));
        let e = decode_bytes(&[0, 0, 0, 2, b'[', b'x']).unwrap_err();
        assert_eq!((e.kind, e.offset), (ParseErrorKind::InvalidLegacyFormat, Some(5)));
        let e = decode_bytes(&[0, 0, 0, 1, 0xff]).unwrap_err();
        assert_eq!((e.kind, e.offset), (ParseErrorKind::InvalidUtf8, Some(4)));
    }

    #[test]
    fn iterates_concatenated_frames() {
        let mut buf = encode_bytes(&Value::Int(1)).unwrap();
        buf.extend(encode_bytes(&Value::from("two")).unwrap());
        buf.extend([0, 0, 0, 9]);
        let items: Vec<_> = frames(&buf).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Ok(Value::Int(1)));
        assert_eq!(items[1], Ok(Value::from("two")));
        let e = items[2].clone().unwrap_err();
        assert_eq!(e.offset, Some(buf.len()));
    }

    #[test]
    fn content_requirement() {
        let opts = LegacyDecodeOptions {
            require_content: true,
            ..Default::default()
        };
        assert!(decode_text_with_options(r#"{"type": "vote"}"#, &opts).is_ok());
        assert!(decode_text_with_options(r#"{"type": "x"}"#, &opts).is_err());
        assert!(decode_text_with_options("[]", &opts).is_err());
    }
}
