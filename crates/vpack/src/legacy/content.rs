//! Checks for values used as message content.

use crate::error::{ParseError, ParseErrorKind};
use crate::value::Value;

/// Bounds on the UTF-16 length of a content `type` string.
pub const CONTENT_TYPE_MIN_LEN: usize = 3;
pub const CONTENT_TYPE_MAX_LEN: usize = 53;

/// Length of `s` in UTF-16 code units, which is how the legacy data model
/// measures strings.
pub fn legacy_length(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Requires a map with a string `type` entry of acceptable length.
pub fn check_content(value: &Value) -> Result<(), ParseError> {
    let invalid = |msg: String| ParseError::unlocated(ParseErrorKind::InvalidLegacyFormat, msg);
    let Value::Map(map) = value else {
        return Err(invalid(format!(
            "content must be an object, found {}",
            value.type_name()
        )));
    };
    match map.get("type") {
        None => Err(invalid("content had no `type` entry".to_owned())),
        Some(Value::Text(ty)) => {
            let len = legacy_length(ty);
            if (CONTENT_TYPE_MIN_LEN..=CONTENT_TYPE_MAX_LEN).contains(&len) {
                Ok(())
            } else {
                Err(invalid(format!(
                    "content type must be {CONTENT_TYPE_MIN_LEN} to {CONTENT_TYPE_MAX_LEN} characters long, got {len}"
                )))
            }
        }
        Some(other) => Err(invalid(format!(
            "content type must be a string, found {}",
            other.type_name()
        ))),
    }
}
