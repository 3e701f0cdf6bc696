//! Structural validation.
//!
//! [`validate`] never fails: an empty issue list means the value conforms.

mod issue;
mod schema;
mod validator;

pub use issue::{IssueKind, ValidationIssue};
pub use schema::{Additional, Field, MapSchema, Schema};

use crate::constants::Format;
use crate::error::ParseError;
use crate::path::Path;
use crate::value::Value;
use validator::Validator;

/// Raw input for [`validate_input`].
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Json(&'a str),
    Cbor(&'a [u8]),
    Legacy(&'a str),
    LegacyFrame(&'a [u8]),
}

impl<'a> Input<'a> {
    /// Pairs bytes with a format tag.
    pub fn from_bytes(format: Format, data: &'a [u8]) -> Result<Self, ParseError> {
        let text = || {
            std::str::from_utf8(data).map_err(|e| {
                ParseError::at(
                    crate::error::ParseErrorKind::InvalidUtf8,
                    e.valid_up_to(),
                    "input is not valid utf-8",
                )
            })
        };
        Ok(match format {
            Format::Json => Input::Json(text()?),
            Format::Cbor => Input::Cbor(data),
            Format::Legacy => Input::Legacy(text()?),
            Format::LegacyFrame => Input::LegacyFrame(data),
        })
    }

    pub fn decode(self) -> Result<Value, ParseError> {
        match self {
            Input::Json(text) => crate::json::decode(text),
            Input::Cbor(data) => crate::cbor::decode(data),
            Input::Legacy(text) => crate::legacy::decode_text(text),
            Input::LegacyFrame(data) => crate::legacy::decode_bytes(data),
        }
    }
}

/// Checks `value` against `schema`, returning every issue in depth-first
/// pre-order.
pub fn validate(value: &Value, schema: &Schema) -> Vec<ValidationIssue> {
    let mut validator = Validator::new();
    validator.check(value, schema);
    validator.finish()
}

/// Decodes and validates raw input. Input that does not decode yields one
/// `Malformed` issue at the root.
pub fn validate_input(input: Input<'_>, schema: &Schema) -> Vec<ValidationIssue> {
    match input.decode() {
        Ok(value) => validate(&value, schema),
        Err(e) => vec![ValidationIssue {
            path: Path::root(),
            kind: IssueKind::Malformed,
            message: e.to_string(),
        }],
    }
}
