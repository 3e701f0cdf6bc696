//! Host-facing entry points, one function per operation a binding layer
//! exposes.

use crate::cbor::{self, CborEncodeOptions};
use crate::error::{EncodeError, Error, ParseError};
use crate::json;
use crate::legacy;
use crate::rehydrate::{rehydrate, Hydrated, Registry};
use crate::validate::{self as validation, Input, Schema, ValidationIssue};
use crate::value::Value;

/// `parseJson`
pub fn parse_json(text: &str) -> Result<Value, ParseError> {
    tracing::debug!(len = text.len(), "parse_json");
    json::decode(text)
}

/// `parseCbor`
pub fn parse_cbor(data: &[u8]) -> Result<Value, ParseError> {
    tracing::debug!(len = data.len(), "parse_cbor");
    cbor::decode(data)
}

/// `parseJsonWithConstructor`
pub fn parse_json_with_constructor(text: &str, registry: &Registry) -> Result<Hydrated, Error> {
    tracing::debug!(len = text.len(), rules = registry.len(), "parse_json_with_constructor");
    let value = json::decode(text)?;
    Ok(rehydrate(value, registry)?)
}

/// `parseCborWithConstructor`
pub fn parse_cbor_with_constructor(data: &[u8], registry: &Registry) -> Result<Hydrated, Error> {
    tracing::debug!(len = data.len(), rules = registry.len(), "parse_cbor_with_constructor");
    let value = cbor::decode(data)?;
    Ok(rehydrate(value, registry)?)
}

/// `toJson`
pub fn to_json(value: &Value) -> Result<String, EncodeError> {
    tracing::debug!(kind = value.type_name(), "to_json");
    json::encode(value)
}

/// `toCbor`
pub fn to_cbor(value: &Value) -> Vec<u8> {
    tracing::debug!(kind = value.type_name(), "to_cbor");
    cbor::encode(value)
}

/// `parseLegacy`
pub fn parse_legacy(text: &str) -> Result<Value, ParseError> {
    tracing::debug!(len = text.len(), "parse_legacy");
    legacy::decode_text(text)
}

/// `parseLegacyBuffer`: one length-prefixed record.
pub fn parse_legacy_buffer(data: &[u8]) -> Result<Value, ParseError> {
    tracing::debug!(len = data.len(), "parse_legacy_buffer");
    legacy::decode_bytes(data)
}

/// `parseLegacyWithConstructor`
pub fn parse_legacy_with_constructor(text: &str, registry: &Registry) -> Result<Hydrated, Error> {
    tracing::debug!(len = text.len(), rules = registry.len(), "parse_legacy_with_constructor");
    let value = legacy::decode_text(text)?;
    Ok(rehydrate(value, registry)?)
}

/// `encodeCbor`: [`to_cbor`] with encoder options.
pub fn encode_cbor(value: &Value, opts: &CborEncodeOptions) -> Vec<u8> {
    tracing::debug!(kind = value.type_name(), sort_keys = opts.sort_keys, "encode_cbor");
    cbor::encode_with_options(value, opts)
}

/// `stringifyLegacy`
pub fn stringify_legacy(value: &Value) -> Result<String, EncodeError> {
    tracing::debug!(kind = value.type_name(), "stringify_legacy");
    legacy::encode_text(value)
}

/// `validate`
pub fn validate(input: Input<'_>, schema: &Schema) -> Vec<ValidationIssue> {
    let issues = validation::validate_input(input, schema);
    tracing::debug!(issues = issues.len(), "validate");
    issues
}
