//! Command handlers behind the `vpack` binary. They work on byte buffers
//! so `main` only has to move bytes between stdin and stdout.

use serde_json::json;
use thiserror::Error;
use vpack::cbor::CborEncodeOptions;
use vpack::json::JsonEncodeOptions;
use vpack::validate::{validate_input, Input};
use vpack::{api, legacy, EncodeError, Format, IssueKind, ParseError, Path, Schema, ValidationIssue, Value};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {format} input: {source}")]
    Decode {
        format: Format,
        #[source]
        source: ParseError,
    },
    #[error("cannot write {format} output: {source}")]
    Encode {
        format: Format,
        #[source]
        source: EncodeError,
    },
    #[error("cannot render the report: {0}")]
    Report(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Output knobs for `vpack convert`. Legacy output ignores both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub pretty: bool,
    pub sort_keys: bool,
}

pub fn decode(format: Format, data: &[u8]) -> Result<Value, CliError> {
    Input::from_bytes(format, data)
        .and_then(Input::decode)
        .map_err(|source| CliError::Decode { format, source })
}

pub fn encode(format: Format, value: &Value, opts: ConvertOptions) -> Result<Vec<u8>, CliError> {
    let encoded = match format {
        Format::Json => {
            let json_opts = JsonEncodeOptions {
                pretty: opts.pretty,
                sort_keys: opts.sort_keys,
            };
            vpack::json::encode_with_options(value, &json_opts).map(String::into_bytes)
        }
        Format::Cbor => Ok(api::encode_cbor(
            value,
            &CborEncodeOptions {
                sort_keys: opts.sort_keys,
            },
        )),
        Format::Legacy => legacy::encode_text(value).map(String::into_bytes),
        Format::LegacyFrame => legacy::encode_bytes(value),
    };
    encoded.map_err(|source| CliError::Encode { format, source })
}

/// Decodes `data` as `from` and re-encodes it as `to`. Text output ends
/// with a newline.
pub fn convert(data: &[u8], from: Format, to: Format, opts: ConvertOptions) -> Result<Vec<u8>, CliError> {
    let value = decode(from, data)?;
    tracing::debug!(%from, %to, kind = value.type_name(), "converting");
    let mut out = encode(to, &value, opts)?;
    if to.is_text() {
        out.push(b'\n');
    }
    Ok(out)
}

/// A map schema that requires each of `keys` and allows anything else.
pub fn required_keys_schema<I, S>(keys: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter()
        .fold(Schema::map(), |schema, key| schema.required(key, Schema::Any))
        .into()
}

pub fn check(data: &[u8], from: Format, keys: &[String]) -> Vec<ValidationIssue> {
    let schema = required_keys_schema(keys.iter().cloned());
    match Input::from_bytes(from, data) {
        Ok(input) => validate_input(input, &schema),
        Err(e) => vec![ValidationIssue {
            path: Path::root(),
            kind: IssueKind::Malformed,
            message: e.to_string(),
        }],
    }
}

/// The JSON document `vpack validate` prints.
pub fn issues_report(issues: &[ValidationIssue]) -> Result<serde_json::Value, CliError> {
    Ok(json!({
        "valid": issues.is_empty(),
        "issues": serde_json::to_value(issues)?,
    }))
}
