//! Error types shared by the codecs.

use thiserror::Error;
use vpack_buffers::BufferError;

use crate::path::Path;
use crate::rehydrate::ConstructorError;

/// What went wrong while decoding.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid utf-8")]
    InvalidUtf8,
    #[error("number out of range")]
    NumberOutOfRange,
    #[error("trailing data")]
    TrailingData,
    #[error("malformed header")]
    MalformedHeader,
    #[error("unexpected break")]
    UnexpectedBreak,
    #[error("truncated input")]
    TruncatedInput,
    #[error("unsupported tag")]
    UnsupportedTag,
    #[error("unsupported format")]
    UnsupportedFormat,
    #[error("invalid legacy format")]
    InvalidLegacyFormat,
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,
}

/// Malformed input. `offset` is a byte offset into the input when the
/// decoder can pinpoint the offending item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}{}: {message}", fmt_offset(.offset))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: Option<usize>,
    pub message: String,
}

fn fmt_offset(offset: &Option<usize>) -> String {
    match offset {
        Some(x) => format!(" at offset {x}"),
        None => String::new(),
    }
}

impl ParseError {
    pub fn at(kind: ParseErrorKind, offset: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            offset: Some(offset),
            message: message.into(),
        }
    }

    pub fn unlocated(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            offset: None,
            message: message.into(),
        }
    }

    /// Shifts the offset by `base`, for errors raised on a sub-slice.
    pub(crate) fn shifted(mut self, base: usize) -> Self {
        self.offset = self.offset.map(|x| x + base);
        self
    }
}

impl From<BufferError> for ParseError {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::EndOfBuffer { offset } => {
                ParseError::at(ParseErrorKind::TruncatedInput, offset, "input ended mid-item")
            }
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeErrorKind {
    #[error("non-finite number")]
    NonFiniteNumber,
    #[error("unsupported format")]
    UnsupportedFormat,
}

/// A value the target format cannot represent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at '{path}': {message}")]
pub struct EncodeError {
    pub kind: EncodeErrorKind,
    pub path: Path,
    pub message: String,
}

impl EncodeError {
    pub fn new(kind: EncodeErrorKind, path: &Path, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.clone(),
            message: message.into(),
        }
    }
}

/// Umbrella error for entry points that decode and rehydrate in one call.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Constructor(#[from] ConstructorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset_when_known() {
        let e = ParseError::at(ParseErrorKind::UnexpectedToken, 5, "expected a value");
        assert_eq!(e.to_string(), "unexpected token at offset 5: expected a value");
        let e = ParseError::unlocated(ParseErrorKind::InvalidLegacyFormat, "bad frame");
        assert_eq!(e.to_string(), "invalid legacy format: bad frame");
    }

    #[test]
    fn buffer_errors_become_truncation() {
        let e: ParseError = BufferError::EndOfBuffer { offset: 9 }.into();
        assert_eq!(e.kind, ParseErrorKind::TruncatedInput);
        assert_eq!(e.offset, Some(9));
    }
}
