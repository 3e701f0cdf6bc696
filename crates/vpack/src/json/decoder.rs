//! `JsonDecoder`: recursive-descent JSON reader that produces [`Value`].
//!
//! Works on UTF-8 bytes and reports every failure with the byte offset of
//! the offending character.

use base64::Engine;

use super::{Dialect, JsonDecodeOptions, BIN_PREFIX};
use crate::error::{ParseError, ParseErrorKind};
use crate::legacy::order::{legacy_number, sort_legacy_keys};
use crate::value::{Map, Value};

pub struct JsonDecoder<'a> {
    data: &'a [u8],
    x: usize,
    depth: usize,
    opts: &'a JsonDecodeOptions,
    dialect: Dialect,
}

impl<'a> JsonDecoder<'a> {
    /// `data` must be valid UTF-8; [`super::decode_slice`] checks that.
    pub fn new(data: &'a [u8], opts: &'a JsonDecodeOptions) -> Self {
        Self {
            data,
            x: 0,
            depth: 0,
            opts,
            dialect: Dialect::Json,
        }
    }

    /// Legacy data model: every number is a double, duplicate keys are
    /// rejected and object entries come out in legacy order.
    pub(crate) fn legacy(data: &'a [u8], opts: &'a JsonDecodeOptions) -> Self {
        Self {
            dialect: Dialect::Legacy,
            ..Self::new(data, opts)
        }
    }

    /// Decodes exactly one document; only whitespace may follow it.
    pub fn decode(&mut self) -> Result<Value, ParseError> {
        let value = self.read_any()?;
        self.skip_whitespace();
        if self.x < self.data.len() {
            return Err(self.err(ParseErrorKind::TrailingData, "data after the top-level value"));
        }
        Ok(value)
    }

    fn err(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::at(kind, self.x, message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.data.get(self.x) {
            None => self.err(ParseErrorKind::UnexpectedEnd, format!("expected {expected}")),
            Some(&b) => self.err(
                ParseErrorKind::UnexpectedToken,
                format!("expected {expected}, found {}", describe(b)),
            ),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.x).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.x += 1;
        }
    }

    fn read_any(&mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'"') => self.read_str_value(),
            Some(b'{') => self.read_obj(),
            Some(b'[') => self.read_arr(),
            Some(b't') => self.read_literal("true", Value::Bool(true)),
            Some(b'f') => self.read_literal("false", Value::Bool(false)),
            Some(b'n') => self.read_literal("null", Value::Null),
            Some(b'-' | b'0'..=b'9') => self.read_num(),
            _ => Err(self.unexpected("a value")),
        }
    }

    fn read_literal(&mut self, word: &'static str, value: Value) -> Result<Value, ParseError> {
        for &expected in word.as_bytes() {
            if self.peek() != Some(expected) {
                return Err(self.unexpected(word));
            }
            self.x += 1;
        }
        Ok(value)
    }

    fn read_digits(&mut self) -> usize {
        let start = self.x;
        while let Some(b'0'..=b'9') = self.peek() {
            self.x += 1;
        }
        self.x - start
    }

    fn read_num(&mut self) -> Result<Value, ParseError> {
        let start = self.x;
        if self.peek() == Some(b'-') {
            self.x += 1;
        }
        match self.peek() {
            // A leading zero stands alone; whatever digit follows is left
            // for the caller to reject.
            Some(b'0') => self.x += 1,
            Some(b'1'..=b'9') => {
                self.read_digits();
            }
            _ => return Err(self.unexpected("a digit")),
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.x += 1;
            if self.read_digits() == 0 {
                return Err(self.unexpected("a digit after the decimal point"));
            }
        }
        if let Some(b'e' | b'E') = self.peek() {
            is_float = true;
            self.x += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.x += 1;
            }
            if self.read_digits() == 0 {
                return Err(self.unexpected("a digit in the exponent"));
            }
        }
        // The scanned range is ASCII by construction.
        let text = std::str::from_utf8(&self.data[start..self.x])
            .map_err(|_| ParseError::at(ParseErrorKind::InvalidUtf8, start, "number"))?;
        if !is_float && self.dialect == Dialect::Json {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::Int(i));
            }
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(match self.dialect {
                Dialect::Json => Value::Float(f),
                Dialect::Legacy => legacy_number(f),
            }),
            _ => Err(ParseError::at(
                ParseErrorKind::NumberOutOfRange,
                start,
                format!("{text} does not fit in a 64-bit float"),
            )),
        }
    }

    /// Only an escape-free literal can carry bytes; text that merely starts
    /// with the data URI prefix is written with an escape.
    fn read_str_value(&mut self) -> Result<Value, ParseError> {
        let (s, escaped) = self.read_str_raw()?;
        if self.opts.binary_data_uri && !escaped {
            if let Some(b64) = s.strip_prefix(BIN_PREFIX) {
                if let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(b64) {
                    return Ok(Value::Bytes(bytes));
                }
            }
        }
        Ok(Value::Text(s))
    }

    fn read_str(&mut self) -> Result<String, ParseError> {
        self.read_str_raw().map(|(s, _)| s)
    }

    /// Reads a quoted string; the cursor must be on the opening quote. The
    /// flag is set when the literal contained any escape sequence.
    fn read_str_raw(&mut self) -> Result<(String, bool), ParseError> {
        let open = self.x;
        self.x += 1;
        let mut buf: Vec<u8> = Vec::new();
        let mut run = self.x;
        let mut escaped = false;
        loop {
            let Some(b) = self.peek() else {
                return Err(ParseError::at(
                    ParseErrorKind::UnterminatedString,
                    open,
                    "string is missing its closing quote",
                ));
            };
            match b {
                b'"' => {
                    buf.extend_from_slice(&self.data[run..self.x]);
                    self.x += 1;
                    break;
                }
                b'\\' => {
                    buf.extend_from_slice(&self.data[run..self.x]);
                    self.read_escape(&mut buf)?;
                    run = self.x;
                    escaped = true;
                }
                0x00..=0x1f => {
                    return Err(self.err(
                        ParseErrorKind::UnexpectedToken,
                        format!("unescaped control character {}", describe(b)),
                    ))
                }
                _ => self.x += 1,
            }
        }
        let s = String::from_utf8(buf)
            .map_err(|_| ParseError::at(ParseErrorKind::InvalidUtf8, open, "string is not utf-8"))?;
        Ok((s, escaped))
    }

    fn read_escape(&mut self, buf: &mut Vec<u8>) -> Result<(), ParseError> {
        let backslash = self.x;
        let invalid = |msg: &str| ParseError::at(ParseErrorKind::InvalidEscape, backslash, msg);
        self.x += 1;
        let Some(b) = self.peek() else {
            return Err(ParseError::at(
                ParseErrorKind::UnterminatedString,
                backslash,
                "input ends inside an escape sequence",
            ));
        };
        self.x += 1;
        let ch = match b {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let hi = self.read_hex4().ok_or_else(|| invalid("expected four hex digits"))?;
                match hi {
                    0xd800..=0xdbff => {
                        if self.data.get(self.x..self.x + 2) != Some(&b"\\u"[..]) {
                            return Err(invalid("high surrogate without a low surrogate"));
                        }
                        self.x += 2;
                        let lo = self
                            .read_hex4()
                            .ok_or_else(|| invalid("expected four hex digits"))?;
                        if !(0xdc00..=0xdfff).contains(&lo) {
                            return Err(invalid("high surrogate without a low surrogate"));
                        }
                        let cp = 0x10000 + (((hi - 0xd800) << 10) | (lo - 0xdc00));
                        char::from_u32(cp).ok_or_else(|| invalid("invalid code point"))?
                    }
                    0xdc00..=0xdfff => return Err(invalid("unpaired low surrogate")),
                    _ => char::from_u32(hi).ok_or_else(|| invalid("invalid code point"))?,
                }
            }
            _ => return Err(invalid("unknown escape character")),
        };
        let mut tmp = [0u8; 4];
        buf.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
        Ok(())
    }

    fn read_hex4(&mut self) -> Option<u32> {
        let digits = self.data.get(self.x..self.x + 4)?;
        let mut n = 0u32;
        for &d in digits {
            n = (n << 4) | (d as char).to_digit(16)?;
        }
        self.x += 4;
        Some(n)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.opts.max_depth {
            return Err(self.err(
                ParseErrorKind::DepthLimitExceeded,
                format!("nesting deeper than {}", self.opts.max_depth),
            ));
        }
        Ok(())
    }

    fn read_arr(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.x += 1;
        let mut arr = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.x += 1;
            self.depth -= 1;
            return Ok(Value::Array(arr));
        }
        loop {
            arr.push(self.read_any()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.x += 1,
                Some(b']') => {
                    self.x += 1;
                    break;
                }
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
        self.depth -= 1;
        Ok(Value::Array(arr))
    }

    fn read_obj(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.x += 1;
        let mut obj = Map::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.x += 1;
            self.depth -= 1;
            return Ok(Value::Map(obj));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.unexpected("a string key"));
            }
            let key_start = self.x;
            let key = self.read_str()?;
            self.skip_whitespace();
            if self.peek() != Some(b':') {
                return Err(self.unexpected("':'"));
            }
            self.x += 1;
            let val = self.read_any()?;
            if self.dialect == Dialect::Legacy && obj.contains_key(&key) {
                return Err(ParseError::at(
                    ParseErrorKind::InvalidLegacyFormat,
                    key_start,
                    format!("duplicate key {key:?}"),
                ));
            }
            // Last occurrence of a duplicate key wins.
            obj.insert(key, val);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.x += 1,
                Some(b'}') => {
                    self.x += 1;
                    break;
                }
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }
        self.depth -= 1;
        if self.dialect == Dialect::Legacy {
            sort_legacy_keys(&mut obj);
        }
        Ok(Value::Map(obj))
    }
}

fn describe(b: u8) -> String {
    if b.is_ascii_graphic() {
        format!("'{}'", b as char)
    } else {
        format!("byte 0x{b:02x}")
    }
}
