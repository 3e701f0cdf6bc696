//! `CborDecoder`: single-pass CBOR reader producing [`Value`].
//!
//! Errors carry the byte offset of the item whose head or payload was bad.

use vpack_buffers::Reader;

use super::constants::*;
use super::{CborDecodeOptions, TagPolicy};
use crate::constants::MAX_PREALLOC;
use crate::error::{ParseError, ParseErrorKind};
use crate::value::{Map, Value};

pub struct CborDecoder<'a> {
    reader: Reader<'a>,
    opts: &'a CborDecodeOptions,
    depth: usize,
}

impl<'a> CborDecoder<'a> {
    pub fn new(data: &'a [u8], opts: &'a CborDecodeOptions) -> Self {
        Self {
            reader: Reader::new(data),
            opts,
            depth: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.reader.x
    }

    /// Decodes one item and requires the input to end right after it.
    pub fn decode(&mut self) -> Result<Value, ParseError> {
        let value = self.read_any()?;
        if !self.reader.is_empty() {
            return Err(ParseError::at(
                ParseErrorKind::TrailingData,
                self.reader.x,
                format!("{} bytes after the top-level item", self.reader.size()),
            ));
        }
        Ok(value)
    }

    pub fn read_any(&mut self) -> Result<Value, ParseError> {
        let start = self.reader.x;
        let octet = self.reader.try_u8().map_err(|_| truncated(start))?;
        if octet == BREAK {
            return Err(ParseError::at(
                ParseErrorKind::UnexpectedBreak,
                start,
                "break outside an indefinite-length item",
            ));
        }
        self.read_item(octet, start)
    }

    fn read_item(&mut self, octet: u8, start: usize) -> Result<Value, ParseError> {
        let major = octet >> 5;
        let minor = octet & MINOR_MASK;
        match major {
            MAJOR_UIN => {
                let uint = self.read_definite_arg(minor, start)?;
                Ok(match i64::try_from(uint) {
                    Ok(i) => Value::Int(i),
                    Err(_) => Value::Float(uint as f64),
                })
            }
            MAJOR_NIN => {
                let uint = self.read_definite_arg(minor, start)?;
                Ok(match i64::try_from(uint) {
                    Ok(i) => Value::Int(-1 - i),
                    Err(_) => Value::Float(-1.0 - uint as f64),
                })
            }
            MAJOR_BIN => Ok(Value::Bytes(self.read_bytes(major, minor, start)?)),
            MAJOR_STR => {
                let payload = self.read_bytes(major, minor, start)?;
                String::from_utf8(payload).map(Value::Text).map_err(|_| {
                    ParseError::at(ParseErrorKind::InvalidUtf8, start, "text string is not utf-8")
                })
            }
            MAJOR_ARR => self.read_arr(minor, start),
            MAJOR_MAP => self.read_obj(minor, start),
            MAJOR_TAG => self.read_tag(minor, start),
            _ => self.read_tkn(minor, start),
        }
    }

    /// Reads the argument that follows a head. `None` means indefinite.
    fn read_arg(&mut self, minor: u8, start: usize) -> Result<Option<u64>, ParseError> {
        let r = &mut self.reader;
        let arg = match minor {
            0..=23 => minor as u64,
            24 => r.try_u8().map_err(|_| truncated(start))? as u64,
            25 => r.try_u16().map_err(|_| truncated(start))? as u64,
            26 => r.try_u32().map_err(|_| truncated(start))? as u64,
            27 => r.try_u64().map_err(|_| truncated(start))?,
            MINOR_INDEFINITE => return Ok(None),
            _ => {
                return Err(ParseError::at(
                    ParseErrorKind::MalformedHeader,
                    start,
                    format!("reserved additional information {minor}"),
                ))
            }
        };
        Ok(Some(arg))
    }

    fn read_definite_arg(&mut self, minor: u8, start: usize) -> Result<u64, ParseError> {
        self.read_arg(minor, start)?.ok_or_else(|| {
            ParseError::at(
                ParseErrorKind::MalformedHeader,
                start,
                "indefinite length not allowed here",
            )
        })
    }

    fn read_len(&mut self, minor: u8, start: usize) -> Result<Option<usize>, ParseError> {
        match self.read_arg(minor, start)? {
            None => Ok(None),
            // A length beyond the address space can never be satisfied.
            Some(len) => usize::try_from(len).map(Some).map_err(|_| truncated(start)),
        }
    }

    fn read_bytes(&mut self, major: u8, minor: u8, start: usize) -> Result<Vec<u8>, ParseError> {
        match self.read_len(minor, start)? {
            Some(len) => Ok(self
                .reader
                .try_buf(len)
                .map_err(|_| truncated(start))?
                .to_vec()),
            None => {
                let mut out = Vec::new();
                loop {
                    let chunk_start = self.reader.x;
                    let octet = self.reader.try_u8().map_err(|_| truncated(start))?;
                    if octet == BREAK {
                        return Ok(out);
                    }
                    let chunk_minor = octet & MINOR_MASK;
                    if octet >> 5 != major || chunk_minor == MINOR_INDEFINITE {
                        return Err(ParseError::at(
                            ParseErrorKind::MalformedHeader,
                            chunk_start,
                            "indefinite string chunk must be a definite string of the same type",
                        ));
                    }
                    let len = self.read_len(chunk_minor, chunk_start)?.unwrap_or(0);
                    let chunk = self
                        .reader
                        .try_buf(len)
                        .map_err(|_| truncated(chunk_start))?;
                    out.extend_from_slice(chunk);
                }
            }
        }
    }

    fn enter(&mut self, start: usize) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.opts.max_depth {
            return Err(ParseError::at(
                ParseErrorKind::DepthLimitExceeded,
                start,
                format!("nesting deeper than {}", self.opts.max_depth),
            ));
        }
        Ok(())
    }

    /// Consumes a break byte if one is next.
    fn at_break(&mut self, start: usize) -> Result<bool, ParseError> {
        if self.reader.try_peek().map_err(|_| truncated(start))? == BREAK {
            self.reader.x += 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn read_arr(&mut self, minor: u8, start: usize) -> Result<Value, ParseError> {
        let len = self.read_len(minor, start)?;
        self.enter(start)?;
        let items = match len {
            Some(len) => {
                let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
                for _ in 0..len {
                    items.push(self.read_any()?);
                }
                items
            }
            None => {
                let mut items = Vec::new();
                while !self.at_break(start)? {
                    items.push(self.read_any()?);
                }
                items
            }
        };
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn read_obj(&mut self, minor: u8, start: usize) -> Result<Value, ParseError> {
        let len = self.read_len(minor, start)?;
        self.enter(start)?;
        let mut map;
        match len {
            Some(len) => {
                map = Map::with_capacity(len.min(MAX_PREALLOC));
                for _ in 0..len {
                    self.read_entry(&mut map)?;
                }
            }
            None => {
                map = Map::new();
                while !self.at_break(start)? {
                    self.read_entry(&mut map)?;
                }
            }
        }
        self.depth -= 1;
        Ok(Value::Map(map))
    }

    fn read_entry(&mut self, map: &mut Map) -> Result<(), ParseError> {
        let key_start = self.reader.x;
        let key = match self.read_any()? {
            Value::Text(key) => key,
            other => {
                return Err(ParseError::at(
                    ParseErrorKind::UnsupportedFormat,
                    key_start,
                    format!("map key must be text, found {}", other.type_name()),
                ))
            }
        };
        let value = self.read_any()?;
        map.insert(key, value);
        Ok(())
    }

    fn read_tag(&mut self, minor: u8, start: usize) -> Result<Value, ParseError> {
        let tag = self.read_definite_arg(minor, start)?;
        if self.opts.tags == TagPolicy::Reject {
            return Err(ParseError::at(
                ParseErrorKind::UnsupportedTag,
                start,
                format!("tag {tag} is not accepted"),
            ));
        }
        self.enter(start)?;
        let inner = self.read_any()?;
        self.depth -= 1;
        Ok(match self.opts.tags {
            TagPolicy::Drop => {
                tracing::warn!(tag, offset = start, "dropping cbor tag");
                inner
            }
            _ => Value::Tagged(tag, Box::new(inner)),
        })
    }

    fn read_tkn(&mut self, minor: u8, start: usize) -> Result<Value, ParseError> {
        let r = &mut self.reader;
        match minor {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 | 23 => Ok(Value::Null),
            25 => {
                let bits = r.try_u16().map_err(|_| truncated(start))?;
                Ok(Value::Float(decode_f16(bits)))
            }
            26 => Ok(Value::Float(r.try_f32().map_err(|_| truncated(start))? as f64)),
            27 => Ok(Value::Float(r.try_f64().map_err(|_| truncated(start))?)),
            0..=19 | 24 => Err(ParseError::at(
                ParseErrorKind::UnsupportedFormat,
                start,
                "simple values other than false, true, null and undefined are not supported",
            )),
            _ => Err(ParseError::at(
                ParseErrorKind::MalformedHeader,
                start,
                format!("reserved additional information {minor}"),
            )),
        }
    }
}

fn truncated(start: usize) -> ParseError {
    ParseError::at(ParseErrorKind::TruncatedInput, start, "input ended inside the item")
}

/// Half-precision bits to `f64`.
pub(crate) fn decode_f16(bits: u16) -> f64 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exp = ((bits >> 10) & 0x1f) as i32;
    let frac = (bits & 0x3ff) as f64;
    let magnitude = match exp {
        0 => frac * 2f64.powi(-24),
        31 if frac == 0.0 => f64::INFINITY,
        31 => f64::NAN,
        _ => (1.0 + frac / 1024.0) * 2f64.powi(exp - 15),
    };
    sign * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(data: &[u8]) -> Result<Value, ParseError> {
        let opts = CborDecodeOptions::default();
        CborDecoder::new(data, &opts).decode()
    }

    fn err(data: &[u8]) -> (ParseErrorKind, Option<usize>) {
        let e = dec(data).unwrap_err();
        (e.kind, e.offset)
    }

    #[test]
    fn integers() {
        assert_eq!(dec(&[0x17]).unwrap(), Value::Int(23));
        assert_eq!(dec(&[0x18, 0x18]).unwrap(), Value::Int(24));
        assert_eq!(dec(&[0x19, 0xff, 0xff]).unwrap(), Value::Int(65535));
        assert_eq!(dec(&[0x38, 0x63]).unwrap(), Value::Int(-100));
        assert_eq!(
            dec(&[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap(),
            Value::Float(u64::MAX as f64)
        );
        assert_eq!(
            dec(&[0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn half_floats() {
        assert_eq!(decode_f16(0x3c00), 1.0);
        assert_eq!(decode_f16(0xc400), -4.0);
        assert_eq!(decode_f16(0x0001), 2f64.powi(-24));
        assert_eq!(decode_f16(0x7bff), 65504.0);
        assert_eq!(decode_f16(0x7c00), f64::INFINITY);
        assert_eq!(decode_f16(0xfc00), f64::NEG_INFINITY);
        assert!(decode_f16(0x7e00).is_nan());
    }

    #[test]
    fn simple_values() {
        assert_eq!(dec(&[0xf4]).unwrap(), Value::Bool(false));
        assert_eq!(dec(&[0xf5]).unwrap(), Value::Bool(true));
        assert_eq!(dec(&[0xf6]).unwrap(), Value::Null);
        assert_eq!(dec(&[0xf7]).unwrap(), Value::Null);
        assert_eq!(err(&[0xf0]), (ParseErrorKind::UnsupportedFormat, Some(0)));
    }

    #[test]
    fn indefinite_lengths() {
        assert_eq!(
            dec(&[0x9f, 0x01, 0x02, 0xff]).unwrap(),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            dec(&[0x7f, 0x62, b'a', b'b', 0x61, b'c', 0xff]).unwrap(),
            Value::Text("abc".into())
        );
        assert_eq!(dec(&[0x5f, 0x41, 1, 0x40, 0xff]).unwrap(), Value::bytes(vec![1]));
        let map = dec(&[0xbf, 0x61, b'a', 0x01, 0xff]).unwrap();
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
    }

    #[test]
    fn malformed_items() {
        assert_eq!(err(&[0x1c]), (ParseErrorKind::MalformedHeader, Some(0)));
        assert_eq!(err(&[0x1f]), (ParseErrorKind::MalformedHeader, Some(0)));
        assert_eq!(err(&[0x7f, 0x41, 0x00, 0xff]), (ParseErrorKind::MalformedHeader, Some(1)));
        assert_eq!(err(&[0x81, 0xff]), (ParseErrorKind::UnexpectedBreak, Some(1)));
        assert_eq!(err(&[0xff]), (ParseErrorKind::UnexpectedBreak, Some(0)));
        assert_eq!(err(&[0x82, 0x01]), (ParseErrorKind::TruncatedInput, Some(2)));
        assert_eq!(err(&[0x19, 0x01]), (ParseErrorKind::TruncatedInput, Some(0)));
        assert_eq!(err(&[0x63, b'a']), (ParseErrorKind::TruncatedInput, Some(0)));
        assert_eq!(err(&[0x62, 0xc3, 0x28]), (ParseErrorKind::InvalidUtf8, Some(0)));
        assert_eq!(err(&[0x01, 0x02]), (ParseErrorKind::TrailingData, Some(1)));
        assert_eq!(err(&[0xa1, 0x01, 0x02]), (ParseErrorKind::UnsupportedFormat, Some(1)));
        assert_eq!(err(&[]), (ParseErrorKind::TruncatedInput, Some(0)));
    }

    #[test]
    fn tag_policies() {
        let data = [0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0];
        assert_eq!(dec(&data).unwrap(), Value::tagged(1, 1363896240i64));

        let drop = CborDecodeOptions {
            tags: TagPolicy::Drop,
            ..Default::default()
        };
        assert_eq!(
            CborDecoder::new(&data, &drop).decode().unwrap(),
            Value::Int(1363896240)
        );

        let reject = CborDecodeOptions {
            tags: TagPolicy::Reject,
            ..Default::default()
        };
        let e = CborDecoder::new(&data, &reject).decode().unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::UnsupportedTag);
    }

    #[test]
    fn depth_limit_and_huge_lengths() {
        let opts = CborDecodeOptions {
            max_depth: 2,
            ..Default::default()
        };
        assert!(CborDecoder::new(&[0x81, 0x80], &opts).decode().is_ok());
        let e = CborDecoder::new(&[0x81, 0x81, 0x80], &opts).decode().unwrap_err();
        assert_eq!((e.kind, e.offset), (ParseErrorKind::DepthLimitExceeded, Some(2)));

        // A claimed length far beyond the input fails without allocating it.
        let e = dec(&[0x9b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::TruncatedInput);
    }
}
