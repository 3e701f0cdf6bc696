//! Length-prefixed binary records: a big-endian `u32` payload length
//! followed by exactly that many bytes of legacy text.

use vpack_buffers::{Reader, Writer};

use super::{decode_text_bytes, LegacyDecodeOptions};
use crate::error::{EncodeError, EncodeErrorKind, ParseError, ParseErrorKind};
use crate::path::Path;
use crate::value::Value;

pub const FRAME_HEADER_LEN: usize = 4;

pub(crate) fn write_frame(writer: &mut Writer, text: &str) -> Result<(), EncodeError> {
    writer.u32(frame_len(text.len())?);
    writer.utf8(text);
    Ok(())
}

/// The length prefix is 32 bits wide.
fn frame_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| {
        EncodeError::new(
            EncodeErrorKind::UnsupportedFormat,
            &Path::root(),
            format!("{len} bytes of text do not fit a 32-bit record length"),
        )
    })
}

/// Splits one record off the front of `data`, returning its payload and
/// the total record length.
fn read_frame(data: &[u8]) -> Result<(&[u8], usize), ParseError> {
    let mut reader = Reader::new(data);
    let len = reader.try_u32().map_err(|_| {
        ParseError::at(
            ParseErrorKind::InvalidLegacyFormat,
            0,
            "record is missing its length prefix",
        )
    })? as usize;
    let payload = reader.try_buf(len).map_err(|_| {
        ParseError::at(
            ParseErrorKind::InvalidLegacyFormat,
            FRAME_HEADER_LEN,
            format!(
                "record announces {len} bytes but only {} follow",
                data.len() - FRAME_HEADER_LEN
            ),
        )
    })?;
    Ok((payload, reader.x))
}

/// Decodes a buffer holding exactly one record.
pub(crate) fn decode_frame(data: &[u8], opts: &LegacyDecodeOptions) -> Result<Value, ParseError> {
    let (payload, used) = read_frame(data)?;
    if used < data.len() {
        return Err(ParseError::at(
            ParseErrorKind::InvalidLegacyFormat,
            used,
            format!("{} bytes after the record", data.len() - used),
        ));
    }
    decode_text_bytes(payload, opts).map_err(|e| e.shifted(FRAME_HEADER_LEN))
}

/// Iterator over concatenated records. Stops after the first error.
pub struct Frames<'a> {
    data: &'a [u8],
    x: usize,
    opts: LegacyDecodeOptions,
    failed: bool,
}

impl<'a> Frames<'a> {
    pub(crate) fn new(data: &'a [u8], opts: LegacyDecodeOptions) -> Self {
        Self {
            data,
            x: 0,
            opts,
            failed: false,
        }
    }
}

impl Iterator for Frames<'_> {
    type Item = Result<Value, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.x >= self.data.len() {
            return None;
        }
        let data = self.data;
        let base = self.x;
        let result = read_frame(&data[base..]).and_then(|(payload, used)| {
            self.x += used;
            decode_text_bytes(payload, &self.opts).map_err(|e| e.shifted(FRAME_HEADER_LEN))
        });
        if result.is_err() {
            self.failed = true;
        }
        Some(result.map_err(|e| e.shifted(base)))
    }
}
