//! `CborEncoder`: shortest-form CBOR writer.

use vpack_buffers::Writer;

use super::constants::*;
use super::CborEncodeOptions;
use crate::util::obj_key_cmp;
use crate::value::{Map, Value};

pub struct CborEncoder {
    pub writer: Writer,
    opts: CborEncodeOptions,
}

impl Default for CborEncoder {
    fn default() -> Self {
        Self::new(CborEncodeOptions::default())
    }
}

impl CborEncoder {
    pub fn new(opts: CborEncodeOptions) -> Self {
        Self {
            writer: Writer::new(),
            opts,
        }
    }

    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.write_any(value);
        self.writer.flush()
    }

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Null => self.writer.u8(NULL),
            Value::Bool(b) => self.writer.u8(if *b { TRUE } else { FALSE }),
            Value::Int(i) => self.write_integer(*i),
            Value::Float(f) => self.write_float(*f),
            Value::Text(s) => self.write_str(s),
            Value::Bytes(b) => self.write_bin(b),
            Value::Array(items) => {
                self.write_hdr(OVERLAY_ARR, items.len() as u64);
                for item in items {
                    self.write_any(item);
                }
            }
            Value::Map(map) => self.write_obj(map),
            Value::Tagged(tag, inner) => {
                self.write_hdr(OVERLAY_TAG, *tag);
                self.write_any(inner);
            }
        }
    }

    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_hdr(OVERLAY_UIN, int as u64);
        } else {
            // -1 - n never overflows for negative n.
            self.write_hdr(OVERLAY_NIN, (-1i64 - int) as u64);
        }
    }

    /// Writes a major-type head with its argument in the fewest bytes.
    pub fn write_hdr(&mut self, overlay: u8, arg: u64) {
        let w = &mut self.writer;
        if arg <= 23 {
            w.u8(overlay | arg as u8);
        } else if arg <= 0xff {
            w.u8(overlay | 24);
            w.u8(arg as u8);
        } else if arg <= 0xffff {
            w.u8u16(overlay | 25, arg as u16);
        } else if arg <= 0xffff_ffff {
            w.u8u32(overlay | 26, arg as u32);
        } else {
            w.u8u64(overlay | 27, arg);
        }
    }

    /// Non-finite values use half precision; others f32 when lossless.
    pub fn write_float(&mut self, float: f64) {
        if float.is_nan() {
            self.writer.u8u16(F16, F16_NAN);
        } else if float == f64::INFINITY {
            self.writer.u8u16(F16, F16_INFINITY);
        } else if float == f64::NEG_INFINITY {
            self.writer.u8u16(F16, F16_NEG_INFINITY);
        } else if is_float32(float) {
            self.writer.u8f32(F32, float as f32);
        } else {
            self.writer.u8f64(F64, float);
        }
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        self.write_hdr(OVERLAY_BIN, buf.len() as u64);
        self.writer.buf(buf);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_hdr(OVERLAY_STR, s.len() as u64);
        self.writer.utf8(s);
    }

    fn write_obj(&mut self, map: &Map) {
        self.write_hdr(OVERLAY_MAP, map.len() as u64);
        if self.opts.sort_keys {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| obj_key_cmp(a.0, b.0));
            for (key, value) in entries {
                self.write_str(key);
                self.write_any(value);
            }
        } else {
            for (key, value) in map {
                self.write_str(key);
                self.write_any(value);
            }
        }
    }
}
