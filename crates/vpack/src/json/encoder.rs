//! `JsonEncoder`: writes a [`Value`] as JSON text.

use super::{bytes_to_data_uri, Dialect, JsonEncodeOptions, BIN_PREFIX};
use crate::error::{EncodeError, EncodeErrorKind};
use crate::legacy::order::{legacy_key_cmp, MAX_SAFE_INTEGER};
use crate::path::Path;
use crate::util::escape::{write_escaped, write_quoted};
use crate::util::number::{format_ecmascript, format_json_float};
use crate::util::obj_key_cmp;
use crate::value::{Map, Value};

pub struct JsonEncoder {
    out: String,
    opts: JsonEncodeOptions,
    path: Path,
    indent: usize,
    dialect: Dialect,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new(JsonEncodeOptions::default())
    }
}

impl JsonEncoder {
    pub fn new(opts: JsonEncodeOptions) -> Self {
        Self {
            out: String::new(),
            opts,
            path: Path::root(),
            indent: 0,
            dialect: Dialect::Json,
        }
    }

    /// The legacy signing encoding: two-space indentation, ECMAScript
    /// number text, legacy key order, no bytes or tags.
    pub(crate) fn legacy() -> Self {
        Self {
            dialect: Dialect::Legacy,
            ..Self::new(JsonEncodeOptions {
                pretty: true,
                sort_keys: false,
            })
        }
    }

    pub fn encode(&mut self, value: &Value) -> Result<String, EncodeError> {
        self.out.clear();
        self.path = Path::root();
        self.indent = 0;
        self.write_any(value)?;
        Ok(std::mem::take(&mut self.out))
    }

    fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Int(i) => self.write_integer(*i),
            Value::Float(f) => self.write_float(*f)?,
            Value::Text(s) => self.write_text(s),
            Value::Array(items) => self.write_arr(items)?,
            Value::Map(map) => self.write_obj(map)?,
            Value::Bytes(_) | Value::Tagged(..) if self.dialect == Dialect::Legacy => {
                return Err(EncodeError::new(
                    EncodeErrorKind::UnsupportedFormat,
                    &self.path,
                    format!("{} values have no legacy representation", value.type_name()),
                ))
            }
            Value::Bytes(b) => write_quoted(&mut self.out, &bytes_to_data_uri(b)),
            Value::Tagged(_, inner) => self.write_any(inner)?,
        }
        Ok(())
    }

    fn write_integer(&mut self, int: i64) {
        // Legacy numbers are doubles; wider integers print as the double
        // they round to.
        if self.dialect == Dialect::Legacy && int.unsigned_abs() > MAX_SAFE_INTEGER {
            self.out.push_str(&format_ecmascript(int as f64));
        } else {
            self.out.push_str(&int.to_string());
        }
    }

    fn write_float(&mut self, f: f64) -> Result<(), EncodeError> {
        if !f.is_finite() {
            return Err(EncodeError::new(
                EncodeErrorKind::NonFiniteNumber,
                &self.path,
                format!("{f} has no finite representation"),
            ));
        }
        match self.dialect {
            Dialect::Json => self.out.push_str(&format_json_float(f)),
            Dialect::Legacy => self.out.push_str(&format_ecmascript(f)),
        }
        Ok(())
    }

    fn write_text(&mut self, s: &str) {
        match s.strip_prefix('d') {
            // Keeps the literal apart from an encoded byte string.
            Some(rest) if self.dialect == Dialect::Json && s.starts_with(BIN_PREFIX) => {
                self.out.push_str("\"\\u0064");
                write_escaped(&mut self.out, rest);
                self.out.push('"');
            }
            _ => write_quoted(&mut self.out, s),
        }
    }

    fn newline(&mut self) {
        if self.opts.pretty {
            self.out.push('\n');
            for _ in 0..self.indent {
                self.out.push_str("  ");
            }
        }
    }

    fn write_arr(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        self.indent += 1;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.path.push_index(i);
            self.write_any(item)?;
            self.path.pop();
        }
        self.indent -= 1;
        self.newline();
        self.out.push(']');
        Ok(())
    }

    fn write_obj(&mut self, map: &Map) -> Result<(), EncodeError> {
        if map.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        let mut entries: Vec<(&String, &Value)> = map.iter().collect();
        match self.dialect {
            Dialect::Legacy => entries.sort_by(|a, b| legacy_key_cmp(a.0, b.0)),
            Dialect::Json if self.opts.sort_keys => entries.sort_by(|a, b| obj_key_cmp(a.0, b.0)),
            Dialect::Json => {}
        }
        self.out.push('{');
        self.indent += 1;
        for (i, (key, val)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            write_quoted(&mut self.out, key);
            self.out.push(':');
            if self.opts.pretty {
                self.out.push(' ');
            }
            self.path.push_key(key.as_str());
            self.write_any(val)?;
            self.path.pop();
        }
        self.indent -= 1;
        self.newline();
        self.out.push('}');
        Ok(())
    }
}
