//! Runtime validator: walks a [`Value`] against a [`Schema`] and collects
//! every issue in depth-first pre-order.

use super::issue::{IssueKind, ValidationIssue};
use super::schema::{Additional, MapSchema, Schema};
use crate::path::Path;
use crate::value::{Map, Value};

pub(crate) struct Validator {
    path: Path,
    issues: Vec<ValidationIssue>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self {
            path: Path::root(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<ValidationIssue> {
        self.issues
    }

    fn make_error(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: self.path.clone(),
            kind,
            message: message.into(),
        });
    }

    fn type_mismatch(&mut self, schema: &Schema, value: &Value) {
        let message = format!("expected {}, found {}", schema.expected(), value.type_name());
        self.make_error(IssueKind::TypeMismatch, message);
    }

    pub(crate) fn check(&mut self, value: &Value, schema: &Schema) {
        match schema {
            Schema::Tagged { tag, inner } => {
                match value {
                    Value::Tagged(t, item) if t == tag => self.check(item, inner),
                    Value::Tagged(t, _) => self.make_error(
                        IssueKind::TagMismatch,
                        format!("expected tag {tag}, found tag {t}"),
                    ),
                    other => self.type_mismatch(schema, other),
                }
                return;
            }
            // Variants see the value with its tags.
            Schema::OneOf(variants) => {
                self.check_one_of(value, variants);
                return;
            }
            _ => {}
        }
        let value = value.untagged();
        match schema {
            Schema::Any => {}
            Schema::Null => {
                if !value.is_null() {
                    self.type_mismatch(schema, value);
                }
            }
            Schema::Bool => {
                if value.as_bool().is_none() {
                    self.type_mismatch(schema, value);
                }
            }
            Schema::Int { min, max } => match value {
                Value::Int(i) => {
                    if min.is_some_and(|m| *i < m) || max.is_some_and(|m| *i > m) {
                        let message = format!("{i} is outside {}", range(min, max));
                        self.make_error(IssueKind::OutOfRange, message);
                    }
                }
                other => self.type_mismatch(schema, other),
            },
            Schema::Number { min, max } => match value.as_f64() {
                Some(n) => {
                    // NaN fails any bound.
                    let below = min.is_some_and(|m| !(n >= m));
                    let above = max.is_some_and(|m| !(n <= m));
                    if below || above {
                        let message = format!("{n} is outside {}", range(min, max));
                        self.make_error(IssueKind::OutOfRange, message);
                    }
                }
                None => self.type_mismatch(schema, value),
            },
            Schema::Text { min_len, max_len } => match value {
                Value::Text(s) => self.check_len(s.chars().count(), *min_len, *max_len),
                other => self.type_mismatch(schema, other),
            },
            Schema::Bytes { min_len, max_len } => match value {
                Value::Bytes(b) => self.check_len(b.len(), *min_len, *max_len),
                other => self.type_mismatch(schema, other),
            },
            Schema::Array {
                items,
                min_len,
                max_len,
            } => match value {
                Value::Array(values) => {
                    self.check_len(values.len(), *min_len, *max_len);
                    for (i, item) in values.iter().enumerate() {
                        self.path.push_index(i);
                        self.check(item, items);
                        self.path.pop();
                    }
                }
                other => self.type_mismatch(schema, other),
            },
            Schema::Map(map_schema) => match value {
                Value::Map(map) => self.check_map(map, map_schema),
                other => self.type_mismatch(schema, other),
            },
            Schema::Tagged { .. } | Schema::OneOf(_) => {}
        }
    }

    fn check_one_of(&mut self, value: &Value, variants: &[Schema]) {
        let matched = variants.iter().any(|variant| {
            let mut probe = Validator {
                path: self.path.clone(),
                issues: Vec::new(),
            };
            probe.check(value, variant);
            probe.issues.is_empty()
        });
        if !matched {
            let message = format!(
                "{} matched none of {} variants",
                value.type_name(),
                variants.len()
            );
            self.make_error(IssueKind::NoVariantMatched, message);
        }
    }

    fn check_len(&mut self, len: usize, min: Option<usize>, max: Option<usize>) {
        if min.is_some_and(|m| len < m) || max.is_some_and(|m| len > m) {
            let message = format!("length {len} is outside {}", range(&min, &max));
            self.make_error(IssueKind::LengthOutOfRange, message);
        }
    }

    /// The map's own issues (missing, then unexpected keys) come before
    /// those of its entries.
    fn check_map(&mut self, map: &Map, schema: &MapSchema) {
        for (key, field) in &schema.fields {
            if field.required && !map.contains_key(key) {
                self.path.push_key(key.as_str());
                self.make_error(IssueKind::MissingKey, format!("required key {key:?} is missing"));
                self.path.pop();
            }
        }
        if schema.additional == Additional::Deny {
            for key in map.keys() {
                if !schema.fields.contains_key(key) {
                    self.path.push_key(key.as_str());
                    self.make_error(IssueKind::UnexpectedKey, format!("key {key:?} is not allowed"));
                    self.path.pop();
                }
            }
        }
        for (key, item) in map {
            let field_schema = match (schema.fields.get(key), &schema.additional) {
                (Some(field), _) => &field.schema,
                (None, Additional::Schema(extra)) => &**extra,
                (None, _) => continue,
            };
            self.path.push_key(key.as_str());
            self.check(item, field_schema);
            self.path.pop();
        }
    }
}

fn range<T: std::fmt::Display>(min: &Option<T>, max: &Option<T>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("[{lo}, {hi}]"),
        (Some(lo), None) => format!("[{lo}, ..)"),
        (None, Some(hi)) => format!("(.., {hi}]"),
        (None, None) => "(.., ..)".to_owned(),
    }
}
