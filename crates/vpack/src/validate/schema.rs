//! Structural schemas.
//!
//! Schemas deserialize from their externally tagged serde form, e.g.
//! `{"map": {"fields": {"id": {"schema": {"int": {"min": 0}}, "required": true}}}}`.
//! Unit schemas are bare strings (`"any"`, `"null"`, `"bool"`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Expected shape of a value.
///
/// Schemas other than [`Schema::Tagged`] look through tag wrappers, so a
/// tagged integer satisfies [`Schema::Int`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    Any,
    Null,
    Bool,
    /// An [`Value::Int`](crate::Value::Int), with inclusive bounds.
    Int { min: Option<i64>, max: Option<i64> },
    /// Either number variant, with inclusive bounds.
    Number { min: Option<f64>, max: Option<f64> },
    /// Length counted in characters.
    Text {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Bytes {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Array {
        items: Box<Schema>,
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Map(MapSchema),
    Tagged { tag: u64, inner: Box<Schema> },
    /// Satisfied when at least one variant reports no issues.
    OneOf(Vec<Schema>),
}

impl Schema {
    pub fn int() -> Self {
        Schema::Int {
            min: None,
            max: None,
        }
    }

    pub fn int_range(min: i64, max: i64) -> Self {
        Schema::Int {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn number() -> Self {
        Schema::Number {
            min: None,
            max: None,
        }
    }

    pub fn text() -> Self {
        Schema::Text {
            min_len: None,
            max_len: None,
        }
    }

    pub fn text_len(min_len: usize, max_len: usize) -> Self {
        Schema::Text {
            min_len: Some(min_len),
            max_len: Some(max_len),
        }
    }

    pub fn bytes() -> Self {
        Schema::Bytes {
            min_len: None,
            max_len: None,
        }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
            min_len: None,
            max_len: None,
        }
    }

    pub fn tagged(tag: u64, inner: Schema) -> Self {
        Schema::Tagged {
            tag,
            inner: Box::new(inner),
        }
    }

    pub fn one_of(variants: impl IntoIterator<Item = Schema>) -> Self {
        Schema::OneOf(variants.into_iter().collect())
    }

    /// Starts a map schema; see [`MapSchema`].
    pub fn map() -> MapSchema {
        MapSchema::default()
    }

    /// Short name used in issue messages.
    pub(crate) fn expected(&self) -> &'static str {
        match self {
            Schema::Any => "any",
            Schema::Null => "null",
            Schema::Bool => "bool",
            Schema::Int { .. } => "int",
            Schema::Number { .. } => "number",
            Schema::Text { .. } => "text",
            Schema::Bytes { .. } => "bytes",
            Schema::Array { .. } => "array",
            Schema::Map(_) => "map",
            Schema::Tagged { .. } => "tagged",
            Schema::OneOf(_) => "one of several",
        }
    }
}

/// What happens to map keys the schema does not list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Additional {
    #[default]
    Allow,
    Deny,
    /// Extra entries must satisfy this schema.
    Schema(Box<Schema>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub schema: Schema,
    #[serde(default)]
    pub required: bool,
}

/// Builder-style map schema.
///
/// ```
/// use vpack::{Schema, validate::Additional};
///
/// let schema: Schema = Schema::map()
///     .required("id", Schema::int())
///     .optional("name", Schema::text())
///     .additional(Additional::Deny)
///     .into();
/// # let _ = schema;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSchema {
    pub fields: IndexMap<String, Field>,
    pub additional: Additional,
}

impl MapSchema {
    pub fn required(mut self, key: impl Into<String>, schema: Schema) -> Self {
        self.fields.insert(
            key.into(),
            Field {
                schema,
                required: true,
            },
        );
        self
    }

    pub fn optional(mut self, key: impl Into<String>, schema: Schema) -> Self {
        self.fields.insert(
            key.into(),
            Field {
                schema,
                required: false,
            },
        );
        self
    }

    pub fn additional(mut self, additional: Additional) -> Self {
        self.additional = additional;
        self
    }
}

impl From<MapSchema> for Schema {
    fn from(map: MapSchema) -> Self {
        Schema::Map(map)
    }
}
