use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::discriminator::Discriminator;
use crate::value::Value;

/// The result of rehydration: a value tree whose nodes may have been
/// replaced by constructed objects.
///
/// Equality follows [`Value`]: maps compare entry by entry, in order.
#[derive(Debug, Clone)]
pub enum Hydrated {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Hydrated>),
    Map(IndexMap<String, Hydrated>),
    Tagged(u64, Box<Hydrated>),
    Object(Constructed),
}

impl Hydrated {
    pub fn as_object(&self) -> Option<&Constructed> {
        match self {
            Hydrated::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Shortcut for `as_object()` followed by [`Constructed::downcast_ref`].
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(Constructed::downcast_ref)
    }

    pub fn get(&self, key: &str) -> Option<&Hydrated> {
        match self {
            Hydrated::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn index(&self, index: usize) -> Option<&Hydrated> {
        match self {
            Hydrated::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Converts back to a plain [`Value`]; fails if any node is an object.
    pub fn into_value(self) -> Option<Value> {
        Some(match self {
            Hydrated::Null => Value::Null,
            Hydrated::Bool(b) => Value::Bool(b),
            Hydrated::Int(i) => Value::Int(i),
            Hydrated::Float(f) => Value::Float(f),
            Hydrated::Text(s) => Value::Text(s),
            Hydrated::Bytes(b) => Value::Bytes(b),
            Hydrated::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Hydrated::into_value)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Hydrated::Map(map) => {
                let mut out = crate::value::Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, v.into_value()?);
                }
                Value::Map(out)
            }
            Hydrated::Tagged(tag, inner) => Value::Tagged(tag, Box::new(inner.into_value()?)),
            Hydrated::Object(_) => return None,
        })
    }
}

impl PartialEq for Hydrated {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Hydrated::Null, Hydrated::Null) => true,
            (Hydrated::Bool(a), Hydrated::Bool(b)) => a == b,
            (Hydrated::Int(a), Hydrated::Int(b)) => a == b,
            (Hydrated::Float(a), Hydrated::Float(b)) => a == b,
            (Hydrated::Text(a), Hydrated::Text(b)) => a == b,
            (Hydrated::Bytes(a), Hydrated::Bytes(b)) => a == b,
            (Hydrated::Array(a), Hydrated::Array(b)) => a == b,
            (Hydrated::Map(a), Hydrated::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((k1, v1), (k2, v2))| k1 == k2 && v1 == v2)
            }
            (Hydrated::Tagged(t1, a), Hydrated::Tagged(t2, b)) => t1 == t2 && a == b,
            (Hydrated::Object(a), Hydrated::Object(b)) => a == b,
            _ => false,
        }
    }
}

/// Structural conversion with no constructors applied.
impl From<Value> for Hydrated {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Hydrated::Null,
            Value::Bool(b) => Hydrated::Bool(b),
            Value::Int(i) => Hydrated::Int(i),
            Value::Float(f) => Hydrated::Float(f),
            Value::Text(s) => Hydrated::Text(s),
            Value::Bytes(b) => Hydrated::Bytes(b),
            Value::Array(items) => Hydrated::Array(items.into_iter().map(Hydrated::from).collect()),
            Value::Map(map) => {
                Hydrated::Map(map.into_iter().map(|(k, v)| (k, Hydrated::from(v))).collect())
            }
            Value::Tagged(tag, inner) => Hydrated::Tagged(tag, Box::new(Hydrated::from(*inner))),
        }
    }
}

/// An object produced by a constructor, with the rule that produced it.
#[derive(Clone)]
pub struct Constructed {
    pub discriminator: Discriminator,
    object: Arc<dyn Any + Send + Sync>,
}

impl Constructed {
    pub(crate) fn new(discriminator: Discriminator, object: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            discriminator,
            object,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.object.is::<T>()
    }

    /// Shared handle to the object.
    pub fn object(&self) -> Arc<dyn Any + Send + Sync> {
        Arc::clone(&self.object)
    }
}

/// Two handles are equal when they point at the same object.
impl PartialEq for Constructed {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }
}

impl fmt::Debug for Constructed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructed")
            .field("discriminator", &self.discriminator)
            .finish_non_exhaustive()
    }
}
