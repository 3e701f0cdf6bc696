use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::discriminator::{Discriminator, Shape};
use crate::value::Value;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A user-supplied reconstruction routine.
pub type ConstructorFn = dyn Fn(Value) -> Result<Construct, BoxError> + Send + Sync;

/// What a constructor turns a node into.
pub enum Construct {
    /// An opaque typed result. Never descended into.
    Object(Arc<dyn Any + Send + Sync>),
    /// A plain replacement, taken as is.
    Replace(Value),
    /// A replacement whose children are rehydrated in turn. The replacement
    /// itself is not matched again.
    Descend(Value),
}

impl Construct {
    pub fn object<T: Any + Send + Sync>(object: T) -> Self {
        Construct::Object(Arc::new(object))
    }
}

impl fmt::Debug for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::Object(_) => f.write_str("Object(..)"),
            Construct::Replace(v) => f.debug_tuple("Replace").field(v).finish(),
            Construct::Descend(v) => f.debug_tuple("Descend").field(v).finish(),
        }
    }
}

/// A registered rule.
#[derive(Clone)]
pub struct ConstructorEntry {
    pub discriminator: Discriminator,
    ctor: Arc<ConstructorFn>,
}

impl ConstructorEntry {
    pub fn call(&self, value: Value) -> Result<Construct, BoxError> {
        (self.ctor)(value)
    }
}

impl fmt::Debug for ConstructorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorEntry")
            .field("discriminator", &self.discriminator)
            .finish_non_exhaustive()
    }
}

/// Discriminator to constructor mapping, passed by reference into each
/// constructor-aware parse.
///
/// Registering a discriminator that is already present replaces its
/// constructor. Shapes are tried in registration order.
#[derive(Clone, Default)]
pub struct Registry {
    tags: HashMap<u64, ConstructorEntry>,
    shapes: Vec<ConstructorEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, discriminator: Discriminator, ctor: F) -> &mut Self
    where
        F: Fn(Value) -> Result<Construct, BoxError> + Send + Sync + 'static,
    {
        let ctor: Arc<ConstructorFn> = Arc::new(ctor);
        match discriminator {
            Discriminator::Tag(tag) => {
                let entry = ConstructorEntry {
                    discriminator: Discriminator::Tag(tag),
                    ctor,
                };
                self.tags.insert(tag, entry);
            }
            Discriminator::Shape(shape) => {
                let existing = self.shapes.iter().position(
                    |e| matches!(&e.discriminator, Discriminator::Shape(s) if *s == shape),
                );
                let entry = ConstructorEntry {
                    discriminator: Discriminator::Shape(shape),
                    ctor,
                };
                match existing {
                    Some(i) => self.shapes[i] = entry,
                    None => self.shapes.push(entry),
                }
            }
        }
        self
    }

    pub fn register_shape<F>(&mut self, shape: Shape, ctor: F) -> &mut Self
    where
        F: Fn(Value) -> Result<Construct, BoxError> + Send + Sync + 'static,
    {
        self.register(Discriminator::Shape(shape), ctor)
    }

    pub fn register_tag<F>(&mut self, tag: u64, ctor: F) -> &mut Self
    where
        F: Fn(Value) -> Result<Construct, BoxError> + Send + Sync + 'static,
    {
        self.register(Discriminator::Tag(tag), ctor)
    }

    /// Finds the rule for a node: tagged items by tag number, maps by the
    /// first matching shape. Other nodes never match.
    pub fn lookup(&self, value: &Value) -> Option<&ConstructorEntry> {
        match value {
            Value::Tagged(tag, _) => self.tags.get(tag),
            Value::Map(map) => self.shapes.iter().find(|e| match &e.discriminator {
                Discriminator::Shape(shape) => shape.matches(map),
                Discriminator::Tag(_) => false,
            }),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len() + self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&u64> = self.tags.keys().collect();
        tags.sort();
        f.debug_struct("Registry")
            .field("tags", &tags)
            .field(
                "shapes",
                &self
                    .shapes
                    .iter()
                    .map(|e| e.discriminator.to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
