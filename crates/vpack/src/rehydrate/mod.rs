//! Constructor registry and rehydration.
//!
//! [`rehydrate`] walks a decoded [`Value`] depth-first. At each map or
//! tagged node that a [`Registry`] rule matches, the constructor is handed
//! the plain node and its [`Construct`] takes the node's place:
//!
//! - `Object` becomes a [`Hydrated::Object`] leaf;
//! - `Replace` is converted structurally and not visited further;
//! - `Descend` has its children rehydrated, but is not matched itself.
//!
//! For a tag rule the constructor receives the tagged item without its tag.

mod discriminator;
mod hydrated;
mod registry;

pub use discriminator::{Discriminator, Shape};
pub use hydrated::{Constructed, Hydrated};
pub use registry::{BoxError, Construct, ConstructorEntry, ConstructorFn, Registry};

use thiserror::Error;

use crate::path::Path;
use crate::value::Value;

/// A constructor returned an error.
#[derive(Debug, Error)]
#[error("constructor for {discriminator} failed at '{path}': {source}")]
pub struct ConstructorError {
    pub discriminator: Discriminator,
    pub path: Path,
    #[source]
    pub source: BoxError,
}

/// Rehydrates `value` against `registry`. Stops at the first constructor
/// failure.
pub fn rehydrate(value: Value, registry: &Registry) -> Result<Hydrated, ConstructorError> {
    if registry.is_empty() {
        return Ok(Hydrated::from(value));
    }
    Rehydrator {
        registry,
        path: Path::root(),
    }
    .visit(value)
}

struct Rehydrator<'a> {
    registry: &'a Registry,
    path: Path,
}

impl Rehydrator<'_> {
    fn visit(&mut self, value: Value) -> Result<Hydrated, ConstructorError> {
        let registry = self.registry;
        let Some(entry) = registry.lookup(&value) else {
            return self.children(value);
        };
        tracing::trace!(discriminator = %entry.discriminator, path = %self.path, "invoking constructor");
        let input = match value {
            Value::Tagged(_, inner) => *inner,
            other => other,
        };
        let construct = entry.call(input).map_err(|source| ConstructorError {
            discriminator: entry.discriminator.clone(),
            path: self.path.clone(),
            source,
        })?;
        Ok(match construct {
            Construct::Object(object) => {
                Hydrated::Object(Constructed::new(entry.discriminator.clone(), object))
            }
            Construct::Replace(value) => Hydrated::from(value),
            Construct::Descend(value) => self.children(value)?,
        })
    }

    /// Rebuilds `value` with each child visited.
    fn children(&mut self, value: Value) -> Result<Hydrated, ConstructorError> {
        Ok(match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    self.path.push_index(i);
                    out.push(self.visit(item)?);
                    self.path.pop();
                }
                Hydrated::Array(out)
            }
            Value::Map(map) => {
                let mut out = indexmap::IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    self.path.push_key(key.as_str());
                    let hydrated = self.visit(item)?;
                    self.path.pop();
                    out.insert(key, hydrated);
                }
                Hydrated::Map(out)
            }
            Value::Tagged(tag, inner) => Hydrated::Tagged(tag, Box::new(self.visit(*inner)?)),
            scalar => Hydrated::from(scalar),
        })
    }
}
