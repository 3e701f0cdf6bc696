use std::collections::BTreeSet;
use std::fmt;

use crate::value::{Map, Value};

/// Selects which registered constructor applies to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Discriminator {
    /// A CBOR tag number on a [`Value::Tagged`] node.
    Tag(u64),
    /// The key set of a [`Value::Map`] node.
    Shape(Shape),
}

impl Discriminator {
    pub fn shape<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Discriminator::Shape(Shape::new(keys))
    }

    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Discriminator::Tag(tag), Value::Tagged(t, _)) => tag == t,
            (Discriminator::Shape(shape), Value::Map(map)) => shape.matches(map),
            _ => false,
        }
    }
}

impl From<Shape> for Discriminator {
    fn from(shape: Shape) -> Self {
        Discriminator::Shape(shape)
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discriminator::Tag(tag) => write!(f, "tag {tag}"),
            Discriminator::Shape(shape) => write!(f, "shape {shape}"),
        }
    }
}

/// An exact key set, optionally pinning some keys to literal values.
///
/// A map matches when it has exactly these keys, in any order, and every
/// pinned key holds its literal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    keys: BTreeSet<String>,
    literals: Vec<(String, Value)>,
}

impl Shape {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            literals: Vec::new(),
        }
    }

    /// Adds `key` to the key set and requires it to equal `value`.
    pub fn with_literal(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        self.keys.insert(key.clone());
        match self.literals.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.literals.push((key, value)),
        }
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn matches(&self, map: &Map) -> bool {
        map.len() == self.keys.len()
            && self.keys.iter().all(|k| map.contains_key(k))
            && self
                .literals
                .iter()
                .all(|(k, lit)| map.get(k).is_some_and(|v| v == lit))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(key)?;
            if let Some((_, lit)) = self.literals.iter().find(|(k, _)| k == key) {
                match crate::json::encode(lit) {
                    Ok(text) => write!(f, "={text}")?,
                    Err(_) => write!(f, "={lit:?}")?,
                }
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Shape {
        Shape::new(["x", "y"]).with_literal("$type", "Point")
    }

    #[test]
    fn shape_requires_exact_keys_and_literals() {
        let shape = point();
        let ok: Map = [("y", Value::Int(2)), ("$type", "Point".into()), ("x", Value::Int(1))]
            .into_iter()
            .collect();
        assert!(shape.matches(&ok));

        let wrong_literal: Map = [("$type", "Line"), ("x", "1"), ("y", "2")].into_iter().collect();
        assert!(!shape.matches(&wrong_literal));

        let extra_key: Map = [("$type", "Point"), ("x", "1"), ("y", "2"), ("z", "3")]
            .into_iter()
            .collect();
        assert!(!shape.matches(&extra_key));

        let missing: Map = [("$type", "Point"), ("x", "1")].into_iter().collect();
        assert!(!shape.matches(&missing));
    }

    #[test]
    fn tag_discriminator() {
        let d = Discriminator::Tag(37);
        assert!(d.matches(&Value::tagged(37, "x")));
        assert!(!d.matches(&Value::tagged(36, "x")));
        assert!(!d.matches(&Value::from("x")));
    }

    #[test]
    fn display() {
        assert_eq!(Discriminator::Tag(1).to_string(), "tag 1");
        assert_eq!(
            Discriminator::from(point()).to_string(),
            "shape {$type=\"Point\", x, y}"
        );
    }
}
