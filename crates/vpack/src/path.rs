//! Locations inside a [`Value`](crate::Value) tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step from a container to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

/// A path from the root of a value tree, rendered as a JSON Pointer
/// (RFC 6901), e.g. `/items/0/name`. Serializes as that pointer text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Path(pub Vec<PathStep>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses JSON Pointer text. All-digit segments read back as indexes.
    pub fn parse(pointer: &str) -> Result<Self, String> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(format!("{pointer:?} does not start with '/'"));
        };
        let steps = rest
            .split('/')
            .map(|segment| {
                let is_index = !segment.is_empty()
                    && segment.bytes().all(|b| b.is_ascii_digit())
                    && (segment == "0" || !segment.starts_with('0'));
                match segment.parse::<usize>() {
                    Ok(index) if is_index => PathStep::Index(index),
                    _ => PathStep::Key(segment.replace("~1", "/").replace("~0", "~")),
                }
            })
            .collect();
        Ok(Self(steps))
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.0.push(PathStep::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathStep::Index(index));
    }

    pub fn pop(&mut self) -> Option<PathStep> {
        self.0.pop()
    }

    /// Returns a copy extended by one key step.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push_key(key);
        path
    }

    /// Returns a copy extended by one index step.
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push_index(index);
        path
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            match step {
                PathStep::Key(key) => write!(f, "/{}", key.replace('~', "~0").replace('/', "~1"))?,
                PathStep::Index(index) => write!(f, "/{index}")?,
            }
        }
        Ok(())
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for Path {
    type Error = String;

    fn try_from(pointer: String) -> Result<Self, Self::Error> {
        Path::parse(&pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_json_pointer() {
        let path = Path::root().key("a/b").index(3).key("m~n");
        assert_eq!(path.to_string(), "/a~1b/3/m~0n");
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn parses_json_pointer() {
        let path = Path::parse("/a~1b/3/m~0n/007").unwrap();
        assert_eq!(path, Path::root().key("a/b").index(3).key("m~n").key("007"));
        assert_eq!(Path::parse("").unwrap(), Path::root());
        assert!(Path::parse("a/b").is_err());
    }

    #[test]
    fn serializes_as_pointer_text() {
        let path = Path::root().key("items").index(0);
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!("/items/0"));
        let back: Path = serde_json::from_value(serde_json::json!("/items/0")).unwrap();
        assert_eq!(back, path);
    }
}
