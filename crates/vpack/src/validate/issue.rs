use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::Path;

/// Category of a [`ValidationIssue`]. Serializes as [`IssueKind::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    TypeMismatch,
    MissingKey,
    UnexpectedKey,
    OutOfRange,
    LengthOutOfRange,
    TagMismatch,
    NoVariantMatched,
    /// The raw input did not decode.
    Malformed,
}

impl IssueKind {
    pub fn name(self) -> &'static str {
        match self {
            IssueKind::TypeMismatch => "TYPE_MISMATCH",
            IssueKind::MissingKey => "MISSING_KEY",
            IssueKind::UnexpectedKey => "UNEXPECTED_KEY",
            IssueKind::OutOfRange => "OUT_OF_RANGE",
            IssueKind::LengthOutOfRange => "LENGTH_OUT_OF_RANGE",
            IssueKind::TagMismatch => "TAG_MISMATCH",
            IssueKind::NoVariantMatched => "NO_VARIANT_MATCHED",
            IssueKind::Malformed => "MALFORMED",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One conformance problem, located by its path from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: Path,
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{} at root: {}", self.kind, self.message)
        } else {
            write!(f, "{} at '{}': {}", self.kind, self.path, self.message)
        }
    }
}
