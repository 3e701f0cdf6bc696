use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound on entries preallocated from an untrusted length header.
pub const MAX_PREALLOC: usize = 2048;

/// Default nesting limit for decoders.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Wire formats understood by the codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Json,
    Cbor,
    /// Legacy signing-encoding text.
    Legacy,
    /// Legacy text in a length-prefixed binary record.
    LegacyFrame,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Cbor => "cbor",
            Format::Legacy => "legacy",
            Format::LegacyFrame => "legacy-frame",
        }
    }

    /// Whether the format is human-readable text.
    pub fn is_text(self) -> bool {
        matches!(self, Format::Json | Format::Legacy)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "cbor" => Ok(Format::Cbor),
            "legacy" => Ok(Format::Legacy),
            "legacy-frame" | "legacy-buffer" => Ok(Format::LegacyFrame),
            other => Err(format!("unknown format: {other}")),
        }
    }
}
