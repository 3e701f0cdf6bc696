//! Text helpers shared by the JSON and legacy encoders.

pub(crate) mod escape;
pub(crate) mod number;

use std::cmp::Ordering;

/// Object key order for deterministic output: shorter keys first, then
/// bytewise. For text keys this is also the RFC 7049 canonical CBOR order.
pub(crate) fn obj_key_cmp(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
