//! Legacy object entry order and number normalization.

use std::cmp::Ordering;

use crate::value::{Map, Value};

/// Largest integer a double holds exactly with all smaller ones.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// `0`, or a non-zero digit followed by digits.
pub fn is_natural_key(key: &str) -> bool {
    match key.as_bytes().split_first() {
        Some((b'0', tail)) => tail.is_empty(),
        Some((b'1'..=b'9', tail)) => tail.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// Natural-number keys first, shorter before longer and then bytewise
/// (numeric order for canonical digit strings). All other keys compare
/// equal so a stable sort keeps their insertion order.
pub fn legacy_key_cmp(a: &str, b: &str) -> Ordering {
    match (is_natural_key(a), is_natural_key(b)) {
        (true, true) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

pub(crate) fn sort_legacy_keys(map: &mut Map) {
    if map.keys().any(|k| is_natural_key(k)) {
        map.sort_keys_by(legacy_key_cmp);
    }
}

/// Integral doubles within the safe range become [`Value::Int`].
pub(crate) fn legacy_number(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64 {
        Value::Int(f as i64)
    } else {
        Value::Float(f)
    }
}
