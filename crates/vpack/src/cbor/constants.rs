pub const MAJOR_UIN: u8 = 0;
pub const MAJOR_NIN: u8 = 1;
pub const MAJOR_BIN: u8 = 2;
pub const MAJOR_STR: u8 = 3;
pub const MAJOR_ARR: u8 = 4;
pub const MAJOR_MAP: u8 = 5;
pub const MAJOR_TAG: u8 = 6;
pub const MAJOR_TKN: u8 = 7;

pub const OVERLAY_UIN: u8 = MAJOR_UIN << 5;
pub const OVERLAY_NIN: u8 = MAJOR_NIN << 5;
pub const OVERLAY_BIN: u8 = MAJOR_BIN << 5;
pub const OVERLAY_STR: u8 = MAJOR_STR << 5;
pub const OVERLAY_ARR: u8 = MAJOR_ARR << 5;
pub const OVERLAY_MAP: u8 = MAJOR_MAP << 5;
pub const OVERLAY_TAG: u8 = MAJOR_TAG << 5;

pub const MINOR_MASK: u8 = 0b11111;
pub const MINOR_INDEFINITE: u8 = 31;

pub const FALSE: u8 = 0xf4;
pub const TRUE: u8 = 0xf5;
pub const NULL: u8 = 0xf6;
pub const UNDEFINED: u8 = 0xf7;
pub const F16: u8 = 0xf9;
pub const F32: u8 = 0xfa;
pub const F64: u8 = 0xfb;
pub const BREAK: u8 = 0xff;

/// Half-precision bit patterns for the non-finite floats.
pub const F16_NAN: u16 = 0x7e00;
pub const F16_INFINITY: u16 = 0x7c00;
pub const F16_NEG_INFINITY: u16 = 0xfc00;

pub fn is_float32(value: f64) -> bool {
    (value as f32) as f64 == value
}
