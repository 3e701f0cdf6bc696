//! Byte buffer primitives shared by the vpack codecs.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer at offset {offset}")]
    EndOfBuffer { offset: usize },
}
