//! vpack: a JSON and CBOR value codec with a legacy message format,
//! constructor rehydration and structural validation.
//!
//! Every codec decodes into and encodes from [`Value`]. The functions in
//! [`api`] are the entry points a host binding wraps:
//!
//! ```
//! use vpack::api;
//!
//! let value = api::parse_json(r#"{"a":[1,2.5,"x"]}"#).unwrap();
//! let cbor = api::to_cbor(&value);
//! assert_eq!(api::parse_cbor(&cbor).unwrap(), value);
//! assert_eq!(api::to_json(&value).unwrap(), r#"{"a":[1,2.5,"x"]}"#);
//! ```

pub mod api;
pub mod cbor;
pub mod constants;
pub mod error;
pub mod json;
pub mod legacy;
pub mod path;
pub mod rehydrate;
pub mod validate;
pub mod value;

mod util;

pub use constants::Format;
pub use error::{EncodeError, EncodeErrorKind, Error, ParseError, ParseErrorKind};
pub use path::{Path, PathStep};
pub use rehydrate::{
    rehydrate, Construct, ConstructorError, Discriminator, Hydrated, Registry, Shape,
};
pub use validate::{validate, IssueKind, Schema, ValidationIssue};
pub use value::{Map, Value};
