//! # fql-core
//!
//! Query construction and JSON wire codec for a remote document database.
//!
//! Callers build an [`Expr`] tree describing a database operation, encode it to
//! the wire JSON dialect, and decode the server's JSON back into a typed
//! [`Value`] tree that can be navigated safely with a [`Path`]. Nothing here
//! performs I/O; every function is pure and safe to call concurrently.
//!
//! ## Quick start
//!
//! ```rust
//! use fql_core::query::{get, ref_in, class};
//! use fql_core::{decode_str, encode_to_string, Path};
//!
//! // Expression → wire JSON
//! let q = get(ref_in(class("spells"), "101"));
//! assert_eq!(
//!     encode_to_string(&q),
//!     r#"{"get":{"ref":{"class":"spells"},"id":"101"}}"#
//! );
//!
//! // Wire JSON → value → typed field
//! let value = decode_str(r#"{"data":{"name":"Fire","cost":10}}"#).unwrap();
//! let cost: i64 = value.get(Path::from(["data", "cost"])).unwrap();
//! assert_eq!(cost, 10);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Value` model returned by the server, plus `Ref`
//! - [`expr`]: `Expr` tree and the closed set of query function calls
//! - [`query`]: Constructors for query function calls
//! - [`encoder`]: `Expr` → wire JSON
//! - [`decoder`]: wire JSON → `Value`
//! - [`path`]: Field paths and typed extraction (`get`, `get_opt`)
//! - [`convert`]: `FromValue` conversions to Rust types
//! - [`json`]: JSON intermediate representation shared by encoder and decoder
//! - [`response`]: Server response envelopes
//! - [`error`]: Error types for decode and extraction failures

pub mod convert;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod expr;
pub mod json;
pub mod path;
pub mod query;
pub mod response;
pub mod value;

pub use convert::{Bytes, FromValue, Set};
pub use decoder::{decode, decode_str};
pub use encoder::{encode, encode_as, encode_to_string};
pub use error::{DecodeError, PathError, ResponseError};
pub use expr::{Call, Expr, ToExpr};
pub use json::Json;
pub use path::{Path, Segment};
pub use response::{parse_response, ServerError};
pub use value::{NativeRef, Object, Ref, Value};
