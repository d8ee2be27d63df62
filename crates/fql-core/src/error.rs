//! Error types for decoding wire JSON and extracting typed fields.

use thiserror::Error;

use crate::path::{Path, Segment};

/// Errors that can occur while decoding wire bytes into a [`Value`](crate::Value).
///
/// Every variant carries the offending fragment so callers can report it.
/// Decoding is all-or-nothing: a failure at any nested node aborts the whole document.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The input bytes were not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The document's top-level value was neither an object nor an array.
    #[error("unsupported top-level JSON type {kind}: {fragment}")]
    UnsupportedTopLevel {
        kind: &'static str,
        fragment: String,
    },

    /// A `@ref` payload lacked a string `id`, or its `class`/`database`
    /// field did not itself decode to a reference.
    #[error("invalid reference: {reason}: {fragment}")]
    InvalidRef {
        reason: &'static str,
        fragment: String,
    },

    /// A `@ts` payload was not an ISO-8601 instant.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A `@date` payload was not a `yyyy-MM-dd` date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A `@bytes` payload was not base64 text.
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

/// Errors raised while navigating a decoded value along a [`Path`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// A key was absent or an index was out of range.
    #[error("segment {segment} not found at {path}")]
    NotFound { segment: Segment, path: Path },

    /// A segment addressed a value that cannot be navigated by it
    /// (a key into a non-object, an index into a non-array).
    #[error("cannot select {segment} from {actual} at {path}")]
    NotNavigable {
        segment: Segment,
        actual: &'static str,
        path: Path,
    },

    /// The terminal value did not convert to the requested type.
    #[error("expected {expected} but found {actual} at {path}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
        path: Path,
    },

    /// A caller-defined conversion rejected the value.
    #[error("{message} at {path}")]
    Invalid { message: String, path: Path },

    /// A textual path could not be parsed.
    #[error("invalid path {0:?}")]
    InvalidPath(String),
}

impl PathError {
    /// Shorthand for a type mismatch at the current position.
    pub fn mismatch(expected: &'static str, actual: &'static str) -> Self {
        PathError::TypeMismatch {
            expected,
            actual,
            path: Path::root(),
        }
    }

    /// Shorthand for a custom conversion failure at the current position.
    pub fn invalid(message: impl Into<String>) -> Self {
        PathError::Invalid {
            message: message.into(),
            path: Path::root(),
        }
    }

    /// The path this error is reported against.
    pub fn path(&self) -> Option<&Path> {
        match self {
            PathError::NotFound { path, .. }
            | PathError::NotNavigable { path, .. }
            | PathError::TypeMismatch { path, .. }
            | PathError::Invalid { path, .. } => Some(path),
            PathError::InvalidPath(_) => None,
        }
    }

    /// Re-anchor the error below `prefix`, so an error raised while converting
    /// a nested value reports the full path from the document root.
    pub fn within(mut self, prefix: &Path) -> Self {
        match &mut self {
            PathError::NotFound { path, .. }
            | PathError::NotNavigable { path, .. }
            | PathError::TypeMismatch { path, .. }
            | PathError::Invalid { path, .. } => *path = prefix.join(path),
            PathError::InvalidPath(_) => {}
        }
        self
    }

    /// Re-anchor the error below a single segment.
    pub fn at(self, segment: impl Into<Segment>) -> Self {
        self.within(&Path::root().push(segment))
    }
}

/// Errors returned when reading a full server response envelope.
#[derive(Error, Debug)]
pub enum ResponseError {
    /// The body did not decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The server reported one or more query errors.
    #[error("server returned {} error(s): {}", .0.len(), summarize(.0))]
    Server(Vec<crate::response::ServerError>),

    /// The body had neither a `resource` nor an `errors` field.
    #[error("response has no resource: {0}")]
    MissingResource(String),
}

fn summarize(errors: &[crate::response::ServerError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias used throughout fql-core.
pub type Result<T> = std::result::Result<T, DecodeError>;
