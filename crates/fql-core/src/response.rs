//! Server response envelopes.
//!
//! A successful query answers `{"resource": <value>}`; a failed one answers
//! `{"errors": [{"code": ..., "description": ..., "position": [...]}, ...]}`.
//! [`parse_response`] unwraps the first and reports the second as
//! [`ResponseError::Server`].

use std::fmt;

use crate::decoder;
use crate::error::{DecodeError, ResponseError};
use crate::json::Json;
use crate::path::{Path, Segment};
use crate::value::Value;

/// One error reported by the server for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerError {
    pub code: String,
    pub description: String,
    /// Where in the submitted expression the error occurred.
    pub position: Path,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)?;
        if !self.position.is_root() {
            write!(f, " (at {})", self.position)?;
        }
        Ok(())
    }
}

/// Decode a full response body into its resource value.
pub fn parse_response(bytes: &[u8]) -> Result<Value, ResponseError> {
    let json = Json::from_slice(bytes).map_err(DecodeError::from)?;
    if let Some(resource) = json.get("resource") {
        return Ok(decoder::from_json(resource)?);
    }
    if let Some(Json::Array(errors)) = json.get("errors") {
        let errors: Vec<ServerError> = errors.iter().map(server_error).collect();
        tracing::debug!(count = errors.len(), "server reported query errors");
        return Err(ResponseError::Server(errors));
    }
    Err(ResponseError::MissingResource(json.to_string()))
}

fn server_error(json: &Json) -> ServerError {
    let text = |key: &str| json.get(key).and_then(Json::as_str).unwrap_or_default().to_owned();
    let position = match json.get("position") {
        Some(Json::Array(segments)) => segments
            .iter()
            .filter_map(|segment| match segment {
                Json::String(key) => Some(Segment::Key(key.clone())),
                Json::Number(i) => usize::try_from(*i).ok().map(Segment::Index),
                _ => None,
            })
            .collect(),
        _ => Path::root(),
    };
    ServerError {
        code: text("code"),
        description: text("description"),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_mixes_keys_and_indices() {
        let json = Json::parse(
            r#"{"code":"invalid ref","description":"bad","position":["create",0]}"#,
        )
        .unwrap();
        let err = server_error(&json);
        assert_eq!(err.position, Path::root().key("create").index(0));
        assert_eq!(err.to_string(), "invalid ref: bad (at create.0)");
    }
}
