//! Decoder: wire JSON → [`Value`].
//!
//! Decoding happens in two passes. The bytes are first parsed structurally into
//! the [`Json`] IR. Tags are then interpreted recursively:
//!
//! - arrays map element-wise;
//! - a single-key object whose key is a recognized tag becomes the matching
//!   special value. Tags are checked in a fixed order: `@ref`, `@query`,
//!   `@set`, `@obj`, `@ts`, `@date`, `@bytes`;
//! - every other object (zero keys, several keys, an unknown key, or the
//!   request-side `"object"` wrapper) becomes a plain [`Value::Object`].
//!
//! A failure anywhere aborts the whole document.
//!
//! # Example
//! ```
//! use fql_core::{decode_str, Ref, Value};
//!
//! let value = decode_str(r#"{"@ref":{"id":"101","class":{"@ref":{"id":"spells"}}}}"#).unwrap();
//! assert_eq!(value, Value::Ref(Ref::new("101").with_class(Ref::new("spells"))));
//! ```

use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{DecodeError, Result};
use crate::json::Json;
use crate::value::{Object, Ref, Value};

/// Tag interpretation order for single-key objects.
const TAGS: [Tag; 7] = [
    Tag::Ref,
    Tag::Query,
    Tag::Set,
    Tag::Obj,
    Tag::Ts,
    Tag::Date,
    Tag::Bytes,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Ref,
    Query,
    Set,
    Obj,
    Ts,
    Date,
    Bytes,
}

impl Tag {
    fn key(self) -> &'static str {
        match self {
            Tag::Ref => "@ref",
            Tag::Query => "@query",
            Tag::Set => "@set",
            Tag::Obj => "@obj",
            Tag::Ts => "@ts",
            Tag::Date => "@date",
            Tag::Bytes => "@bytes",
        }
    }

    fn lookup(key: &str) -> Option<Tag> {
        TAGS.into_iter().find(|tag| tag.key() == key)
    }
}

/// Decode a wire document. The top-level value must be an object or an array.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    tracing::trace!(len = bytes.len(), "decoding document");
    let json = Json::from_slice(bytes)?;
    decode_document(&json)
}

/// Decode a wire document held in a string.
pub fn decode_str(text: &str) -> Result<Value> {
    decode(text.as_bytes())
}

fn decode_document(json: &Json) -> Result<Value> {
    match json {
        Json::Object(_) | Json::Array(_) => from_json(json),
        other => Err(DecodeError::UnsupportedTopLevel {
            kind: other.type_name(),
            fragment: other.to_string(),
        }),
    }
}

/// Interpret an already-parsed IR fragment. Accepts any JSON type.
pub fn from_json(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Boolean(b) => Ok(Value::Boolean(*b)),
        Json::Number(n) => Ok(Value::Long(*n)),
        Json::Double(d) => Ok(Value::Double(*d)),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => items.iter().map(from_json).collect::<Result<_>>().map(Value::Array),
        Json::Object(fields) => decode_object(fields),
    }
}

fn decode_object(fields: &[(String, Json)]) -> Result<Value> {
    if let [(key, payload)] = fields {
        if let Some(tag) = Tag::lookup(key) {
            if let Some(value) = decode_tagged(tag, payload)? {
                return Ok(value);
            }
            tracing::debug!(tag = tag.key(), "tag payload is not an object; decoding as plain object");
        }
    }
    decode_fields(fields).map(Value::Object)
}

/// Returns `Ok(None)` when the payload shape means the object is not really tagged.
fn decode_tagged(tag: Tag, payload: &Json) -> Result<Option<Value>> {
    let value = match tag {
        Tag::Ref => Value::Ref(decode_ref(payload)?),
        Tag::Query => Value::Query(payload.clone()),
        Tag::Set => match payload {
            Json::Object(fields) => Value::SetRef(decode_fields(fields)?),
            _ => return Ok(None),
        },
        Tag::Obj => match payload {
            Json::Object(fields) => Value::Object(decode_fields(fields)?),
            _ => return Ok(None),
        },
        Tag::Ts => Value::Timestamp(parse_timestamp(payload)?),
        Tag::Date => Value::Date(parse_date(payload)?),
        Tag::Bytes => Value::Bytes(parse_bytes(payload)?),
    };
    Ok(Some(value))
}

fn decode_fields(fields: &[(String, Json)]) -> Result<Object> {
    let mut map = Object::new();
    for (key, value) in fields {
        // Last occurrence wins, matching the IR parser.
        map.insert(key.clone(), from_json(value)?);
    }
    Ok(map)
}

fn decode_ref(payload: &Json) -> Result<Ref> {
    let invalid = |reason| DecodeError::InvalidRef {
        reason,
        fragment: payload.to_string(),
    };
    if !matches!(payload, Json::Object(_)) {
        return Err(invalid("payload is not an object"));
    }
    let id = payload
        .get("id")
        .and_then(Json::as_str)
        .ok_or_else(|| invalid("missing string id"))?;
    let mut reference = Ref::new(id);
    if let Some(class) = payload.get("class") {
        match from_json(class)? {
            Value::Ref(class) => reference = reference.with_class(class),
            _ => return Err(invalid("class is not a reference")),
        }
    }
    if let Some(database) = payload.get("database") {
        match from_json(database)? {
            Value::Ref(database) => reference = reference.with_database(database),
            _ => return Err(invalid("database is not a reference")),
        }
    }
    if let Some(native) = reference.native() {
        tracing::debug!(id = native.id(), "resolved native reference");
    }
    Ok(reference)
}

fn parse_timestamp(payload: &Json) -> Result<DateTime<Utc>> {
    let text = payload
        .as_str()
        .ok_or_else(|| DecodeError::InvalidTimestamp(payload.to_string()))?;
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| DecodeError::InvalidTimestamp(text.to_owned()))
}

fn parse_date(payload: &Json) -> Result<NaiveDate> {
    let text = payload
        .as_str()
        .ok_or_else(|| DecodeError::InvalidDate(payload.to_string()))?;
    if !is_iso_date_shape(text) {
        return Err(DecodeError::InvalidDate(text.to_owned()));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| DecodeError::InvalidDate(text.to_owned()))
}

/// `yyyy-MM-dd` exactly: chrono alone also takes `1970-1-3`.
fn is_iso_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Standard alphabet first, then URL-safe.
fn parse_bytes(payload: &Json) -> Result<Vec<u8>> {
    use base64::engine::general_purpose::{STANDARD, URL_SAFE};

    let text = payload
        .as_str()
        .ok_or_else(|| DecodeError::InvalidBase64(payload.to_string()))?;
    STANDARD
        .decode(text)
        .or_else(|_| URL_SAFE.decode(text))
        .map_err(|_| DecodeError::InvalidBase64(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_table_order() {
        let keys: Vec<&str> = TAGS.iter().map(|t| t.key()).collect();
        assert_eq!(
            keys,
            ["@ref", "@query", "@set", "@obj", "@ts", "@date", "@bytes"]
        );
    }

    #[test]
    fn set_with_scalar_payload_is_plain_object() {
        let json = Json::parse(r#"{"@set": 1}"#).unwrap();
        assert_eq!(
            from_json(&json).unwrap(),
            Value::object([("@set", Value::Long(1))])
        );
    }

    #[test]
    fn date_shape_is_fixed_width() {
        assert!(is_iso_date_shape("1970-01-03"));
        assert!(!is_iso_date_shape("1970-1-3"));
        assert!(!is_iso_date_shape("1970-01-3"));
        assert!(!is_iso_date_shape("+1970-01-03"));
        assert!(!is_iso_date_shape("1970/01/03"));
    }

    #[test]
    fn bytes_accept_url_safe_alphabet() {
        let json = Json::String("-_8=".to_owned());
        assert_eq!(parse_bytes(&json).unwrap(), vec![0xfb, 0xff]);
    }
}
