//! Conversion of decoded values into Rust target types.
//!
//! [`FromValue`] is the explicit, fallible conversion the field path extractor
//! applies to a terminal value. Composite targets (`Vec<T>`, maps, `Option<T>`)
//! convert every child with the same rule, and caller-defined types implement
//! the trait themselves:
//!
//! ```
//! use fql_core::{decode_str, FromValue, PathError, Value};
//!
//! struct Spell {
//!     name: String,
//!     cost: i64,
//! }
//!
//! impl FromValue for Spell {
//!     fn from_value(value: &Value) -> Result<Self, PathError> {
//!         Ok(Spell {
//!             name: value.get(["name"])?,
//!             cost: value.get(["cost"])?,
//!         })
//!     }
//! }
//!
//! let value = decode_str(r#"{"data": {"name": "Fire", "cost": 10}}"#).unwrap();
//! let spell: Spell = value.get(["data"]).unwrap();
//! assert_eq!((spell.name.as_str(), spell.cost), ("Fire", 10));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::PathError;
use crate::json::Json;
use crate::path::Path;
use crate::value::{Object, Ref, Value};

/// Fallible conversion from a decoded [`Value`].
///
/// Errors are reported relative to the value passed in; the extractor
/// re-anchors them under the path it traversed.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, PathError>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(PathError::mismatch("string", other.kind())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        match value {
            Value::Long(n) => Ok(*n),
            other => Err(PathError::mismatch("long", other.kind())),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        let n = i64::from_value(value)?;
        i32::try_from(n).map_err(|_| PathError::invalid(format!("{n} does not fit in i32")))
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        let n = i64::from_value(value)?;
        u64::try_from(n).map_err(|_| PathError::invalid(format!("{n} is negative")))
    }
}

/// Whole numbers arrive as longs, so both numeric variants are accepted.
impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        value
            .as_f64()
            .ok_or_else(|| PathError::mismatch("double", value.kind()))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        value
            .as_bool()
            .ok_or_else(|| PathError::mismatch("boolean", value.kind()))
    }
}

impl FromValue for Ref {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        match value {
            Value::Ref(r) => Ok(r.clone()),
            other => Err(PathError::mismatch("ref", other.kind())),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            other => Err(PathError::mismatch("timestamp", other.kind())),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        match value {
            Value::Date(date) => Ok(*date),
            other => Err(PathError::mismatch("date", other.kind())),
        }
    }
}

/// The raw payload of an embedded query.
impl FromValue for Json {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        match value {
            Value::Query(json) => Ok(json.clone()),
            other => Err(PathError::mismatch("query", other.kind())),
        }
    }
}

/// Extraction target for a `@bytes` value.
///
/// `Vec<u8>` already means "array of numbers" through the `Vec<T>` impl, so
/// binary payloads get their own type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(bytes: Bytes) -> Self {
        bytes.0
    }
}

impl FromValue for Bytes {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        value
            .as_bytes()
            .map(|b| Bytes(b.to_vec()))
            .ok_or_else(|| PathError::mismatch("bytes", value.kind()))
    }
}

/// Extraction target for a `@set` value: the fields describing the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Set(pub Object);

impl Set {
    pub fn into_inner(self) -> Object {
        self.0
    }

    /// Extract a typed field of the set description, such as its `match` index.
    pub fn field<T: FromValue>(&self, key: &str) -> Result<T, PathError> {
        let item = self.0.get(key).ok_or_else(|| PathError::NotFound {
            segment: key.into(),
            path: Path::root(),
        })?;
        T::from_value(item).map_err(|e| e.at(key))
    }
}

impl FromValue for Set {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        match value {
            Value::SetRef(fields) => Ok(Set(fields.clone())),
            other => Err(PathError::mismatch("set", other.kind())),
        }
    }
}

/// `null` converts to `None`; anything else must convert to `T`.
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        let items = value
            .as_array()
            .ok_or_else(|| PathError::mismatch("array", value.kind()))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_value(item).map_err(|e| e.at(i)))
            .collect()
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        entries(value)?.collect()
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn from_value(value: &Value) -> Result<Self, PathError> {
        entries(value)?.collect()
    }
}

fn entries<T: FromValue>(
    value: &Value,
) -> Result<impl Iterator<Item = Result<(String, T), PathError>> + '_, PathError> {
    let map = value
        .as_object()
        .ok_or_else(|| PathError::mismatch("object", value.kind()))?;
    Ok(map.iter().map(|(key, item)| {
        T::from_value(item)
            .map(|converted| (key.clone(), converted))
            .map_err(|e| e.at(key.as_str()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_element_errors_carry_index() {
        let value = Value::Array(vec![Value::Long(1), Value::from("two")]);
        let err = Vec::<i64>::from_value(&value).unwrap_err();
        assert_eq!(
            err,
            PathError::TypeMismatch {
                expected: "long",
                actual: "string",
                path: Path::root().index(1),
            }
        );
    }

    #[test]
    fn long_widens_to_double() {
        assert_eq!(f64::from_value(&Value::Long(3)).unwrap(), 3.0);
    }

    #[test]
    fn bytes_are_not_a_number_array() {
        let value = Value::Bytes(vec![0, 1]);
        assert_eq!(Bytes::from_value(&value).unwrap(), Bytes(vec![0, 1]));
        assert!(Vec::<i64>::from_value(&value).is_err());
    }

    #[test]
    fn set_field_errors_carry_key() {
        let set = Set::from_value(&Value::SetRef(Object::from([(
            "terms".to_owned(),
            Value::Long(1),
        )])))
        .unwrap();
        assert_eq!(set.field::<i64>("terms").unwrap(), 1);
        assert_eq!(
            set.field::<String>("terms").unwrap_err().path(),
            Some(&Path::root().key("terms"))
        );
    }

    #[test]
    fn null_is_none() {
        assert_eq!(Option::<String>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(&Value::from("x")).unwrap(),
            Some("x".to_owned())
        );
    }
}
