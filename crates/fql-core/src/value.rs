//! The value model: data returned by the server, or literals to embed in a query.
//!
//! [`Value`] is a closed set of variants. Scalars map to JSON scalars; the
//! special variants ([`Ref`], set refs, timestamps, dates, bytes and query
//! literals) each have a single-key tagged wire form such as `{"@ref": ...}`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::json::Json;

/// A mapping of string keys to values. Keys are unique.
pub type Object = BTreeMap<String, Value>;

/// A decoded wire value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    /// A wire number without fraction.
    Long(i64),
    /// A wire number with fraction or exponent.
    Double(f64),
    Boolean(bool),
    Null,
    Array(Vec<Value>),
    Object(Object),
    Ref(Ref),
    /// A set definition, opaque to the client and only round-tripped.
    SetRef(Object),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Bytes(Vec<u8>),
    /// An embedded query, carried as raw JSON.
    Query(Json),
}

impl Value {
    /// Name of the variant, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Boolean(_) => "boolean",
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Ref(_) => "ref",
            Value::SetRef(_) => "set",
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::Bytes(_) => "bytes",
            Value::Query(_) => "query",
        }
    }

    /// Build an object value from key-value pairs; a repeated key keeps the last value.
    pub fn object<K, V, I>(entries: I) -> Value
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Long(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Ref> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// Built-in references that exist in every database and need no owning class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeRef {
    Classes,
    Indexes,
    Databases,
    Functions,
    Keys,
    Tokens,
    Credentials,
}

impl NativeRef {
    pub const ALL: [NativeRef; 7] = [
        NativeRef::Classes,
        NativeRef::Indexes,
        NativeRef::Databases,
        NativeRef::Functions,
        NativeRef::Keys,
        NativeRef::Tokens,
        NativeRef::Credentials,
    ];

    pub fn id(self) -> &'static str {
        match self {
            NativeRef::Classes => "classes",
            NativeRef::Indexes => "indexes",
            NativeRef::Databases => "databases",
            NativeRef::Functions => "functions",
            NativeRef::Keys => "keys",
            NativeRef::Tokens => "tokens",
            NativeRef::Credentials => "credentials",
        }
    }

    pub fn from_id(id: &str) -> Option<NativeRef> {
        NativeRef::ALL.into_iter().find(|native| native.id() == id)
    }
}

/// A reference to a database entity.
///
/// Equality is structural: two refs are equal when their ids and their
/// optional owning class and database refs are all equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ref {
    id: String,
    class: Option<Box<Ref>>,
    database: Option<Box<Ref>>,
}

impl Ref {
    pub fn new(id: impl Into<String>) -> Self {
        Ref {
            id: id.into(),
            class: None,
            database: None,
        }
    }

    /// Attach the owning class.
    pub fn with_class(mut self, class: Ref) -> Self {
        self.class = Some(Box::new(class));
        self
    }

    /// Attach the owning database.
    pub fn with_database(mut self, database: Ref) -> Self {
        self.database = Some(Box::new(database));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn class(&self) -> Option<&Ref> {
        self.class.as_deref()
    }

    pub fn database(&self) -> Option<&Ref> {
        self.database.as_deref()
    }

    /// The built-in reference this names, if it has no owners and a well-known id.
    pub fn native(&self) -> Option<NativeRef> {
        if self.class.is_some() || self.database.is_some() {
            return None;
        }
        NativeRef::from_id(&self.id)
    }
}

impl From<NativeRef> for Ref {
    fn from(native: NativeRef) -> Self {
        Ref::new(native.id())
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref(id={:?}", self.id)?;
        if let Some(class) = &self.class {
            write!(f, ", class={class}")?;
        }
        if let Some(database) = &self.database {
            write!(f, ", database={database}")?;
        }
        f.write_str(")")
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, map: &Object) -> fmt::Result {
    f.write_str("{")?;
    for (i, (k, v)) in map.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{k:?}: {v}")?;
    }
    f.write_str("}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Double(d) => write!(f, "{d:?}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => write_entries(f, map),
            Value::Ref(r) => write!(f, "{r}"),
            Value::SetRef(map) => {
                f.write_str("Set(")?;
                write_entries(f, map)?;
                f.write_str(")")
            }
            Value::Timestamp(ts) => write!(f, "Timestamp({})", ts.to_rfc3339()),
            Value::Date(date) => write!(f, "Date({})", date.format("%Y-%m-%d")),
            Value::Bytes(bytes) => write!(f, "Bytes({bytes:02x?})"),
            Value::Query(json) => write!(f, "Query({json})"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Long(n.into())
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Ref> for Value {
    fn from(r: Ref) -> Self {
        Value::Ref(r)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::Date(date)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refs_compare_structurally() {
        let a = Ref::new("101").with_class(Ref::new("spells"));
        let b = Ref::new("101").with_class(Ref::new("spells"));
        let c = Ref::new("101").with_class(Ref::new("characters"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Ref::new("101"));
    }

    #[test]
    fn native_lookup_requires_no_owners() {
        assert_eq!(Ref::new("classes").native(), Some(NativeRef::Classes));
        assert_eq!(
            Ref::new("classes").with_database(Ref::new("db")).native(),
            None
        );
        assert_eq!(Ref::new("spells").native(), None);
    }

    #[test]
    fn display_is_compact() {
        let value = Value::object([
            ("ref", Value::Ref(Ref::new("1").with_class(Ref::new("spells")))),
            ("tags", Value::Array(vec!["a".into(), Value::Null])),
        ]);
        assert_eq!(
            value.to_string(),
            r#"{"ref": Ref(id="1", class=Ref(id="spells")), "tags": ["a", null]}"#
        );
    }
}
