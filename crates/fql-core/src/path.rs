//! Field paths: project a typed value out of a decoded [`Value`] tree.
//!
//! A [`Path`] is a sequence of [`Segment`]s. A key segment selects a field of an
//! object and an index segment selects an element of an array. [`get`] walks
//! the segments left to right, then converts the terminal value with
//! [`FromValue`].
//!
//! ```
//! use fql_core::{decode_str, path::get, Path};
//!
//! let value = decode_str(r#"{"data": {"test": 1}}"#).unwrap();
//! let n: i64 = get(&value, &Path::from(["data", "test"])).unwrap();
//! assert_eq!(n, 1);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::convert::FromValue;
use crate::error::PathError;
use crate::expr::Expr;
use crate::value::Value;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key:?}"),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_owned())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// An ordered sequence of segments, built by the caller and consumed by [`get`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, addressing the value itself.
    pub fn root() -> Self {
        Path::default()
    }

    /// Append a segment.
    pub fn push(mut self, segment: impl Into<Segment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn key(self, key: impl Into<String>) -> Self {
        self.push(Segment::Key(key.into()))
    }

    pub fn index(self, index: usize) -> Self {
        self.push(Segment::Index(index))
    }

    /// This path followed by `rest`.
    pub fn join(&self, rest: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(rest.segments.iter().cloned());
        Path { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walk the path, returning the addressed value without converting it.
    pub fn resolve<'v>(&self, value: &'v Value) -> Result<&'v Value, PathError> {
        let mut current = value;
        for (depth, segment) in self.segments.iter().enumerate() {
            let traversed = || Path {
                segments: self.segments[..depth].to_vec(),
            };
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => {
                    map.get(key).ok_or_else(|| PathError::NotFound {
                        segment: segment.clone(),
                        path: traversed(),
                    })?
                }
                (Segment::Index(i), Value::Array(items)) => {
                    items.get(*i).ok_or_else(|| PathError::NotFound {
                        segment: segment.clone(),
                        path: traversed(),
                    })?
                }
                (_, other) => {
                    return Err(PathError::NotNavigable {
                        segment: segment.clone(),
                        actual: other.kind(),
                        path: traversed(),
                    })
                }
            };
        }
        Ok(current)
    }

    /// Walk the path and convert the terminal value to `T`.
    pub fn extract<T: FromValue>(&self, value: &Value) -> Result<T, PathError> {
        let terminal = self.resolve(value)?;
        T::from_value(terminal).map_err(|e| e.within(self))
    }
}

/// Extract a `T` at `path`, failing with a [`PathError`] on a missing segment
/// or type mismatch.
pub fn get<T: FromValue>(value: &Value, path: &Path) -> Result<T, PathError> {
    path.extract(value)
}

/// Like [`get`], but any failure yields `None`.
pub fn get_opt<T: FromValue>(value: &Value, path: &Path) -> Option<T> {
    match path.extract(value) {
        Ok(found) => Some(found),
        Err(err) => {
            tracing::trace!(%err, "optional extraction absent");
            None
        }
    }
}

impl Value {
    /// See [`get`].
    pub fn get<T: FromValue>(&self, path: impl Into<Path>) -> Result<T, PathError> {
        path.into().extract(self)
    }

    /// See [`get_opt`].
    pub fn get_opt<T: FromValue>(&self, path: impl Into<Path>) -> Option<T> {
        get_opt(self, &path.into())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                Segment::Key(key) => f.write_str(key)?,
                Segment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

/// Parses the dotted text form: `data.items.0`. All-digit segments are indices.
impl FromStr for Path {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Ok(Path::root());
        }
        text.split('.')
            .map(|part| {
                if part.is_empty() {
                    Err(PathError::InvalidPath(text.to_owned()))
                } else if part.bytes().all(|b| b.is_ascii_digit()) {
                    part.parse::<usize>()
                        .map(Segment::Index)
                        .map_err(|_| PathError::InvalidPath(text.to_owned()))
                } else {
                    Ok(Segment::Key(part.to_owned()))
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|segments| Path { segments })
    }
}

impl<S: Into<Segment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<Segment>, const N: usize> From<[S; N]> for Path {
    fn from(segments: [S; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path { segments }
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

/// A path sent to the server (for `select`, `contains`) is an array of
/// string and integer segments.
impl From<&Path> for Expr {
    fn from(path: &Path) -> Self {
        Expr::array(path.segments.iter().map(|segment| match segment {
            Segment::Key(key) => Expr::from(key.as_str()),
            Segment::Index(i) => Expr::from(i64::try_from(*i).unwrap_or(i64::MAX)),
        }))
    }
}

impl From<Path> for Expr {
    fn from(path: Path) -> Self {
        Expr::from(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_text() {
        let path: Path = "data.items.0".parse().unwrap();
        assert_eq!(path, Path::root().key("data").key("items").index(0));
        assert_eq!(path.to_string(), "data.items.0");
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(matches!(
            "data..x".parse::<Path>(),
            Err(PathError::InvalidPath(_))
        ));
    }

    #[test]
    fn empty_text_is_root() {
        assert!("".parse::<Path>().unwrap().is_root());
    }
}
