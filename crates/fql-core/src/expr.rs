//! Query expressions: literals plus the closed set of query function calls.
//!
//! An [`Expr`] is plain, immutable data. It is never evaluated locally; the
//! [`encoder`](crate::encoder) turns it into wire JSON with one exhaustive match,
//! so adding a query function means adding a [`Call`] variant and one arm.
//! Use the constructors in [`query`](crate::query) rather than building calls by hand.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::value::{NativeRef, Ref, Value};

/// A node that can be encoded and sent as part of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Value(Value),
    /// An array whose elements may themselves be expressions.
    Array(Vec<Expr>),
    /// An object literal whose fields may be expressions. Encodes under `"object"`.
    Object(BTreeMap<String, Expr>),
    /// A query function call.
    Call(Box<Call>),
}

impl Expr {
    pub fn null() -> Expr {
        Expr::Value(Value::Null)
    }

    /// Build an array expression.
    pub fn array<I>(items: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Expr::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build an object literal; a repeated key keeps the last value.
    pub fn object<K, V, I>(fields: I) -> Expr
    where
        K: Into<String>,
        V: Into<Expr>,
        I: IntoIterator<Item = (K, V)>,
    {
        Expr::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Expr {
        Expr::Value(Value::Bytes(bytes.into()))
    }
}

/// Capability for caller-defined types that can be embedded in a query.
///
/// Paired with [`FromValue`](crate::FromValue) for the decoding direction.
pub trait ToExpr {
    fn to_expr(&self) -> Expr;
}

impl ToExpr for Expr {
    fn to_expr(&self) -> Expr {
        self.clone()
    }
}

impl ToExpr for Value {
    fn to_expr(&self) -> Expr {
        Expr::Value(self.clone())
    }
}

impl ToExpr for Ref {
    fn to_expr(&self) -> Expr {
        Expr::Value(Value::Ref(self.clone()))
    }
}

/// Query functions taking a variable number of arguments under a single key.
///
/// One argument encodes bare, several encode as an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variadic {
    Union,
    Intersection,
    Difference,
    Do,
    Equals,
    Add,
    Multiply,
    Subtract,
    Divide,
    Modulo,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

impl Variadic {
    pub fn key(self) -> &'static str {
        match self {
            Variadic::Union => "union",
            Variadic::Intersection => "intersection",
            Variadic::Difference => "difference",
            Variadic::Do => "do",
            Variadic::Equals => "equals",
            Variadic::Add => "add",
            Variadic::Multiply => "multiply",
            Variadic::Subtract => "subtract",
            Variadic::Divide => "divide",
            Variadic::Modulo => "modulo",
            Variadic::Lt => "lt",
            Variadic::Lte => "lte",
            Variadic::Gt => "gt",
            Variadic::Gte => "gte",
            Variadic::And => "and",
            Variadic::Or => "or",
        }
    }
}

/// Query functions taking exactly one argument under their own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unary {
    Class,
    Index,
    Database,
    Function,
    Var,
    Delete,
    Distinct,
    Singleton,
    Events,
    KeyFromSecret,
    CreateClass,
    CreateDatabase,
    CreateIndex,
    CreateKey,
    CreateFunction,
    Abort,
    Query,
    Not,
    Casefold,
    Time,
    Date,
    Logout,
    NextId,
}

impl Unary {
    pub fn key(self) -> &'static str {
        match self {
            Unary::Class => "class",
            Unary::Index => "index",
            Unary::Database => "database",
            Unary::Function => "function",
            Unary::Var => "var",
            Unary::Delete => "delete",
            Unary::Distinct => "distinct",
            Unary::Singleton => "singleton",
            Unary::Events => "events",
            Unary::KeyFromSecret => "key_from_secret",
            Unary::CreateClass => "create_class",
            Unary::CreateDatabase => "create_database",
            Unary::CreateIndex => "create_index",
            Unary::CreateKey => "create_key",
            Unary::CreateFunction => "create_function",
            Unary::Abort => "abort",
            Unary::Query => "query",
            Unary::Not => "not",
            Unary::Casefold => "casefold",
            Unary::Time => "time",
            Unary::Date => "date",
            Unary::Logout => "logout",
            Unary::NextId => "next_id",
        }
    }
}

/// Functions of the shape `{"<fn>": <first>, "collection": <collection>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionFn {
    Map,
    Foreach,
    Filter,
    Take,
    Drop,
    Prepend,
    Append,
}

impl CollectionFn {
    pub fn key(self) -> &'static str {
        match self {
            CollectionFn::Map => "map",
            CollectionFn::Foreach => "foreach",
            CollectionFn::Filter => "filter",
            CollectionFn::Take => "take",
            CollectionFn::Drop => "drop",
            CollectionFn::Prepend => "prepend",
            CollectionFn::Append => "append",
        }
    }
}

/// Functions of the shape `{"<fn>": <reference>, "params": <params>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFn {
    Create,
    Update,
    Replace,
    Login,
}

impl WriteFn {
    pub fn key(self) -> &'static str {
        match self {
            WriteFn::Create => "create",
            WriteFn::Update => "update",
            WriteFn::Replace => "replace",
            WriteFn::Login => "login",
        }
    }
}

/// Options for a `paginate` call. Unset options are omitted from the wire form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paginate {
    pub ts: Option<Expr>,
    pub after: Option<Expr>,
    pub before: Option<Expr>,
    pub size: Option<Expr>,
    pub events: bool,
    pub sources: bool,
}

/// A query function call. Each variant carries its named arguments; the
/// encoder emits one JSON key per argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Variadic(Variadic, Vec<Expr>),
    Unary(Unary, Expr),
    Collection {
        function: CollectionFn,
        argument: Expr,
        collection: Expr,
    },
    Write {
        function: WriteFn,
        reference: Expr,
        params: Expr,
    },
    Ref {
        class: Expr,
        id: Expr,
    },
    Get {
        reference: Expr,
        ts: Option<Expr>,
    },
    Exists {
        reference: Expr,
        ts: Option<Expr>,
    },
    Paginate {
        set: Expr,
        options: Paginate,
    },
    Match {
        index: Expr,
        terms: Vec<Expr>,
    },
    Join {
        source: Expr,
        target: Expr,
    },
    Insert {
        reference: Expr,
        ts: Expr,
        action: Expr,
        params: Expr,
    },
    Remove {
        reference: Expr,
        ts: Expr,
        action: Expr,
    },
    Let {
        bindings: Vec<(String, Expr)>,
        body: Expr,
    },
    If {
        condition: Expr,
        then: Expr,
        otherwise: Expr,
    },
    Lambda {
        params: Vec<String>,
        body: Expr,
    },
    At {
        ts: Expr,
        expr: Expr,
    },
    Invoke {
        function: Expr,
        arguments: Vec<Expr>,
    },
    Contains {
        path: Expr,
        value: Expr,
    },
    Select {
        path: Expr,
        from: Expr,
        default: Option<Expr>,
    },
    Concat {
        strings: Vec<Expr>,
        separator: Option<Expr>,
    },
    Epoch {
        number: Expr,
        unit: Expr,
    },
    Identify {
        reference: Expr,
        password: Expr,
    },
}

impl From<Call> for Expr {
    fn from(call: Call) -> Self {
        Expr::Call(Box::new(call))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}

impl From<Ref> for Expr {
    fn from(r: Ref) -> Self {
        Expr::Value(Value::Ref(r))
    }
}

impl From<NativeRef> for Expr {
    fn from(native: NativeRef) -> Self {
        Expr::Value(Value::Ref(native.into()))
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Value(Value::String(s.to_owned()))
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Value(Value::String(s))
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::Value(Value::Long(n))
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::Value(Value::Long(n.into()))
    }
}

impl From<f64> for Expr {
    fn from(d: f64) -> Self {
        Expr::Value(Value::Double(d))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Value(Value::Boolean(b))
    }
}

impl From<DateTime<Utc>> for Expr {
    fn from(ts: DateTime<Utc>) -> Self {
        Expr::Value(Value::Timestamp(ts))
    }
}

impl From<NaiveDate> for Expr {
    fn from(date: NaiveDate) -> Self {
        Expr::Value(Value::Date(date))
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }
}

impl<T: Into<Expr>> From<Option<T>> for Expr {
    fn from(value: Option<T>) -> Self {
        value.map_or(Expr::null(), Into::into)
    }
}
