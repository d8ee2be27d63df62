//! Encoder: expressions and values → wire JSON.
//!
//! Encoding is total and pure. The rules:
//!
//! - Scalars map directly to JSON scalars.
//! - Object literals wrap under `"object"`, so a user field named `ref` never
//!   collides with a special form.
//! - Special values encode as single-key tagged objects: `@ref`, `@set`,
//!   `@ts`, `@date`, `@bytes`, `@query`.
//! - A function call encodes as one object with a key per named argument.
//! - Variadic arguments collapse to a bare value when singular, else an array.
//!
//! # Example
//! ```
//! use fql_core::{encode_to_string, Expr, Ref};
//!
//! let expr = Expr::object([("test", Expr::from(1)), ("test2", Ref::new("some/ref").into())]);
//! assert_eq!(
//!     encode_to_string(&expr),
//!     r#"{"object":{"test":1,"test2":{"@ref":{"id":"some/ref"}}}}"#
//! );
//! ```

use base64::Engine;
use chrono::{DateTime, SecondsFormat, Timelike, Utc};

use crate::expr::{Call, Expr, ToExpr};
use crate::json::Json;
use crate::value::{Object, Ref, Value};

/// Encode an expression to wire bytes.
pub fn encode(expr: &Expr) -> Vec<u8> {
    to_json(expr).to_vec()
}

/// Encode an expression to a wire JSON string.
pub fn encode_to_string(expr: &Expr) -> String {
    to_json(expr).to_string()
}

/// Encode any caller type that knows how to express itself as a query.
pub fn encode_as<T: ToExpr + ?Sized>(item: &T) -> Vec<u8> {
    encode(&item.to_expr())
}

/// Build the JSON IR for an expression.
pub fn to_json(expr: &Expr) -> Json {
    tracing::trace!("encoding expression");
    expr_to_json(expr)
}

/// Build the JSON IR for a value.
///
/// A non-finite `Value::Double` stays a double in the IR but renders as
/// `null` in wire text, so it decodes back as `Value::Null`.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(s.clone()),
        Value::Long(n) => Json::Number(*n),
        Value::Double(d) => Json::Double(*d),
        Value::Boolean(b) => Json::Boolean(*b),
        Value::Null => Json::Null,
        Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Object(map) => tagged("object", object_fields(map)),
        Value::Ref(r) => ref_to_json(r),
        Value::SetRef(map) => tagged("@set", object_fields(map)),
        Value::Timestamp(ts) => tagged("@ts", Json::String(format_timestamp(ts))),
        Value::Date(date) => tagged("@date", Json::String(date.format("%Y-%m-%d").to_string())),
        Value::Bytes(bytes) => tagged(
            "@bytes",
            Json::String(base64::engine::general_purpose::STANDARD.encode(bytes)),
        ),
        Value::Query(json) => tagged("@query", json.clone()),
    }
}

fn expr_to_json(expr: &Expr) -> Json {
    match expr {
        Expr::Value(value) => value_to_json(value),
        Expr::Array(items) => Json::Array(items.iter().map(expr_to_json).collect()),
        Expr::Object(fields) => tagged(
            "object",
            Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), expr_to_json(v)))
                    .collect(),
            ),
        ),
        Expr::Call(call) => call_to_json(call),
    }
}

fn call_to_json(call: &Call) -> Json {
    let fields: Vec<(&'static str, Json)> = match call {
        Call::Variadic(function, items) => vec![(function.key(), varargs(items))],
        Call::Unary(function, arg) => vec![(function.key(), expr_to_json(arg))],
        Call::Collection {
            function,
            argument,
            collection,
        } => vec![
            (function.key(), expr_to_json(argument)),
            ("collection", expr_to_json(collection)),
        ],
        Call::Write {
            function,
            reference,
            params,
        } => vec![
            (function.key(), expr_to_json(reference)),
            ("params", expr_to_json(params)),
        ],
        Call::Ref { class, id } => vec![("ref", expr_to_json(class)), ("id", expr_to_json(id))],
        Call::Get { reference, ts } => {
            let mut fields = vec![("get", expr_to_json(reference))];
            push_optional(&mut fields, "ts", ts.as_ref());
            fields
        }
        Call::Exists { reference, ts } => {
            let mut fields = vec![("exists", expr_to_json(reference))];
            push_optional(&mut fields, "ts", ts.as_ref());
            fields
        }
        Call::Paginate { set, options } => {
            let mut fields = vec![("paginate", expr_to_json(set))];
            push_optional(&mut fields, "ts", options.ts.as_ref());
            push_optional(&mut fields, "after", options.after.as_ref());
            push_optional(&mut fields, "before", options.before.as_ref());
            push_optional(&mut fields, "size", options.size.as_ref());
            if options.events {
                fields.push(("events", Json::Boolean(true)));
            }
            if options.sources {
                fields.push(("sources", Json::Boolean(true)));
            }
            fields
        }
        Call::Match { index, terms } => {
            let mut fields = vec![("match", expr_to_json(index))];
            if !terms.is_empty() {
                fields.push(("terms", varargs(terms)));
            }
            fields
        }
        Call::Join { source, target } => {
            vec![("join", expr_to_json(source)), ("with", expr_to_json(target))]
        }
        Call::Insert {
            reference,
            ts,
            action,
            params,
        } => vec![
            ("insert", expr_to_json(reference)),
            ("ts", expr_to_json(ts)),
            ("action", expr_to_json(action)),
            ("params", expr_to_json(params)),
        ],
        Call::Remove {
            reference,
            ts,
            action,
        } => vec![
            ("remove", expr_to_json(reference)),
            ("ts", expr_to_json(ts)),
            ("action", expr_to_json(action)),
        ],
        // Bindings are a raw object, not an object literal.
        Call::Let { bindings, body } => vec![
            (
                "let",
                Json::object(bindings.iter().map(|(k, v)| (k.clone(), expr_to_json(v)))),
            ),
            ("in", expr_to_json(body)),
        ],
        Call::If {
            condition,
            then,
            otherwise,
        } => vec![
            ("if", expr_to_json(condition)),
            ("then", expr_to_json(then)),
            ("else", expr_to_json(otherwise)),
        ],
        Call::Lambda { params, body } => {
            let names: Vec<Json> = params.iter().map(|p| Json::String(p.clone())).collect();
            vec![("lambda", collapse(names)), ("expr", expr_to_json(body))]
        }
        Call::At { ts, expr } => vec![("at", expr_to_json(ts)), ("expr", expr_to_json(expr))],
        Call::Invoke {
            function,
            arguments,
        } => vec![
            ("call", expr_to_json(function)),
            ("arguments", varargs(arguments)),
        ],
        Call::Contains { path, value } => {
            vec![("contains", expr_to_json(path)), ("in", expr_to_json(value))]
        }
        Call::Select {
            path,
            from,
            default,
        } => {
            let mut fields = vec![("select", expr_to_json(path)), ("from", expr_to_json(from))];
            push_optional(&mut fields, "default", default.as_ref());
            fields
        }
        Call::Concat { strings, separator } => {
            let mut fields = vec![("concat", varargs(strings))];
            push_optional(&mut fields, "separator", separator.as_ref());
            fields
        }
        Call::Epoch { number, unit } => {
            vec![("epoch", expr_to_json(number)), ("unit", expr_to_json(unit))]
        }
        Call::Identify {
            reference,
            password,
        } => vec![
            ("identify", expr_to_json(reference)),
            ("password", expr_to_json(password)),
        ],
    };
    Json::object(fields)
}

fn push_optional(fields: &mut Vec<(&'static str, Json)>, key: &'static str, expr: Option<&Expr>) {
    if let Some(expr) = expr {
        fields.push((key, expr_to_json(expr)));
    }
}

/// One argument encodes bare; zero or several encode as an array.
fn varargs(items: &[Expr]) -> Json {
    collapse(items.iter().map(expr_to_json).collect())
}

fn collapse(mut items: Vec<Json>) -> Json {
    if items.len() == 1 {
        items.remove(0)
    } else {
        Json::Array(items)
    }
}

fn tagged(tag: &str, payload: Json) -> Json {
    Json::Object(vec![(tag.to_owned(), payload)])
}

fn object_fields(map: &Object) -> Json {
    Json::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}

fn ref_to_json(r: &Ref) -> Json {
    let mut fields = vec![("id".to_owned(), Json::String(r.id().to_owned()))];
    if let Some(class) = r.class() {
        fields.push(("class".to_owned(), ref_to_json(class)));
    }
    if let Some(database) = r.database() {
        fields.push(("database".to_owned(), ref_to_json(database)));
    }
    tagged("@ref", Json::Object(fields))
}

/// Millisecond precision with a `Z` suffix; finer digits only when the
/// instant carries them, so decoding reproduces the same instant.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let format = if ts.nanosecond() % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::AutoSi
    };
    ts.to_rfc3339_opts(format, true)
}
