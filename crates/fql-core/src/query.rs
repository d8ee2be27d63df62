//! Constructors for query function calls.
//!
//! Every function returns an [`Expr`]. Arguments take anything convertible into
//! an expression, so literals, refs and nested calls compose directly:
//!
//! ```
//! use fql_core::query::{create, class, get, match_index, index};
//! use fql_core::{encode_to_string, Expr};
//!
//! let q = create(class("spells"), Expr::object([("data", Expr::object([("name", "Fire")]))]));
//! assert!(encode_to_string(&q).starts_with(r#"{"create":{"class":"spells"}"#));
//!
//! let m = match_index(index("spells_by_element"), ["fire"]);
//! assert_eq!(encode_to_string(&m), r#"{"match":{"index":"spells_by_element"},"terms":"fire"}"#);
//! ```
//!
//! Variadic arguments (`terms`, `union` sets, `add` operands, ...) accept any
//! iterator. A single element encodes bare and several encode as an array.

use crate::expr::{Call, CollectionFn, Expr, Paginate, Unary, Variadic, WriteFn};

fn args<I>(items: I) -> Vec<Expr>
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    items.into_iter().map(Into::into).collect()
}

fn variadic<I>(function: Variadic, items: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Call::Variadic(function, args(items)).into()
}

fn unary(function: Unary, arg: impl Into<Expr>) -> Expr {
    Call::Unary(function, arg.into()).into()
}

fn collection_fn(function: CollectionFn, argument: impl Into<Expr>, collection: impl Into<Expr>) -> Expr {
    Call::Collection {
        function,
        argument: argument.into(),
        collection: collection.into(),
    }
    .into()
}

fn write_fn(function: WriteFn, reference: impl Into<Expr>, params: impl Into<Expr>) -> Expr {
    Call::Write {
        function,
        reference: reference.into(),
        params: params.into(),
    }
    .into()
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

pub fn class(name: impl Into<Expr>) -> Expr {
    unary(Unary::Class, name)
}

pub fn index(name: impl Into<Expr>) -> Expr {
    unary(Unary::Index, name)
}

pub fn database(name: impl Into<Expr>) -> Expr {
    unary(Unary::Database, name)
}

pub fn function(name: impl Into<Expr>) -> Expr {
    unary(Unary::Function, name)
}

/// A reference to the instance `id` of `class`.
pub fn ref_in(class: impl Into<Expr>, id: impl Into<Expr>) -> Expr {
    Call::Ref {
        class: class.into(),
        id: id.into(),
    }
    .into()
}

pub fn next_id() -> Expr {
    unary(Unary::NextId, Expr::null())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub fn get(reference: impl Into<Expr>) -> Expr {
    Call::Get {
        reference: reference.into(),
        ts: None,
    }
    .into()
}

/// Read `reference` as of the timestamp `ts`.
pub fn get_at(reference: impl Into<Expr>, ts: impl Into<Expr>) -> Expr {
    Call::Get {
        reference: reference.into(),
        ts: Some(ts.into()),
    }
    .into()
}

pub fn exists(reference: impl Into<Expr>) -> Expr {
    Call::Exists {
        reference: reference.into(),
        ts: None,
    }
    .into()
}

pub fn exists_at(reference: impl Into<Expr>, ts: impl Into<Expr>) -> Expr {
    Call::Exists {
        reference: reference.into(),
        ts: Some(ts.into()),
    }
    .into()
}

pub fn paginate(set: impl Into<Expr>) -> Expr {
    paginate_with(set, Paginate::default())
}

pub fn paginate_with(set: impl Into<Expr>, options: Paginate) -> Expr {
    Call::Paginate {
        set: set.into(),
        options,
    }
    .into()
}

pub fn key_from_secret(secret: impl Into<Expr>) -> Expr {
    unary(Unary::KeyFromSecret, secret)
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

/// The set of instances in `index` matching `terms`. With no terms the
/// `terms` key is omitted.
pub fn match_index<I>(index: impl Into<Expr>, terms: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Call::Match {
        index: index.into(),
        terms: args(terms),
    }
    .into()
}

pub fn union<I>(sets: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Union, sets)
}

pub fn intersection<I>(sets: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Intersection, sets)
}

pub fn difference<I>(sets: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Difference, sets)
}

pub fn distinct(set: impl Into<Expr>) -> Expr {
    unary(Unary::Distinct, set)
}

pub fn join(source: impl Into<Expr>, target: impl Into<Expr>) -> Expr {
    Call::Join {
        source: source.into(),
        target: target.into(),
    }
    .into()
}

pub fn singleton(reference: impl Into<Expr>) -> Expr {
    unary(Unary::Singleton, reference)
}

pub fn events(reference_or_set: impl Into<Expr>) -> Expr {
    unary(Unary::Events, reference_or_set)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

pub fn create(class: impl Into<Expr>, params: impl Into<Expr>) -> Expr {
    write_fn(WriteFn::Create, class, params)
}

pub fn update(reference: impl Into<Expr>, params: impl Into<Expr>) -> Expr {
    write_fn(WriteFn::Update, reference, params)
}

pub fn replace(reference: impl Into<Expr>, params: impl Into<Expr>) -> Expr {
    write_fn(WriteFn::Replace, reference, params)
}

pub fn delete(reference: impl Into<Expr>) -> Expr {
    unary(Unary::Delete, reference)
}

/// Add an event to an instance's history.
pub fn insert(
    reference: impl Into<Expr>,
    ts: impl Into<Expr>,
    action: impl Into<Expr>,
    params: impl Into<Expr>,
) -> Expr {
    Call::Insert {
        reference: reference.into(),
        ts: ts.into(),
        action: action.into(),
        params: params.into(),
    }
    .into()
}

/// Remove an event from an instance's history.
pub fn remove(reference: impl Into<Expr>, ts: impl Into<Expr>, action: impl Into<Expr>) -> Expr {
    Call::Remove {
        reference: reference.into(),
        ts: ts.into(),
        action: action.into(),
    }
    .into()
}

pub fn create_class(params: impl Into<Expr>) -> Expr {
    unary(Unary::CreateClass, params)
}

pub fn create_database(params: impl Into<Expr>) -> Expr {
    unary(Unary::CreateDatabase, params)
}

pub fn create_index(params: impl Into<Expr>) -> Expr {
    unary(Unary::CreateIndex, params)
}

pub fn create_key(params: impl Into<Expr>) -> Expr {
    unary(Unary::CreateKey, params)
}

pub fn create_function(params: impl Into<Expr>) -> Expr {
    unary(Unary::CreateFunction, params)
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

/// Bind names for use in `body` via [`var`]. Bindings keep their order.
pub fn let_in<K, V, I>(bindings: I, body: impl Into<Expr>) -> Expr
where
    K: Into<String>,
    V: Into<Expr>,
    I: IntoIterator<Item = (K, V)>,
{
    Call::Let {
        bindings: bindings
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
        body: body.into(),
    }
    .into()
}

pub fn var(name: impl Into<String>) -> Expr {
    unary(Unary::Var, name.into())
}

pub fn if_then_else(
    condition: impl Into<Expr>,
    then: impl Into<Expr>,
    otherwise: impl Into<Expr>,
) -> Expr {
    Call::If {
        condition: condition.into(),
        then: then.into(),
        otherwise: otherwise.into(),
    }
    .into()
}

/// Evaluate expressions in order, returning the last.
pub fn do_all<I>(exprs: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Do, exprs)
}

/// An anonymous function over the named parameters.
pub fn lambda<I, S>(params: I, body: impl Into<Expr>) -> Expr
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Call::Lambda {
        params: params.into_iter().map(Into::into).collect(),
        body: body.into(),
    }
    .into()
}

/// Evaluate `expr` as of the timestamp `ts`.
pub fn at(ts: impl Into<Expr>, expr: impl Into<Expr>) -> Expr {
    Call::At {
        ts: ts.into(),
        expr: expr.into(),
    }
    .into()
}

pub fn abort(message: impl Into<Expr>) -> Expr {
    unary(Unary::Abort, message)
}

/// Wrap a lambda so it is stored rather than evaluated.
pub fn query(lambda: impl Into<Expr>) -> Expr {
    unary(Unary::Query, lambda)
}

/// Invoke a stored user function.
pub fn call<I>(function: impl Into<Expr>, arguments: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Call::Invoke {
        function: function.into(),
        arguments: args(arguments),
    }
    .into()
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

pub fn map(lambda: impl Into<Expr>, collection: impl Into<Expr>) -> Expr {
    collection_fn(CollectionFn::Map, lambda, collection)
}

pub fn foreach(lambda: impl Into<Expr>, collection: impl Into<Expr>) -> Expr {
    collection_fn(CollectionFn::Foreach, lambda, collection)
}

pub fn filter(lambda: impl Into<Expr>, collection: impl Into<Expr>) -> Expr {
    collection_fn(CollectionFn::Filter, lambda, collection)
}

pub fn take(count: impl Into<Expr>, collection: impl Into<Expr>) -> Expr {
    collection_fn(CollectionFn::Take, count, collection)
}

pub fn drop(count: impl Into<Expr>, collection: impl Into<Expr>) -> Expr {
    collection_fn(CollectionFn::Drop, count, collection)
}

pub fn prepend(elements: impl Into<Expr>, collection: impl Into<Expr>) -> Expr {
    collection_fn(CollectionFn::Prepend, elements, collection)
}

pub fn append(elements: impl Into<Expr>, collection: impl Into<Expr>) -> Expr {
    collection_fn(CollectionFn::Append, elements, collection)
}

// ---------------------------------------------------------------------------
// Navigation and predicates
// ---------------------------------------------------------------------------

/// Server-side projection of `path` out of `from`. A [`Path`](crate::Path)
/// converts into the expected array of segments.
pub fn select(path: impl Into<Expr>, from: impl Into<Expr>) -> Expr {
    Call::Select {
        path: path.into(),
        from: from.into(),
        default: None,
    }
    .into()
}

/// Like [`select`], returning `default` when the path is absent.
pub fn select_or(path: impl Into<Expr>, from: impl Into<Expr>, default: impl Into<Expr>) -> Expr {
    Call::Select {
        path: path.into(),
        from: from.into(),
        default: Some(default.into()),
    }
    .into()
}

pub fn contains(path: impl Into<Expr>, value: impl Into<Expr>) -> Expr {
    Call::Contains {
        path: path.into(),
        value: value.into(),
    }
    .into()
}

pub fn equals<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Equals, values)
}

pub fn lt<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Lt, values)
}

pub fn lte<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Lte, values)
}

pub fn gt<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Gt, values)
}

pub fn gte<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Gte, values)
}

pub fn and<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::And, values)
}

pub fn or<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Or, values)
}

pub fn not(value: impl Into<Expr>) -> Expr {
    unary(Unary::Not, value)
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

pub fn add<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Add, values)
}

pub fn multiply<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Multiply, values)
}

pub fn subtract<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Subtract, values)
}

pub fn divide<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Divide, values)
}

pub fn modulo<I>(values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    variadic(Variadic::Modulo, values)
}

// ---------------------------------------------------------------------------
// Strings and time
// ---------------------------------------------------------------------------

pub fn concat<I>(strings: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Call::Concat {
        strings: args(strings),
        separator: None,
    }
    .into()
}

pub fn concat_with<I>(strings: I, separator: impl Into<Expr>) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Call::Concat {
        strings: args(strings),
        separator: Some(separator.into()),
    }
    .into()
}

pub fn casefold(string: impl Into<Expr>) -> Expr {
    unary(Unary::Casefold, string)
}

/// Parse an ISO-8601 string (or `"now"`) into a timestamp on the server.
pub fn time(text: impl Into<Expr>) -> Expr {
    unary(Unary::Time, text)
}

/// A timestamp `number` units after the epoch; `unit` is e.g. `"second"`.
pub fn epoch(number: impl Into<Expr>, unit: impl Into<Expr>) -> Expr {
    Call::Epoch {
        number: number.into(),
        unit: unit.into(),
    }
    .into()
}

pub fn date(text: impl Into<Expr>) -> Expr {
    unary(Unary::Date, text)
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

pub fn login(reference: impl Into<Expr>, params: impl Into<Expr>) -> Expr {
    write_fn(WriteFn::Login, reference, params)
}

/// End the current session; `all_tokens` also invalidates every other token.
pub fn logout(all_tokens: bool) -> Expr {
    unary(Unary::Logout, all_tokens)
}

pub fn identify(reference: impl Into<Expr>, password: impl Into<Expr>) -> Expr {
    Call::Identify {
        reference: reference.into(),
        password: password.into(),
    }
    .into()
}
