use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use fql_core::query::{class, create, index, lambda, map, match_index, paginate, var};
use fql_core::{decode, encode, Expr};
use serde_json::json;

fn sample_response() -> Vec<u8> {
    let instances: Vec<serde_json::Value> = (0..200)
        .map(|i| {
            json!({
                "ref": {"@ref": {
                    "id": i.to_string(),
                    "class": {"@ref": {"id": "spells", "class": {"@ref": {"id": "classes"}}}}
                }},
                "ts": {"@ts": "2017-07-14T02:40:00.123Z"},
                "data": {"name": format!("spell {i}"), "cost": i, "ratio": 0.5, "tags": ["a", "b"]}
            })
        })
        .collect();
    serde_json::to_vec(&json!({ "data": instances })).unwrap()
}

fn sample_query() -> Expr {
    map(
        lambda(["x"], create(class("spells"), Expr::object([("data", Expr::object([("ref", var("x"))]))]))),
        paginate(match_index(index("spells_by_element"), ["fire", "water"])),
    )
}

fn bench_decode(c: &mut Criterion) {
    let body = sample_response();
    c.bench_function("decode_200_instances", |b| {
        b.iter(|| decode(black_box(&body)).unwrap())
    });
}

fn bench_encode(c: &mut Criterion) {
    let query = sample_query();
    c.bench_function("encode_nested_query", |b| b.iter(|| encode(black_box(&query))));
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
