/// Property-based roundtrip tests for the wire codec.
///
/// Generates random values and checks that decoding a value's own encoding
/// reproduces it. Strategies cover every scalar and special variant, plus
/// arrays and sets nesting them.
///
/// Plain objects are excluded from the equality property because the decoder
/// keeps the request-side `"object"` wrapper; they get their own property below.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fql_core::decoder::from_json;
use fql_core::encoder::value_to_json;
use fql_core::{decode, Json, NativeRef, Object, Ref, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Set keys are opaque, so tag-like names are fair game.
fn arb_set_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_@][a-zA-Z0-9_]{0,10}").unwrap()
}

/// Plain object keys avoid `@`: a single tag-like key is what `@obj` escaping exists for.
fn arb_object_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,10}").unwrap()
}

fn arb_ref() -> impl Strategy<Value = Ref> {
    let leaf = prop_oneof![
        "[a-z0-9/]{1,12}".prop_map(Ref::new),
        prop::sample::select(NativeRef::ALL.to_vec()).prop_map(Ref::from),
    ];
    leaf.prop_recursive(2, 4, 2, |inner| {
        (
            "[a-z0-9]{1,8}",
            prop::option::of(inner.clone()),
            prop::option::of(inner),
        )
            .prop_map(|(id, class, database)| {
                let mut r = Ref::new(id);
                if let Some(class) = class {
                    r = r.with_class(class);
                }
                if let Some(database) = database {
                    r = r.with_database(database);
                }
                r
            })
    })
}

fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    // Roughly years 1900..2200, with nanosecond detail.
    (-2_208_988_800i64..7_258_118_400i64, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1000i32..9999, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        ".{0,20}".prop_map(Value::String),
        any::<i64>().prop_map(Value::Long),
        (-1e12f64..1e12f64).prop_map(Value::Double),
        any::<bool>().prop_map(Value::Boolean),
        Just(Value::Null),
        arb_ref().prop_map(Value::Ref),
        arb_timestamp().prop_map(Value::Timestamp),
        arb_date().prop_map(Value::Date),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::Bytes),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map(arb_set_key(), inner, 1..4).prop_map(Value::SetRef),
        ]
    })
}

fn arb_object() -> impl Strategy<Value = Object> {
    prop::collection::btree_map(arb_object_key(), arb_scalar(), 0..6)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn decode_inverts_encode(value in arb_value()) {
        let json = value_to_json(&value);
        let decoded = from_json(&json).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn decode_inverts_encode_through_bytes(items in prop::collection::vec(arb_value(), 0..4)) {
        let value = Value::Array(items);
        let bytes = value_to_json(&value).to_vec();
        let decoded = decode(&bytes).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn objects_come_back_under_wrapper(map in arb_object()) {
        let value = Value::Object(map.clone());
        let decoded = from_json(&value_to_json(&value)).unwrap();
        let mut expected = Object::new();
        expected.insert("object".to_string(), Value::Object(map));
        prop_assert_eq!(decoded, Value::Object(expected));
    }

    #[test]
    fn encoding_is_deterministic(value in arb_value()) {
        prop_assert_eq!(value_to_json(&value).to_string(), value_to_json(&value).to_string());
    }

    #[test]
    fn ir_text_reparses_identically(value in arb_value()) {
        let json = value_to_json(&value);
        let reparsed = Json::parse(&json.to_string()).unwrap();
        prop_assert_eq!(reparsed, json);
    }
}
