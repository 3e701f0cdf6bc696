use proptest::prelude::*;
use vpack::{cbor, json, legacy, Map, Value};

fn map_of(entries: std::collections::BTreeMap<String, Value>) -> Value {
    Value::Map(entries.into_iter().collect::<Map>())
}

fn containers<S>(inner: S, keys: &'static str) -> impl Strategy<Value = Value>
where
    S: Strategy<Value = Value> + Clone + 'static,
{
    prop_oneof![
        prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
        prop::collection::btree_map(keys, inner, 0..8).prop_map(map_of),
    ]
}

/// Values JSON text carries exactly: no tags and finite floats. Some text
/// carries the byte-string data URI prefix.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::Float),
        ".{0,20}".prop_map(Value::Text),
        "[A-Za-z0-9+/=]{0,12}"
            .prop_map(|b64| Value::Text(format!("data:application/octet-stream;base64,{b64}"))),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| containers(inner, "[a-z]{1,10}"))
}

fn cbor_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>()
            .prop_filter("comparable", |f| !f.is_nan())
            .prop_map(Value::Float),
        ".{0,20}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            containers(inner.clone(), ".{0,6}"),
            (any::<u64>(), inner).prop_map(|(tag, v)| Value::tagged(tag, v)),
        ]
    })
}

/// Values in the legacy data model, with natural-number keys mixed in.
fn legacy_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::Float),
        ".{0,20}".prop_map(Value::Text),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| containers(inner, "[a-c0-9]{1,4}"))
}

proptest! {
    #[test]
    fn json_round_trip(value in json_value()) {
        let text = json::encode(&value).unwrap();
        prop_assert_eq!(json::decode(&text).unwrap(), value);
    }

    #[test]
    fn json_agrees_with_serde_json_on_structure(value in json_value()) {
        let text = json::encode(&value).unwrap();
        let parsed: Result<serde_json::Value, _> = serde_json::from_str(&text);
        prop_assert!(parsed.is_ok(), "{}", text);
    }

    #[test]
    fn cbor_round_trip(value in cbor_value()) {
        let bytes = cbor::encode(&value);
        prop_assert_eq!(cbor::decode(&bytes).unwrap(), value);
    }

    #[test]
    fn cbor_sorted_encoding_is_stable(value in cbor_value()) {
        let sorted = cbor::encode_with_options(&value, &cbor::CborEncodeOptions { sort_keys: true });
        let decoded = cbor::decode(&sorted).unwrap();
        prop_assert_eq!(cbor::encode(&decoded), sorted);
    }

    #[test]
    fn legacy_text_is_a_fixed_point(value in legacy_value()) {
        let text = legacy::encode_text(&value).unwrap();
        let decoded = legacy::decode_text(&text).unwrap();
        prop_assert_eq!(legacy::encode_text(&decoded).unwrap(), text);
    }

    #[test]
    fn legacy_buffer_matches_text(value in legacy_value()) {
        let text = legacy::encode_text(&value).unwrap();
        let frame = legacy::encode_bytes(&value).unwrap();
        prop_assert_eq!(legacy::decode_bytes(&frame).unwrap(), legacy::decode_text(&text).unwrap());
    }

    #[test]
    fn decoders_never_panic(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = cbor::decode(&data);
        let _ = json::decode_slice(&data);
        let _ = legacy::decode_bytes(&data);
    }
}
