use serde_json::json;
use vpack::json::{self, JsonDecodeOptions, JsonEncodeOptions};
use vpack::{EncodeErrorKind, Map, ParseErrorKind, Value};

fn obj(fields: &[(&str, Value)]) -> Value {
    Value::Map(
        fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect(),
    )
}

#[test]
fn json_decode_matrix() {
    let cases: Vec<(&str, Value)> = vec![
        ("null", Value::Null),
        ("true", Value::Bool(true)),
        ("0", Value::Int(0)),
        ("-12", Value::Int(-12)),
        ("1.25", Value::Float(1.25)),
        ("-1e-2", Value::Float(-0.01)),
        ("18446744073709551615", Value::Float(18446744073709551615.0)),
        (r#""""#, Value::from("")),
        (r#""é😱""#, Value::from("é😱")),
        ("[]", Value::Array(vec![])),
        (" [ 1 , [ ] , { } ] ", Value::Array(vec![Value::Int(1), Value::Array(vec![]), obj(&[])])),
        (
            r#"{"z":1,"a":{"b":[null]}}"#,
            obj(&[
                ("z", Value::Int(1)),
                ("a", obj(&[("b", Value::Array(vec![Value::Null]))])),
            ]),
        ),
    ];
    for (text, expected) in cases {
        let decoded = json::decode(text).unwrap_or_else(|e| panic!("decode failed for {text}: {e}"));
        assert_eq!(decoded, expected, "{text}");
    }
}

#[test]
fn duplicate_keys_keep_the_last_value() {
    let v = json::decode(r#"{"a":1,"a":2}"#).unwrap();
    let map = v.as_map().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("a"), Some(&Value::Int(2)));

    // The key keeps the position of its first occurrence.
    let v = json::decode(r#"{"a":1,"b":2,"a":3}"#).unwrap();
    let keys: Vec<&String> = v.as_map().unwrap().keys().collect();
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn malformed_offsets() {
    let cases: &[(&str, ParseErrorKind, usize)] = &[
        (r#"{"a":}"#, ParseErrorKind::UnexpectedToken, 5),
        (r#"{"a" 1}"#, ParseErrorKind::UnexpectedToken, 5),
        (r#"{"a":1,}"#, ParseErrorKind::UnexpectedToken, 7),
        ("[1 2]", ParseErrorKind::UnexpectedToken, 3),
        ("[", ParseErrorKind::UnexpectedEnd, 1),
        ("{}x", ParseErrorKind::TrailingData, 2),
        (r#"  "abc"#, ParseErrorKind::UnterminatedString, 2),
        (r#""\x""#, ParseErrorKind::InvalidEscape, 1),
        ("1e99999", ParseErrorKind::NumberOutOfRange, 0),
        ("+1", ParseErrorKind::UnexpectedToken, 0),
        ("NaN", ParseErrorKind::UnexpectedToken, 0),
    ];
    for (text, kind, offset) in cases {
        let e = json::decode(text).unwrap_err();
        assert_eq!((e.kind, e.offset), (*kind, Some(*offset)), "{text}: {e}");
    }
}

#[test]
fn default_depth_limit() {
    let ok = format!("{}{}", "[".repeat(512), "]".repeat(512));
    assert!(json::decode(&ok).is_ok());
    let deep = format!("{}{}", "[".repeat(513), "]".repeat(513));
    assert_eq!(json::decode(&deep).unwrap_err().kind, ParseErrorKind::DepthLimitExceeded);

    let opts = JsonDecodeOptions {
        max_depth: 10_000,
        ..Default::default()
    };
    assert!(json::decode_with_options(deep.as_bytes(), &opts).is_ok());
}

#[test]
fn json_encode_matrix() {
    let cases: Vec<(Value, &str)> = vec![
        (Value::Null, "null"),
        (Value::Int(i64::MIN), "-9223372036854775808"),
        (Value::Float(1.0), "1.0"),
        (Value::Float(-0.5), "-0.5"),
        (Value::Float(1e-7), "1e-7"),
        (Value::from("a\"b\\c\n\u{1}"), r#""a\"b\\c\n\u0001""#),
        (Value::bytes(b"hi".to_vec()), r#""data:application/octet-stream;base64,aGk=""#),
        (Value::tagged(0, "2013-03-21T20:04:00Z"), r#""2013-03-21T20:04:00Z""#),
        (
            obj(&[("b", Value::Int(1)), ("a", Value::Array(vec![Value::Bool(false)]))]),
            r#"{"b":1,"a":[false]}"#,
        ),
    ];
    for (value, expected) in cases {
        assert_eq!(json::encode(&value).unwrap(), expected, "{value:?}");
    }
}

#[test]
fn text_shaped_like_a_data_uri_stays_text() {
    let cases = [
        "data:application/octet-stream;base64,AQID",
        "data:application/octet-stream;base64,",
        "data:application/octet-stream;base64,AQID\n\"x\"",
    ];
    for text in cases {
        let value = Value::from(text);
        let encoded = json::encode(&value).unwrap();
        assert!(encoded.starts_with(r#""\u0064ata:"#), "{encoded}");
        assert_eq!(json::decode(&encoded).unwrap(), value, "{encoded}");
    }
    // Escapes anywhere in the literal mark it as text.
    assert_eq!(
        json::decode(r#""data:application/octet-stream;base64,AQI\u0044""#).unwrap(),
        Value::from("data:application/octet-stream;base64,AQID")
    );
    assert_eq!(
        json::decode(r#""data:application/octet-stream;base64,AQID""#).unwrap(),
        Value::bytes(vec![1, 2, 3])
    );
}

#[test]
fn nan_fails_json_but_not_cbor() {
    let v = Value::Float(f64::NAN);
    let e = json::encode(&v).unwrap_err();
    assert_eq!(e.kind, EncodeErrorKind::NonFiniteNumber);
    assert!(e.path.is_root());
    assert_eq!(vpack::cbor::encode(&v), [0xf9, 0x7e, 0x00]);
}

#[test]
fn sorted_pretty_output() {
    let v = json::decode(r#"{"ccc":1,"a":{"bb":2,"b":[]},"dd":{}}"#).unwrap();
    let opts = JsonEncodeOptions {
        pretty: true,
        sort_keys: true,
    };
    let text = json::encode_with_options(&v, &opts).unwrap();
    let expected = "{\n  \"a\": {\n    \"b\": [],\n    \"bb\": 2\n  },\n  \"dd\": {},\n  \"ccc\": 1\n}";
    assert_eq!(text, expected);
    // Pretty output decodes to the same value modulo key order.
    let back = json::decode(&text).unwrap();
    assert_eq!(back.get("a").and_then(|a| a.get("bb")), Some(&Value::Int(2)));
}

#[test]
fn agrees_with_serde_json() {
    let fixture = json!({
        "id": 42,
        "name": "vpack \u{2603}",
        "ratio": 0.75,
        "tags": ["x", "y"],
        "nested": {"ok": true, "none": null}
    });
    let text = serde_json::to_string(&fixture).unwrap();
    let ours = json::decode(&text).unwrap();
    assert_eq!(ours, Value::from(fixture.clone()));
    let reencoded: serde_json::Value = serde_json::from_str(&json::encode(&ours).unwrap()).unwrap();
    assert_eq!(reencoded, fixture);

    let mut map = Map::new();
    map.insert("k", Value::Float(3.0));
    let text = json::encode(&Value::Map(map)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["k"].as_f64(), Some(3.0));
}
