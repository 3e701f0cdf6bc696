use vpack::{legacy, Format, IssueKind};
use vpack_cli::{check, convert, issues_report, CliError, ConvertOptions};

const DOC: &str = r#"{"type":"post","text":"hi","n":[1,2.5]}"#;

#[test]
fn json_to_cbor_and_back() {
    let cbor = convert(DOC.as_bytes(), Format::Json, Format::Cbor, ConvertOptions::default()).unwrap();
    assert_eq!(cbor, vpack::api::to_cbor(&vpack::api::parse_json(DOC).unwrap()));
    let json = convert(&cbor, Format::Cbor, Format::Json, ConvertOptions::default()).unwrap();
    assert_eq!(String::from_utf8(json).unwrap(), format!("{DOC}\n"));
}

#[test]
fn pretty_sorted_json() {
    let opts = ConvertOptions {
        pretty: true,
        sort_keys: true,
    };
    let out = convert(br#"{"bb":1,"a":{}}"#, Format::Json, Format::Json, opts).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"a\": {},\n  \"bb\": 1\n}\n");
}

#[test]
fn legacy_frame_output_is_binary() {
    let frame = convert(DOC.as_bytes(), Format::Json, Format::LegacyFrame, ConvertOptions::default()).unwrap();
    let expected = legacy::encode_bytes(&vpack::api::parse_json(DOC).unwrap()).unwrap();
    assert_eq!(frame, expected);

    let text = convert(&frame, Format::LegacyFrame, Format::Legacy, ConvertOptions::default()).unwrap();
    let text = String::from_utf8(text).unwrap();
    assert!(text.starts_with("{\n  \"type\": \"post\""));
    assert!(text.ends_with("}\n"));
}

#[test]
fn errors_name_the_failing_side() {
    let err = convert(br#"{"a":}"#, Format::Json, Format::Cbor, ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, CliError::Decode { format: Format::Json, .. }));
    assert!(err.to_string().contains("offset 5"), "{err}");

    let bytes = vpack::api::to_cbor(&vpack::Value::Float(f64::NAN));
    let err = convert(&bytes, Format::Cbor, Format::Json, ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, CliError::Encode { format: Format::Json, .. }));

    let bytes = vpack::api::to_cbor(&vpack::Value::bytes(vec![1]));
    let err = convert(&bytes, Format::Cbor, Format::Legacy, ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, CliError::Encode { format: Format::Legacy, .. }));
}

#[test]
fn required_keys_report() {
    let keys = ["type".to_owned(), "author".to_owned(), "sig".to_owned()];
    let issues = check(DOC.as_bytes(), Format::Json, &keys);
    let report = issues_report(&issues).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["issues"][0]["path"], "/author");
    assert_eq!(report["issues"][0]["kind"], "MISSING_KEY");
    assert_eq!(report["issues"][1]["path"], "/sig");
    assert_eq!(report["issues"].as_array().map(Vec::len), Some(2));

    let ok = check(DOC.as_bytes(), Format::Json, &keys[..1]);
    assert_eq!(issues_report(&ok).unwrap()["valid"], true);
    assert_eq!(issues_report(&ok).unwrap()["issues"], serde_json::json!([]));
}

#[test]
fn unreadable_input_is_malformed() {
    let issues = check(&[0xff, 0xfe], Format::Json, &[]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Malformed);

    let issues = check(b"[1,2]", Format::Json, &[]);
    assert_eq!(issues[0].kind, IssueKind::TypeMismatch);
}
