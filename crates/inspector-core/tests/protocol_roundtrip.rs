//! Integration tests for the inspector-core bridge protocol.
//!
//! These exercise the public API end to end: records are put on the wire the
//! way the page script does it and classified the way the host does it.

use inspector_core::{
    decode_message, encode_message,
    protocol::messages::{DOMINFO_PREFIX, DOM_TEXT_LIMIT},
    BridgeMessage, DomInfo, LogEntry, Severity,
};

/// Encodes a message and decodes it again.
fn roundtrip(msg: BridgeMessage) -> BridgeMessage {
    let wire = encode_message(&msg).expect("encode must succeed");
    decode_message(&wire).expect("decode must succeed")
}

#[test]
fn test_roundtrip_dom_info_with_all_fields() {
    let original = BridgeMessage::DomInfo(DomInfo::new(
        "BUTTON",
        Some("submit".to_string()),
        Some("btn btn-primary".to_string()),
        "  Send  ",
    ));

    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_dom_info_without_optional_fields() {
    let original = BridgeMessage::DomInfo(DomInfo::new("SECTION", None, None, ""));

    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_dom_info_text_with_quotes_and_newlines() {
    // Element text may contain anything; the JSON encoding keeps the message
    // on a single line.
    let original = BridgeMessage::DomInfo(DomInfo::new(
        "PRE",
        None,
        None,
        "line one\n\"quoted\"\ttabbed \u{1F600}",
    ));

    let wire = encode_message(&original).unwrap();
    assert!(!wire.contains('\n'), "wire form must be newline free");
    assert_eq!(original, decode_message(&wire).unwrap());
}

#[test]
fn test_roundtrip_dom_info_at_text_limit() {
    let text = "z".repeat(DOM_TEXT_LIMIT * 3);
    let original = DomInfo::new("P", None, None, &text);
    assert_eq!(original.text.chars().count(), DOM_TEXT_LIMIT);

    match roundtrip(BridgeMessage::DomInfo(original.clone())) {
        BridgeMessage::DomInfo(decoded) => assert_eq!(decoded, original),
        other => panic!("expected DomInfo, got {:?}", other),
    }
}

#[test]
fn test_page_style_payload_with_explicit_nulls_decodes() {
    // Exactly what `JSON.stringify` produces for an element without id/class.
    let wire = format!(
        "{DOMINFO_PREFIX}{}",
        r#"{"tag":"DIV","id":null,"className":null,"text":"Hello"}"#
    );

    let decoded = decode_message(&wire).unwrap();

    assert_eq!(
        decoded,
        BridgeMessage::DomInfo(DomInfo {
            tag: "DIV".to_string(),
            id: None,
            class_name: None,
            text: "Hello".to_string(),
        })
    );
}

#[test]
fn test_console_lines_classify_by_content() {
    let cases = [
        ("LOG: hello world", Severity::Info),
        ("ERROR: boom", Severity::Error),
        ("LOG: retrying after ERROR 503", Severity::Error),
        ("INSPECTED: DIV - card", Severity::Info),
        ("unprefixed", Severity::Info),
    ];

    for (raw, expected) in cases {
        match decode_message(raw).unwrap() {
            BridgeMessage::Log(LogEntry { level, text }) => {
                assert_eq!(level, expected, "severity for {raw:?}");
                assert_eq!(text, raw, "log text must be the unstripped message");
            }
            other => panic!("expected Log for {raw:?}, got {:?}", other),
        }
    }
}

#[test]
fn test_dominfo_prefix_with_log_text_inside_is_still_dominfo() {
    // The payload mentions ERROR, but the prefix decides first.
    let wire = r#"DOMINFO: {"tag":"SPAN","id":null,"className":"ERROR","text":"ERROR"}"#;
    assert!(matches!(decode_message(wire).unwrap(), BridgeMessage::DomInfo(_)));
}
