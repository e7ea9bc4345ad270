use super::*;

#[test]
fn test_message_frame_shape() {
    let frame = ChatEvent::message("hello").to_frame().unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["event"], "message");
    assert_eq!(value["data"], "hello");
}

#[test]
fn test_connected_frame_shape() {
    let frame = ChatEvent::Connected("abc123".to_string()).to_frame().unwrap();
    assert_eq!(frame, r#"{"event":"connected","data":"abc123"}"#);
}

#[test]
fn test_parse_message() {
    let event = ChatEvent::parse(r#"{"event":"message","data":"hi there"}"#).unwrap();
    assert_eq!(event, ChatEvent::message("hi there"));
}

#[test]
fn test_parse_empty_message() {
    let event = ChatEvent::parse(r#"{"event":"message","data":""}"#).unwrap();
    assert_eq!(event, ChatEvent::message(""));
}

#[test]
fn test_markup_is_carried_verbatim() {
    let frame = ChatEvent::message("<b>hi</b>").to_frame().unwrap();
    let event = ChatEvent::parse(&frame).unwrap();
    assert_eq!(event, ChatEvent::message("<b>hi</b>"));
}

#[test]
fn test_parse_unknown_event() {
    let result = ChatEvent::parse(r#"{"event":"typing","data":"x"}"#);
    assert!(matches!(result, Err(ChannelError::InvalidFrame(_))));
}

#[test]
fn test_parse_malformed_json() {
    let result = ChatEvent::parse("not json");
    assert!(matches!(result, Err(ChannelError::InvalidFrame(_))));
}

#[test]
fn test_parse_non_string_payload() {
    let result = ChatEvent::parse(r#"{"event":"message","data":42}"#);
    assert!(result.is_err());
}
