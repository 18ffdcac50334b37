use crate::transport::message::{ClientMessage, PresenceStatus, ServerMessage};
use serde_json::json;

#[test]
fn test_parse_init() {
    let msg = ClientMessage::parse(&json!({"type": "init", "pokemon": 7}).to_string()).unwrap();
    assert_eq!(msg, ClientMessage::Init { pokemon: 7 });
}

#[test]
fn test_parse_topic_as_string() {
    let msg = ClientMessage::parse(r#"{"type":"leaving","pokemon":" 42 "}"#).unwrap();
    assert_eq!(msg, ClientMessage::Leaving { pokemon: 42 });
}

#[test]
fn test_parse_message_with_and_without_clientname() {
    let msg = ClientMessage::parse(
        &json!({"type": "message", "pokemon": 3, "message": "hello", "clientname": "Me"}).to_string(),
    )
    .unwrap();
    assert_eq!(
        msg,
        ClientMessage::Message {
            pokemon: 3,
            message: "hello".to_string(),
            clientname: Some("Me".to_string())
        }
    );

    let msg = ClientMessage::parse(r#"{"type":"message","pokemon":3,"message":"hello"}"#).unwrap();
    assert!(matches!(msg, ClientMessage::Message { clientname: None, .. }));
}

#[test]
fn test_negative_topic_parses_for_directory_to_reject() {
    let msg = ClientMessage::parse(r#"{"type":"init","pokemon":-3}"#).unwrap();
    assert_eq!(msg, ClientMessage::Init { pokemon: -3 });
}

#[test]
fn test_unknown_tag_is_an_error() {
    assert!(ClientMessage::parse(r#"{"type":"subscribe","topic":"x"}"#).is_err());
    assert!(ClientMessage::parse(r#"{"type":"init","pokemon":1.5}"#).is_err());
    assert!(ClientMessage::parse("").is_err());
}

#[test]
fn test_server_messages_match_wire_shapes() {
    let init = serde_json::to_value(ServerMessage::Init {
        clientname: "Mew Calm".to_string(),
    })
    .unwrap();
    assert_eq!(init, json!({"type": "init", "clientname": "Mew Calm"}));

    let roster = serde_json::to_value(ServerMessage::MajUser {
        newnb: 2,
        who: "Mew Calm".to_string(),
        status: PresenceStatus::Disconnected,
    })
    .unwrap();
    assert_eq!(
        roster,
        json!({"type": "majuser", "newnb": 2, "who": "Mew Calm", "status": "disconnected"})
    );

    let chat = serde_json::to_value(ServerMessage::Message {
        message: "hi".to_string(),
        from: "Mew Calm".to_string(),
    })
    .unwrap();
    assert_eq!(chat, json!({"type": "message", "message": "hi", "from": "Mew Calm"}));
}
