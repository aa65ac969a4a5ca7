use parley_llm::Message;

#[test]
fn test_message_system() {
    let msg = Message::system("You are helpful");
    assert_eq!(msg.role(), "system");
    assert_eq!(msg.content(), "You are helpful");
}

#[test]
fn test_message_human() {
    let msg = Message::human("Hello");
    assert_eq!(msg.role(), "user");
}

#[test]
fn test_message_ai() {
    let msg = Message::ai("Hi there!");
    assert_eq!(msg.role(), "assistant");
}

#[test]
fn test_message_serialization_is_role_and_content_only() {
    let msg = Message::human("Hello");
    let json = serde_json::to_value(&msg).unwrap();

    assert_eq!(json, serde_json::json!({"role": "user", "content": "Hello"}));
}

#[test]
fn test_system_message_serialization() {
    let json = serde_json::to_value(Message::system("")).unwrap();
    assert_eq!(json, serde_json::json!({"role": "system", "content": ""}));
}

#[test]
fn test_message_deserialization() {
    let json = r#"{"role":"assistant","content":"Test"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg, Message::ai("Test"));
}
