use agentroom_protocol::*;
use serde_json::json;

fn raw(value: serde_json::Value) -> RawReply {
    RawReply::new(value)
}

#[test]
fn test_empty_message_list() {
    let reply = normalize(&raw(json!({ "Messages": [] })));
    assert_eq!(reply.status, ReplyStatus::Error);
    assert_eq!(reply.data, NO_MESSAGES);
}

#[test]
fn test_missing_messages_entirely() {
    for value in [json!({}), json!(null), json!("text"), json!(42)] {
        let reply = normalize(&raw(value));
        assert_eq!(reply.status, ReplyStatus::Error);
        assert_eq!(reply.data, NO_MESSAGES);
    }
}

#[test]
fn test_messages_not_an_array() {
    let reply = normalize(&raw(json!({ "Messages": "oops" })));
    assert_eq!(reply.status, ReplyStatus::Error);
    assert!(reply.data.starts_with("parse failure:"), "got {}", reply.data);
}

#[test]
fn test_malformed_message_is_parse_failure() {
    let reply = normalize(&raw(json!({ "Messages": [{ "Tags": "not-a-list" }] })));
    assert_eq!(reply.status, ReplyStatus::Error);
    assert!(reply.data.starts_with("parse failure:"));
}

#[test]
fn test_status_defaults_to_success() {
    let reply = normalize(&raw(json!({
        "Messages": [{ "Tags": [{ "name": "Action", "value": "JoinResponse" }], "Data": "welcome" }]
    })));
    assert_eq!(reply.status, ReplyStatus::Success);
    assert_eq!(reply.action, "JoinResponse");
    assert_eq!(reply.data, "welcome");
}

#[test]
fn test_missing_tags_and_data() {
    let reply = normalize(&raw(json!({ "Messages": [{}] })));
    assert_eq!(reply.status, ReplyStatus::Success);
    assert_eq!(reply.action, "");
    assert_eq!(reply.data, "");
    assert!(reply.extra_tags.is_empty());
}

#[test]
fn test_known_action_preferred_over_last() {
    let reply = normalize(&raw(json!({
        "Messages": [
            { "Tags": [{ "name": "Action", "value": "Debit-Notice" }], "Data": "debit" },
            {
                "Tags": [
                    { "name": "Action", "value": "PaymentRequired" },
                    { "name": "Status", "value": "PaymentRequired" },
                    { "name": "Amount", "value": "1000" }
                ],
                "Data": "send 1000 tokens"
            },
            { "Tags": [{ "name": "Action", "value": "Log" }], "Data": "trailing" }
        ]
    })));
    assert_eq!(reply.action, "PaymentRequired");
    assert_eq!(reply.status, ReplyStatus::PaymentRequired);
    assert_eq!(reply.data, "send 1000 tokens");
    assert_eq!(reply.extra_tag("Amount"), Some("1000"));
    assert!(reply.extra_tag("Action").is_none());
    assert!(reply.extra_tag("Status").is_none());
}

#[test]
fn test_falls_back_to_last_message() {
    let reply = normalize(&raw(json!({
        "Messages": [
            { "Tags": [{ "name": "Action", "value": "First" }], "Data": "one" },
            { "Tags": [{ "name": "Action", "value": "Second" }], "Data": "two" }
        ]
    })));
    assert_eq!(reply.action, "Second");
    assert_eq!(reply.data, "two");
}

#[test]
fn test_nested_result_location() {
    let reply = normalize(&raw(json!({
        "id": "msg-1",
        "result": {
            "Messages": [{
                "Tags": [
                    { "name": "Action", "value": "MembershipStatus" },
                    { "name": "Status", "value": "Member" }
                ],
                "Data": "Member"
            }]
        }
    })));
    assert_eq!(reply.status, ReplyStatus::Member);
    assert_eq!(reply.action, "MembershipStatus");
}

#[test]
fn test_primary_location_wins_when_non_empty() {
    let reply = normalize(&raw(json!({
        "Messages": [{ "Tags": [{ "name": "Action", "value": "DataList" }], "Data": "[]" }],
        "result": {
            "Messages": [{ "Tags": [{ "name": "Action", "value": "ChatroomInfo" }], "Data": "{}" }]
        }
    })));
    assert_eq!(reply.action, "DataList");
}

#[test]
fn test_empty_primary_falls_through_to_nested() {
    let reply = normalize(&raw(json!({
        "Messages": [],
        "result": { "Messages": [{ "Tags": [{ "name": "Action", "value": "ChatroomInfo" }], "Data": "{}" }] }
    })));
    assert_eq!(reply.action, "ChatroomInfo");
}

#[test]
fn test_lowercase_fields_and_non_string_values() {
    let reply = normalize(&raw(json!({
        "messages": [{
            "tags": [
                { "Name": "Action", "Value": "ChatroomInfo" },
                { "name": "Count", "value": 3 }
            ],
            "data": { "accessPrice": 10 }
        }]
    })));
    assert_eq!(reply.action, "ChatroomInfo");
    assert_eq!(reply.extra_tag("Count"), Some("3"));
    assert_eq!(reply.data, r#"{"accessPrice":10}"#);
}

#[test]
fn test_unknown_status_normalizes_to_error() {
    let reply = normalize(&raw(json!({
        "Messages": [{ "Tags": [{ "name": "Status", "value": "Teapot" }], "Data": "?" }]
    })));
    assert_eq!(reply.status, ReplyStatus::Error);
    assert_eq!(reply.data, "?");
}
