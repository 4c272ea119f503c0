mod common;

use std::sync::Arc;
use std::time::Duration;

use agentroom_gateway::agentroom_protocol::RawReply;
use agentroom_gateway::{
    Backend, ChatroomEntry, ChatroomRegistry, ChatroomService, DemoConfig, Dispatcher,
    GatewayConfig, Outcome, RemoteChatrooms, SignedMessage, TransportError, TransportSlot,
};
use common::{reply, target, ScriptedTransport};

fn service_with<F>(handler: F, entries: &[ChatroomEntry]) -> (ChatroomService, Arc<ScriptedTransport>)
where
    F: Fn(&SignedMessage) -> Result<RawReply, TransportError> + Send + Sync + 'static,
{
    let transport = ScriptedTransport::new(handler);
    let slot = TransportSlot::with_transport(transport.clone());
    let api = Arc::new(RemoteChatrooms::new(Dispatcher::new(slot.clone(), Duration::from_secs(5))));
    let registry = ChatroomRegistry::from_entries(entries).unwrap();
    (
        ChatroomService::with_api(api, registry, Duration::from_secs(30), slot).unwrap(),
        transport,
    )
}

fn entry(slug: &str, target: &str) -> ChatroomEntry {
    ChatroomEntry {
        slug: slug.into(),
        target: target.into(),
        title: None,
    }
}

#[tokio::test]
async fn test_get_info_scenario() {
    let (service, transport) = service_with(
        |_| {
            Ok(reply(
                "ChatroomInfo",
                Some("Success"),
                r#"{"accessPrice":1000,"memberCount":3,"dataCount":7,"tokenProcess":"abc"}"#,
                &[],
            ))
        },
        &[],
    );
    let info = service.get_chatroom_info(&target("room")).await.unwrap();
    assert_eq!(info.access_price, 1000);
    assert_eq!(info.member_count, 3);
    assert_eq!(info.data_count, 7);
    assert_eq!(info.token_process, "abc");
    assert_eq!(transport.sent()[0].tag("Action"), Some("GetInfo"));
}

#[tokio::test]
async fn test_get_info_malformed_is_none() {
    let (service, _) = service_with(|_| Ok(reply("ChatroomInfo", Some("Success"), "<html>", &[])), &[]);
    assert!(service.get_chatroom_info(&target("room")).await.is_none());

    let (service, _) = service_with(|_| Ok(RawReply::new(serde_json::json!({ "Messages": [] }))), &[]);
    assert!(service.get_chatroom_info(&target("room")).await.is_none());
}

#[tokio::test]
async fn test_list_data_failure_is_empty() {
    let (service, _) = service_with(|_| Err(TransportError::new("offline")), &[]);
    assert!(service.get_chatroom_data(&target("room")).await.is_empty());
}

#[tokio::test]
async fn test_join_payment_required_scenario() {
    let (service, _) = service_with(
        |_| {
            Ok(reply(
                "PaymentRequired",
                Some("PaymentRequired"),
                "send 1000 tokens",
                &[("Amount", "1000"), ("TokenProcess", "tok-1")],
            ))
        },
        &[],
    );
    let outcome = service.join_chatroom(&target("room")).await;
    assert!(!outcome.is_success());
    assert!(outcome.is_payment_required());
    assert_eq!(outcome.message(), "send 1000 tokens");
    let demand = outcome.payment().unwrap();
    assert_eq!(demand.amount, Some(1000));
    assert_eq!(demand.token_process.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_join_generic_failure() {
    let (service, _) = service_with(|_| Err(TransportError::new("boom")), &[]);
    let outcome = service.join_chatroom(&target("room")).await;
    assert!(matches!(outcome, Outcome::Failure(_)));
    assert!(!outcome.is_payment_required());
}

#[tokio::test]
async fn test_post_data_sends_tags() {
    let (service, transport) = service_with(|_| Ok(reply("PostResponse", Some("Success"), "", &[])), &[]);
    let outcome = service
        .post_data(&target("room"), "{\"signal\":\"BUY\"}", "signal", "technical_analysis")
        .await;
    assert_eq!(outcome, Outcome::Success("Data posted successfully".to_string()));

    let sent = transport.sent();
    assert_eq!(sent[0].tag("Action"), Some("PostData"));
    assert_eq!(sent[0].tag("DataType"), Some("signal"));
    assert_eq!(sent[0].tag("Source"), Some("technical_analysis"));
    assert!(sent[0].tag("DataId").is_some_and(|id| id.starts_with("data_")));
    assert_eq!(sent[0].data, "{\"signal\":\"BUY\"}");
}

#[tokio::test]
async fn test_check_membership_error_is_false() {
    let (service, _) = service_with(|_| Ok(reply("MembershipStatus", Some("Error"), "", &[])), &[]);
    assert!(!service.check_membership(&target("room"), "agent-1").await);
}

#[tokio::test]
async fn test_check_membership_member() {
    let (service, transport) = service_with(|_| Ok(reply("MembershipStatus", Some("Member"), "Member", &[])), &[]);
    assert!(service.check_membership(&target("room"), "agent-1").await);
    assert_eq!(transport.sent()[0].tag("AgentId"), Some("agent-1"));
}

#[tokio::test]
async fn test_joined_chatrooms_in_registry_order() {
    let (service, transport) = service_with(
        |message| {
            let status = if message.target.as_str() == "proc-b" || message.target.as_str() == "proc-c" {
                "Member"
            } else {
                "NotMember"
            };
            Ok(reply("MembershipStatus", Some(status), "", &[]))
        },
        &[entry("a", "proc-a"), entry("b", "proc-b"), entry("c", "proc-c")],
    );
    let joined = service.get_joined_chatrooms("agent-1").await;
    assert_eq!(joined, vec![target("proc-b"), target("proc-c")]);
    assert_eq!(transport.sent().len(), 3);
}

#[tokio::test]
async fn test_load_listings() {
    let (service, _) = service_with(
        |message| match message.tag("Action") {
            Some("GetInfo") => Ok(reply(
                "ChatroomInfo",
                Some("Success"),
                r#"{"accessPrice":"50","memberCount":2,"dataCount":1,"tokenProcess":"t"}"#,
                &[],
            )),
            _ => Ok(reply("DataList", Some("Success"), r#"[{"id":"d1","dataType":"news"}]"#, &[])),
        },
        &[entry("alpha", "proc-a")],
    );
    let listings = service.load_listings().await;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].slug, "alpha");
    assert_eq!(listings[0].info.as_ref().map(|i| i.access_price), Some(50));
    assert_eq!(listings[0].messages.len(), 1);
}

#[tokio::test]
async fn test_remote_backend_without_wallet_degrades() {
    let config = GatewayConfig {
        chatrooms: vec![entry("alpha", "proc-a")],
        ..GatewayConfig::default()
    };
    let service = ChatroomService::from_config(&config, TransportSlot::new()).unwrap();
    assert_eq!(service.backend(), Backend::Remote);
    assert!(!service.wallet_connected());

    let room = service.target_for("alpha").unwrap().clone();
    assert!(service.get_chatroom_info(&room).await.is_none());
    assert!(service.get_chatroom_data(&room).await.is_empty());
    assert!(!service.check_membership(&room, "agent").await);
    assert!(service.get_joined_chatrooms("agent").await.is_empty());

    service.configure_wallet(ScriptedTransport::new(|_| {
        Ok(reply("MembershipStatus", Some("Member"), "", &[]))
    }));
    assert!(service.wallet_connected());
    assert_eq!(service.get_joined_chatrooms("agent").await, vec![room]);
    assert!(service.disconnect_wallet());
}

#[tokio::test]
async fn test_demo_backend_from_config() {
    let config = GatewayConfig {
        backend: Backend::Demo,
        chatrooms: vec![entry("trading-alpha", "featured"), entry("other", "proc-o")],
        demo: DemoConfig {
            featured_target: Some("featured".into()),
            featured_member: Some("agent-a".into()),
            ..DemoConfig::default()
        },
        ..GatewayConfig::default()
    };
    let service = ChatroomService::from_config(&config, TransportSlot::new()).unwrap();
    assert_eq!(service.backend(), Backend::Demo);

    let featured = target("featured");
    assert_eq!(service.get_chatroom_info(&featured).await.map(|i| i.access_price), Some(1000));
    assert_eq!(service.get_joined_chatrooms("agent-a").await, vec![featured.clone()]);
    assert!(service.join_chatroom(&featured).await.is_payment_required());
    assert!(service.post_data(&featured, "x", "news", "feed").await.is_success());
}

#[test]
fn test_config_file_round_trip_through_service() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gateway.toml");
    std::fs::write(
        &path,
        r#"
        backend = "demo"
        poll_interval_secs = 5

        [[chatrooms]]
        slug = "alpha"
        target = "proc-a"
        title = "Alpha"
        "#,
    )
    .unwrap();

    let config = GatewayConfig::load(&path).unwrap();
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    let service = ChatroomService::from_config(&config, TransportSlot::new()).unwrap();
    assert_eq!(service.registry().entries()[0].title.as_deref(), Some("Alpha"));
    assert_eq!(service.monitor().interval(), Duration::from_secs(5));

    let missing = GatewayConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(missing, GatewayConfig::default());
}

#[test]
fn test_logging_init_is_idempotent() {
    let _first = agentroom_gateway::logging::init_logging("agentroom_gateway=debug");
    assert!(!agentroom_gateway::logging::init_logging("info"));
}
