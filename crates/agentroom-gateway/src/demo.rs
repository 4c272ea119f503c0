//! Demo chatroom data for development without a wallet.
//!
//! The featured chatroom answers with stable values so screens can be
//! checked against known numbers; every other chatroom gets randomized but
//! plausible data on each call.

use std::future::ready;

use rand::seq::SliceRandom;
use rand::Rng;

use agentroom_protocol::{ChatroomInfo, DataEntry, DataKind, RemoteTarget};

use crate::api::{ApiFuture, ChatroomApi, Outcome, PaymentDemand};
use crate::config::DemoConfig;
use crate::error::Result;

const FEATURED_PRICE: u64 = 1_000;
const FEATURED_MEMBERS: u64 = 3;
const FEATURED_ENTRIES: u64 = 7;
const STANDARD_PRICE: u64 = 100;
const HOUR_MS: u64 = 3_600_000;
const DAY_MS: u64 = 24 * HOUR_MS;

const SOURCES: [&str; 4] = ["uniswap_v3", "compound", "technical_analysis", "social_feed"];

/// Fixture-backed [`ChatroomApi`].
#[derive(Debug, Clone)]
pub struct DemoChatrooms {
    featured_target: Option<RemoteTarget>,
    featured_member: Option<String>,
    token_process: String,
}

impl DemoChatrooms {
    pub fn new(config: &DemoConfig) -> Result<Self> {
        let featured_target = config
            .featured_target
            .as_deref()
            .map(RemoteTarget::new)
            .transpose()?;
        Ok(Self {
            featured_target,
            featured_member: config.featured_member.clone(),
            token_process: config.token_process.clone(),
        })
    }

    fn is_featured(&self, target: &RemoteTarget) -> bool {
        self.featured_target.as_ref() == Some(target)
    }

    fn info_for(&self, target: &RemoteTarget) -> ChatroomInfo {
        let (access_price, member_count, data_count) = if self.is_featured(target) {
            (FEATURED_PRICE, FEATURED_MEMBERS, FEATURED_ENTRIES)
        } else {
            let mut rng = rand::thread_rng();
            (rng.gen_range(10..110), rng.gen_range(5..55), rng.gen_range(10..110))
        };
        ChatroomInfo {
            target: target.clone(),
            access_price,
            member_count,
            data_count,
            token_process: self.token_process.clone(),
        }
    }

    fn entries_for(&self, target: &RemoteTarget) -> Vec<DataEntry> {
        let now = now_ms();
        if self.is_featured(target) {
            return vec![
                entry("data_init_1", DataKind::Signal, "technical_analysis", "trading_bot_alpha", now.saturating_sub(HOUR_MS)),
                entry("data_init_2", DataKind::Subgraph, "uniswap_v3", "data_aggregator", now.saturating_sub(2 * HOUR_MS)),
                entry("data_init_3", DataKind::Analysis, "market_monitor", "analysis_engine", now.saturating_sub(3 * HOUR_MS)),
            ];
        }

        let mut rng = rand::thread_rng();
        let count = rng.gen_range(3..13);
        (0..count)
            .map(|i| {
                let kind = *DataKind::ALL.choose(&mut rng).unwrap_or(&DataKind::Signal);
                let source = *SOURCES.choose(&mut rng).unwrap_or(&SOURCES[0]);
                let sender = format!("agent_{:08x}", rng.gen::<u32>());
                let age = rng.gen_range(0..DAY_MS);
                entry(&format!("data_{target}_{i}"), kind, source, &sender, now.saturating_sub(age))
            })
            .collect()
    }

    fn join_outcome(&self, target: &RemoteTarget) -> Outcome<String> {
        let (amount, message) = if self.is_featured(target) {
            (
                FEATURED_PRICE,
                format!("[Payment Required] Please send {FEATURED_PRICE} tokens to join this premium chatroom."),
            )
        } else {
            (STANDARD_PRICE, "[Payment Required] Please send tokens to join.".to_string())
        };
        Outcome::PaymentRequired(PaymentDemand {
            message,
            amount: Some(amount),
            token_process: Some(self.token_process.clone()),
        })
    }

    fn is_member(&self, target: &RemoteTarget, agent_id: &str) -> bool {
        self.is_featured(target) && self.featured_member.as_deref() == Some(agent_id)
    }
}

impl ChatroomApi for DemoChatrooms {
    fn get_chatroom_info<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Option<ChatroomInfo>> {
        tracing::debug!(process = %target, "Demo: serving chatroom info");
        Box::pin(ready(Some(self.info_for(target))))
    }

    fn get_chatroom_data<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Vec<DataEntry>> {
        tracing::debug!(process = %target, "Demo: serving chatroom data");
        Box::pin(ready(self.entries_for(target)))
    }

    fn join_chatroom<'a>(&'a self, target: &'a RemoteTarget) -> ApiFuture<'a, Outcome<String>> {
        Box::pin(ready(self.join_outcome(target)))
    }

    fn post_data<'a>(
        &'a self,
        target: &'a RemoteTarget,
        payload: &'a str,
        data_type: &'a str,
        source: &'a str,
    ) -> ApiFuture<'a, Outcome<String>> {
        tracing::debug!(
            process = %target,
            data_type,
            source,
            payload_bytes = payload.len(),
            "Demo: accepting posted data"
        );
        Box::pin(ready(Outcome::Success("Data posted successfully".to_string())))
    }

    fn check_membership<'a>(&'a self, target: &'a RemoteTarget, agent_id: &'a str) -> ApiFuture<'a, bool> {
        Box::pin(ready(self.is_member(target, agent_id)))
    }
}

fn entry(id: &str, kind: DataKind, source: &str, sender: &str, timestamp: u64) -> DataEntry {
    DataEntry {
        id: id.to_string(),
        data_type: kind.as_str().to_string(),
        source: source.to_string(),
        sender: sender.to_string(),
        timestamp,
        content: None,
    }
}

fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
