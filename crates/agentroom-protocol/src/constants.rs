/// Reserved tag carrying the action name on every request and reply.
pub const ACTION_TAG: &str = "Action";
/// Reply tag carrying the outcome of the request.
pub const STATUS_TAG: &str = "Status";

/// Auxiliary request tags.
pub const AGENT_ID_TAG: &str = "AgentId";
pub const DATA_ID_TAG: &str = "DataId";
pub const DATA_TYPE_TAG: &str = "DataType";
pub const SOURCE_TAG: &str = "Source";

/// Auxiliary reply tags attached to a payment demand.
pub const AMOUNT_TAG: &str = "Amount";
pub const TOKEN_PROCESS_TAG: &str = "TokenProcess";

/// Reply actions the normalizer recognizes when picking a message.
pub const RESPONSE_ACTIONS: [&str; 5] = [
    "ChatroomInfo",
    "DataList",
    "MembershipStatus",
    "PaymentRequired",
    "JoinResponse",
];

/// Data written when the reply had nothing to interpret.
pub const NO_MESSAGES: &str = "no response messages";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
