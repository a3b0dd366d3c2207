use chrono::{DateTime, Utc};
use festivo_domain::{RewardRequest, RewardRequestStatus, TransactionDetails, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequestDTO {
    pub id: ID,
    pub user_id: ID,
    pub event_id: ID,
    pub reward_id: ID,
    pub status: RewardRequestStatus,
    pub user_memo: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processor_id: Option<ID>,
    pub failure_reason: Option<String>,
    pub transaction_details: Option<TransactionDetails>,
}

impl RewardRequestDTO {
    pub fn new(request: RewardRequest) -> Self {
        Self {
            id: request.id,
            user_id: request.user_id,
            event_id: request.event_id,
            reward_id: request.reward_id,
            status: request.status,
            user_memo: request.user_memo,
            requested_at: request.requested_at,
            processed_at: request.processed_at,
            processor_id: request.processor_id,
            failure_reason: request.failure_reason,
            transaction_details: request.transaction_details,
        }
    }
}
