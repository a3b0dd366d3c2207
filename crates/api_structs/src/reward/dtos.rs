use chrono::{DateTime, Utc};
use festivo_domain::{Reward, RewardType, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RewardDTO {
    pub id: ID,
    pub event_id: ID,
    pub name: String,
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    pub quantity: i64,
    pub details: Option<serde_json::Value>,
    pub stock: Option<i64>,
    pub created_by: ID,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl RewardDTO {
    pub fn new(reward: Reward) -> Self {
        Self {
            id: reward.id,
            event_id: reward.event_id,
            name: reward.name,
            reward_type: reward.reward_type,
            quantity: reward.quantity,
            details: reward.details,
            stock: reward.stock,
            created_by: reward.created_by,
            created: reward.created,
            updated: reward.updated,
        }
    }
}
