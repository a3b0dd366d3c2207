use crate::dtos::RewardDTO;
use festivo_domain::{Reward, RewardType, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResponse {
    pub reward: RewardDTO,
}

impl RewardResponse {
    pub fn new(reward: Reward) -> Self {
        Self {
            reward: RewardDTO::new(reward),
        }
    }
}

pub mod create_reward {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub event_id: ID,
        pub name: String,
        #[serde(rename = "type")]
        pub reward_type: RewardType,
        pub quantity: i64,
        pub details: Option<serde_json::Value>,
        pub stock: Option<i64>,
    }

    pub type APIResponse = RewardResponse;
}

pub mod get_event_rewards {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub rewards: Vec<RewardDTO>,
    }

    impl APIResponse {
        pub fn new(rewards: Vec<Reward>) -> Self {
            Self {
                rewards: rewards.into_iter().map(RewardDTO::new).collect(),
            }
        }
    }
}

pub mod get_reward {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reward_id: ID,
    }

    pub type APIResponse = RewardResponse;
}

pub mod update_reward {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reward_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub reward_type: Option<RewardType>,
        pub quantity: Option<i64>,
        pub details: Option<serde_json::Value>,
        /// `Some(None)` is not expressible here: a present `stock` field
        /// replaces the stored value, an absent one leaves it unchanged
        pub stock: Option<i64>,
    }

    pub type APIResponse = RewardResponse;
}

pub mod delete_reward {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reward_id: ID,
    }

    pub type APIResponse = RewardResponse;
}
