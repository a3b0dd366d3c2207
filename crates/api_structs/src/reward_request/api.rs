use crate::dtos::RewardRequestDTO;
use festivo_domain::{RewardRequest, RewardRequestStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequestResponse {
    pub reward_request: RewardRequestDTO,
}

impl RewardRequestResponse {
    pub fn new(request: RewardRequest) -> Self {
        Self {
            reward_request: RewardRequestDTO::new(request),
        }
    }
}

pub mod create_reward_request {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub event_id: ID,
        pub reward_id: ID,
        pub user_memo: Option<String>,
    }

    pub type APIResponse = RewardRequestResponse;
}

pub mod get_my_reward_requests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub event_id: Option<ID>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub requests: Vec<RewardRequestDTO>,
    }

    impl APIResponse {
        pub fn new(requests: Vec<RewardRequest>) -> Self {
            Self {
                requests: requests.into_iter().map(RewardRequestDTO::new).collect(),
            }
        }
    }
}

pub mod get_reward_requests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub page: Option<u64>,
        pub limit: Option<i64>,
        pub event_id: Option<ID>,
        pub user_id: Option<ID>,
        pub status: Option<RewardRequestStatus>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub data: Vec<RewardRequestDTO>,
        pub total: u64,
        pub current_page: u64,
        pub total_pages: u64,
    }

    impl APIResponse {
        pub fn new(data: Vec<RewardRequest>, total: u64, current_page: u64, limit: i64) -> Self {
            let total_pages = if limit > 0 {
                (total + limit as u64 - 1) / limit as u64
            } else {
                0
            };
            Self {
                data: data.into_iter().map(RewardRequestDTO::new).collect(),
                total,
                current_page,
                total_pages,
            }
        }
    }
}

pub mod get_reward_request {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub request_id: ID,
    }

    pub type APIResponse = RewardRequestResponse;
}

pub mod update_reward_request_status {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub request_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub status: RewardRequestStatus,
        pub reason: Option<String>,
    }

    pub type APIResponse = RewardRequestResponse;
}
