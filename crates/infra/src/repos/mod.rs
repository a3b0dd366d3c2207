mod event;
mod reward;
mod reward_request;
mod shared;

pub use event::IEventRepo;
use event::{EventRepo, InMemoryEventRepo};
use mongodb::{options::ClientOptions, Client};
pub use reward::{IRewardRepo, StockDecrementOutcome};
use reward::{InMemoryRewardRepo, RewardRepo};
pub use reward_request::{IRewardRequestRepo, InsertClaimError, RewardRequestQuery, TransitionOutcome};
use reward_request::{InMemoryRewardRequestRepo, RewardRequestRepo};
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub rewards: Arc<dyn IRewardRepo>,
    pub reward_requests: Arc<dyn IRewardRequestRepo>,
}

impl Repos {
    pub async fn create_mongodb(connection_string: &str, db_name: &str) -> anyhow::Result<Self> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        let reward_requests = RewardRequestRepo::new(&db);
        // The unique claim index is what makes concurrent duplicate
        // creates impossible, so refuse to start without it.
        reward_requests.ensure_indexes().await?;

        Ok(Self {
            events: Arc::new(EventRepo::new(&db)),
            rewards: Arc::new(RewardRepo::new(&db)),
            reward_requests: Arc::new(reward_requests),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepo::new()),
            rewards: Arc::new(InMemoryRewardRepo::new()),
            reward_requests: Arc::new(InMemoryRewardRequestRepo::new()),
        }
    }
}
