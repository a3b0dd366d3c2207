use super::{IRewardRepo, StockDecrementOutcome};
use crate::repos::shared::inmemory_repo::*;
use festivo_domain::{Entity, Reward, ID};
use std::sync::Mutex;

pub struct InMemoryRewardRepo {
    rewards: Mutex<Vec<Reward>>,
}

impl InMemoryRewardRepo {
    pub fn new() -> Self {
        Self {
            rewards: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IRewardRepo for InMemoryRewardRepo {
    async fn insert(&self, reward: &Reward) -> anyhow::Result<()> {
        insert(reward, &self.rewards);
        Ok(())
    }

    async fn save(&self, reward: &Reward) -> anyhow::Result<()> {
        save(reward, &self.rewards);
        Ok(())
    }

    async fn find(&self, reward_id: &ID) -> Option<Reward> {
        find(reward_id, &self.rewards)
    }

    async fn find_in_event(&self, reward_id: &ID, event_id: &ID) -> Option<Reward> {
        find(reward_id, &self.rewards).filter(|reward| &reward.event_id == event_id)
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Reward>> {
        Ok(find_by(&self.rewards, |reward| {
            &reward.event_id == event_id
        }))
    }

    async fn delete(&self, reward_id: &ID) -> Option<Reward> {
        delete(reward_id, &self.rewards)
    }

    async fn decrement_stock(&self, reward_id: &ID) -> anyhow::Result<StockDecrementOutcome> {
        // check-and-decrement under a single lock acquisition
        let mut rewards = self.rewards.lock().unwrap();
        let reward = match rewards.iter_mut().find(|reward| reward.id() == reward_id) {
            Some(reward) => reward,
            None => return Ok(StockDecrementOutcome::NotFound),
        };
        match reward.stock {
            None => Ok(StockDecrementOutcome::Ok),
            Some(stock) if stock > 0 => {
                reward.stock = Some(stock - 1);
                Ok(StockDecrementOutcome::Ok)
            }
            Some(_) => Ok(StockDecrementOutcome::OutOfStock),
        }
    }

    async fn restore_stock(&self, reward_id: &ID) -> anyhow::Result<()> {
        let mut rewards = self.rewards.lock().unwrap();
        if let Some(reward) = rewards.iter_mut().find(|reward| reward.id() == reward_id) {
            if let Some(stock) = reward.stock {
                reward.stock = Some(stock + 1);
            }
        }
        Ok(())
    }
}
