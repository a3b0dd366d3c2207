mod inmemory;
mod mongo;

use festivo_domain::{Reward, ID};
pub use inmemory::InMemoryRewardRepo;
pub use mongo::RewardRepo;

/// Outcome of the conditional stock decrement. `Ok` covers both an
/// applied decrement and unlimited stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrementOutcome {
    Ok,
    OutOfStock,
    NotFound,
}

#[async_trait::async_trait]
pub trait IRewardRepo: Send + Sync {
    async fn insert(&self, reward: &Reward) -> anyhow::Result<()>;
    async fn save(&self, reward: &Reward) -> anyhow::Result<()>;
    async fn find(&self, reward_id: &ID) -> Option<Reward>;
    /// The reward only if it belongs to the given event
    async fn find_in_event(&self, reward_id: &ID, event_id: &ID) -> Option<Reward>;
    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Reward>>;
    async fn delete(&self, reward_id: &ID) -> Option<Reward>;
    /// Decrements remaining stock by one, but only while it is positive.
    /// The stock check and the decrement are a single atomic operation
    /// against the store, so concurrent callers can never drive stock
    /// negative: a caller whose conditional update matched nothing gets
    /// `OutOfStock` even if it read a positive stock just before.
    async fn decrement_stock(&self, reward_id: &ID) -> anyhow::Result<StockDecrementOutcome>;
    /// Counts one previously decremented unit back into finite stock.
    /// Unlimited stock is left untouched, a decrement never mutated it.
    async fn restore_stock(&self, reward_id: &ID) -> anyhow::Result<()>;
}
