use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A claimable prize belonging to exactly one `Event`.
///
/// `stock == None` means unlimited supply. When finite, the remaining
/// stock is only ever mutated through the repository's conditional
/// decrement, so it can never go negative.
#[derive(Debug, Clone)]
pub struct Reward {
    pub id: ID,
    pub event_id: ID,
    pub name: String,
    pub reward_type: RewardType,
    pub quantity: i64,
    pub details: Option<serde_json::Value>,
    pub stock: Option<i64>,
    pub created_by: ID,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardType {
    Point,
    Item,
    Coupon,
    Currency,
}

impl Reward {
    pub fn has_valid_stock(stock: &Option<i64>) -> bool {
        match stock {
            Some(stock) => *stock >= 0,
            None => true,
        }
    }

    /// Fast precheck used at request creation. The authoritative check
    /// is the conditional decrement at completion time.
    pub fn is_depleted(&self) -> bool {
        matches!(self.stock, Some(stock) if stock <= 0)
    }
}

impl Entity for Reward {
    fn id(&self) -> &ID {
        &self.id
    }
}
