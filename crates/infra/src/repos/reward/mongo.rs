use super::{IRewardRepo, StockDecrementOutcome};
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use festivo_domain::{Reward, RewardType, ID};
use mongodb::{
    bson::{doc, Bson, DateTime as BsonDateTime, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};
use std::convert::TryInto;

pub struct RewardRepo {
    collection: Collection<RewardMongo>,
}

impl RewardRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("rewards"),
        }
    }
}

#[async_trait::async_trait]
impl IRewardRepo for RewardRepo {
    async fn insert(&self, reward: &Reward) -> anyhow::Result<()> {
        mongo_repo::insert(&self.collection, reward).await
    }

    async fn save(&self, reward: &Reward) -> anyhow::Result<()> {
        mongo_repo::save(&self.collection, reward).await
    }

    async fn find(&self, reward_id: &ID) -> Option<Reward> {
        mongo_repo::find(&self.collection, reward_id).await
    }

    async fn find_in_event(&self, reward_id: &ID, event_id: &ID) -> Option<Reward> {
        let filter = doc! {
            "_id": reward_id.as_string(),
            "event_id": event_id.as_string(),
        };
        mongo_repo::find_one_by(&self.collection, filter).await
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Reward>> {
        let filter = doc! {
            "event_id": event_id.as_string()
        };
        mongo_repo::find_many_by(&self.collection, filter, None).await
    }

    async fn delete(&self, reward_id: &ID) -> Option<Reward> {
        mongo_repo::delete(&self.collection, reward_id).await
    }

    async fn decrement_stock(&self, reward_id: &ID) -> anyhow::Result<StockDecrementOutcome> {
        // Conditional update: matches only while stock is positive, so
        // two racing completions can never both decrement the last unit.
        let filter = doc! {
            "_id": reward_id.as_string(),
            "stock": { "$gt": 0 },
        };
        let update = doc! {
            "$inc": { "stock": -1 }
        };
        let res = self.collection.update_one(filter, update, None).await?;
        if res.modified_count > 0 {
            return Ok(StockDecrementOutcome::Ok);
        }

        // No row matched: either unlimited stock, depleted, or missing.
        match self.find(reward_id).await {
            Some(reward) if reward.stock.is_none() => Ok(StockDecrementOutcome::Ok),
            Some(_) => Ok(StockDecrementOutcome::OutOfStock),
            None => Ok(StockDecrementOutcome::NotFound),
        }
    }

    async fn restore_stock(&self, reward_id: &ID) -> anyhow::Result<()> {
        let filter = doc! {
            "_id": reward_id.as_string(),
            "stock": { "$ne": Bson::Null },
        };
        let update = doc! {
            "$inc": { "stock": 1 }
        };
        self.collection.update_one(filter, update, None).await?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RewardMongo {
    _id: String,
    event_id: String,
    name: String,
    reward_type: RewardType,
    quantity: i64,
    details: Option<Bson>,
    stock: Option<i64>,
    created_by: String,
    created: BsonDateTime,
    updated: BsonDateTime,
}

impl MongoDocument<Reward> for RewardMongo {
    fn to_domain(self) -> Reward {
        Reward {
            id: self._id.parse().unwrap(),
            event_id: self.event_id.parse().unwrap(),
            name: self.name,
            reward_type: self.reward_type,
            quantity: self.quantity,
            details: self.details.map(|d| d.into_relaxed_extjson()),
            stock: self.stock,
            created_by: self.created_by.parse().unwrap(),
            created: self.created.to_chrono(),
            updated: self.updated.to_chrono(),
        }
    }

    fn from_domain(reward: &Reward) -> Self {
        Self {
            _id: reward.id.as_string(),
            event_id: reward.event_id.as_string(),
            name: reward.name.clone(),
            reward_type: reward.reward_type,
            quantity: reward.quantity,
            details: reward
                .details
                .as_ref()
                .map(|d| d.clone().try_into().unwrap_or(Bson::Null)),
            stock: reward.stock,
            created_by: reward.created_by.as_string(),
            created: BsonDateTime::from_chrono(reward.created),
            updated: BsonDateTime::from_chrono(reward.updated),
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
