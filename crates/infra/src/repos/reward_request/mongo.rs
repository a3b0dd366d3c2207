use super::{IRewardRequestRepo, InsertClaimError, RewardRequestQuery, TransitionOutcome};
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use anyhow::Context;
use festivo_domain::{RewardRequest, RewardRequestStatus, TransactionDetails, ID};
use mongodb::{
    bson::{doc, to_bson, DateTime as BsonDateTime, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};

pub struct RewardRequestRepo {
    collection: Collection<RewardRequestMongo>,
}

impl RewardRequestRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("reward_requests"),
        }
    }

    /// The sparse unique index on `active_claim` is the store-level
    /// guarantee behind the one-active-claim-per-triple invariant.
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let claim_index = IndexModel::builder()
            .keys(doc! { "active_claim": 1 })
            .options(IndexOptions::builder().unique(true).sparse(true).build())
            .build();
        self.collection
            .create_index(claim_index, None)
            .await
            .context("To create the unique active claim index")?;

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "requested_at": -1 })
            .build();
        self.collection.create_index(user_index, None).await?;
        Ok(())
    }
}

fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11000
    )
}

#[async_trait::async_trait]
impl IRewardRequestRepo for RewardRequestRepo {
    async fn insert(&self, request: &RewardRequest) -> Result<(), InsertClaimError> {
        let doc = RewardRequestMongo::from_domain(request);
        self.collection
            .insert_one(doc, None)
            .await
            .map(|_| ())
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    InsertClaimError::DuplicateClaim
                } else {
                    InsertClaimError::Storage(e.into())
                }
            })
    }

    async fn transition(
        &self,
        request: &RewardRequest,
        expected: RewardRequestStatus,
    ) -> anyhow::Result<TransitionOutcome> {
        let doc = RewardRequestMongo::from_domain(request);
        let filter = doc! {
            "_id": doc._id.clone(),
            "status": to_bson(&expected)?,
        };
        let res = self.collection.replace_one(filter, doc, None).await?;
        if res.matched_count > 0 {
            Ok(TransitionOutcome::Applied)
        } else {
            Ok(TransitionOutcome::StaleStatus)
        }
    }

    async fn find(&self, request_id: &ID) -> Option<RewardRequest> {
        mongo_repo::find(&self.collection, request_id).await
    }

    async fn find_by_user(&self, user_id: &ID, event_id: Option<&ID>) -> Vec<RewardRequest> {
        let mut filter = doc! { "user_id": user_id.as_string() };
        if let Some(event_id) = event_id {
            filter.insert("event_id", event_id.as_string());
        }
        let options = FindOptions::builder()
            .sort(doc! { "requested_at": -1 })
            .build();
        mongo_repo::find_many_by(&self.collection, filter, Some(options))
            .await
            .unwrap_or_default()
    }

    async fn find_paginated(
        &self,
        query: &RewardRequestQuery,
        skip: u64,
        limit: i64,
    ) -> anyhow::Result<(Vec<RewardRequest>, u64)> {
        let mut filter = Document::new();
        if let Some(event_id) = &query.event_id {
            filter.insert("event_id", event_id.as_string());
        }
        if let Some(user_id) = &query.user_id {
            filter.insert("user_id", user_id.as_string());
        }
        if let Some(status) = query.status {
            filter.insert("status", to_bson(&status)?);
        }

        let total = self
            .collection
            .count_documents(filter.clone(), None)
            .await?;
        let options = FindOptions::builder()
            .sort(doc! { "requested_at": -1 })
            .skip(skip)
            .limit(limit)
            .build();
        let requests = mongo_repo::find_many_by(&self.collection, filter, Some(options)).await?;
        Ok((requests, total))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RewardRequestMongo {
    _id: String,
    user_id: String,
    event_id: String,
    reward_id: String,
    status: RewardRequestStatus,
    /// `"{user}:{event}:{reward}"` while the request is an active claim,
    /// absent otherwise. Carries the sparse unique index.
    #[serde(skip_serializing_if = "Option::is_none")]
    active_claim: Option<String>,
    user_memo: Option<String>,
    requested_at: BsonDateTime,
    processed_at: Option<BsonDateTime>,
    processor_id: Option<String>,
    failure_reason: Option<String>,
    transaction_details: Option<TransactionDetailsMongo>,
    created: BsonDateTime,
    updated: BsonDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionDetailsMongo {
    message: String,
    paid_at: BsonDateTime,
}

impl MongoDocument<RewardRequest> for RewardRequestMongo {
    fn to_domain(self) -> RewardRequest {
        RewardRequest {
            id: self._id.parse().unwrap(),
            user_id: self.user_id.parse().unwrap(),
            event_id: self.event_id.parse().unwrap(),
            reward_id: self.reward_id.parse().unwrap(),
            status: self.status,
            user_memo: self.user_memo,
            requested_at: self.requested_at.to_chrono(),
            processed_at: self.processed_at.map(|d| d.to_chrono()),
            processor_id: self.processor_id.map(|id| id.parse().unwrap()),
            failure_reason: self.failure_reason,
            transaction_details: self.transaction_details.map(|t| TransactionDetails {
                message: t.message,
                paid_at: t.paid_at.to_chrono(),
            }),
            created: self.created.to_chrono(),
            updated: self.updated.to_chrono(),
        }
    }

    fn from_domain(request: &RewardRequest) -> Self {
        let active_claim = if request.status.is_active_claim() {
            Some(format!(
                "{}:{}:{}",
                request.user_id, request.event_id, request.reward_id
            ))
        } else {
            None
        };
        Self {
            _id: request.id.as_string(),
            user_id: request.user_id.as_string(),
            event_id: request.event_id.as_string(),
            reward_id: request.reward_id.as_string(),
            status: request.status,
            active_claim,
            user_memo: request.user_memo.clone(),
            requested_at: BsonDateTime::from_chrono(request.requested_at),
            processed_at: request.processed_at.map(BsonDateTime::from_chrono),
            processor_id: request.processor_id.as_ref().map(|id| id.as_string()),
            failure_reason: request.failure_reason.clone(),
            transaction_details: request.transaction_details.as_ref().map(|t| {
                TransactionDetailsMongo {
                    message: t.message.clone(),
                    paid_at: BsonDateTime::from_chrono(t.paid_at),
                }
            }),
            created: BsonDateTime::from_chrono(request.created),
            updated: BsonDateTime::from_chrono(request.updated),
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
