mod inmemory;
mod mongo;

use festivo_domain::{RewardRequest, RewardRequestStatus, ID};
pub use inmemory::InMemoryRewardRequestRepo;
pub use mongo::RewardRequestRepo;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsertClaimError {
    /// The store already holds a PENDING, APPROVED or COMPLETED request
    /// for the same `(user, event, reward)` triple.
    #[error("An active request for this user, event and reward already exists")]
    DuplicateClaim,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Outcome of a conditional status transition write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    /// The stored record was no longer in the expected status, nothing
    /// was written.
    StaleStatus,
}

/// Operator-facing filters for browsing reward requests.
#[derive(Debug, Default, Clone)]
pub struct RewardRequestQuery {
    pub event_id: Option<ID>,
    pub user_id: Option<ID>,
    pub status: Option<RewardRequestStatus>,
}

#[async_trait::async_trait]
pub trait IRewardRequestRepo: Send + Sync {
    /// Persists a new request. When the request counts as an active
    /// claim, the store itself enforces the one-active-claim-per-triple
    /// invariant: two concurrent inserts for the same triple cannot both
    /// succeed.
    async fn insert(&self, request: &RewardRequest) -> Result<(), InsertClaimError>;
    /// Replaces the stored record, but only while it still holds the
    /// `expected` status. The check and the write are one atomic
    /// operation against the store, so a processor working from a stale
    /// snapshot can never overwrite a transition that happened after its
    /// read.
    async fn transition(
        &self,
        request: &RewardRequest,
        expected: RewardRequestStatus,
    ) -> anyhow::Result<TransitionOutcome>;
    async fn find(&self, request_id: &ID) -> Option<RewardRequest>;
    /// A user's own requests, newest first, optionally scoped to one event
    async fn find_by_user(&self, user_id: &ID, event_id: Option<&ID>) -> Vec<RewardRequest>;
    /// Filtered page of requests ordered by `requested_at` descending,
    /// together with the total match count
    async fn find_paginated(
        &self,
        query: &RewardRequestQuery,
        skip: u64,
        limit: i64,
    ) -> anyhow::Result<(Vec<RewardRequest>, u64)>;
}
