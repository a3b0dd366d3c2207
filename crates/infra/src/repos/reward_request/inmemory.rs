use super::{IRewardRequestRepo, InsertClaimError, RewardRequestQuery, TransitionOutcome};
use crate::repos::shared::inmemory_repo::*;
use festivo_domain::{RewardRequest, RewardRequestStatus, ID};
use std::sync::Mutex;

pub struct InMemoryRewardRequestRepo {
    requests: Mutex<Vec<RewardRequest>>,
}

impl InMemoryRewardRequestRepo {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IRewardRequestRepo for InMemoryRewardRequestRepo {
    async fn insert(&self, request: &RewardRequest) -> Result<(), InsertClaimError> {
        // Uniqueness check and push happen under the same lock, which is
        // this store's equivalent of a unique index.
        let mut requests = self.requests.lock().unwrap();
        if request.status.is_active_claim() {
            let duplicate = requests.iter().any(|existing| {
                existing.status.is_active_claim()
                    && existing.user_id == request.user_id
                    && existing.event_id == request.event_id
                    && existing.reward_id == request.reward_id
            });
            if duplicate {
                return Err(InsertClaimError::DuplicateClaim);
            }
        }
        requests.push(request.clone());
        Ok(())
    }

    async fn transition(
        &self,
        request: &RewardRequest,
        expected: RewardRequestStatus,
    ) -> anyhow::Result<TransitionOutcome> {
        // status check and replace happen under the same lock
        let mut requests = self.requests.lock().unwrap();
        match requests.iter_mut().find(|stored| stored.id == request.id) {
            Some(stored) if stored.status == expected => {
                *stored = request.clone();
                Ok(TransitionOutcome::Applied)
            }
            _ => Ok(TransitionOutcome::StaleStatus),
        }
    }

    async fn find(&self, request_id: &ID) -> Option<RewardRequest> {
        find(request_id, &self.requests)
    }

    async fn find_by_user(&self, user_id: &ID, event_id: Option<&ID>) -> Vec<RewardRequest> {
        let mut requests = find_by(&self.requests, |request| {
            &request.user_id == user_id
                && event_id.map(|id| &request.event_id == id).unwrap_or(true)
        });
        requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        requests
    }

    async fn find_paginated(
        &self,
        query: &RewardRequestQuery,
        skip: u64,
        limit: i64,
    ) -> anyhow::Result<(Vec<RewardRequest>, u64)> {
        let mut matches = find_by(&self.requests, |request| {
            query
                .event_id
                .as_ref()
                .map(|id| &request.event_id == id)
                .unwrap_or(true)
                && query
                    .user_id
                    .as_ref()
                    .map(|id| &request.user_id == id)
                    .unwrap_or(true)
                && query
                    .status
                    .map(|status| request.status == status)
                    .unwrap_or(true)
        });
        matches.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }
}
