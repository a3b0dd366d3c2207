use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// A user's claim attempt against one `(event, reward)` pair.
///
/// Created by a user action and afterwards mutated only through status
/// transitions driven by an operator. Requests are never deleted, so
/// terminal records form a permanent audit trail.
#[derive(Debug, Clone)]
pub struct RewardRequest {
    pub id: ID,
    pub user_id: ID,
    pub event_id: ID,
    pub reward_id: ID,
    pub status: RewardRequestStatus,
    pub user_memo: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processor_id: Option<ID>,
    pub failure_reason: Option<String>,
    pub transaction_details: Option<TransactionDetails>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardRequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Failed,
    Cancelled,
}

impl RewardRequestStatus {
    /// Terminal records refuse any further transition. FAILED is terminal
    /// as well: a lost stock race is resolved by creating a new request,
    /// never by re-driving the failed one.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::Completed | Self::Failed | Self::Cancelled
        )
    }

    /// Statuses counted against the one-active-claim-per-triple invariant.
    pub fn is_active_claim(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved | Self::Completed)
    }
}

impl Display for RewardRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Simulated payout record attached when a request completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub message: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatusTransitionError {
    #[error("request is already in terminal status {current} and cannot change")]
    TerminalState { current: RewardRequestStatus },
    #[error("{target} is not a valid transition target")]
    InvalidTarget { target: RewardRequestStatus },
}

impl RewardRequest {
    pub fn new(
        user_id: ID,
        event_id: ID,
        reward_id: ID,
        user_memo: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            event_id,
            reward_id,
            status: RewardRequestStatus::Pending,
            user_memo,
            requested_at: now,
            processed_at: None,
            processor_id: None,
            failure_reason: None,
            transaction_details: None,
            created: now,
            updated: now,
        }
    }

    /// A request admitted directly in terminal REJECTED state. Preserves
    /// the audit trail of a failed eligibility check without ever being
    /// actionable by an operator.
    pub fn new_rejected(
        user_id: ID,
        event_id: ID,
        reward_id: ID,
        user_memo: Option<String>,
        reason: String,
        now: DateTime<Utc>,
    ) -> Self {
        let mut request = Self::new(user_id, event_id, reward_id, user_memo, now);
        request.status = RewardRequestStatus::Rejected;
        request.failure_reason = Some(reason);
        request.processed_at = Some(now);
        request
    }

    pub fn can_transition_to(
        &self,
        target: RewardRequestStatus,
    ) -> Result<(), StatusTransitionError> {
        if self.status.is_terminal() {
            return Err(StatusTransitionError::TerminalState {
                current: self.status,
            });
        }
        if target == RewardRequestStatus::Pending {
            return Err(StatusTransitionError::InvalidTarget { target });
        }
        Ok(())
    }

    /// Applies an operator-driven transition, stamping the processing
    /// metadata. Stock allocation for COMPLETED transitions happens in the
    /// fulfillment usecase before this record is persisted.
    pub fn resolve(
        &mut self,
        target: RewardRequestStatus,
        reason: Option<String>,
        processor_id: &ID,
        now: DateTime<Utc>,
    ) -> Result<(), StatusTransitionError> {
        self.can_transition_to(target)?;

        self.status = target;
        self.processed_at = Some(now);
        self.processor_id = Some(processor_id.clone());
        if let Some(reason) = reason {
            self.failure_reason = Some(reason);
        }
        self.updated = now;
        Ok(())
    }

    /// Redirects a losing COMPLETED attempt to FAILED so the audit trail
    /// never shows a completion that was not backed by stock.
    pub fn fail(&mut self, reason: String, processor_id: &ID, now: DateTime<Utc>) {
        self.status = RewardRequestStatus::Failed;
        self.failure_reason = Some(reason);
        self.processed_at = Some(now);
        self.processor_id = Some(processor_id.clone());
        self.transaction_details = None;
        self.updated = now;
    }

    pub fn record_payout(&mut self, now: DateTime<Utc>) {
        self.transaction_details = Some(TransactionDetails {
            message: "Reward payout completed (simulated)".into(),
            paid_at: now,
        });
    }
}

impl Entity for RewardRequest {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pending_request() -> RewardRequest {
        RewardRequest::new(
            Default::default(),
            Default::default(),
            Default::default(),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn new_request_is_pending() {
        let request = pending_request();
        assert_eq!(request.status, RewardRequestStatus::Pending);
        assert!(request.processed_at.is_none());
        assert!(request.status.is_active_claim());
    }

    #[test]
    fn rejected_admission_is_terminal() {
        let request = RewardRequest::new_rejected(
            Default::default(),
            Default::default(),
            Default::default(),
            None,
            "Event conditions were not met".into(),
            Utc::now(),
        );
        assert_eq!(request.status, RewardRequestStatus::Rejected);
        assert!(request.status.is_terminal());
        assert!(!request.status.is_active_claim());
        assert!(request.processed_at.is_some());
    }

    #[test]
    fn resolve_stamps_processing_metadata() {
        let mut request = pending_request();
        let operator = ID::new();
        let now = Utc::now();

        request
            .resolve(RewardRequestStatus::Approved, None, &operator, now)
            .unwrap();
        assert_eq!(request.status, RewardRequestStatus::Approved);
        assert_eq!(request.processor_id, Some(operator.clone()));
        assert_eq!(request.processed_at, Some(now));

        // APPROVED is still non-terminal and may move on to COMPLETED
        request
            .resolve(RewardRequestStatus::Completed, None, &operator, now)
            .unwrap();
        assert_eq!(request.status, RewardRequestStatus::Completed);
    }

    #[test]
    fn terminal_statuses_refuse_transitions() {
        let operator = ID::new();
        for terminal in [
            RewardRequestStatus::Rejected,
            RewardRequestStatus::Completed,
            RewardRequestStatus::Failed,
            RewardRequestStatus::Cancelled,
        ] {
            let mut request = pending_request();
            request
                .resolve(terminal, None, &operator, Utc::now())
                .unwrap();
            let before = request.clone();

            let res = request.resolve(
                RewardRequestStatus::Cancelled,
                Some("late cancel".into()),
                &operator,
                Utc::now(),
            );
            assert_eq!(
                res,
                Err(StatusTransitionError::TerminalState { current: terminal })
            );
            // the record is left untouched
            assert_eq!(request.status, before.status);
            assert_eq!(request.failure_reason, before.failure_reason);
            assert_eq!(request.processed_at, before.processed_at);
        }
    }

    #[test]
    fn pending_is_not_a_valid_target() {
        let mut request = pending_request();
        let res = request.resolve(
            RewardRequestStatus::Pending,
            None,
            &ID::new(),
            Utc::now(),
        );
        assert_eq!(
            res,
            Err(StatusTransitionError::InvalidTarget {
                target: RewardRequestStatus::Pending
            })
        );
    }

    #[test]
    fn fail_overrides_requested_completion() {
        let mut request = pending_request();
        let operator = ID::new();
        request.fail("Stock depleted during payout".into(), &operator, Utc::now());
        assert_eq!(request.status, RewardRequestStatus::Failed);
        assert_eq!(
            request.failure_reason.as_deref(),
            Some("Stock depleted during payout")
        );
        assert!(request.transaction_details.is_none());
    }
}
