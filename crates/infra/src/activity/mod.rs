use chrono::{Duration, NaiveDate, Utc};
use festivo_domain::ID;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// The user activity source was unreachable or returned an error.
///
/// Condition evaluation must surface this to the caller instead of
/// defaulting the verdict in either direction.
#[derive(Debug, Error)]
#[error("User activity source unavailable: {0}")]
pub struct ActivityProviderError(pub String);

/// Read-only facts about a user's behavior, answered by an external
/// system. Evaluating event conditions never mutates anything through
/// this trait, so condition checks are safely retryable.
#[async_trait::async_trait]
pub trait IUserActivityProvider: Send + Sync {
    /// Number of consecutive days, ending today, the user has logged in
    async fn login_streak(&self, user_id: &ID) -> Result<i64, ActivityProviderError>;
    async fn friend_invitation_count(&self, user_id: &ID) -> Result<i64, ActivityProviderError>;
    async fn has_cleared_quest(
        &self,
        user_id: &ID,
        quest_id: &str,
    ) -> Result<bool, ActivityProviderError>;
    /// Cumulative purchase amount in minor currency units
    async fn total_purchase_amount(&self, user_id: &ID) -> Result<i64, ActivityProviderError>;
}

/// Inmemory stand-in for the external activity source, used by tests and
/// by the standalone server context. Seed it through the `add_*` methods.
pub struct InMemoryUserActivityProvider {
    logins: Mutex<HashMap<ID, Vec<NaiveDate>>>,
    invitations: Mutex<HashMap<ID, Vec<String>>>,
    cleared_quests: Mutex<HashMap<ID, HashSet<String>>>,
    purchases: Mutex<HashMap<ID, i64>>,
}

impl InMemoryUserActivityProvider {
    pub fn new() -> Self {
        Self {
            logins: Mutex::new(HashMap::new()),
            invitations: Mutex::new(HashMap::new()),
            cleared_quests: Mutex::new(HashMap::new()),
            purchases: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_login(&self, user_id: &ID, date: NaiveDate) {
        let mut logins = self.logins.lock().unwrap();
        logins.entry(user_id.clone()).or_default().push(date);
    }

    /// Seeds a streak of `days` consecutive logins ending today
    pub fn add_login_streak(&self, user_id: &ID, days: i64) {
        let today = Utc::now().date_naive();
        for offset in 0..days {
            self.add_login(user_id, today - Duration::days(offset));
        }
    }

    pub fn add_friend_invitation(&self, user_id: &ID, friend_id: &str) {
        let mut invitations = self.invitations.lock().unwrap();
        invitations
            .entry(user_id.clone())
            .or_default()
            .push(friend_id.to_string());
    }

    pub fn add_cleared_quest(&self, user_id: &ID, quest_id: &str) {
        let mut quests = self.cleared_quests.lock().unwrap();
        quests
            .entry(user_id.clone())
            .or_default()
            .insert(quest_id.to_string());
    }

    pub fn add_purchase(&self, user_id: &ID, amount: i64) {
        let mut purchases = self.purchases.lock().unwrap();
        *purchases.entry(user_id.clone()).or_insert(0) += amount;
    }
}

impl Default for InMemoryUserActivityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IUserActivityProvider for InMemoryUserActivityProvider {
    async fn login_streak(&self, user_id: &ID) -> Result<i64, ActivityProviderError> {
        let logins = self.logins.lock().unwrap();
        let mut dates = match logins.get(user_id) {
            Some(dates) => dates.clone(),
            None => return Ok(0),
        };
        dates.sort_unstable();
        dates.dedup();
        dates.reverse();

        let mut streak = 0;
        let mut expected = Utc::now().date_naive();
        for date in dates {
            if date == expected {
                streak += 1;
                expected -= Duration::days(1);
            } else if date < expected {
                break;
            }
        }
        debug!("User {} login streak: {}", user_id, streak);
        Ok(streak)
    }

    async fn friend_invitation_count(&self, user_id: &ID) -> Result<i64, ActivityProviderError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations.get(user_id).map(|i| i.len() as i64).unwrap_or(0))
    }

    async fn has_cleared_quest(
        &self,
        user_id: &ID,
        quest_id: &str,
    ) -> Result<bool, ActivityProviderError> {
        let quests = self.cleared_quests.lock().unwrap();
        Ok(quests
            .get(user_id)
            .map(|q| q.contains(quest_id))
            .unwrap_or(false))
    }

    async fn total_purchase_amount(&self, user_id: &ID) -> Result<i64, ActivityProviderError> {
        let purchases = self.purchases.lock().unwrap();
        Ok(purchases.get(user_id).copied().unwrap_or(0))
    }
}
