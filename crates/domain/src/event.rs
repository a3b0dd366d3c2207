use crate::condition::EventCondition;
use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time-boxed promotional campaign. Owns `Reward`s (1:N by `event_id`)
/// and the ordered list of eligibility conditions users must satisfy to
/// claim them.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: EventStatus,
    pub conditions: Vec<EventCondition>,
    pub created_by: ID,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Scheduled,
    Active,
    Inactive,
    Ended,
}

impl Event {
    /// `end_date > start_date` must hold at every create and update.
    pub fn has_valid_window(start_date: &DateTime<Utc>, end_date: &DateTime<Utc>) -> bool {
        end_date > start_date
    }

    /// An event accepts reward requests only while ACTIVE and inside its
    /// half-open `[start_date, end_date)` window.
    pub fn is_live_at(&self, now: &DateTime<Utc>) -> bool {
        self.status == EventStatus::Active && &self.start_date <= now && now < &self.end_date
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}
