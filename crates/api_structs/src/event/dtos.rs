use chrono::{DateTime, Utc};
use festivo_domain::{Event, EventCondition, EventStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
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

impl EventDTO {
    pub fn new(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            status: event.status,
            conditions: event.conditions,
            created_by: event.created_by,
            deleted_at: event.deleted_at,
            created: event.created,
            updated: event.updated,
        }
    }
}
