use crate::dtos::EventDTO;
use chrono::{DateTime, Utc};
use festivo_domain::{Event, EventCondition, EventStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event: EventDTO,
}

impl EventResponse {
    pub fn new(event: Event) -> Self {
        Self {
            event: EventDTO::new(event),
        }
    }
}

pub mod create_event {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub description: Option<String>,
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
        pub status: Option<EventStatus>,
        pub conditions: Option<Vec<EventCondition>>,
    }

    pub type APIResponse = EventResponse;
}

pub mod get_events {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub status: Option<EventStatus>,
        pub show_deleted: Option<bool>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub events: Vec<EventDTO>,
    }

    impl APIResponse {
        pub fn new(events: Vec<Event>) -> Self {
            Self {
                events: events.into_iter().map(EventDTO::new).collect(),
            }
        }
    }
}

pub mod get_event {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod update_event {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub description: Option<String>,
        pub start_date: Option<DateTime<Utc>>,
        pub end_date: Option<DateTime<Utc>>,
        pub status: Option<EventStatus>,
        pub conditions: Option<Vec<EventCondition>>,
    }

    pub type APIResponse = EventResponse;
}

pub mod delete_event {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}
