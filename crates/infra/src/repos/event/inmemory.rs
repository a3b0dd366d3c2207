use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use festivo_domain::{Entity, Event, EventStatus, ID};
use std::sync::Mutex;

pub struct InMemoryEventRepo {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, event: &Event) -> anyhow::Result<()> {
        insert(event, &self.events);
        Ok(())
    }

    async fn save(&self, event: &Event) -> anyhow::Result<()> {
        save(event, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        find(event_id, &self.events).filter(|event| !event.is_deleted())
    }

    async fn find_all(
        &self,
        status: Option<EventStatus>,
        include_deleted: bool,
    ) -> anyhow::Result<Vec<Event>> {
        let mut events = find_by(&self.events, |event| {
            (include_deleted || !event.is_deleted())
                && status.map(|s| event.status == s).unwrap_or(true)
        });
        events.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(events)
    }

    async fn soft_delete(&self, event_id: &ID, now: DateTime<Utc>) -> Option<Event> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|event| event.id() == event_id && !event.is_deleted())?;
        event.deleted_at = Some(now);
        event.updated = now;
        Some(event.clone())
    }
}
