mod inmemory;
mod mongo;

use chrono::{DateTime, Utc};
use festivo_domain::{Event, EventStatus, ID};
pub use inmemory::InMemoryEventRepo;
pub use mongo::EventRepo;

/// Events are the only soft-deletable entity. Every read and write path
/// here excludes soft-deleted events; `find_all` can include them for
/// deletion audits.
#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, event: &Event) -> anyhow::Result<()>;
    async fn save(&self, event: &Event) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<Event>;
    /// All events ordered by start date descending
    async fn find_all(
        &self,
        status: Option<EventStatus>,
        include_deleted: bool,
    ) -> anyhow::Result<Vec<Event>>;
    /// Marks the event deleted and returns it, or `None` when it is
    /// absent or already deleted
    async fn soft_delete(&self, event_id: &ID, now: DateTime<Utc>) -> Option<Event>;
}
