use super::IEventRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use chrono::{DateTime, Utc};
use festivo_domain::{Event, EventCondition, EventStatus, ID};
use mongodb::{
    bson::{doc, to_bson, DateTime as BsonDateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct EventRepo {
    collection: Collection<EventMongo>,
}

impl EventRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("events"),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for EventRepo {
    async fn insert(&self, event: &Event) -> anyhow::Result<()> {
        mongo_repo::insert(&self.collection, event).await
    }

    async fn save(&self, event: &Event) -> anyhow::Result<()> {
        mongo_repo::save(&self.collection, event).await
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        let filter = doc! {
            "_id": event_id.as_string(),
            "deleted_at": null
        };
        mongo_repo::find_one_by(&self.collection, filter).await
    }

    async fn find_all(
        &self,
        status: Option<EventStatus>,
        include_deleted: bool,
    ) -> anyhow::Result<Vec<Event>> {
        let mut filter = Document::new();
        if let Some(status) = status {
            filter.insert("status", to_bson(&status)?);
        }
        if !include_deleted {
            filter.insert("deleted_at", None::<BsonDateTime>);
        }
        let options = FindOptions::builder()
            .sort(doc! { "start_date": -1 })
            .build();
        mongo_repo::find_many_by(&self.collection, filter, Some(options)).await
    }

    async fn soft_delete(&self, event_id: &ID, now: DateTime<Utc>) -> Option<Event> {
        let filter = doc! {
            "_id": event_id.as_string(),
            "deleted_at": null
        };
        let update = doc! {
            "$set": {
                "deleted_at": BsonDateTime::from_chrono(now),
                "updated": BsonDateTime::from_chrono(now),
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .find_one_and_update(filter, update, options)
            .await
            .ok()
            .flatten()
            .map(|doc| doc.to_domain())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EventMongo {
    _id: String,
    title: String,
    description: Option<String>,
    start_date: BsonDateTime,
    end_date: BsonDateTime,
    status: EventStatus,
    conditions: Vec<EventCondition>,
    created_by: String,
    deleted_at: Option<BsonDateTime>,
    created: BsonDateTime,
    updated: BsonDateTime,
}

impl MongoDocument<Event> for EventMongo {
    fn to_domain(self) -> Event {
        Event {
            id: self._id.parse().unwrap(),
            title: self.title,
            description: self.description,
            start_date: self.start_date.to_chrono(),
            end_date: self.end_date.to_chrono(),
            status: self.status,
            conditions: self.conditions,
            created_by: self.created_by.parse().unwrap(),
            deleted_at: self.deleted_at.map(|d| d.to_chrono()),
            created: self.created.to_chrono(),
            updated: self.updated.to_chrono(),
        }
    }

    fn from_domain(event: &Event) -> Self {
        Self {
            _id: event.id.as_string(),
            title: event.title.clone(),
            description: event.description.clone(),
            start_date: BsonDateTime::from_chrono(event.start_date),
            end_date: BsonDateTime::from_chrono(event.end_date),
            status: event.status,
            conditions: event.conditions.clone(),
            created_by: event.created_by.as_string(),
            deleted_at: event.deleted_at.map(BsonDateTime::from_chrono),
            created: BsonDateTime::from_chrono(event.created),
            updated: BsonDateTime::from_chrono(event.updated),
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
