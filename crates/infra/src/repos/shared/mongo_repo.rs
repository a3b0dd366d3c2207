use anyhow::Result;
use festivo_domain::ID;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Collection,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

/// Mapping between a domain entity and its persisted document shape.
pub trait MongoDocument<E>: Serialize + DeserializeOwned + Unpin + Send + Sync {
    fn to_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
    fn get_id_filter(&self) -> Document;
}

pub fn id_filter(id: &ID) -> Document {
    doc! {
        "_id": id.as_string()
    }
}

pub async fn insert<E, D: MongoDocument<E>>(collection: &Collection<D>, entity: &E) -> Result<()> {
    let doc = D::from_domain(entity);
    collection.insert_one(doc, None).await?;
    Ok(())
}

pub async fn save<E, D: MongoDocument<E>>(collection: &Collection<D>, entity: &E) -> Result<()> {
    let doc = D::from_domain(entity);
    let filter = doc.get_id_filter();
    collection.replace_one(filter, doc, None).await?;
    Ok(())
}

pub async fn find<E, D: MongoDocument<E>>(collection: &Collection<D>, id: &ID) -> Option<E> {
    find_one_by(collection, id_filter(id)).await
}

pub async fn find_one_by<E, D: MongoDocument<E>>(
    collection: &Collection<D>,
    filter: Document,
) -> Option<E> {
    match collection.find_one(filter, None).await {
        Ok(doc) => doc.map(|doc| doc.to_domain()),
        Err(e) => {
            error!("Mongodb find query failed: {:?}", e);
            None
        }
    }
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection<D>,
    filter: Document,
    options: Option<FindOptions>,
) -> Result<Vec<E>> {
    let mut cursor = collection.find(filter, options).await?;
    let mut documents = Vec::new();
    while let Some(doc) = cursor.try_next().await? {
        documents.push(doc.to_domain());
    }
    Ok(documents)
}

pub async fn delete<E, D: MongoDocument<E>>(collection: &Collection<D>, id: &ID) -> Option<E> {
    match collection.find_one_and_delete(id_filter(id), None).await {
        Ok(doc) => doc.map(|doc| doc.to_domain()),
        Err(e) => {
            error!("Mongodb delete query failed: {:?}", e);
            None
        }
    }
}
