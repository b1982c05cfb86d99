//! MongoDB client and typed collection wrapper
//!
//! Collections are opened once at startup, which also creates their
//! schema-declared indexes. All reads exclude soft-deleted documents.

use bson::{doc, oid::ObjectId, Document};
use futures_util::StreamExt;
use mongodb::{
    options::{IndexOptions, ReturnDocument, UpdateModifications},
    results::UpdateResult,
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::db::schemas::Metadata;
use crate::types::{Result, SteadfastError};

/// Index definitions a collection is opened with
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Access to a document's lifecycle stamps
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

/// Merge the soft-delete guard into a caller filter
fn live(mut filter: Document) -> Document {
    filter.insert("metadata.is_deleted", doc! { "$ne": true });
    filter
}

fn db_err(context: &str, err: impl std::fmt::Display) -> SteadfastError {
    SteadfastError::Database(format!("{}: {}", context, err))
}

/// Handle on the Steadfast database
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the database is reachable.
    ///
    /// Short client timeouts are forced onto the URI so a down database
    /// fails startup within seconds instead of hanging.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB: {}", uri);

        let separator = if uri.contains('?') { '&' } else { '?' };
        let uri = format!(
            "{}{}serverSelectionTimeoutMS=3000&connectTimeoutMS=3000",
            uri, separator
        );

        let client = Client::with_uri_str(&uri)
            .await
            .map_err(|e| db_err("Failed to connect to MongoDB", e))?;

        let mongo = Self {
            client,
            db_name: db_name.to_string(),
        };
        mongo.ping().await?;

        info!("MongoDB database '{}' is reachable", db_name);
        Ok(mongo)
    }

    /// Round-trip a ping, used at startup and by the health endpoint
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| db_err("MongoDB ping failed", e))?;
        Ok(())
    }

    /// Open a typed collection, creating its indexes
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + Default + IntoIndexes + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }
}

/// One typed collection; opening it creates the declared indexes
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + Default + IntoIndexes + MutMetadata,
{
    pub async fn new(client: &Client, db_name: &str, collection_name: &str) -> Result<Self> {
        let collection = Self {
            inner: client.database(db_name).collection::<T>(collection_name),
        };
        collection.ensure_indexes().await?;
        Ok(collection)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let models: Vec<IndexModel> = T::into_indices()
            .into_iter()
            .map(|(keys, options)| IndexModel::builder().keys(keys).options(options).build())
            .collect();

        if !models.is_empty() {
            self.inner
                .create_indexes(models)
                .await
                .map_err(|e| db_err("Failed to create indexes", e))?;
        }
        Ok(())
    }

    /// Insert a document. Metadata is restamped here so callers cannot
    /// carry stale timestamps in.
    pub async fn insert_one(&self, mut item: T) -> Result<ObjectId> {
        *item.mut_metadata() = Metadata::new();

        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| db_err("Insert failed", e))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| SteadfastError::Database("Failed to get inserted ID".into()))
    }

    /// Insert a batch of documents, restamping metadata on each
    pub async fn insert_many(&self, items: Vec<T>) -> Result<usize> {
        let stamped: Vec<T> = items
            .into_iter()
            .map(|mut item| {
                *item.mut_metadata() = Metadata::new();
                item
            })
            .collect();

        let result = self
            .inner
            .insert_many(stamped)
            .await
            .map_err(|e| db_err("Insert failed", e))?;
        Ok(result.inserted_ids.len())
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        self.inner
            .find_one(live(filter))
            .await
            .map_err(|e| db_err("Find failed", e))
    }

    /// Find all matching documents, optionally sorted.
    ///
    /// Documents that fail to decode are skipped with a warning rather
    /// than failing the whole query.
    pub async fn find_many(&self, filter: Document, sort: Option<Document>) -> Result<Vec<T>> {
        let mut find = self.inner.find(live(filter));
        if let Some(sort) = sort {
            find = find.sort(sort);
        }

        let mut cursor = find.await.map_err(|e| db_err("Find failed", e))?;
        let mut results = Vec::new();
        while let Some(next) = cursor.next().await {
            match next {
                Ok(item) => results.push(item),
                Err(e) => warn!("Skipping undecodable document: {}", e),
            }
        }
        Ok(results)
    }

    pub async fn count(&self, filter: Document) -> Result<u64> {
        self.inner
            .count_documents(live(filter))
            .await
            .map_err(|e| db_err("Count failed", e))
    }

    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        self.inner
            .update_one(filter, update.into())
            .await
            .map_err(|e| db_err("Update failed", e))
    }

    /// Atomically update one document, inserting it when absent, and
    /// return the post-update document.
    ///
    /// The update document carries its own metadata stamps: callers put
    /// created_at under $setOnInsert and updated_at under $set.
    pub async fn upsert_one(&self, filter: Document, update: Document) -> Result<Option<T>> {
        self.inner
            .find_one_and_update(filter, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| db_err("Upsert failed", e))
    }
}
