use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{
    Client, Collection, Database as MongoDatabase, IndexModel,
    bson::{Document, doc, oid::ObjectId},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::Config;
use crate::data_models::{NewSearch, SearchRecord, SearchSummary};
use crate::store::SearchStore;

/// Collection names as constants for consistency
pub mod collections {
    pub const SEARCHES: &str = "searches";
}

/// Main database wrapper providing connection management and collection access
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
    db: MongoDatabase,
}

impl Database {
    /// Create a new Database instance with custom URI and database name.
    /// Useful for testing with a different database.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        let client_options = ClientOptions::parse(uri)
            .await
            .context("Failed to parse MongoDB connection string")?;

        let client =
            Client::with_options(client_options).context("Failed to create MongoDB client")?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .context("Failed to connect to MongoDB")?;

        log::info!("Connected to MongoDB database: {}", db_name);

        let db = client.database(db_name);

        Ok(Self { client, db })
    }

    /// Connect using `MONGO_URI` / `MONGO_DB_NAME` from the loaded config.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let uri = config
            .mongo_uri
            .as_deref()
            .context("MONGO_URI is not set")?;
        Self::new(uri, &config.mongo_db_name).await
    }

    /// Get a typed collection by name
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.db.collection(name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn searches(&self) -> Collection<SearchRecord> {
        self.collection(collections::SEARCHES)
    }

    pub fn searches_repo(&self) -> Repository<SearchRecord> {
        Repository::new(self.searches())
    }
}

// =============================================================================
// Generic CRUD operations
// =============================================================================

pub struct Repository<T>
where
    T: Send + Sync,
{
    collection: Collection<T>,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }

    /// Insert a single document
    pub async fn insert(&self, doc: &T) -> Result<ObjectId> {
        let result = self
            .collection
            .insert_one(doc)
            .await
            .context("Failed to insert document")?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow::anyhow!("Failed to get inserted ObjectId"))
    }

    /// Find a document by ObjectId
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<T>> {
        let filter = doc! { "_id": id };
        self.collection
            .find_one(filter)
            .await
            .context("Failed to find document by id")
    }

    /// Find documents matching a filter, sorted, limited and projected into `P`.
    pub async fn find_projected<P>(
        &self,
        filter: Document,
        sort: Document,
        limit: i64,
        projection: Document,
    ) -> Result<Vec<P>>
    where
        P: DeserializeOwned + Unpin + Send + Sync,
    {
        let cursor = self
            .collection
            .clone_with_type::<P>()
            .find(filter)
            .sort(sort)
            .limit(limit)
            .projection(projection)
            .await
            .context("Failed to execute find query")?;

        cursor
            .try_collect()
            .await
            .context("Failed to collect results")
    }

    /// Delete a document by ObjectId
    pub async fn delete_by_id(&self, id: ObjectId) -> Result<bool> {
        let filter = doc! { "_id": id };
        let result = self
            .collection
            .delete_one(filter)
            .await
            .context("Failed to delete document")?;

        Ok(result.deleted_count > 0)
    }

    pub async fn create_index(&self, keys: Document, name: &str) -> Result<()> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().name(name.to_string()).build())
            .build();
        self.collection
            .create_index(index)
            .await
            .with_context(|| format!("Failed to create index {name}"))?;
        Ok(())
    }
}

// =============================================================================
// Search-specific operations
// =============================================================================

pub struct SearchRepo {
    repo: Repository<SearchRecord>,
}

impl SearchRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            repo: db.searches_repo(),
        }
    }

    /// History lookups filter on user and sort on creation time.
    pub async fn ensure_indexes(&self) -> Result<()> {
        self.repo
            .create_index(doc! { "userId": 1, "createdAt": -1 }, "userId_createdAt")
            .await
    }
}

#[async_trait]
impl SearchStore for SearchRepo {
    async fn create(&self, search: NewSearch) -> Result<SearchRecord> {
        let record = SearchRecord::new(search);
        self.repo.insert(&record).await?;
        Ok(record)
    }

    async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<SearchSummary>> {
        self.repo
            .find_projected(
                doc! { "userId": user_id },
                doc! { "createdAt": -1, "_id": -1 },
                i64::try_from(limit).unwrap_or(i64::MAX),
                doc! { "query": 1, "platforms": 1, "createdAt": 1 },
            )
            .await
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<SearchRecord>> {
        self.repo.find_by_id(id).await
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool> {
        self.repo.delete_by_id(id).await
    }
}

// =============================================================================
// Test utilities
// =============================================================================
