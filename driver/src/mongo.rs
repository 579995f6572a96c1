//! `DocumentStore` backed by the official MongoDB driver

use async_trait::async_trait;
use futures::TryStreamExt;
use lab_core::query;
use lab_core::{Config, DocumentStore, LabError, LabResult, UpdateCounts};
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info};

pub struct MongoStore {
	client: Client,
	database: Database,
	collection: Collection<Document>,
}

impl MongoStore {
	/// Build a client for `config.uri`, confirm the server answers, and select
	/// the configured database and collection.
	pub async fn connect(config: &Config) -> LabResult<Self> {
		config.validate()?;

		let options = ClientOptions::parse(&config.uri).await.map_err(|e| {
			LabError::Connection(format!("Invalid connection string {}: {}", config.uri, e))
		})?;
		let client = Client::with_options(options)
			.map_err(|e| LabError::Connection(format!("Failed to create client: {}", e)))?;

		let store = Self::from_client(client, &config.database, &config.collection);
		store.ping().await?;
		info!(uri = %config.uri, "Connected to MongoDB");
		info!(database = %config.database, "Database selected");
		info!(collection = %config.collection, "Collection selected");

		Ok(store)
	}

	/// Wrap an existing client without contacting the server.
	///
	/// Databases and collections are created lazily by the server on first write.
	pub fn from_client(client: Client, database: &str, collection: &str) -> Self {
		let database = client.database(database);
		let collection = database.collection::<Document>(collection);
		Self {
			client,
			database,
			collection,
		}
	}

	pub fn namespace(&self) -> String {
		self.collection.namespace().to_string()
	}
}

#[async_trait]
impl DocumentStore for MongoStore {
	async fn ping(&self) -> LabResult<()> {
		self.client
			.database("admin")
			.run_command(doc! { "ping": 1 })
			.await
			.map_err(|e| LabError::Connection(format!("Ping failed: {}", e)))?;
		Ok(())
	}

	async fn insert_one(&self, doc: Document) -> LabResult<Bson> {
		debug!(document = %doc, "insert_one");
		let result = self.collection.insert_one(doc).await?;
		Ok(result.inserted_id)
	}

	async fn insert_many(&self, docs: Vec<Document>) -> LabResult<usize> {
		debug!(count = docs.len(), "insert_many");
		let result = self.collection.insert_many(docs).await?;
		Ok(result.inserted_ids.len())
	}

	async fn find(&self, filter: Document) -> LabResult<Vec<Document>> {
		debug!(filter = %filter, "find");
		let cursor = self.collection.find(filter).await?;
		Ok(cursor.try_collect().await?)
	}

	async fn update_one(&self, filter: Document, update: Document) -> LabResult<UpdateCounts> {
		debug!(filter = %filter, update = %update, "update_one");
		let result = self.collection.update_one(filter, update).await?;
		Ok(UpdateCounts {
			matched: result.matched_count,
			modified: result.modified_count,
		})
	}

	async fn update_many(&self, filter: Document, update: Document) -> LabResult<UpdateCounts> {
		debug!(filter = %filter, update = %update, "update_many");
		let result = self.collection.update_many(filter, update).await?;
		Ok(UpdateCounts {
			matched: result.matched_count,
			modified: result.modified_count,
		})
	}

	async fn delete_one(&self, filter: Document) -> LabResult<u64> {
		debug!(filter = %filter, "delete_one");
		let result = self.collection.delete_one(filter).await?;
		Ok(result.deleted_count)
	}

	async fn delete_many(&self, filter: Document) -> LabResult<u64> {
		debug!(filter = %filter, "delete_many");
		let result = self.collection.delete_many(filter).await?;
		Ok(result.deleted_count)
	}

	async fn create_index(&self, index: IndexModel) -> LabResult<String> {
		debug!(keys = %index.keys, "create_index");
		let result = self.collection.create_index(index).await?;
		Ok(result.index_name)
	}

	/// Raw `listIndexes` output, so fields the driver does not model survive.
	async fn list_indexes(&self) -> LabResult<Vec<Document>> {
		let command = query::list_indexes_command(self.collection.name());
		debug!(command = %command, "list_indexes");
		let cursor = self.database.run_cursor_command(command).await?;
		Ok(cursor.try_collect().await?)
	}

	async fn aggregate(&self, pipeline: Vec<Document>) -> LabResult<Vec<Document>> {
		debug!(stages = pipeline.len(), "aggregate");
		let cursor = self.collection.aggregate(pipeline).await?;
		Ok(cursor.try_collect().await?)
	}

	async fn drop_collection(&self) -> LabResult<()> {
		info!(namespace = %self.namespace(), "Dropping collection");
		self.collection.drop().await?;
		Ok(())
	}

	async fn close(&self) -> LabResult<()> {
		self.client.clone().shutdown().await;
		info!("MongoDB connection closed");
		Ok(())
	}
}
