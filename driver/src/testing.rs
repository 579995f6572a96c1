//! In-memory `DocumentStore` that records every call it receives

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use lab_core::{DocumentStore, LabError, LabResult, UpdateCounts};
use mongodb::IndexModel;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	Ping,
	InsertOne(Document),
	InsertMany(Vec<Document>),
	Find(Document),
	UpdateOne(Document, Document),
	UpdateMany(Document, Document),
	DeleteOne(Document),
	DeleteMany(Document),
	CreateIndex { keys: Document, unique: Option<bool> },
	ListIndexes,
	Aggregate(Vec<Document>),
	DropCollection,
	Close,
}

/// Answers reads with a fixed set of documents and writes with scripted
/// counts. Unscripted counts default to zero.
#[derive(Default)]
pub struct RecordingStore {
	calls: Mutex<Vec<Call>>,
	inserted_ids: Mutex<Vec<Bson>>,
	documents: Vec<Document>,
	indexes: Option<Vec<Document>>,
	modified: Mutex<VecDeque<u64>>,
	deleted: Mutex<VecDeque<u64>>,
	fail_on: Option<&'static str>,
}

impl RecordingStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Documents returned by `find` and `aggregate`.
	pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
		self.documents = documents;
		self
	}

	/// Index descriptions returned by `list_indexes`. Defaults to the `_id_` index.
	pub fn with_indexes(mut self, indexes: Vec<Document>) -> Self {
		self.indexes = Some(indexes);
		self
	}

	/// Modified counts handed out by successive update calls.
	pub fn with_modified(self, counts: Vec<u64>) -> Self {
		*lock(&self.modified) = counts.into();
		self
	}

	/// Deleted counts handed out by successive delete calls.
	pub fn with_deleted(self, counts: Vec<u64>) -> Self {
		*lock(&self.deleted) = counts.into();
		self
	}

	/// Fail every call to the named method after recording it.
	pub fn fail_on(mut self, method: &'static str) -> Self {
		self.fail_on = Some(method);
		self
	}

	pub fn calls(&self) -> Vec<Call> {
		lock(&self.calls).clone()
	}

	/// Ids handed out by `insert_one`, in call order.
	pub fn inserted_ids(&self) -> Vec<Bson> {
		lock(&self.inserted_ids).clone()
	}

	fn record(&self, method: &str, call: Call) -> LabResult<()> {
		lock(&self.calls).push(call);
		if self.fail_on == Some(method) {
			return Err(LabError::Connection(format!("scripted failure in {}", method)));
		}
		Ok(())
	}

	fn next_modified(&self) -> UpdateCounts {
		let modified = lock(&self.modified).pop_front().unwrap_or(0);
		UpdateCounts {
			matched: modified,
			modified,
		}
	}

	fn next_deleted(&self) -> u64 {
		lock(&self.deleted).pop_front().unwrap_or(0)
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl DocumentStore for RecordingStore {
	async fn ping(&self) -> LabResult<()> {
		self.record("ping", Call::Ping)
	}

	async fn insert_one(&self, doc: Document) -> LabResult<Bson> {
		self.record("insert_one", Call::InsertOne(doc))?;
		let id = Bson::ObjectId(ObjectId::new());
		lock(&self.inserted_ids).push(id.clone());
		Ok(id)
	}

	async fn insert_many(&self, docs: Vec<Document>) -> LabResult<usize> {
		let count = docs.len();
		self.record("insert_many", Call::InsertMany(docs))?;
		Ok(count)
	}

	async fn find(&self, filter: Document) -> LabResult<Vec<Document>> {
		self.record("find", Call::Find(filter))?;
		Ok(self.documents.clone())
	}

	async fn update_one(&self, filter: Document, update: Document) -> LabResult<UpdateCounts> {
		self.record("update_one", Call::UpdateOne(filter, update))?;
		Ok(self.next_modified())
	}

	async fn update_many(&self, filter: Document, update: Document) -> LabResult<UpdateCounts> {
		self.record("update_many", Call::UpdateMany(filter, update))?;
		Ok(self.next_modified())
	}

	async fn delete_one(&self, filter: Document) -> LabResult<u64> {
		self.record("delete_one", Call::DeleteOne(filter))?;
		Ok(self.next_deleted())
	}

	async fn delete_many(&self, filter: Document) -> LabResult<u64> {
		self.record("delete_many", Call::DeleteMany(filter))?;
		Ok(self.next_deleted())
	}

	async fn create_index(&self, index: IndexModel) -> LabResult<String> {
		let unique = index.options.as_ref().and_then(|o| o.unique);
		let name = index
			.keys
			.iter()
			.map(|(k, v)| format!("{}_{}", k, v))
			.collect::<Vec<_>>()
			.join("_");
		self.record(
			"create_index",
			Call::CreateIndex {
				keys: index.keys,
				unique,
			},
		)?;
		Ok(name)
	}

	async fn list_indexes(&self) -> LabResult<Vec<Document>> {
		self.record("list_indexes", Call::ListIndexes)?;
		Ok(self
			.indexes
			.clone()
			.unwrap_or_else(|| vec![doc! { "v": 2, "key": { "_id": 1 }, "name": "_id_" }]))
	}

	async fn aggregate(&self, pipeline: Vec<Document>) -> LabResult<Vec<Document>> {
		self.record("aggregate", Call::Aggregate(pipeline))?;
		Ok(self.documents.clone())
	}

	async fn drop_collection(&self) -> LabResult<()> {
		self.record("drop_collection", Call::DropCollection)
	}

	async fn close(&self) -> LabResult<()> {
		self.record("close", Call::Close)
	}
}
