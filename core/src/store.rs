//! The boundary between the walkthrough and the document engine

use async_trait::async_trait;
use mongodb::IndexModel;
use mongodb::bson::{Bson, Document};

use crate::LabResult;

/// Matched/modified counts reported by an update call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

/// One collection on one server.
///
/// Implementations forward each call to the engine without adding behaviour
/// of their own.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn ping(&self) -> LabResult<()>;
    /// Returns the `_id` the document was stored under.
    async fn insert_one(&self, doc: Document) -> LabResult<Bson>;
    async fn insert_many(&self, docs: Vec<Document>) -> LabResult<usize>;
    async fn find(&self, filter: Document) -> LabResult<Vec<Document>>;
    async fn update_one(&self, filter: Document, update: Document) -> LabResult<UpdateCounts>;
    async fn update_many(&self, filter: Document, update: Document) -> LabResult<UpdateCounts>;
    async fn delete_one(&self, filter: Document) -> LabResult<u64>;
    async fn delete_many(&self, filter: Document) -> LabResult<u64>;
    async fn create_index(&self, index: IndexModel) -> LabResult<String>;
    /// Index descriptions exactly as the server reports them.
    async fn list_indexes(&self) -> LabResult<Vec<Document>>;
    async fn aggregate(&self, pipeline: Vec<Document>) -> LabResult<Vec<Document>>;
    async fn drop_collection(&self) -> LabResult<()>;
    async fn close(&self) -> LabResult<()>;
}
