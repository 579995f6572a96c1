use lab_core::query;
use lab_core::{DocumentStore, LabResult, sample_people};
use mongodb::bson::{Bson, Document};
use tracing::{debug, info, warn};

use crate::sequence::{DEMO_SEQUENCE, Step};

/// One piece of output produced by a step, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEntry {
	Heading(String),
	Message(String),
	Documents(Vec<Document>),
	Count { label: String, count: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
	pub step: Step,
	pub entries: Vec<ReportEntry>,
}

impl StepReport {
	fn new(step: Step) -> Self {
		Self {
			step,
			entries: Vec::new(),
		}
	}

	fn heading(&mut self, text: &str) {
		self.entries.push(ReportEntry::Heading(text.to_string()));
	}

	fn message(&mut self, text: impl Into<String>) {
		self.entries.push(ReportEntry::Message(text.into()));
	}

	fn documents(&mut self, docs: Vec<Document>) {
		self.entries.push(ReportEntry::Documents(docs));
	}

	fn count(&mut self, label: &str, count: u64) {
		self.entries.push(ReportEntry::Count {
			label: label.to_string(),
			count,
		});
	}

	/// Every count reported by the step, in order.
	pub fn counts(&self) -> Vec<u64> {
		self.entries
			.iter()
			.filter_map(|entry| match entry {
				ReportEntry::Count { count, .. } => Some(*count),
				_ => None,
			})
			.collect()
	}
}

/// The document as stored: server-side `_id` first, then the inserted fields.
fn with_id(id: Bson, doc: Document) -> Document {
	let mut stored = Document::new();
	stored.insert("_id", id);
	for (key, value) in doc {
		stored.insert(key, value);
	}
	stored
}

/// Runs the walkthrough operations against a single collection.
pub struct Lab<S: DocumentStore> {
	store: S,
}

impl<S: DocumentStore> Lab<S> {
	pub fn new(store: S) -> Self {
		Self { store }
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub async fn create_documents(&self) -> LabResult<StepReport> {
		let mut report = StepReport::new(Step::Create);
		let [first, second, third] = sample_people();

		let doc = first.to_document()?;
		let id = self.store.insert_one(doc.clone()).await?;
		report.message("Document 1 inserted:");
		report.documents(vec![with_id(id, doc)]);

		let inserted = self
			.store
			.insert_many(vec![second.to_document()?, third.to_document()?])
			.await?;
		debug!(inserted, "insert_many finished");
		report.message("Documents 2 and 3 inserted");

		Ok(report)
	}

	pub async fn read_documents(&self) -> LabResult<StepReport> {
		let mut report = StepReport::new(Step::Read);

		report.heading("All documents:");
		report.documents(self.store.find(query::all()).await?);

		report.heading("People with salary > 6000:");
		report.documents(self.store.find(query::salary_above(6000)).await?);

		Ok(report)
	}

	pub async fn update_documents(&self) -> LabResult<StepReport> {
		let mut report = StepReport::new(Step::Update);

		let single = self
			.store
			.update_one(query::name_is("João Silva"), query::set_salary(9000.00))
			.await?;
		report.count("Documents modified", single.modified);

		let raise = self
			.store
			.update_many(query::age_above(25), query::raise_salary(500.00))
			.await?;
		report.count("Documents modified (salary raise)", raise.modified);

		Ok(report)
	}

	pub async fn delete_documents(&self) -> LabResult<StepReport> {
		let mut report = StepReport::new(Step::Delete);

		let single = self.store.delete_one(query::name_is("Carlos Souza")).await?;
		report.count("Documents deleted", single);

		let low_salary = self.store.delete_many(query::salary_below(7000)).await?;
		report.count("Documents deleted (salary < 7000)", low_salary);

		Ok(report)
	}

	pub async fn create_indexes(&self) -> LabResult<StepReport> {
		let mut report = StepReport::new(Step::CreateIndexes);

		let name = self.store.create_index(query::unique_name_index()).await?;
		debug!(index = %name, "unique index ready");
		report.message("Unique index created on field 'nome'");

		let name = self
			.store
			.create_index(query::profession_salary_index())
			.await?;
		debug!(index = %name, "compound index ready");
		report.message("Compound index created on 'profissao' and 'salario'");

		report.heading("Existing indexes:");
		report.documents(self.store.list_indexes().await?);

		Ok(report)
	}

	pub async fn aggregation_examples(&self) -> LabResult<StepReport> {
		let mut report = StepReport::new(Step::Aggregate);

		report.heading("Average salary by profession:");
		report.documents(
			self.store
				.aggregate(query::salary_stats_by_profession())
				.await?,
		);

		report.heading("Headcount by city:");
		report.documents(self.store.aggregate(query::headcount_by_city()).await?);

		Ok(report)
	}

	pub async fn reset(&self) -> LabResult<()> {
		self.store.drop_collection().await
	}

	pub async fn run_step(&self, step: Step) -> LabResult<StepReport> {
		match step {
			Step::Create => self.create_documents().await,
			Step::Read => self.read_documents().await,
			Step::Update => self.update_documents().await,
			Step::Delete => self.delete_documents().await,
			Step::CreateIndexes => self.create_indexes().await,
			Step::Aggregate => self.aggregation_examples().await,
		}
	}

	/// Run every step of the demo in order, handing each report to `on_report`
	/// as soon as it is ready. Stops at the first failing step.
	pub async fn run_sequence<F>(&self, mut on_report: F) -> LabResult<()>
	where
		F: FnMut(&StepReport),
	{
		for step in DEMO_SEQUENCE {
			info!(%step, "Running step");
			let report = self.run_step(step).await?;
			on_report(&report);
		}
		Ok(())
	}

	pub async fn close(&self) -> LabResult<()> {
		if let Err(e) = self.store.close().await {
			warn!(error = %e, "Failed to close store");
			return Err(e);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{Call, RecordingStore};
	use lab_core::LabError;
	use mongodb::bson::doc;
	use pretty_assertions::assert_eq;

	#[tokio::test]
	async fn test_create_documents_inserts_one_then_many() {
		let lab = Lab::new(RecordingStore::new());
		let report = lab.create_documents().await.unwrap();

		let calls = lab.store().calls();
		assert_eq!(calls.len(), 2);
		match &calls[0] {
			Call::InsertOne(doc) => assert_eq!(doc.get_str("nome").unwrap(), "João Silva"),
			other => panic!("Expected insert_one, got {:?}", other),
		}
		match &calls[1] {
			Call::InsertMany(docs) => {
				let names: Vec<&str> = docs.iter().map(|d| d.get_str("nome").unwrap()).collect();
				assert_eq!(names, vec!["Maria Oliveira", "Carlos Souza"]);
			}
			other => panic!("Expected insert_many, got {:?}", other),
		}

		assert_eq!(report.step, Step::Create);
		assert_eq!(report.entries.len(), 3);
	}

	#[tokio::test]
	async fn test_create_report_shows_assigned_id() {
		let lab = Lab::new(RecordingStore::new());
		let report = lab.create_documents().await.unwrap();

		let ids = lab.store().inserted_ids();
		assert_eq!(ids.len(), 1);

		let docs = match &report.entries[1] {
			ReportEntry::Documents(docs) => docs,
			other => panic!("Expected documents, got {:?}", other),
		};
		assert_eq!(docs.len(), 1);
		assert_eq!(docs[0].get("_id"), Some(&ids[0]));
		assert_eq!(docs[0].keys().next().map(String::as_str), Some("_id"));
		assert_eq!(docs[0].get_str("nome").unwrap(), "João Silva");

		match &lab.store().calls()[0] {
			Call::InsertOne(sent) => assert!(!sent.contains_key("_id")),
			other => panic!("Expected insert_one, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_read_documents_filters() {
		let store = RecordingStore::new().with_documents(vec![doc! { "nome": "Maria Oliveira" }]);
		let lab = Lab::new(store);
		let report = lab.read_documents().await.unwrap();

		assert_eq!(
			lab.store().calls(),
			vec![
				Call::Find(doc! {}),
				Call::Find(doc! { "salario": { "$gt": 6000 } }),
			]
		);
		assert_eq!(
			report.entries[0],
			ReportEntry::Heading("All documents:".to_string())
		);
		assert_eq!(
			report.entries[1],
			ReportEntry::Documents(vec![doc! { "nome": "Maria Oliveira" }])
		);
	}

	#[tokio::test]
	async fn test_update_documents_reports_modified_counts() {
		let store = RecordingStore::new().with_modified(vec![1, 2]);
		let lab = Lab::new(store);
		let report = lab.update_documents().await.unwrap();

		assert_eq!(
			lab.store().calls(),
			vec![
				Call::UpdateOne(
					doc! { "nome": "João Silva" },
					doc! { "$set": { "salario": 9000.0 } }
				),
				Call::UpdateMany(
					doc! { "idade": { "$gt": 25 } },
					doc! { "$inc": { "salario": 500.0 } }
				),
			]
		);
		assert_eq!(report.counts(), vec![1, 2]);
	}

	#[tokio::test]
	async fn test_delete_documents_reports_deleted_counts() {
		let store = RecordingStore::new().with_deleted(vec![1, 0]);
		let lab = Lab::new(store);
		let report = lab.delete_documents().await.unwrap();

		assert_eq!(
			lab.store().calls(),
			vec![
				Call::DeleteOne(doc! { "nome": "Carlos Souza" }),
				Call::DeleteMany(doc! { "salario": { "$lt": 7000 } }),
			]
		);
		assert_eq!(report.counts(), vec![1, 0]);
	}

	#[tokio::test]
	async fn test_create_indexes_then_lists() {
		let lab = Lab::new(RecordingStore::new());
		lab.create_indexes().await.unwrap();

		let calls = lab.store().calls();
		assert_eq!(calls.len(), 3);
		assert_eq!(
			calls[0],
			Call::CreateIndex {
				keys: doc! { "nome": 1 },
				unique: Some(true),
			}
		);
		assert_eq!(
			calls[1],
			Call::CreateIndex {
				keys: doc! { "profissao": 1, "salario": -1 },
				unique: None,
			}
		);
		assert_eq!(calls[2], Call::ListIndexes);
	}

	#[tokio::test]
	async fn test_index_listing_is_reported_unchanged() {
		let listing = vec![
			doc! { "v": 2, "key": { "_id": 1 }, "name": "_id_", "ns": "lab_mongodb.pessoas" },
			doc! { "v": 2, "unique": true, "key": { "nome": 1 }, "name": "nome_1" },
		];
		let lab = Lab::new(RecordingStore::new().with_indexes(listing.clone()));
		let report = lab.create_indexes().await.unwrap();

		assert_eq!(
			report.entries.last(),
			Some(&ReportEntry::Documents(listing.clone()))
		);
		if let Some(ReportEntry::Documents(docs)) = report.entries.last() {
			let keys: Vec<&str> = docs[0].keys().map(String::as_str).collect();
			assert_eq!(keys, vec!["v", "key", "name", "ns"]);
		}
	}

	#[tokio::test]
	async fn test_aggregation_examples_runs_both_pipelines() {
		let lab = Lab::new(RecordingStore::new());
		lab.aggregation_examples().await.unwrap();

		assert_eq!(
			lab.store().calls(),
			vec![
				Call::Aggregate(query::salary_stats_by_profession()),
				Call::Aggregate(query::headcount_by_city()),
			]
		);
	}

	#[tokio::test]
	async fn test_run_sequence_reports_every_step() {
		let lab = Lab::new(RecordingStore::new());
		let mut steps = Vec::new();

		lab.run_sequence(|report| steps.push(report.step)).await.unwrap();

		assert_eq!(steps, DEMO_SEQUENCE.to_vec());
		assert!(!lab.store().calls().contains(&Call::Close));
	}

	#[tokio::test]
	async fn test_run_sequence_stops_at_first_error() {
		let store = RecordingStore::new().fail_on("update_one");
		let lab = Lab::new(store);
		let mut steps = Vec::new();

		let err = lab
			.run_sequence(|report| steps.push(report.step))
			.await
			.unwrap_err();

		assert!(matches!(err, LabError::Connection(_)));
		assert_eq!(steps, vec![Step::Create, Step::Read]);

		let calls = lab.store().calls();
		assert!(matches!(calls.last(), Some(Call::UpdateOne(..))));
		assert!(!calls.iter().any(|c| matches!(c, Call::DeleteOne(_))));
	}

	#[tokio::test]
	async fn test_reset_and_close_delegate() {
		let lab = Lab::new(RecordingStore::new());
		lab.reset().await.unwrap();
		lab.close().await.unwrap();

		assert_eq!(lab.store().calls(), vec![Call::DropCollection, Call::Close]);
	}
}
