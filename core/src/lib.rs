//! mongolab - shared types for the document database walkthrough

pub mod error;
pub mod model;
pub mod query;
pub mod store;

pub use error::{LabError, LabResult};
pub use model::{Person, sample_people};
pub use store::{DocumentStore, UpdateCounts};

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "lab_mongodb";
pub const DEFAULT_COLLECTION: &str = "pessoas";

/// Connection and target configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Drop the collection before running the sequence
    pub reset: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            reset: false,
        }
    }
}

impl Config {
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Reject blank values before they reach the driver.
    pub fn validate(&self) -> LabResult<()> {
        let fields = [
            ("uri", &self.uri),
            ("database", &self.database),
            ("collection", &self.collection),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(LabError::InvalidInput(format!("{} must not be empty", field)));
            }
        }

        Ok(())
    }
}
