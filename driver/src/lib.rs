//! Runs the document database walkthrough against a `DocumentStore`.
//!
//! ```no_run
//! use lab_core::Config;
//! use lab_driver::{Lab, MongoStore};
//!
//! #[tokio::main]
//! async fn main() -> lab_core::LabResult<()> {
//!     let store = MongoStore::connect(&Config::default()).await?;
//!     let lab = Lab::new(store);
//!     let outcome = lab.run_sequence(|report| println!("{:?}", report)).await;
//!     lab.close().await?;
//!     outcome
//! }
//! ```

mod lab;
mod mongo;
mod sequence;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use lab::{Lab, ReportEntry, StepReport};
pub use mongo::MongoStore;
pub use sequence::{DEMO_SEQUENCE, Step};
