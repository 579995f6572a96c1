use std::future::Future;

use lab_core::{DocumentStore, LabError, LabResult};
use lab_driver::{Lab, StepReport};
use tracing::{info, warn};

/// Result of the sequence and of the close that always follows it
#[derive(Debug)]
pub struct SessionOutcome {
	pub sequence: LabResult<()>,
	pub close: LabResult<()>,
}

impl SessionOutcome {
	pub fn closed(&self) -> bool {
		self.close.is_ok()
	}

	/// A failure in the sequence wins over a failure while closing.
	pub fn into_result(self) -> LabResult<()> {
		self.sequence.and(self.close)
	}
}

/// Run the demo sequence and always close the store afterwards.
///
/// The sequence is abandoned when `shutdown` resolves first.
pub async fn run_session<S, F, R>(
	lab: &Lab<S>,
	reset: bool,
	shutdown: F,
	on_report: R,
) -> SessionOutcome
where
	S: DocumentStore,
	F: Future<Output = ()>,
	R: FnMut(&StepReport),
{
	let sequence = tokio::select! {
		biased;

		_ = shutdown => {
			warn!("Shutdown requested, abandoning the sequence");
			Err(LabError::Interrupted)
		}
		result = run_steps(lab, reset, on_report) => result,
	};

	let close = lab.close().await;
	info!(success = sequence.is_ok(), closed = close.is_ok(), "Session finished");

	SessionOutcome { sequence, close }
}

async fn run_steps<S, R>(lab: &Lab<S>, reset: bool, on_report: R) -> LabResult<()>
where
	S: DocumentStore,
	R: FnMut(&StepReport),
{
	if reset {
		lab.reset().await?;
	}
	lab.run_sequence(on_report).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use lab_driver::testing::{Call, RecordingStore};
	use lab_driver::{DEMO_SEQUENCE, Step};
	use std::future::pending;

	#[tokio::test]
	async fn test_closes_after_success() {
		let lab = Lab::new(RecordingStore::new());
		let mut steps = Vec::new();

		let outcome = run_session(&lab, false, pending(), |r| steps.push(r.step)).await;
		assert!(outcome.closed());
		outcome.into_result().unwrap();

		assert_eq!(steps, DEMO_SEQUENCE.to_vec());
		assert_eq!(lab.store().calls().last(), Some(&Call::Close));
	}

	#[tokio::test]
	async fn test_closes_after_failure() {
		let lab = Lab::new(RecordingStore::new().fail_on("delete_one"));
		let mut steps = Vec::new();

		let outcome = run_session(&lab, false, pending(), |r| steps.push(r.step)).await;
		assert!(outcome.closed());

		let err = outcome.into_result().unwrap_err();
		assert!(matches!(err, LabError::Connection(_)));
		assert_eq!(steps, vec![Step::Create, Step::Read, Step::Update, Step::Read]);
		assert_eq!(lab.store().calls().last(), Some(&Call::Close));
	}

	#[tokio::test]
	async fn test_sequence_error_wins_over_close_error() {
		let store = RecordingStore::new().fail_on("find");
		let lab = Lab::new(store);

		let outcome = run_session(&lab, false, pending(), |_| {}).await;
		let err = outcome.into_result().unwrap_err();
		assert!(matches!(err, LabError::Connection(ref msg) if msg.contains("find")));
	}

	#[tokio::test]
	async fn test_close_error_reported_after_success() {
		let lab = Lab::new(RecordingStore::new().fail_on("close"));

		let outcome = run_session(&lab, false, pending(), |_| {}).await;
		assert!(outcome.sequence.is_ok());
		assert!(!outcome.closed());

		let err = outcome.into_result().unwrap_err();
		assert!(matches!(err, LabError::Connection(ref msg) if msg.contains("close")));
	}

	#[tokio::test]
	async fn test_reset_drops_before_first_insert() {
		let lab = Lab::new(RecordingStore::new());

		run_session(&lab, true, pending(), |_| {})
			.await
			.into_result()
			.unwrap();

		let calls = lab.store().calls();
		assert_eq!(calls[0], Call::DropCollection);
		assert!(matches!(calls[1], Call::InsertOne(_)));
	}

	#[tokio::test]
	async fn test_shutdown_interrupts_and_still_closes() {
		let lab = Lab::new(RecordingStore::new());
		let mut steps = Vec::new();

		let outcome = run_session(&lab, false, async {}, |r| steps.push(r.step)).await;
		assert!(outcome.closed());

		let err = outcome.into_result().unwrap_err();

		assert!(matches!(err, LabError::Interrupted));
		assert!(steps.is_empty());
		assert_eq!(lab.store().calls(), vec![Call::Close]);
	}
}
