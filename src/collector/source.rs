//! Host-supplied collaborators: a scrape target and the registry of current targets.

// crates.io
use async_trait::async_trait;
// self
use crate::{
	_prelude::*,
	error::{Error, Result},
	model::MetricsBatch,
};

/// One source's contribution to a scrape tick: whatever batch it managed to produce, plus an
/// optional failure.
///
/// The two are independent: a source that successfully scraped nodes but failed midway through
/// pods can report both the partial `batch` and the `error` that cut it short. `error` being
/// `Some` does not imply `batch` is empty, and `batch` being non-empty does not imply `error` is
/// `None` — see spec §4.1 step 4 ("partial results are kept" regardless of a concurrent failure).
#[derive(Debug)]
pub struct PartialOutcome {
	/// Whatever nodes/pods this source managed to produce before `error` (if any) occurred.
	pub batch: MetricsBatch,
	/// The failure that ended collection early, if any.
	pub error: Option<Error>,
}
impl PartialOutcome {
	/// A fully successful outcome: the whole batch, no error.
	pub fn complete(batch: MetricsBatch) -> Self {
		Self { batch, error: None }
	}

	/// An outcome carrying both a partial batch and the error that cut collection short.
	pub fn partial(batch: MetricsBatch, error: Error) -> Self {
		Self { batch, error: Some(error) }
	}

	/// An outright failure: no data at all.
	pub fn failed(error: Error) -> Self {
		Self { batch: MetricsBatch::empty(), error: Some(error) }
	}
}
impl From<MetricsBatch> for PartialOutcome {
	fn from(batch: MetricsBatch) -> Self {
		Self::complete(batch)
	}
}
impl From<Error> for PartialOutcome {
	fn from(error: Error) -> Self {
		Self::failed(error)
	}
}

/// One scrape target — typically a single cluster node's summary endpoint.
///
/// Implemented by the host; the core only ever calls [`MetricSource::collect`] with a deadline it
/// derives from the configured per-scrape timeout and the source's stagger delay.
#[async_trait]
pub trait MetricSource: Send + Sync {
	/// Stable name used to tag metrics, logs, and aggregated errors.
	fn name(&self) -> &str;

	/// Produce this source's contribution to the next batch within `timeout`.
	///
	/// Returns a [`PartialOutcome`] rather than a plain `Result`: a source can fail partway
	/// through and still hand back whatever it collected up to that point, which the
	/// [`crate::collector::SourceManager`] keeps regardless of the accompanying error.
	async fn collect(&self, timeout: Duration) -> PartialOutcome;
}

/// Enumerates the sources that currently exist.
///
/// Implemented by the host, typically backed by a cluster node/pod lister. A provider is allowed
/// to fail outright or to return a partial list alongside an error (e.g. the lister paginated
/// partway before erroring); [`crate::collector::SourceManager::collect`] uses whatever was
/// returned either way.
#[async_trait]
pub trait MetricSourceProvider: Send + Sync {
	/// The current set of scrape targets.
	async fn metric_sources(&self) -> Result<Vec<Arc<dyn MetricSource>>>;
}
