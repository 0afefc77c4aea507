//! Concurrent, staggered fan-out across every known scrape source.

// std
use std::{cell::RefCell, cmp::min};
// crates.io
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
// self
use crate::{
	_prelude::*,
	collector::source::{MetricSourceProvider, PartialOutcome},
	error::{AggregateError, Error, Result},
	model::MetricsBatch,
};
#[cfg(feature = "metrics")] use crate::metrics::ScrapeMetrics;

thread_local! {
	static STAGGER_RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_rng(&mut rand::rng()));
}

/// Per-source stagger budget: `8ms` per known source, capped at this value.
pub const MAX_STAGGER: Duration = Duration::from_millis(4_000);

/// Milliseconds of stagger contributed by each additional source, before the [`MAX_STAGGER`] cap.
const STAGGER_PER_SOURCE_MS: u64 = 8;

/// Validated configuration for a [`SourceManager`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SourceManagerConfig {
	/// Upper bound on one `collect()` call's wall-clock time, including stagger delay.
	pub scrape_timeout: Duration,
}
impl SourceManagerConfig {
	/// Construct a config, eagerly validating it.
	pub fn new(scrape_timeout: Duration) -> Result<Self> {
		let config = Self { scrape_timeout };

		config.validate()?;

		Ok(config)
	}

	/// Reject a non-positive timeout; a zero or negative budget can never complete a scrape.
	pub fn validate(&self) -> Result<()> {
		if self.scrape_timeout.is_zero() {
			return Err(Error::Validation {
				field: "scrape_timeout",
				reason: "must be greater than zero".into(),
			});
		}

		Ok(())
	}
}

/// Fans a scrape out across every source known to a [`MetricSourceProvider`].
///
/// One `collect()` call is a single logical scrape tick: sources are dispatched concurrently with
/// a staggered start to avoid a thundering herd, each bounded by its own shortened deadline, and
/// every per-source failure is aggregated rather than aborting the tick.
pub struct SourceManager {
	provider: Arc<dyn MetricSourceProvider>,
	config: SourceManagerConfig,
	#[cfg(feature = "metrics")]
	metrics: Arc<ScrapeMetrics>,
}
impl SourceManager {
	/// Build a manager over the given provider.
	#[cfg(not(feature = "metrics"))]
	pub fn new(provider: Arc<dyn MetricSourceProvider>, config: SourceManagerConfig) -> Self {
		Self { provider, config }
	}

	/// Build a manager over the given provider, recording observability data through `metrics`.
	#[cfg(feature = "metrics")]
	pub fn new(
		provider: Arc<dyn MetricSourceProvider>,
		config: SourceManagerConfig,
		metrics: Arc<ScrapeMetrics>,
	) -> Self {
		Self { provider, config, metrics }
	}

	/// Run one scrape tick, merging every source's contribution into a single batch.
	///
	/// Never fails outright: a provider-enumeration error or any number of per-source failures are
	/// folded into the returned [`AggregateError`], which is `None` iff nothing failed.
	#[tracing::instrument(skip(self))]
	pub async fn collect(&self) -> (MetricsBatch, Option<AggregateError>) {
		let mut errors = AggregateError::new();
		let sources = match self.provider.metric_sources().await {
			Ok(sources) => sources,
			Err(err) => {
				tracing::warn!(error = %err, "source provider enumeration failed");
				errors.push("<provider>", err);
				Vec::new()
			},
		};
		let stagger = Self::stagger_window(sources.len());
		let mut joins = JoinSet::new();

		for source in sources {
			let deadline = self.config.scrape_timeout;
			#[cfg(feature = "metrics")] let metrics = Arc::clone(&self.metrics);

			// The thread-local RNG is not `Send`; draw the jitter now, before the spawned task.
			let stagger_ms = (stagger.as_millis() as u64).max(1);
			let sleep_for =
				Duration::from_millis(STAGGER_RNG.with(|rng| rng.borrow_mut().random_range(0..stagger_ms)));

			joins.spawn(async move {
				tokio::time::sleep(sleep_for).await;

				let remaining = deadline.saturating_sub(sleep_for);
				let start = tokio::time::Instant::now();
				let outcome = tokio::time::timeout(remaining, source.collect(remaining))
					.await
					.unwrap_or_else(|_| PartialOutcome::failed(Error::Timeout { after: remaining }));
				let elapsed = start.elapsed();

				#[cfg(feature = "metrics")] metrics.record_scrape(source.name(), elapsed);

				(source.name().to_owned(), outcome)
			});
		}

		let mut batch = MetricsBatch::empty();

		while let Some(joined) = joins.join_next().await {
			let (name, outcome) = match joined {
				Ok(pair) => pair,
				Err(join_err) => {
					tracing::error!(error = %join_err, "scrape task panicked");
					errors.push("<unknown>", join_err);
					continue;
				},
			};

			// A source's partial batch is kept even when it also reported an error (spec §4.1).
			batch.extend(outcome.batch);

			if let Some(err) = outcome.error {
				tracing::warn!(source = %name, error = %err, "source scrape failed");
				errors.push(name, err);
			}
		}

		(batch, errors.into_option())
	}

	fn stagger_window(source_count: usize) -> Duration {
		let scaled = Duration::from_millis(STAGGER_PER_SOURCE_MS.saturating_mul(source_count as u64));

		min(scaled, MAX_STAGGER)
	}
}
