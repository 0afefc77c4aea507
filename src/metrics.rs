//! Metrics helpers: an injectable per-scrape accumulator plus free-function counters for reads.

// std
use std::sync::{
	OnceLock,
	atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};
// crates.io
use metrics::Label;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use smallvec::SmallVec;
// self
use crate::_prelude::*;

type LabelSet = SmallVec<[Label; 2]>;

const METRIC_LAST_SCRAPE_TIMESTAMP: &str = "cluster_metrics_last_scrape_timestamp";
const METRIC_SCRAPE_DURATION: &str = "cluster_metrics_scrape_duration_microseconds";
const METRIC_SINK_REQUESTS_TOTAL: &str = "cluster_metrics_sink_requests_total";
const METRIC_SINK_HITS_TOTAL: &str = "cluster_metrics_sink_hits_total";

/// Shared Prometheus handle installed by [`install_default_exporter`].
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Per-scrape telemetry, injected into a [`crate::collector::SourceManager`].
///
/// Every `collect()` attempt — successful or not — records the source's last-scrape gauge and
/// duration histogram; the running totals below back a lightweight status snapshot without going
/// through the global recorder.
#[derive(Debug, Default)]
pub struct ScrapeMetrics {
	scrapes_total: AtomicU64,
}
impl ScrapeMetrics {
	/// Create a new, empty accumulator.
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Record one source's scrape attempt, regardless of whether it succeeded.
	pub fn record_scrape(&self, source: &str, duration: Duration) {
		self.scrapes_total.fetch_add(1, Ordering::Relaxed);

		let labels = source_labels(source);
		let unix_seconds = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs_f64();

		metrics::gauge!(METRIC_LAST_SCRAPE_TIMESTAMP, labels.iter()).set(unix_seconds);
		metrics::histogram!(METRIC_SCRAPE_DURATION, labels.iter()).record(duration.as_micros() as f64);
	}

	/// Total number of scrape attempts recorded since construction.
	pub fn scrapes_total(&self) -> u64 {
		self.scrapes_total.load(Ordering::Relaxed)
	}
}

/// Install the default Prometheus recorder backed by `metrics`.
///
/// Multiple invocations are safe; subsequent calls become no-ops once the recorder is installed.
pub fn install_default_exporter() -> crate::error::Result<()> {
	if PROMETHEUS_HANDLE.get().is_some() {
		return Ok(());
	}

	let handle = PrometheusBuilder::new().install_recorder().map_err(|err| crate::error::Error::Validation {
		field: "prometheus_exporter",
		reason: err.to_string(),
	})?;
	let _ = PROMETHEUS_HANDLE.set(handle);

	Ok(())
}

/// Access the global Prometheus exporter handle when installed.
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
	PROMETHEUS_HANDLE.get()
}

/// Record one sink lookup outcome for a resource kind (`"node"` or `"pod"`).
///
/// Mirrors the collection path's per-source observability: every lookup counts toward the total,
/// and a present key additionally counts as a hit.
pub fn record_sink_lookup(resource_kind: &'static str, hit: bool) {
	let labels = resource_labels(resource_kind);

	metrics::counter!(METRIC_SINK_REQUESTS_TOTAL, labels.iter()).increment(1);

	if hit {
		metrics::counter!(METRIC_SINK_HITS_TOTAL, labels.iter()).increment(1);
	}
}

fn source_labels(source: &str) -> LabelSet {
	let mut labels = LabelSet::with_capacity(1);

	labels.push(Label::new("source", source.to_owned()));

	labels
}

fn resource_labels(resource_kind: &'static str) -> LabelSet {
	let mut labels = LabelSet::with_capacity(1);

	labels.push(Label::new("resource", resource_kind));

	labels
}
