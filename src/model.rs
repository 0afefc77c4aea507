//! Shared data types flowing through the scrape → sink → serve pipeline.

// crates.io
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};
// self
use crate::_prelude::*;

/// The collection window baked into every [`TimeInfo`] the sink produces.
///
/// The upstream agent computes CPU as a rate over some interval; that interval is not carried on
/// the wire, so the core treats it as this fixed constant.
pub const COLLECTION_WINDOW: Duration = Duration::from_secs(30);

/// A single CPU/memory sample recorded at a point in time.
///
/// `cpu` is a decimal rate in cores; `memory` is a binary byte count. Both use
/// [`k8s_openapi`]'s `Quantity` newtype so unit semantics travel with the value; the core never
/// performs arithmetic on them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsPoint {
	/// Instant the upstream agent recorded the sample.
	pub timestamp: DateTime<Utc>,
	/// CPU usage rate, in cores.
	pub cpu: Quantity,
	/// Memory usage, in bytes.
	pub memory: Quantity,
}

/// A [`MetricsPoint`] tagged with the node it was sampled from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeMetricsPoint {
	/// Node name.
	pub name: String,
	/// The sampled usage.
	#[serde(flatten)]
	pub point: MetricsPoint,
}

/// A [`MetricsPoint`] tagged with the container it was sampled from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetricsPoint {
	/// Container name, unique within its pod.
	pub name: String,
	/// The sampled usage.
	#[serde(flatten)]
	pub point: MetricsPoint,
}

/// All container samples collected for one pod.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PodMetricsPoint {
	/// Namespace the pod belongs to.
	pub namespace: String,
	/// Pod name, unique within `namespace`.
	pub name: String,
	/// Per-container samples, in the order the source reported them.
	pub containers: Vec<ContainerMetricsPoint>,
}

/// One scrape's worth of samples, merged across every source.
///
/// This is the unit of atomic publication into [`crate::sink::SinkProvider`]: a reader observes
/// either the whole batch or none of it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsBatch {
	/// Node samples contributed by every source.
	pub nodes: Vec<NodeMetricsPoint>,
	/// Pod samples contributed by every source.
	pub pods: Vec<PodMetricsPoint>,
}
impl MetricsBatch {
	/// An empty batch, as returned when every source and the provider enumeration both fail.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Fold another batch's contents into this one, consuming it.
	pub fn extend(&mut self, other: MetricsBatch) {
		self.nodes.extend(other.nodes);
		self.pods.extend(other.pods);
	}
}

/// Timestamp and collection window returned alongside a resource readout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeInfo {
	/// When the underlying sample was recorded (or the Unix epoch for a zero-valued position).
	pub timestamp: DateTime<Utc>,
	/// The collection window the rate was computed over.
	pub window: Duration,
}
impl TimeInfo {
	/// The zero-valued position returned for an unknown key: epoch timestamp, zero window.
	pub fn zero() -> Self {
		Self { timestamp: epoch_zero(), window: Duration::ZERO }
	}

	/// A position carrying the constant [`COLLECTION_WINDOW`].
	pub fn at(timestamp: DateTime<Utc>) -> Self {
		Self { timestamp, window: COLLECTION_WINDOW }
	}
}

/// CPU/memory readout returned by the sink; both fields are `None` for an unknown key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceList {
	/// CPU usage rate, in cores.
	pub cpu: Option<Quantity>,
	/// Memory usage, in bytes.
	pub memory: Option<Quantity>,
}
impl ResourceList {
	/// Build a populated readout from a sampled point.
	pub fn from_point(point: &MetricsPoint) -> Self {
		Self { cpu: Some(point.cpu.clone()), memory: Some(point.memory.clone()) }
	}
}

/// The Unix epoch, used as the "zero" timestamp for missing-key reads.
pub fn epoch_zero() -> DateTime<Utc> {
	DateTime::<Utc>::from_timestamp(0, 0).expect("unix epoch is representable")
}
