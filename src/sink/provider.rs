//! The sink: holds the most recent scrape batch and answers point lookups.

// crates.io
use tokio::sync::RwLock;
// self
use crate::{
	_prelude::*,
	error::Result,
	model::{MetricsBatch, ResourceList, TimeInfo},
	sink::state::{PodKey, Snapshot},
};

/// Holds the latest scrape snapshot and answers point lookups against it.
///
/// Readers take a shared lock for the duration of a lookup; [`SinkProvider::receive`] validates
/// and builds the replacement [`Snapshot`] *before* ever taking the exclusive lock, so a writer
/// never holds it for longer than a pointer assignment (§4.2 of the design doc).
#[derive(Clone, Debug)]
pub struct SinkProvider {
	inner: Arc<RwLock<Snapshot>>,
}
impl SinkProvider {
	/// Construct an empty provider. Every lookup is a miss until the first `receive`.
	pub fn new() -> Self {
		Self { inner: Arc::new(RwLock::new(Snapshot::default())) }
	}

	/// Validate and atomically install a scrape batch as the live snapshot.
	///
	/// Fails with [`crate::Error::DuplicateNodeKey`] or [`crate::Error::DuplicatePodKey`] when the
	/// batch itself contains a repeated key; on failure the current snapshot is left untouched.
	#[tracing::instrument(skip(self, batch), fields(nodes = batch.nodes.len(), pods = batch.pods.len()))]
	pub async fn receive(&self, batch: MetricsBatch) -> Result<()> {
		let snapshot = Snapshot::build(batch)?;
		let mut guard = self.inner.write().await;

		*guard = snapshot;

		Ok(())
	}

	/// Look up node metrics by name.
	///
	/// Returns one [`TimeInfo`]/[`ResourceList`] pair per requested name, in the same order; an
	/// unknown name yields [`TimeInfo::zero`] and an empty [`ResourceList`] rather than an error.
	pub async fn get_node_metrics<S>(&self, names: &[S]) -> (Vec<TimeInfo>, Vec<ResourceList>)
	where
		S: AsRef<str>,
	{
		let guard = self.inner.read().await;
		let mut timestamps = Vec::with_capacity(names.len());
		let mut metrics = Vec::with_capacity(names.len());

		for name in names {
			match guard.nodes.get(name.as_ref()) {
				Some(node) => {
					#[cfg(feature = "metrics")] crate::metrics::record_sink_lookup("node", true);
					timestamps.push(TimeInfo::at(node.point.timestamp));
					metrics.push(ResourceList::from_point(&node.point));
				},
				None => {
					#[cfg(feature = "metrics")] crate::metrics::record_sink_lookup("node", false);
					timestamps.push(TimeInfo::zero());
					metrics.push(ResourceList::default());
				},
			}
		}

		(timestamps, metrics)
	}

	/// Look up container metrics by `(namespace, name)` pod key.
	///
	/// The pod-level [`TimeInfo::timestamp`] is the earliest container timestamp in that pod; an
	/// unknown key yields [`TimeInfo::zero`] and an empty container list.
	pub async fn get_container_metrics(
		&self,
		keys: &[PodKey],
	) -> (Vec<TimeInfo>, Vec<Vec<ResourceList>>) {
		let guard = self.inner.read().await;
		let mut timestamps = Vec::with_capacity(keys.len());
		let mut metrics = Vec::with_capacity(keys.len());

		for key in keys {
			match guard.pods.get(key) {
				Some(pod) => {
					#[cfg(feature = "metrics")] crate::metrics::record_sink_lookup("pod", true);
					let earliest = pod.containers.iter().map(|c| c.point.timestamp).min();

					timestamps.push(TimeInfo::at(earliest.unwrap_or_else(crate::model::epoch_zero)));
					metrics.push(pod.containers.iter().map(|c| ResourceList::from_point(&c.point)).collect());
				},
				None => {
					#[cfg(feature = "metrics")] crate::metrics::record_sink_lookup("pod", false);
					timestamps.push(TimeInfo::zero());
					metrics.push(Vec::new());
				},
			}
		}

		(timestamps, metrics)
	}
}
impl Default for SinkProvider {
	fn default() -> Self {
		Self::new()
	}
}
