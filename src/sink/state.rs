//! Snapshot construction and the validate-then-swap discipline.

// std
use std::collections::HashMap;
// self
use crate::{
	error::{Error, Result},
	model::{MetricsBatch, NodeMetricsPoint, PodMetricsPoint},
};

/// Unique key identifying a pod within a [`Snapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PodKey {
	/// Pod namespace.
	pub namespace: String,
	/// Pod name.
	pub name: String,
}
impl PodKey {
	/// Build a key from borrowed parts.
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self { namespace: namespace.into(), name: name.into() }
	}
}

/// The live `{nodes, pods}` mapping served to readers.
///
/// Built once per successful [`crate::sink::SinkProvider::receive`] call and swapped in wholesale;
/// see [`Snapshot::build`] for the validation that makes duplicate rejection all-or-nothing.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
	pub(crate) nodes: HashMap<String, NodeMetricsPoint>,
	pub(crate) pods: HashMap<PodKey, PodMetricsPoint>,
}
impl Snapshot {
	/// Validate a batch and build the snapshot that would replace the current one.
	///
	/// Fails with [`Error::DuplicateNodeKey`] or [`Error::DuplicatePodKey`] on the first
	/// duplicate found; the caller must not have published anything from a failed build, which is
	/// guaranteed here since no shared state is touched until the `Ok` value is returned.
	pub fn build(batch: MetricsBatch) -> Result<Self> {
		let mut nodes = HashMap::with_capacity(batch.nodes.len());

		for node in batch.nodes {
			let name = node.name.clone();

			if nodes.insert(name.clone(), node).is_some() {
				return Err(Error::DuplicateNodeKey(name));
			}
		}

		let mut pods = HashMap::with_capacity(batch.pods.len());

		for pod in batch.pods {
			let key = PodKey::new(pod.namespace.clone(), pod.name.clone());

			if pods.insert(key.clone(), pod).is_some() {
				return Err(Error::DuplicatePodKey { namespace: key.namespace, name: key.name });
			}
		}

		Ok(Self { nodes, pods })
	}
}
