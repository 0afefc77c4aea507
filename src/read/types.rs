//! Shaped output types the read adapters hand back to a host's API surface.

// self
use crate::{_prelude::*, model::ResourceList};

/// Minimal object metadata attached to a shaped metrics entry.
///
/// Mirrors the subset of `k8s_openapi`'s `ObjectMeta` the external HTTP surface serializes;
/// `creation_timestamp` is filled by the read adapter at shaping time (§4.3), not sourced from the
/// lister.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMeta {
	/// Object name.
	pub name: String,
	/// Namespace, absent for cluster-scoped objects such as nodes.
	pub namespace: Option<String>,
	/// Wall-clock instant the read adapter shaped this entry.
	pub creation_timestamp: DateTime<Utc>,
}

/// One container's resource usage within a shaped [`PodMetrics`] entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerUsage {
	/// Container name.
	pub name: String,
	/// CPU/memory readout for this container.
	pub resources: ResourceList,
}

/// A single pod's shaped metrics, as returned by [`crate::read::PodReadAdapter`].
#[derive(Clone, Debug, PartialEq)]
pub struct PodMetrics {
	/// Identity of the pod this entry describes.
	pub object_meta: ObjectMeta,
	/// Earliest container timestamp in the pod (§3 invariant 4).
	pub timestamp: DateTime<Utc>,
	/// The collection window the usage was computed over.
	pub window: Duration,
	/// Per-container usage, in the pod's original container order.
	pub containers: Vec<ContainerUsage>,
}

/// A single node's shaped metrics, as returned by [`crate::read::NodeReadAdapter`].
#[derive(Clone, Debug, PartialEq)]
pub struct NodeMetrics {
	/// Identity of the node this entry describes.
	pub object_meta: ObjectMeta,
	/// Timestamp of the node's sampled usage.
	pub timestamp: DateTime<Utc>,
	/// The collection window the usage was computed over.
	pub window: Duration,
	/// The node's CPU/memory readout.
	pub usage: ResourceList,
}
