//! Host-supplied object identity: the pod/node lister interfaces and their object shapes.

// std
use std::result::Result as StdResult;
// crates.io
use async_trait::async_trait;
// self
use crate::error::BoxError;

/// Coarse pod lifecycle phase, mirroring `k8s_openapi::api::core::v1::PodStatus::phase`.
///
/// Only `Running` pods are eligible to have their metrics served; every other phase is treated as
/// "not currently producing metrics" by the read adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PodPhase {
	/// Accepted by the scheduler but not yet running.
	Pending,
	/// Bound to a node and running.
	Running,
	/// Every container terminated successfully.
	Succeeded,
	/// At least one container terminated with a failure.
	Failed,
	/// Phase could not be determined.
	Unknown,
}

/// The identity fields [`crate::read::PodReadAdapter`] needs, modeled on
/// `k8s_openapi::api::core::v1::Pod`.
#[derive(Clone, Debug)]
pub struct PodObject {
	/// Pod name.
	pub name: String,
	/// Namespace the pod belongs to.
	pub namespace: String,
	/// Current lifecycle phase.
	pub phase: PodPhase,
	/// Labels attached to the pod, used for label-selector filtering upstream in the lister.
	pub labels: std::collections::BTreeMap<String, String>,
}

/// The identity fields [`crate::read::NodeReadAdapter`] needs, modeled on
/// `k8s_openapi::api::core::v1::Node`.
#[derive(Clone, Debug)]
pub struct NodeObject {
	/// Node name.
	pub name: String,
	/// Labels attached to the node.
	pub labels: std::collections::BTreeMap<String, String>,
}

/// Authoritative source of pod identity and phase, implemented by the host's cluster informer.
///
/// Errors are opaque (`BoxError`): the lister's own error type is host-defined, and the read
/// adapter only ever re-wraps it as `Error::ListerFailure`.
#[async_trait]
pub trait PodLister: Send + Sync {
	/// All pods in `namespace` matching `label_selector` (an opaque, lister-defined selector
	/// string; `None` matches every pod in the namespace).
	async fn list(
		&self,
		namespace: &str,
		label_selector: Option<&str>,
	) -> StdResult<Vec<PodObject>, BoxError>;

	/// A single pod by name, or `None` if it does not exist.
	async fn get(&self, namespace: &str, name: &str) -> StdResult<Option<PodObject>, BoxError>;
}

/// Authoritative source of node identity, implemented by the host's cluster informer.
#[async_trait]
pub trait NodeLister: Send + Sync {
	/// All nodes matching `label_selector` (`None` matches every node).
	async fn list(&self, label_selector: Option<&str>) -> StdResult<Vec<NodeObject>, BoxError>;

	/// A single node by name, or `None` if it does not exist.
	async fn get(&self, name: &str) -> StdResult<Option<NodeObject>, BoxError>;
}
