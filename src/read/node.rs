//! Translates node identity queries into sink lookups and shapes the result.

// self
use crate::{
	_prelude::*,
	error::{Error, NotFoundKind, Result},
	read::{
		lister::NodeLister,
		types::{NodeMetrics, ObjectMeta},
	},
	sink::SinkProvider,
};

/// Turns "list/get node metrics" calls into [`SinkProvider`] lookups.
///
/// Simpler than [`crate::read::PodReadAdapter`]: nodes have no phase to filter on, and carry one
/// resource list rather than a per-container breakdown.
pub struct NodeReadAdapter {
	lister: Arc<dyn NodeLister>,
	sink: SinkProvider,
}
impl NodeReadAdapter {
	/// Build an adapter over the given lister and sink.
	pub fn new(lister: Arc<dyn NodeLister>, sink: SinkProvider) -> Self {
		Self { lister, sink }
	}

	/// List shaped metrics for every node matching `label_selector`.
	///
	/// Nodes with no metrics in the current snapshot are silently excluded.
	#[tracing::instrument(skip(self))]
	pub async fn list(&self, label_selector: Option<&str>) -> Result<Vec<NodeMetrics>> {
		let nodes = self.lister.list(label_selector).await.map_err(Error::ListerFailure)?;
		let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
		let (timestamps, metrics) = self.sink.get_node_metrics(&names).await;
		let shaped_at = Utc::now();
		let mut out = Vec::with_capacity(nodes.len());

		for ((node, timestamp), usage) in nodes.into_iter().zip(timestamps).zip(metrics) {
			if usage.cpu.is_none() && usage.memory.is_none() {
				continue;
			}

			out.push(NodeMetrics {
				object_meta: ObjectMeta { name: node.name, namespace: None, creation_timestamp: shaped_at },
				timestamp: timestamp.timestamp,
				window: timestamp.window,
				usage,
			});
		}

		Ok(out)
	}

	/// Shaped metrics for a single node.
	///
	/// Fails with `Error::NotFound(NotFoundKind::Node)` when the lister has no such node, or
	/// `Error::NotFound(NotFoundKind::NodeMetrics)` when the node exists but has no metrics in the
	/// current snapshot.
	#[tracing::instrument(skip(self))]
	pub async fn get(&self, name: &str) -> Result<NodeMetrics> {
		let node = self
			.lister
			.get(name)
			.await
			.map_err(Error::ListerFailure)?
			.ok_or_else(|| Error::NotFound(NotFoundKind::Node { name: name.into() }))?;
		let (timestamps, metrics) = self.sink.get_node_metrics(&[name]).await;
		let usage = metrics.into_iter().next().unwrap_or_default();

		if usage.cpu.is_none() && usage.memory.is_none() {
			return Err(Error::NotFound(NotFoundKind::NodeMetrics { name: name.into() }));
		}

		let timestamp = timestamps.into_iter().next().expect("one key was queried");

		Ok(NodeMetrics {
			object_meta: ObjectMeta { name: node.name, namespace: None, creation_timestamp: Utc::now() },
			timestamp: timestamp.timestamp,
			window: timestamp.window,
			usage,
		})
	}
}
