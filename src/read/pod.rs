//! Translates pod identity queries into sink lookups and shapes the result.

// self
use crate::{
	_prelude::*,
	error::{Error, NotFoundKind, Result},
	read::{
		lister::{PodLister, PodPhase},
		types::{ContainerUsage, ObjectMeta, PodMetrics},
	},
	sink::{PodKey, SinkProvider},
};

/// Turns "list/get pod metrics" calls into [`SinkProvider`] lookups, filtered by pod phase.
pub struct PodReadAdapter {
	lister: Arc<dyn PodLister>,
	sink: SinkProvider,
}
impl PodReadAdapter {
	/// Build an adapter over the given lister and sink.
	pub fn new(lister: Arc<dyn PodLister>, sink: SinkProvider) -> Self {
		Self { lister, sink }
	}

	/// List shaped metrics for every `Running` pod in `namespace` matching `label_selector` (and,
	/// if present, `field_selector`).
	///
	/// Non-`Running` pods and pods with no metrics in the current snapshot are silently excluded;
	/// this is the documented filtering behavior, not an error.
	#[tracing::instrument(skip(self))]
	pub async fn list(
		&self,
		namespace: &str,
		label_selector: Option<&str>,
		field_selector: Option<&str>,
	) -> Result<Vec<PodMetrics>> {
		let pods = self.lister.list(namespace, label_selector).await.map_err(Error::ListerFailure)?;
		let predicate = field_selector.map(FieldSelector::parse);
		let filtered: Vec<_> =
			pods.into_iter().filter(|pod| predicate.as_ref().is_none_or(|p| p.matches(pod))).collect();
		let keys: Vec<PodKey> =
			filtered.iter().map(|pod| PodKey::new(pod.namespace.clone(), pod.name.clone())).collect();
		let (timestamps, metrics) = self.sink.get_container_metrics(&keys).await;
		let shaped_at = Utc::now();
		let mut out = Vec::with_capacity(filtered.len());

		for ((pod, timestamp), containers) in filtered.into_iter().zip(timestamps).zip(metrics) {
			if pod.phase != PodPhase::Running || containers.is_empty() {
				continue;
			}

			out.push(PodMetrics {
				object_meta: ObjectMeta {
					name: pod.name,
					namespace: Some(pod.namespace),
					creation_timestamp: shaped_at,
				},
				timestamp: timestamp.timestamp,
				window: timestamp.window,
				containers: containers
					.into_iter()
					.enumerate()
					.map(|(idx, resources)| ContainerUsage { name: format!("container-{idx}"), resources })
					.collect(),
			});
		}

		Ok(out)
	}

	/// Shaped metrics for a single `Running` pod.
	///
	/// Fails with `Error::NotFound(NotFoundKind::Pod)` when the lister has no such pod, or
	/// `Error::NotFound(NotFoundKind::PodMetrics)` when the pod exists but is not `Running`, or has
	/// no metrics in the current snapshot.
	#[tracing::instrument(skip(self))]
	pub async fn get(&self, namespace: &str, name: &str) -> Result<PodMetrics> {
		let pod = self
			.lister
			.get(namespace, name)
			.await
			.map_err(Error::ListerFailure)?
			.ok_or_else(|| Error::NotFound(NotFoundKind::Pod { namespace: namespace.into(), name: name.into() }))?;
		let key = PodKey::new(namespace, name);
		let (timestamps, metrics) = self.sink.get_container_metrics(std::slice::from_ref(&key)).await;
		let containers = metrics.into_iter().next().unwrap_or_default();

		if pod.phase != PodPhase::Running || containers.is_empty() {
			return Err(Error::NotFound(NotFoundKind::PodMetrics {
				namespace: namespace.into(),
				name: name.into(),
			}));
		}

		let timestamp = timestamps.into_iter().next().expect("one key was queried");

		Ok(PodMetrics {
			object_meta: ObjectMeta {
				name: name.into(),
				namespace: Some(namespace.into()),
				creation_timestamp: Utc::now(),
			},
			timestamp: timestamp.timestamp,
			window: timestamp.window,
			containers: containers
				.into_iter()
				.enumerate()
				.map(|(idx, resources)| ContainerUsage { name: format!("container-{idx}"), resources })
				.collect(),
		})
	}
}

/// A minimal field-selector matcher supporting only `metadata.name` and `metadata.namespace`.
struct FieldSelector {
	name: Option<String>,
	namespace: Option<String>,
}
impl FieldSelector {
	fn parse(raw: &str) -> Self {
		let mut selector = Self { name: None, namespace: None };

		for clause in raw.split(',') {
			let Some((field, value)) = clause.split_once('=') else { continue };

			match field.trim() {
				"metadata.name" => selector.name = Some(value.trim().to_owned()),
				"metadata.namespace" => selector.namespace = Some(value.trim().to_owned()),
				_ => {},
			}
		}

		selector
	}

	fn matches(&self, pod: &crate::read::lister::PodObject) -> bool {
		self.name.as_deref().is_none_or(|n| n == pod.name)
			&& self.namespace.as_deref().is_none_or(|n| n == pod.namespace)
	}
}
