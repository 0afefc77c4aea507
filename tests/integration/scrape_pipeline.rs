// std
use std::{sync::Arc, time::Duration};
// crates.io
use async_trait::async_trait;
use chrono::Utc;
use cluster_metrics_core::{
	collector::{MetricSource, MetricSourceProvider, PartialOutcome, SourceManager, SourceManagerConfig},
	model::{MetricsBatch, NodeMetricsPoint, PodMetricsPoint},
	Error, Result,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

enum Outcome {
	Success(MetricsBatch),
	Failure(&'static str),
	Partial(MetricsBatch, &'static str),
}

struct FakeSource {
	name: String,
	outcome: Outcome,
}
#[async_trait]
impl MetricSource for FakeSource {
	fn name(&self) -> &str {
		&self.name
	}

	async fn collect(&self, _timeout: Duration) -> PartialOutcome {
		match &self.outcome {
			Outcome::Success(batch) => PartialOutcome::complete(batch.clone()),
			Outcome::Failure(message) =>
				PartialOutcome::failed(Error::Validation { field: "fake_source", reason: (*message).to_owned() }),
			Outcome::Partial(batch, message) => PartialOutcome::partial(
				batch.clone(),
				Error::Validation { field: "fake_source", reason: (*message).to_owned() },
			),
		}
	}
}

struct FakeProvider {
	sources: Vec<Arc<dyn MetricSource>>,
	enumeration_failure: Option<&'static str>,
}
#[async_trait]
impl MetricSourceProvider for FakeProvider {
	async fn metric_sources(&self) -> Result<Vec<Arc<dyn MetricSource>>> {
		if let Some(message) = self.enumeration_failure {
			return Err(Error::Validation { field: "fake_provider", reason: message.to_owned() });
		}

		Ok(self.sources.clone())
	}
}

fn node_batch(name: &str) -> MetricsBatch {
	MetricsBatch {
		nodes: vec![NodeMetricsPoint {
			name: name.to_owned(),
			point: cluster_metrics_core::model::MetricsPoint {
				timestamp: Utc::now(),
				cpu: Quantity("100m".into()),
				memory: Quantity("100Mi".into()),
			},
		}],
		pods: Vec::new(),
	}
}

fn pod_batch(namespace: &str, name: &str) -> MetricsBatch {
	MetricsBatch {
		nodes: Vec::new(),
		pods: vec![PodMetricsPoint {
			namespace: namespace.to_owned(),
			name: name.to_owned(),
			containers: vec![cluster_metrics_core::model::ContainerMetricsPoint {
				name: "c1".into(),
				point: cluster_metrics_core::model::MetricsPoint {
					timestamp: Utc::now(),
					cpu: Quantity("50m".into()),
					memory: Quantity("50Mi".into()),
				},
			}],
		}],
	}
}

#[tokio::test]
async fn partial_failure_preserves_successful_sources_and_names_failures() {
	let provider = FakeProvider {
		sources: vec![
			Arc::new(FakeSource { name: "node-a".into(), outcome: Outcome::Success(node_batch("node-a")) }),
			Arc::new(FakeSource { name: "node-b".into(), outcome: Outcome::Failure("boom") }),
			Arc::new(FakeSource {
				name: "node-c".into(),
				outcome: Outcome::Success(pod_batch("ns1", "pod1")),
			}),
		],
		enumeration_failure: None,
	};
	let config = SourceManagerConfig::new(Duration::from_millis(500)).unwrap();
	let manager = SourceManager::new(Arc::new(provider), config);
	let (batch, errors) = manager.collect().await;

	assert_eq!(batch.nodes.len(), 1, "node-a's contribution should survive node-b's failure");
	assert_eq!(batch.pods.len(), 1, "node-c's contribution should survive node-b's failure");

	let errors = errors.expect("node-b's failure should be aggregated, not swallowed");

	assert_eq!(errors.causes().len(), 1);
	assert_eq!(errors.causes()[0].source_name, "node-b");
}

#[tokio::test]
async fn a_source_that_fails_midway_still_contributes_its_partial_batch() {
	let provider = FakeProvider {
		sources: vec![Arc::new(FakeSource {
			name: "node-a".into(),
			outcome: Outcome::Partial(node_batch("node-a"), "failed while collecting pods"),
		})],
		enumeration_failure: None,
	};
	let config = SourceManagerConfig::new(Duration::from_millis(500)).unwrap();
	let manager = SourceManager::new(Arc::new(provider), config);
	let (batch, errors) = manager.collect().await;

	assert_eq!(batch.nodes.len(), 1, "the partial batch must be merged even though the source also failed");

	let errors = errors.expect("the source's failure should still be aggregated");

	assert_eq!(errors.causes()[0].source_name, "node-a");
}

#[tokio::test]
async fn provider_enumeration_failure_yields_empty_batch_and_named_cause() {
	let provider = FakeProvider { sources: Vec::new(), enumeration_failure: Some("lister unreachable") };
	let config = SourceManagerConfig::new(Duration::from_millis(500)).unwrap();
	let manager = SourceManager::new(Arc::new(provider), config);
	let (batch, errors) = manager.collect().await;

	assert!(batch.nodes.is_empty() && batch.pods.is_empty());

	let errors = errors.expect("enumeration failure should be aggregated");

	assert_eq!(errors.causes()[0].source_name, "<provider>");
}

#[tokio::test]
async fn all_sources_succeeding_yields_no_aggregate_error() {
	let provider = FakeProvider {
		sources: vec![Arc::new(FakeSource {
			name: "node-a".into(),
			outcome: Outcome::Success(node_batch("node-a")),
		})],
		enumeration_failure: None,
	};
	let config = SourceManagerConfig::new(Duration::from_millis(500)).unwrap();
	let manager = SourceManager::new(Arc::new(provider), config);
	let (batch, errors) = manager.collect().await;

	assert_eq!(batch.nodes.len(), 1);
	assert!(errors.is_none(), "a fully successful tick must not report an aggregate error");
}

#[tokio::test]
async fn collect_completes_within_the_configured_timeout() {
	let provider = FakeProvider {
		sources: (0..20)
			.map(|i| {
				Arc::new(FakeSource {
					name: format!("node-{i}"),
					outcome: Outcome::Success(node_batch(&format!("node-{i}"))),
				}) as Arc<dyn MetricSource>
			})
			.collect(),
		enumeration_failure: None,
	};
	let config = SourceManagerConfig::new(Duration::from_millis(500)).unwrap();
	let manager = SourceManager::new(Arc::new(provider), config);
	let outcome = tokio::time::timeout(Duration::from_secs(2), manager.collect()).await;

	assert!(outcome.is_ok(), "stagger dispatch must not block collection past its overall deadline");
	assert_eq!(outcome.unwrap().0.nodes.len(), 20);
}
