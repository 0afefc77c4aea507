// crates.io
use chrono::Utc;
use cluster_metrics_core::{
	model::{ContainerMetricsPoint, MetricsBatch, MetricsPoint, NodeMetricsPoint, PodMetricsPoint},
	sink::PodKey,
	SinkProvider,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

fn point() -> MetricsPoint {
	MetricsPoint { timestamp: Utc::now(), cpu: Quantity("100m".into()), memory: Quantity("100Mi".into()) }
}

fn batch_tagged(epoch: u32) -> MetricsBatch {
	MetricsBatch {
		nodes: vec![
			NodeMetricsPoint { name: "node-a".into(), point: MetricsPoint { memory: Quantity(epoch.to_string()), ..point() } },
			NodeMetricsPoint { name: "node-b".into(), point: MetricsPoint { memory: Quantity(epoch.to_string()), ..point() } },
		],
		pods: Vec::new(),
	}
}

#[tokio::test]
async fn concurrent_receive_and_read_never_observe_a_torn_snapshot() {
	let sink = SinkProvider::new();

	sink.receive(batch_tagged(0)).await.unwrap();

	let writer_sink = sink.clone();
	let writer = tokio::spawn(async move {
		for epoch in 1..200u32 {
			writer_sink.receive(batch_tagged(epoch)).await.unwrap();
		}
	});

	let reader_sink = sink.clone();
	let reader = tokio::spawn(async move {
		for _ in 0..200 {
			let (_, metrics) = reader_sink.get_node_metrics(&["node-a", "node-b"]).await;
			let a = metrics[0].memory.as_ref().unwrap().0.clone();
			let b = metrics[1].memory.as_ref().unwrap().0.clone();

			assert_eq!(a, b, "a read observed node-a from one batch and node-b from another");
		}
	});

	writer.await.unwrap();
	reader.await.unwrap();
}

#[tokio::test]
async fn receive_rejects_duplicate_keys_without_disturbing_prior_state() {
	let sink = SinkProvider::new();

	sink.receive(batch_tagged(1)).await.unwrap();

	let mut broken = batch_tagged(2);
	let dup = broken.nodes[0].clone();

	broken.nodes.push(dup);

	assert!(sink.receive(broken).await.is_err());

	let (_, metrics) = sink.get_node_metrics(&["node-a"]).await;

	assert_eq!(metrics[0].memory.as_ref().unwrap().0, "1", "a rejected batch must not replace the snapshot");
}

#[tokio::test]
async fn pod_level_timestamp_is_the_earliest_container_timestamp() {
	let sink = SinkProvider::new();
	let earlier = Utc::now() - chrono::Duration::seconds(30);
	let later = Utc::now();

	sink.receive(MetricsBatch {
		nodes: Vec::new(),
		pods: vec![PodMetricsPoint {
			namespace: "ns1".into(),
			name: "pod1".into(),
			containers: vec![
				ContainerMetricsPoint { name: "c1".into(), point: MetricsPoint { timestamp: later, ..point() } },
				ContainerMetricsPoint { name: "c2".into(), point: MetricsPoint { timestamp: earlier, ..point() } },
			],
		}],
	})
	.await
	.unwrap();

	let (timestamps, _) = sink.get_container_metrics(&[PodKey::new("ns1", "pod1")]).await;

	assert_eq!(timestamps[0].timestamp, earlier);
}

#[tokio::test]
async fn missing_keys_read_as_zero_valued_positions_not_errors() {
	let sink = SinkProvider::new();
	let (timestamps, metrics) = sink.get_node_metrics(&["ghost"]).await;

	assert_eq!(timestamps[0], cluster_metrics_core::model::TimeInfo::zero());
	assert!(metrics[0].cpu.is_none() && metrics[0].memory.is_none());

	let (pod_timestamps, pod_metrics) =
		sink.get_container_metrics(&[PodKey::new("nowhere", "ghost")]).await;

	assert_eq!(pod_timestamps[0], cluster_metrics_core::model::TimeInfo::zero());
	assert!(pod_metrics[0].is_empty());
}
