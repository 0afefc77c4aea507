//! Concurrent scrape → sink → serve pipeline for cluster node and pod resource-usage metrics.
//!
//! A host process wires together a [`collector::MetricSourceProvider`] (cluster discovery), a
//! [`sink::SinkProvider`] (the live snapshot), and a [`read::PodLister`]/[`read::NodeLister`] pair
//! (cluster object identity) to serve point-in-time CPU/memory reads while scraping runs on its
//! own schedule in the background.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod collector;
pub mod model;
pub mod read;
pub mod sink;

#[cfg(feature = "metrics")] pub mod metrics;

mod error;
mod _prelude {
	pub use std::{sync::Arc, time::Duration};

	pub use chrono::{DateTime, Utc};
}

#[cfg(feature = "prometheus")] pub use crate::metrics::install_default_exporter;
#[cfg(feature = "metrics")] pub use crate::metrics::ScrapeMetrics;
pub use crate::{
	collector::{MetricSource, MetricSourceProvider, PartialOutcome, SourceManager, SourceManagerConfig},
	error::{AggregateError, BoxError, Error, NotFoundKind, Result, SourceError},
	model::{
		ContainerMetricsPoint, MetricsBatch, MetricsPoint, NodeMetricsPoint, PodMetricsPoint,
		ResourceList, TimeInfo, COLLECTION_WINDOW,
	},
	read::{
		ContainerUsage, NodeLister, NodeMetrics, NodeObject, NodeReadAdapter, ObjectMeta, PodLister,
		PodMetrics, PodObject, PodPhase, PodReadAdapter,
	},
	sink::{PodKey, SinkProvider},
};
