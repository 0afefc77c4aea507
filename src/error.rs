//! Crate-wide error types and `Result` alias.

// std
use std::fmt::{self, Display, Formatter};

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Opaque error produced by a host-supplied collaborator (lister, source).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for the cluster metrics pipeline.
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("duplicate node key '{0}' in scrape batch")]
	DuplicateNodeKey(String),
	#[error("duplicate pod key '{namespace}/{name}' in scrape batch")]
	DuplicatePodKey { namespace: String, name: String },

	#[error("{0} not found")]
	NotFound(NotFoundKind),

	#[error("cluster lister failed: {0}")]
	ListerFailure(#[source] BoxError),

	#[error("scrape exceeded its {after:?} deadline")]
	Timeout { after: std::time::Duration },

	#[error("validation failed for {field}: {reason}")]
	Validation { field: &'static str, reason: String },
}

/// Identifies which named resource was missing when an [`Error::NotFound`] is raised.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotFoundKind {
	Pod { namespace: String, name: String },
	PodMetrics { namespace: String, name: String },
	Node { name: String },
	NodeMetrics { name: String },
}
impl Display for NotFoundKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			NotFoundKind::Pod { namespace, name } => write!(f, "pod '{namespace}/{name}'"),
			NotFoundKind::PodMetrics { namespace, name } =>
				write!(f, "metrics for pod '{namespace}/{name}'"),
			NotFoundKind::Node { name } => write!(f, "node '{name}'"),
			NotFoundKind::NodeMetrics { name } => write!(f, "metrics for node '{name}'"),
		}
	}
}

/// One source's contribution to an [`AggregateError`].
#[derive(Clone, Debug)]
pub struct SourceError {
	/// Name of the source (or the provider enumeration call itself) that failed.
	pub source_name: String,
	/// Human-readable failure message, preserved verbatim from the underlying error.
	pub message: String,
}
impl Display for SourceError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.source_name, self.message)
	}
}

/// Non-fatal aggregate of every per-source failure observed during one `collect()` call.
///
/// Never raised as an [`Error`] variant: [`crate::collector::SourceManager::collect`] always
/// returns a (possibly partial) batch, with this aggregate carried alongside it.
#[derive(Clone, Debug, Default)]
pub struct AggregateError {
	causes: Vec<SourceError>,
}
impl AggregateError {
	/// Construct an empty aggregate.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a failure from the named source.
	pub fn push(&mut self, source_name: impl Into<String>, message: impl Display) {
		self.causes.push(SourceError { source_name: source_name.into(), message: message.to_string() });
	}

	/// Whether any failure was recorded.
	pub fn is_empty(&self) -> bool {
		self.causes.is_empty()
	}

	/// Every underlying cause, in the order they were recorded.
	pub fn causes(&self) -> &[SourceError] {
		&self.causes
	}

	/// Convert to `Some(self)` unless empty, matching the spec's "nil iff nothing failed" rule.
	pub fn into_option(self) -> Option<Self> {
		if self.is_empty() { None } else { Some(self) }
	}
}
impl Display for AggregateError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{} of the collection's sources failed: ", self.causes.len())?;

		for (idx, cause) in self.causes.iter().enumerate() {
			if idx > 0 {
				write!(f, "; ")?;
			}
			write!(f, "{cause}")?;
		}

		Ok(())
	}
}
impl std::error::Error for AggregateError {}
