//! The boundary between the metric engine and the tools that measure a project
//!
//! Every kind of external tool is a [`MetricSourceKind`]; a project configures one
//! or more named [`MetricSource`] instances of each kind. A metric source asks its
//! [`MeasurementProvider`] for raw [`Quantity`] values and absorbs every failure:
//! the engine only ever sees a number, the sentinel -1, or the minimal date.
//!
//! The measurement [`History`] answers two questions about past reports: since when a
//! metric has had its current status, and what its recent values were.

mod history;
mod metric_source_kind;
mod metric_sources;
mod quantity;
mod recorded_provider;
mod source;

pub use history::{DEFAULT_RECENT_HISTORY, FileHistory, History, NoHistory};
pub use metric_source_kind::MetricSourceKind;
pub use metric_sources::MetricSources;
pub use quantity::Quantity;
pub use recorded_provider::RecordedProvider;
pub use source::{MISSING_VALUE, MeasurementProvider, MetricSource};
