//! The metric catalogue and the status evaluation engine
//!
//! Every kind of metric has a static [`MetricDef`] that fixes its unit, direction,
//! default targets, staleness thresholds, the metric sources it needs and the
//! sentence templates used to report on it. A [`Metric`] binds a definition to one
//! measurable subject of a [`Project`](crate::domain::Project) at a fixed instant and
//! derives everything a report shows from there:
//!
//! - **Value**: measured once through the resolved metric source, -1 when unavailable
//! - **Status**: the first of a fixed sequence of checks that holds, from missing
//!   source configuration down to green
//! - **Texts**: the report sentence, the norm and the comment, rendered from templates
//! - **History**: recent values and the y-axis range for trend graphs
//!
//! Values are plain numbers. Percentages are whole numbers computed by [`percentage`],
//! which rounds halves to the nearest even number.

mod direction;
mod metric;
mod metric_def;
mod percentage;
mod template;

pub use direction::Direction;
pub use metric::{MAX_SUBJECT_LENGTH, Metric};
pub use metric_def::{METRIC_DEFINITIONS, Measure, Measurement, MetricDef};
pub use percentage::percentage;
pub use template::{Parameters, render};
