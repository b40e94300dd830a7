//! The measurable subjects of a quality report and the norms they are held to
//!
//! This module holds the object model that metrics are evaluated against: the
//! project with its products, teams and documents, the requirements that select
//! which metrics apply to each of them, and the per-subject overrides of metric
//! targets.
//!
//! # Implementation Model
//!
//! - [`TechnicalDebtTarget`]: an accepted level of technical debt, fixed or reduced over time
//! - [`Requirement`] / [`Requirements`]: capabilities that activate sets of [`MetricKind`]s
//! - [`MeasurableObject`]: per-metric overrides and per-source ids of a subject
//! - [`MeasurableSubject`]: the capability interface the metric engine consumes, with a
//!   "nothing configured" default for every lookup
//! - [`Subject`] / [`Project`]: the concrete subjects
//!
//! Requirements are resolved once, when a subject is created, and never change
//! afterwards.

mod format;
mod measurable;
mod metric_kind;
mod project;
mod requirement;
mod status;
mod subject;
mod target;

pub use format::{format_age, format_date};
pub use measurable::{MeasurableObject, MeasurableSubject, MetricOptions};
pub use metric_kind::MetricKind;
pub use project::{Project, RESERVED_SECTION_NAMES};
pub use requirement::{Requirement, Requirements};
pub use status::Status;
pub use subject::{Subject, SubjectKind};
pub use target::TechnicalDebtTarget;
