#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for qualidash
//!
//! This library consolidates all functionality for the qualidash tool, which evaluates
//! software quality measurements of a project against configurable norms and reports
//! a color-coded status per metric.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`domain`]: Projects, products, teams, documents, requirements and targets
//! - [`metric_source`]: The boundary to external measurement tools and the measurement history
//! - [`metrics`]: The metric catalogue and the status evaluation engine
//! - [`reports`]: Report assembly and generation in multiple formats

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod domain;
#[cfg(not(any(debug_assertions, test)))]
mod domain;

#[cfg(any(debug_assertions, test))]
pub mod metric_source;
#[cfg(not(any(debug_assertions, test)))]
mod metric_source;

#[cfg(any(debug_assertions, test))]
pub mod metrics;
#[cfg(not(any(debug_assertions, test)))]
mod metrics;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
