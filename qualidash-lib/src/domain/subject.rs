use super::{MeasurableObject, MeasurableSubject, MetricKind, MetricOptions, Requirement, Requirements};
use crate::Result;
use crate::metric_source::MetricSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumString};

/// The kinds of subjects a project is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Project,
    /// A product that is part of a larger application.
    Component,
    /// A product that is deployed on its own.
    Application,
    Team,
    Document,
}

impl SubjectKind {
    /// Requirements that are active unless explicitly removed.
    #[must_use]
    pub const fn default_requirements(self) -> &'static [Requirement] {
        match self {
            Self::Project | Self::Team => &[],
            Self::Component => &[Requirement::CodeQuality, Requirement::UnitTests, Requirement::TrackBranches],
            Self::Application => &[
                Requirement::CodeQuality,
                Requirement::TrackBranches,
                Requirement::Art,
                Requirement::ArtCoverage,
                Requirement::PerformanceLoad,
            ],
            Self::Document => &[Requirement::TrackDocumentAge],
        }
    }

    /// Requirements that may be added on top of the defaults.
    #[must_use]
    pub const fn optional_requirements(self) -> &'static [Requirement] {
        match self {
            Self::Project => &[Requirement::TrackBugs, Requirement::TrackCiJobs, Requirement::TrackReadyUserStories],
            Self::Component => &[Requirement::Art, Requirement::ArtCoverage],
            Self::Application => &[Requirement::UnitTests],
            Self::Team => &[Requirement::TrackReadyUserStories],
            Self::Document => &[],
        }
    }
}

/// A concrete measurable subject: the project itself, one of its products, a team or a document.
#[derive(Debug, Clone)]
pub struct Subject {
    kind: SubjectKind,
    name: String,
    short_name: String,
    url: Option<String>,
    requirements: Requirements,
    measurable: MeasurableObject,
}

impl Subject {
    /// Create a subject with the default requirements of its kind.
    ///
    /// # Errors
    ///
    /// Never fails for the default requirements; the `Result` matches [`Self::with_requirements`].
    pub fn new(kind: SubjectKind, name: impl Into<String>, short_name: impl Into<String>) -> Result<Self> {
        Self::with_requirements(kind, name, short_name, &[], &[])
    }

    /// Create a subject with requirements added to or removed from the defaults of its kind.
    ///
    /// # Errors
    ///
    /// Returns an error if an added requirement is not optional for the subject kind.
    pub fn with_requirements(
        kind: SubjectKind,
        name: impl Into<String>,
        short_name: impl Into<String>,
        added: &[Requirement],
        removed: &[Requirement],
    ) -> Result<Self> {
        let name = name.into();
        let requirements = Requirements::new(kind.default_requirements(), kind.optional_requirements(), added, removed)
            .map_err(|e| ohno::app_err!("invalid requirements for {kind} '{name}': {e}"))?;

        Ok(Self {
            kind,
            name,
            short_name: short_name.into(),
            url: None,
            requirements,
            measurable: MeasurableObject::new(),
        })
    }

    #[must_use]
    pub fn with_measurable(mut self, measurable: MeasurableObject) -> Self {
        self.measurable = measurable;
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        self.kind
    }

    /// Two-letter abbreviation used to number the metrics of this subject in reports.
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[must_use]
    pub const fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    #[must_use]
    pub const fn measurable(&self) -> &MeasurableObject {
        &self.measurable
    }
}

impl MeasurableSubject for Subject {
    fn name(&self) -> &str {
        &self.name
    }

    fn metric_options(&self, kind: MetricKind) -> &MetricOptions {
        self.measurable.metric_options(kind)
    }

    fn metric_source_id(&self, source: &MetricSource) -> Option<&[String]> {
        self.measurable.metric_source_id(source)
    }

    fn required_metric_kinds(&self) -> BTreeSet<MetricKind> {
        self.requirements.required_metric_kinds()
    }
}
