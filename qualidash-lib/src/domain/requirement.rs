use super::MetricKind;
use crate::Result;
use ohno::app_err;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A capability that, when selected for a subject, requires a fixed set of metrics to be measured.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
pub enum Requirement {
    CodeQuality,
    UnitTests,
    Art,
    ArtCoverage,
    PerformanceLoad,
    TrackBranches,
    TrackDocumentAge,
    TrackBugs,
    TrackCiJobs,
    TrackReadyUserStories,
}

impl Requirement {
    /// Human-readable name of the requirement.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CodeQuality => "Code quality",
            Self::UnitTests => "Unit tests",
            Self::Art => "Automated regression tests",
            Self::ArtCoverage => "Automated regression test coverage",
            Self::PerformanceLoad => "Performance load",
            Self::TrackBranches => "Track branches",
            Self::TrackDocumentAge => "Track document age",
            Self::TrackBugs => "Track bugs",
            Self::TrackCiJobs => "Track CI jobs",
            Self::TrackReadyUserStories => "Track ready user stories",
        }
    }

    /// The metric kinds that must be measured when this requirement is active, in report order.
    #[must_use]
    pub const fn metric_kinds(self) -> &'static [MetricKind] {
        match self {
            Self::CodeQuality => &[
                MetricKind::BlockerViolations,
                MetricKind::CriticalViolations,
                MetricKind::MajorViolations,
                MetricKind::Duplication,
                MetricKind::ProductLoc,
                MetricKind::SonarAnalysisAge,
            ],
            Self::UnitTests => &[
                MetricKind::FailingUnittests,
                MetricKind::UnittestLineCoverage,
                MetricKind::UnittestBranchCoverage,
            ],
            Self::Art => &[MetricKind::FailingRegressionTests],
            Self::ArtCoverage => &[MetricKind::ArtStatementCoverage],
            Self::PerformanceLoad => &[MetricKind::PerformanceLoadTestErrors],
            Self::TrackBranches => &[MetricKind::UnmergedBranches],
            Self::TrackDocumentAge => &[MetricKind::DocumentAge],
            Self::TrackBugs => &[MetricKind::OpenBugs],
            Self::TrackCiJobs => &[MetricKind::FailingCiJobs],
            Self::TrackReadyUserStories => &[MetricKind::ReadyUserStoryPoints],
        }
    }
}

/// The requirements selected for a subject.
///
/// Computed once as `(default ∪ added) − removed`; requirements can only be added if the subject
/// declares them optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    requirements: BTreeSet<Requirement>,
}

impl Requirements {
    /// Compute the active requirements of a subject.
    ///
    /// # Errors
    ///
    /// Returns an error if `added` contains a requirement that is not in `optional`.
    pub fn new(
        default: &[Requirement],
        optional: &[Requirement],
        added: &[Requirement],
        removed: &[Requirement],
    ) -> Result<Self> {
        let not_optional: Vec<&str> = added
            .iter()
            .filter(|requirement| !optional.contains(requirement))
            .map(|requirement| requirement.name())
            .collect();

        if !not_optional.is_empty() {
            return Err(app_err!(
                "requirement(s) {} cannot be added because they are not optional for this subject",
                not_optional.join(", ")
            ));
        }

        let requirements = default
            .iter()
            .chain(added)
            .filter(|requirement| !removed.contains(requirement))
            .copied()
            .collect();

        Ok(Self { requirements })
    }

    #[must_use]
    pub const fn requirements(&self) -> &BTreeSet<Requirement> {
        &self.requirements
    }

    #[must_use]
    pub fn contains(&self, requirement: Requirement) -> bool {
        self.requirements.contains(&requirement)
    }

    /// The union of the metric kinds of all active requirements.
    #[must_use]
    pub fn required_metric_kinds(&self) -> BTreeSet<MetricKind> {
        self.requirements
            .iter()
            .flat_map(|requirement| requirement.metric_kinds().iter().copied())
            .collect()
    }
}
