use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The kinds of external tools measurements are collected from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MetricSourceKind {
    Sonar,
    Jira,
    Git,
    Jenkins,
    JunitTestReport,
    CoverageReport,
    PerformanceReport,
}

impl MetricSourceKind {
    /// Name of the kind of source as shown in reports.
    #[must_use]
    pub const fn metric_source_name(self) -> &'static str {
        match self {
            Self::Sonar => "SonarQube",
            Self::Jira => "Jira",
            Self::Git => "Git",
            Self::Jenkins => "Jenkins",
            Self::JunitTestReport => "JUnit test report",
            Self::CoverageReport => "Coverage report",
            Self::PerformanceReport => "Performance report",
        }
    }

    /// Whether subjects need to be identified in this kind of source before it can measure them.
    ///
    /// Sources that do not need an id report on the project as a whole.
    #[must_use]
    pub const fn needs_metric_source_id(self) -> bool {
        !matches!(self, Self::Jira | Self::Jenkins)
    }
}
