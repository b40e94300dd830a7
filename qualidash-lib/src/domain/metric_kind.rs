use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Identifies a kind of metric.
///
/// The declaration order is the order in which metrics appear within a report section.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
pub enum MetricKind {
    ProductLoc,
    BlockerViolations,
    CriticalViolations,
    MajorViolations,
    Duplication,
    SonarAnalysisAge,
    FailingUnittests,
    UnittestLineCoverage,
    UnittestBranchCoverage,
    FailingRegressionTests,
    ArtStatementCoverage,
    PerformanceLoadTestErrors,
    UnmergedBranches,
    DocumentAge,
    OpenBugs,
    ReadyUserStoryPoints,
    FailingCiJobs,
}
