use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A raw quantity a metric source can be asked for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Non-comment lines of code.
    Ncloc,
    /// All lines, including comments and blank lines.
    Lines,
    DuplicatedLines,
    BlockerViolations,
    CriticalViolations,
    MajorViolations,
    Unittests,
    FailingUnittests,
    LineCoverage,
    BranchCoverage,
    FailedTests,
    PassedTests,
    CoveredStatements,
    Statements,
    ResponseTimeErrors,
    UnmergedBranches,
    OpenBugs,
    ReadyStoryPoints,
    FailingJobs,
}
