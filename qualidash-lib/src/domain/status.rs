use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The evaluated status of a metric.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// One or more metric sources, or the subject's ids in them, are not configured.
    MissingSource,

    /// The metric sources are configured but did not deliver a value.
    Missing,

    /// The value is below target but within the accepted technical debt.
    Grey,

    /// The value needs immediate action, or the measurement is far too old.
    Red,

    /// The value is below target, or the measurement is old.
    Yellow,

    /// The value cannot be improved any further.
    Perfect,

    /// The value meets its target.
    Green,
}
