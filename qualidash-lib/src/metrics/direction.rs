use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// Whether a metric improves as its value goes down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Targets are maximums; values below the perfect value are invalid and count as bad.
    LowerIsBetter,

    /// Targets are minimums.
    HigherIsBetter,
}

impl Direction {
    /// Whether `value` meets `target`, given the metric's perfect value.
    #[must_use]
    pub fn is_better_than(self, value: f64, target: f64, perfect: f64) -> bool {
        match self {
            Self::LowerIsBetter => perfect <= value && value <= target,
            Self::HigherIsBetter => value >= target,
        }
    }
}
