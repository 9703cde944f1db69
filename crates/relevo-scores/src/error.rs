use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::result::ScoreKind;

/// A score could not be computed from the documented data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Error)]
#[serde(rename_all = "snake_case", tag = "kind")]
#[ts(export)]
pub enum ComputationError {
    #[error("{}: required input '{component}' is not documented", .score.display_name())]
    MissingInput { score: ScoreKind, component: String },

    #[error(
        "{}: input '{component}' value {value} is outside [{min}, {max}]",
        .score.display_name()
    )]
    OutOfRange {
        score: ScoreKind,
        component: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub(crate) fn require<T>(
    score: ScoreKind,
    component: &str,
    value: Option<T>,
) -> Result<T, ComputationError> {
    value.ok_or_else(|| ComputationError::MissingInput {
        score,
        component: component.to_string(),
    })
}
