use itertools::Itertools;
use railsense_core::model::{PredictionError, Section, TrainId};
use serde::{Deserialize, Serialize};

/// request-level failures. every variant names the sections a caller needs to
/// correct, where there are any.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(
        "the following sections are not part of train {train_id}'s schedule: [{}]",
        join_sections(.sections)
    )]
    RouteNotOnSchedule {
        train_id: TrainId,
        sections: Vec<Section>,
    },
    #[error(
        "sections are not in chronological order for train {train_id}'s schedule: [{}]",
        join_sections(.sections)
    )]
    RouteOutOfOrder {
        train_id: TrainId,
        sections: Vec<Section>,
    },
    #[error("degenerate route for train {train_id}: {message}")]
    DegenerateRoute {
        train_id: TrainId,
        sections: Vec<Section>,
        message: String,
    },
    #[error(
        "prediction model unavailable for sections [{}]: {message}",
        join_sections(.sections)
    )]
    ModelUnavailable {
        sections: Vec<Section>,
        message: String,
    },
}

fn join_sections(sections: &[Section]) -> String {
    sections.iter().join(", ")
}

impl DecisionError {
    pub fn kind(&self) -> &'static str {
        match self {
            DecisionError::InvalidRequest(_) => "invalid_request",
            DecisionError::RouteNotOnSchedule { .. } => "route_not_on_schedule",
            DecisionError::RouteOutOfOrder { .. } => "route_out_of_order",
            DecisionError::DegenerateRoute { .. } => "degenerate_route",
            DecisionError::ModelUnavailable { .. } => "model_unavailable",
        }
    }

    /// the offending sections, if this error names any.
    pub fn sections(&self) -> &[Section] {
        match self {
            DecisionError::InvalidRequest(_) => &[],
            DecisionError::RouteNotOnSchedule { sections, .. } => sections,
            DecisionError::RouteOutOfOrder { sections, .. } => sections,
            DecisionError::DegenerateRoute { sections, .. } => sections,
            DecisionError::ModelUnavailable { sections, .. } => sections,
        }
    }

    /// a gateway failure while predicting for the given sections.
    pub fn model_unavailable(sections: Vec<Section>, errors: &[PredictionError]) -> DecisionError {
        let message = errors.iter().map(|e| e.to_string()).unique().join("; ");
        DecisionError::ModelUnavailable { sections, message }
    }
}

/// serializable form of a [`DecisionError`] returned to callers in place of a result.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DecisionErrorRecord {
    pub kind: String,
    pub message: String,
    pub sections: Vec<Section>,
}

impl From<&DecisionError> for DecisionErrorRecord {
    fn from(error: &DecisionError) -> Self {
        DecisionErrorRecord {
            kind: error.kind().to_string(),
            message: error.to_string(),
            sections: error.sections().to_vec(),
        }
    }
}
