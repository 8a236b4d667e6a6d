use itertools::Itertools;
use ordered_float::OrderedFloat;
use railsense_core::model::{CongestionLevel, PredictionError, PredictionRecord, Section};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{DecisionContext, DecisionError, TrainInfo};

/// one evaluated candidate for the train's next section.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteOption {
    /// "A (Original)" for staying on course, "A -> B" for a diversion
    pub route: String,
    pub section: Section,
    pub is_original: bool,
    pub predicted_delay_minutes: f64,
    pub predicted_congestion_level: CongestionLevel,
    pub is_anomaly: bool,
    pub train_type_used: String,
}

impl RouteOption {
    fn new(route: String, is_original: bool, record: PredictionRecord) -> RouteOption {
        let PredictionRecord {
            features,
            prediction,
        } = record;
        RouteOption {
            route,
            section: features.track_section,
            is_original,
            predicted_delay_minutes: prediction.delay_minutes,
            predicted_congestion_level: prediction.congestion_level,
            is_anomaly: prediction.is_anomaly,
            train_type_used: features.train_type,
        }
    }
}

/// a candidate left out of the comparison because its prediction failed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExcludedOption {
    pub route: String,
    pub section: Section,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RerouteProposal {
    /// absent when the current section itself could not be evaluated
    pub original_route_prediction: Option<RouteOption>,
    pub best_alternative_route: RouteOption,
    pub all_options_considered: Vec<RouteOption>,
    pub excluded_options: Vec<ExcludedOption>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RerouteOutcome {
    /// the current section has no successors in the network graph
    NoAlternatives {
        current_section: Section,
        message: String,
    },
    Proposed(RerouteProposal),
}

struct Candidate<'a> {
    label: String,
    section: &'a Section,
    is_original: bool,
}

/// compares staying on the current section against every successor of it in
/// the network graph and proposes the candidate with the lowest predicted delay.
///
/// candidates are the current section followed by its successors in graph
/// order. ties go to the earliest candidate, so the original route wins any tie
/// it is part of.
///
/// # Errors
///
/// * [`DecisionError::InvalidRequest`] if the train info fails validation
/// * [`DecisionError::ModelUnavailable`] if no candidate could be evaluated
pub fn propose_reroute(
    ctx: &DecisionContext,
    info: &TrainInfo,
) -> Result<RerouteOutcome, DecisionError> {
    let base = ctx.features(info)?;
    let current = &info.track_section;
    let successors = ctx.graph.successors(current);
    if successors.is_empty() {
        log::debug!("section {current} has no successors, no reroute proposed");
        return Ok(RerouteOutcome::NoAlternatives {
            current_section: current.clone(),
            message: format!(
                "no alternative routes found from {current}, it may be a terminal section"
            ),
        });
    }

    let original = Candidate {
        label: format!("{current} (Original)"),
        section: current,
        is_original: true,
    };
    let alternatives = successors.iter().map(|next| Candidate {
        label: format!("{current} -> {next}"),
        section: next,
        is_original: false,
    });
    let candidates = std::iter::once(original).chain(alternatives).collect_vec();

    let results: Vec<(Candidate, Result<PredictionRecord, PredictionError>)> = candidates
        .into_par_iter()
        .map(|candidate| {
            let features = base.at_section(candidate.section);
            let result = ctx
                .predict(&features)
                .map(|p| PredictionRecord::new(features, p));
            (candidate, result)
        })
        .collect();

    let mut options: Vec<RouteOption> = vec![];
    let mut excluded: Vec<ExcludedOption> = vec![];
    let mut errors: Vec<PredictionError> = vec![];
    for (candidate, result) in results {
        match result {
            Ok(record) => options.push(RouteOption::new(
                candidate.label,
                candidate.is_original,
                record,
            )),
            Err(e) => {
                excluded.push(ExcludedOption {
                    route: candidate.label,
                    section: candidate.section.clone(),
                    reason: e.to_string(),
                });
                errors.push(e);
            }
        }
    }

    let best = options
        .iter()
        .min_by_key(|o| OrderedFloat(o.predicted_delay_minutes))
        .cloned();
    let Some(best) = best else {
        let sections = excluded.iter().map(|e| e.section.clone()).collect_vec();
        return Err(DecisionError::model_unavailable(sections, &errors));
    };
    if !excluded.is_empty() {
        log::warn!(
            "reroute from {current} excluded {} of {} candidates",
            excluded.len(),
            excluded.len() + options.len()
        );
    }

    let original = options.iter().find(|o| o.is_original).cloned();
    Ok(RerouteOutcome::Proposed(RerouteProposal {
        original_route_prediction: original,
        best_alternative_route: best,
        all_options_considered: options,
        excluded_options: excluded,
    }))
}
