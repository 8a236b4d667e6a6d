use std::collections::HashMap;

use itertools::Itertools;
use railsense_core::{
    model::{PredictionFeatures, PredictionRecord, Section, TrainId},
    util::time_ops::round2,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{DecisionContext, DecisionError, RouteRequest};
use crate::timetable::ScheduledStop;

/// scheduled versus predicted travel time over a validated route.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteEfficiencyReport {
    pub train_number: TrainId,
    pub route: Vec<Section>,
    /// arrival at the last section minus departure from the first, in minutes
    pub scheduled_duration_minutes: i64,
    pub total_predicted_delay_minutes: f64,
    pub predicted_duration_minutes: f64,
    /// scheduled duration as a percentage of predicted duration
    pub efficiency_score: f64,
    pub insight: String,
    pub section_predictions: Vec<PredictionRecord>,
}

/// validates the route against the train's timetable, then sums the predicted
/// delay over every section of the route.
///
/// validation happens before any gateway call. one gateway call is issued per
/// route section; the calls are independent and run in parallel.
///
/// # Errors
///
/// * [`DecisionError::RouteNotOnSchedule`] naming sections the train does not call at
/// * [`DecisionError::RouteOutOfOrder`] naming sections not followed by a later stop
/// * [`DecisionError::DegenerateRoute`] if the route is empty or its scheduled duration is not positive
/// * [`DecisionError::ModelUnavailable`] naming every section whose prediction failed
pub fn evaluate_route(
    ctx: &DecisionContext,
    request: &RouteRequest,
) -> Result<RouteEfficiencyReport, DecisionError> {
    let train_id = &request.train_info.train_number;
    let base = ctx.features(&request.train_info)?;
    let stops = ctx.timetable.stops(train_id).unwrap_or(&[]);
    let (start, end) = validate_route(train_id, &request.route, stops)?;

    let scheduled_duration = end.arrival - start.departure;
    if scheduled_duration <= 0 {
        return Err(DecisionError::DegenerateRoute {
            train_id: train_id.clone(),
            sections: vec![start.section.clone(), end.section.clone()],
            message: format!(
                "scheduled duration from {} to {} is {scheduled_duration} minutes",
                start.section, end.section
            ),
        });
    }

    let section_predictions = predict_sections(ctx, &base, &request.route)?;
    let total_predicted_delay: f64 = section_predictions
        .iter()
        .map(|r| r.prediction.delay_minutes)
        .sum();

    let scheduled = scheduled_duration as f64;
    let predicted_duration = scheduled + total_predicted_delay;
    let efficiency_score = if predicted_duration > 0.0 {
        round2(scheduled / predicted_duration * 100.0)
    } else {
        0.0
    };
    log::debug!(
        "train {train_id} route [{}]: scheduled {scheduled_duration}, delay {total_predicted_delay:.2}, score {efficiency_score}",
        request.route.iter().join(", ")
    );

    Ok(RouteEfficiencyReport {
        train_number: train_id.clone(),
        route: request.route.clone(),
        scheduled_duration_minutes: scheduled_duration,
        total_predicted_delay_minutes: round2(total_predicted_delay),
        predicted_duration_minutes: round2(predicted_duration),
        efficiency_score,
        insight: format!(
            "this journey is predicted to take ~{} minutes, compared to the {} minutes scheduled",
            predicted_duration.round(),
            scheduled_duration
        ),
        section_predictions,
    })
}

/// checks that every route section is a stop of the train and that the stops
/// come in strictly increasing timetable order. returns the stops of the first
/// and last route sections.
///
/// a station listed more than once in a timetable is matched to its last stop.
fn validate_route<'a>(
    train_id: &TrainId,
    route: &[Section],
    stops: &'a [ScheduledStop],
) -> Result<(&'a ScheduledStop, &'a ScheduledStop), DecisionError> {
    if route.is_empty() {
        return Err(DecisionError::DegenerateRoute {
            train_id: train_id.clone(),
            sections: vec![],
            message: String::from("route has no sections"),
        });
    }

    let positions: HashMap<&Section, usize> = stops
        .iter()
        .enumerate()
        .map(|(idx, stop)| (&stop.section, idx))
        .collect();

    let missing = route
        .iter()
        .filter(|s| !positions.contains_key(s))
        .unique()
        .cloned()
        .collect_vec();
    if !missing.is_empty() {
        return Err(DecisionError::RouteNotOnSchedule {
            train_id: train_id.clone(),
            sections: missing,
        });
    }

    let route_positions = route.iter().map(|s| positions[s]).collect_vec();
    let out_of_order = route
        .iter()
        .zip(route_positions.iter().tuple_windows())
        .filter(|(_, (a, b))| a >= b)
        .map(|(section, _)| section)
        .unique()
        .cloned()
        .collect_vec();
    if !out_of_order.is_empty() {
        return Err(DecisionError::RouteOutOfOrder {
            train_id: train_id.clone(),
            sections: out_of_order,
        });
    }

    let first = &stops[route_positions[0]];
    let last = &stops[route_positions[route_positions.len() - 1]];
    Ok((first, last))
}

/// predicts each section with all other features held at the base values.
/// every call runs to completion; failures are collected and reported together.
fn predict_sections(
    ctx: &DecisionContext,
    base: &PredictionFeatures,
    route: &[Section],
) -> Result<Vec<PredictionRecord>, DecisionError> {
    let results = route
        .par_iter()
        .map(|section| {
            let features = base.at_section(section);
            ctx.predict(&features)
                .map(|p| PredictionRecord::new(features, p))
                .map_err(|e| (section.clone(), e))
        })
        .collect::<Vec<_>>();

    let (records, failures): (Vec<PredictionRecord>, Vec<_>) =
        results.into_iter().partition_result();
    if !failures.is_empty() {
        let (sections, errors): (Vec<Section>, Vec<_>) = failures.into_iter().unzip();
        return Err(DecisionError::model_unavailable(sections, &errors));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        decision::decision_context::test_support::{context, train_info, MockGateway},
        network::NetworkGraph,
        timetable::{TimetableEntry, TimetableIndex},
    };

    /// train T1 calls at the given (section, arrival, departure) stops on day 1
    fn timetable(stops: &[(&str, Option<i64>, Option<i64>)]) -> TimetableIndex {
        TimetableIndex::build(stops.iter().map(|(s, a, d)| TimetableEntry {
            train_id: TrainId::from("T1"),
            day: Some(1),
            section: Some(Section::from(*s)),
            arrival: *a,
            departure: *d,
        }))
    }

    fn request(route: &[&str]) -> RouteRequest {
        RouteRequest {
            route: route.iter().map(|s| Section::from(*s)).collect(),
            train_info: train_info("T1", route.first().copied().unwrap_or("X"), 5),
        }
    }

    fn xyz_timetable() -> TimetableIndex {
        timetable(&[
            ("X", None, Some(100)),
            ("Y", Some(160), Some(165)),
            ("Z", Some(200), None),
        ])
    }

    #[test]
    fn test_efficiency_report() {
        let gateway = Arc::new(MockGateway::new(&[("X", 5.0), ("Y", 10.0), ("Z", 5.0)]));
        let ctx = context(NetworkGraph::empty(), xyz_timetable(), gateway.clone());
        let report = ctx.evaluate_route(&request(&["X", "Y", "Z"])).unwrap();
        assert_eq!(report.scheduled_duration_minutes, 100);
        assert_eq!(report.total_predicted_delay_minutes, 20.0);
        assert_eq!(report.predicted_duration_minutes, 120.0);
        assert_eq!(report.efficiency_score, 83.33);
        assert_eq!(report.section_predictions.len(), 3);
        assert_eq!(
            report.section_predictions[1].features.track_section,
            Section::from("Y")
        );
        assert_eq!(gateway.n_calls(), 3);
    }

    #[test]
    fn test_score_never_exceeds_100_with_non_negative_delay() {
        for delay in [0.0, 0.001, 3.3, 250.0] {
            let gateway = Arc::new(MockGateway::new(&[("X", delay), ("Z", delay)]));
            let ctx = context(NetworkGraph::empty(), xyz_timetable(), gateway);
            let report = ctx.evaluate_route(&request(&["X", "Z"])).unwrap();
            assert!(report.efficiency_score <= 100.0);
        }
    }

    #[test]
    fn test_out_of_order_names_section() {
        // the train actually runs X, Z, Y
        let index = timetable(&[
            ("X", None, Some(100)),
            ("Z", Some(160), Some(165)),
            ("Y", Some(200), None),
        ]);
        let gateway = Arc::new(MockGateway::new(&[]));
        let ctx = context(NetworkGraph::empty(), index, gateway.clone());
        let result = ctx.evaluate_route(&request(&["X", "Y", "Z"]));
        assert_eq!(
            result,
            Err(DecisionError::RouteOutOfOrder {
                train_id: TrainId::from("T1"),
                sections: vec![Section::from("Y")],
            })
        );
        assert_eq!(gateway.n_calls(), 0);
    }

    #[test]
    fn test_repeated_section_is_out_of_order() {
        let gateway = Arc::new(MockGateway::new(&[]));
        let ctx = context(NetworkGraph::empty(), xyz_timetable(), gateway);
        let result = ctx.evaluate_route(&request(&["X", "X", "Z"]));
        assert!(matches!(result, Err(DecisionError::RouteOutOfOrder { .. })));
    }

    #[test]
    fn test_route_not_on_schedule() {
        let gateway = Arc::new(MockGateway::new(&[]));
        let ctx = context(NetworkGraph::empty(), xyz_timetable(), gateway.clone());
        let result = ctx.evaluate_route(&request(&["X", "Q", "Z", "Q", "R"]));
        assert_eq!(
            result.unwrap_err().sections(),
            &[Section::from("Q"), Section::from("R")]
        );

        // an unknown train has no stops at all
        let mut unknown = request(&["X", "Z"]);
        unknown.train_info.train_number = TrainId::from("T9");
        assert!(matches!(
            ctx.evaluate_route(&unknown),
            Err(DecisionError::RouteNotOnSchedule { .. })
        ));
        assert_eq!(gateway.n_calls(), 0);
    }

    #[test]
    fn test_degenerate_routes() {
        let gateway = Arc::new(MockGateway::new(&[]));
        let ctx = context(NetworkGraph::empty(), xyz_timetable(), gateway);
        let single = ctx.evaluate_route(&request(&["Y"]));
        assert!(matches!(single, Err(DecisionError::DegenerateRoute { .. })));
        let empty = ctx.evaluate_route(&request(&[]));
        assert!(matches!(empty, Err(DecisionError::DegenerateRoute { .. })));
    }

    #[test]
    fn test_failed_sections_are_all_named() {
        let mut mock = MockGateway::new(&[("X", 1.0)]);
        mock.failing = vec![String::from("Y"), String::from("Z")];
        let gateway = Arc::new(mock);
        let ctx = context(NetworkGraph::empty(), xyz_timetable(), gateway.clone());
        let result = ctx.evaluate_route(&request(&["X", "Y", "Z"]));
        match result {
            Err(DecisionError::ModelUnavailable { sections, .. }) => {
                assert_eq!(sections, vec![Section::from("Y"), Section::from("Z")])
            }
            other => panic!("expected ModelUnavailable, found {other:?}"),
        }
        assert_eq!(gateway.n_calls(), 3);
    }
}
