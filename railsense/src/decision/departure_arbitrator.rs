use std::fmt::Display;

use itertools::Itertools;
use railsense_core::{
    model::{PredictionFeatures, TrainId},
    util::time_ops::round2,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{DecisionContext, DecisionError, DepartureRequest};

/// which of the two conflicting trains of a [`DepartureRequest`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrainPosition {
    First,
    Second,
}

impl Display for TrainPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainPosition::First => write!(f, "Train 1"),
            TrainPosition::Second => write!(f, "Train 2"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DepartureRecommendation {
    pub recommended_train: TrainPosition,
    pub recommended_train_number: TrainId,
    pub recommended_train_type: String,
    /// combined delay of the recommended ordering
    pub combined_delay: f64,
    pub train_1_first_combined_delay: f64,
    pub train_2_first_combined_delay: f64,
    pub recommendation: String,
}

/// decides which of two trains contending for the same section should enter
/// it first.
///
/// each ordering is scored as the delay of the leading train at its stated
/// traffic plus the delay of the following train with one more train in the
/// section than the leader reported. the ordering with the lower combined
/// delay wins; on equal delays the first train is recommended.
///
/// # Errors
///
/// * [`DecisionError::InvalidRequest`] if either train info fails validation
/// * [`DecisionError::ModelUnavailable`] if any of the four predictions fails
pub fn arbitrate_departure(
    ctx: &DecisionContext,
    request: &DepartureRequest,
) -> Result<DepartureRecommendation, DecisionError> {
    let section = &request.next_section;
    let train_1 = ctx
        .features(&request.conflicting_train_1)?
        .at_section(section);
    let train_2 = ctx
        .features(&request.conflicting_train_2)?
        .at_section(section);

    // [train 1 leads, train 2 follows, train 2 leads, train 1 follows]
    let scenarios: [PredictionFeatures; 4] = [
        train_1.clone(),
        train_2.with_traffic(train_1.trains_in_section_hour.saturating_add(1)),
        train_2.clone(),
        train_1.with_traffic(train_2.trains_in_section_hour.saturating_add(1)),
    ];
    let results = scenarios
        .par_iter()
        .map(|features| ctx.predict(features))
        .collect::<Vec<_>>();
    let (delays, errors): (Vec<f64>, Vec<_>) = results
        .into_iter()
        .map(|r| r.map(|p| p.delay_minutes))
        .partition_result();
    if !errors.is_empty() {
        return Err(DecisionError::model_unavailable(
            vec![section.clone()],
            &errors,
        ));
    }

    let train_1_first = delays[0] + delays[1];
    let train_2_first = delays[2] + delays[3];
    let (position, info, train_type, combined) = if train_1_first <= train_2_first {
        (
            TrainPosition::First,
            &request.conflicting_train_1,
            train_1.train_type,
            train_1_first,
        )
    } else {
        (
            TrainPosition::Second,
            &request.conflicting_train_2,
            train_2.train_type,
            train_2_first,
        )
    };
    log::debug!(
        "departure at {section}: train 1 first {train_1_first:.2}, train 2 first {train_2_first:.2}, {position} ({}) leads",
        info.train_number
    );

    Ok(DepartureRecommendation {
        recommended_train: position,
        recommended_train_number: info.train_number.clone(),
        recommendation: format!(
            "{position} ({} {}) should depart first.",
            train_type, info.train_number
        ),
        recommended_train_type: train_type,
        combined_delay: round2(combined),
        train_1_first_combined_delay: round2(train_1_first),
        train_2_first_combined_delay: round2(train_2_first),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use railsense_core::model::Section;

    use super::*;
    use crate::{
        decision::{
            decision_context::test_support::{context, train_info, MockGateway},
            TrainInfo,
        },
        network::NetworkGraph,
        timetable::TimetableIndex,
    };

    fn request(train_1: TrainInfo, train_2: TrainInfo) -> DepartureRequest {
        DepartureRequest {
            conflicting_train_1: train_1,
            conflicting_train_2: train_2,
            next_section: Section::from("KGI"),
        }
    }

    fn traffic_gateway(per_train: f64) -> Arc<MockGateway> {
        let mut mock = MockGateway::new(&[("KGI", 2.0)]);
        mock.per_train = per_train;
        Arc::new(mock)
    }

    #[test]
    fn test_equal_traffic_recommends_train_1() {
        let gateway = traffic_gateway(1.5);
        let ctx = context(NetworkGraph::empty(), TimetableIndex::default(), gateway.clone());
        let result = ctx
            .arbitrate_departure(&request(
                train_info("100", "SBC", 5),
                train_info("200", "MYA", 5),
            ))
            .unwrap();
        assert_eq!(result.recommended_train, TrainPosition::First);
        assert_eq!(result.recommended_train_number, TrainId::from("100"));
        // (2 + 1.5 * 5) + (2 + 1.5 * 6)
        assert_eq!(result.combined_delay, 20.5);
        assert_eq!(result.train_1_first_combined_delay, result.train_2_first_combined_delay);
        assert_eq!(result.recommendation, "Train 1 (Express 100) should depart first.");
        assert_eq!(gateway.n_calls(), 4);
    }

    #[test]
    fn test_lower_combined_delay_wins() {
        // the follower is charged the leader's traffic plus one, so the
        // quieter train leads
        let ctx = context(NetworkGraph::empty(), TimetableIndex::default(), traffic_gateway(1.0));
        let result = ctx
            .arbitrate_departure(&request(
                train_info("100", "SBC", 2),
                train_info("200", "MYA", 9),
            ))
            .unwrap();
        assert_eq!(result.train_1_first_combined_delay, 2.0 + 2.0 + 2.0 + 3.0);
        assert_eq!(result.train_2_first_combined_delay, 2.0 + 9.0 + 2.0 + 10.0);
        assert_eq!(result.recommended_train, TrainPosition::First);
        assert_eq!(result.combined_delay, 9.0);
    }

    #[test]
    fn test_symmetric_under_swap() {
        let mut gateway = MockGateway::new(&[("KGI", 2.0)]);
        gateway.per_train = 0.75;
        let ctx = context(NetworkGraph::empty(), TimetableIndex::default(), Arc::new(gateway));
        let a = train_info("100", "SBC", 3);
        let b = train_info("200", "MYA", 8);
        let forward = ctx.arbitrate_departure(&request(a.clone(), b.clone())).unwrap();
        let swapped = ctx.arbitrate_departure(&request(b, a)).unwrap();
        assert_eq!(forward.recommended_train_number, swapped.recommended_train_number);
        assert_ne!(forward.recommended_train, swapped.recommended_train);
        assert_eq!(forward.combined_delay, swapped.combined_delay);
        assert_eq!(
            forward.train_1_first_combined_delay,
            swapped.train_2_first_combined_delay
        );
    }

    #[test]
    fn test_maximum_traffic_count_saturates() {
        let ctx = context(NetworkGraph::empty(), TimetableIndex::default(), traffic_gateway(0.0));
        let result = ctx
            .arbitrate_departure(&request(
                train_info("100", "SBC", u32::MAX),
                train_info("200", "MYA", u32::MAX),
            ))
            .unwrap();
        assert_eq!(result.recommended_train, TrainPosition::First);
        assert_eq!(result.combined_delay, 4.0);
    }

    #[test]
    fn test_failure_names_next_section() {
        let mut mock = MockGateway::new(&[]);
        mock.failing = vec![String::from("KGI")];
        let ctx = context(NetworkGraph::empty(), TimetableIndex::default(), Arc::new(mock));
        let result = ctx.arbitrate_departure(&request(
            train_info("100", "SBC", 1),
            train_info("200", "MYA", 1),
        ));
        match result {
            Err(DecisionError::ModelUnavailable { sections, .. }) => {
                assert_eq!(sections, vec![Section::from("KGI")])
            }
            other => panic!("expected ModelUnavailable, found {other:?}"),
        }
    }

    #[test]
    fn test_invalid_train_info() {
        let ctx = context(NetworkGraph::empty(), TimetableIndex::default(), traffic_gateway(0.0));
        let mut bad = train_info("100", "SBC", 1);
        bad.hour_of_day = 24;
        let result = ctx.arbitrate_departure(&request(train_info("200", "MYA", 1), bad));
        assert!(matches!(result, Err(DecisionError::InvalidRequest(_))));
    }
}
