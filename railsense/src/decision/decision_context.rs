use std::sync::Arc;

use railsense_core::model::{
    Prediction, PredictionError, PredictionFeatures, PredictorGateway, TrainId,
};

use super::{
    departure_arbitrator, reroute_planner, route_evaluator, speed_advisor, DecisionError,
    DecisionPolicy, DepartureRecommendation, DepartureRequest, RerouteOutcome,
    RouteEfficiencyReport, RouteRequest, SpeedAdvice, TrainInfo,
};
use crate::{network::NetworkGraph, source::TrainRoster, timetable::TimetableIndex};

/// everything a decision needs, built once at startup and never mutated.
///
/// share it between request handlers behind an `Arc`; all decision
/// operations take `&self` and hold no locks.
pub struct DecisionContext {
    pub graph: NetworkGraph,
    pub timetable: TimetableIndex,
    pub roster: TrainRoster,
    pub gateway: Arc<dyn PredictorGateway>,
    pub policy: DecisionPolicy,
}

impl DecisionContext {
    pub fn new(
        graph: NetworkGraph,
        timetable: TimetableIndex,
        roster: TrainRoster,
        gateway: Arc<dyn PredictorGateway>,
        policy: DecisionPolicy,
    ) -> DecisionContext {
        DecisionContext {
            graph,
            timetable,
            roster,
            gateway,
            policy,
        }
    }

    /// the roster train type, or the policy default for unknown trains.
    pub fn train_type(&self, train_id: &TrainId) -> String {
        self.roster
            .train_type(train_id)
            .unwrap_or(self.policy.default_train_type.as_str())
            .to_string()
    }

    /// validates a train info and resolves it into gateway features.
    pub fn features(&self, info: &TrainInfo) -> Result<PredictionFeatures, DecisionError> {
        info.validate()?;
        Ok(PredictionFeatures {
            train_type: self.train_type(&info.train_number),
            track_section: info.track_section.clone(),
            day_of_week: info.day_of_week,
            hour_of_day: info.hour_of_day,
            weather_condition: info.weather_condition,
            trains_in_section_hour: info.trains_in_section_hour,
        })
    }

    pub fn predict(&self, features: &PredictionFeatures) -> Result<Prediction, PredictionError> {
        let result = self.gateway.predict(features);
        match &result {
            Ok(p) => log::debug!(
                "prediction at {}: {:.2} min, {} congestion",
                features.track_section,
                p.delay_minutes,
                p.congestion_level
            ),
            Err(e) => log::warn!("prediction at {} failed: {e}", features.track_section),
        }
        result
    }

    pub fn evaluate_route(
        &self,
        request: &RouteRequest,
    ) -> Result<RouteEfficiencyReport, DecisionError> {
        route_evaluator::evaluate_route(self, request)
    }

    pub fn propose_reroute(&self, info: &TrainInfo) -> Result<RerouteOutcome, DecisionError> {
        reroute_planner::propose_reroute(self, info)
    }

    pub fn arbitrate_departure(
        &self,
        request: &DepartureRequest,
    ) -> Result<DepartureRecommendation, DecisionError> {
        departure_arbitrator::arbitrate_departure(self, request)
    }

    pub fn advise_speed(&self, info: &TrainInfo) -> Result<SpeedAdvice, DecisionError> {
        speed_advisor::advise_speed(self, info)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! shared fixtures for decision tests
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use railsense_core::model::{
        CongestionLevel, DayOfWeek, Prediction, PredictionError, PredictionFeatures,
        PredictorGateway, Section, TrainId, Weather,
    };

    use super::DecisionContext;
    use crate::{
        decision::{DecisionPolicy, TrainInfo},
        network::NetworkGraph,
        source::TrainRoster,
        timetable::TimetableIndex,
    };

    /// gateway returning a fixed delay per section, plus an optional per-train
    /// traffic term, and counting its calls.
    pub struct MockGateway {
        pub delays: HashMap<String, f64>,
        pub per_train: f64,
        pub failing: Vec<String>,
        pub calls: AtomicUsize,
    }

    impl MockGateway {
        pub fn new(delays: &[(&str, f64)]) -> MockGateway {
            MockGateway {
                delays: delays.iter().map(|(s, d)| (s.to_string(), *d)).collect(),
                per_train: 0.0,
                failing: vec![],
                calls: AtomicUsize::new(0),
            }
        }

        pub fn n_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PredictorGateway for MockGateway {
        fn predict(&self, features: &PredictionFeatures) -> Result<Prediction, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let section = features.track_section.as_str();
            if self.failing.iter().any(|f| f == section) {
                return Err(PredictionError::ModelUnavailable(format!("mock failure at {section}")));
            }
            let base = self.delays.get(section).copied().unwrap_or_default();
            Ok(Prediction {
                delay_minutes: base + self.per_train * features.trains_in_section_hour as f64,
                congestion_level: CongestionLevel::Low,
                is_anomaly: false,
            })
        }
    }

    pub fn context(
        graph: NetworkGraph,
        timetable: TimetableIndex,
        gateway: Arc<MockGateway>,
    ) -> DecisionContext {
        DecisionContext::new(
            graph,
            timetable,
            TrainRoster::default(),
            gateway,
            DecisionPolicy::default(),
        )
    }

    pub fn train_info(train: &str, section: &str, traffic: u32) -> TrainInfo {
        TrainInfo {
            train_number: TrainId::from(train),
            track_section: Section::from(section),
            day_of_week: DayOfWeek::Monday,
            hour_of_day: 10,
            weather_condition: Weather::Clear,
            trains_in_section_hour: traffic,
        }
    }
}
