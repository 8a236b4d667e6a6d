use railsense_core::model::CongestionLevel;
use serde::{Deserialize, Serialize};

/// tunable thresholds consumed by the decision operations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DecisionPolicy {
    /// a predicted delay above this many minutes, with Low congestion, advises increasing speed
    pub increase_speed_delay_minutes: f64,
    /// congestion at or above this level advises decreasing speed
    pub decrease_speed_congestion: CongestionLevel,
    /// train type used for trains missing from the roster
    pub default_train_type: String,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            increase_speed_delay_minutes: 15.0,
            decrease_speed_congestion: CongestionLevel::High,
            default_train_type: String::from("Express"),
        }
    }
}
