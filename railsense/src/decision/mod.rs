mod decision_context;
mod decision_error;
mod decision_policy;
mod request;

pub mod departure_arbitrator;
pub mod reroute_planner;
pub mod route_evaluator;
pub mod speed_advisor;

pub use decision_context::DecisionContext;
pub use decision_error::{DecisionError, DecisionErrorRecord};
pub use decision_policy::DecisionPolicy;
pub use departure_arbitrator::{DepartureRecommendation, TrainPosition};
pub use request::{DepartureRequest, RouteRequest, TrainInfo};
pub use reroute_planner::{ExcludedOption, RerouteOutcome, RerouteProposal, RouteOption};
pub use route_evaluator::RouteEfficiencyReport;
pub use speed_advisor::{SpeedAction, SpeedAdvice};
