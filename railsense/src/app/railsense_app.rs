use std::{path::Path, sync::Arc};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use super::{context_builder, network, AppError, RailsenseConfig, RequestBatch};
use crate::{
    decision::{DecisionContext, DepartureRequest, RouteRequest, SpeedAdvice, TrainInfo},
    gateway::PredictionLog,
};

/// Command line tool for building rail network maps and making congestion-aware
/// dispatch decisions against a timetable
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct RailsenseApp {
    #[command(subcommand)]
    pub op: RailsenseOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum RailsenseOperation {
    /// build the section network graph from the timetable and write it as a network map
    BuildNetwork {
        /// TOML configuration file naming the roster and timetable sources
        #[arg(short, long)]
        configuration_file: String,

        /// location on disk to write the network map JSON
        #[arg(short, long)]
        output_file: String,

        /// also write a build summary next to the network map
        #[arg(long)]
        summary: bool,
    },
    /// compare the scheduled and predicted travel time of a route
    EvaluateRoute {
        #[arg(short, long)]
        configuration_file: String,

        /// JSON file with one route request or an array of them
        #[arg(short, long)]
        request_file: String,

        /// write responses here instead of stdout
        #[arg(short, long)]
        output_file: Option<String>,
    },
    /// compare the current section against its one-hop alternatives
    ProposeReroute {
        #[arg(short, long)]
        configuration_file: String,

        /// JSON file with one train info or an array of them
        #[arg(short, long)]
        request_file: String,

        #[arg(short, long)]
        output_file: Option<String>,
    },
    /// recommend which of two conflicting trains should depart first
    ArbitrateDeparture {
        #[arg(short, long)]
        configuration_file: String,

        /// JSON file with one departure request or an array of them
        #[arg(short, long)]
        request_file: String,

        #[arg(short, long)]
        output_file: Option<String>,
    },
    /// predict delay and congestion for a train and recommend a speed action
    Predict {
        #[arg(short, long)]
        configuration_file: String,

        /// JSON file with one train info or an array of them
        #[arg(short, long)]
        request_file: String,

        #[arg(short, long)]
        output_file: Option<String>,

        /// append each successful prediction to this CSV log
        #[arg(long)]
        log_file: Option<String>,
    },
}

impl RailsenseOperation {
    pub fn run(&self) -> Result<(), AppError> {
        match self {
            RailsenseOperation::BuildNetwork {
                configuration_file,
                output_file,
                summary,
            } => {
                let config = load_config(configuration_file)?;
                network::run(&config, Path::new(output_file), *summary)
            }
            RailsenseOperation::EvaluateRoute {
                configuration_file,
                request_file,
                output_file,
            } => {
                let ctx = load_context(configuration_file)?;
                let batch = RequestBatch::<RouteRequest>::read(Path::new(request_file))?;
                let responses = batch.run(|r| ctx.evaluate_route(r));
                responses.write(output_file.as_ref().map(Path::new))
            }
            RailsenseOperation::ProposeReroute {
                configuration_file,
                request_file,
                output_file,
            } => {
                let ctx = load_context(configuration_file)?;
                let batch = RequestBatch::<TrainInfo>::read(Path::new(request_file))?;
                let responses = batch.run(|r| ctx.propose_reroute(r));
                responses.write(output_file.as_ref().map(Path::new))
            }
            RailsenseOperation::ArbitrateDeparture {
                configuration_file,
                request_file,
                output_file,
            } => {
                let ctx = load_context(configuration_file)?;
                let batch = RequestBatch::<DepartureRequest>::read(Path::new(request_file))?;
                let responses = batch.run(|r| ctx.arbitrate_departure(r));
                responses.write(output_file.as_ref().map(Path::new))
            }
            RailsenseOperation::Predict {
                configuration_file,
                request_file,
                output_file,
                log_file,
            } => {
                let ctx = load_context(configuration_file)?;
                let batch = RequestBatch::<TrainInfo>::read(Path::new(request_file))?;
                let responses = batch.run(|r| ctx.advise_speed(r));
                if let Some(log_file) = log_file {
                    let rows = responses
                        .successes()
                        .into_iter()
                        .map(SpeedAdvice::log_row)
                        .collect::<Vec<_>>();
                    PredictionLog::new(Path::new(log_file))
                        .append(&rows)
                        .map_err(|message| AppError::WriteError {
                            path: Path::new(log_file).to_owned(),
                            message,
                        })?;
                }
                responses.write(output_file.as_ref().map(Path::new))
            }
        }
    }
}

fn load_config(configuration_file: &str) -> Result<RailsenseConfig, AppError> {
    let config = RailsenseConfig::from_file(configuration_file)?;
    config.configure_thread_pool();
    Ok(config)
}

fn load_context(configuration_file: &str) -> Result<Arc<DecisionContext>, AppError> {
    let config = load_config(configuration_file)?;
    let ctx = context_builder::build_context(&config)?;
    Ok(Arc::new(ctx))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let app = RailsenseApp::try_parse_from([
            "railsense",
            "build-network",
            "-c",
            "railsense.toml",
            "-o",
            "network_map.json",
            "--summary",
        ])
        .unwrap();
        assert!(matches!(
            app.op,
            RailsenseOperation::BuildNetwork { summary: true, .. }
        ));

        let app = RailsenseApp::try_parse_from([
            "railsense",
            "predict",
            "-c",
            "railsense.toml",
            "-r",
            "request.json",
            "--log-file",
            "predictions.csv",
        ])
        .unwrap();
        match app.op {
            RailsenseOperation::Predict {
                log_file,
                output_file,
                ..
            } => {
                assert_eq!(log_file.as_deref(), Some("predictions.csv"));
                assert_eq!(output_file, None);
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_missing_configuration_file() {
        let op = RailsenseOperation::EvaluateRoute {
            configuration_file: String::from("/no/such/railsense.toml"),
            request_file: String::from("request.json"),
            output_file: None,
        };
        assert!(matches!(op.run(), Err(AppError::InvalidConfiguration(_))));
    }
}
