use std::path::Path;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use super::AppError;
use crate::{decision::DecisionPolicy, gateway::PredictorConfig, network::NetworkSourceConfig};

/// top-level TOML configuration shared by every subcommand.
///
/// ```toml
/// parallelism = 4
///
/// [sources]
/// trains_file = "data/trains.json"
/// schedules_file = "data/schedules.json"
/// target_zones = ["SR", "SWR"]
///
/// [network]
/// type = "timetable"
///
/// [predictor]
/// type = "heuristic"
///
/// [policy]
/// increase_speed_delay_minutes = 15.0
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RailsenseConfig {
    pub sources: SourceConfig,
    #[serde(default)]
    pub network: NetworkSourceConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub policy: DecisionPolicy,
    /// size of the worker pool used for gateway calls and batch requests.
    /// defaults to one worker per core.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SourceConfig {
    /// train roster, a JSON array or feature collection
    pub trains_file: String,
    /// timetable, a JSON array of stop records
    pub schedules_file: String,
    #[serde(default = "default_target_zones")]
    pub target_zones: Vec<String>,
}

fn default_target_zones() -> Vec<String> {
    vec![String::from("SR"), String::from("SWR")]
}

impl RailsenseConfig {
    pub fn from_file(configuration_file: &str) -> Result<RailsenseConfig, AppError> {
        let filepath = Path::new(configuration_file);
        if !filepath.is_file() {
            return Err(AppError::InvalidConfiguration(format!(
                "configuration file '{configuration_file}' does not exist"
            )));
        }
        let config = Config::builder()
            .add_source(File::from(filepath))
            .build()
            .map_err(|e| {
                let msg = format!("file '{configuration_file}' produced error: {e}");
                AppError::InvalidConfiguration(msg)
            })?;
        let railsense_config = config.try_deserialize::<RailsenseConfig>().map_err(|e| {
            let msg = format!("error reading configuration in '{configuration_file}': {e}");
            AppError::InvalidConfiguration(msg)
        })?;
        railsense_config.validate()?;
        Ok(railsense_config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.parallelism == Some(0) {
            return Err(AppError::InvalidConfiguration(String::from(
                "parallelism must be at least 1",
            )));
        }
        if self.sources.target_zones.is_empty() && self.network == NetworkSourceConfig::Timetable
        {
            return Err(AppError::InvalidConfiguration(String::from(
                "sources.target_zones must name at least one zone",
            )));
        }
        Ok(())
    }

    /// sizes the global rayon pool. only the first call in a process has effect.
    pub fn configure_thread_pool(&self) {
        let Some(n) = self.parallelism else {
            return;
        };
        match rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
            Ok(()) => log::debug!("rayon pool configured with {n} threads"),
            Err(e) => log::warn!("rayon pool already initialized, ignoring parallelism={n}: {e}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use railsense_core::model::CongestionLevel;

    fn write_config(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "railsense-config-{name}-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let path = write_config(
            "minimal",
            r#"
            [sources]
            trains_file = "trains.json"
            schedules_file = "schedules.json"
            "#,
        );
        let config = RailsenseConfig::from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.sources.target_zones, vec!["SR", "SWR"]);
        assert_eq!(config.network, NetworkSourceConfig::Timetable);
        assert_eq!(config.policy, DecisionPolicy::default());
        assert_eq!(config.predictor, PredictorConfig::default());
        assert_eq!(config.parallelism, None);
    }

    #[test]
    fn test_full_config() {
        let path = write_config(
            "full",
            r#"
            parallelism = 2

            [sources]
            trains_file = "trains.json"
            schedules_file = "schedules.json"
            target_zones = ["CR"]

            [network]
            type = "file"
            path = "network_map.json"

            [predictor]
            type = "heuristic"
            peak_delay_minutes = 4.0
            unavailable_sections = ["XYZ"]

            [policy]
            increase_speed_delay_minutes = 10.0
            decrease_speed_congestion = "Medium"
            "#,
        );
        let config = RailsenseConfig::from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.parallelism, Some(2));
        assert_eq!(config.sources.target_zones, vec!["CR"]);
        assert_eq!(
            config.network,
            NetworkSourceConfig::File {
                path: String::from("network_map.json")
            }
        );
        match &config.predictor {
            PredictorConfig::Heuristic(conf) => {
                assert_eq!(conf.peak_delay_minutes, 4.0);
                assert_eq!(conf.unavailable_sections, vec![String::from("XYZ")]);
            }
        }
        assert_eq!(config.policy.increase_speed_delay_minutes, 10.0);
        assert_eq!(config.policy.decrease_speed_congestion, CongestionLevel::Medium);
        assert_eq!(config.policy.default_train_type, "Express");
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let path = write_config(
            "zero",
            r#"
            parallelism = 0
            [sources]
            trains_file = "trains.json"
            schedules_file = "schedules.json"
            "#,
        );
        let result = RailsenseConfig::from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(AppError::InvalidConfiguration(_))));
    }
}
