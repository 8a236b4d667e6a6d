use std::collections::{HashMap, HashSet};

use railsense_core::model::TrainId;
use serde::{Deserialize, Serialize};

/// one train of the roster source.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RosterRecord {
    /// train number; records without one cannot be joined to a timetable and are skipped
    #[serde(alias = "number", default)]
    pub train_id: Option<TrainId>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(rename = "type", default)]
    pub train_type: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub zone: Option<String>,
    pub train_type: Option<String>,
}

/// the roster file is either a plain list of records or a GeoJSON-style
/// feature collection with the record fields stored in `properties`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RosterFile {
    Records(Vec<RosterRecord>),
    FeatureCollection { features: Vec<RosterFeature> },
}

#[derive(Deserialize)]
pub(crate) struct RosterFeature {
    properties: RosterRecord,
}

/// lookup from train number to zone and train type.
#[derive(Clone, Debug, Default)]
pub struct TrainRoster(HashMap<TrainId, RosterEntry>);

impl TrainRoster {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, train_id: &TrainId) -> Option<&RosterEntry> {
        self.0.get(train_id)
    }

    /// the train type recorded for this train, if the roster knows it.
    pub fn train_type(&self, train_id: &TrainId) -> Option<&str> {
        self.0.get(train_id).and_then(|e| e.train_type.as_deref())
    }

    /// the set of trains whose zone is one of the target zones.
    pub fn population(&self, target_zones: &[String]) -> HashSet<TrainId> {
        self.0
            .iter()
            .filter(|(_, entry)| match &entry.zone {
                Some(zone) => target_zones.iter().any(|z| z == zone),
                None => false,
            })
            .map(|(train_id, _)| train_id.clone())
            .collect()
    }
}

impl From<Vec<RosterRecord>> for TrainRoster {
    /// later records for the same train number replace earlier ones.
    fn from(records: Vec<RosterRecord>) -> Self {
        let lookup = records
            .into_iter()
            .filter_map(|r| {
                let train_id = r.train_id?;
                let entry = RosterEntry {
                    zone: r.zone,
                    train_type: r.train_type,
                };
                Some((train_id, entry))
            })
            .collect();
        TrainRoster(lookup)
    }
}

impl From<RosterFile> for TrainRoster {
    fn from(file: RosterFile) -> Self {
        match file {
            RosterFile::Records(records) => TrainRoster::from(records),
            RosterFile::FeatureCollection { features } => {
                TrainRoster::from(features.into_iter().map(|f| f.properties).collect::<Vec<_>>())
            }
        }
    }
}
