use serde::{Deserialize, Deserializer, Serialize};

/// a track segment or station code. the unit node of the rail network graph.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Section(pub String);

impl Section {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Section {
    fn from(value: &str) -> Self {
        Section(value.to_string())
    }
}

/// a train number as published in the timetable and roster sources.
///
/// source files are inconsistent about whether train numbers are strings or
/// integers, so deserialization accepts both and normalizes to the string form.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(pub String);

impl TrainId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrainId {
    fn from(value: &str) -> Self {
        TrainId(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrainId {
    Text(String),
    Integer(i64),
}

impl<'de> Deserialize<'de> for TrainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTrainId::deserialize(deserializer)? {
            RawTrainId::Text(s) => Ok(TrainId(s.trim().to_string())),
            RawTrainId::Integer(i) => Ok(TrainId(i.to_string())),
        }
    }
}
