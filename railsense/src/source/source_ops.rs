use std::path::Path;

use serde::de::DeserializeOwned;

use super::{roster::RosterFile, SourceError, TimetableRecord, TrainRoster};

/// reads a JSON document from disk. a file that does not exist is reported as
/// missing input data, which callers treat as fatal.
pub fn read_json<T>(path: &Path) -> Result<T, SourceError>
where
    T: DeserializeOwned,
{
    if !path.is_file() {
        return Err(SourceError::InputDataMissing {
            path: path.to_owned(),
        });
    }
    let contents = std::fs::read(path).map_err(|e| SourceError::ReadError {
        path: path.to_owned(),
        message: e.to_string(),
    })?;
    serde_json::from_slice::<T>(&contents).map_err(|e| SourceError::ReadError {
        path: path.to_owned(),
        message: format!("failed to deserialize from JSON: {e}"),
    })
}

/// reads the timetable source, a JSON array of stop records.
pub fn read_timetable(path: &Path) -> Result<Vec<TimetableRecord>, SourceError> {
    let records: Vec<TimetableRecord> = read_json(path)?;
    log::info!(
        "loaded {} timetable records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// reads the train roster source.
pub fn read_roster(path: &Path) -> Result<TrainRoster, SourceError> {
    let file: RosterFile = read_json(path)?;
    let roster = TrainRoster::from(file);
    log::info!("loaded {} roster trains from {}", roster.len(), path.display());
    Ok(roster)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_file_is_input_data_missing() {
        let path = std::env::temp_dir().join("railsense-no-such-roster.json");
        match read_roster(&path) {
            Err(SourceError::InputDataMissing { path: p }) => assert_eq!(p, path),
            other => panic!("expected InputDataMissing, found {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file_is_read_error() {
        let path = std::env::temp_dir().join(format!(
            "railsense-malformed-timetable-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();
        let result = read_timetable(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(SourceError::ReadError { .. })));
    }
}
