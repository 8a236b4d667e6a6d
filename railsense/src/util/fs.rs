use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

/// helper function to "mkdir -p path" - make all directories along a path
pub fn create_dirs<P>(path: P) -> Result<(), String>
where
    P: AsRef<Path>,
{
    let dirspath = path.as_ref();
    if dirspath.as_os_str().is_empty() || dirspath.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dirspath).map_err(|e| {
        format!(
            "error building output directory '{}': {e}",
            dirspath.to_str().unwrap_or_default()
        )
    })
}

/// writes a value as pretty-printed JSON (two-space indentation), creating
/// parent directories as needed. returns false without writing when the file
/// exists and overwrite is not set.
pub fn write_json_pretty<T>(value: &T, filepath: &Path, overwrite: bool) -> Result<bool, String>
where
    T: Serialize + ?Sized,
{
    if filepath.exists() && !overwrite {
        log::warn!(
            "not overwriting existing file '{}'",
            filepath.to_str().unwrap_or_default()
        );
        return Ok(false);
    }
    if let Some(parent) = filepath.parent() {
        create_dirs(parent)?;
    }
    let file = File::create(filepath).map_err(|e| format!("failure creating file: {e}"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| format!("failure serializing JSON: {e}"))?;
    writer
        .flush()
        .map_err(|e| format!("failure flushing JSON: {e}"))?;
    Ok(true)
}

/// appends rows to a CSV file. the header row is only written when the file
/// is new or empty.
pub fn append_csv_rows<I>(rows: I, filepath: &Path) -> Result<(), String>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    if let Some(parent) = filepath.parent() {
        create_dirs(parent)?;
    }
    let has_content = std::fs::metadata(filepath)
        .map(|m| m.len() > 0)
        .unwrap_or(false);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(filepath)
        .map_err(|e| format!("failure opening file for append: {e}"))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(!has_content)
        .from_writer(file);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| format!("failure writing CSV row: {e}"))?;
    }
    writer
        .flush()
        .map_err(|e| format!("failure flushing CSV writer: {e}"))
}
