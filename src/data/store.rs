use crate::data::miqaat::DayRecord;
use crate::data::persistence::get_data_dir;
use std::fs;
use std::path::{Path, PathBuf};

/// Terminal failures for a single load attempt. There is no retry: on any
/// of these the caller disables navigation and shows a persistent error in
/// place of the calendar.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema error: {0}")]
    Schema(String),
}

/// A successful load. `EmptyData` is valid input but degraded: the calendar
/// renders, no indicator will ever appear, and the UI shows a notice.
#[derive(Debug)]
pub enum LoadOutcome {
    Ready(Vec<DayRecord>),
    EmptyData,
}

impl LoadOutcome {
    pub fn records(self) -> Vec<DayRecord> {
        match self {
            LoadOutcome::Ready(records) => records,
            LoadOutcome::EmptyData => Vec::new(),
        }
    }

    pub fn is_empty_data(&self) -> bool {
        matches!(self, LoadOutcome::EmptyData)
    }
}

/// Loads the miqaat store from a file path or an http(s) URL.
pub fn load(source: &str) -> Result<LoadOutcome, LoadError> {
    let body = if is_url(source) {
        fetch(source)?
    } else {
        read_file(&resolve_path(source))?
    };
    parse_records(&body)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Relative sources resolve against the data directory, next to config.yaml.
fn resolve_path(source: &str) -> PathBuf {
    let path = Path::new(source);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match get_data_dir() {
        Ok(dir) => dir.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path)
        .map_err(|e| LoadError::Transport(format!("failed to read {}: {e}", path.display())))
}

fn fetch(url: &str) -> Result<String, LoadError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| LoadError::Transport(format!("request for {url} failed: {e}")))?;

    if !(200..400).contains(&response.status()) {
        return Err(LoadError::Transport(format!(
            "request for {url} returned status {}",
            response.status()
        )));
    }

    response
        .into_string()
        .map_err(|e| LoadError::Transport(format!("failed to read body of {url}: {e}")))
}

fn parse_records(body: &str) -> Result<LoadOutcome, LoadError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Err(LoadError::Schema(
            "expected a top-level JSON array of day records".to_string(),
        ));
    }
    let records: Vec<DayRecord> = serde_json::from_value(value)
        .map_err(|e| LoadError::Schema(format!("malformed day record: {e}")))?;
    if records.is_empty() {
        Ok(LoadOutcome::EmptyData)
    } else {
        Ok(LoadOutcome::Ready(records))
    }
}
