use crate::{
  error::{FileSigError, FileSigResult},
  trace::*,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::{
  fs,
  path::{Path, PathBuf},
};

/// Tool tag written into the `created_by` field
const CREATED_BY: &str = "filesig";

/// Advisory record of when a signature was produced, stored as JSON next to
/// the signature file. It is not cryptographically bound to the signature
/// and verification never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampRecord {
  /// ISO 8601 local time with UTC offset
  pub timestamp: String,
  /// Whole seconds since the Unix epoch
  pub unix_time: i64,
  /// UTC offset label, e.g. `+07:00`
  pub timezone: String,
  /// Producing tool tag
  pub created_by: String,
}

impl TimestampRecord {
  /// Captures the current local time.
  pub fn now() -> Self {
    let now = Local::now();
    Self {
      timestamp: now.to_rfc3339(),
      unix_time: now.timestamp(),
      timezone: now.offset().to_string(),
      created_by: CREATED_BY.to_string(),
    }
  }

  /// Writes the record as pretty-printed JSON.
  pub fn save(&self, path: impl AsRef<Path>) -> FileSigResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(self)
      .map_err(|e| FileSigError::Io(format!("{}: {e}", path.display())))?;
    fs::write(path, json).map_err(|e| FileSigError::from_io(path, e))?;
    debug!(path = %path.display(), "saved timestamp record");
    Ok(())
  }

  /// Reads a record written by [`TimestampRecord::save`].
  pub fn load(path: impl AsRef<Path>) -> FileSigResult<Self> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| FileSigError::from_io(path, e))?;
    serde_json::from_str(&json).map_err(|e| FileSigError::Io(format!("{}: {e}", path.display())))
  }
}

/// Timestamp path for a signature file: the final extension replaced with
/// `timestamp.json` (`document.txt.sig` becomes `document.txt.timestamp.json`).
pub fn timestamp_path_for(signature_path: impl AsRef<Path>) -> PathBuf {
  signature_path.as_ref().with_extension("timestamp.json")
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::DateTime;

  #[test]
  fn test_record_fields() {
    let record = TimestampRecord::now();
    assert_eq!(record.created_by, "filesig");
    assert!(record.unix_time > 0);

    let parsed = DateTime::parse_from_rfc3339(&record.timestamp).unwrap();
    assert_eq!(parsed.timestamp(), record.unix_time);
    assert_eq!(parsed.offset().to_string(), record.timezone);
  }

  #[test]
  fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt.timestamp.json");

    let record = TimestampRecord::now();
    record.save(&path).unwrap();

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"unix_time\""));
    assert!(json.contains("\"created_by\": \"filesig\""));

    let loaded = TimestampRecord::load(&path).unwrap();
    assert_eq!(loaded, record);
  }

  #[test]
  fn test_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
      TimestampRecord::load(dir.path().join("nope.json")),
      Err(FileSigError::NotFound(_))
    ));

    let path = dir.path().join("broken.json");
    fs::write(&path, b"{ not json").unwrap();
    assert!(matches!(
      TimestampRecord::load(&path),
      Err(FileSigError::Io(_))
    ));
  }

  #[test]
  fn test_timestamp_path_for() {
    assert_eq!(
      timestamp_path_for("document.txt.sig"),
      PathBuf::from("document.txt.timestamp.json")
    );
    assert_eq!(
      timestamp_path_for("document.txt.b64"),
      PathBuf::from("document.txt.timestamp.json")
    );
    assert_eq!(
      timestamp_path_for("bare"),
      PathBuf::from("bare.timestamp.json")
    );
  }
}
