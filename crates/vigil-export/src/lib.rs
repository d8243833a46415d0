//! Export/import file codec for vigil.
//!
//! The file is a JSON object `{exportDate, currentDeadline, version}` with
//! camelCase field names, format version `"1.0"`. Pure and synchronous; no
//! HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let file = vigil_export::parse(r#"{"currentDeadline": {...}}"#).unwrap();
//! println!("exported {}", file.current_deadline.name);
//! ```

pub mod error;

pub use error::{Error, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::record::DeadlineRecord;

/// The format version written by [`serialize`] and accepted by [`parse`].
pub const FORMAT_VERSION: &str = "1.0";

// ─── File shape ──────────────────────────────────────────────────────────────

/// The parsed contents of an export file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
  pub export_date:      DateTime<Utc>,
  pub current_deadline: DeadlineRecord,
  #[serde(default = "default_version")]
  pub version:          String,
}

fn default_version() -> String { FORMAT_VERSION.to_string() }

// ─── Public API ──────────────────────────────────────────────────────────────

/// Serialize `record` as a pretty-printed export file stamped with `now`.
pub fn serialize(record: &DeadlineRecord, now: DateTime<Utc>) -> Result<String> {
  let file = ExportFile {
    export_date:      now,
    current_deadline: record.clone(),
    version:          FORMAT_VERSION.to_string(),
  };
  Ok(serde_json::to_string_pretty(&file)?)
}

/// Parse an export file.
///
/// A missing `currentDeadline` key is reported as [`Error::MissingDeadline`]
/// rather than a generic parse failure, so importers can reject it before
/// attempting any write. A `version` other than [`FORMAT_VERSION`] is
/// rejected; a missing one is tolerated and defaulted.
pub fn parse(input: &str) -> Result<ExportFile> {
  let value: serde_json::Value = serde_json::from_str(input)?;

  if value.get("currentDeadline").is_none() {
    return Err(Error::MissingDeadline);
  }

  let file: ExportFile = serde_json::from_value(value)?;
  if file.version != FORMAT_VERSION {
    return Err(Error::UnsupportedVersion(file.version));
  }
  Ok(file)
}

/// Suggested download filename for an export taken at `now`,
/// e.g. `deadline-countdown-2025-06-01.json`.
pub fn export_filename(now: DateTime<Utc>) -> String {
  format!("deadline-countdown-{}.json", now.format("%Y-%m-%d"))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};

  use super::*;

  fn record() -> DeadlineRecord {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    DeadlineRecord {
      name:        "Challenge".into(),
      description: "desc".into(),
      start_date:  now,
      end_date:    now + Duration::days(7),
      is_active:   true,
      created_at:  Some(now),
      updated_at:  Some(now),
    }
  }

  #[test]
  fn serialize_then_parse_preserves_the_record() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0).unwrap();
    let out = serialize(&record(), now).unwrap();
    let file = parse(&out).unwrap();
    assert_eq!(file.version, FORMAT_VERSION);
    assert_eq!(file.export_date, now);
    assert_eq!(file.current_deadline, record());
  }

  #[test]
  fn wire_fields_are_camel_case() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0).unwrap();
    let out = serialize(&record(), now).unwrap();
    assert!(out.contains("\"exportDate\""));
    assert!(out.contains("\"currentDeadline\""));
    assert!(out.contains("\"startDate\""));
    assert!(out.contains("\"isActive\""));
  }

  #[test]
  fn missing_current_deadline_is_a_distinct_error() {
    let err = parse(r#"{"exportDate": "2025-06-01T00:00:00Z", "version": "1.0"}"#)
      .unwrap_err();
    assert!(matches!(err, Error::MissingDeadline));
  }

  #[test]
  fn malformed_json_reports_the_parse_reason() {
    let err = parse("{not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    assert!(!err.to_string().is_empty());
  }

  #[test]
  fn unknown_version_is_rejected() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0).unwrap();
    let out = serialize(&record(), now).unwrap().replace("\"1.0\"", "\"9.9\"");
    let err = parse(&out).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion(v) if v == "9.9"));
  }

  #[test]
  fn missing_version_defaults() {
    let input = r#"{
      "exportDate": "2025-06-01T00:00:00Z",
      "currentDeadline": {
        "name": "Challenge",
        "startDate": "2025-06-01T00:00:00Z",
        "endDate": "2025-06-08T00:00:00Z",
        "isActive": true
      }
    }"#;
    let file = parse(input).unwrap();
    assert_eq!(file.version, FORMAT_VERSION);
    assert_eq!(file.current_deadline.description, "");
  }

  #[test]
  fn filename_is_dated() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0).unwrap();
    assert_eq!(export_filename(now), "deadline-countdown-2025-06-02.json");
  }
}
