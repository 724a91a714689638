//! Data models for the Clinicals console.
//!
//! These mirror the JSON documents exchanged with the patient services API.
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Something a list view can filter with a free-text search.
pub trait Searchable {
    /// Returns `true` if any searchable field contains `needle`.
    ///
    /// `needle` is expected to already be lowercased.
    fn matches(&self, needle: &str) -> bool;
}

/// A patient as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Server-assigned identifier.
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
}

impl Patient {
    /// Label used by the patient selector on the clinical data form.
    pub fn display_label(&self) -> String {
        format!("{} {} (Age: {})", self.first_name, self.last_name, self.age)
    }
}

impl Searchable for Patient {
    fn matches(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
            || self.age.to_string().contains(needle)
    }
}

/// Body for creating or replacing a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
}

/// A clinical measurement as returned by the backend.
///
/// The owning patient is never part of this representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalData {
    pub id: i64,
    pub component_name: String,
    pub component_value: String,
    #[serde(default)]
    pub measured_date_time: Option<MeasuredAt>,
}

impl ClinicalData {
    /// The measurement time formatted for the list table.
    pub fn measured_display(&self) -> String {
        self.measured_date_time
            .as_ref()
            .map(MeasuredAt::display)
            .unwrap_or_default()
    }
}

impl Searchable for ClinicalData {
    fn matches(&self, needle: &str) -> bool {
        self.component_name.to_lowercase().contains(needle)
            || self.component_value.to_lowercase().contains(needle)
            || self.id.to_string().contains(needle)
    }
}

/// Body for the generic clinical data create and for updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalDataPayload {
    pub component_name: String,
    pub component_value: String,
}

/// Body for `clinicaldata/save`, the only create that links a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClinicalData {
    pub component_name: String,
    pub component_value: String,
    pub patient_id: i64,
}

/// Server timestamp of a measurement.
///
/// Depending on how the backend serializes dates this is either epoch
/// milliseconds or an ISO-8601 date-time string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasuredAt {
    Millis(i64),
    Text(String),
}

impl MeasuredAt {
    /// Formats the timestamp as `YYYY-MM-DD HH:MM:SS` in local time.
    ///
    /// Strings that cannot be parsed are shown as received.
    pub fn display(&self) -> String {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        match self {
            MeasuredAt::Millis(millis) => {
                let nanos = i128::from(*millis) * 1_000_000;
                match OffsetDateTime::from_unix_timestamp_nanos(nanos) {
                    Ok(utc) => {
                        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
                        utc.to_offset(offset)
                            .format(format)
                            .unwrap_or_else(|_| millis.to_string())
                    }
                    Err(_) => millis.to_string(),
                }
            }
            MeasuredAt::Text(text) => parse_local_date_time(text)
                .and_then(|dt| dt.format(format).ok())
                .unwrap_or_else(|| text.clone()),
        }
    }
}

/// Parses `YYYY-MM-DDTHH:MM[:SS][.fraction]`, ignoring any fraction or offset.
fn parse_local_date_time(text: &str) -> Option<PrimitiveDateTime> {
    let trimmed = text.split(['.', 'Z', '+']).next().unwrap_or(text);
    let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let without_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    PrimitiveDateTime::parse(trimmed, with_seconds)
        .or_else(|_| PrimitiveDateTime::parse(trimmed, without_seconds))
        .ok()
}
