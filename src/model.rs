//! Data model mirrored from the fleet backend
//!
//! Stations and charging sessions are never constructed locally; they are
//! decoded wholesale from backend responses and replaced on every poll.

use crate::error::{Result, VoltboardError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Stations keyed by station id, exactly as reported by the backend
pub type StationMap = HashMap<String, Station>;

/// Reported state of a single charging bay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station status as labeled by the backend
    pub status: StationStatus,

    /// Occupying vehicle, present while the bay is not available
    #[serde(default)]
    pub car_id: Option<String>,

    /// Energy delivered in the current or most recent session (kWh)
    #[serde(default)]
    pub current_kwh: f64,

    /// Backend-side charging flag; carried through but not interpreted
    #[serde(default)]
    pub is_charging: bool,
}

impl Station {
    /// Whether the bay can accept a new charging command
    pub fn is_available(&self) -> bool {
        matches!(self.status, StationStatus::Available)
    }
}

/// Station status labels
///
/// The backend owns the label vocabulary; anything it sends beyond the two
/// well-known values is preserved verbatim and treated as non-available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationStatus {
    Available,
    Charging,
    Other(String),
}

impl StationStatus {
    pub fn from_label(s: &str) -> Self {
        match s {
            "available" => Self::Available,
            "charging" => Self::Charging,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::Charging => "charging",
            Self::Other(s) => s,
        }
    }
}

impl Serialize for StationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for StationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_label(&s))
    }
}

/// One historical or in-progress charging episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Backend-assigned record id
    pub id: i64,

    /// Station the session ran on
    pub station_id: String,

    /// Vehicle that charged
    pub car_id: String,

    /// Session start, always present
    #[serde(with = "backend_time")]
    pub start_time: DateTime<Utc>,

    /// Session end, absent while the session is active
    #[serde(default, with = "backend_time_opt")]
    pub end_time: Option<DateTime<Utc>>,

    /// Energy delivered over the session (kWh)
    #[serde(default)]
    pub kwh_delivered: f64,

    /// Active flag as sent by the backend; authoritative even though it is
    /// redundant with `end_time` being absent
    #[serde(default)]
    pub is_active: bool,
}

/// Parse a backend timestamp, accepting both offset-bearing RFC 3339 and the
/// naive ISO-8601 form the backend emits for UTC values.
pub fn parse_backend_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| VoltboardError::validation("timestamp", &format!("{}: {}", s, e)))
}

mod backend_time {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_backend_timestamp(&s).map_err(D::Error::custom)
    }
}

mod backend_time_opt {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            Some(s) => parse_backend_timestamp(&s)
                .map(Some)
                .map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}
