//! Plain-text rendering of the dashboard surfaces
//!
//! Data binding only: these functions format registry snapshots for the
//! terminal. Station ids are sorted for stable output; the backend map
//! itself carries no order.

use crate::model::{SessionRecord, StationMap};
use chrono::{DateTime, Utc};

fn format_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render the station grid, one line per bay
pub fn render_station_grid(stations: &StationMap) -> String {
    if stations.is_empty() {
        return "No stations reported\n".to_string();
    }

    let mut ids: Vec<&String> = stations.keys().collect();
    ids.sort();

    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<12} {:<12} {:>14}\n",
        "STATION", "STATUS", "CAR", "DELIVERED"
    ));
    for id in ids {
        if let Some(station) = stations.get(id) {
            out.push_str(&format!(
                "{:<12} {:<12} {:<12} {:>10.2} kWh\n",
                id,
                station.status.label(),
                station.car_id.as_deref().unwrap_or("-"),
                station.current_kwh,
            ));
        }
    }
    out
}

/// Render the recent-session table in backend order
pub fn render_session_table(sessions: &[SessionRecord]) -> String {
    if sessions.is_empty() {
        return "No sessions recorded\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<12} {:<20} {:<20} {:>10} {:>7}\n",
        "STATION", "CAR", "STARTED", "ENDED", "KWH", "ACTIVE"
    ));
    for session in sessions {
        let ended = session
            .end_time
            .as_ref()
            .map(format_time)
            .unwrap_or_else(|| "in progress".to_string());
        out.push_str(&format!(
            "{:<10} {:<12} {:<20} {:<20} {:>10.2} {:>7}\n",
            session.station_id,
            session.car_id,
            format_time(&session.start_time),
            ended,
            session.kwh_delivered,
            if session.is_active { "yes" } else { "no" },
        ));
    }
    out
}
