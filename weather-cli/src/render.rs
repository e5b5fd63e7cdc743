//! Plain-text rendering of fetch outcomes.

use weather_core::{FetchOutcome, WeatherSnapshot};

pub const LOADING: &str = "Loading...";

/// Text for an outcome, or `None` when there is nothing to show yet.
pub fn outcome(outcome: &FetchOutcome) -> Option<String> {
    match outcome {
        FetchOutcome::Idle => None,
        FetchOutcome::Pending => Some(LOADING.to_string()),
        FetchOutcome::Succeeded(s) => Some(snapshot(s)),
        FetchOutcome::Failed(message) => Some(message.clone()),
    }
}

pub fn snapshot(s: &WeatherSnapshot) -> String {
    let loc = &s.location;
    let cur = &s.current;

    let mut lines = vec![
        format!("{}, {}", loc.name, loc.country),
        format!("{} °C  {}", cur.temperature_celsius, cur.condition_text),
        format!("  icon:       {}", cur.large_icon_url()),
        format!("  humidity:   {}%", cur.humidity_percent),
        format!("  wind:       {} km/h", cur.wind_kph),
        format!("  UV:         {}", cur.uv_index),
        format!("  precip:     {} mm", cur.precipitation_mm),
    ];

    match (loc.local_clock(), loc.local_date()) {
        (Some(clock), Some(date)) => {
            lines.push(format!("  local time: {clock}"));
            lines.push(format!("  local date: {date}"));
        }
        _ => lines.push(format!("  local time: {}", loc.local_time)),
    }

    lines.join("\n")
}
