use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of the provider's `location.localtime` field.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    /// Verbatim provider string, `YYYY-MM-DD HH:MM`.
    pub local_time: String,
}

impl Location {
    /// Date half of `local_time`.
    pub fn local_date(&self) -> Option<&str> {
        self.local_time.split_once(' ').map(|(date, _)| date)
    }

    /// Clock half of `local_time`.
    pub fn local_clock(&self) -> Option<&str> {
        self.local_time.split_once(' ').map(|(_, clock)| clock)
    }

    pub fn local_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.local_time, LOCAL_TIME_FORMAT).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_celsius: f64,
    pub humidity_percent: u8,
    pub wind_kph: f64,
    pub uv_index: f64,
    pub precipitation_mm: f64,
    pub condition_text: String,
    /// Usually protocol relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`.
    pub condition_icon_url: String,
}

impl CurrentConditions {
    /// Icon url with an `https:` scheme when the provider sent a protocol-relative one.
    pub fn icon_https_url(&self) -> String {
        if self.condition_icon_url.starts_with("//") {
            format!("https:{}", self.condition_icon_url)
        } else {
            self.condition_icon_url.clone()
        }
    }

    /// The 128x128 variant of the condition icon.
    pub fn large_icon_url(&self) -> String {
        self.icon_https_url().replace("64x64", "128x128")
    }
}

/// Location plus current conditions, as returned by one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn location(local_time: &str) -> Location {
        Location {
            name: "London".into(),
            country: "United Kingdom".into(),
            local_time: local_time.into(),
        }
    }

    fn conditions(icon: &str) -> CurrentConditions {
        CurrentConditions {
            temperature_celsius: 5.0,
            humidity_percent: 80,
            wind_kph: 10.0,
            uv_index: 1.0,
            precipitation_mm: 0.0,
            condition_text: "Cloudy".into(),
            condition_icon_url: icon.into(),
        }
    }

    #[test]
    fn local_time_splits_into_date_and_clock() {
        let loc = location("2024-01-01 10:00");
        assert_eq!(loc.local_date(), Some("2024-01-01"));
        assert_eq!(loc.local_clock(), Some("10:00"));
    }

    #[test]
    fn local_time_parses_single_digit_hour() {
        let dt = location("2024-03-07 9:05").local_datetime().expect("must parse");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 7));
        assert_eq!((dt.hour(), dt.minute()), (9, 5));
    }

    #[test]
    fn unparsable_local_time_yields_none() {
        let loc = location("soon");
        assert_eq!(loc.local_date(), None);
        assert!(loc.local_datetime().is_none());
    }

    #[test]
    fn protocol_relative_icon_gets_https_scheme() {
        let c = conditions("//cdn.weatherapi.com/weather/64x64/day/113.png");
        assert_eq!(c.icon_https_url(), "https://cdn.weatherapi.com/weather/64x64/day/113.png");
        assert_eq!(c.large_icon_url(), "https://cdn.weatherapi.com/weather/128x128/day/113.png");
    }

    #[test]
    fn absolute_icon_is_left_alone() {
        let c = conditions("http://example.com/icon.png");
        assert_eq!(c.icon_https_url(), "http://example.com/icon.png");
    }
}
