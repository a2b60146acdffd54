//! Shared types for the weather dashboard.
//!
//! These types form the data model used across providers, the
//! location resolver, the view engine and the renderer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// The location the dashboard is currently showing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Province from the city table; empty for free-form locations.
    #[serde(default)]
    pub province: String,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, province: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            province: province.into(),
        }
    }

    /// A location outside the city table (search result, raw IP fix).
    pub fn free_form(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::new(name, lat, lon, "")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.province.is_empty() {
            write!(f, "{} ({:.4}, {:.4})", self.name, self.lat, self.lon)
        } else {
            write!(f, "{}/{} ({:.4}, {:.4})", self.province, self.name, self.lat, self.lon)
        }
    }
}

/// Where a candidate position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Gps,
    Ip,
}

/// A raw position reported by a device locator or an IP geolocation provider,
/// before it is named and snapped to the city table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLocation {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    pub source: LocationSource,
}

impl CandidateLocation {
    pub fn gps(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            city: String::new(),
            region: String::new(),
            country: String::new(),
            source: LocationSource::Gps,
        }
    }
}

/// One entry from a free-text city search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// Full provider display name ("Shanghai, Huangpu, China").
    pub display_name: String,
    /// Short name shown in the UI ("Shanghai, CN").
    pub short_name: String,
    pub lat: f64,
    pub lon: f64,
    pub country_code: Option<String>,
}

impl SearchCandidate {
    /// Build the short name: text before the first comma, plus the
    /// uppercased country code when the provider gave one.
    pub fn short_name_for(display_name: &str, country_code: Option<&str>) -> String {
        let head = display_name.split(',').next().unwrap_or_default().trim();
        match country_code.filter(|c| !c.is_empty()) {
            Some(cc) => format!("{head}, {}", cc.to_uppercase()),
            None => head.to_string(),
        }
    }

    pub fn to_location(&self) -> Location {
        Location::free_form(self.short_name.clone(), self.lat, self.lon)
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Instant readings. Every field is optional because the provider may omit any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// °C
    pub temperature: Option<f64>,
    /// %
    pub humidity: Option<f64>,
    /// km/h
    pub wind_speed: Option<f64>,
    /// °C
    pub apparent_temperature: Option<f64>,
    pub uv_index: Option<f64>,
    pub weather_code: Option<i32>,
    /// %
    pub cloud_cover: Option<f64>,
    /// hPa
    pub pressure: Option<f64>,
    /// metres
    pub visibility: Option<f64>,
    /// °C
    pub dewpoint: Option<f64>,
}

/// One day of the daily forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub weather_code: Option<i32>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub uv_max: Option<f64>,
    pub wind_max: Option<f64>,
}

/// Ordered per-day records, index 0 = today. Replaced wholesale on each fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    days: Vec<DayForecast>,
}

impl DailyForecast {
    pub fn new(days: Vec<DayForecast>) -> Self {
        Self { days }
    }

    pub(crate) fn len(&self) -> usize {
        self.days.len()
    }

    pub fn has_day(&self, index: usize) -> bool {
        index < self.days.len()
    }

    pub fn day(&self, index: usize) -> Option<&DayForecast> {
        self.days.get(index)
    }

    pub fn today(&self) -> Option<&DayForecast> {
        self.days.first()
    }
}

/// Result of one successful weather fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: DailyForecast,
}

#[cfg(test)]
impl WeatherSnapshot {
    /// Snapshot with `days` forecast entries starting 2026-10-19.
    pub fn sample(days: usize) -> Self {
        let start = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let days = (0..days)
            .map(|i| DayForecast {
                date: start + chrono::Duration::days(i as i64),
                weather_code: Some(if i % 2 == 0 { 1 } else { 61 }),
                temp_max: Some(20.0 + i as f64),
                temp_min: Some(10.0 + i as f64),
                precipitation_probability: Some(10.0 * i as f64),
                uv_max: Some(4.0),
                wind_max: Some(12.4),
            })
            .collect();
        Self {
            current: CurrentConditions {
                temperature: Some(18.26),
                humidity: Some(55.0),
                wind_speed: Some(9.6),
                apparent_temperature: Some(17.04),
                uv_index: Some(3.25),
                weather_code: Some(2),
                cloud_cover: Some(40.0),
                pressure: Some(1013.4),
                visibility: Some(24140.0),
                dewpoint: Some(8.95),
            },
            daily: DailyForecast::new(days),
        }
    }
}
