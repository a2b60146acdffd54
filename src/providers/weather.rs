//! Weather provider.
//!
//! Uses the free Open-Meteo API (no key required) for current conditions
//! and a 7-day daily forecast.
//!
//! API: `https://api.open-meteo.com/v1/forecast`
//! Auth: None required.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::WeatherGateway;
use crate::error::ProviderError;
use crate::http::JsonSource;
use crate::types::{CurrentConditions, DailyForecast, DayForecast, WeatherSnapshot};

const PROVIDER: &str = "open-meteo";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,\
apparent_temperature,uv_index,weather_code,cloud_cover,pressure_msl,visibility,dewpoint_2m";

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
precipitation_probability_max,uv_index_max,wind_speed_10m_max";

const FORECAST_DAYS: u8 = 7;

// ---------------------------------------------------------------------------
// Open-Meteo response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    current: Option<OpenMeteoCurrent>,
    #[serde(default)]
    daily: Option<OpenMeteoDaily>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    #[serde(default)]
    temperature_2m: Option<f64>,
    #[serde(default)]
    relative_humidity_2m: Option<f64>,
    #[serde(default)]
    wind_speed_10m: Option<f64>,
    #[serde(default)]
    apparent_temperature: Option<f64>,
    #[serde(default)]
    uv_index: Option<f64>,
    #[serde(default)]
    weather_code: Option<i32>,
    #[serde(default)]
    cloud_cover: Option<f64>,
    #[serde(default)]
    pressure_msl: Option<f64>,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    dewpoint_2m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<Option<i32>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    uv_index_max: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
}

fn at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}

impl From<OpenMeteoCurrent> for CurrentConditions {
    fn from(c: OpenMeteoCurrent) -> Self {
        Self {
            temperature: c.temperature_2m,
            humidity: c.relative_humidity_2m,
            wind_speed: c.wind_speed_10m,
            apparent_temperature: c.apparent_temperature,
            uv_index: c.uv_index,
            weather_code: c.weather_code,
            cloud_cover: c.cloud_cover,
            pressure: c.pressure_msl,
            visibility: c.visibility,
            dewpoint: c.dewpoint_2m,
        }
    }
}

impl OpenMeteoDaily {
    /// `time` drives the day count; the other arrays are read defensively.
    fn into_forecast(self) -> Result<DailyForecast, ProviderError> {
        let mut days = Vec::with_capacity(self.time.len());
        for (i, raw_date) in self.time.iter().enumerate() {
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
                ProviderError::malformed(PROVIDER, format!("bad daily.time[{i}] {raw_date:?}: {e}"))
            })?;
            days.push(DayForecast {
                date,
                weather_code: at(&self.weather_code, i),
                temp_max: at(&self.temperature_2m_max, i),
                temp_min: at(&self.temperature_2m_min, i),
                precipitation_probability: at(&self.precipitation_probability_max, i),
                uv_max: at(&self.uv_index_max, i),
                wind_max: at(&self.wind_speed_10m_max, i),
            });
        }
        Ok(DailyForecast::new(days))
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct OpenMeteo {
    source: Arc<dyn JsonSource>,
    base_url: String,
}

impl OpenMeteo {
    pub fn new(source: Arc<dyn JsonSource>, base_url: impl Into<String>) -> Self {
        Self {
            source,
            base_url: base_url.into(),
        }
    }

    fn forecast_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}?latitude={lat}&longitude={lon}&current={CURRENT_FIELDS}\
             &daily={DAILY_FIELDS}&timezone=auto&forecast_days={FORECAST_DAYS}",
            self.base_url
        )
    }

    fn parse(raw: serde_json::Value) -> Result<WeatherSnapshot, ProviderError> {
        let resp: OpenMeteoResponse = serde_json::from_value(raw)
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;

        let current = resp
            .current
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "missing `current` block"))?;
        let daily = resp
            .daily
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "missing `daily` block"))?;

        Ok(WeatherSnapshot {
            current: current.into(),
            daily: daily.into_forecast()?,
        })
    }
}

#[async_trait]
impl WeatherGateway for OpenMeteo {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, ProviderError> {
        let url = self.forecast_url(lat, lon);
        let raw = self.source.get_json(PROVIDER, &url).await?;
        let snapshot = Self::parse(raw)?;
        debug!(lat, lon, days = snapshot.daily.len(), "Weather fetched");
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockJsonSource;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "current": {
                "temperature_2m": 18.3,
                "relative_humidity_2m": 55,
                "wind_speed_10m": 9.6,
                "apparent_temperature": 17.0,
                "uv_index": 3.2,
                "weather_code": 2,
                "cloud_cover": 40,
                "pressure_msl": 1013.4,
                "visibility": 24140.0,
                "dewpoint_2m": 9.0
            },
            "daily": {
                "time": ["2026-10-19", "2026-10-20", "2026-10-21"],
                "weather_code": [1, 61, 3],
                "temperature_2m_max": [21.4, 19.0, 17.5],
                "temperature_2m_min": [11.2, 12.0, 9.8],
                "precipitation_probability_max": [5, 80, null],
                "uv_index_max": [4.1, 2.0, 3.3],
                "wind_speed_10m_max": [14.0, 22.5]
            }
        })
    }

    #[test]
    fn test_parse_full_payload() {
        let snap = OpenMeteo::parse(payload()).unwrap();
        assert_eq!(snap.current.temperature, Some(18.3));
        assert_eq!(snap.current.pressure, Some(1013.4));
        assert_eq!(snap.daily.len(), 3);

        let day1 = snap.daily.day(1).unwrap();
        assert_eq!(day1.date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(day1.weather_code, Some(61));
        assert_eq!(day1.precipitation_probability, Some(80.0));
    }

    #[test]
    fn test_short_and_null_arrays_become_none() {
        let snap = OpenMeteo::parse(payload()).unwrap();
        let day2 = snap.daily.day(2).unwrap();
        assert_eq!(day2.precipitation_probability, None);
        assert_eq!(day2.wind_max, None);
        assert_eq!(day2.temp_max, Some(17.5));
    }

    #[test]
    fn test_missing_daily_is_malformed() {
        let err = OpenMeteo::parse(json!({"current": {}})).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let err = OpenMeteo::parse(json!({
            "current": {},
            "daily": {"time": ["tomorrow"]}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("daily.time[0]"));
    }

    #[tokio::test]
    async fn test_fetch_builds_url_with_coordinates() {
        let mut source = MockJsonSource::new();
        source
            .expect_get_json()
            .withf(|provider, url| {
                provider == "open-meteo"
                    && url.starts_with("https://api.example/v1/forecast?latitude=36.6512&longitude=117.1201")
                    && url.contains("pressure_msl")
                    && url.contains("wind_speed_10m_max")
                    && url.contains("forecast_days=7")
            })
            .times(1)
            .returning(|_, _| Ok(payload()));

        let gw = OpenMeteo::new(Arc::new(source), "https://api.example/v1/forecast");
        let snap = gw.fetch(36.6512, 117.1201).await.unwrap();
        assert_eq!(snap.daily.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_propagates_status_error() {
        let mut source = MockJsonSource::new();
        source.expect_get_json().returning(|p, _| {
            Err(ProviderError::Status { provider: p.to_string(), status: 500 })
        });

        let gw = OpenMeteo::new(Arc::new(source), "https://api.example/v1/forecast");
        let err = gw.fetch(1.0, 2.0).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 500, .. }));
    }
}
