//! Scripted JSON source for integration testing.
//!
//! Stands in for the network: each provider name maps to a canned
//! response or error, and every request is recorded so tests can assert
//! on call counts and request URLs.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use weatherdash::error::ProviderError;
use weatherdash::http::JsonSource;

/// A deterministic `JsonSource`. Providers without a script fail with
/// HTTP 503.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    responses: Arc<Mutex<HashMap<String, Result<Value, ProviderError>>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, provider: &str, body: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(provider.to_string(), Ok(body));
        self
    }

    pub fn fail(&self, provider: &str, status: u16) -> &Self {
        let err = ProviderError::Status { provider: provider.to_string(), status };
        self.responses
            .lock()
            .unwrap()
            .insert(provider.to_string(), Err(err));
        self
    }

    /// URLs requested from `provider`, in order.
    pub fn urls(&self, provider: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == provider)
            .map(|(_, url)| url.clone())
            .collect()
    }

    pub fn calls(&self, provider: &str) -> usize {
        self.urls(provider).len()
    }
}

#[async_trait]
impl JsonSource for ScriptedSource {
    async fn get_json(&self, provider: &str, url: &str) -> Result<Value, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((provider.to_string(), url.to_string()));

        match self.responses.lock().unwrap().get(provider) {
            Some(response) => response.clone(),
            None => Err(ProviderError::Status { provider: provider.to_string(), status: 503 }),
        }
    }
}

/// An Open-Meteo payload with `days` daily entries from 2026-10-19.
pub fn open_meteo_payload(days: usize) -> Value {
    let start = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let time: Vec<String> = (0..days)
        .map(|i| (start + Duration::days(i as i64)).format("%Y-%m-%d").to_string())
        .collect();
    let series = |base: f64| -> Vec<f64> { (0..days).map(|i| base + i as f64).collect() };

    json!({
        "current": {
            "temperature_2m": 16.4,
            "relative_humidity_2m": 62,
            "wind_speed_10m": 11.2,
            "apparent_temperature": 15.1,
            "uv_index": 2.1,
            "weather_code": 3,
            "cloud_cover": 95,
            "pressure_msl": 1016.8,
            "visibility": 18000.0,
            "dewpoint_2m": 9.2
        },
        "daily": {
            "time": time,
            "weather_code": vec![3; days],
            "temperature_2m_max": series(19.0),
            "temperature_2m_min": series(9.0),
            "precipitation_probability_max": vec![20; days],
            "uv_index_max": vec![3.5; days],
            "wind_speed_10m_max": vec![14.0; days]
        }
    })
}

pub fn ipapi_shanghai() -> Value {
    json!({
        "latitude": 31.23,
        "longitude": 121.47,
        "city": "Shanghai",
        "region": "Shanghai",
        "country_name": "China"
    })
}

pub fn nominatim_paris() -> Value {
    json!([
        {
            "display_name": "Paris, Île-de-France, Metropolitan France, France",
            "lat": "48.8588897",
            "lon": "2.3200410",
            "address": {"country_code": "fr"}
        },
        {
            "display_name": "Paris, Lamar County, Texas, United States",
            "lat": "33.6617962",
            "lon": "-95.5555130",
            "address": {"country_code": "us"}
        }
    ])
}
