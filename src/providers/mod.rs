//! External data providers.
//!
//! Defines the provider traits and the concrete HTTP adapters:
//! Open-Meteo for weather, ipapi.co / ipinfo.io for IP geolocation and
//! Nominatim for free-text city search. Each adapter owns the parsing of
//! its own payload shape; callers only ever see normalized domain types.

pub mod geoip;
pub mod search;
pub mod weather;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::types::{CandidateLocation, SearchCandidate, WeatherSnapshot};

pub use geoip::{geoip_by_name, IpApiCo, IpInfoIo};
pub use search::{CitySearcher, Nominatim};
pub use weather::OpenMeteo;

/// Current conditions plus the daily forecast for a coordinate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherGateway: Send + Sync {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, ProviderError>;
}

/// An IP geolocation endpoint with its own response shape.
pub trait GeoIpProvider: Send + Sync {
    /// Name used in config (`ip_order`) and logs.
    fn name(&self) -> &'static str;

    fn endpoint(&self) -> &str;

    /// Turn the raw payload into a candidate; missing coordinates are malformed.
    fn normalize(&self, raw: &Value) -> Result<CandidateLocation, ProviderError>;
}

/// A free-text geocoding endpoint.
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn query_url(&self, query: &str) -> String;

    /// Candidates in the provider's ranking order.
    fn normalize(&self, raw: &Value) -> Result<Vec<SearchCandidate>, ProviderError>;
}

/// Read a coordinate that may arrive as a JSON number or a numeric string.
pub(crate) fn coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Read an optional string field, treating null and absence alike.
pub(crate) fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}
