//! IP geolocation providers.
//!
//! Two free HTTPS endpoints with different payload shapes:
//! - ipapi.co: separate `latitude` / `longitude`, `country_name`
//! - ipinfo.io: combined `loc: "lat,lon"`, two-letter `country`

use serde_json::Value;

use super::{coordinate, text, GeoIpProvider};
use crate::error::ProviderError;
use crate::types::{CandidateLocation, LocationSource};

/// Look up a provider by its config name.
pub fn geoip_by_name(name: &str) -> Option<Box<dyn GeoIpProvider>> {
    match name.trim().to_lowercase().as_str() {
        "ipapi" | "ipapi.co" => Some(Box::new(IpApiCo::default())),
        "ipinfo" | "ipinfo.io" => Some(Box::new(IpInfoIo::default())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// ipapi.co
// ---------------------------------------------------------------------------

pub struct IpApiCo {
    endpoint: String,
}

impl Default for IpApiCo {
    fn default() -> Self {
        Self {
            endpoint: "https://ipapi.co/json/".to_string(),
        }
    }
}

impl GeoIpProvider for IpApiCo {
    fn name(&self) -> &'static str {
        "ipapi"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn normalize(&self, raw: &Value) -> Result<CandidateLocation, ProviderError> {
        let lat = coordinate(raw.get("latitude"));
        let lon = coordinate(raw.get("longitude"));
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(ProviderError::malformed(self.name(), "missing latitude/longitude"));
        };

        Ok(CandidateLocation {
            lat,
            lon,
            city: text(raw.get("city")),
            region: text(raw.get("region")),
            country: text(raw.get("country_name")),
            source: LocationSource::Ip,
        })
    }
}

// ---------------------------------------------------------------------------
// ipinfo.io
// ---------------------------------------------------------------------------

pub struct IpInfoIo {
    endpoint: String,
}

impl Default for IpInfoIo {
    fn default() -> Self {
        Self {
            endpoint: "https://ipinfo.io/json".to_string(),
        }
    }
}

impl GeoIpProvider for IpInfoIo {
    fn name(&self) -> &'static str {
        "ipinfo"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn normalize(&self, raw: &Value) -> Result<CandidateLocation, ProviderError> {
        let loc = raw
            .get("loc")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::malformed(self.name(), "missing `loc`"))?;

        let mut parts = loc.split(',').map(|p| p.trim().parse::<f64>());
        let (Some(Ok(lat)), Some(Ok(lon))) = (parts.next(), parts.next()) else {
            return Err(ProviderError::malformed(self.name(), format!("unparsable loc {loc:?}")));
        };

        Ok(CandidateLocation {
            lat,
            lon,
            city: text(raw.get("city")),
            region: text(raw.get("region")),
            country: text(raw.get("country")),
            source: LocationSource::Ip,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
