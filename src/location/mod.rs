//! Location resolution.
//!
//! Produces the startup location without user input. Ordered fallback,
//! first success wins:
//! 1. device position (bounded wait, recent fix reused)
//! 2. IP geolocation providers in configured order
//! 3. nothing: the caller keeps its default city
//!
//! A resolved candidate is named from its city/country and, for domestic
//! results, snapped onto the city table.

pub mod device;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::LocationError;
use crate::http::JsonSource;
use crate::providers::{geoip_by_name, GeoIpProvider};
use crate::reference::CityTable;
use crate::types::{CandidateLocation, Location};

pub use device::{BoundedLocator, DeviceLocator, FixedDevice, NoDevice};

/// Name used when a fix carries no city.
pub const UNNAMED: &str = "当前位置";

const DOMESTIC: [&str; 3] = ["cn", "china", "中国"];

fn is_domestic(country: &str) -> bool {
    let c = country.trim().to_lowercase();
    DOMESTIC.iter().any(|d| *d == c)
}

/// IP geolocation providers tried in order over one transport.
pub struct IpGeolocator {
    providers: Vec<Box<dyn GeoIpProvider>>,
    source: Arc<dyn JsonSource>,
}

impl IpGeolocator {
    pub fn new(providers: Vec<Box<dyn GeoIpProvider>>, source: Arc<dyn JsonSource>) -> Self {
        Self { providers, source }
    }

    /// Providers by config name; unknown names are skipped with a warning.
    pub fn from_names(names: &[String], source: Arc<dyn JsonSource>) -> Self {
        let providers = names
            .iter()
            .filter_map(|name| {
                let provider = geoip_by_name(name);
                if provider.is_none() {
                    warn!(provider = %name, "Unknown IP geolocation provider, skipping");
                }
                provider
            })
            .collect();
        Self::new(providers, source)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn locate(&self) -> Option<CandidateLocation> {
        for provider in &self.providers {
            let raw = match self.source.get_json(provider.name(), provider.endpoint()).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "IP lookup failed");
                    continue;
                }
            };
            match provider.normalize(&raw) {
                Ok(candidate) => {
                    debug!(provider = provider.name(), city = %candidate.city, "IP lookup succeeded");
                    return Some(candidate);
                }
                Err(e) => warn!(provider = provider.name(), error = %e, "IP lookup unusable"),
            }
        }
        None
    }
}

/// Runs the fallback chain and turns the winner into a `Location`.
pub struct LocationResolver {
    device: Box<dyn DeviceLocator>,
    ip: IpGeolocator,
    table: CityTable,
}

impl LocationResolver {
    pub fn new(device: Box<dyn DeviceLocator>, ip: IpGeolocator, table: CityTable) -> Self {
        Self { device, ip, table }
    }

    /// Best-effort current location; `None` means keep the default.
    pub async fn resolve(&self) -> Option<Location> {
        let candidate = match self.device.locate().await {
            Some(fix) => Some(fix),
            None => self.ip.locate().await,
        };

        let Some(candidate) = candidate else {
            warn!(error = %LocationError::Unavailable, "Keeping default city");
            return None;
        };

        let location = self.finalize(&candidate);
        info!(source = ?candidate.source, location = %location, "Location resolved");
        Some(location)
    }

    /// Name the candidate, then snap domestic results onto the table.
    pub fn finalize(&self, candidate: &CandidateLocation) -> Location {
        if is_domestic(&candidate.country) {
            if let Some(snapped) = self.table.snap(&candidate.city) {
                debug!(city = %candidate.city, snapped = %snapped.name, "Snapped to city table");
                return snapped;
            }
        }
        Location::free_form(display_name(candidate), candidate.lat, candidate.lon)
    }
}

/// "City, Country", with a generic name when the city is unknown.
pub fn display_name(candidate: &CandidateLocation) -> String {
    let city = candidate.city.trim();
    let city = if city.is_empty() { UNNAMED } else { city };
    let country = candidate.country.trim();
    if country.is_empty() {
        city.to_string()
    } else {
        format!("{city}, {country}")
    }
}
