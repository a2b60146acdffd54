//! Device positioning.
//!
//! A terminal host has no GPS receiver, so the only real locator is a
//! configured fixed position. `BoundedLocator` adds the wait bound and
//! the fix reuse window around any locator.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::DeviceConfig;
use crate::types::CandidateLocation;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    /// A raw `gps` fix, or `None` when positioning is unavailable.
    async fn locate(&self) -> Option<CandidateLocation>;
}

/// Positioning unavailable.
pub struct NoDevice;

#[async_trait]
impl DeviceLocator for NoDevice {
    async fn locate(&self) -> Option<CandidateLocation> {
        None
    }
}

/// Always reports the same coordinates.
pub struct FixedDevice {
    lat: f64,
    lon: f64,
}

impl FixedDevice {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[async_trait]
impl DeviceLocator for FixedDevice {
    async fn locate(&self) -> Option<CandidateLocation> {
        Some(CandidateLocation::gps(self.lat, self.lon))
    }
}

/// Wraps a locator with a timeout and reuses a recent fix.
pub struct BoundedLocator {
    inner: Box<dyn DeviceLocator>,
    timeout: Duration,
    max_age: Duration,
    last_fix: Mutex<Option<(Instant, CandidateLocation)>>,
}

impl BoundedLocator {
    pub fn new(inner: Box<dyn DeviceLocator>, timeout: Duration, max_age: Duration) -> Self {
        Self {
            inner,
            timeout,
            max_age,
            last_fix: Mutex::new(None),
        }
    }

    /// Build from config: the fixed position if one is set, else nothing.
    pub fn from_config(cfg: &DeviceConfig) -> Self {
        let inner: Box<dyn DeviceLocator> = match cfg.fixed_position() {
            Some((lat, lon)) => Box::new(FixedDevice::new(lat, lon)),
            None => Box::new(NoDevice),
        };
        Self::new(inner, cfg.timeout(), cfg.max_age())
    }
}

#[async_trait]
impl DeviceLocator for BoundedLocator {
    async fn locate(&self) -> Option<CandidateLocation> {
        let mut last = self.last_fix.lock().await;
        if let Some((at, fix)) = last.as_ref() {
            if at.elapsed() <= self.max_age {
                debug!("Reusing recent device fix");
                return Some(fix.clone());
            }
        }

        match tokio::time::timeout(self.timeout, self.inner.locate()).await {
            Ok(Some(fix)) => {
                *last = Some((Instant::now(), fix.clone()));
                Some(fix)
            }
            Ok(None) => None,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Device positioning timed out");
                None
            }
        }
    }
}
