//! Risk signal detectors.
//!
//! Each detector looks at one aspect of a request and returns its own typed
//! result. Detectors are pure apart from the reputation lists, which load once.

pub mod bot;
pub mod network;
pub mod timezone;

pub use bot::{BotFactors, BotScore, BotScoreCalculator};
pub use network::{NetworkDetector, NetworkFlags};
pub use timezone::TimezoneComparator;

use crate::signals::SignalBag;

/// Context for detection containing request information.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    /// Decoded client signals
    pub signals: &'a SignalBag,
    /// Client IP as reported by the API layer
    pub client_ip: Option<&'a str>,
    /// Timezone derived from IP geolocation
    pub geo_timezone: Option<&'a str>,
}

impl<'a> DetectionContext<'a> {
    /// Create a context with only a signal bag.
    pub fn new(signals: &'a SignalBag) -> Self {
        Self {
            signals,
            client_ip: None,
            geo_timezone: None,
        }
    }

    /// Set the client IP.
    pub fn with_client_ip(mut self, ip: Option<&'a str>) -> Self {
        self.client_ip = ip;
        self
    }

    /// Set the geolocation timezone.
    pub fn with_geo_timezone(mut self, tz: Option<&'a str>) -> Self {
        self.geo_timezone = tz;
        self
    }

    /// Timezone reported by the browser.
    pub fn browser_timezone(&self) -> Option<&'a str> {
        self.signals.timezone.as_deref()
    }
}

/// Trait for risk detectors.
pub trait Detector: Send + Sync {
    /// Detector result type.
    type Output;

    /// Analyze the request and return a detection result.
    fn analyze(&self, ctx: &DetectionContext<'_>) -> Self::Output;

    /// Get the detector name.
    fn name(&self) -> &'static str;
}
