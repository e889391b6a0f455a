//! Risk engine: the in-process entry point for the API layer.

use crate::config::RiskEngineConfig;
use crate::detectors::{
    BotScoreCalculator, DetectionContext, Detector, NetworkDetector, NetworkFlags,
    TimezoneComparator,
};
use crate::error::ConfigError;
use crate::reputation::{DatacenterList, TorList, VpnList};
use crate::score::{RiskInput, RiskScore, RiskScoreCalculator};
use crate::signals::SignalBag;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A scoring request as received from the API layer.
///
/// Reputation flags the caller already knows take precedence; the rest are
/// looked up from the client IP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub signals: SignalBag,
    pub ip: Option<String>,
    pub is_vpn: Option<bool>,
    pub is_tor: Option<bool>,
    pub is_datacenter: Option<bool>,
    pub datacenter_provider: Option<String>,
    pub geo_timezone: Option<String>,
}

/// Risk scoring engine.
pub struct RiskEngine {
    /// IP reputation lookups
    network: NetworkDetector,
    /// Risk score aggregator
    calculator: RiskScoreCalculator,
}

impl RiskEngine {
    /// Create an engine whose lists load from the configured paths.
    pub fn new(config: RiskEngineConfig) -> Result<Self, ConfigError> {
        let reputation = &config.reputation;
        let vpn = Arc::new(VpnList::from_optional_path(reputation.vpn_list_path.as_deref()));
        let tor = Arc::new(TorList::from_optional_path(reputation.tor_list_path.as_deref()));
        let datacenter = Arc::new(DatacenterList::from_optional_path(
            reputation.datacenter_list_path.as_deref(),
        ));
        Self::with_lists(config, vpn, tor, datacenter)
    }

    /// Create an engine over lists owned by the caller.
    pub fn with_lists(
        config: RiskEngineConfig,
        vpn: Arc<VpnList>,
        tor: Arc<TorList>,
        datacenter: Arc<DatacenterList>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let network = NetworkDetector::new(vpn, tor, datacenter, config.reputation.skip_private_ips);

        let calculator = RiskScoreCalculator::new(
            config.risk_weights.clone(),
            config.thresholds.clone(),
            BotScoreCalculator::new(config.bot_weights.clone()),
            TimezoneComparator::new(&config.timezone),
        );

        Ok(Self {
            network,
            calculator,
        })
    }

    /// Create with default configuration and empty lists.
    pub fn with_defaults() -> Self {
        Self {
            network: NetworkDetector::new(
                Arc::new(VpnList::empty()),
                Arc::new(TorList::empty()),
                Arc::new(DatacenterList::empty()),
                true,
            ),
            calculator: RiskScoreCalculator::default(),
        }
    }

    /// Load every reputation list now instead of on the first request.
    pub fn warm_up(&self) {
        info!(
            vpn = self.network.vpn_list().len(),
            tor = self.network.tor_list().len(),
            datacenter = self.network.datacenter_list().len(),
            "Reputation lists ready"
        );
    }

    /// Resolve reputation flags, preferring caller-supplied values.
    fn resolve_flags(&self, request: &AssessmentRequest) -> NetworkFlags {
        let needs_lookup =
            request.is_vpn.is_none() || request.is_tor.is_none() || request.is_datacenter.is_none();
        let derived = if needs_lookup {
            let ctx = DetectionContext::new(&request.signals).with_client_ip(request.ip.as_deref());
            let flags = self.network.analyze(&ctx);
            debug!(
                detector = self.network.name(),
                ip = ?request.ip,
                is_vpn = flags.is_vpn,
                is_tor = flags.is_tor,
                is_datacenter = flags.is_datacenter,
                "Network lookup complete"
            );
            flags
        } else {
            NetworkFlags::default()
        };

        let is_datacenter = request.is_datacenter.unwrap_or(derived.is_datacenter);
        let datacenter_provider = match (&request.datacenter_provider, request.is_datacenter) {
            (Some(provider), _) => Some(provider.clone()),
            (None, None) => derived.datacenter_provider,
            (None, Some(_)) => None,
        };

        NetworkFlags {
            is_vpn: request.is_vpn.unwrap_or(derived.is_vpn),
            is_tor: request.is_tor.unwrap_or(derived.is_tor),
            is_datacenter,
            datacenter_provider,
        }
    }

    /// Score a request.
    pub fn assess(&self, request: &AssessmentRequest) -> RiskScore {
        let flags = self.resolve_flags(request);

        let input = RiskInput {
            signals: request.signals.clone(),
            ip: request.ip.clone(),
            is_vpn: flags.is_vpn,
            is_tor: flags.is_tor,
            is_datacenter: flags.is_datacenter,
            datacenter_provider: flags.datacenter_provider,
            geo_timezone: request.geo_timezone.clone(),
        };

        let result = self.calculator.calculate(&input);

        info!(
            ip = ?result.signals.ip,
            risk_score = result.score,
            level = %result.level,
            bot_score = result.signals.bot_score,
            bot_factors = ?result.signals.bot_factors.fired(),
            is_vpn = result.signals.is_vpn,
            is_tor = result.signals.is_tor,
            is_datacenter = result.signals.is_datacenter,
            timezone_mismatch = result.signals.timezone_mismatch,
            "Risk assessment complete"
        );

        result
    }
}
