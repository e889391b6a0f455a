//! Risk score calculation and types.

use crate::config::{RiskThresholds, RiskWeights};
use crate::detectors::{BotFactors, BotScoreCalculator, DetectionContext, Detector, TimezoneComparator};
use crate::signals::SignalBag;
use serde::{Deserialize, Serialize};

/// Risk level classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a 0-100 score.
    pub fn from_score(score: u8, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.critical {
            RiskLevel::Critical
        } else if score >= thresholds.high {
            RiskLevel::High
        } else if score >= thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Returns the level as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the aggregator. Reputation flags are already resolved.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskInput {
    pub signals: SignalBag,
    pub ip: Option<String>,
    pub is_vpn: bool,
    pub is_tor: bool,
    pub is_datacenter: bool,
    pub datacenter_provider: Option<String>,
    pub geo_timezone: Option<String>,
}

/// Every signal that went into a risk score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSignals {
    pub ip: Option<String>,
    pub is_vpn: bool,
    pub is_tor: bool,
    pub is_datacenter: bool,
    pub datacenter_provider: Option<String>,
    pub browser_timezone: Option<String>,
    pub geo_timezone: Option<String>,
    /// 0 or 1
    pub timezone_mismatch: u8,
    /// Bot probability in [0, 1]
    pub bot_score: f64,
    pub bot_factors: BotFactors,
}

/// Risk detection result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Overall risk (0-100)
    pub score: u8,

    /// Level derived from the score
    pub level: RiskLevel,

    /// Individual signal contributions
    pub signals: RiskSignals,
}

/// Score calculator that combines signals with weights.
#[derive(Debug, Clone, Default)]
pub struct RiskScoreCalculator {
    weights: RiskWeights,
    thresholds: RiskThresholds,
    bot: BotScoreCalculator,
    timezone: TimezoneComparator,
}

impl RiskScoreCalculator {
    /// Create a new score calculator.
    pub fn new(
        weights: RiskWeights,
        thresholds: RiskThresholds,
        bot: BotScoreCalculator,
        timezone: TimezoneComparator,
    ) -> Self {
        Self {
            weights,
            thresholds,
            bot,
            timezone,
        }
    }

    /// Calculate the final risk score.
    pub fn calculate(&self, input: &RiskInput) -> RiskScore {
        let ctx = DetectionContext::new(&input.signals)
            .with_client_ip(input.ip.as_deref())
            .with_geo_timezone(input.geo_timezone.as_deref());

        let bot = self.bot.analyze(&ctx);
        let timezone_mismatch = self.timezone.analyze(&ctx);

        let signals = RiskSignals {
            ip: input.ip.clone(),
            is_vpn: input.is_vpn,
            is_tor: input.is_tor,
            is_datacenter: input.is_datacenter,
            datacenter_provider: input.datacenter_provider.clone(),
            browser_timezone: ctx.browser_timezone().map(str::to_string),
            geo_timezone: input.geo_timezone.clone(),
            timezone_mismatch,
            bot_score: bot.score,
            bot_factors: bot.factors,
        };

        let score = self.score_signals(&signals);
        RiskScore {
            score,
            level: RiskLevel::from_score(score, &self.thresholds),
            signals,
        }
    }

    /// Weighted sum of resolved signals, rounded and clamped to 0-100.
    pub fn score_signals(&self, signals: &RiskSignals) -> u8 {
        let w = &self.weights;
        let mut total = 0.0f64;

        if signals.is_tor {
            total += w.tor;
        }
        if signals.is_vpn {
            total += w.vpn;
        }
        if signals.is_datacenter {
            total += w.datacenter;
        }
        if signals.timezone_mismatch != 0 {
            total += w.timezone_mismatch;
        }
        total += signals.bot_score * w.bot;

        // NaN saturates to 0 in the cast
        total.round().clamp(0.0, 100.0) as u8
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signals(is_tor: bool, is_vpn: bool, is_datacenter: bool, mismatch: u8, bot: f64) -> RiskSignals {
        RiskSignals {
            is_tor,
            is_vpn,
            is_datacenter,
            timezone_mismatch: mismatch,
            bot_score: bot,
            ..Default::default()
        }
    }

    #[test]
    fn test_risk_level_thresholds() {
        let t = RiskThresholds::default();
        assert_eq!(RiskLevel::from_score(0, &t), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29, &t), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30, &t), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(59, &t), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60, &t), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(79, &t), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80, &t), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100, &t), RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_as_str() {
        assert_eq!(RiskLevel::Low.as_str(), "low");
        assert_eq!(RiskLevel::Critical.to_string(), "critical");
        assert_eq!(serde_json::to_value(RiskLevel::High).unwrap(), json!("high"));
    }

    #[test]
    fn test_tor_only() {
        let calc = RiskScoreCalculator::default();
        assert_eq!(calc.score_signals(&signals(true, false, false, 0, 0.0)), 40);
    }

    #[test]
    fn test_tor_and_vpn() {
        let calc = RiskScoreCalculator::default();
        let score = calc.score_signals(&signals(true, true, false, 0, 0.0));
        assert_eq!(score, 65);
        assert_eq!(RiskLevel::from_score(score, calc.thresholds()), RiskLevel::High);
    }

    #[test]
    fn test_everything_is_clamped() {
        let calc = RiskScoreCalculator::default();
        assert_eq!(calc.score_signals(&signals(true, true, true, 1, 1.0)), 100);
    }

    #[test]
    fn test_bot_contribution_is_continuous() {
        let calc = RiskScoreCalculator::default();
        assert_eq!(calc.score_signals(&signals(false, false, false, 0, 0.35)), 7);
        assert_eq!(calc.score_signals(&signals(false, false, false, 0, 0.03)), 1);
        assert_eq!(calc.score_signals(&signals(false, false, false, 0, 0.02)), 0);
    }

    #[test]
    fn test_calculate_from_signal_bag() {
        let calc = RiskScoreCalculator::default();
        let input = RiskInput {
            signals: SignalBag::from_value(&json!({
                "bot": {"webdriver": true},
                "timezone": {"timezone": "Asia/Tokyo"}
            })),
            is_tor: true,
            geo_timezone: Some("America/Los_Angeles".to_string()),
            ..Default::default()
        };

        let result = calc.calculate(&input);
        // 40 (tor) + 5 (timezone) + 0.35 * 20 (bot)
        assert_eq!(result.score, 52);
        assert_eq!(result.level, RiskLevel::Medium);
        assert_eq!(result.signals.timezone_mismatch, 1);
        assert_eq!(result.signals.browser_timezone.as_deref(), Some("Asia/Tokyo"));
        assert_eq!(result.signals.bot_factors.webdriver, 1);
    }

    #[test]
    fn test_empty_input_is_low() {
        let result = RiskScoreCalculator::default().calculate(&RiskInput::default());
        assert_eq!(result.score, 0);
        assert_eq!(result.level, RiskLevel::Low);
    }

    #[test]
    fn test_input_deserialization() {
        let input: RiskInput = serde_json::from_value(json!({
            "signals": {"navigator": {"plugins": []}},
            "ip": "203.0.113.5",
            "isVpn": true,
            "geoTimezone": "Europe/Paris"
        }))
        .unwrap();
        assert!(input.is_vpn);
        assert!(!input.is_tor);
        assert_eq!(input.signals.navigator.plugin_count, Some(0));
    }

    #[test]
    fn test_result_serialization() {
        let result = RiskScoreCalculator::default().calculate(&RiskInput {
            is_vpn: true,
            ..Default::default()
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], json!(25));
        assert_eq!(json["level"], json!("low"));
        assert_eq!(json["signals"]["isVpn"], json!(true));
        assert_eq!(json["signals"]["botFactors"]["webdriver"], json!(0));
    }
}
