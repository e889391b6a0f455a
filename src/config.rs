//! Configuration types for the risk scoring engine.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the risk scoring engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskEngineConfig {
    /// Reputation list sources
    pub reputation: ReputationConfig,

    /// Per-factor weights for the bot score
    pub bot_weights: BotWeights,

    /// Per-signal weights for the aggregated risk score
    pub risk_weights: RiskWeights,

    /// Risk level thresholds
    pub thresholds: RiskThresholds,

    /// Timezone comparison settings
    pub timezone: TimezoneConfig,
}

impl RiskEngineConfig {
    /// Load configuration from a JSON or YAML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check weights and thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bot_weights.validate()?;
        self.risk_weights.validate()?;
        self.thresholds.validate()
    }
}

/// Reputation list sources.
///
/// A missing path means the list is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// Newline-delimited VPN ranges (CIDR or bare IPs)
    pub vpn_list_path: Option<PathBuf>,

    /// Newline-delimited Tor exit node IPs
    pub tor_list_path: Option<PathBuf>,

    /// Newline-delimited datacenter ranges with provider names
    pub datacenter_list_path: Option<PathBuf>,

    /// Never flag private, loopback or link-local addresses
    pub skip_private_ips: bool,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            vpn_list_path: Some(PathBuf::from("data/vpn_ranges.txt")),
            tor_list_path: Some(PathBuf::from("data/tor_exit_nodes.txt")),
            datacenter_list_path: Some(PathBuf::from("data/datacenter_ranges.txt")),
            skip_private_ips: true,
        }
    }
}

/// Weights for each bot factor. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotWeights {
    pub webdriver: f64,
    pub phantom: f64,
    pub selenium: f64,
    pub chrome_runtime: f64,
    pub inconsistent_permissions: f64,
    pub missing_plugins: f64,
    pub suspicious_user_agent: f64,
}

impl BotWeights {
    fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("webdriver", self.webdriver),
            ("phantom", self.phantom),
            ("selenium", self.selenium),
            ("chrome_runtime", self.chrome_runtime),
            ("inconsistent_permissions", self.inconsistent_permissions),
            ("missing_plugins", self.missing_plugins),
            ("suspicious_user_agent", self.suspicious_user_agent),
        ]
    }

    /// Sum of all factor weights.
    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.entries() {
            check_weight(name, value)?;
        }
        let total = self.total();
        if (total - 1.0).abs() > 0.001 {
            return Err(ConfigError::BotWeightSum(total));
        }
        Ok(())
    }
}

impl Default for BotWeights {
    fn default() -> Self {
        Self {
            webdriver: 0.35,
            phantom: 0.25,
            selenium: 0.20,
            chrome_runtime: 0.10,
            inconsistent_permissions: 0.05,
            missing_plugins: 0.03,
            suspicious_user_agent: 0.02,
        }
    }
}

/// Points contributed by each signal to the 0-100 risk score.
///
/// These do not need to sum to 100; the result is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub tor: f64,
    pub vpn: f64,
    /// Scaled by the 0-1 bot score
    pub bot: f64,
    pub datacenter: f64,
    pub timezone_mismatch: f64,
}

impl RiskWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        check_weight("tor", self.tor)?;
        check_weight("vpn", self.vpn)?;
        check_weight("bot", self.bot)?;
        check_weight("datacenter", self.datacenter)?;
        check_weight("timezone_mismatch", self.timezone_mismatch)
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            tor: 40.0,
            vpn: 25.0,
            bot: 20.0,
            datacenter: 10.0,
            timezone_mismatch: 5.0,
        }
    }
}

fn check_weight(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight { name, value })
    }
}

/// Minimum scores for each risk level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub critical: u8,
    pub high: u8,
    pub medium: u8,
}

impl RiskThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.critical <= 100
            && self.critical > self.high
            && self.high > self.medium
            && self.medium > 0;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::InvalidThresholds {
                critical: self.critical,
                high: self.high,
                medium: self.medium,
            })
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            critical: 80,
            high: 60,
            medium: 30,
        }
    }
}

/// Timezone comparison settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneConfig {
    /// Count a zone name that cannot be resolved as a mismatch.
    ///
    /// Off by default: an unknown zone contributes nothing to the score.
    pub unknown_zone_is_mismatch: bool,

    /// Additional equivalent zone name pairs, matched in both directions
    pub extra_aliases: Vec<(String, String)>,
}
