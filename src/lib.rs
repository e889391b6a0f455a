//! Risk scoring core for fraud detection.
//!
//! Turns the signals a browser SDK submits, plus the client IP, into a
//! 0-100 risk score with a discrete level.
//!
//! # Features
//!
//! - IPv4 CIDR matching that fails closed on malformed input
//! - VPN, Tor exit node and datacenter reputation lists, loaded once on first use
//! - Browser vs. geolocation timezone consistency by current UTC offset
//! - Weighted bot probability from automation probes
//! - Aggregated risk score with low/medium/high/critical levels
//!
//! # Example
//!
//! ```ignore
//! use fraud_risk_scoring::{AssessmentRequest, RiskEngine, RiskEngineConfig};
//!
//! let engine = RiskEngine::new(RiskEngineConfig::default())?;
//! let request: AssessmentRequest = serde_json::from_str(body)?;
//! let risk = engine.assess(&request);
//! println!("{} ({})", risk.score, risk.level);
//! ```

pub mod cidr;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod reputation;
pub mod score;
pub mod signals;

pub use config::RiskEngineConfig;
pub use detectors::{BotFactors, BotScore, BotScoreCalculator, TimezoneComparator};
pub use engine::{AssessmentRequest, RiskEngine};
pub use error::ConfigError;
pub use score::{RiskInput, RiskLevel, RiskScore, RiskScoreCalculator, RiskSignals};
pub use signals::SignalBag;
