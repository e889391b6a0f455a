//! Bot probability from client automation signals.
//!
//! Seven indicators, each 0 or 1, are combined with fixed weights that sum
//! to 1.0:
//! - webdriver flag (automation probe or `navigator.webdriver`)
//! - PhantomJS globals
//! - Selenium globals
//! - `chromeRuntime` automation flag reported by the client
//! - inconsistent permission states
//! - explicitly empty plugin list
//! - headless browser or HTTP client User-Agent

use super::{DetectionContext, Detector};
use crate::config::BotWeights;
use crate::signals::SignalBag;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// User-Agent fragments of headless browsers and HTTP client libraries.
static SUSPICIOUS_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)headlesschrome|phantomjs|selenium|webdriver|python-?requests|java/[0-9]|curl/|wget/")
        .expect("valid regex: suspicious user agent")
});

/// Per-factor indicators, each 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotFactors {
    pub webdriver: u8,
    pub phantom: u8,
    pub selenium: u8,
    pub chrome_runtime: u8,
    pub inconsistent_permissions: u8,
    pub missing_plugins: u8,
    pub suspicious_user_agent: u8,
}

impl BotFactors {
    fn as_pairs(&self) -> [(&'static str, u8); 7] {
        [
            ("webdriver", self.webdriver),
            ("phantom", self.phantom),
            ("selenium", self.selenium),
            ("chromeRuntime", self.chrome_runtime),
            ("inconsistentPermissions", self.inconsistent_permissions),
            ("missingPlugins", self.missing_plugins),
            ("suspiciousUserAgent", self.suspicious_user_agent),
        ]
    }

    /// Names of the factors that fired.
    pub fn fired(&self) -> Vec<&'static str> {
        self.as_pairs()
            .into_iter()
            .filter(|(_, value)| *value == 1)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Bot probability with the factors that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BotScore {
    /// Probability in [0, 1], rounded to 2 decimals
    pub score: f64,
    pub factors: BotFactors,
}

/// Weighted bot score calculator.
#[derive(Debug, Clone, Default)]
pub struct BotScoreCalculator {
    weights: BotWeights,
}

impl BotScoreCalculator {
    /// Create a calculator with the given weights.
    pub fn new(weights: BotWeights) -> Self {
        Self { weights }
    }

    /// Calculate the bot score for a signal bag.
    pub fn calculate(&self, signals: &SignalBag) -> BotScore {
        let automation = &signals.automation;
        let navigator = &signals.navigator;

        let factors = BotFactors {
            webdriver: u8::from(automation.webdriver || navigator.webdriver),
            phantom: u8::from(automation.phantom),
            selenium: u8::from(automation.selenium),
            chrome_runtime: u8::from(automation.chrome_runtime),
            inconsistent_permissions: u8::from(automation.inconsistent_permissions),
            missing_plugins: u8::from(navigator.plugin_count == Some(0)),
            suspicious_user_agent: u8::from(
                navigator
                    .user_agent
                    .as_deref()
                    .is_some_and(is_suspicious_user_agent),
            ),
        };

        let w = &self.weights;
        let weighted = [
            (factors.webdriver, w.webdriver),
            (factors.phantom, w.phantom),
            (factors.selenium, w.selenium),
            (factors.chrome_runtime, w.chrome_runtime),
            (factors.inconsistent_permissions, w.inconsistent_permissions),
            (factors.missing_plugins, w.missing_plugins),
            (factors.suspicious_user_agent, w.suspicious_user_agent),
        ]
        .iter()
        .map(|(fired, weight)| f64::from(*fired) * weight)
        .sum::<f64>();

        BotScore {
            score: round_to_hundredths(weighted).clamp(0.0, 1.0),
            factors,
        }
    }
}

impl Detector for BotScoreCalculator {
    type Output = BotScore;

    fn analyze(&self, ctx: &DetectionContext<'_>) -> BotScore {
        self.calculate(ctx.signals)
    }

    fn name(&self) -> &'static str {
        "bot_score"
    }
}

/// Returns true for headless browser and HTTP client User-Agents.
pub fn is_suspicious_user_agent(ua: &str) -> bool {
    SUSPICIOUS_UA.is_match(ua)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn score(value: serde_json::Value) -> BotScore {
        BotScoreCalculator::default().calculate(&SignalBag::from_value(&value))
    }

    #[test]
    fn test_clean_signals() {
        let result = score(json!({
            "bot": {"webdriver": false, "phantom": false, "selenium": false},
            "navigator": {"plugins": ["PDF Viewer"], "userAgent": "Mozilla/5.0 (X11; Linux x86_64) Chrome/120.0"}
        }));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.factors, BotFactors::default());
    }

    #[test]
    fn test_webdriver_only() {
        let result = score(json!({"bot": {"webdriver": true}}));
        assert_eq!(result.score, 0.35);
        assert_eq!(
            result.factors,
            BotFactors {
                webdriver: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_navigator_webdriver_is_enough() {
        let result = score(json!({"navigator": {"webdriver": true}}));
        assert_eq!(result.factors.webdriver, 1);
        assert_eq!(result.score, 0.35);
    }

    #[test]
    fn test_both_webdriver_sources_count_once() {
        let result = score(json!({"bot": {"webdriver": true}, "navigator": {"webdriver": true}}));
        assert_eq!(result.score, 0.35);
    }

    #[test]
    fn test_empty_plugins() {
        let result = score(json!({"navigator": {"plugins": []}}));
        assert_eq!(result.factors.missing_plugins, 1);
        assert_eq!(result.score, 0.03);
    }

    #[test]
    fn test_absent_plugins_do_not_fire() {
        let result = score(json!({"navigator": {"userAgent": "Mozilla/5.0"}}));
        assert_eq!(result.factors.missing_plugins, 0);
    }

    #[test]
    fn test_suspicious_user_agents() {
        for ua in [
            "curl/7.68.0",
            "Wget/1.21",
            "python-requests/2.31.0",
            "Java/17.0.2",
            "Mozilla/5.0 HeadlessChrome/120.0.0.0",
            "Mozilla/5.0 PhantomJS/2.1.1",
        ] {
            assert!(is_suspicious_user_agent(ua), "{ua} should be suspicious");
        }
        assert!(!is_suspicious_user_agent("Mozilla/5.0 (Macintosh) Safari/605.1.15"));
        assert!(!is_suspicious_user_agent("Javascript/enabled"));
    }

    #[test]
    fn test_curl_user_agent_factor() {
        let result = score(json!({"navigator": {"userAgent": "curl/7.68.0"}}));
        assert_eq!(result.factors.suspicious_user_agent, 1);
        assert_eq!(result.score, 0.02);
    }

    #[test]
    fn test_all_factors() {
        let result = score(json!({
            "bot": {
                "webdriver": true,
                "phantom": true,
                "selenium": true,
                "chromeRuntime": true,
                "inconsistentPermissions": true
            },
            "navigator": {"plugins": [], "userAgent": "HeadlessChrome"}
        }));
        assert_eq!(result.score, 1.0);
        assert_eq!(result.factors.fired().len(), 7);
    }

    #[test]
    fn test_fired_names() {
        let result = score(json!({"bot": {"phantom": true}, "navigator": {"plugins": []}}));
        assert_eq!(result.factors.fired(), vec!["phantom", "missingPlugins"]);
        assert_eq!(result.score, 0.28);
    }

    #[test]
    fn test_factor_serialization() {
        let json = serde_json::to_value(BotFactors::default()).unwrap();
        assert!(json.get("chromeRuntime").is_some());
        assert!(json.get("suspiciousUserAgent").is_some());
    }
}
