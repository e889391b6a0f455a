//! Client signal bag decoding.
//!
//! The browser SDK submits an arbitrary JSON object. Decoding never fails:
//! unknown keys are ignored and any field that is missing or has the wrong
//! type is treated as absent.
//!
//! ```text
//! {
//!   "bot":       { "webdriver": bool, "phantom": bool, "selenium": bool,
//!                  "chromeRuntime": bool, "inconsistentPermissions": bool },
//!   "navigator": { "plugins": [...], "userAgent": string, "webdriver": bool },
//!   "timezone":  { "timezone": string }
//! }
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

/// Automation flags reported by the SDK's bot probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutomationFlags {
    pub webdriver: bool,
    pub phantom: bool,
    pub selenium: bool,
    pub chrome_runtime: bool,
    pub inconsistent_permissions: bool,
}

/// Signals read from `window.navigator`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigatorSignals {
    /// Plugin count, only when `plugins` was an array
    pub plugin_count: Option<usize>,
    pub user_agent: Option<String>,
    pub webdriver: bool,
}

/// Typed view of a client signal bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct SignalBag {
    pub automation: AutomationFlags,
    pub navigator: NavigatorSignals,
    /// IANA zone name reported by the browser
    pub timezone: Option<String>,
}

impl SignalBag {
    /// Decode from raw JSON. Non-object input yields an empty bag.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            return Self::default();
        };

        let automation = section(root, "bot")
            .map(|bot| AutomationFlags {
                webdriver: flag(bot, "webdriver"),
                phantom: flag(bot, "phantom"),
                selenium: flag(bot, "selenium"),
                chrome_runtime: flag(bot, "chromeRuntime"),
                inconsistent_permissions: flag(bot, "inconsistentPermissions"),
            })
            .unwrap_or_default();

        let navigator = section(root, "navigator")
            .map(|nav| NavigatorSignals {
                plugin_count: nav.get("plugins").and_then(Value::as_array).map(Vec::len),
                user_agent: text(nav, "userAgent"),
                webdriver: flag(nav, "webdriver"),
            })
            .unwrap_or_default();

        let timezone = section(root, "timezone").and_then(|tz| text(tz, "timezone"));

        Self {
            automation,
            navigator,
            timezone,
        }
    }
}

impl From<Value> for SignalBag {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn section<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    root.get(key).and_then(Value::as_object)
}

/// Only a JSON `true` counts; `"true"`, `1` and friends do not.
fn flag(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}
