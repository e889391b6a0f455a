//! Browser vs. geolocation timezone consistency.
//!
//! Zones are compared by their UTC offset at the moment of comparison, so
//! differently named zones that currently share an offset (including DST) are
//! consistent. A small alias table covers legacy names.

use super::{DetectionContext, Detector};
use crate::config::TimezoneConfig;
use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Legacy and canonical names for the same zone.
const TIMEZONE_ALIASES: &[(&str, &str)] = &[
    ("US/Eastern", "America/New_York"),
    ("US/Central", "America/Chicago"),
    ("US/Mountain", "America/Denver"),
    ("US/Pacific", "America/Los_Angeles"),
    ("US/Alaska", "America/Anchorage"),
    ("US/Hawaii", "Pacific/Honolulu"),
    ("UTC", "GMT"),
    ("UTC", "Etc/UTC"),
    ("GMT", "Etc/GMT"),
    ("Asia/Calcutta", "Asia/Kolkata"),
    ("Asia/Saigon", "Asia/Ho_Chi_Minh"),
    ("Asia/Katmandu", "Asia/Kathmandu"),
    ("Asia/Rangoon", "Asia/Yangon"),
    ("Europe/Kiev", "Europe/Kyiv"),
    ("America/Buenos_Aires", "America/Argentina/Buenos_Aires"),
    ("Australia/ACT", "Australia/Sydney"),
];

/// Compares the browser-reported zone with the geolocated one.
#[derive(Debug, Clone, Default)]
pub struct TimezoneComparator {
    /// Configured aliases on top of the built-in table
    extra_aliases: Vec<(String, String)>,
    /// Treat an unresolvable zone name as a mismatch
    unknown_zone_is_mismatch: bool,
}

impl TimezoneComparator {
    /// Create a comparator from configuration.
    pub fn new(config: &TimezoneConfig) -> Self {
        Self {
            extra_aliases: config.extra_aliases.clone(),
            unknown_zone_is_mismatch: config.unknown_zone_is_mismatch,
        }
    }

    /// 1 if the zones disagree right now, otherwise 0.
    pub fn mismatch(&self, browser: Option<&str>, geo: Option<&str>) -> u8 {
        self.mismatch_at(browser, geo, Utc::now())
    }

    /// 1 if the zones disagree at `at`, otherwise 0.
    pub fn mismatch_at(&self, browser: Option<&str>, geo: Option<&str>, at: DateTime<Utc>) -> u8 {
        let (Some(browser), Some(geo)) = (non_empty(browser), non_empty(geo)) else {
            return 0;
        };
        if browser == geo {
            return 0;
        }

        let browser_offset = utc_offset_minutes(browser, at);
        let geo_offset = utc_offset_minutes(geo, at);
        if let (Some(b), Some(g)) = (browser_offset, geo_offset) {
            if b == g {
                return 0;
            }
        }

        if self.are_aliases(browser, geo) {
            return 0;
        }

        if browser_offset.is_none() || geo_offset.is_none() {
            debug!(browser, geo, "Unresolvable timezone name");
            return u8::from(self.unknown_zone_is_mismatch);
        }

        1
    }

    /// Whether two zone names are listed as equivalent, in either order.
    pub fn are_aliases(&self, a: &str, b: &str) -> bool {
        let builtin = TIMEZONE_ALIASES
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a));
        builtin
            || self
                .extra_aliases
                .iter()
                .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

impl Detector for TimezoneComparator {
    type Output = u8;

    fn analyze(&self, ctx: &DetectionContext<'_>) -> u8 {
        self.mismatch(ctx.browser_timezone(), ctx.geo_timezone)
    }

    fn name(&self) -> &'static str {
        "timezone"
    }
}

/// UTC offset of an IANA zone at `at`, in minutes. `None` for unknown zones.
///
/// Zone names match in any letter case.
pub fn utc_offset_minutes(zone: &str, at: DateTime<Utc>) -> Option<i32> {
    let tz = zone
        .parse::<Tz>()
        .or_else(|_| Tz::from_str_insensitive(zone))
        .ok()?;
    Some(at.with_timezone(&tz).offset().fix().local_minus_utc() / 60)
}

/// Mismatch check with the default comparator.
pub fn get_timezone_mismatch(browser: Option<&str>, geo: Option<&str>) -> u8 {
    TimezoneComparator::default().mismatch(browser, geo)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn winter() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn summer() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_identical_zones() {
        assert_eq!(get_timezone_mismatch(Some("Europe/London"), Some("Europe/London")), 0);
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(get_timezone_mismatch(None, Some("Europe/London")), 0);
        assert_eq!(get_timezone_mismatch(Some("Europe/London"), None), 0);
        assert_eq!(get_timezone_mismatch(Some(""), Some("Europe/London")), 0);
    }

    #[test]
    fn test_legacy_alias() {
        assert_eq!(get_timezone_mismatch(Some("US/Eastern"), Some("America/New_York")), 0);
        assert_eq!(get_timezone_mismatch(Some("Asia/Calcutta"), Some("Asia/Kolkata")), 0);
    }

    #[test]
    fn test_different_offsets() {
        assert_eq!(get_timezone_mismatch(Some("Asia/Tokyo"), Some("America/Los_Angeles")), 1);
    }

    #[test]
    fn test_zone_names_ignore_case() {
        let tz = TimezoneComparator::default();
        assert_eq!(tz.mismatch_at(Some("asia/tokyo"), Some("America/Los_Angeles"), winter()), 1);
        assert_eq!(tz.mismatch_at(Some("ASIA/TOKYO"), Some("Asia/Tokyo"), winter()), 0);
        assert_eq!(utc_offset_minutes("asia/kolkata", winter()), Some(330));
    }

    #[test]
    fn test_offset_depends_on_dst() {
        let tz = TimezoneComparator::default();
        // London matches Lisbon all year
        assert_eq!(tz.mismatch_at(Some("Europe/London"), Some("Europe/Lisbon"), winter()), 0);
        assert_eq!(tz.mismatch_at(Some("Europe/London"), Some("Europe/Lisbon"), summer()), 0);
        // London matches Accra (no DST) only in winter
        assert_eq!(tz.mismatch_at(Some("Europe/London"), Some("Africa/Accra"), winter()), 0);
        assert_eq!(tz.mismatch_at(Some("Europe/London"), Some("Africa/Accra"), summer()), 1);
    }

    #[test]
    fn test_utc_offset_minutes() {
        assert_eq!(utc_offset_minutes("Asia/Kolkata", winter()), Some(330));
        assert_eq!(utc_offset_minutes("America/New_York", winter()), Some(-300));
        assert_eq!(utc_offset_minutes("America/New_York", summer()), Some(-240));
        assert_eq!(utc_offset_minutes("Mars/Olympus_Mons", winter()), None);
    }

    #[test]
    fn test_unknown_zone_fails_open_by_default() {
        let tz = TimezoneComparator::default();
        assert_eq!(tz.mismatch(Some("Not/AZone"), Some("Asia/Tokyo")), 0);
    }

    #[test]
    fn test_unknown_zone_strict_policy() {
        let tz = TimezoneComparator::new(&TimezoneConfig {
            unknown_zone_is_mismatch: true,
            extra_aliases: vec![],
        });
        assert_eq!(tz.mismatch(Some("Not/AZone"), Some("Asia/Tokyo")), 1);
        assert_eq!(tz.mismatch(Some("Asia/Tokyo"), Some("Asia/Tokyo")), 0);
    }

    #[test]
    fn test_extra_aliases() {
        let tz = TimezoneComparator::new(&TimezoneConfig {
            unknown_zone_is_mismatch: true,
            extra_aliases: vec![("Local/Office".to_string(), "Europe/Paris".to_string())],
        });
        assert_eq!(tz.mismatch(Some("Europe/Paris"), Some("Local/Office")), 0);
    }
}
