//! Tor exit node list.
//!
//! One exact IPv4 address per line, held in a hash set.

use super::{ListFormat, ReputationList};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Strict dotted-quad shape. Octet range is not checked.
static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$").expect("valid regex: dotted quad")
});

/// Tor exit node addresses.
pub type TorList = ReputationList<TorFormat>;

/// Line format of the Tor exit list.
pub struct TorFormat;

impl ListFormat for TorFormat {
    type Entries = HashSet<String>;

    const NAME: &'static str = "tor";

    fn parse<'a>(lines: impl Iterator<Item = &'a str>) -> Self::Entries {
        lines
            .filter(|line| DOTTED_QUAD.is_match(line))
            .map(str::to_string)
            .collect()
    }

    fn contains(entries: &Self::Entries, ip: &str) -> bool {
        entries.contains(ip)
    }

    fn len(entries: &Self::Entries) -> usize {
        entries.len()
    }
}
