//! Datacenter / hosting provider ranges.
//!
//! Each line is a range followed by an optional provider name, separated by
//! whitespace or a comma:
//!
//! ```text
//! # range          provider
//! 3.0.0.0/9        Amazon AWS
//! 34.64.0.0/10,Google Cloud
//! ```

use super::{ListFormat, ReputationList};
use crate::cidr::{self, CidrBlock};

/// Provider name used when a line has none.
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Datacenter ranges tagged with provider names.
pub type DatacenterList = ReputationList<DatacenterFormat>;

/// A single datacenter range.
#[derive(Debug, Clone)]
pub struct DatacenterRange {
    pub block: CidrBlock,
    pub provider: String,
}

/// Line format of the datacenter list.
pub struct DatacenterFormat;

impl DatacenterFormat {
    fn find<'e>(entries: &'e [DatacenterRange], ip: &str) -> Option<&'e DatacenterRange> {
        let parsed = cidr::parse_ipv4(ip);
        entries.iter().find(|range| range.block.matches(ip, parsed))
    }
}

impl ListFormat for DatacenterFormat {
    type Entries = Vec<DatacenterRange>;

    const NAME: &'static str = "datacenter";

    fn parse<'a>(lines: impl Iterator<Item = &'a str>) -> Self::Entries {
        lines
            .filter_map(|line| {
                let (range, provider) = line
                    .split_once(|c: char| c == ',' || c.is_whitespace())
                    .map_or((line, ""), |(range, rest)| {
                        (range, rest.trim_matches(|c: char| c == ',' || c.is_whitespace()))
                    });
                let provider = if provider.is_empty() {
                    UNKNOWN_PROVIDER
                } else {
                    provider
                };
                CidrBlock::parse(range).map(|block| DatacenterRange {
                    block,
                    provider: provider.to_string(),
                })
            })
            .collect()
    }

    fn contains(entries: &Self::Entries, ip: &str) -> bool {
        Self::find(entries, ip).is_some()
    }

    fn len(entries: &Self::Entries) -> usize {
        entries.len()
    }
}

impl DatacenterList {
    /// Provider name of the first range containing `ip`.
    pub fn provider(&self, ip: &str) -> Option<String> {
        if cidr::is_ipv6(ip) {
            return None;
        }
        let entries = self.entries();
        DatacenterFormat::find(&entries, ip).map(|range| range.provider.clone())
    }
}
