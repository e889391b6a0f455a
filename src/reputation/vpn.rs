//! VPN range list.
//!
//! One CIDR range or bare IP per line. Ranges cannot be hashed, so each
//! lookup scans the whole list.

use super::{ListFormat, ReputationList};
use crate::cidr::{self, CidrBlock};
use tracing::debug;

/// VPN provider ranges.
pub type VpnList = ReputationList<VpnFormat>;

/// Line format of the VPN list.
pub struct VpnFormat;

impl ListFormat for VpnFormat {
    type Entries = Vec<CidrBlock>;

    const NAME: &'static str = "vpn";

    fn parse<'a>(lines: impl Iterator<Item = &'a str>) -> Self::Entries {
        lines
            .filter_map(|line| {
                let block = CidrBlock::parse(line);
                if block.is_none() {
                    debug!(list = Self::NAME, line, "Skipping malformed range");
                }
                block
            })
            .collect()
    }

    fn contains(entries: &Self::Entries, ip: &str) -> bool {
        cidr::matches_any(ip, entries)
    }

    fn len(entries: &Self::Entries) -> usize {
        entries.len()
    }
}
