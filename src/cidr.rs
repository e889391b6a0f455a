//! IPv4 CIDR matching.
//!
//! All functions here fail closed: malformed addresses or ranges never match
//! and never panic.

use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

/// Ranges treated as private/internal.
///
/// `::1/128` is listed for completeness only. Ranges are matched as IPv4, so
/// an IPv6 entry with a prefix never matches anything.
pub const PRIVATE_RANGES: &[&str] = &[
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "::1/128",
];

/// Parse a dotted-quad IPv4 address into its big-endian `u32` form.
///
/// Returns `None` unless the input has exactly four numeric octets in 0-255.
pub fn ip_to_int(ip: &str) -> Option<u32> {
    parse_ipv4(ip).map(u32::from)
}

/// Parse a dotted-quad IPv4 address.
pub fn parse_ipv4(ip: &str) -> Option<Ipv4Addr> {
    ip.parse::<Ipv4Addr>().ok()
}

/// Returns true if the address looks like IPv6 (contains a colon).
pub fn is_ipv6(ip: &str) -> bool {
    ip.contains(':')
}

/// A single entry of a range list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CidrBlock {
    /// Entry without a `/`, compared as an exact string.
    Exact(String),
    /// IPv4 network with a prefix length of 0-32.
    Network(Ipv4Net),
}

impl CidrBlock {
    /// Parse a list entry. Returns `None` for a malformed range.
    pub fn parse(cidr: &str) -> Option<Self> {
        let Some((addr, prefix)) = cidr.split_once('/') else {
            return Some(CidrBlock::Exact(cidr.to_string()));
        };

        let prefix: u8 = prefix.parse().ok()?;
        if prefix > 32 {
            return None;
        }
        let base = parse_ipv4(addr)?;
        Ipv4Net::new(base, prefix).ok().map(CidrBlock::Network)
    }

    /// Check an address against this entry.
    ///
    /// `parsed` is the pre-parsed form of `ip`, so lists only parse once.
    pub fn matches(&self, ip: &str, parsed: Option<Ipv4Addr>) -> bool {
        match self {
            CidrBlock::Exact(exact) => exact == ip,
            CidrBlock::Network(net) => parsed.is_some_and(|addr| net.contains(&addr)),
        }
    }

    /// Check an address against this entry, parsing it first.
    pub fn contains(&self, ip: &str) -> bool {
        self.matches(ip, parse_ipv4(ip))
    }
}

/// Returns true if `ip` falls inside `cidr`.
///
/// A `cidr` without a prefix is compared by exact string equality.
pub fn is_in_cidr(ip: &str, cidr: &str) -> bool {
    CidrBlock::parse(cidr).is_some_and(|block| block.contains(ip))
}

/// Returns true if `ip` matches any entry of `cidrs`.
///
/// Malformed entries are skipped.
pub fn is_in_cidr_list<S: AsRef<str>>(ip: &str, cidrs: &[S]) -> bool {
    let parsed = parse_ipv4(ip);
    cidrs.iter().any(|cidr| {
        CidrBlock::parse(cidr.as_ref()).is_some_and(|block| block.matches(ip, parsed))
    })
}

/// Returns true if any pre-parsed block matches `ip`.
pub fn matches_any(ip: &str, blocks: &[CidrBlock]) -> bool {
    let parsed = parse_ipv4(ip);
    blocks.iter().any(|block| block.matches(ip, parsed))
}

/// Returns true for loopback, link-local and RFC 1918 addresses.
pub fn is_private_ip(ip: &str) -> bool {
    is_in_cidr_list(ip, PRIVATE_RANGES)
}
