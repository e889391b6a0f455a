//! Network reputation flags for a client IP.

use super::{DetectionContext, Detector};
use crate::cidr;
use crate::reputation::{DatacenterList, TorList, VpnList};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reputation flags resolved for one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFlags {
    pub is_vpn: bool,
    pub is_tor: bool,
    pub is_datacenter: bool,
    pub datacenter_provider: Option<String>,
}

/// Looks up a client IP in the VPN, Tor and datacenter lists.
#[derive(Debug, Clone)]
pub struct NetworkDetector {
    vpn: Arc<VpnList>,
    tor: Arc<TorList>,
    datacenter: Arc<DatacenterList>,
    /// Never flag private, loopback or link-local addresses
    skip_private: bool,
}

impl NetworkDetector {
    /// Create a detector over shared lists.
    pub fn new(
        vpn: Arc<VpnList>,
        tor: Arc<TorList>,
        datacenter: Arc<DatacenterList>,
        skip_private: bool,
    ) -> Self {
        Self {
            vpn,
            tor,
            datacenter,
            skip_private,
        }
    }

    /// Resolve flags for an address. Missing and IPv6 addresses are unflagged.
    pub fn lookup(&self, ip: Option<&str>) -> NetworkFlags {
        let Some(ip) = ip.map(str::trim).filter(|ip| !ip.is_empty()) else {
            return NetworkFlags::default();
        };
        if cidr::is_ipv6(ip) || (self.skip_private && cidr::is_private_ip(ip)) {
            return NetworkFlags::default();
        }

        let datacenter_provider = self.datacenter.provider(ip);
        NetworkFlags {
            is_vpn: self.vpn.contains(ip),
            is_tor: self.tor.contains(ip),
            is_datacenter: datacenter_provider.is_some(),
            datacenter_provider,
        }
    }

    pub(crate) fn vpn_list(&self) -> &VpnList {
        &self.vpn
    }

    pub(crate) fn tor_list(&self) -> &TorList {
        &self.tor
    }

    pub(crate) fn datacenter_list(&self) -> &DatacenterList {
        &self.datacenter
    }
}

impl Detector for NetworkDetector {
    type Output = NetworkFlags;

    fn analyze(&self, ctx: &DetectionContext<'_>) -> NetworkFlags {
        self.lookup(ctx.client_ip)
    }

    fn name(&self) -> &'static str {
        "network_reputation"
    }
}
