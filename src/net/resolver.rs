//! Module `resolver`
//!
//! Picks the local address the server advertises for passive-mode data
//! connections. A passive client can only reach an address on its own
//! network, so each non-loopback IPv4 interface is widened to a /24 and the
//! first block containing the peer wins. Interfaces are rediscovered on
//! every request; nothing is cached.

use std::net::{IpAddr, Ipv4Addr};

use if_addrs::{IfAddr, get_if_addrs};
use ipnet::Ipv4Net;
use log::{debug, warn};

const SUBNET_PREFIX: u8 = 24;

/// Resolves the advertised address for passive data connections.
pub struct AddrResolver {
    pinned: Option<Ipv4Addr>,
}

impl AddrResolver {
    /// A pinned address (from configuration) always wins over discovery.
    pub fn new(pinned: Option<Ipv4Addr>) -> Self {
        Self { pinned }
    }

    /// Address to advertise to `peer`. Falls back to loopback when no
    /// interface shares a /24 with the peer.
    pub fn resolve(&self, peer: IpAddr) -> Ipv4Addr {
        if let Some(addr) = self.pinned {
            return addr;
        }

        let candidates = interface_addresses();
        match match_subnet(&candidates, peer) {
            Some(addr) => {
                debug!("Advertising {} for passive peer {}", addr, peer);
                addr
            }
            None => {
                debug!(
                    "No interface shares a /{} with peer {}; advertising loopback",
                    SUBNET_PREFIX, peer
                );
                Ipv4Addr::LOCALHOST
            }
        }
    }
}

/// Non-loopback IPv4 addresses of the host, rediscovered on every call.
fn interface_addresses() -> Vec<Ipv4Addr> {
    match get_if_addrs() {
        Ok(interfaces) => interfaces
            .into_iter()
            .filter(|iface| !iface.is_loopback())
            .filter_map(|iface| match iface.addr {
                IfAddr::V4(v4) => Some(v4.ip),
                _ => None,
            })
            .collect(),
        Err(e) => {
            warn!("Interface discovery failed: {}", e);
            Vec::new()
        }
    }
}

/// First candidate whose /24 network contains the peer.
fn match_subnet(candidates: &[Ipv4Addr], peer: IpAddr) -> Option<Ipv4Addr> {
    let IpAddr::V4(peer) = peer else {
        return None;
    };

    candidates.iter().copied().find(|addr| {
        Ipv4Net::new(*addr, SUBNET_PREFIX)
            .map(|net| net.trunc().contains(&peer))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn peer_matches_interface_block() {
        let candidates = [v4("10.0.0.5"), v4("192.168.1.7")];
        assert_eq!(
            match_subnet(&candidates, IpAddr::V4(v4("192.168.1.42"))),
            Some(v4("192.168.1.7"))
        );
    }

    #[test]
    fn first_matching_interface_wins() {
        let candidates = [v4("192.168.1.3"), v4("192.168.1.200")];
        assert_eq!(
            match_subnet(&candidates, IpAddr::V4(v4("192.168.1.42"))),
            Some(v4("192.168.1.3"))
        );
    }

    #[test]
    fn unmatched_peer_yields_none() {
        let candidates = [v4("10.0.0.5"), v4("192.168.1.7")];
        assert_eq!(match_subnet(&candidates, IpAddr::V4(v4("172.16.0.9"))), None);
    }

    #[test]
    fn ipv6_peer_never_matches() {
        let candidates = [v4("10.0.0.5")];
        assert_eq!(match_subnet(&candidates, "::1".parse().unwrap()), None);
    }

    #[test]
    fn resolver_falls_back_to_loopback() {
        let resolver = AddrResolver::new(None);
        // Reserved documentation range; no host interface sits in it.
        assert_eq!(
            resolver.resolve(IpAddr::V4(v4("192.0.2.1"))),
            Ipv4Addr::LOCALHOST
        );
    }

    #[test]
    fn pinned_address_wins() {
        let resolver = AddrResolver::new(Some(v4("203.0.113.7")));
        assert_eq!(resolver.resolve(IpAddr::V4(v4("10.0.0.1"))), v4("203.0.113.7"));
    }
}
