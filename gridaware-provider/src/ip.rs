//! Visitor identity: IP derivation, locality check, privacy-hashed cache keys

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Headers consulted for the visitor IP, in priority order.
const IP_HEADERS: [&str; 2] = ["client-ip", "x-forwarded-for"];

/// The inbound request facts the provider needs to identify a visitor.
///
/// Header names are matched case-insensitively; values may carry a
/// comma-separated proxy chain.
#[derive(Debug, Clone, Default)]
pub struct VisitorRequest {
    headers: HashMap<String, String>,
    remote_addr: Option<IpAddr>,
}

impl VisitorRequest {
    pub fn new(remote_addr: Option<IpAddr>) -> Self {
        Self {
            headers: HashMap::new(),
            remote_addr,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    /// Derive the visitor IP: forwarded headers first, then the remote
    /// address, then loopback as the deterministic last resort.
    pub fn visitor_ip(&self) -> IpAddr {
        for header in IP_HEADERS {
            if let Some(value) = self.headers.get(header) {
                for candidate in value.split(',') {
                    if let Ok(ip) = candidate.trim().parse::<IpAddr>() {
                        return ip;
                    }
                }
            }
        }
        self.remote_addr
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

/// Whether an address falls in a private or reserved range.
///
/// Local visitors get the configured fallback zone so development
/// environments behave deterministically.
pub fn is_local_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_local_v4(v4),
        IpAddr::V6(v6) => is_local_v6(v6),
    }
}

fn is_local_v4(ip: &Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        // Carrier-grade NAT, 100.64.0.0/10
        || (ip.octets()[0] == 100 && (ip.octets()[1] & 0xc0) == 64)
}

fn is_local_v6(ip: &Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_local_v4(&v4);
    }
    ip.is_loopback()
        || ip.is_unspecified()
        // Unique-local fc00::/7
        || (ip.segments()[0] & 0xfe00) == 0xfc00
        // Link-local fe80::/10
        || (ip.segments()[0] & 0xffc0) == 0xfe80
}

/// Cache key for a public visitor: a hex SHA-256 of the IP.
///
/// The raw address never appears in a persisted key.
pub fn cache_key_for_ip(ip: &IpAddr) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.to_string().as_bytes());
    format!("ci_{}", hex::encode(hasher.finalize()))
}

/// Static cache key for the local-development fallback zone.
pub fn cache_key_for_zone(zone: &str) -> String {
    format!("ci_{}", zone.to_lowercase())
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_ip_prefers_client_ip_header() {
        let req = VisitorRequest::new(Some("203.0.113.9".parse().unwrap()))
            .with_header("Client-IP", "198.51.100.7")
            .with_header("X-Forwarded-For", "192.0.2.1");
        assert_eq!(req.visitor_ip(), "198.51.100.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_visitor_ip_forwarded_chain_first_valid() {
        let req = VisitorRequest::new(None)
            .with_header("X-Forwarded-For", "not-an-ip, 198.51.100.7, 10.0.0.1");
        assert_eq!(req.visitor_ip(), "198.51.100.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_visitor_ip_falls_back_to_remote_addr() {
        let req = VisitorRequest::new(Some("192.0.2.33".parse().unwrap()));
        assert_eq!(req.visitor_ip(), "192.0.2.33".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_visitor_ip_last_resort_loopback() {
        let req = VisitorRequest::new(None);
        assert_eq!(req.visitor_ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_local_detection() {
        for local in ["127.0.0.1", "::1", "10.1.2.3", "192.168.0.10", "172.16.5.5", "169.254.0.1", "fe80::1", "fd00::1"] {
            assert!(is_local_ip(&local.parse().unwrap()), "{local} should be local");
        }
        for public in ["198.51.100.7", "8.8.8.8", "2001:4860:4860::8888"] {
            assert!(!is_local_ip(&public.parse().unwrap()), "{public} should be public");
        }
    }

    #[test]
    fn test_test_net_ranges_are_public() {
        // TEST-NET addresses stand in for public visitors; they must be
        // cached per-IP, not collapsed onto the fallback zone.
        for ip in ["192.0.2.1", "198.51.100.7", "203.0.113.9"] {
            assert!(!is_local_ip(&ip.parse().unwrap()), "{ip} should be public");
        }
    }

    #[test]
    fn test_cache_key_hides_raw_ip() {
        let ip: IpAddr = "198.51.100.7".parse().unwrap();
        let key = cache_key_for_ip(&ip);
        assert!(key.starts_with("ci_"));
        assert!(!key.contains("198.51.100.7"));
        // SHA-256 hex digest is 64 chars
        assert_eq!(key.len(), 3 + 64);
    }

    #[test]
    fn test_cache_key_deterministic() {
        let ip: IpAddr = "198.51.100.7".parse().unwrap();
        assert_eq!(cache_key_for_ip(&ip), cache_key_for_ip(&ip));
    }

    #[test]
    fn test_zone_cache_key() {
        assert_eq!(cache_key_for_zone("ES"), "ci_es");
    }
}
