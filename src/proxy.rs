// src/proxy.rs
use ipnetwork::IpNetwork;
use log::{error, info};
use std::net::IpAddr;
use std::str::FromStr;

/// Reverse proxies whose forwarding headers are believed.
#[derive(Debug, Default, Clone)]
pub struct TrustedProxies {
    networks: Vec<IpNetwork>,
}

impl TrustedProxies {
    /// Parses a comma separated CIDR list. Bad entries are logged and skipped.
    pub fn from_list(list: &str) -> Self {
        let mut networks = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match IpNetwork::from_str(entry) {
                Ok(network) => networks.push(network),
                Err(e) => error!("Ignoring invalid trusted proxy {}: {}", entry, e),
            }
        }
        if !networks.is_empty() {
            info!("Loaded {} trusted proxy ranges", networks.len());
        }
        Self { networks }
    }

    pub fn is_trusted(&self, ip: IpAddr) -> bool {
        self.networks.iter().any(|network| network.contains(ip))
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_matches_ranges() {
        let proxies = TrustedProxies::from_list("10.0.0.0/8, bogus, ::1/128,");
        assert_eq!(proxies.len(), 2);
        assert!(proxies.is_trusted("10.20.30.40".parse().unwrap()));
        assert!(proxies.is_trusted("::1".parse().unwrap()));
        assert!(!proxies.is_trusted("192.168.0.1".parse().unwrap()));
    }

    #[test]
    fn empty_list_trusts_nobody() {
        let proxies = TrustedProxies::from_list("");
        assert!(proxies.is_empty());
        assert!(!proxies.is_trusted("127.0.0.1".parse().unwrap()));
    }
}
