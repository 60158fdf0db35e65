//! Issuance configuration.
//!
//! An [`IssuanceConfig`] names the IP addresses the certificate is valid for
//! and where the key and certificate land on disk.

use crate::error::{Result, TlsyaError};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Default output path for the private key.
pub const DEFAULT_KEY_PATH: &str = "key.pem";

/// Default output path for the certificate.
pub const DEFAULT_CERT_PATH: &str = "cert.pem";

/// Input to a single issuance call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceConfig {
    /// IP address literals (IPv4 or IPv6) to place in the SAN extension.
    pub ip_addresses: Vec<String>,

    /// Where the PEM-encoded private key is written.
    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,

    /// Where the PEM-encoded certificate is written.
    #[serde(default = "default_cert_path")]
    pub cert_path: PathBuf,
}

fn default_key_path() -> PathBuf {
    PathBuf::from(DEFAULT_KEY_PATH)
}

fn default_cert_path() -> PathBuf {
    PathBuf::from(DEFAULT_CERT_PATH)
}

impl IssuanceConfig {
    /// Create a configuration from already-split address strings.
    pub fn new(
        ip_addresses: Vec<String>,
        key_path: impl Into<PathBuf>,
        cert_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ip_addresses,
            key_path: key_path.into(),
            cert_path: cert_path.into(),
        }
    }

    /// Create a configuration from a comma-separated address list such as
    /// `"127.0.0.1,::1"`. Empty segments are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use tlsya::config::IssuanceConfig;
    ///
    /// let config = IssuanceConfig::from_ip_list("127.0.0.1, 10.0.0.2", "key.pem", "cert.pem");
    /// assert_eq!(config.ip_addresses, vec!["127.0.0.1", "10.0.0.2"]);
    /// ```
    pub fn from_ip_list(
        list: &str,
        key_path: impl Into<PathBuf>,
        cert_path: impl Into<PathBuf>,
    ) -> Self {
        let ip_addresses = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self::new(ip_addresses, key_path, cert_path)
    }

    /// Check the address list without touching randomness or the filesystem.
    pub fn validate(&self) -> Result<Vec<IpAddr>> {
        parse_ip_addresses(&self.ip_addresses)
    }
}

/// Parse every address literal. Any failure reports all bad entries at once.
///
/// An empty list is rejected: a certificate with no SAN is useless for IP-based TLS.
pub fn parse_ip_addresses(addresses: &[String]) -> Result<Vec<IpAddr>> {
    if addresses.is_empty() {
        return Err(TlsyaError::Configuration(
            "At least one IP address is required".to_string(),
        ));
    }

    let mut parsed = Vec::with_capacity(addresses.len());
    let mut invalid = Vec::new();

    for raw in addresses {
        match raw.trim().parse::<IpAddr>() {
            Ok(ip) => parsed.push(ip),
            Err(_) => invalid.push(format!("'{}'", raw)),
        }
    }

    if !invalid.is_empty() {
        return Err(TlsyaError::Configuration(format!(
            "Invalid IP address(es): {}",
            invalid.join(", ")
        )));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_ipv4_and_ipv6() {
        let parsed = parse_ip_addresses(&strings(&["127.0.0.1", "::1"])).unwrap();
        assert_eq!(
            parsed,
            vec![
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(Ipv6Addr::LOCALHOST)
            ]
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let parsed = parse_ip_addresses(&strings(&[" 10.0.0.1 "])).unwrap();
        assert_eq!(parsed, vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))]);
    }

    #[test]
    fn test_parse_empty_list() {
        let result = parse_ip_addresses(&[]);
        assert!(matches!(result, Err(TlsyaError::Configuration(_))));
    }

    #[test]
    fn test_parse_lists_every_invalid_entry() {
        let result = parse_ip_addresses(&strings(&["999.999.999.999", "127.0.0.1", "localhost"]));

        match result {
            Err(TlsyaError::Configuration(msg)) => {
                assert!(msg.contains("999.999.999.999"));
                assert!(msg.contains("localhost"));
                assert!(!msg.contains("127.0.0.1"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_ip_list_splits_and_skips_empty() {
        let config = IssuanceConfig::from_ip_list("127.0.0.1,, ::1 ,", "k.pem", "c.pem");
        assert_eq!(config.ip_addresses, strings(&["127.0.0.1", "::1"]));
        assert_eq!(config.key_path, PathBuf::from("k.pem"));
        assert_eq!(config.cert_path, PathBuf::from("c.pem"));
    }

    #[test]
    fn test_from_empty_ip_list_fails_validation() {
        let config = IssuanceConfig::from_ip_list("", DEFAULT_KEY_PATH, DEFAULT_CERT_PATH);
        assert!(config.ip_addresses.is_empty());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_applies_default_paths() {
        let config: IssuanceConfig =
            serde_json::from_str(r#"{ "ip_addresses": ["192.168.1.1"] }"#).unwrap();

        assert_eq!(config.key_path, PathBuf::from(DEFAULT_KEY_PATH));
        assert_eq!(config.cert_path, PathBuf::from(DEFAULT_CERT_PATH));
        assert_eq!(config.validate().unwrap().len(), 1);
    }
}
