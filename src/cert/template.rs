//! Default certificate template.
//!
//! [`build_template`] turns an [`IssuanceConfig`] into the descriptor the
//! issuer signs: a random 128-bit serial, a one-year validity window starting
//! now, server-auth key usages and the configured IP addresses as SANs.

use crate::config::{parse_ip_addresses, IssuanceConfig};
use crate::error::{Result, TlsyaError};
use rand::rngs::OsRng;
use rand::RngCore;
use std::net::IpAddr;
use time::{Duration, OffsetDateTime};

/// Organization placed in the subject (and issuer) of every default certificate.
pub const SUBJECT_ORGANIZATION: &str = "TLSYA Self-Signed";

/// Lifetime of a default certificate.
pub const VALIDITY: Duration = Duration::days(365);

/// Key usage bits carried by the certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    DigitalSignature,
    KeyEncipherment,
}

/// Extended key usage purposes carried by the certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedKeyUsage {
    ServerAuth,
}

/// Everything the issuer needs to know about the certificate's shape.
///
/// Callers with special needs may build one by hand and pass it to
/// [`crate::cert::issuer::generate_tls_from`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateTemplate {
    pub serial_number: u128,
    pub subject_organization: String,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    pub key_usage: Vec<KeyUsage>,
    pub extended_key_usage: Vec<ExtendedKeyUsage>,
    /// Always emitted as an explicit basicConstraints extension.
    pub is_ca: bool,
    pub ip_addresses: Vec<IpAddr>,
}

/// Build the default template for `config`.
///
/// Fails with [`TlsyaError::Configuration`] when the address list is empty or
/// holds anything that is not an IP literal, and with [`TlsyaError::Entropy`]
/// when the OS random source is unavailable.
///
/// # Example
///
/// ```
/// use tlsya::cert::template::build_template;
/// use tlsya::config::IssuanceConfig;
///
/// # fn example() -> tlsya::error::Result<()> {
/// let config = IssuanceConfig::from_ip_list("127.0.0.1", "key.pem", "cert.pem");
/// let template = build_template(&config)?;
/// assert_eq!(template.ip_addresses.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn build_template(config: &IssuanceConfig) -> Result<CertificateTemplate> {
    let ip_addresses = parse_ip_addresses(&config.ip_addresses)?;
    let serial_number = generate_serial_number()?;
    let (not_before, not_after) = validity_from_now();

    tracing::debug!(
        serial = %hex::encode(serial_number.to_be_bytes()),
        ips = ip_addresses.len(),
        "built certificate template"
    );

    Ok(CertificateTemplate {
        serial_number,
        subject_organization: SUBJECT_ORGANIZATION.to_string(),
        not_before,
        not_after,
        key_usage: vec![KeyUsage::KeyEncipherment, KeyUsage::DigitalSignature],
        extended_key_usage: vec![ExtendedKeyUsage::ServerAuth],
        is_ca: false,
        ip_addresses,
    })
}

/// Draw a serial uniformly from [0, 2^128).
pub fn generate_serial_number() -> Result<u128> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TlsyaError::Entropy(format!("Failed to generate serial number: {}", e)))?;
    Ok(u128::from_be_bytes(bytes))
}

// X.509 stores whole seconds, so the window is truncated here to keep
// not_after - not_before exact once encoded.
fn validity_from_now() -> (OffsetDateTime, OffsetDateTime) {
    let now = OffsetDateTime::now_utc();
    let not_before = now - Duration::nanoseconds(i64::from(now.nanosecond()));
    (not_before, not_before + VALIDITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ips: &[&str]) -> IssuanceConfig {
        IssuanceConfig::new(
            ips.iter().map(|s| s.to_string()).collect(),
            "key.pem",
            "cert.pem",
        )
    }

    #[test]
    fn test_build_template_defaults() {
        let template = build_template(&config(&["127.0.0.1", "192.168.1.1"])).unwrap();

        assert_eq!(template.subject_organization, SUBJECT_ORGANIZATION);
        assert_eq!(template.ip_addresses.len(), 2);
        assert!(!template.is_ca);
        assert!(template.key_usage.contains(&KeyUsage::DigitalSignature));
        assert!(template.key_usage.contains(&KeyUsage::KeyEncipherment));
        assert_eq!(template.extended_key_usage, vec![ExtendedKeyUsage::ServerAuth]);
    }

    #[test]
    fn test_validity_is_one_year() {
        let template = build_template(&config(&["::1"])).unwrap();

        assert!(template.not_after > template.not_before);
        assert_eq!(template.not_after - template.not_before, Duration::hours(365 * 24));
        assert_eq!(template.not_before.nanosecond(), 0);
    }

    #[test]
    fn test_not_before_is_now() {
        let before = OffsetDateTime::now_utc() - Duration::seconds(1);
        let template = build_template(&config(&["127.0.0.1"])).unwrap();
        let after = OffsetDateTime::now_utc();

        assert!(template.not_before >= before);
        assert!(template.not_before <= after);
    }

    #[test]
    fn test_serial_numbers_differ() {
        let t1 = build_template(&config(&["127.0.0.1"])).unwrap();
        let t2 = build_template(&config(&["127.0.0.1"])).unwrap();
        assert_ne!(t1.serial_number, t2.serial_number);
    }

    #[test]
    fn test_empty_addresses_rejected() {
        let result = build_template(&config(&[]));
        assert!(matches!(result, Err(TlsyaError::Configuration(_))));
    }

    #[test]
    fn test_unparseable_address_rejected() {
        let result = build_template(&config(&["127.0.0.1", "999.999.999.999"]));

        match result {
            Err(TlsyaError::Configuration(msg)) => assert!(msg.contains("999.999.999.999")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }
}
