//! Certificate builder utilities.
//!
//! This module translates a [`CertificateTemplate`] into rcgen parameters and
//! wraps DER artifacts in PEM.

use crate::cert::template::{CertificateTemplate, ExtendedKeyUsage, KeyUsage};
use crate::crypto::rsa::Keypair;
use crate::error::{Result, TlsyaError};
use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose, SanType, SerialNumber,
};

/// PEM label of the private key file.
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// PEM label of the certificate file.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Build a subject consisting of a single organization attribute.
pub fn subject_name(organization: &str) -> Result<DistinguishedName> {
    let organization = organization.trim();
    if organization.is_empty() {
        return Err(TlsyaError::Signing(
            "Subject organization cannot be empty".to_string(),
        ));
    }

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, organization);
    Ok(dn)
}

/// Translate a template into rcgen parameters for an RSA/SHA-256 certificate.
///
/// The template is checked for the things rcgen would happily encode but a
/// TLS client would reject.
pub fn template_to_params(template: &CertificateTemplate) -> Result<CertificateParams> {
    if template.ip_addresses.is_empty() {
        return Err(TlsyaError::Signing(
            "Template has no IP addresses".to_string(),
        ));
    }
    if template.not_after <= template.not_before {
        return Err(TlsyaError::Signing(format!(
            "Template validity window is empty ({} .. {})",
            template.not_before, template.not_after
        )));
    }
    if template.is_ca {
        return Err(TlsyaError::Signing(
            "CA certificates are not supported".to_string(),
        ));
    }

    let mut params = CertificateParams::default();
    params.alg = &rcgen::PKCS_RSA_SHA256;
    params.distinguished_name = subject_name(&template.subject_organization)?;
    params.serial_number = Some(SerialNumber::from_slice(
        &template.serial_number.to_be_bytes(),
    ));
    params.not_before = template.not_before;
    params.not_after = template.not_after;
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = template
        .key_usage
        .iter()
        .map(|usage| match usage {
            KeyUsage::DigitalSignature => KeyUsagePurpose::DigitalSignature,
            KeyUsage::KeyEncipherment => KeyUsagePurpose::KeyEncipherment,
        })
        .collect();
    params.extended_key_usages = template
        .extended_key_usage
        .iter()
        .map(|usage| match usage {
            ExtendedKeyUsage::ServerAuth => ExtendedKeyUsagePurpose::ServerAuth,
        })
        .collect();
    params.subject_alt_names = template
        .ip_addresses
        .iter()
        .copied()
        .map(SanType::IpAddress)
        .collect();

    Ok(params)
}

/// Convert an RSA keypair to an rcgen KeyPair able to sign with RSA/SHA-256.
pub fn keypair_to_rcgen(keypair: &Keypair) -> Result<KeyPair> {
    let pkcs8_der = keypair.pkcs8_der()?;

    KeyPair::from_der_and_sign_algo(&pkcs8_der, &rcgen::PKCS_RSA_SHA256)
        .map_err(|e| TlsyaError::KeyGeneration(format!("Failed to convert keypair: {}", e)))
}

/// Wrap PKCS#8 DER in a `PRIVATE KEY` PEM block.
pub fn private_key_to_pem(pkcs8_der: &[u8]) -> String {
    pem::encode(&pem::Pem::new(PRIVATE_KEY_LABEL, pkcs8_der))
}

/// Wrap X.509 DER in a `CERTIFICATE` PEM block.
pub fn cert_to_pem(cert_der: &[u8]) -> String {
    pem::encode(&pem::Pem::new(CERTIFICATE_LABEL, cert_der))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::template::build_template;
    use crate::config::IssuanceConfig;
    use time::Duration;

    fn template() -> CertificateTemplate {
        let config = IssuanceConfig::from_ip_list("127.0.0.1,::1", "key.pem", "cert.pem");
        build_template(&config).unwrap()
    }

    #[test]
    fn test_subject_name_single_field() {
        let dn = subject_name("TLSYA Self-Signed").unwrap();
        assert_eq!(dn.iter().count(), 1);
    }

    #[test]
    fn test_subject_name_empty() {
        assert!(subject_name("  ").is_err());
    }

    #[test]
    fn test_template_to_params() {
        let template = template();
        let params = template_to_params(&template).unwrap();

        assert!(matches!(params.is_ca, IsCa::ExplicitNoCa));
        assert_eq!(params.subject_alt_names.len(), 2);
        assert_eq!(params.key_usages.len(), 2);
        assert_eq!(
            params.extended_key_usages,
            vec![ExtendedKeyUsagePurpose::ServerAuth]
        );
        assert_eq!(params.not_after - params.not_before, Duration::days(365));
    }

    #[test]
    fn test_template_without_addresses_rejected() {
        let mut template = template();
        template.ip_addresses.clear();

        let result = template_to_params(&template);
        assert!(matches!(result, Err(TlsyaError::Signing(_))));
    }

    #[test]
    fn test_template_with_inverted_validity_rejected() {
        let mut template = template();
        template.not_after = template.not_before - Duration::days(1);

        let result = template_to_params(&template);
        assert!(matches!(result, Err(TlsyaError::Signing(_))));
    }

    #[test]
    fn test_ca_template_rejected() {
        let mut template = template();
        template.is_ca = true;

        assert!(template_to_params(&template).is_err());
    }

    #[test]
    fn test_private_key_to_pem() {
        let pem = private_key_to_pem(&[1, 2, 3]);

        assert!(pem.contains("BEGIN PRIVATE KEY"));
        assert!(pem.contains("END PRIVATE KEY"));
    }

    #[test]
    fn test_cert_to_pem() {
        let pem = cert_to_pem(&[1, 2, 3]);

        assert!(pem.contains("BEGIN CERTIFICATE"));
        assert!(pem.contains("END CERTIFICATE"));
    }
}
