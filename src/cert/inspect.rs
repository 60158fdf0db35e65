//! Reading issued certificates back.
//!
//! This module decodes a DER certificate with x509-cert and reports the
//! fields issuance is responsible for, and checks the self-signature.

use crate::crypto::rsa::verify_pkcs1v15_sha256;
use crate::error::{Result, TlsyaError};
use const_oid::db::rfc5280::{ID_CE_BASIC_CONSTRAINTS, ID_KP_SERVER_AUTH};
use const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION;
use const_oid::ObjectIdentifier;
use der::asn1::AnyRef;
use der::{Decode, Encode, SliceReader};
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use time::OffsetDateTime;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAltName};
use x509_cert::Certificate;

const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

// basicConstraints with cA=FALSE spelled out. DER wants the DEFAULT omitted,
// but some encoders write it anyway.
const EXPLICIT_NOT_CA: [u8; 5] = [0x30, 0x03, 0x01, 0x01, 0x00];

/// The parts of a certificate issuance controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub serial_number: u128,
    pub subject_organization: Option<String>,
    /// Issuer and subject names are identical.
    pub self_issued: bool,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    pub ip_addresses: Vec<IpAddr>,
    /// `None` when the certificate carries no basicConstraints extension.
    pub is_ca: Option<bool>,
    pub digital_signature: bool,
    pub key_encipherment: bool,
    pub server_auth: bool,
}

/// Decode a DER certificate and summarize it.
pub fn inspect_certificate(cert_der: &[u8]) -> Result<CertificateSummary> {
    let cert = decode_certificate(cert_der)?;
    let tbs = &cert.tbs_certificate;

    let ip_addresses = match tbs
        .get::<SubjectAltName>()
        .map_err(|e| TlsyaError::Certificate(format!("Invalid subjectAltName: {}", e)))?
    {
        Some((_, san)) => san
            .0
            .iter()
            .filter_map(|name| match name {
                GeneralName::IpAddress(octets) => Some(ip_from_octets(octets.as_bytes())),
                _ => None,
            })
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    let (digital_signature, key_encipherment) = match tbs
        .get::<KeyUsage>()
        .map_err(|e| TlsyaError::Certificate(format!("Invalid keyUsage: {}", e)))?
    {
        Some((_, usage)) => (usage.digital_signature(), usage.key_encipherment()),
        None => (false, false),
    };

    let server_auth = tbs
        .get::<ExtendedKeyUsage>()
        .map_err(|e| TlsyaError::Certificate(format!("Invalid extendedKeyUsage: {}", e)))?
        .map(|(_, eku)| eku.0.contains(&ID_KP_SERVER_AUTH))
        .unwrap_or(false);

    let is_ca = tbs
        .extensions
        .iter()
        .flatten()
        .find(|ext| ext.extn_id == ID_CE_BASIC_CONSTRAINTS)
        .map(|ext| basic_constraints_is_ca(ext.extn_value.as_bytes()))
        .transpose()?;

    let subject_organization = tbs
        .subject
        .0
        .iter()
        .flat_map(|rdn| rdn.0.iter())
        .find(|atv| atv.oid == ORGANIZATION_NAME)
        .and_then(|atv| String::from_utf8(atv.value.value().to_vec()).ok());

    Ok(CertificateSummary {
        serial_number: serial_to_u128(tbs.serial_number.as_bytes())?,
        subject_organization,
        self_issued: tbs.issuer == tbs.subject,
        not_before: to_offset_date_time(tbs.validity.not_before.to_unix_duration())?,
        not_after: to_offset_date_time(tbs.validity.not_after.to_unix_duration())?,
        ip_addresses,
        is_ca,
        digital_signature,
        key_encipherment,
        server_auth,
    })
}

/// Extract the RSA public key embedded in a DER certificate.
pub fn certificate_public_key(cert_der: &[u8]) -> Result<RsaPublicKey> {
    let cert = decode_certificate(cert_der)?;
    let spki_der = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| TlsyaError::Certificate(format!("Failed to encode public key: {}", e)))?;

    RsaPublicKey::from_public_key_der(&spki_der)
        .map_err(|e| TlsyaError::Certificate(format!("Not an RSA public key: {}", e)))
}

/// Check that the certificate's signature verifies under its own public key.
pub fn verify_self_signature(cert_der: &[u8]) -> Result<()> {
    let cert = decode_certificate(cert_der)?;

    if cert.signature_algorithm.oid != SHA_256_WITH_RSA_ENCRYPTION {
        return Err(TlsyaError::Certificate(format!(
            "Unsupported signature algorithm: {}",
            cert.signature_algorithm.oid
        )));
    }

    let signature = cert.signature.as_bytes().ok_or_else(|| {
        TlsyaError::Certificate("Signature has unused bits".to_string())
    })?;
    let public_key = certificate_public_key(cert_der)?;

    verify_pkcs1v15_sha256(&public_key, &raw_tbs_certificate(cert_der)?, signature)
}

fn decode_certificate(cert_der: &[u8]) -> Result<Certificate> {
    Certificate::from_der(cert_der)
        .map_err(|e| TlsyaError::Certificate(format!("Failed to decode certificate: {}", e)))
}

// The signature covers the TBS bytes exactly as issued, so they are sliced
// out of the original encoding instead of re-encoding the parsed structure.
fn raw_tbs_certificate(cert_der: &[u8]) -> Result<Vec<u8>> {
    let malformed = |e: der::Error| TlsyaError::Certificate(format!("Malformed certificate: {}", e));

    let outer = AnyRef::from_der(cert_der).map_err(malformed)?;
    let mut reader = SliceReader::new(outer.value()).map_err(malformed)?;
    let tbs = AnyRef::decode(&mut reader).map_err(malformed)?;
    tbs.to_der().map_err(malformed)
}

fn basic_constraints_is_ca(value: &[u8]) -> Result<bool> {
    if value == EXPLICIT_NOT_CA {
        return Ok(false);
    }

    BasicConstraints::from_der(value)
        .map(|bc| bc.ca)
        .map_err(|e| TlsyaError::Certificate(format!("Invalid basicConstraints: {}", e)))
}

fn ip_from_octets(octets: &[u8]) -> Result<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(octets) {
        return Ok(IpAddr::V4(Ipv4Addr::from(v4)));
    }
    if let Ok(v6) = <[u8; 16]>::try_from(octets) {
        return Ok(IpAddr::V6(Ipv6Addr::from(v6)));
    }
    Err(TlsyaError::Certificate(format!(
        "IP address SAN has {} bytes",
        octets.len()
    )))
}

fn serial_to_u128(bytes: &[u8]) -> Result<u128> {
    let significant: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
    if significant.len() > 16 {
        return Err(TlsyaError::Certificate(format!(
            "Serial number is {} bytes, expected at most 16",
            significant.len()
        )));
    }

    Ok(significant
        .iter()
        .fold(0u128, |acc, b| (acc << 8) | u128::from(*b)))
}

fn to_offset_date_time(since_epoch: std::time::Duration) -> Result<OffsetDateTime> {
    let seconds = i64::try_from(since_epoch.as_secs())
        .map_err(|e| TlsyaError::Certificate(format!("Timestamp out of range: {}", e)))?;

    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| TlsyaError::Certificate(format!("Timestamp out of range: {}", e)))
}
