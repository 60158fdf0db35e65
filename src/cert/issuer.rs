//! Self-signed certificate issuance.
//!
//! [`generate_tls`] is the everyday entry point: it builds the default
//! template and hands it to [`issue`]. [`generate_tls_from`] skips the
//! template builder for callers that shape the certificate themselves.
//!
//! Issuance runs four steps in order: generate an RSA key, self-sign, write
//! the key file, write the certificate file. The two writes are independent:
//! if the certificate write fails the key file stays on disk and the caller
//! must discard both paths.

use crate::cert::builder::{cert_to_pem, keypair_to_rcgen, private_key_to_pem, template_to_params};
use crate::cert::template::{build_template, CertificateTemplate};
use crate::config::IssuanceConfig;
use crate::crypto::rsa::{generate_rsa_keypair, Keypair};
use crate::error::{Result, TlsyaError};
use rcgen::Certificate;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// What a successful issuance left behind.
#[derive(Debug, Clone)]
pub struct IssuedArtifacts {
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
    pub serial_number: u128,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    /// The certificate as written, before PEM wrapping.
    pub certificate_der: Vec<u8>,
}

/// Issue a certificate for `config` using the default template.
///
/// # Example
///
/// ```rust,no_run
/// use tlsya::cert::issuer::generate_tls;
/// use tlsya::config::IssuanceConfig;
///
/// # fn example() -> tlsya::error::Result<()> {
/// let config = IssuanceConfig::from_ip_list("127.0.0.1,192.168.1.1", "key.pem", "cert.pem");
/// let issued = generate_tls(&config)?;
/// println!("Certificate saved to: {}", issued.cert_path.display());
/// # Ok(())
/// # }
/// ```
pub fn generate_tls(config: &IssuanceConfig) -> Result<IssuedArtifacts> {
    let template = build_template(config)?;
    issue(config, &template)
}

/// Issue a certificate from a caller-supplied template.
///
/// The template's own IP addresses are used; `config` only supplies the
/// output paths.
pub fn generate_tls_from(
    config: &IssuanceConfig,
    template: &CertificateTemplate,
) -> Result<IssuedArtifacts> {
    issue(config, template)
}

/// Generate a fresh key, self-sign `template` with it and write both files.
pub fn issue(config: &IssuanceConfig, template: &CertificateTemplate) -> Result<IssuedArtifacts> {
    tracing::debug!("generating RSA keypair");
    let keypair = generate_rsa_keypair()?;

    tracing::debug!("self-signing certificate");
    let certificate_der = self_sign(template, &keypair)?;
    let key_der = keypair.pkcs8_der()?;

    write_pem(&config.key_path, &private_key_to_pem(&key_der))?;

    if let Err(e) = write_pem(&config.cert_path, &cert_to_pem(&certificate_der)) {
        tracing::warn!(
            key_path = %config.key_path.display(),
            "certificate write failed after the key was written; key file left in place"
        );
        return Err(e);
    }

    tracing::info!(
        key_path = %config.key_path.display(),
        cert_path = %config.cert_path.display(),
        "issued self-signed certificate"
    );

    Ok(IssuedArtifacts {
        key_path: config.key_path.clone(),
        cert_path: config.cert_path.clone(),
        serial_number: template.serial_number,
        not_before: template.not_before,
        not_after: template.not_after,
        certificate_der,
    })
}

/// Sign `template` with `keypair`, making it both subject and issuer.
///
/// Returns the DER-encoded certificate.
pub fn self_sign(template: &CertificateTemplate, keypair: &Keypair) -> Result<Vec<u8>> {
    let mut params = template_to_params(template)?;
    params.key_pair = Some(keypair_to_rcgen(keypair)?);

    let cert = Certificate::from_params(params)
        .map_err(|e| TlsyaError::Signing(format!("Failed to create certificate: {}", e)))?;

    cert.serialize_der()
        .map_err(|e| TlsyaError::Signing(format!("Failed to sign certificate: {}", e)))
}

fn write_pem(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| TlsyaError::io(path, e))?;
    tracing::debug!(path = %path.display(), "wrote PEM file");
    Ok(())
}
