//! Loading issued artifacts from PEM.
//!
//! These helpers read back what the issuer writes, in the form rustls
//! expects: a DER certificate and a PKCS#8 private key.

use crate::error::{Result, TlsyaError};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls_pemfile::Item;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Load a single DER certificate from a PEM string.
///
/// # Example
///
/// ```rust,no_run
/// use tlsya::cert::loader::load_certificate_from_pem;
///
/// # fn example() -> tlsya::error::Result<()> {
/// let pem = std::fs::read_to_string("cert.pem").unwrap();
/// let cert = load_certificate_from_pem(&pem)?;
/// # Ok(())
/// # }
/// ```
pub fn load_certificate_from_pem(pem_str: &str) -> Result<CertificateDer<'static>> {
    let mut cursor = Cursor::new(pem_str.as_bytes());

    match rustls_pemfile::read_one(&mut cursor)
        .map_err(|e| TlsyaError::Pem(format!("Failed to read PEM: {}", e)))?
    {
        Some(Item::X509Certificate(cert_der)) => Ok(cert_der),
        Some(_) => Err(TlsyaError::Pem(
            "PEM file does not contain a certificate".to_string(),
        )),
        None => Err(TlsyaError::Pem("Empty PEM file".to_string())),
    }
}

/// Load a PKCS#8 `PRIVATE KEY` from a PEM string.
///
/// Other key encodings (PKCS#1, SEC1) are rejected because the issuer never
/// writes them.
pub fn load_private_key_from_pem(pem_str: &str) -> Result<PrivateKeyDer<'static>> {
    let mut cursor = Cursor::new(pem_str.as_bytes());

    match rustls_pemfile::read_one(&mut cursor)
        .map_err(|e| TlsyaError::Pem(format!("Failed to read PEM: {}", e)))?
    {
        Some(Item::Pkcs8Key(key_der)) => Ok(PrivateKeyDer::Pkcs8(key_der)),
        Some(_) => Err(TlsyaError::Pem(
            "PEM file does not contain a PKCS#8 private key".to_string(),
        )),
        None => Err(TlsyaError::Pem("Empty PEM file".to_string())),
    }
}

/// Read and load the certificate at `path`.
pub fn load_certificate_file(path: &Path) -> Result<CertificateDer<'static>> {
    let pem = fs::read_to_string(path).map_err(|e| TlsyaError::io(path, e))?;
    load_certificate_from_pem(&pem)
}

/// Read and load the private key at `path`.
pub fn load_private_key_file(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let pem = fs::read_to_string(path).map_err(|e| TlsyaError::io(path, e))?;
    load_private_key_from_pem(&pem)
}
