//! TLS configuration for serving issued certificates.
//!
//! This module provides rustls configuration builders for a server that
//! presents the issued certificate and for a client that trusts it.

use crate::cert::loader::{load_certificate_file, load_private_key_file};
use crate::error::{Result, TlsyaError};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ClientConfig, RootCertStore, ServerConfig};
use std::path::Path;
use std::sync::Arc;

/// Build a TLS server configuration from the files written by the issuer.
///
/// # Example
///
/// ```rust,no_run
/// use tlsya::net::config::build_server_config;
/// use std::path::Path;
///
/// # fn example() -> tlsya::error::Result<()> {
/// let config = build_server_config(Path::new("cert.pem"), Path::new("key.pem"))?;
/// # Ok(())
/// # }
/// ```
pub fn build_server_config(cert_path: &Path, key_path: &Path) -> Result<Arc<ServerConfig>> {
    let cert = load_certificate_file(cert_path)?;
    let key = load_private_key_file(key_path)?;
    server_config_from_der(cert, key)
}

/// Build a TLS server configuration from a DER certificate and key.
pub fn server_config_from_der(
    cert: CertificateDer<'static>,
    key: PrivateKeyDer<'static>,
) -> Result<Arc<ServerConfig>> {
    // Install default crypto provider if not already set
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert], key)
        .map_err(|e| TlsyaError::Tls(format!("Failed to build server config: {}", e)))?;

    Ok(Arc::new(config))
}

/// Build a TLS client configuration whose only trust anchor is `cert`.
///
/// Useful for talking to a server presenting a self-signed certificate
/// without disabling verification.
pub fn build_client_config_trusting(cert: CertificateDer<'static>) -> Result<Arc<ClientConfig>> {
    let mut root_store = RootCertStore::empty();
    root_store
        .add(cert)
        .map_err(|e| TlsyaError::Tls(format!("Failed to add trust anchor: {}", e)))?;

    // Install default crypto provider if not already set
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::issuer::generate_tls;
    use crate::config::IssuanceConfig;
    use tempfile::TempDir;

    #[test]
    fn test_build_server_config_from_issued_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = IssuanceConfig::from_ip_list(
            "127.0.0.1",
            temp_dir.path().join("key.pem"),
            temp_dir.path().join("cert.pem"),
        );
        generate_tls(&config).unwrap();

        let result = build_server_config(&config.cert_path, &config.key_path);
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_server_config_with_swapped_paths_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = IssuanceConfig::from_ip_list(
            "127.0.0.1",
            temp_dir.path().join("key.pem"),
            temp_dir.path().join("cert.pem"),
        );
        generate_tls(&config).unwrap();

        let result = build_server_config(&config.key_path, &config.cert_path);
        assert!(matches!(result, Err(TlsyaError::Pem(_))));
    }

    #[test]
    fn test_build_client_config_rejects_garbage_anchor() {
        let result = build_client_config_trusting(CertificateDer::from(vec![1u8, 2, 3]));
        assert!(matches!(result, Err(TlsyaError::Tls(_))));
    }
}
