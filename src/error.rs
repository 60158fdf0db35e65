//! Error types for tlsya.
//!
//! Every step of issuance maps its failure onto one variant here, so callers
//! can tell a bad configuration apart from a failed write.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tlsya operations.
#[derive(Error, Debug)]
pub enum TlsyaError {
    /// Missing or invalid input (no IP addresses, unparseable addresses)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The OS random source could not provide bytes
    #[error("Entropy error: {0}")]
    Entropy(String),

    /// RSA key generation or key encoding failed
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// The certificate could not be self-signed or serialized
    #[error("Signing error: {0}")]
    Signing(String),

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PEM encoding/decoding error
    #[error("PEM error: {0}")]
    Pem(String),

    /// A DER certificate could not be decoded or verified
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// rustls rejected the certificate or key
    #[error("TLS error: {0}")]
    Tls(String),
}

impl TlsyaError {
    /// Attach the offending path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A specialized Result type for tlsya operations.
pub type Result<T> = std::result::Result<T, TlsyaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TlsyaError::Configuration("no IP addresses".to_string());
        assert_eq!(err.to_string(), "Configuration error: no IP addresses");
    }

    #[test]
    fn test_io_error_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TlsyaError::io("/nope/key.pem", source);

        let msg = err.to_string();
        assert!(msg.contains("/nope/key.pem"));
        assert!(msg.contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TlsyaError>();
    }
}
