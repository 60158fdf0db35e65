//! tlsya: self-signed TLS certificates for IP addresses
//!
//! This library issues a self-signed X.509 certificate and its RSA private
//! key for a list of IP addresses, and writes both as PEM files ready for a
//! TLS server to load. It can:
//!
//! - Build a default certificate template (random 128-bit serial, one year
//!   validity, server-auth usages, IP subject alternative names)
//! - Issue a certificate from the default template or a custom one
//! - Read issued artifacts back and verify them, including a full in-memory
//!   TLS handshake
//!
//! # Architecture
//!
//! Issuance is strictly sequential: configuration → template → key generation
//! → self-signing → key file → certificate file. Nothing is cached between
//! calls and every operation returns a `Result`; the two file writes are not
//! transactional, so a failed certificate write can leave the key file behind.
//!
//! # Example
//!
//! ```rust,no_run
//! use tlsya::cert::issuer::generate_tls;
//! use tlsya::config::IssuanceConfig;
//! use tlsya::error::Result;
//!
//! fn example() -> Result<()> {
//!     let config = IssuanceConfig::from_ip_list("127.0.0.1", "key.pem", "cert.pem");
//!     let issued = generate_tls(&config)?;
//!     println!("Certificate saved to: {}", issued.cert_path.display());
//!     Ok(())
//! }
//! ```

pub mod cert;
pub mod config;
pub mod crypto;
pub mod error;
pub mod net;

// Re-export commonly used types
pub use cert::issuer::{generate_tls, generate_tls_from, IssuedArtifacts};
pub use cert::template::{build_template, CertificateTemplate};
pub use config::IssuanceConfig;
pub use error::{Result, TlsyaError};
