//! Cryptographic operations module.
//!
//! Every issued certificate is backed by a fresh RSA-2048 keypair from
//! [`rsa::generate_rsa_keypair`]. Keys are never cached: they live for one
//! issuance call and are zeroized when dropped.
//!
//! # Example
//!
//! ```rust,no_run
//! use tlsya::crypto::rsa::generate_rsa_keypair;
//!
//! # fn example() -> tlsya::error::Result<()> {
//! let keypair = generate_rsa_keypair()?;
//!
//! let signature = keypair.sign(b"payload")?;
//! keypair.verify(b"payload", &signature)?;
//! # Ok(())
//! # }
//! ```

pub mod rsa;
