//! RSA key operations.
//!
//! This module generates the RSA-2048 keypair backing every issued
//! certificate and provides PKCS#1 v1.5 / SHA-256 signing and verification.

use crate::error::{Result, TlsyaError};
use rand::rngs::OsRng;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey};
use rsa::sha2::Sha256;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Modulus size of every generated key.
pub const RSA_KEY_BITS: usize = 2048;

/// An RSA keypair consisting of a private key and its public half.
#[derive(Debug, Clone)]
pub struct Keypair {
    pub secret: RsaPrivateKey,
    pub public: RsaPublicKey,
}

impl Keypair {
    /// Create a new keypair from a private key.
    pub fn from_secret(secret: RsaPrivateKey) -> Self {
        let public = secret.to_public_key();
        Self { secret, public }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.public.size() * 8
    }

    /// Encode the private key as PKCS#8 DER.
    pub fn pkcs8_der(&self) -> Result<Vec<u8>> {
        let document = self.secret.to_pkcs8_der().map_err(|e| {
            TlsyaError::KeyGeneration(format!("Failed to encode private key as PKCS#8: {}", e))
        })?;
        Ok(document.as_bytes().to_vec())
    }

    /// Encode the public key as a DER SubjectPublicKeyInfo.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let document = self.public.to_public_key_der().map_err(|e| {
            TlsyaError::KeyGeneration(format!("Failed to encode public key: {}", e))
        })?;
        Ok(document.as_bytes().to_vec())
    }

    /// Sign a message with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signing_key = SigningKey::<Sha256>::new(self.secret.clone());
        let signature = signing_key
            .try_sign_with_rng(&mut OsRng, message)
            .map_err(|e| TlsyaError::Signing(format!("Failed to sign message: {}", e)))?;
        Ok(signature.to_vec())
    }

    /// Verify a signature produced by [`Keypair::sign`].
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        verify_pkcs1v15_sha256(&self.public, message, signature)
    }
}

/// Generate a new RSA-2048 keypair from the operating system's CSPRNG.
///
/// # Example
///
/// ```no_run
/// use tlsya::crypto::rsa::{generate_rsa_keypair, RSA_KEY_BITS};
///
/// let keypair = generate_rsa_keypair().unwrap();
/// assert_eq!(keypair.bits(), RSA_KEY_BITS);
/// ```
pub fn generate_rsa_keypair() -> Result<Keypair> {
    let secret = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
        .map_err(|e| TlsyaError::KeyGeneration(format!("Failed to generate RSA key: {}", e)))?;
    Ok(Keypair::from_secret(secret))
}

/// Import a keypair from PKCS#8 DER bytes.
pub fn import_rsa_from_pkcs8_der(der: &[u8]) -> Result<Keypair> {
    let secret = RsaPrivateKey::from_pkcs8_der(der)
        .map_err(|e| TlsyaError::Pem(format!("Invalid PKCS#8 RSA key: {}", e)))?;
    Ok(Keypair::from_secret(secret))
}

/// Import a keypair from a `PRIVATE KEY` PEM document.
pub fn import_rsa_from_pkcs8_pem(pem_str: &str) -> Result<Keypair> {
    let secret = RsaPrivateKey::from_pkcs8_pem(pem_str)
        .map_err(|e| TlsyaError::Pem(format!("Invalid PKCS#8 RSA key: {}", e)))?;
    Ok(Keypair::from_secret(secret))
}

/// Verify an RSASSA-PKCS1-v1_5 / SHA-256 signature under `public`.
pub fn verify_pkcs1v15_sha256(public: &RsaPublicKey, message: &[u8], signature: &[u8]) -> Result<()> {
    let signature = Signature::try_from(signature)
        .map_err(|e| TlsyaError::Certificate(format!("Malformed signature: {}", e)))?;

    VerifyingKey::<Sha256>::new(public.clone())
        .verify(message, &signature)
        .map_err(|e| TlsyaError::Certificate(format!("Signature verification failed: {}", e)))
}
