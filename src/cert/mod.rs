//! Certificate issuance module.
//!
//! [`template`] builds the default certificate shape, [`issuer`] signs it
//! with a fresh key and writes both artifacts, and [`loader`] / [`inspect`]
//! read them back.

pub mod builder;
pub mod inspect;
pub mod issuer;
pub mod loader;
pub mod template;
