//! TLS plumbing for the issued artifacts.

pub mod config;
pub mod loopback;
