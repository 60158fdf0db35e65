//! In-memory TLS handshakes.
//!
//! A client and server connection are pumped against each other through
//! byte buffers, with no sockets involved. This proves an issued key and
//! certificate can actually terminate TLS for a given IP address.

use crate::cert::loader::load_certificate_file;
use crate::error::{Result, TlsyaError};
use crate::net::config::{build_client_config_trusting, build_server_config};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, Connection, ServerConfig, ServerConnection};
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

/// Flights a full handshake never exceeds.
const MAX_ROUNDS: usize = 16;

/// Handshake the issued artifacts against a client that trusts only the
/// issued certificate and connects to `ip`.
pub fn check_artifacts(cert_path: &Path, key_path: &Path, ip: IpAddr) -> Result<()> {
    let server_config = build_server_config(cert_path, key_path)?;
    let client_config = build_client_config_trusting(load_certificate_file(cert_path)?)?;

    loopback_handshake(server_config, client_config, ServerName::from(ip))
}

/// Drive a client and a server connection until both finish handshaking.
pub fn loopback_handshake(
    server_config: Arc<ServerConfig>,
    client_config: Arc<ClientConfig>,
    server_name: ServerName<'static>,
) -> Result<()> {
    let mut client = Connection::from(
        ClientConnection::new(client_config, server_name)
            .map_err(|e| TlsyaError::Tls(format!("Failed to create client: {}", e)))?,
    );
    let mut server = Connection::from(
        ServerConnection::new(server_config)
            .map_err(|e| TlsyaError::Tls(format!("Failed to create server: {}", e)))?,
    );

    for round in 0..MAX_ROUNDS {
        if !client.is_handshaking() && !server.is_handshaking() {
            tracing::debug!(rounds = round, "loopback handshake complete");
            return Ok(());
        }
        transfer(&mut client, &mut server)?;
        transfer(&mut server, &mut client)?;
    }

    Err(TlsyaError::Tls(format!(
        "Handshake did not complete after {} rounds",
        MAX_ROUNDS
    )))
}

fn transfer(from: &mut Connection, to: &mut Connection) -> Result<()> {
    let mut buf = Vec::new();
    while from.wants_write() {
        from.write_tls(&mut buf)
            .map_err(|e| TlsyaError::Tls(format!("Failed to write TLS records: {}", e)))?;
    }

    let mut pending = buf.as_slice();
    while !pending.is_empty() {
        to.read_tls(&mut pending)
            .map_err(|e| TlsyaError::Tls(format!("Failed to read TLS records: {}", e)))?;
        to.process_new_packets()
            .map_err(|e| TlsyaError::Tls(format!("Handshake failed: {}", e)))?;
    }

    Ok(())
}
