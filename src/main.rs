//! tlsya CLI application.
//!
//! Issues a self-signed certificate and private key for the given IP
//! addresses and writes them as PEM files.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tlsya::cert::issuer::generate_tls;
use tlsya::config::{IssuanceConfig, DEFAULT_CERT_PATH, DEFAULT_KEY_PATH};
use tlsya::error::Result;
use tlsya::net::loopback::check_artifacts;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tlsya")]
#[command(about = "Generate a self-signed TLS certificate for a set of IP addresses", long_about = None)]
struct Cli {
    /// Comma-separated list of IP addresses
    #[arg(long)]
    ips: Option<String>,

    /// Path to save the private key
    #[arg(long, default_value = DEFAULT_KEY_PATH)]
    key: PathBuf,

    /// Path to save the certificate
    #[arg(long, default_value = DEFAULT_CERT_PATH)]
    cert: PathBuf,

    /// Handshake the written files for every address before exiting
    #[arg(long)]
    verify: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Failed to generate TLS certificate: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let ips = cli.ips.as_deref().unwrap_or_default();
    let config = IssuanceConfig::from_ip_list(ips, cli.key, cli.cert);
    let addresses = config.validate()?;

    let issued = generate_tls(&config)?;

    tracing::debug!(
        serial = %hex::encode(issued.serial_number.to_be_bytes()),
        not_before = %issued.not_before,
        not_after = %issued.not_after,
        "certificate details"
    );

    if cli.verify {
        for ip in addresses {
            check_artifacts(&issued.cert_path, &issued.key_path, ip)?;
            tracing::info!(%ip, "handshake succeeded");
        }
    }

    println!("TLS certificate and key generated successfully");
    println!("Private key saved to: {}", issued.key_path.display());
    println!("Certificate saved to: {}", issued.cert_path.display());

    Ok(())
}
