//! Wallet transaction history service entry point.
//!
//! Loads the network catalog, creates the HyperSync client pool and serves the
//! transaction API until interrupted.
//!
//! # Flow
//! 1. Applies CLI flags onto the environment (after loading `.env`)
//! 2. Sets up logging
//! 3. Initializes the network catalog and transaction service
//! 4. Starts the HTTP API
//! 5. Shuts down gracefully on Ctrl+C

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{initialize_services, Result, ServiceSettings},
	repositories::NetworkRepository,
	services::api::create_api_server,
	utils::{logging::setup_logging, parse_string_to_bytes_size},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::env::{set_var, var};
use tracing::{error, info};

#[derive(Parser)]
#[command(
	name = "wallet-history",
	about = "Serves the transaction history of EVM wallets, read from the HyperSync indexer.",
	version
)]
struct Cli {
	/// Port to listen on (default: 3001)
	#[arg(long, value_name = "PORT")]
	port: Option<u16>,

	/// Host to bind to (default: 127.0.0.1)
	#[arg(long, value_name = "HOST")]
	host: Option<String>,

	/// Directory with network override files (default: config/networks)
	#[arg(long, value_name = "PATH")]
	networks_path: Option<String>,

	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Validate configuration without starting the service
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Values from .env override the inherited environment
		dotenv_override().ok();

		if let Some(port) = self.port {
			set_var("PORT", port.to_string());
		}

		if let Some(host) = &self.host {
			set_var("HOST", host);
		}

		if let Some(path) = &self.networks_path {
			set_var("NETWORKS_PATH", path);
		}

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}
	}
}

/// Main entry point for the wallet history service.
///
/// # Errors
/// Returns an error if service initialization fails or the server cannot bind.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	let settings = ServiceSettings::from_env();

	if cli.check {
		validate_configuration(&settings).await;
		return Ok(());
	}

	let service = initialize_services::<NetworkRepository>(None, &settings)
		.await
		.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}", e))?;

	let server = create_api_server(settings.bind_address(), service)?;

	info!("Service started. Press Ctrl+C to shutdown");

	let handle = server.handle();
	tokio::select! {
		result = tokio::signal::ctrl_c() => {
			if let Err(e) = result {
				error!("Error waiting for Ctrl+C: {}", e);
			}
			info!("Shutdown signal received, stopping API server...");
			handle.stop(true).await;
		}
		result = server => {
			if let Err(e) = result {
				error!("API server error: {}", e);
			}
			info!("API server stopped");
		}
	}

	info!("Shutdown complete");
	Ok(())
}

/// Validates the network configuration and settings
async fn validate_configuration(settings: &ServiceSettings) {
	info!("Validating configuration...");

	match initialize_services::<NetworkRepository>(None, settings).await {
		Ok(service) => {
			info!(
				"✓ Loaded {} network(s)",
				service.networks().get_all().len()
			);
			info!("✓ Default network '{}' is configured", service.default_network());
			if settings.hypersync_token.is_some() {
				info!("✓ HyperSync API token is set");
			}
			info!("Configuration validation completed successfully!");
		}
		Err(e) => {
			error!("{}", e);
		}
	}
}
