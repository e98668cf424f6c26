use serde_json::json;
use std::{env, fs};
use tempfile::TempDir;

use wallet_history::{
	bootstrap::{initialize_services, ServiceSettings},
	repositories::{NetworkRepository, NetworkService},
	utils::constants::{DEFAULT_HOST, DEFAULT_NETWORK, DEFAULT_PORT},
};

use crate::integration::mocks::{create_network_service, create_test_network};

fn write_override(dir: &TempDir, file: &str, body: serde_json::Value) {
	fs::write(dir.path().join(file), body.to_string()).unwrap();
}

#[tokio::test]
async fn test_initialize_with_preloaded_networks() {
	let networks = create_network_service(vec![
		create_test_network("ethereum", "https://eth.hypersync.xyz"),
		create_test_network("gnosis", "https://gnosis.hypersync.xyz"),
	]);
	let settings = ServiceSettings {
		default_network: "gnosis".to_string(),
		..ServiceSettings::default()
	};

	let service = initialize_services(Some(networks), &settings)
		.await
		.unwrap();

	assert_eq!(service.default_network(), "gnosis");
	assert_eq!(service.networks().get_all().len(), 2);
}

#[tokio::test]
async fn test_initialize_rejects_catalog_without_default_network() {
	let networks = create_network_service(vec![create_test_network(
		"gnosis",
		"https://gnosis.hypersync.xyz",
	)]);

	let result = initialize_services(Some(networks), &ServiceSettings::default()).await;

	let message = result.err().unwrap().to_string();
	assert_eq!(
		message,
		format!("Default network '{}' is not configured", DEFAULT_NETWORK)
	);
}

#[tokio::test]
async fn test_overrides_replace_builtin_networks() {
	let dir = TempDir::new().unwrap();
	write_override(
		&dir,
		"ethereum.json",
		json!({
			"slug": "ethereum",
			"name": "Ethereum (self-hosted)",
			"chain_id": 1,
			"url": "http://localhost:8080",
			"tier": "gold"
		}),
	);
	write_override(
		&dir,
		"devnet.json",
		json!({
			"slug": "devnet",
			"name": "Devnet",
			"chain_id": 31337,
			"url": "http://localhost:8545",
			"tier": "testnet"
		}),
	);
	let settings = ServiceSettings {
		networks_path: Some(dir.path().to_path_buf()),
		..ServiceSettings::default()
	};

	let service = initialize_services::<NetworkRepository>(None, &settings)
		.await
		.unwrap();

	let ethereum = service.networks().get("ethereum").unwrap();
	assert_eq!(ethereum.url, "http://localhost:8080");
	assert_eq!(service.networks().get("devnet").unwrap().chain_id, 31337);
	assert!(service.networks().get("polygon").is_some());
}

#[tokio::test]
async fn test_invalid_override_fails_initialization() {
	let dir = TempDir::new().unwrap();
	write_override(
		&dir,
		"broken.json",
		json!({
			"slug": "broken",
			"name": "Broken",
			"chain_id": 5,
			"url": "not a url",
			"tier": "gold"
		}),
	);
	let settings = ServiceSettings {
		networks_path: Some(dir.path().to_path_buf()),
		..ServiceSettings::default()
	};

	let result = initialize_services::<NetworkRepository>(None, &settings).await;

	assert!(result.is_err());
}

#[tokio::test]
async fn test_builtin_catalog_resolves_chain_ids() {
	let networks = NetworkService::<NetworkRepository>::new(None).await.unwrap();

	assert_eq!(networks.resolve("1").unwrap().slug, "ethereum");
	assert_eq!(networks.resolve("137").unwrap().slug, "polygon");
	assert!(networks.resolve("999999999").is_none());
}

// The only test in this binary that touches the process environment
#[test]
fn test_settings_from_env() {
	env::set_var("HOST", "0.0.0.0");
	env::set_var("PORT", "not-a-port");
	env::set_var("DEFAULT_NETWORK", " Polygon ");
	env::set_var("HYPERSYNC_API_TOKEN", "secret");
	env::set_var("NETWORKS_PATH", "  ");

	let settings = ServiceSettings::from_env();

	env::remove_var("HOST");
	env::remove_var("PORT");
	env::remove_var("DEFAULT_NETWORK");
	env::remove_var("HYPERSYNC_API_TOKEN");
	env::remove_var("NETWORKS_PATH");

	assert_eq!(settings.host, "0.0.0.0");
	assert_eq!(settings.port, DEFAULT_PORT);
	assert_eq!(settings.default_network, "polygon");
	assert_eq!(settings.hypersync_token.as_deref(), Some("secret"));
	assert_eq!(settings.networks_path, None);
	assert_eq!(
		settings.bind_address(),
		format!("0.0.0.0:{}", DEFAULT_PORT)
	);
	assert_ne!(settings.host, DEFAULT_HOST);
}
