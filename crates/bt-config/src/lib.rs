//! Configuration for the branded-token SDK.
//!
//! Loads and validates TOML configuration: networks (chain id to RPC
//! endpoint), the signing key, deployed contract addresses, the contract
//! artifacts directory, and delivery settings. Validation runs at load
//! time so misconfiguration fails before any connection is opened.

use bt_types::{deserialize_networks, validation, NetworksConfig, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration for the SDK.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Network configurations keyed by chain id.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
	/// Signing account settings.
	pub account: AccountConfig,
	/// Deployed contract addresses and artifact location.
	#[serde(default)]
	pub contracts: ContractsConfig,
	/// Transaction delivery settings.
	#[serde(default)]
	pub delivery: DeliverySettings,
}

/// Signing account settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Private key used for transaction signing.
	pub private_key: SecretString,
}

/// Deployed contract addresses and the compiler artifact directory.
///
/// Addresses are optional: a deployment-only workflow starts with none,
/// while a staking workflow needs the three staking contracts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContractsConfig {
	/// Directory holding `<Name>.bin` / `<Name>.json` artifacts.
	pub artifacts_dir: Option<PathBuf>,
	/// Deployed BrandedToken address.
	pub branded_token: Option<String>,
	/// Deployed GatewayComposer address.
	pub gateway_composer: Option<String>,
	/// Value token (ERC-20) address staked through the composer.
	pub value_token: Option<String>,
	/// Organization address supplied to deployments.
	pub organization: Option<String>,
}

/// Transaction delivery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliverySettings {
	/// Confirmations required before a submission settles.
	#[serde(default = "default_min_confirmations")]
	pub min_confirmations: u64,
}

fn default_min_confirmations() -> u64 {
	1
}

impl Default for DeliverySettings {
	fn default() -> Self {
		Self {
			min_confirmations: default_min_confirmations(),
		}
	}
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let contents = std::fs::read_to_string(path)?;
		Self::from_toml_str(&contents)
	}

	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
		let config: Config = toml::from_str(contents)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks the loaded values for shape problems.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"at least one network must be configured".to_string(),
			));
		}
		for (chain_id, network) in &self.networks {
			if network.rpc_url.is_empty() {
				return Err(ConfigError::Validation(format!(
					"rpc_url for chain {} must not be empty",
					chain_id
				)));
			}
		}
		if self.account.private_key.is_empty() {
			return Err(ConfigError::Validation(
				"account.private_key must not be empty".to_string(),
			));
		}
		for (field, address) in [
			("contracts.branded_token", &self.contracts.branded_token),
			(
				"contracts.gateway_composer",
				&self.contracts.gateway_composer,
			),
			("contracts.value_token", &self.contracts.value_token),
			("contracts.organization", &self.contracts.organization),
		] {
			if let Some(address) = address {
				validation::parse_address(field, address)
					.map_err(|e| ConfigError::Validation(e.to_string()))?;
			}
		}
		Ok(())
	}
}
