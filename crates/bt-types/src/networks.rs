//! Network configuration types.
//!
//! Maps chain ids to the RPC endpoint used to reach them. TOML tables key
//! on strings, so a custom deserializer converts the string keys to u64.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Configuration for a single chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) RPC endpoint for the chain.
	pub rpc_url: String,
}

/// Chain id to network configuration.
pub type NetworksConfig = HashMap<u64, NetworkConfig>;

/// Deserializes a string-keyed TOML table into a u64-keyed networks map.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let raw: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	raw.into_iter()
		.map(|(key, value)| {
			let chain_id = key.parse::<u64>().map_err(|e| {
				serde::de::Error::custom(format!("invalid chain id '{}': {}", key, e))
			})?;
			Ok((chain_id, value))
		})
		.collect()
}
