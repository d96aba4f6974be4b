//! Alloy-based EVM delivery implementation.
//!
//! Submits and monitors transactions on EVM chains over HTTP using the
//! Alloy library. Each configured network gets its own provider carrying a
//! wallet filler, so submission signs locally with the configured key.

use crate::{DeliveryError, DeliveryInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, FixedBytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use bt_types::{NetworksConfig, SecretString, Transaction, TransactionHash, TransactionReceipt};
use std::collections::HashMap;
use std::sync::Arc;

/// HTTP delivery over per-chain Alloy providers.
#[derive(Clone)]
pub struct AlloyDelivery {
	/// Alloy providers for each supported network.
	providers: HashMap<u64, Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>>,
}

impl AlloyDelivery {
	/// Creates providers for every configured network.
	///
	/// The signer is rebuilt per chain with the chain id bound, so signed
	/// transactions are replay-protected.
	pub fn new(
		networks: &NetworksConfig,
		private_key: &SecretString,
	) -> Result<Self, DeliveryError> {
		if networks.is_empty() {
			return Err(DeliveryError::Network(
				"at least one network must be configured".to_string(),
			));
		}

		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.parse()
				.map_err(|_| DeliveryError::Network("invalid private key format".to_string()))
		})?;

		let mut providers = HashMap::new();
		for (chain_id, network) in networks {
			let url = network.rpc_url.parse().map_err(|e| {
				DeliveryError::Network(format!("invalid RPC URL for chain {}: {}", chain_id, e))
			})?;

			let chain_signer = signer.clone().with_chain_id(Some(*chain_id));
			let wallet = EthereumWallet::from(chain_signer);

			let provider = ProviderBuilder::new()
				.with_recommended_fillers()
				.wallet(wallet)
				.on_http(url);

			providers.insert(
				*chain_id,
				Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
			);
		}

		Ok(Self { providers })
	}

	fn provider(
		&self,
		chain_id: u64,
	) -> Result<&Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>, DeliveryError> {
		self.providers
			.get(&chain_id)
			.ok_or(DeliveryError::NoProviderAvailable(chain_id))
	}
}

fn to_receipt(receipt: alloy_rpc_types::TransactionReceipt) -> TransactionReceipt {
	TransactionReceipt {
		hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
		block_number: receipt.block_number.unwrap_or(0),
		success: receipt.status(),
		contract_address: receipt.contract_address,
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn submit(&self, tx: &Transaction) -> Result<TransactionHash, DeliveryError> {
		let provider = self.provider(tx.chain_id)?;

		let request: TransactionRequest = tx.clone().into();

		// The provider's wallet filler signs before sending.
		let pending_tx = provider
			.send_transaction(request)
			.await
			.map_err(|e| DeliveryError::Network(format!("failed to send transaction: {}", e)))?;

		let tx_hash = *pending_tx.tx_hash();
		Ok(TransactionHash(tx_hash.0.to_vec()))
	}

	async fn call(
		&self,
		chain_id: u64,
		to: &Address,
		data: Vec<u8>,
	) -> Result<Vec<u8>, DeliveryError> {
		let provider = self.provider(chain_id)?;

		let request = TransactionRequest::default().to(*to).input(data.into());
		let result = provider
			.call(&request)
			.await
			.map_err(|e| DeliveryError::Network(format!("eth_call failed: {}", e)))?;

		Ok(result.to_vec())
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);
		let provider = self.provider(chain_id)?;

		match provider.get_transaction_receipt(tx_hash).await {
			Ok(Some(receipt)) => Ok(to_receipt(receipt)),
			Ok(None) => Err(DeliveryError::Network(format!(
				"transaction not found on chain {}",
				chain_id
			))),
			Err(e) => Err(DeliveryError::Network(format!(
				"failed to get receipt on chain {}: {}",
				chain_id, e
			))),
		}
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);
		let provider = self.provider(chain_id)?;

		let poll_interval = tokio::time::Duration::from_secs(7);
		// Bound the wait at roughly 30s per confirmation, capped at 15 min.
		let timeout_seconds = (confirmations * 30).clamp(30, 900);
		let max_wait_time = tokio::time::Duration::from_secs(timeout_seconds);
		let start_time = tokio::time::Instant::now();

		loop {
			if start_time.elapsed() > max_wait_time {
				return Err(DeliveryError::Network(format!(
					"timeout waiting for {} confirmations after {}s",
					confirmations, timeout_seconds
				)));
			}

			let receipt = match provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					tokio::time::sleep(poll_interval).await;
					continue;
				}
				Err(e) => {
					return Err(DeliveryError::Network(format!(
						"failed to get receipt: {}",
						e
					)));
				}
			};

			let current_block = provider.get_block_number().await.map_err(|e| {
				DeliveryError::Network(format!("failed to get block number: {}", e))
			})?;

			let tx_block = receipt.block_number.unwrap_or(0);
			if current_block.saturating_sub(tx_block) >= confirmations {
				return Ok(to_receipt(receipt));
			}

			tracing::debug!(
				tx_hash = %hash,
				"waiting for {} more confirmations",
				confirmations.saturating_sub(current_block.saturating_sub(tx_block))
			);
			tokio::time::sleep(poll_interval).await;
		}
	}

	async fn get_gas_price(&self, chain_id: u64) -> Result<u128, DeliveryError> {
		let provider = self.provider(chain_id)?;

		provider
			.get_gas_price()
			.await
			.map_err(|e| DeliveryError::Network(format!("failed to get gas price: {}", e)))
	}

	async fn get_nonce(&self, address: &Address, chain_id: u64) -> Result<u64, DeliveryError> {
		let provider = self.provider(chain_id)?;

		provider
			.get_transaction_count(*address)
			.await
			.map_err(|e| DeliveryError::Network(format!("failed to get nonce: {}", e)))
	}

	async fn get_block_number(&self, chain_id: u64) -> Result<u64, DeliveryError> {
		let provider = self.provider(chain_id)?;

		provider
			.get_block_number()
			.await
			.map_err(|e| DeliveryError::Network(format!("failed to get block number: {}", e)))
	}
}
