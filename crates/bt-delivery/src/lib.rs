//! Transaction delivery for the branded-token SDK.
//!
//! This crate is the TransactionSender collaborator: it signs and submits
//! prepared transaction descriptors, serves read-only contract calls, and
//! reports receipts. Validation never happens here; descriptors arrive
//! fully built, and transport or revert errors are surfaced verbatim,
//! without retries or reclassification.

use async_trait::async_trait;
use bt_types::{
	NetworksConfig, SecretString, SubmissionEvent, Transaction, TransactionHash,
	TransactionReceipt,
};
use alloy_primitives::Address;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
	pub mod mock;
}

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication or inside the node.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a transaction execution fails on-chain.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
	/// No provider is configured for the requested chain.
	#[error("No provider available for chain {0}")]
	NoProviderAvailable(u64),
}

/// Trait defining the interface for transaction delivery providers.
///
/// A provider wraps one connection per chain and knows how to submit
/// signed transactions, execute read-only calls, and fetch receipts.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Submits a transaction to the chain it targets and returns its hash.
	///
	/// Signing is handled by the provider's wallet; the descriptor itself
	/// is never mutated.
	async fn submit(&self, tx: &Transaction) -> Result<TransactionHash, DeliveryError>;

	/// Executes a read-only contract call and returns the raw return data.
	async fn call(
		&self,
		chain_id: u64,
		to: &Address,
		data: Vec<u8>,
	) -> Result<Vec<u8>, DeliveryError>;

	/// Retrieves the receipt for a transaction if it has been mined.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Blocks until the transaction has the required confirmations.
	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Gets the current gas price for the chain, in wei.
	async fn get_gas_price(&self, chain_id: u64) -> Result<u128, DeliveryError>;

	/// Gets the next valid nonce for an address.
	async fn get_nonce(&self, address: &Address, chain_id: u64) -> Result<u64, DeliveryError>;

	/// Gets the latest block number.
	async fn get_block_number(&self, chain_id: u64) -> Result<u64, DeliveryError>;
}

/// Service that routes transactions and reads to per-chain providers.
///
/// The service owns the providers, applies the configured confirmation
/// depth, and exposes the submission flows the client facades use: plain
/// submission, submit-and-confirm, and submit-and-confirm with progress
/// events.
pub struct DeliveryService {
	/// Map of chain IDs to their corresponding delivery providers.
	providers: HashMap<u64, Box<dyn DeliveryInterface>>,
	/// Confirmations required before a submission settles.
	min_confirmations: u64,
}

impl DeliveryService {
	/// Creates a new DeliveryService with the specified providers.
	pub fn new(providers: HashMap<u64, Box<dyn DeliveryInterface>>, min_confirmations: u64) -> Self {
		Self {
			providers,
			min_confirmations,
		}
	}

	/// True when a provider is configured for the chain.
	pub fn supports_chain(&self, chain_id: u64) -> bool {
		self.providers.contains_key(&chain_id)
	}

	fn provider(&self, chain_id: u64) -> Result<&dyn DeliveryInterface, DeliveryError> {
		self.providers
			.get(&chain_id)
			.map(|p| p.as_ref())
			.ok_or(DeliveryError::NoProviderAvailable(chain_id))
	}

	/// Submits a transaction and returns its hash without waiting.
	pub async fn submit(&self, tx: &Transaction) -> Result<TransactionHash, DeliveryError> {
		self.provider(tx.chain_id)?.submit(tx).await
	}

	/// Executes a read-only contract call.
	pub async fn call(
		&self,
		chain_id: u64,
		to: &Address,
		data: Vec<u8>,
	) -> Result<Vec<u8>, DeliveryError> {
		self.provider(chain_id)?.call(chain_id, to, data).await
	}

	/// Retrieves the receipt for a transaction if it has been mined.
	pub async fn get_receipt(
		&self,
		hash: &TransactionHash,
		chain_id: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.provider(chain_id)?.get_receipt(hash, chain_id).await
	}

	/// Submits a transaction and waits for the configured confirmations.
	pub async fn deliver_and_confirm(
		&self,
		tx: Transaction,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.deliver_observed(tx, None).await
	}

	/// Submits a transaction, emitting progress events while it settles.
	///
	/// The optional channel receives a [`SubmissionEvent`] at each
	/// milestone: hash available, receipt available, error. Events are
	/// also logged; neither logging nor a dropped receiver alters the
	/// outcome.
	pub async fn deliver_observed(
		&self,
		tx: Transaction,
		events: Option<&mpsc::UnboundedSender<SubmissionEvent>>,
	) -> Result<TransactionReceipt, DeliveryError> {
		let chain_id = tx.chain_id;
		let provider = self.provider(chain_id)?;

		let hash = match provider.submit(&tx).await {
			Ok(hash) => hash,
			Err(e) => {
				tracing::error!(chain_id, error = %e, "transaction submission failed");
				if let Some(events) = events {
					let _ = events.send(SubmissionEvent::Error(e.to_string()));
				}
				return Err(e);
			}
		};
		tracing::info!(tx_hash = %hash, chain_id, "submitted transaction");
		if let Some(events) = events {
			let _ = events.send(SubmissionEvent::TransactionHash(hash.clone()));
		}

		match provider
			.wait_for_confirmation(&hash, chain_id, self.min_confirmations)
			.await
		{
			Ok(receipt) => {
				tracing::info!(tx_hash = %hash, block = receipt.block_number, "transaction confirmed");
				if let Some(events) = events {
					let _ = events.send(SubmissionEvent::Receipt(receipt.clone()));
				}
				Ok(receipt)
			}
			Err(e) => {
				tracing::error!(tx_hash = %hash, chain_id, error = %e, "transaction confirmation failed");
				if let Some(events) = events {
					let _ = events.send(SubmissionEvent::Error(e.to_string()));
				}
				Err(e)
			}
		}
	}

	/// Gets the current gas price for a chain, in wei.
	pub async fn get_gas_price(&self, chain_id: u64) -> Result<u128, DeliveryError> {
		self.provider(chain_id)?.get_gas_price(chain_id).await
	}

	/// Gets the next valid nonce for an address on a chain.
	pub async fn get_nonce(
		&self,
		address: &Address,
		chain_id: u64,
	) -> Result<u64, DeliveryError> {
		self.provider(chain_id)?.get_nonce(address, chain_id).await
	}

	/// Gets the latest block number on a chain.
	pub async fn get_block_number(&self, chain_id: u64) -> Result<u64, DeliveryError> {
		self.provider(chain_id)?.get_block_number(chain_id).await
	}
}

/// Builds a ready [`DeliveryService`] over HTTP providers for every
/// configured network, signing with the supplied private key.
pub fn http_delivery_from_config(
	networks: &NetworksConfig,
	private_key: &SecretString,
	min_confirmations: u64,
) -> Result<DeliveryService, DeliveryError> {
	let delivery = implementations::evm::alloy::AlloyDelivery::new(networks, private_key)?;
	let mut providers: HashMap<u64, Box<dyn DeliveryInterface>> = HashMap::new();
	for chain_id in networks.keys() {
		providers.insert(*chain_id, Box::new(delivery.clone()));
	}
	Ok(DeliveryService::new(providers, min_confirmations))
}
