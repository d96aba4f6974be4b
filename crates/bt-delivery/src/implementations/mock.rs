//! Recording delivery double for tests.
//!
//! `MockDelivery` never touches a network: it records every submission and
//! read call in arrival order and serves queued read responses. Handles are
//! cheap clones over shared state, so a test can keep one clone for
//! inspection after boxing another into a `DeliveryService`.

use crate::{DeliveryError, DeliveryInterface};
use alloy_primitives::Address;
use async_trait::async_trait;
use bt_types::{Transaction, TransactionHash, TransactionReceipt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
	submitted: Mutex<Vec<Transaction>>,
	calls: Mutex<Vec<(Address, Vec<u8>)>>,
	call_responses: Mutex<VecDeque<Vec<u8>>>,
	hash_counter: AtomicU64,
}

/// In-memory delivery provider that records instead of sending.
#[derive(Clone)]
pub struct MockDelivery {
	state: Arc<MockState>,
	/// Success flag stamped on every receipt.
	succeed: bool,
	/// Contract address stamped on receipts, for deployment tests.
	deployed_address: Option<Address>,
}

impl Default for MockDelivery {
	fn default() -> Self {
		Self::new()
	}
}

impl MockDelivery {
	/// Creates a mock whose receipts report success.
	pub fn new() -> Self {
		Self {
			state: Arc::new(MockState::default()),
			succeed: true,
			deployed_address: None,
		}
	}

	/// Creates a mock whose receipts report reverted execution.
	pub fn failing() -> Self {
		Self {
			succeed: false,
			..Self::new()
		}
	}

	/// Stamps receipts with a created-contract address.
	pub fn with_deployed_address(mut self, address: Address) -> Self {
		self.deployed_address = Some(address);
		self
	}

	/// Queues the return data for the next read call.
	pub fn push_call_response(&self, data: Vec<u8>) {
		self.state
			.call_responses
			.lock()
			.unwrap()
			.push_back(data);
	}

	/// Transactions submitted so far, in order.
	pub fn submissions(&self) -> Vec<Transaction> {
		self.state.submitted.lock().unwrap().clone()
	}

	/// Read calls issued so far, as (target, call data) pairs in order.
	pub fn read_calls(&self) -> Vec<(Address, Vec<u8>)> {
		self.state.calls.lock().unwrap().clone()
	}

	/// Total number of network-shaped invocations recorded.
	pub fn invocation_count(&self) -> usize {
		self.state.submitted.lock().unwrap().len() + self.state.calls.lock().unwrap().len()
	}

	fn receipt(&self, hash: &TransactionHash) -> TransactionReceipt {
		TransactionReceipt {
			hash: hash.clone(),
			block_number: 1,
			success: self.succeed,
			contract_address: self.deployed_address,
		}
	}
}

#[async_trait]
impl DeliveryInterface for MockDelivery {
	async fn submit(&self, tx: &Transaction) -> Result<TransactionHash, DeliveryError> {
		self.state.submitted.lock().unwrap().push(tx.clone());
		let counter = self.state.hash_counter.fetch_add(1, Ordering::SeqCst) + 1;
		let mut hash = vec![0u8; 24];
		hash.extend_from_slice(&counter.to_be_bytes());
		Ok(TransactionHash(hash))
	}

	async fn call(
		&self,
		_chain_id: u64,
		to: &Address,
		data: Vec<u8>,
	) -> Result<Vec<u8>, DeliveryError> {
		self.state.calls.lock().unwrap().push((*to, data));
		let response = self.state.call_responses.lock().unwrap().pop_front();
		Ok(response.unwrap_or_else(|| vec![0u8; 32]))
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
		_chain_id: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		Ok(self.receipt(hash))
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		_chain_id: u64,
		_confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		Ok(self.receipt(hash))
	}

	async fn get_gas_price(&self, _chain_id: u64) -> Result<u128, DeliveryError> {
		Ok(1_000_000_000)
	}

	async fn get_nonce(&self, _address: &Address, _chain_id: u64) -> Result<u64, DeliveryError> {
		Ok(0)
	}

	async fn get_block_number(&self, _chain_id: u64) -> Result<u64, DeliveryError> {
		Ok(1)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::U256;

	fn sample_tx() -> Transaction {
		Transaction {
			chain_id: 1409,
			from: None,
			to: Some(Address::ZERO),
			data: vec![1, 2, 3],
			value: U256::ZERO,
			gas_limit: None,
			gas_price: None,
			nonce: None,
		}
	}

	#[tokio::test]
	async fn test_records_submissions_in_order() {
		let mock = MockDelivery::new();
		let first = mock.submit(&sample_tx()).await.unwrap();
		let second = mock.submit(&sample_tx()).await.unwrap();

		assert_ne!(first, second);
		assert_eq!(mock.submissions().len(), 2);
		assert_eq!(mock.invocation_count(), 2);
	}

	#[tokio::test]
	async fn test_serves_queued_read_responses() {
		let mock = MockDelivery::new();
		mock.push_call_response(vec![0xaa; 32]);

		let first = mock.call(1, &Address::ZERO, vec![]).await.unwrap();
		let second = mock.call(1, &Address::ZERO, vec![]).await.unwrap();

		assert_eq!(first, vec![0xaa; 32]);
		// Queue exhausted: a zero word comes back.
		assert_eq!(second, vec![0u8; 32]);
		assert_eq!(mock.read_calls().len(), 2);
	}

	#[tokio::test]
	async fn test_failing_mock_reports_revert() {
		let mock = MockDelivery::failing();
		let hash = mock.submit(&sample_tx()).await.unwrap();
		let receipt = mock.wait_for_confirmation(&hash, 1409, 1).await.unwrap();
		assert!(!receipt.success);
	}
}
