//! Unsent transaction descriptors and caller-supplied transaction options.
//!
//! A [`Transaction`] is a call that has been fully built but not yet
//! submitted: target contract (or none, for deployments), encoded call data,
//! and optional gas parameters. It is immutable once built and consumed
//! exactly once by submission.

use alloy_primitives::{Address, TxKind, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};

/// An unsent contract call or deployment, bound to a chain.
///
/// `to == None` marks a deployment; `data` then carries the contract
/// bytecode followed by the ABI-encoded constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// The chain this transaction targets.
	pub chain_id: u64,
	/// Sender address, if the caller supplied one.
	pub from: Option<Address>,
	/// Target contract address, or `None` for a deployment.
	pub to: Option<Address>,
	/// ABI-encoded call data (or bytecode plus constructor arguments).
	pub data: Vec<u8>,
	/// Native token value attached to the call.
	pub value: U256,
	/// Gas limit override.
	pub gas_limit: Option<u64>,
	/// Gas price override in wei.
	pub gas_price: Option<u128>,
	/// Nonce override.
	pub nonce: Option<u64>,
}

impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		let mut request = TransactionRequest::default();
		request.chain_id = Some(tx.chain_id);
		request.from = tx.from;
		request.to = Some(match tx.to {
			Some(address) => TxKind::Call(address),
			None => TxKind::Create,
		});
		request.input = TransactionInput::new(tx.data.into());
		request.value = Some(tx.value);
		request.gas = tx.gas_limit;
		request.gas_price = tx.gas_price;
		request.nonce = tx.nonce;
		request
	}
}

/// Caller-supplied overrides applied when a descriptor is built.
///
/// `from` is required by every mutating operation and is validated before
/// any network call. The remaining fields pass through to the descriptor
/// untouched; defaults (such as the composer staking gas limit) are applied
/// by the flow that builds the descriptor, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOptions {
	/// Sender address. An empty string counts as absent during merging and
	/// fails validation when the merged result is used.
	pub from: String,
	/// Gas limit.
	pub gas: Option<u64>,
	/// Gas price in wei.
	pub gas_price: Option<u128>,
	/// Nonce.
	pub nonce: Option<u64>,
}

impl TransactionOptions {
	/// Creates options carrying only a sender address.
	pub fn with_from(from: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			..Self::default()
		}
	}
}
