//! Submission result types.
//!
//! Hashes and receipts returned by the transaction sender, plus the
//! progress events a pending submission can emit before it settles.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Blockchain transaction hash, stored as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl std::fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

/// Execution details of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block the transaction was included in.
	pub block_number: u64,
	/// Whether execution succeeded.
	pub success: bool,
	/// Address of the created contract, for deployment transactions.
	pub contract_address: Option<Address>,
}

/// Interim milestones of a pending submission.
///
/// Emitted over an optional channel so callers can observe progress
/// without blocking on the final settled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
	/// The transaction has been accepted by the node and has a hash.
	TransactionHash(TransactionHash),
	/// The transaction has been mined and confirmed.
	Receipt(TransactionReceipt),
	/// Submission or confirmation failed.
	Error(String),
}
