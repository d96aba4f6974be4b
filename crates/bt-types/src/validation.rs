//! Argument validation for the client facades.
//!
//! Every mutating operation validates its inputs with these helpers before
//! building a descriptor, so malformed input is rejected without touching
//! the network. Checks that need no suspension fail synchronously; the
//! asynchronous contract is reserved for paths that truly await network
//! output.

use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

/// Errors raised by argument validation, always before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	/// A value that should be a chain address is malformed.
	#[error("Invalid address for '{field}': {value}")]
	InvalidAddress { field: String, value: String },
	/// A value that should be a 32-byte hex quantity is malformed.
	#[error("Invalid 32-byte hex value for '{field}': {value}")]
	InvalidHash { field: String, value: String },
	/// An amount or signature component that must be non-zero is zero.
	#[error("Value for '{field}' must be non-zero")]
	ZeroValue { field: String },
	/// A required field is missing or empty.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// A list that must carry at least one entry is empty.
	#[error("List '{0}' must not be empty")]
	EmptyList(String),
	/// A numeric field is outside its allowed range.
	#[error("Value out of range for '{field}': {message}")]
	OutOfRange { field: String, message: String },
}

/// Parses a chain address, rejecting anything that is not 20 bytes of hex.
pub fn parse_address(field: &str, value: &str) -> Result<Address, ValidationError> {
	value
		.parse::<Address>()
		.map_err(|_| ValidationError::InvalidAddress {
			field: field.to_string(),
			value: value.to_string(),
		})
}

/// Parses a 32-byte hex value such as a stake-request hash or a signature
/// component. Empty strings fail here, covering the missing-field case.
pub fn parse_hash32(field: &str, value: &str) -> Result<B256, ValidationError> {
	value
		.parse::<B256>()
		.map_err(|_| ValidationError::InvalidHash {
			field: field.to_string(),
			value: value.to_string(),
		})
}

/// Rejects zero amounts.
pub fn require_nonzero(field: &str, amount: U256) -> Result<(), ValidationError> {
	if amount.is_zero() {
		return Err(ValidationError::ZeroValue {
			field: field.to_string(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_address_accepts_prefixed_hex() {
		let address = parse_address("from", "0x5fbdb2315678afecb367f032d93f642f64180aa3");
		assert!(address.is_ok());
	}

	#[test]
	fn test_parse_address_rejects_malformed_input() {
		for bad in ["", "0x123", "not-an-address", "0xzz..."] {
			let result = parse_address("from", bad);
			assert!(
				matches!(result, Err(ValidationError::InvalidAddress { .. })),
				"expected rejection for {:?}",
				bad
			);
		}
	}

	#[test]
	fn test_parse_hash32_rejects_empty_and_short_values() {
		assert!(parse_hash32("stake_request_hash", "").is_err());
		assert!(parse_hash32("stake_request_hash", "0xabcd").is_err());

		let ok = parse_hash32(
			"stake_request_hash",
			"0x52567a6fba39aeb903e836d640e07e2a1a1981bef54a54f4cb9b0cbe5b2f03c5",
		);
		assert!(ok.is_ok());
	}

	#[test]
	fn test_require_nonzero() {
		assert!(require_nonzero("amount", U256::ZERO).is_err());
		assert!(require_nonzero("amount", U256::from(1u64)).is_ok());
	}
}
