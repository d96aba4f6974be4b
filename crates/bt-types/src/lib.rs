//! Common types for the branded-token staking SDK.
//!
//! This crate defines the data model shared by every other crate in the
//! workspace: transaction descriptors and options, submission results,
//! stake-request records, network configuration, argument validation,
//! and small formatting helpers.

/// Transaction hashes, receipts, and submission progress events.
pub mod delivery;
/// Network configuration types (chain id to RPC endpoint).
pub mod networks;
/// Zeroizing wrapper for private keys and other sensitive strings.
pub mod secret_string;
/// On-chain stake-request records, fetched but never mutated client-side.
pub mod stake;
/// Unsent transaction descriptors and caller-supplied options.
pub mod transaction;
/// Hex-string helpers.
pub mod utils;
/// Argument validation raised before any network call.
pub mod validation;

pub use delivery::*;
pub use networks::{deserialize_networks, NetworkConfig, NetworksConfig};
pub use secret_string::SecretString;
pub use stake::*;
pub use transaction::*;
pub use utils::{with_0x_prefix, without_0x_prefix};
pub use validation::*;
