//! Client facades for the BrandedToken and GatewayComposer contracts.
//!
//! Two facades, each wrapping one deployed contract:
//! [`BrandedTokenClient`] covers deployment, the stake-request lifecycle,
//! restriction lifting, and conversion reads; [`GatewayComposerStaker`]
//! orchestrates value-token approval followed by a composed stake request.
//! Every mutating operation exists in a raw form that only builds the
//! unsent descriptor and a submitting form that relays it through the
//! delivery service. All input validation happens here, before any network
//! call; contract semantics stay on-chain.

use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use bt_contracts::ContractsError;
use bt_delivery::{DeliveryError, DeliveryService};
use bt_types::ValidationError;
use thiserror::Error;

/// BrandedToken facade.
pub mod branded_token;
/// GatewayComposer staking facade.
pub mod composer;

pub use branded_token::{BrandedTokenClient, DeployParams};
pub use composer::{GatewayComposerStaker, StakeParams, COMPOSER_STAKE_GAS};

/// Errors surfaced by the client facades.
///
/// Validation errors are raised before any network call; delivery errors
/// pass through from the transport verbatim.
#[derive(Debug, Error)]
pub enum ClientError {
	/// Malformed or missing input, detected client-side.
	#[error("Validation error: {0}")]
	Validation(#[from] ValidationError),
	/// Contract artifact lookup failed.
	#[error("Contracts error: {0}")]
	Contracts(#[from] ContractsError),
	/// Transport or revert error from the delivery layer.
	#[error("Delivery error: {0}")]
	Delivery(#[from] DeliveryError),
	/// A contract returned data the ABI bindings cannot decode.
	#[error("Failed to decode contract response: {0}")]
	Decode(String),
	/// A deployment settled without yielding a usable contract address.
	#[error("Deployment failed: {0}")]
	DeploymentFailed(String),
}

/// Executes a read-only contract call and decodes its return value.
pub(crate) async fn read_contract<C: SolCall + Send>(
	delivery: &DeliveryService,
	chain_id: u64,
	to: &Address,
	call: C,
) -> Result<C::Return, ClientError> {
	let data = delivery.call(chain_id, to, call.abi_encode()).await?;
	C::abi_decode_returns(&data, true).map_err(|e| ClientError::Decode(e.to_string()))
}
