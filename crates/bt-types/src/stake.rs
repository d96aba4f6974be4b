//! On-chain stake-request records.
//!
//! Both contracts keep stake-request bookkeeping on-chain, keyed by a
//! request hash. These records are only ever fetched by this SDK, never
//! constructed or mutated client-side.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Stake request as recorded by the BrandedToken contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRequest {
	/// The account that requested the stake.
	pub staker: Address,
	/// Amount of value tokens staked.
	pub stake: U256,
	/// Staker nonce at request time.
	pub nonce: U256,
}

/// Stake request as recorded by the GatewayComposer contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerStakeRequest {
	/// Amount of value tokens routed through the composer.
	pub stake_vt: U256,
	/// Gateway the stake is destined for.
	pub gateway: Address,
	/// Beneficiary on the auxiliary chain.
	pub beneficiary: Address,
	/// Gas price the facilitator is willing to be reimbursed at.
	pub gas_price: U256,
	/// Gas limit for the facilitation reimbursement.
	pub gas_limit: U256,
	/// Staker nonce on the gateway.
	pub nonce: U256,
}
