//! ABI definitions for the on-chain contracts, via alloy's `sol!` macro.
//!
//! These mirror the deployed contract interfaces. Call structs encode with
//! `SolCall::abi_encode` and decode their returns with
//! `SolCall::abi_decode_returns`; no JSON ABI is shipped or parsed.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, sol_data, SolType};

sol! {
	/// BrandedToken: value-token staking with on-chain conversion math,
	/// EIP-712 stake-request acceptance, and a transfer restriction list.
	interface IBrandedToken {
		function convertToBrandedTokens(uint256 valueTokens) external view returns (uint256);
		function convertToValueTokens(uint256 brandedTokens) external view returns (uint256);
		function requestStake(uint256 stake, uint256 mint) external returns (bytes32);
		function acceptStakeRequest(bytes32 stakeRequestHash, bytes32 r, bytes32 s, uint8 v) external returns (bool);
		function rejectStakeRequest(bytes32 stakeRequestHash) external returns (bool);
		function liftRestriction(address[] restrictionHolders) external returns (bool);
		function isUnrestricted(address actor) external view returns (bool);
		function redeem(uint256 brandedTokens) external returns (bool);
		function stakeRequestHashes(address staker) external view returns (bytes32);
		function stakeRequests(bytes32 stakeRequestHash) external view returns (address staker, uint256 stake, uint256 nonce);
	}

	/// GatewayComposer: routes an approved value-token stake into a gateway
	/// stake request carrying gas reimbursement parameters.
	interface IGatewayComposer {
		function requestStake(uint256 stakeVT, uint256 mintBT, address gateway, address beneficiary, uint256 gasPrice, uint256 gasLimit, uint256 nonce) external returns (bytes32);
		function stakeRequests(bytes32 stakeRequestHash) external view returns (uint256 stakeVT, address gateway, address beneficiary, uint256 gasPrice, uint256 gasLimit, uint256 nonce);
	}

	/// ERC-20 surface of the value token used by the staking flow.
	interface IERC20 {
		function approve(address spender, uint256 amount) external returns (bool);
		function allowance(address owner, address spender) external view returns (uint256);
		function balanceOf(address owner) external view returns (uint256);
	}
}

/// Encodes the BrandedToken constructor arguments for deployment.
///
/// The constructor signature is
/// `(address valueToken, string symbol, string name, uint8 decimals,
/// uint256 conversionRate, uint8 conversionRateDecimals, address organization)`.
/// The returned bytes are appended to the contract bytecode.
#[allow(clippy::too_many_arguments)]
pub fn branded_token_constructor_args(
	value_token: Address,
	symbol: &str,
	name: &str,
	decimals: u8,
	conversion_rate: U256,
	conversion_rate_decimals: u8,
	organization: Address,
) -> Vec<u8> {
	type ConstructorArgs = (
		sol_data::Address,
		sol_data::String,
		sol_data::String,
		sol_data::Uint<8>,
		sol_data::Uint<256>,
		sol_data::Uint<8>,
		sol_data::Address,
	);
	ConstructorArgs::abi_encode_params(&(
		value_token,
		symbol.to_string(),
		name.to_string(),
		decimals,
		conversion_rate,
		conversion_rate_decimals,
		organization,
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_sol_types::SolCall;

	#[test]
	fn test_request_stake_selector_and_length() {
		let call = IBrandedToken::requestStakeCall {
			stake: U256::from(1000u64),
			mint: U256::from(3500u64),
		};
		let encoded = call.abi_encode();
		// 4-byte selector + two uint256 words
		assert_eq!(encoded.len(), 68);

		let decoded = IBrandedToken::requestStakeCall::abi_decode(&encoded, true).unwrap();
		assert_eq!(decoded.stake, U256::from(1000u64));
		assert_eq!(decoded.mint, U256::from(3500u64));
	}

	#[test]
	fn test_approve_selector() {
		let call = IERC20::approveCall {
			spender: Address::ZERO,
			amount: U256::MAX,
		};
		let encoded = call.abi_encode();
		// approve(address,uint256) selector = 0x095ea7b3
		assert_eq!(&encoded[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
	}

	#[test]
	fn test_constructor_args_start_with_value_token_word() {
		let value_token: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
			.parse()
			.unwrap();
		let organization: Address = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"
			.parse()
			.unwrap();

		let args = branded_token_constructor_args(
			value_token,
			"BT",
			"Branded Token",
			18,
			U256::from(35u64),
			1,
			organization,
		);

		// First word is the value-token address, left-padded to 32 bytes.
		assert_eq!(&args[..12], &[0u8; 12]);
		assert_eq!(&args[12..32], value_token.as_slice());
		// Seven parameters, two of them dynamic strings.
		assert!(args.len() > 7 * 32);
	}

	#[test]
	fn test_composer_request_stake_roundtrip() {
		let gateway: Address = "0x9fbda871d559710256a2502a2517b794b482db40"
			.parse()
			.unwrap();
		let beneficiary: Address = "0x2932b7a2355d6fecc4b5c0b6bd44cc31df247a2e"
			.parse()
			.unwrap();
		let call = IGatewayComposer::requestStakeCall {
			stakeVT: U256::from(100u64),
			mintBT: U256::from(350u64),
			gateway,
			beneficiary,
			gasPrice: U256::from(5u64),
			gasLimit: U256::from(200u64),
			nonce: U256::from(1u64),
		};
		let encoded = call.abi_encode();
		assert_eq!(encoded.len(), 4 + 7 * 32);

		let decoded = IGatewayComposer::requestStakeCall::abi_decode(&encoded, true).unwrap();
		assert_eq!(decoded.gateway, gateway);
		assert_eq!(decoded.nonce, U256::from(1u64));
	}
}
