//! Staking facade over a deployed GatewayComposer contract.
//!
//! The composer pulls approved value tokens from the staker and routes a
//! stake request to a gateway. The facade's `stake` runs the two remote
//! calls strictly in sequence: the ERC-20 approval must be observed
//! submitted before the composed request is issued, because the composer's
//! on-chain transfer depends on the prior allowance taking effect.

use crate::{read_contract, ClientError};
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use bt_contracts::abi::{IBrandedToken, IERC20, IGatewayComposer};
use bt_delivery::{DeliveryError, DeliveryService};
use bt_types::{
	validation, ComposerStakeRequest, StakeRequest, SubmissionEvent, Transaction,
	TransactionOptions, TransactionReceipt, ValidationError,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Gas limit applied to composer stake requests when the caller supplies
/// none.
pub const COMPOSER_STAKE_GAS: u64 = 8_000_000;

/// Parameters of a composed stake request.
#[derive(Debug, Clone)]
pub struct StakeParams {
	/// Owner of the value tokens being staked.
	pub owner: String,
	/// Amount of value tokens to stake.
	pub stake_amount: U256,
	/// Branded-token amount expected to be minted.
	pub mint_amount: U256,
	/// Gateway the stake is destined for.
	pub gateway: String,
	/// Beneficiary on the auxiliary chain.
	pub beneficiary: String,
	/// Gas price for facilitation reimbursement, passed through on-chain.
	pub gas_price: U256,
	/// Gas limit for facilitation reimbursement, passed through on-chain.
	pub gas_limit: U256,
	/// Staker nonce on the gateway.
	pub staker_nonce: U256,
}

/// Facade orchestrating value-token approval and composed stake requests.
pub struct GatewayComposerStaker {
	delivery: Arc<DeliveryService>,
	chain_id: u64,
	value_token: Address,
	branded_token: Address,
	composer: Address,
	tx_options: TransactionOptions,
}

impl GatewayComposerStaker {
	/// Creates a staker bound to the value-token, branded-token, and
	/// composer contracts.
	///
	/// All addresses are validated here; the value token must not be the
	/// zero address, since every staking flow starts with an approval
	/// against it.
	pub fn new(
		delivery: Arc<DeliveryService>,
		chain_id: u64,
		value_token: &str,
		branded_token: &str,
		composer: &str,
		tx_options: TransactionOptions,
	) -> Result<Self, ClientError> {
		let value_token = validation::parse_address("value_token", value_token)?;
		let branded_token = validation::parse_address("branded_token", branded_token)?;
		let composer = validation::parse_address("composer", composer)?;
		if value_token == Address::ZERO {
			return Err(ValidationError::MissingField("value_token".to_string()).into());
		}
		if !tx_options.from.is_empty() {
			validation::parse_address("from", &tx_options.from)?;
		}
		if !delivery.supports_chain(chain_id) {
			return Err(DeliveryError::NoProviderAvailable(chain_id).into());
		}
		Ok(Self {
			delivery,
			chain_id,
			value_token,
			branded_token,
			composer,
			tx_options,
		})
	}

	/// Builds the ERC-20 approval descriptor granting the composer the
	/// stake amount against the stored value token.
	pub fn approve_value_token_raw(
		&self,
		owner: &str,
		amount: U256,
	) -> Result<Transaction, ClientError> {
		let owner = validation::parse_address("owner", owner)?;
		validation::require_nonzero("amount", amount)?;

		let call = IERC20::approveCall {
			spender: self.composer,
			amount,
		};
		Ok(Transaction {
			chain_id: self.chain_id,
			from: Some(owner),
			to: Some(self.value_token),
			data: call.abi_encode(),
			value: U256::ZERO,
			gas_limit: self.tx_options.gas,
			gas_price: self.tx_options.gas_price,
			nonce: None,
		})
	}

	/// Builds the composer `requestStake` descriptor.
	///
	/// Caller-supplied options are merged over the flow defaults:
	/// `from = owner` and `gas = COMPOSER_STAKE_GAS`. A caller-supplied
	/// `gas` wins when present; an empty `from` override falls back to
	/// the owner.
	pub fn request_stake_raw(
		&self,
		params: &StakeParams,
		tx_options: Option<&TransactionOptions>,
	) -> Result<Transaction, ClientError> {
		validation::parse_address("owner", &params.owner)?;
		let gateway = validation::parse_address("gateway", &params.gateway)?;
		let beneficiary = validation::parse_address("beneficiary", &params.beneficiary)?;
		validation::require_nonzero("stake_amount", params.stake_amount)?;

		let merged = self.merged_options(&params.owner, tx_options);
		let from = validation::parse_address("from", &merged.from)?;

		let call = IGatewayComposer::requestStakeCall {
			stakeVT: params.stake_amount,
			mintBT: params.mint_amount,
			gateway,
			beneficiary,
			gasPrice: params.gas_price,
			gasLimit: params.gas_limit,
			nonce: params.staker_nonce,
		};
		Ok(Transaction {
			chain_id: self.chain_id,
			from: Some(from),
			to: Some(self.composer),
			data: call.abi_encode(),
			value: U256::ZERO,
			gas_limit: Some(merged.gas.unwrap_or(COMPOSER_STAKE_GAS)),
			gas_price: merged.gas_price,
			nonce: merged.nonce,
		})
	}

	/// Submits a composer stake request, forwarding submission milestones
	/// (hash, receipt, error) to the optional events channel.
	pub async fn request_stake(
		&self,
		params: &StakeParams,
		tx_options: Option<&TransactionOptions>,
		events: Option<&mpsc::UnboundedSender<SubmissionEvent>>,
	) -> Result<TransactionReceipt, ClientError> {
		let tx = self.request_stake_raw(params, tx_options)?;
		Ok(self.delivery.deliver_observed(tx, events).await?)
	}

	/// Approves the composer for the stake amount, then submits the
	/// composed stake request.
	///
	/// Both descriptors are built (and validated) before anything is
	/// submitted; the composer call is only issued after the approval
	/// settles.
	pub async fn stake(&self, params: &StakeParams) -> Result<TransactionReceipt, ClientError> {
		let approval = self.approve_value_token_raw(&params.owner, params.stake_amount)?;
		let request = self.request_stake_raw(params, None)?;

		let approval_receipt = self.delivery.deliver_and_confirm(approval).await?;
		if !approval_receipt.success {
			return Err(
				DeliveryError::TransactionFailed("value token approval reverted".to_string())
					.into(),
			);
		}
		tracing::info!(
			tx_hash = %approval_receipt.hash,
			"value token approval confirmed, submitting stake request"
		);

		Ok(self.delivery.deliver_and_confirm(request).await?)
	}

	/// Conversion read against the branded token, defaulting to the
	/// instance's stored address when no override is given.
	pub async fn convert_to_bt_token(
		&self,
		amount: U256,
		branded_token: Option<&str>,
	) -> Result<U256, ClientError> {
		let target = match branded_token {
			Some(address) => validation::parse_address("branded_token", address)?,
			None => self.branded_token,
		};
		let ret = read_contract(
			&self.delivery,
			self.chain_id,
			&target,
			IBrandedToken::convertToBrandedTokensCall {
				valueTokens: amount,
			},
		)
		.await?;
		Ok(ret._0)
	}

	/// Hash of the staker's open request on the branded token, or the
	/// zero hash.
	pub async fn stake_request_hash_for_staker(&self, staker: &str) -> Result<B256, ClientError> {
		let staker = validation::parse_address("staker", staker)?;
		let ret = read_contract(
			&self.delivery,
			self.chain_id,
			&self.branded_token,
			IBrandedToken::stakeRequestHashesCall { staker },
		)
		.await?;
		Ok(ret._0)
	}

	/// Stake request recorded by the branded token under a hash.
	pub async fn stake_request(
		&self,
		stake_request_hash: &str,
	) -> Result<StakeRequest, ClientError> {
		let hash = validation::parse_hash32("stake_request_hash", stake_request_hash)?;
		let ret = read_contract(
			&self.delivery,
			self.chain_id,
			&self.branded_token,
			IBrandedToken::stakeRequestsCall {
				stakeRequestHash: hash,
			},
		)
		.await?;
		Ok(StakeRequest {
			staker: ret.staker,
			stake: ret.stake,
			nonce: ret.nonce,
		})
	}

	/// Stake request recorded by the composer under a hash.
	pub async fn composer_stake_request(
		&self,
		stake_request_hash: &str,
	) -> Result<ComposerStakeRequest, ClientError> {
		let hash = validation::parse_hash32("stake_request_hash", stake_request_hash)?;
		let ret = read_contract(
			&self.delivery,
			self.chain_id,
			&self.composer,
			IGatewayComposer::stakeRequestsCall {
				stakeRequestHash: hash,
			},
		)
		.await?;
		Ok(ComposerStakeRequest {
			stake_vt: ret.stakeVT,
			gateway: ret.gateway,
			beneficiary: ret.beneficiary,
			gas_price: ret.gasPrice,
			gas_limit: ret.gasLimit,
			nonce: ret.nonce,
		})
	}

	fn merged_options(
		&self,
		owner: &str,
		overrides: Option<&TransactionOptions>,
	) -> TransactionOptions {
		let mut merged = TransactionOptions {
			from: owner.to_string(),
			gas: None,
			gas_price: self.tx_options.gas_price,
			nonce: None,
		};
		if let Some(overrides) = overrides {
			if !overrides.from.is_empty() {
				merged.from = overrides.from.clone();
			}
			if overrides.gas.is_some() {
				merged.gas = overrides.gas;
			}
			if overrides.gas_price.is_some() {
				merged.gas_price = overrides.gas_price;
			}
			if overrides.nonce.is_some() {
				merged.nonce = overrides.nonce;
			}
		}
		merged
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_sol_types::SolValue;
	use bt_delivery::implementations::mock::MockDelivery;
	use bt_delivery::DeliveryInterface;
	use std::collections::HashMap;

	const CHAIN_ID: u64 = 1409;
	const VALUE_TOKEN: &str = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512";
	const BRANDED_TOKEN: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
	const COMPOSER: &str = "0x0165878a594ca255338adfa4d48449f69242eb8f";
	const OWNER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
	const GATEWAY: &str = "0x9fbda871d559710256a2502a2517b794b482db40";
	const BENEFICIARY: &str = "0x2932b7a2355d6fecc4b5c0b6bd44cc31df247a2e";
	const HASH: &str = "0x52567a6fba39aeb903e836d640e07e2a1a1981bef54a54f4cb9b0cbe5b2f03c5";

	fn service(mock: &MockDelivery) -> Arc<DeliveryService> {
		let mut providers: HashMap<u64, Box<dyn DeliveryInterface>> = HashMap::new();
		providers.insert(CHAIN_ID, Box::new(mock.clone()));
		Arc::new(DeliveryService::new(providers, 1))
	}

	fn staker(mock: &MockDelivery) -> GatewayComposerStaker {
		GatewayComposerStaker::new(
			service(mock),
			CHAIN_ID,
			VALUE_TOKEN,
			BRANDED_TOKEN,
			COMPOSER,
			TransactionOptions::with_from(OWNER),
		)
		.unwrap()
	}

	fn stake_params() -> StakeParams {
		StakeParams {
			owner: OWNER.to_string(),
			stake_amount: U256::from(1000u64),
			mint_amount: U256::from(3500u64),
			gateway: GATEWAY.to_string(),
			beneficiary: BENEFICIARY.to_string(),
			gas_price: U256::from(5u64),
			gas_limit: U256::from(200u64),
			staker_nonce: U256::from(1u64),
		}
	}

	#[test]
	fn test_new_rejects_zero_value_token() {
		let mock = MockDelivery::new();
		let result = GatewayComposerStaker::new(
			service(&mock),
			CHAIN_ID,
			"0x0000000000000000000000000000000000000000",
			BRANDED_TOKEN,
			COMPOSER,
			TransactionOptions::default(),
		);
		assert!(matches!(
			result,
			Err(ClientError::Validation(ValidationError::MissingField(_)))
		));
	}

	#[tokio::test]
	async fn test_stake_submits_approval_before_composer_call() {
		let mock = MockDelivery::new();
		let staker = staker(&mock);

		staker.stake(&stake_params()).await.unwrap();

		let submissions = mock.submissions();
		assert_eq!(submissions.len(), 2);

		// First submission: approval against the stored value token.
		assert_eq!(submissions[0].to, Some(VALUE_TOKEN.parse().unwrap()));
		let approve = IERC20::approveCall::abi_decode(&submissions[0].data, true).unwrap();
		assert_eq!(approve.spender, COMPOSER.parse::<Address>().unwrap());
		assert_eq!(approve.amount, U256::from(1000u64));

		// Second submission: the composed stake request.
		assert_eq!(submissions[1].to, Some(COMPOSER.parse().unwrap()));
		let request =
			IGatewayComposer::requestStakeCall::abi_decode(&submissions[1].data, true).unwrap();
		assert_eq!(request.stakeVT, U256::from(1000u64));
		assert_eq!(request.mintBT, U256::from(3500u64));
		assert_eq!(request.beneficiary, BENEFICIARY.parse::<Address>().unwrap());
	}

	#[tokio::test]
	async fn test_stake_fails_when_approval_reverts() {
		let mock = MockDelivery::failing();
		let staker = staker(&mock);

		let result = staker.stake(&stake_params()).await;
		assert!(matches!(
			result,
			Err(ClientError::Delivery(DeliveryError::TransactionFailed(_)))
		));
		// The composer call is never issued after a failed approval.
		assert_eq!(mock.submissions().len(), 1);
	}

	#[tokio::test]
	async fn test_stake_validation_precedes_any_submission() {
		let mock = MockDelivery::new();
		let staker = staker(&mock);
		let mut params = stake_params();
		params.beneficiary = "not-an-address".to_string();

		let result = staker.stake(&params).await;
		assert!(matches!(result, Err(ClientError::Validation(_))));
		assert_eq!(mock.invocation_count(), 0);
	}

	#[test]
	fn test_request_stake_defaults_gas() {
		let mock = MockDelivery::new();
		let staker = staker(&mock);

		let tx = staker.request_stake_raw(&stake_params(), None).unwrap();
		assert_eq!(tx.gas_limit, Some(COMPOSER_STAKE_GAS));
		assert_eq!(tx.from, Some(OWNER.parse().unwrap()));
	}

	#[test]
	fn test_request_stake_honors_caller_gas() {
		let mock = MockDelivery::new();
		let staker = staker(&mock);
		let overrides = TransactionOptions {
			gas: Some(5_000_000),
			..TransactionOptions::default()
		};

		let tx = staker
			.request_stake_raw(&stake_params(), Some(&overrides))
			.unwrap();
		assert_eq!(tx.gas_limit, Some(5_000_000));
		// Empty from override falls back to the owner.
		assert_eq!(tx.from, Some(OWNER.parse().unwrap()));
	}

	#[tokio::test]
	async fn test_request_stake_emits_submission_events() {
		let mock = MockDelivery::new();
		let staker = staker(&mock);
		let (tx_events, mut rx_events) = mpsc::unbounded_channel();

		staker
			.request_stake(&stake_params(), None, Some(&tx_events))
			.await
			.unwrap();

		assert!(matches!(
			rx_events.try_recv().unwrap(),
			SubmissionEvent::TransactionHash(_)
		));
		assert!(matches!(
			rx_events.try_recv().unwrap(),
			SubmissionEvent::Receipt(_)
		));
	}

	#[test]
	fn test_approval_targets_stored_value_token_and_amount() {
		let mock = MockDelivery::new();
		let staker = staker(&mock);

		let tx = staker
			.approve_value_token_raw(OWNER, U256::from(42u64))
			.unwrap();
		assert_eq!(tx.to, Some(VALUE_TOKEN.parse().unwrap()));
		let approve = IERC20::approveCall::abi_decode(&tx.data, true).unwrap();
		assert_eq!(approve.amount, U256::from(42u64));
	}

	#[tokio::test]
	async fn test_convert_to_bt_token_uses_stored_and_override_addresses() {
		let mock = MockDelivery::new();
		let staker = staker(&mock);
		mock.push_call_response(U256::from(350u64).abi_encode());
		mock.push_call_response(U256::from(700u64).abi_encode());

		let defaulted = staker
			.convert_to_bt_token(U256::from(100u64), None)
			.await
			.unwrap();
		let overridden = staker
			.convert_to_bt_token(U256::from(200u64), Some(COMPOSER))
			.await
			.unwrap();

		assert_eq!(defaulted, U256::from(350u64));
		assert_eq!(overridden, U256::from(700u64));
		let calls = mock.read_calls();
		assert_eq!(calls[0].0, BRANDED_TOKEN.parse::<Address>().unwrap());
		assert_eq!(calls[1].0, COMPOSER.parse::<Address>().unwrap());
	}

	#[tokio::test]
	async fn test_composer_stake_request_decodes_record() {
		let mock = MockDelivery::new();
		let staker = staker(&mock);
		let gateway: Address = GATEWAY.parse().unwrap();
		let beneficiary: Address = BENEFICIARY.parse().unwrap();
		mock.push_call_response(
			(
				U256::from(1000u64),
				gateway,
				beneficiary,
				U256::from(5u64),
				U256::from(200u64),
				U256::from(1u64),
			)
				.abi_encode_params(),
		);

		let record = staker.composer_stake_request(HASH).await.unwrap();
		assert_eq!(record.stake_vt, U256::from(1000u64));
		assert_eq!(record.gateway, gateway);
		assert_eq!(record.beneficiary, beneficiary);
		assert_eq!(record.nonce, U256::from(1u64));

		// The lookup goes to the composer contract.
		assert_eq!(
			mock.read_calls()[0].0,
			COMPOSER.parse::<Address>().unwrap()
		);
	}
}
