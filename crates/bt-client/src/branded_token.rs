//! Facade over a deployed BrandedToken contract.
//!
//! Wraps deployment, the stake-request lifecycle (request, accept,
//! reject), restriction lifting, redemption, and the conversion reads.
//! Conversion math lives on-chain; `request_stake` reads the equivalent
//! mint amount remotely before building the two-argument call.

use crate::{read_contract, ClientError};
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use bt_contracts::abi::{self, IBrandedToken};
use bt_contracts::{ContractRegistry, BRANDED_TOKEN};
use bt_delivery::{DeliveryError, DeliveryService};
use bt_types::{
	validation, StakeRequest, Transaction, TransactionOptions, TransactionReceipt, ValidationError,
};
use std::sync::Arc;

/// Upper bound the contract enforces on conversion-rate decimals.
const MAX_CONVERSION_RATE_DECIMALS: u8 = 5;

/// Constructor arguments for a BrandedToken deployment.
#[derive(Debug, Clone)]
pub struct DeployParams {
	/// Address of the ERC-20 value token backing the branded token.
	pub value_token: String,
	/// Token symbol.
	pub symbol: String,
	/// Token name.
	pub name: String,
	/// Token decimals.
	pub decimals: u8,
	/// Value-to-branded conversion rate; must be positive.
	pub conversion_rate: u64,
	/// Decimals applied to the conversion rate; at most 5.
	pub conversion_rate_decimals: u8,
	/// Organization contract address governing the token.
	pub organization: String,
}

/// Client bound to one deployed BrandedToken contract.
pub struct BrandedTokenClient {
	delivery: Arc<DeliveryService>,
	chain_id: u64,
	address: Address,
}

impl BrandedTokenClient {
	/// Binds a client to a deployed contract.
	///
	/// Fails fast when the address is malformed, the chain has no
	/// configured provider, or the registry does not know the
	/// BrandedToken contract.
	pub fn new(
		delivery: Arc<DeliveryService>,
		registry: &ContractRegistry,
		chain_id: u64,
		address: &str,
	) -> Result<Self, ClientError> {
		let address = validation::parse_address("address", address)?;
		registry.require(BRANDED_TOKEN)?;
		if !delivery.supports_chain(chain_id) {
			return Err(DeliveryError::NoProviderAvailable(chain_id).into());
		}
		Ok(Self {
			delivery,
			chain_id,
			address,
		})
	}

	/// Address of the wrapped contract.
	pub fn address(&self) -> Address {
		self.address
	}

	/// Chain the wrapped contract is deployed on.
	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}

	/// Builds an unsent deployment descriptor: contract bytecode followed
	/// by the ABI-encoded constructor arguments.
	///
	/// Every precondition is checked before the registry is consulted, so
	/// a validation failure never reaches the artifact store, let alone
	/// the network.
	pub fn deploy_raw(
		registry: &ContractRegistry,
		chain_id: u64,
		params: &DeployParams,
		tx_options: &TransactionOptions,
	) -> Result<Transaction, ClientError> {
		let value_token = validation::parse_address("value_token", &params.value_token)?;
		let organization = validation::parse_address("organization", &params.organization)?;
		let from = validation::parse_address("from", &tx_options.from)?;
		if params.conversion_rate == 0 {
			return Err(ValidationError::ZeroValue {
				field: "conversion_rate".to_string(),
			}
			.into());
		}
		if params.conversion_rate_decimals > MAX_CONVERSION_RATE_DECIMALS {
			return Err(ValidationError::OutOfRange {
				field: "conversion_rate_decimals".to_string(),
				message: format!("must be at most {}", MAX_CONVERSION_RATE_DECIMALS),
			}
			.into());
		}

		let mut data = registry.bytecode(BRANDED_TOKEN)?;
		data.extend(abi::branded_token_constructor_args(
			value_token,
			&params.symbol,
			&params.name,
			params.decimals,
			U256::from(params.conversion_rate),
			params.conversion_rate_decimals,
			organization,
		));

		Ok(Transaction {
			chain_id,
			from: Some(from),
			to: None,
			data,
			value: U256::ZERO,
			gas_limit: tx_options.gas,
			gas_price: tx_options.gas_price,
			nonce: tx_options.nonce,
		})
	}

	/// Deploys a BrandedToken contract and binds a client to the
	/// resulting address.
	pub async fn deploy(
		delivery: Arc<DeliveryService>,
		registry: &ContractRegistry,
		chain_id: u64,
		params: &DeployParams,
		tx_options: &TransactionOptions,
	) -> Result<Self, ClientError> {
		let tx = Self::deploy_raw(registry, chain_id, params, tx_options)?;
		let receipt = delivery.deliver_and_confirm(tx).await?;
		if !receipt.success {
			return Err(ClientError::DeploymentFailed(
				"deployment transaction reverted".to_string(),
			));
		}
		let address = receipt.contract_address.ok_or_else(|| {
			ClientError::DeploymentFailed("receipt carries no contract address".to_string())
		})?;
		tracing::info!(address = %address, chain_id, "deployed BrandedToken");
		Ok(Self {
			delivery,
			chain_id,
			address,
		})
	}

	/// Asks the contract how many branded tokens a value-token amount
	/// converts to.
	pub async fn convert_to_branded_tokens(
		&self,
		value_amount: U256,
	) -> Result<U256, ClientError> {
		let ret = self
			.read(IBrandedToken::convertToBrandedTokensCall {
				valueTokens: value_amount,
			})
			.await?;
		Ok(ret._0)
	}

	/// Asks the contract how many value tokens a branded-token amount
	/// converts to.
	pub async fn convert_to_value_tokens(
		&self,
		branded_amount: U256,
	) -> Result<U256, ClientError> {
		let ret = self
			.read(IBrandedToken::convertToValueTokensCall {
				brandedTokens: branded_amount,
			})
			.await?;
		Ok(ret._0)
	}

	/// Builds the `requestStake(stake, mint)` descriptor.
	///
	/// Async because the mint amount is derived through the conversion
	/// read; it is never caller-supplied at this layer.
	pub async fn request_stake_raw(
		&self,
		stake_amount: U256,
		tx_options: &TransactionOptions,
	) -> Result<Transaction, ClientError> {
		let from = validation::parse_address("from", &tx_options.from)?;
		validation::require_nonzero("stake_amount", stake_amount)?;

		let mint_amount = self.convert_to_branded_tokens(stake_amount).await?;
		let call = IBrandedToken::requestStakeCall {
			stake: stake_amount,
			mint: mint_amount,
		};
		Ok(self.write_tx(from, call.abi_encode(), tx_options))
	}

	/// Submits a stake request and returns the awaited receipt.
	pub async fn request_stake(
		&self,
		stake_amount: U256,
		tx_options: &TransactionOptions,
	) -> Result<TransactionReceipt, ClientError> {
		let tx = self.request_stake_raw(stake_amount, tx_options).await?;
		Ok(self.delivery.deliver_and_confirm(tx).await?)
	}

	/// Builds the `acceptStakeRequest` descriptor.
	///
	/// The request hash and both signature halves must be 32-byte hex and
	/// `v` must be non-zero; each component is checked independently.
	pub fn accept_stake_request_raw(
		&self,
		stake_request_hash: &str,
		r: &str,
		s: &str,
		v: u8,
		tx_options: &TransactionOptions,
	) -> Result<Transaction, ClientError> {
		let from = validation::parse_address("from", &tx_options.from)?;
		let stake_request_hash = validation::parse_hash32("stake_request_hash", stake_request_hash)?;
		let r = validation::parse_hash32("r", r)?;
		let s = validation::parse_hash32("s", s)?;
		if v == 0 {
			return Err(ValidationError::ZeroValue {
				field: "v".to_string(),
			}
			.into());
		}

		let call = IBrandedToken::acceptStakeRequestCall {
			stakeRequestHash: stake_request_hash,
			r,
			s,
			v,
		};
		Ok(self.write_tx(from, call.abi_encode(), tx_options))
	}

	/// Submits an `acceptStakeRequest` call.
	pub async fn accept_stake_request(
		&self,
		stake_request_hash: &str,
		r: &str,
		s: &str,
		v: u8,
		tx_options: &TransactionOptions,
	) -> Result<TransactionReceipt, ClientError> {
		let tx = self.accept_stake_request_raw(stake_request_hash, r, s, v, tx_options)?;
		Ok(self.delivery.deliver_and_confirm(tx).await?)
	}

	/// Builds the `rejectStakeRequest` descriptor.
	pub fn reject_stake_request_raw(
		&self,
		stake_request_hash: &str,
		tx_options: &TransactionOptions,
	) -> Result<Transaction, ClientError> {
		let from = validation::parse_address("from", &tx_options.from)?;
		let stake_request_hash = validation::parse_hash32("stake_request_hash", stake_request_hash)?;

		let call = IBrandedToken::rejectStakeRequestCall {
			stakeRequestHash: stake_request_hash,
		};
		Ok(self.write_tx(from, call.abi_encode(), tx_options))
	}

	/// Submits a `rejectStakeRequest` call.
	pub async fn reject_stake_request(
		&self,
		stake_request_hash: &str,
		tx_options: &TransactionOptions,
	) -> Result<TransactionReceipt, ClientError> {
		let tx = self.reject_stake_request_raw(stake_request_hash, tx_options)?;
		Ok(self.delivery.deliver_and_confirm(tx).await?)
	}

	/// Builds the `liftRestriction` descriptor for a non-empty list of
	/// holders.
	pub fn lift_restriction_raw(
		&self,
		addresses: &[String],
		tx_options: &TransactionOptions,
	) -> Result<Transaction, ClientError> {
		let from = validation::parse_address("from", &tx_options.from)?;
		if addresses.is_empty() {
			return Err(ValidationError::EmptyList("address_list".to_string()).into());
		}
		let restriction_holders = addresses
			.iter()
			.map(|a| validation::parse_address("address_list", a))
			.collect::<Result<Vec<_>, _>>()?;

		let call = IBrandedToken::liftRestrictionCall {
			restrictionHolders: restriction_holders,
		};
		Ok(self.write_tx(from, call.abi_encode(), tx_options))
	}

	/// Submits a `liftRestriction` call.
	pub async fn lift_restriction(
		&self,
		addresses: &[String],
		tx_options: &TransactionOptions,
	) -> Result<TransactionReceipt, ClientError> {
		let tx = self.lift_restriction_raw(addresses, tx_options)?;
		Ok(self.delivery.deliver_and_confirm(tx).await?)
	}

	/// Whether an actor has been lifted from the transfer restriction
	/// list.
	pub async fn is_unrestricted(&self, address: &str) -> Result<bool, ClientError> {
		let actor = validation::parse_address("address", address)?;
		let ret = self.read(IBrandedToken::isUnrestrictedCall { actor }).await?;
		Ok(ret._0)
	}

	/// Builds the `redeem` descriptor.
	pub fn redeem_raw(
		&self,
		amount: U256,
		tx_options: &TransactionOptions,
	) -> Result<Transaction, ClientError> {
		let from = validation::parse_address("from", &tx_options.from)?;
		validation::require_nonzero("amount", amount)?;

		let call = IBrandedToken::redeemCall {
			brandedTokens: amount,
		};
		Ok(self.write_tx(from, call.abi_encode(), tx_options))
	}

	/// Submits a `redeem` call.
	pub async fn redeem(
		&self,
		amount: U256,
		tx_options: &TransactionOptions,
	) -> Result<TransactionReceipt, ClientError> {
		let tx = self.redeem_raw(amount, tx_options)?;
		Ok(self.delivery.deliver_and_confirm(tx).await?)
	}

	/// Hash of the staker's open stake request, or the zero hash.
	pub async fn stake_request_hash(&self, staker: &str) -> Result<B256, ClientError> {
		let staker = validation::parse_address("staker", staker)?;
		let ret = self
			.read(IBrandedToken::stakeRequestHashesCall { staker })
			.await?;
		Ok(ret._0)
	}

	/// Fetches the stake request recorded under a hash.
	pub async fn stake_request(
		&self,
		stake_request_hash: &str,
	) -> Result<StakeRequest, ClientError> {
		let stake_request_hash = validation::parse_hash32("stake_request_hash", stake_request_hash)?;
		let ret = self
			.read(IBrandedToken::stakeRequestsCall { stakeRequestHash: stake_request_hash })
			.await?;
		Ok(StakeRequest {
			staker: ret.staker,
			stake: ret.stake,
			nonce: ret.nonce,
		})
	}

	async fn read<C: SolCall + Send>(&self, call: C) -> Result<C::Return, ClientError> {
		read_contract(&self.delivery, self.chain_id, &self.address, call).await
	}

	fn write_tx(&self, from: Address, data: Vec<u8>, tx_options: &TransactionOptions) -> Transaction {
		Transaction {
			chain_id: self.chain_id,
			from: Some(from),
			to: Some(self.address),
			data,
			value: U256::ZERO,
			gas_limit: tx_options.gas,
			gas_price: tx_options.gas_price,
			nonce: tx_options.nonce,
		}
	}
}
