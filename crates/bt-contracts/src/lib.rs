//! Contract bindings and artifact registry for the branded-token SDK.
//!
//! This crate owns everything contract-shaped: `sol!` ABI bindings for the
//! BrandedToken and GatewayComposer contracts (plus the ERC-20 value token),
//! and a registry that resolves contract names to deployable bytecode loaded
//! from compiler artifacts.

/// `sol!` interface definitions and constructor-argument encoding.
pub mod abi;
/// Named contract artifacts with deployable bytecode.
pub mod registry;

pub use registry::{
	ContractArtifact, ContractRegistry, ContractsError, BRANDED_TOKEN, GATEWAY_COMPOSER,
};
