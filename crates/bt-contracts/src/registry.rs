//! Contract artifact registry.
//!
//! Resolves contract names to deployable bytecode. ABIs are compiled into
//! the SDK through the `sol!` bindings, so the registry only has to carry
//! binary payloads for the deployable contracts. Bytecode is loaded from a
//! directory of compiler artifacts: either raw `<Name>.bin` hex files (solc
//! `--bin` output) or truffle-style `<Name>.json` files with a `bytecode`
//! field.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Registry name of the BrandedToken contract.
pub const BRANDED_TOKEN: &str = "BrandedToken";
/// Registry name of the GatewayComposer contract.
pub const GATEWAY_COMPOSER: &str = "GatewayComposer";

/// Errors that can occur while resolving contract artifacts.
#[derive(Debug, Error)]
pub enum ContractsError {
	/// The named contract is not known to the registry.
	#[error("Unknown contract: {0}")]
	UnknownContract(String),
	/// The contract is known but no bytecode has been loaded for it.
	#[error("No bytecode loaded for contract: {0}")]
	MissingBytecode(String),
	/// An artifact file exists but its contents cannot be used.
	#[error("Malformed artifact for {name}: {message}")]
	MalformedArtifact { name: String, message: String },
	/// Error reading an artifact file.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// A named contract artifact, with deployable bytecode when available.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
	/// Contract name, as used by artifact files and lookups.
	pub name: String,
	/// Deployment bytecode, absent for contracts that are only called.
	pub bytecode: Option<Vec<u8>>,
}

/// Registry of contract artifacts keyed by name.
///
/// A fresh registry knows the two SDK contracts with no bytecode; lookups
/// succeed immediately while deployment requires loading artifacts first.
#[derive(Debug, Clone)]
pub struct ContractRegistry {
	artifacts: HashMap<String, ContractArtifact>,
}

impl Default for ContractRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl ContractRegistry {
	/// Creates a registry pre-populated with the SDK's contract names.
	pub fn new() -> Self {
		let mut artifacts = HashMap::new();
		for name in [BRANDED_TOKEN, GATEWAY_COMPOSER] {
			artifacts.insert(
				name.to_string(),
				ContractArtifact {
					name: name.to_string(),
					bytecode: None,
				},
			);
		}
		Self { artifacts }
	}

	/// Creates a registry and loads artifacts from a directory.
	pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ContractsError> {
		let mut registry = Self::new();
		registry.load_dir(dir)?;
		Ok(registry)
	}

	/// Loads every `.bin` and `.json` artifact in a directory.
	///
	/// The file stem names the contract. Files with other extensions are
	/// ignored.
	pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<(), ContractsError> {
		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();
			let (Some(stem), Some(extension)) = (
				path.file_stem().and_then(|s| s.to_str()),
				path.extension().and_then(|s| s.to_str()),
			) else {
				continue;
			};
			let name = stem.to_string();
			let bytecode = match extension {
				"bin" => {
					let contents = std::fs::read_to_string(&path)?;
					Some(decode_bytecode(&name, contents.trim())?)
				}
				"json" => {
					let contents = std::fs::read_to_string(&path)?;
					Some(parse_json_artifact(&name, &contents)?)
				}
				_ => None,
			};
			if let Some(bytecode) = bytecode {
				self.register(ContractArtifact {
					name,
					bytecode: Some(bytecode),
				});
			}
		}
		Ok(())
	}

	/// Registers (or replaces) an artifact.
	pub fn register(&mut self, artifact: ContractArtifact) {
		self.artifacts.insert(artifact.name.clone(), artifact);
	}

	/// Looks up an artifact by name.
	pub fn get(&self, name: &str) -> Option<&ContractArtifact> {
		self.artifacts.get(name)
	}

	/// Looks up an artifact, failing when the name is unknown.
	pub fn require(&self, name: &str) -> Result<&ContractArtifact, ContractsError> {
		self.artifacts
			.get(name)
			.ok_or_else(|| ContractsError::UnknownContract(name.to_string()))
	}

	/// Returns the deployable bytecode for a contract.
	pub fn bytecode(&self, name: &str) -> Result<Vec<u8>, ContractsError> {
		self.require(name)?
			.bytecode
			.clone()
			.ok_or_else(|| ContractsError::MissingBytecode(name.to_string()))
	}
}

fn decode_bytecode(name: &str, hex_str: &str) -> Result<Vec<u8>, ContractsError> {
	let stripped = hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str);
	hex::decode(stripped).map_err(|e| ContractsError::MalformedArtifact {
		name: name.to_string(),
		message: format!("invalid bytecode hex: {}", e),
	})
}

fn parse_json_artifact(name: &str, contents: &str) -> Result<Vec<u8>, ContractsError> {
	let value: serde_json::Value =
		serde_json::from_str(contents).map_err(|e| ContractsError::MalformedArtifact {
			name: name.to_string(),
			message: format!("invalid JSON: {}", e),
		})?;
	let bytecode = value
		.get("bytecode")
		.and_then(|b| b.as_str())
		.ok_or_else(|| ContractsError::MalformedArtifact {
			name: name.to_string(),
			message: "missing 'bytecode' field".to_string(),
		})?;
	decode_bytecode(name, bytecode)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_new_registry_knows_sdk_contracts() {
		let registry = ContractRegistry::new();
		assert!(registry.require(BRANDED_TOKEN).is_ok());
		assert!(registry.require(GATEWAY_COMPOSER).is_ok());
		assert!(matches!(
			registry.require("Anchor"),
			Err(ContractsError::UnknownContract(_))
		));
	}

	#[test]
	fn test_bytecode_requires_loaded_artifact() {
		let registry = ContractRegistry::new();
		assert!(matches!(
			registry.bytecode(BRANDED_TOKEN),
			Err(ContractsError::MissingBytecode(_))
		));
	}

	#[test]
	fn test_load_bin_artifact() {
		let dir = tempfile::tempdir().unwrap();
		let mut file = std::fs::File::create(dir.path().join("BrandedToken.bin")).unwrap();
		writeln!(file, "0x6080604052").unwrap();

		let registry = ContractRegistry::from_dir(dir.path()).unwrap();
		assert_eq!(
			registry.bytecode(BRANDED_TOKEN).unwrap(),
			vec![0x60, 0x80, 0x60, 0x40, 0x52]
		);
	}

	#[test]
	fn test_load_json_artifact() {
		let dir = tempfile::tempdir().unwrap();
		let mut file = std::fs::File::create(dir.path().join("GatewayComposer.json")).unwrap();
		write!(
			file,
			r#"{{"contractName": "GatewayComposer", "bytecode": "0x60806040"}}"#
		)
		.unwrap();

		let registry = ContractRegistry::from_dir(dir.path()).unwrap();
		assert_eq!(
			registry.bytecode(GATEWAY_COMPOSER).unwrap(),
			vec![0x60, 0x80, 0x60, 0x40]
		);
	}

	#[test]
	fn test_malformed_bin_artifact_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let mut file = std::fs::File::create(dir.path().join("BrandedToken.bin")).unwrap();
		writeln!(file, "not-hex").unwrap();

		assert!(matches!(
			ContractRegistry::from_dir(dir.path()),
			Err(ContractsError::MalformedArtifact { .. })
		));
	}
}
