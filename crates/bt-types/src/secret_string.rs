//! Zeroizing wrapper for sensitive strings.
//!
//! Used for the signing key loaded from configuration. The value is zeroed
//! on drop and redacted in Debug, Display, and serialized output.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// A string whose contents are wiped on drop and never printed.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	/// Wraps an owned string.
	pub fn new(value: String) -> Self {
		Self(Zeroizing::new(value))
	}

	/// Hands the secret to a closure, limiting the scope of exposure.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&str) -> R,
	{
		f(&self.0)
	}

	/// Returns true when no key material is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString(<redacted>)")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<redacted>")
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str("<redacted>")
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer).map(SecretString::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_secret_is_redacted_in_output() {
		let secret = SecretString::from("0xdeadbeef");
		assert!(!format!("{:?}", secret).contains("deadbeef"));
		assert!(!format!("{}", secret).contains("deadbeef"));
	}

	#[test]
	fn test_with_exposed_yields_the_value() {
		let secret = SecretString::from("key-material");
		let length = secret.with_exposed(|s| {
			assert_eq!(s, "key-material");
			s.len()
		});
		assert_eq!(length, 12);
	}
}
