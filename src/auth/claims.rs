//! Identity claims decoded from a verified ID token.

// self
use crate::{_prelude::*, error::TokenError};

/// Claims read from the ID token after its signature has been verified.
///
/// Registered claims (`exp`, `iss`, `aud`, ...) are checked by the verifier and left in
/// [`extra`](Self::extra).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
	/// Full display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Email address.
	#[serde(default)]
	pub email: Option<String>,
	/// Subject identifier at the provider.
	#[serde(default)]
	pub sub: Option<String>,
	/// Every other claim, untouched.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl IdentityClaims {
	/// Returns the `name` claim or [`TokenError::MissingClaim`].
	pub fn require_name(&self) -> Result<&str, TokenError> {
		self.name.as_deref().ok_or(TokenError::MissingClaim { claim: "name" })
	}

	/// Returns the `email` claim or [`TokenError::MissingClaim`].
	pub fn require_email(&self) -> Result<&str, TokenError> {
		self.email.as_deref().ok_or(TokenError::MissingClaim { claim: "email" })
	}
}

/// Display name split into the two fields the migration record expects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FullName {
	/// First whitespace-separated token.
	pub first: String,
	/// Remaining tokens joined by a single space; empty for mononyms.
	pub last: String,
}
impl FullName {
	/// Splits `name` on whitespace.
	pub fn split(name: &str) -> Self {
		let mut parts = name.split_whitespace();
		let first = parts.next().unwrap_or_default().to_owned();
		let last = parts.collect::<Vec<_>>().join(" ");

		Self { first, last }
	}
}
