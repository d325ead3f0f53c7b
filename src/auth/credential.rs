//! Per-invocation credential supplied by the authentication pipeline.

// self
use crate::{_prelude::*, auth::Secret};

/// Username/password pair taken from the invocation context.
///
/// Deserializes from the context's `user_identifier` and `password` fields; any other context
/// fields are ignored. No format validation happens here: the provider is the judge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Login identifier (username or email) as typed by the user.
	#[serde(rename = "user_identifier")]
	pub identifier: String,
	/// Password as typed by the user.
	#[serde(rename = "password")]
	pub secret: Secret,
}
impl Credential {
	/// Creates a credential from raw parts.
	pub fn new(identifier: impl Into<String>, secret: impl Into<Secret>) -> Self {
		Self { identifier: identifier.into(), secret: secret.into() }
	}
}
