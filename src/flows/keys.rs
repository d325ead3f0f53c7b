//! Signing key resolution from the provider's published JWK Set.
//!
//! Keys rotate on the provider side, so nothing is cached: each verification fetches the set
//! once and selects the entry whose `kid` matches the token header. Entries stay raw JSON until
//! selected, so a sibling key in a form the hook cannot read never blocks the one it needs.

// crates.io
use jsonwebtoken::{
	Algorithm, DecodingKey,
	jwk::{Jwk, KeyAlgorithm, PublicKeyUse},
};
// self
use crate::{
	_prelude::*,
	error::KeyError,
	flows::Verifier,
	http::ProviderHttpClient,
	oauth::{self, TransportErrorMapper},
	provider::Endpoint,
};

/// Key set document as published; each entry is decoded only once it is selected.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PublishedKeySet {
	/// Raw JWK entries.
	#[serde(default)]
	pub keys: Vec<serde_json::Value>,
}
impl PublishedKeySet {
	/// Decodes the first entry whose `kid` equals `kid`.
	pub fn find(&self, kid: &str) -> Result<Jwk, KeyError> {
		let entry = self
			.keys
			.iter()
			.find(|entry| entry.get("kid").and_then(serde_json::Value::as_str) == Some(kid))
			.ok_or_else(|| KeyError::NotFound { kid: kid.to_owned() })?;

		Jwk::deserialize(entry)
			.map_err(|source| KeyError::Unsupported { kid: kid.to_owned(), source })
	}
}

/// Public key selected for one verification.
#[derive(Clone)]
pub struct SigningKey {
	/// Key identifier shared by the token header and the published key.
	pub key_id: String,
	/// Algorithm the key will verify.
	pub algorithm: Algorithm,
	key: DecodingKey,
}
impl SigningKey {
	/// Returns the verification key material.
	pub fn decoding_key(&self) -> &DecodingKey {
		&self.key
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningKey")
			.field("key_id", &self.key_id)
			.field("algorithm", &self.algorithm)
			.finish_non_exhaustive()
	}
}

impl<C, M> Verifier<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches the current key set.
	pub async fn fetch_key_set(&self) -> Result<PublishedKeySet> {
		let request = oauth::json_get(&self.config.endpoints.key_set)?;
		let response = oauth::dispatch(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			Endpoint::KeySet,
			request,
		)
		.await?;

		if !response.is_success() {
			return Err(KeyError::KeySetStatus { status: response.status() }.into());
		}

		response.json()
	}

	/// Fetches the key set and selects the key for `kid`/`alg`.
	pub async fn resolve_signing_key(&self, kid: &str, alg: Algorithm) -> Result<SigningKey> {
		let key_set = self.fetch_key_set().await?;

		select_signing_key(&key_set, kid, alg).map_err(Error::from)
	}
}

/// Selects and decodes the published key named `kid`, checking it may verify `alg` signatures.
pub fn select_signing_key(
	key_set: &PublishedKeySet,
	kid: &str,
	alg: Algorithm,
) -> Result<SigningKey, KeyError> {
	let jwk = key_set.find(kid)?;

	ensure_usable_for(&jwk, kid, alg)?;

	let key = DecodingKey::from_jwk(&jwk)
		.map_err(|source| KeyError::Unusable { kid: kid.to_owned(), source })?;

	Ok(SigningKey { key_id: kid.to_owned(), algorithm: alg, key })
}

fn ensure_usable_for(jwk: &Jwk, kid: &str, alg: Algorithm) -> Result<(), KeyError> {
	if let Some(key_use) = &jwk.common.public_key_use
		&& !matches!(key_use, PublicKeyUse::Signature)
	{
		return Err(KeyError::NotForSignature { kid: kid.to_owned() });
	}
	if let Some(declared) = &jwk.common.key_algorithm
		&& Some(declared) != key_algorithm(alg).as_ref()
	{
		return Err(KeyError::AlgorithmMismatch { kid: kid.to_owned(), alg });
	}

	Ok(())
}

#[allow(unreachable_patterns)]
fn key_algorithm(alg: Algorithm) -> Option<KeyAlgorithm> {
	Some(match alg {
		Algorithm::HS256 => KeyAlgorithm::HS256,
		Algorithm::HS384 => KeyAlgorithm::HS384,
		Algorithm::HS512 => KeyAlgorithm::HS512,
		Algorithm::ES256 => KeyAlgorithm::ES256,
		Algorithm::ES384 => KeyAlgorithm::ES384,
		Algorithm::RS256 => KeyAlgorithm::RS256,
		Algorithm::RS384 => KeyAlgorithm::RS384,
		Algorithm::RS512 => KeyAlgorithm::RS512,
		Algorithm::PS256 => KeyAlgorithm::PS256,
		Algorithm::PS384 => KeyAlgorithm::PS384,
		Algorithm::PS512 => KeyAlgorithm::PS512,
		Algorithm::EdDSA => KeyAlgorithm::EdDSA,
		_ => return None,
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	// RFC 8037 appendix A.2 Ed25519 public key.
	const ED25519_X: &str = "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo";

	fn key_set(entries: serde_json::Value) -> PublishedKeySet {
		serde_json::from_value(serde_json::json!({ "keys": entries }))
			.expect("Key set fixture should deserialize.")
	}

	fn okp(kid: &str) -> serde_json::Value {
		serde_json::json!({ "kty": "OKP", "crv": "Ed25519", "x": ED25519_X, "kid": kid })
	}

	#[test]
	fn selects_the_key_named_by_kid() {
		let set = key_set(serde_json::json!([okp("old"), okp("current")]));
		let key = select_signing_key(&set, "current", Algorithm::EdDSA)
			.expect("Published key should be selected.");

		assert_eq!(key.key_id, "current");
		assert_eq!(key.algorithm, Algorithm::EdDSA);
	}

	#[test]
	fn unknown_kid_is_not_found() {
		let set = key_set(serde_json::json!([okp("current")]));
		let err = select_signing_key(&set, "rotated-out", Algorithm::EdDSA)
			.expect_err("Unknown kid should fail.");

		assert!(matches!(err, KeyError::NotFound { kid } if kid == "rotated-out"));
	}

	#[test]
	fn declared_algorithm_and_use_must_match() {
		let mut with_alg = okp("k1");

		with_alg["alg"] = "RS256".into();

		let set = key_set(serde_json::json!([with_alg]));

		assert!(matches!(
			select_signing_key(&set, "k1", Algorithm::EdDSA),
			Err(KeyError::AlgorithmMismatch { .. })
		));

		let mut for_encryption = okp("k2");

		for_encryption["use"] = "enc".into();

		let set = key_set(serde_json::json!([for_encryption]));

		assert!(matches!(
			select_signing_key(&set, "k2", Algorithm::EdDSA),
			Err(KeyError::NotForSignature { .. })
		));
	}

	#[test]
	fn unreadable_siblings_do_not_block_selection() {
		let set = key_set(serde_json::json!([
			{ "kty": "EC", "crv": "P-521", "kid": "legacy", "alg": "ES512", "x": "AA", "y": "AA" },
			{ "kty": "AKP", "kid": "pq", "alg": "ML-DSA-65", "pub": "AA" },
			okp("current"),
		]));
		let key = select_signing_key(&set, "current", Algorithm::EdDSA)
			.expect("Readable key should be selected next to unreadable siblings.");

		assert_eq!(key.key_id, "current");
		assert!(matches!(
			select_signing_key(&set, "legacy", Algorithm::EdDSA),
			Err(KeyError::Unsupported { kid, .. }) if kid == "legacy"
		));
	}
}
