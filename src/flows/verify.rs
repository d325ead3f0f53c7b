//! ID token header inspection and signature verification.

// crates.io
use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
// self
use crate::{
	_prelude::*,
	auth::IdentityClaims,
	config::{HookConfig, TokenChecks},
	error::TokenError,
	flows::SigningKey,
};

/// Key lookup data read from the unverified token header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyReference {
	/// `kid` header value.
	pub key_id: String,
	/// `alg` header value, already checked against the allow list.
	pub algorithm: Algorithm,
}

/// Reads `kid` and `alg` from the token header without trusting anything else in the token.
pub fn read_key_reference(token: &str, checks: &TokenChecks) -> Result<KeyReference> {
	let header = jsonwebtoken::decode_header(token).map_err(TokenError::Header)?;

	if !checks.allowed_algorithms.contains(&header.alg) {
		return Err(Error::DisallowedAlgorithm { alg: header.alg });
	}

	let key_id = header.kid.filter(|kid| !kid.is_empty()).ok_or(TokenError::MissingKeyId)?;

	Ok(KeyReference { key_id, algorithm: header.alg })
}

/// Verifies the signature with `key` and decodes the identity claims.
///
/// Claims are only returned once the signature and the registered-claim checks pass.
pub fn verify_id_token(
	token: &str,
	key: &SigningKey,
	config: &HookConfig,
) -> Result<IdentityClaims> {
	let validation = validation_for(key.algorithm, config);
	let data = jsonwebtoken::decode::<IdentityClaims>(token, key.decoding_key(), &validation)
		.map_err(map_decode_error)?;

	Ok(data.claims)
}

fn validation_for(alg: Algorithm, config: &HookConfig) -> Validation {
	let checks = &config.checks;
	let mut validation = Validation::new(alg);
	let mut required = vec!["exp"];

	validation.leeway = checks.leeway_secs;
	validation.validate_exp = true;

	if checks.validate_issuer {
		validation.set_issuer(&[config.endpoints.issuer.as_str()]);
		required.push("iss");
	}
	if checks.validate_audience {
		validation.set_audience(&[config.client_id.as_str()]);
		required.push("aud");
	} else {
		validation.validate_aud = false;
	}

	validation.set_required_spec_claims(&required);

	validation
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> Error {
	match err.kind() {
		ErrorKind::InvalidSignature
		| ErrorKind::InvalidAlgorithm
		| ErrorKind::InvalidEcdsaKey
		| ErrorKind::InvalidRsaKey(_)
		| ErrorKind::InvalidKeyFormat
		| ErrorKind::Crypto(_) => Error::Signature { source: err },
		ErrorKind::ExpiredSignature
		| ErrorKind::ImmatureSignature
		| ErrorKind::InvalidIssuer
		| ErrorKind::InvalidAudience
		| ErrorKind::InvalidSubject
		| ErrorKind::MissingRequiredClaim(_) => Error::ClaimRejected { source: err },
		_ => TokenError::Claims(err).into(),
	}
}
