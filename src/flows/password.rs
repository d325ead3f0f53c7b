//! Resource Owner Password Credentials grant against the token endpoint.
//!
//! The grant body is JSON (`grant_type`, `username`, `password`, `scope`, `client_id`,
//! `client_secret`, plus whatever the provider strategy adds). Error responses are classified
//! through [`ProviderStrategy::classify_token_error`].

// self
use crate::{
	_prelude::*,
	auth::{Credential, Secret},
	error::{TokenError, TransientError},
	flows::Verifier,
	http::ProviderHttpClient,
	oauth::{self, ProviderResponse, TransportErrorMapper},
	provider::{Endpoint, ProviderErrorContext, ProviderErrorKind, ProviderStrategy},
};

/// Grant type sent in the request body.
pub const PASSWORD_GRANT_TYPE: &str = "password";

/// Successful token endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub struct GrantResponse {
	/// Signed ID token; absent when the provider did not honor the `openid` scope.
	#[serde(default)]
	pub id_token: Option<Secret>,
	/// Access token, unused by the hook.
	#[serde(default)]
	pub access_token: Option<Secret>,
	/// Token type reported by the provider.
	#[serde(default)]
	pub token_type: Option<String>,
	/// Access token lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<u64>,
	/// Granted scope string.
	#[serde(default)]
	pub scope: Option<String>,
}
impl GrantResponse {
	/// Returns the ID token or [`TokenError::MissingIdToken`].
	pub fn id_token(&self) -> Result<&str, TokenError> {
		self.id_token
			.as_ref()
			.map(Secret::expose)
			.filter(|token| !token.is_empty())
			.ok_or(TokenError::MissingIdToken)
	}
}

#[derive(Debug, Default, Deserialize)]
struct OAuthErrorBody {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_description: Option<String>,
}

impl<C, M> Verifier<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges the credential for tokens with a single password grant request.
	pub async fn request_password_grant(&self, credential: &Credential) -> Result<GrantResponse> {
		let body = self.grant_body(credential);
		let request = oauth::json_post(&self.config.endpoints.token, &body)?;
		let response = oauth::dispatch(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			Endpoint::Token,
			request,
		)
		.await?;

		if !response.is_success() {
			return Err(map_grant_error(self.strategy.as_ref(), &response));
		}

		response.json()
	}

	fn grant_body(&self, credential: &Credential) -> BTreeMap<String, String> {
		let mut body = BTreeMap::new();

		body.insert("grant_type".into(), PASSWORD_GRANT_TYPE.into());
		body.insert("username".into(), credential.identifier.clone());
		body.insert("password".into(), credential.secret.expose().to_owned());
		body.insert("scope".into(), self.config.scope.clone());
		body.insert("client_id".into(), self.config.client_id.clone());
		body.insert("client_secret".into(), self.config.client_secret.expose().to_owned());

		self.strategy.augment_grant_request(&mut body);

		body
	}
}

fn map_grant_error(strategy: &dyn ProviderStrategy, response: &ProviderResponse) -> Error {
	let status = response.status();
	let mut ctx = ProviderErrorContext::new().with_http_status(status);
	let parsed = serde_json::from_slice::<OAuthErrorBody>(response.body()).ok();

	match &parsed {
		Some(OAuthErrorBody { error, error_description }) => {
			if let Some(error) = error {
				ctx = ctx.with_oauth_error(error.clone());
			}
			if let Some(description) = error_description {
				ctx = ctx.with_error_description(description.clone());
			}
		},
		None => ctx = ctx.with_body_preview(String::from_utf8_lossy(response.body())),
	}

	let message = match parsed.unwrap_or_default() {
		OAuthErrorBody { error_description: Some(description), .. } => description,
		OAuthErrorBody { error: Some(code), .. } => code,
		_ => format!("HTTP {status}"),
	};

	match strategy.classify_token_error(&ctx) {
		ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason: message },
		ProviderErrorKind::InvalidClient => Error::InvalidClient { reason: message },
		ProviderErrorKind::Transient => TransientError::UnexpectedResponse {
			endpoint: Endpoint::Token,
			message,
			status: Some(status),
			retry_after: response.retry_after(),
		}
		.into(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn id_token_must_be_present_and_non_empty() {
		let body = r#"{"access_token":"at","token_type":"Bearer","expires_in":86400}"#;
		let grant: GrantResponse =
			serde_json::from_str(body).expect("Grant response should deserialize.");

		assert!(matches!(grant.id_token(), Err(TokenError::MissingIdToken)));

		let grant: GrantResponse =
			serde_json::from_str(r#"{"id_token":""}"#).expect("Grant response should deserialize.");

		assert!(matches!(grant.id_token(), Err(TokenError::MissingIdToken)));

		let grant: GrantResponse = serde_json::from_str(r#"{"id_token":"a.b.c"}"#)
			.expect("Grant response should deserialize.");

		assert_eq!(grant.id_token().ok(), Some("a.b.c"));
		assert!(!format!("{grant:?}").contains("a.b.c"));
	}
}
