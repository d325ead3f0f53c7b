//! Verifier configuration: tenant endpoints, client credentials, and token checks.
//!
//! The host builds one [`HookConfig`] and hands it to [`crate::flows::Verifier`]; nothing in the
//! verifier reads process state. [`HookConfig::from_env`] exists for hosts that keep the
//! `AUTH0_*` variable convention.

// crates.io
use jsonwebtoken::Algorithm;
// self
use crate::{
	_prelude::*,
	auth::Secret,
	error::ConfigError,
	provider::ProviderEndpoints,
};

/// Environment variable naming the tenant subdomain.
pub const ENV_SUBDOMAIN: &str = "AUTH0_SUBDOMAIN";
/// Environment variable naming the OAuth client identifier.
pub const ENV_CLIENT_ID: &str = "AUTH0_CLIENT_ID";
/// Environment variable naming the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "AUTH0_CLIENT_SECRET";

/// Immutable configuration consumed by the verifier.
#[derive(Clone, Debug)]
pub struct HookConfig {
	/// Provider endpoints and expected issuer.
	pub endpoints: ProviderEndpoints,
	/// OAuth 2.0 client identifier; also the expected ID token audience.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Scope requested with the grant.
	pub scope: String,
	/// Checks applied to the ID token.
	pub checks: TokenChecks,
}
impl HookConfig {
	/// Starts a builder for the hosted tenant `tenant` (`<tenant>.auth0.com`).
	pub fn builder(
		tenant: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
	) -> HookConfigBuilder {
		HookConfigBuilder::new(tenant, client_id, client_secret)
	}

	/// Reads `AUTH0_SUBDOMAIN`, `AUTH0_CLIENT_ID`, and `AUTH0_CLIENT_SECRET` from the process
	/// environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Like [`from_env`](Self::from_env) but reads values through `lookup`.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let read = |key| {
			lookup(key)
				.filter(|value| !value.trim().is_empty())
				.ok_or(ConfigError::MissingValue { key })
		};

		Self::builder(read(ENV_SUBDOMAIN)?, read(ENV_CLIENT_ID)?, read(ENV_CLIENT_SECRET)?).build()
	}
}

/// ID token checks layered on top of signature verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenChecks {
	/// Algorithms accepted in the token header.
	pub allowed_algorithms: Vec<Algorithm>,
	/// Require `iss` to equal the configured issuer.
	pub validate_issuer: bool,
	/// Require `aud` to contain the client identifier.
	pub validate_audience: bool,
	/// Clock skew tolerated for `exp`/`nbf`, in seconds.
	pub leeway_secs: u64,
}
impl Default for TokenChecks {
	fn default() -> Self {
		Self {
			allowed_algorithms: vec![Algorithm::RS256],
			validate_issuer: true,
			validate_audience: true,
			leeway_secs: 60,
		}
	}
}

/// Builder for [`HookConfig`] values.
#[derive(Debug)]
pub struct HookConfigBuilder {
	tenant: String,
	client_id: String,
	client_secret: Secret,
	token_endpoint: Option<Url>,
	key_set_endpoint: Option<Url>,
	issuer: Option<Url>,
	scope: String,
	checks: TokenChecks,
}
impl HookConfigBuilder {
	const DEFAULT_SCOPE: &'static str = "openid";

	/// Creates a new builder for the tenant and client pair.
	pub fn new(
		tenant: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
	) -> Self {
		Self {
			tenant: tenant.into(),
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			token_endpoint: None,
			key_set_endpoint: None,
			issuer: None,
			scope: Self::DEFAULT_SCOPE.into(),
			checks: TokenChecks::default(),
		}
	}

	/// Overrides the derived token endpoint (custom domains, proxies, tests).
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Overrides the derived key set endpoint.
	pub fn key_set_endpoint(mut self, url: Url) -> Self {
		self.key_set_endpoint = Some(url);

		self
	}

	/// Overrides the derived issuer.
	pub fn issuer(mut self, url: Url) -> Self {
		self.issuer = Some(url);

		self
	}

	/// Overrides the requested scope (defaults to `openid`).
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Replaces the accepted signature algorithms (defaults to `RS256`).
	pub fn allowed_algorithms<I>(mut self, algorithms: I) -> Self
	where
		I: IntoIterator<Item = Algorithm>,
	{
		self.checks.allowed_algorithms = algorithms.into_iter().collect();

		self
	}

	/// Toggles the `iss` check.
	pub fn validate_issuer(mut self, enabled: bool) -> Self {
		self.checks.validate_issuer = enabled;

		self
	}

	/// Toggles the `aud` check.
	pub fn validate_audience(mut self, enabled: bool) -> Self {
		self.checks.validate_audience = enabled;

		self
	}

	/// Overrides the clock leeway.
	pub fn leeway_secs(mut self, secs: u64) -> Self {
		self.checks.leeway_secs = secs;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<HookConfig, ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId);
		}
		if self.checks.allowed_algorithms.is_empty() {
			return Err(ConfigError::NoAllowedAlgorithms);
		}

		let mut endpoints = ProviderEndpoints::for_tenant(&self.tenant)?;

		if let Some(token) = self.token_endpoint {
			endpoints.token = token;
		}
		if let Some(key_set) = self.key_set_endpoint {
			endpoints.key_set = key_set;
		}
		if let Some(issuer) = self.issuer {
			endpoints.issuer = issuer;
		}

		endpoints.validate()?;

		Ok(HookConfig {
			endpoints,
			client_id: self.client_id,
			client_secret: self.client_secret,
			scope: self.scope,
			checks: self.checks,
		})
	}
}
