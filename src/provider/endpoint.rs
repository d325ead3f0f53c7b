//! Endpoint labels and tenant-derived URLs.

// self
use crate::{_prelude::*, error::ConfigError};

/// Provider endpoints contacted during one authentication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
	/// OAuth 2.0 token endpoint serving the password grant.
	Token,
	/// JWK Set endpoint publishing the current signing keys.
	KeySet,
}
impl Endpoint {
	/// Returns a stable label suitable for messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Token => "token",
			Endpoint::KeySet => "key set",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Endpoint set used by the verifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Token endpoint receiving the password grant.
	pub token: Url,
	/// JWK Set endpoint.
	pub key_set: Url,
	/// Expected `iss` claim of issued ID tokens.
	pub issuer: Url,
}
impl ProviderEndpoints {
	/// Derives the hosted-tenant endpoints for `tenant` (`https://<tenant>.auth0.com/...`).
	pub fn for_tenant(tenant: &str) -> Result<Self, ConfigError> {
		validate_tenant(tenant)?;

		let issuer = parse_url("issuer", &format!("https://{tenant}.auth0.com/"))?;
		let token = join(&issuer, "token", "oauth/token")?;
		let key_set = join(&issuer, "key set", ".well-known/jwks.json")?;

		Ok(Self { token, key_set, issuer })
	}

	/// Ensures every endpoint uses HTTPS.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("token", &self.token)?;
		validate_endpoint("key set", &self.key_set)?;
		validate_endpoint("issuer", &self.issuer)?;

		Ok(())
	}
}

fn parse_url(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { endpoint, source })
}

fn join(base: &Url, endpoint: &'static str, path: &str) -> Result<Url, ConfigError> {
	base.join(path).map_err(|source| ConfigError::InvalidUrl { endpoint, source })
}

fn validate_tenant(tenant: &str) -> Result<(), ConfigError> {
	let valid = !tenant.is_empty()
		&& !tenant.starts_with(['.', '-'])
		&& !tenant.ends_with(['.', '-'])
		&& tenant.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '.');

	if valid { Ok(()) } else { Err(ConfigError::InvalidTenant { tenant: tenant.to_owned() }) }
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() != "https" {
		Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn derives_hosted_tenant_urls() {
		let endpoints =
			ProviderEndpoints::for_tenant("acme").expect("Tenant endpoints should derive.");

		assert_eq!(endpoints.token.as_str(), "https://acme.auth0.com/oauth/token");
		assert_eq!(endpoints.key_set.as_str(), "https://acme.auth0.com/.well-known/jwks.json");
		assert_eq!(endpoints.issuer.as_str(), "https://acme.auth0.com/");
		assert!(endpoints.validate().is_ok());
	}

	#[test]
	fn regional_tenants_keep_their_suffix() {
		let endpoints =
			ProviderEndpoints::for_tenant("acme.eu").expect("Regional tenant should derive.");

		assert_eq!(endpoints.token.as_str(), "https://acme.eu.auth0.com/oauth/token");
	}

	#[test]
	fn rejects_tenants_that_escape_the_host() {
		for tenant in ["", "acme/evil", "acme.com?x=", "-acme", "acme.", "a b"] {
			let err = ProviderEndpoints::for_tenant(tenant)
				.expect_err("Tenant with unsafe characters should be rejected.");

			assert!(matches!(err, ConfigError::InvalidTenant { .. }), "{tenant:?}");
		}
	}

	#[test]
	fn rejects_plain_http() {
		let mut endpoints =
			ProviderEndpoints::for_tenant("acme").expect("Tenant endpoints should derive.");

		endpoints.key_set =
			Url::parse("http://acme.auth0.com/.well-known/jwks.json").expect("URL should parse.");

		assert!(matches!(
			endpoints.validate(),
			Err(ConfigError::InsecureEndpoint { endpoint: "key set", .. })
		));
	}
}
