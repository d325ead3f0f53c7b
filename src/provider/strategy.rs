//! Provider strategy hooks that customize the password grant.
//!
//! Implementations decorate the outgoing grant body and normalize token endpoint error mapping
//! without tying the verifier to any particular HTTP client.

// self
use crate::_prelude::*;

/// Strategy hook that allows providers to decorate requests and classify errors.
///
/// Implementors are required to be `Send + Sync`, and the hooks use crate-owned data types so
/// downstream crates never depend on reqwest-specific structures. Override only what you
/// need; `augment_grant_request` has a default no-op implementation.
pub trait ProviderStrategy: Send + Sync {
	/// Maps a token endpoint error response into the hook taxonomy.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;

	/// Gives providers a chance to add fields (`audience`, `realm`, ...) to the JSON grant body.
	///
	/// The map already holds `grant_type`, `username`, `password`, `scope`, `client_id`, and
	/// `client_secret`. Overwriting those keys is allowed but rarely what you want.
	fn augment_grant_request(&self, _body: &mut BTreeMap<String, String>) {}
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the resource owner's credentials.
	InvalidGrant,
	/// Client authentication failed or the client may not use the password grant.
	InvalidClient,
	/// Failure is temporary.
	Transient,
}

/// Context passed to provider strategies when classifying token errors.
///
/// The struct keeps only primitive data (status codes, OAuth fields, body preview) so
/// strategies stay decoupled from any HTTP client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied OAuth `error` field.
	pub oauth_error: Option<String>,
	/// Provider-supplied OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Preview of the response body for non-JSON payloads.
	pub body_preview: Option<String>,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an HTTP status code (e.g., 400, 401, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string returned by the provider.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a body preview for providers that return non-JSON payloads.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}
}

/// Default strategy that applies RFC-guided heuristics.
///
/// It prioritizes structured OAuth fields (`error`, `error_description`), then falls back to
/// body text hints, and finally the HTTP status code.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if let Some(kind) =
			classify_oauth_error(ctx.oauth_error.as_deref(), ctx.error_description.as_deref())
		{
			return kind;
		}
		if let Some(kind) = classify_body(ctx.body_preview.as_deref()) {
			return kind;
		}

		classify_status(ctx.http_status)
	}
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = body.chars().take(ProviderErrorContext::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

fn classify_oauth_error(
	oauth_error: Option<&str>,
	error_description: Option<&str>,
) -> Option<ProviderErrorKind> {
	oauth_error
		.and_then(match_exact_value)
		.or_else(|| error_description.and_then(match_exact_value))
		.or_else(|| classify_body(error_description))
}

fn match_exact_value(value: &str) -> Option<ProviderErrorKind> {
	const GRANT: [&str; 5] =
		["invalid_grant", "access_denied", "too_many_attempts", "mfa_required", "invalid_user"];
	const CLIENT: [&str; 3] = ["invalid_client", "unauthorized_client", "invalid_request"];
	const TRANSIENT: [&str; 2] = ["temporarily_unavailable", "server_error"];

	let matches = |set: &[&str]| set.iter().any(|code| value.eq_ignore_ascii_case(code));

	if matches(&GRANT) {
		Some(ProviderErrorKind::InvalidGrant)
	} else if matches(&CLIENT) {
		Some(ProviderErrorKind::InvalidClient)
	} else if matches(&TRANSIENT) {
		Some(ProviderErrorKind::Transient)
	} else {
		None
	}
}

fn classify_body(body: Option<&str>) -> Option<ProviderErrorKind> {
	let body = body?;
	let lowered = body.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") || text.contains("wrong email or password") =>
			Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") || text.contains("unauthorized_client") =>
			Some(ProviderErrorKind::InvalidClient),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 403) => ProviderErrorKind::InvalidGrant,
		Some(401) => ProviderErrorKind::InvalidClient,
		_ => ProviderErrorKind::Transient,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn oauth_error_fields_win() {
		let strategy = DefaultProviderStrategy;
		let ctx = ProviderErrorContext::new()
			.with_http_status(403)
			.with_oauth_error("invalid_grant")
			.with_error_description("Wrong email or password.");

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::InvalidGrant);

		let ctx = ProviderErrorContext::new()
			.with_http_status(403)
			.with_oauth_error("unauthorized_client");

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::InvalidClient);
	}

	#[test]
	fn falls_back_to_body_then_status() {
		let strategy = DefaultProviderStrategy;
		let body_ctx = ProviderErrorContext::new()
			.with_http_status(500)
			.with_body_preview("<html>Wrong email or password</html>");

		assert_eq!(strategy.classify_token_error(&body_ctx), ProviderErrorKind::InvalidGrant);
		assert_eq!(
			strategy.classify_token_error(&ProviderErrorContext::new().with_http_status(401)),
			ProviderErrorKind::InvalidClient
		);
		assert_eq!(
			strategy.classify_token_error(&ProviderErrorContext::new().with_http_status(503)),
			ProviderErrorKind::Transient
		);
	}

	#[test]
	fn body_preview_is_truncated() {
		let ctx = ProviderErrorContext::new().with_body_preview("x".repeat(1_000));
		let preview = ctx.body_preview.expect("Preview should be recorded.");

		assert_eq!(preview.chars().count(), ProviderErrorContext::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}

	#[test]
	fn custom_strategy_can_augment_grant_requests() {
		struct RealmStrategy;
		impl ProviderStrategy for RealmStrategy {
			fn classify_token_error(&self, _ctx: &ProviderErrorContext) -> ProviderErrorKind {
				ProviderErrorKind::InvalidGrant
			}

			fn augment_grant_request(&self, body: &mut BTreeMap<String, String>) {
				body.insert("realm".into(), "Username-Password-Authentication".into());
			}
		}

		let mut body = BTreeMap::new();

		body.insert("grant_type".into(), "password".into());
		RealmStrategy.augment_grant_request(&mut body);

		assert_eq!(body.get("realm").map(String::as_str), Some("Username-Password-Authentication"));
	}
}
