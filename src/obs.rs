//! Optional observability helpers for the hook.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run each invocation inside an `oidc_password_hook.authenticate` span
//!   carrying the `stage` field, and to log every denial with its failure kind.
//! - Enable `metrics` to increment `oidc_password_hook_authenticate_total` (labeled by
//!   `outcome`) and `oidc_password_hook_denied_total` (labeled by `kind`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Steps of one authentication, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Password grant sent to the token endpoint.
	GrantRequested,
	/// Grant succeeded and an ID token was returned.
	TokenReceived,
	/// Signing key selected from the published key set.
	KeyResolved,
	/// Signature and claims verified.
	Verified,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::GrantRequested => "grant_requested",
			Stage::TokenReceived => "token_received",
			Stage::KeyResolved => "key_resolved",
			Stage::Verified => "verified",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Coarse failure categories; every denial maps to exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
	/// Invocation context lacked the credential fields.
	InvalidContext,
	/// Hook or request misconfiguration.
	Config,
	/// Network failure or unexpected response on either call.
	Transport,
	/// Provider rejected the credentials or the client.
	Rejected,
	/// ID token missing, unparseable, or lacking required claims.
	MalformedToken,
	/// No usable published key for the token.
	KeyResolution,
	/// Signature or registered claim check failed.
	Verification,
}
impl FailureKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FailureKind::InvalidContext => "invalid_context",
			FailureKind::Config => "config",
			FailureKind::Transport => "transport",
			FailureKind::Rejected => "rejected",
			FailureKind::MalformedToken => "malformed_token",
			FailureKind::KeyResolution => "key_resolution",
			FailureKind::Verification => "verification",
		}
	}
}
impl Display for FailureKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthOutcome {
	/// Entry to [`crate::flows::Verifier::authenticate`].
	Attempt,
	/// Credentials verified.
	Success,
	/// Access denied.
	Denied,
}
impl AuthOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthOutcome::Attempt => "attempt",
			AuthOutcome::Success => "success",
			AuthOutcome::Denied => "denied",
		}
	}
}
impl Display for AuthOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
