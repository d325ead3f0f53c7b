// self
use crate::obs::{AuthOutcome, FailureKind};

/// Records an invocation outcome via the global metrics recorder (when enabled).
pub fn record_auth_outcome(outcome: AuthOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oidc_password_hook_authenticate_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records the category of a denial (when enabled).
pub fn record_denial_kind(kind: FailureKind) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oidc_password_hook_denied_total", "kind" => kind.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = kind;
	}
}
