// self
use crate::{
	_prelude::*,
	obs::{FailureKind, Stage},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedAuth<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedAuth<F> = F;

/// Span wrapping one authentication.
#[derive(Clone, Debug)]
pub struct AuthSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl AuthSpan {
	/// Creates the span; `stage` starts empty and is filled by [`AuthSpan::record_stage`].
	pub fn new() -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oidc_password_hook.authenticate",
				stage = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			Self {}
		}
	}

	/// Records the last stage reached.
	pub fn record_stage(&self, stage: Stage) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("stage", stage.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedAuth<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
impl Default for AuthSpan {
	fn default() -> Self {
		Self::new()
	}
}

/// Logs a denial. Only the failure kind and error chain are emitted, never credentials.
pub fn log_denial(kind: FailureKind, error: &(dyn StdError + 'static)) {
	#[cfg(feature = "tracing")]
	{
		let mut chain = error.to_string();
		let mut source = error.source();

		while let Some(cause) = source {
			chain.push_str(": ");
			chain.push_str(&cause.to_string());

			source = cause.source();
		}

		tracing::warn!(kind = kind.as_str(), error = %chain, "Authentication denied.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}

/// Logs a verified authentication.
pub fn log_success() {
	#[cfg(feature = "tracing")]
	tracing::debug!("Authentication verified.");
}
