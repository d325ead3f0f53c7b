//! The credential verifier and its stages: password grant, key resolution, and token checks.

pub mod hook;
pub mod keys;
pub mod password;
pub mod verify;

pub use hook::*;
pub use keys::*;
pub use password::*;
pub use verify::*;

// self
use crate::{
	_prelude::*,
	config::HookConfig,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	provider::{DefaultProviderStrategy, ProviderStrategy},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Verifier specialized for the crate's default reqwest transport stack.
pub type ReqwestVerifier = Verifier<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Validates credentials against one identity provider tenant.
///
/// The verifier owns the HTTP client, configuration, and provider strategy. It keeps no
/// per-invocation state: every call performs a fresh grant and a fresh key set fetch, so one
/// instance can be shared across concurrent invocations.
#[derive(Clone)]
pub struct Verifier<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors.
	pub transport_mapper: Arc<M>,
	/// Tenant endpoints, client credentials, and token checks.
	pub config: HookConfig,
	/// Strategy responsible for grant request adjustments and error classification.
	pub strategy: Arc<dyn ProviderStrategy>,
}
impl<C, M> Verifier<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a verifier that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: HookConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config,
			strategy: Arc::new(DefaultProviderStrategy),
		}
	}

	/// Replaces the provider strategy.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}
}
#[cfg(feature = "reqwest")]
impl Verifier<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a verifier backed by a reqwest client that does not follow redirects.
	pub fn new(config: HookConfig) -> Result<Self> {
		Ok(Self::with_http_client(
			config,
			ReqwestHttpClient::without_redirects()?,
			ReqwestTransportErrorMapper,
		))
	}
}
impl<C, M> Debug for Verifier<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Verifier")
			.field("endpoints", &self.config.endpoints)
			.field("client_id", &self.config.client_id)
			.field("checks", &self.config.checks)
			.finish()
	}
}
