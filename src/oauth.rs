//! Request construction, dispatch, and response decoding for the two provider calls.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::Endpoint,
};

const APPLICATION_JSON: &str = "application/json";

/// Maps HTTP transport failures into hook [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a hook error.
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(source) => TransportError::Io { endpoint, source }.into(),
			HttpClientError::Other(message) => map_generic_transport_error(endpoint, meta, message),
			_ => map_unknown_transport_error(endpoint, meta),
		}
	}
}

/// Raw provider response plus the metadata captured while receiving it.
pub(crate) struct ProviderResponse {
	pub(crate) endpoint: Endpoint,
	pub(crate) response: HttpResponse,
	pub(crate) meta: Option<ResponseMetadata>,
}
impl ProviderResponse {
	pub(crate) fn status(&self) -> u16 {
		self.response.status().as_u16()
	}

	pub(crate) fn is_success(&self) -> bool {
		self.response.status().is_success()
	}

	pub(crate) fn body(&self) -> &[u8] {
		self.response.body()
	}

	pub(crate) fn retry_after(&self) -> Option<Duration> {
		self.meta.as_ref().and_then(|value| value.retry_after)
	}

	/// Decodes the body as JSON, keeping the failing path for diagnostics.
	pub(crate) fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(self.body());

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			TransientError::ResponseParse {
				endpoint: self.endpoint,
				source,
				status: Some(self.status()),
			}
			.into()
		})
	}
}

/// Builds the JSON `POST` used for the password grant.
pub(crate) fn json_post(url: &Url, body: &BTreeMap<String, String>) -> Result<HttpRequest> {
	let payload = serde_json::to_vec(body).map_err(ConfigError::RequestBody)?;

	Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, APPLICATION_JSON)
		.header(ACCEPT, APPLICATION_JSON)
		.body(payload)
		.map_err(|e| ConfigError::from(e).into())
}

/// Builds the `GET` used for the key set.
pub(crate) fn json_get(url: &Url) -> Result<HttpRequest> {
	Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(ACCEPT, APPLICATION_JSON)
		.body(Vec::new())
		.map_err(|e| ConfigError::from(e).into())
}

/// Sends one request through a fresh instrumented handle.
///
/// Non-success statuses are returned as responses; only transport failures become errors here.
pub(crate) async fn dispatch<C, M>(
	http_client: &C,
	mapper: &M,
	endpoint: Endpoint,
	request: HttpRequest,
) -> Result<ProviderResponse>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let slot = ResponseMetadataSlot::default();
	let handle = http_client.with_metadata(slot.clone());
	let outcome = handle.call(request).await;
	let meta = slot.take();

	match outcome {
		Ok(response) => Ok(ProviderResponse { endpoint, response, meta }),
		Err(err) => Err(mapper.map_transport_error(endpoint, meta.as_ref(), err)),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(
	endpoint: Endpoint,
	meta: Option<&ResponseMetadata>,
	err: ReqwestError,
) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::UnexpectedResponse {
			endpoint,
			message: "Request timed out".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::network(endpoint, err).into()
}

fn map_generic_transport_error(
	endpoint: Endpoint,
	meta: Option<&ResponseMetadata>,
	message: impl Display,
) -> Error {
	TransientError::UnexpectedResponse {
		endpoint,
		message: format!("HTTP client error: {message}"),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
	.into()
}

fn map_unknown_transport_error(endpoint: Endpoint, meta: Option<&ResponseMetadata>) -> Error {
	TransientError::UnexpectedResponse {
		endpoint,
		message: "HTTP client error".into(),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
	.into()
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
