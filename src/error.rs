//! Hook-level error types shared across the grant, key lookup, and verification stages.
//!
//! None of these values ever reach the invocation framework: [`crate::flows::Verifier`] logs
//! them and answers with a denial. They exist so hosts and operators can tell the stages apart.

// self
use crate::{_prelude::*, obs::FailureKind, provider::Endpoint};

/// Hook-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical hook error.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Identity token could not be parsed or lacks required parts.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Signing key could not be resolved from the published key set.
	#[error(transparent)]
	Key(#[from] KeyError),

	/// Provider rejected the username/password pair.
	#[error("Provider rejected the credentials: {reason}.")]
	InvalidGrant {
		/// Provider- or hook-supplied reason string.
		reason: String,
	},
	/// Provider rejected the configured client.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider- or hook-supplied reason string.
		reason: String,
	},
	/// Token header names an algorithm outside the configured allow list.
	#[error("Token is signed with a disallowed algorithm: {alg:?}.")]
	DisallowedAlgorithm {
		/// Algorithm taken from the unverified header.
		alg: jsonwebtoken::Algorithm,
	},
	/// Signature did not validate against the selected key.
	#[error("Token signature verification failed.")]
	Signature {
		/// Underlying verification failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Signature validated but a registered claim (`exp`, `iss`, `aud`, ...) was rejected.
	#[error("Token claims were rejected.")]
	ClaimRejected {
		/// Underlying validation failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}
impl Error {
	/// Returns the coarse failure category used for logging and metrics labels.
	pub fn kind(&self) -> FailureKind {
		match self {
			Self::Config(_) => FailureKind::Config,
			Self::Transient(_) | Self::Transport(_) => FailureKind::Transport,
			Self::InvalidGrant { .. } | Self::InvalidClient { .. } => FailureKind::Rejected,
			Self::Token(_) => FailureKind::MalformedToken,
			Self::Key(_) => FailureKind::KeyResolution,
			Self::DisallowedAlgorithm { .. }
			| Self::Signature { .. }
			| Self::ClaimRejected { .. } => FailureKind::Verification,
		}
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Grant request body could not be serialized.
	#[error("Grant request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
	/// A derived or supplied endpoint is not a valid URL.
	#[error("The {endpoint} URL is invalid.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Tenant subdomain is empty or contains characters outside `[A-Za-z0-9.-]`.
	#[error("Tenant subdomain `{tenant}` is invalid.")]
	InvalidTenant {
		/// Offending tenant value.
		tenant: String,
	},
	/// Client identifier is empty.
	#[error("Client identifier cannot be empty.")]
	MissingClientId,
	/// Allowed algorithm list is empty.
	#[error("At least one signature algorithm must be allowed.")]
	NoAllowedAlgorithms,
	/// Required configuration value missing from the environment lookup.
	#[error("Configuration value `{key}` is not set.")]
	MissingValue {
		/// Variable name that was looked up.
		key: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected but non-fatal response.
	#[error("The {endpoint} endpoint returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// Provider- or hook-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Endpoint responded with malformed JSON that could not be parsed.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	ResponseParse {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {endpoint} endpoint.")]
	Io {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: Endpoint,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Identity token parsing failures.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Grant response did not include an `id_token`.
	#[error("Grant response did not include an ID token.")]
	MissingIdToken,
	/// Token header could not be decoded.
	#[error("Token header is malformed.")]
	Header(#[source] jsonwebtoken::errors::Error),
	/// Token header has no `kid`.
	#[error("Token header does not name a signing key.")]
	MissingKeyId,
	/// Token payload could not be decoded into claims.
	#[error("Token claims are malformed.")]
	Claims(#[source] jsonwebtoken::errors::Error),
	/// A claim the hook depends on is absent.
	#[error("Token is missing the `{claim}` claim.")]
	MissingClaim {
		/// Claim name.
		claim: &'static str,
	},
}

/// Signing key resolution failures.
#[derive(Debug, ThisError)]
pub enum KeyError {
	/// Key set endpoint answered with a non-success status.
	#[error("Key set endpoint returned HTTP {status}.")]
	KeySetStatus {
		/// HTTP status code.
		status: u16,
	},
	/// No published key carries the requested `kid`.
	#[error("No published signing key matches kid `{kid}`.")]
	NotFound {
		/// Key identifier from the token header.
		kid: String,
	},
	/// Published key named by `kid` uses a key type, curve, or algorithm that cannot be read.
	#[error("Signing key `{kid}` is not in a supported JWK form.")]
	Unsupported {
		/// Key identifier.
		kid: String,
		/// Underlying JWK decoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// Published key declares a different algorithm than the token header.
	#[error("Signing key `{kid}` is not published for {alg:?}.")]
	AlgorithmMismatch {
		/// Key identifier.
		kid: String,
		/// Algorithm taken from the token header.
		alg: jsonwebtoken::Algorithm,
	},
	/// Published key is not marked for signature use.
	#[error("Signing key `{kid}` is not published for signature use.")]
	NotForSignature {
		/// Key identifier.
		kid: String,
	},
	/// Published key material could not be turned into a verification key.
	#[error("Signing key `{kid}` is unusable.")]
	Unusable {
		/// Key identifier.
		kid: String,
		/// Underlying key decoding failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}
