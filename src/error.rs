//! Client-wide error taxonomy shared by the transport, token, decode, and cursor layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network, I/O, cancellation, or deadline failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Client-credentials exchange failed; no token was cached.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// API gateway rejected the credentials (HTTP 401/403).
	#[error(transparent)]
	Gateway(#[from] GatewayError),
	/// API reported a structured processing error (HTTP 400/404/405).
	#[error(transparent)]
	Api(#[from] ApiError),
	/// API answered with a status outside the documented table.
	#[error(transparent)]
	Unknown(#[from] UnknownError),
	/// Response body could not be decoded into the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Response metadata was produced by an incompatible schema version.
	#[error("Response meta version `{found}` does not match the supported version `{expected}`.")]
	SchemaVersion {
		/// Version this client understands.
		expected: String,
		/// Version reported by the response.
		found: String,
	},
}
impl Error {
	/// Returns `true` when the error stems from cancellation or an expired deadline.
	pub fn is_canceled(&self) -> bool {
		matches!(
			self,
			Self::Transport(TransportError::Canceled | TransportError::DeadlineExceeded)
		)
	}
}

/// Configuration and validation failures raised while building the client.
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
	/// A configured URL cannot be used as an endpoint.
	#[error("The {endpoint} endpoint is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Client id or secret is empty.
	#[error("The client {field} must not be empty.")]
	MissingCredential {
		/// Credential field name.
		field: &'static str,
	},
	/// A rate limit ceiling is zero.
	#[error("The {limit} rate limit must be greater than zero.")]
	InvalidRateLimit {
		/// Which limit failed validation.
		limit: &'static str,
	},
	/// A resource code or language tag failed validation.
	#[error(transparent)]
	InvalidCode(#[from] crate::reference::CodeError),
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

/// Transport-level failures (network, IO, cancellation).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// The caller canceled the operation.
	#[error("The operation was canceled.")]
	Canceled,
	/// The caller's deadline elapsed (or would elapse before a rate limiter grants).
	#[error("The operation deadline was exceeded.")]
	DeadlineExceeded,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures of the client-credentials exchange.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Token endpoint answered with an OAuth error body.
	#[error("Token endpoint rejected the credentials: {error}.")]
	Rejected {
		/// OAuth `error` code.
		error: String,
		/// OAuth `error_description`, when supplied.
		description: Option<String>,
	},
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// Token endpoint returned something the OAuth client could not interpret.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Summary of the failure.
		message: String,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Access-token failure reported by the API gateway (HTTP 401/403).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Gateway rejected the request: {message}.")]
pub struct GatewayError {
	/// HTTP status that carried the error.
	pub status: u16,
	/// Short reason supplied by the gateway (the `Error` field).
	pub message: String,
}

/// Structured request-processing error (HTTP 400/404/405).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("API error {code} ({kind}, retry: {retry_indicator}): {description}.")]
pub struct ApiError {
	/// HTTP status that carried the error.
	pub status: u16,
	/// Advisory retry hint; the client never retries on its own.
	pub retry_indicator: bool,
	/// Error type label.
	pub kind: String,
	/// Error code.
	pub code: String,
	/// Human-readable description.
	pub description: String,
	/// Link to further documentation.
	pub info_url: String,
}

/// Response with an undocumented status; the raw body is kept for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("API returned HTTP {status}: {body}")]
pub struct UnknownError {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body, decoded lossily as UTF-8.
	pub body: String,
}

/// Body decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is neither XML nor JSON.
	#[error("Response body is neither XML nor JSON.")]
	UnsupportedFormat,
	/// XML body is malformed.
	#[error("Response body is malformed XML: {message}.")]
	Xml {
		/// Parser message.
		message: String,
	},
	/// Body does not match the expected shape.
	#[error("Response body does not match the expected shape.")]
	Json {
		/// Path-aware deserialization failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// Envelope root element differs from the one the resource expects.
	#[error("Response envelope root `{expected}` is missing.")]
	UnexpectedRoot {
		/// Root element the resource expects.
		expected: &'static str,
	},
	/// Envelope is missing its `Meta` block.
	#[error("Response envelope is missing its Meta block.")]
	MissingMeta,
	/// A `Meta` link carries an unusable URL.
	#[error("Response link `{href}` is not an absolute URL.")]
	InvalidLink {
		/// Raw link target.
		href: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Single-item lookup returned no records.
	#[error("Response contains no records.")]
	EmptyResponse,
}
