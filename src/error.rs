//! Client-level error types shared across the dispatcher, rate limiter, and token providers.

// self
use crate::{_prelude::*, rate_limit::LimiterKind};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Bearer token could not be obtained.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, body read).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A limiter wait was denied by the active wait policy.
	#[error("The {limiter} quota is exhausted.")]
	QuotaExceeded {
		/// Limiter that refused the permit.
		limiter: LimiterKind,
		/// Time until a token becomes available, if it ever will.
		retry_after: Option<Duration>,
	},
	/// Upstream answered with a status listed in the classifier table.
	#[error("{message}")]
	Api {
		/// HTTP status code.
		code: u16,
		/// Descriptive message mapped from the status code.
		message: &'static str,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Response body did not match the expected shape.
	#[error("Response body (HTTP {status}) could not be decoded: {snippet}")]
	Decode {
		/// HTTP status code of the undecodable response.
		status: u16,
		/// Leading slice of the raw body.
		snippet: String,
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the HTTP status code for [`Error::Api`] and [`Error::Decode`] failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { code, .. } => Some(*code),
			Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot carry path segments (e.g. `data:` or `mailto:` URLs).
	#[error("Base URL `{url}` cannot be used as an API root.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Token endpoint URL is invalid.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenUrl {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// A rate-limit parameter is negative, NaN, or infinite.
	#[error("Rate-limit parameter `{field}` must be finite and non-negative, got {value}.")]
	InvalidRateLimit {
		/// Field name.
		field: &'static str,
		/// Rejected value.
		value: f64,
	},
	/// The daily operating window is zero.
	#[error("The daily operating window must be longer than zero.")]
	EmptyOperatingWindow,
	/// API key contains bytes that cannot be sent as a header value.
	#[error("API key is not a valid HTTP header value.")]
	InvalidApiKey,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while obtaining a bearer token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint rejected the client credentials.
	#[error("Token endpoint rejected the client credentials: {reason}.")]
	Rejected {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint returned malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// Token endpoint could not be reached.
	#[error("Token endpoint could not be reached.")]
	Transport(#[source] TransportError),
	/// Token endpoint returned an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Summary of the failure.
		message: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the MOT History API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the MOT History API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
