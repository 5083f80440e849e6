//! Relay-level error types shared across verification, token exchange, and forwarding.

// self
use crate::{_prelude::*, auth::SignatureError, customer::ValidationError};

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Inbound request failed signature verification.
	#[error(transparent)]
	Authentication(#[from] SignatureError),
	/// Inbound body is malformed or incomplete.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Access token could not be obtained from the token endpoint.
	#[error(transparent)]
	UpstreamAuth(#[from] TokenExchangeError),
	/// Transport failure (DNS, TCP, TLS, timeout, undecodable body).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Admin API completed the call but answered with a non-success status.
	#[error("Admin API rejected the customer update with status {status}.")]
	UpstreamRejection {
		/// HTTP status returned by the admin API.
		status: StatusCode,
		/// Remote error payload (JSON when decodable, otherwise the raw text).
		details: Value,
	},
}
impl Error {
	/// HTTP status the relay answers with for this error.
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Authentication(_) => StatusCode::UNAUTHORIZED,
			Self::Validation(_) => StatusCode::BAD_REQUEST,
			Self::UpstreamRejection { status, .. } => *status,
			Self::Config(_) | Self::UpstreamAuth(_) | Self::Transport(_) =>
				StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

/// Configuration and validation failures raised while assembling the relay.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Store domain does not form a valid URL.
	#[error("Store domain `{domain}` does not form a valid URL.")]
	InvalidStoreDomain {
		/// Domain that failed to parse.
		domain: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Admin base URL cannot carry path segments.
	#[error("Admin base URL `{url}` cannot be used as a base.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Admin endpoints must use HTTPS outside loopback hosts.
	#[error("The admin base URL must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Neither a store domain nor an admin base URL was supplied.
	#[error("Missing store domain or admin base URL.")]
	MissingAdminBaseUrl,
	/// Neither a static admin token nor client credentials were supplied.
	#[error("Missing admin authentication; configure a static token or client credentials.")]
	MissingAdminAuth,
	/// A secret field was empty.
	#[error("The {field} must not be empty.")]
	EmptySecret {
		/// Name of the empty field.
		field: &'static str,
	},
	/// API version is not `YYYY-MM` or `unstable`.
	#[error("API version `{version}` must be `YYYY-MM` or `unstable`.")]
	InvalidApiVersion {
		/// Rejected version string.
		version: String,
	},
	/// Outbound request timeout must be positive.
	#[error("The request timeout must be greater than zero.")]
	ZeroTimeout,
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

/// Token endpoint failures that prevent the update from being attempted.
#[derive(Debug, ThisError)]
pub enum TokenExchangeError {
	/// Token endpoint answered without a usable `access_token` field.
	#[error("Token endpoint response did not contain an access token.")]
	MissingAccessToken {
		/// HTTP status returned by the token endpoint.
		status: StatusCode,
		/// Remote payload (JSON when decodable, otherwise the raw text).
		details: Value,
	},
}

/// Transport-level failures (network, timeout, undecodable payloads).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the admin API: {source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Outbound call exceeded the configured timeout.
	#[error("Admin API call timed out after {timeout:?}.")]
	Timeout {
		/// Configured bound that elapsed.
		timeout: Duration,
	},
	/// Admin API answered successfully but the body was not valid JSON.
	#[error("Admin API returned malformed JSON: {source}")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Classifies a reqwest failure, separating timeouts from other network errors.
	pub fn from_reqwest(e: ReqwestError, timeout: Duration) -> Self {
		if e.is_timeout() { Self::Timeout { timeout } } else { Self::network(e.without_url()) }
	}
}
