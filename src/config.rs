//! Read-only relay configuration.
//!
//! A [`RelayConfig`] is assembled once at process start through [`RelayConfigBuilder`], which
//! validates secrets, the admin base URL, and the API version, then shared by every invocation
//! behind an `Arc`. Nothing mutates it afterwards. The three behaviors that differ between
//! deployments are explicit options instead of hidden branches:
//!
//! - [`AdminAuth`] selects a pre-provisioned admin token or a per-request client-credentials
//!   exchange.
//! - `forward_phone` decides whether the inbound `phone` field reaches the admin API.
//! - [`MissingSignaturePolicy`] decides whether a missing signature is reported separately.

/// Validating builder that assembles [`RelayConfig`] values.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{MissingSignaturePolicy, Secret},
	customer::CustomerId,
	error::ConfigError,
};

/// How the relay authenticates against the admin API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminAuth {
	/// Long-lived admin token provisioned ahead of time.
	StaticToken(Secret),
	/// Client id/secret pair exchanged for a fresh token on every update.
	ClientCredentials {
		/// OAuth client identifier.
		client_id: String,
		/// OAuth client secret.
		client_secret: Secret,
	},
}
impl AdminAuth {
	/// Returns `true` when updates require a token exchange first.
	pub fn exchanges_token(&self) -> bool {
		matches!(self, Self::ClientCredentials { .. })
	}
}

/// Validated, immutable relay configuration.
#[derive(Clone, Debug)]
pub struct RelayConfig {
	/// Key for inbound signature verification.
	pub shared_secret: Secret,
	/// Admin API authentication mode.
	pub admin_auth: AdminAuth,
	/// Store origin, e.g. `https://demo.myshopify.com/`.
	pub admin_base_url: Url,
	/// Admin API version segment, e.g. `2024-01`.
	pub api_version: String,
	/// Forward the inbound `phone` field when present.
	pub forward_phone: bool,
	/// Reporting mode for requests without a signature.
	pub missing_signature_policy: MissingSignaturePolicy,
	/// Echo `received` and `calculated` digests in invalid-signature responses.
	pub signature_debug: bool,
	/// Upper bound for each outbound call.
	pub request_timeout: Duration,
}
impl RelayConfig {
	/// Default admin API version.
	pub const DEFAULT_API_VERSION: &'static str = "2024-01";
	/// Default bound for each outbound call.
	pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

	/// Starts a builder keyed with the shared signing secret.
	pub fn builder(shared_secret: impl Into<Secret>) -> RelayConfigBuilder {
		RelayConfigBuilder::new(shared_secret.into())
	}

	/// `POST` target for the client-credentials exchange.
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		self.admin_url(&["admin", "oauth", "access_token"])
	}

	/// `PUT` target for one customer; the id is encoded as a single path segment.
	pub fn customer_endpoint(&self, id: &CustomerId) -> Result<Url, ConfigError> {
		let resource = format!("{id}.json");

		self.admin_url(&["admin", "api", &self.api_version, "customers", &resource])
	}

	fn admin_url(&self, segments: &[&str]) -> Result<Url, ConfigError> {
		let mut url = self.admin_base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidBaseUrl { url: self.admin_base_url.to_string() })?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}
}
