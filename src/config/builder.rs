// std
use std::net::IpAddr;
// self
use crate::{
	_prelude::*,
	auth::{MissingSignaturePolicy, Secret},
	config::{AdminAuth, RelayConfig},
	error::ConfigError,
};

/// Builder for [`RelayConfig`] values.
#[derive(Debug)]
pub struct RelayConfigBuilder {
	/// Key for inbound signature verification.
	pub shared_secret: Secret,
	/// Admin API authentication mode.
	pub admin_auth: Option<AdminAuth>,
	/// Bare store domain, e.g. `demo.myshopify.com`.
	pub store_domain: Option<String>,
	/// Explicit admin origin; wins over `store_domain`.
	pub admin_base_url: Option<Url>,
	/// Admin API version segment.
	pub api_version: String,
	/// Forward the inbound `phone` field when present.
	pub forward_phone: bool,
	/// Reporting mode for requests without a signature.
	pub missing_signature_policy: MissingSignaturePolicy,
	/// Echo digests in invalid-signature responses.
	pub signature_debug: bool,
	/// Upper bound for each outbound call.
	pub request_timeout: Duration,
}
impl RelayConfigBuilder {
	/// Creates a new builder seeded with the shared secret and defaults.
	pub fn new(shared_secret: Secret) -> Self {
		Self {
			shared_secret,
			admin_auth: None,
			store_domain: None,
			admin_base_url: None,
			api_version: RelayConfig::DEFAULT_API_VERSION.into(),
			forward_phone: false,
			missing_signature_policy: MissingSignaturePolicy::default(),
			signature_debug: false,
			request_timeout: RelayConfig::DEFAULT_REQUEST_TIMEOUT,
		}
	}

	/// Sets the store domain; the admin origin becomes `https://{domain}`.
	pub fn store_domain(mut self, domain: impl Into<String>) -> Self {
		self.store_domain = Some(domain.into());

		self
	}

	/// Sets the admin origin directly.
	pub fn admin_base_url(mut self, url: Url) -> Self {
		self.admin_base_url = Some(url);

		self
	}

	/// Overrides the admin API version.
	pub fn api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = version.into();

		self
	}

	/// Uses a pre-provisioned admin token for every update.
	pub fn static_admin_token(mut self, token: impl Into<Secret>) -> Self {
		self.admin_auth = Some(AdminAuth::StaticToken(token.into()));

		self
	}

	/// Exchanges the client id/secret for a fresh token on every update.
	pub fn client_credentials(
		mut self,
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
	) -> Self {
		self.admin_auth = Some(AdminAuth::ClientCredentials {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
		});

		self
	}

	/// Enables or disables forwarding of the `phone` field.
	pub fn forward_phone(mut self, enabled: bool) -> Self {
		self.forward_phone = enabled;

		self
	}

	/// Overrides how a missing signature is reported.
	pub fn missing_signature_policy(mut self, policy: MissingSignaturePolicy) -> Self {
		self.missing_signature_policy = policy;

		self
	}

	/// Echoes the received and calculated digests in invalid-signature responses.
	pub fn signature_debug(mut self, enabled: bool) -> Self {
		self.signature_debug = enabled;

		self
	}

	/// Overrides the outbound call timeout (defaults to 10 seconds).
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<RelayConfig, ConfigError> {
		if self.shared_secret.is_blank() {
			return Err(ConfigError::EmptySecret { field: "shared secret" });
		}

		let admin_auth = self.admin_auth.ok_or(ConfigError::MissingAdminAuth)?;

		validate_admin_auth(&admin_auth)?;

		let admin_base_url = match (self.admin_base_url, self.store_domain) {
			(Some(url), _) => url,
			(None, Some(domain)) => parse_store_domain(&domain)?,
			(None, None) => return Err(ConfigError::MissingAdminBaseUrl),
		};

		validate_base_url(&admin_base_url)?;
		validate_api_version(&self.api_version)?;

		if self.request_timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok(RelayConfig {
			shared_secret: self.shared_secret,
			admin_auth,
			admin_base_url,
			api_version: self.api_version,
			forward_phone: self.forward_phone,
			missing_signature_policy: self.missing_signature_policy,
			signature_debug: self.signature_debug,
			request_timeout: self.request_timeout,
		})
	}
}

fn validate_admin_auth(auth: &AdminAuth) -> Result<(), ConfigError> {
	match auth {
		AdminAuth::StaticToken(token) if token.is_blank() =>
			Err(ConfigError::EmptySecret { field: "admin token" }),
		AdminAuth::ClientCredentials { client_id, .. } if client_id.trim().is_empty() =>
			Err(ConfigError::EmptySecret { field: "client id" }),
		AdminAuth::ClientCredentials { client_secret, .. } if client_secret.is_blank() =>
			Err(ConfigError::EmptySecret { field: "client secret" }),
		_ => Ok(()),
	}
}

fn parse_store_domain(domain: &str) -> Result<Url, ConfigError> {
	let trimmed = domain.trim().trim_end_matches('/');

	Url::parse(&format!("https://{trimmed}/"))
		.map_err(|source| ConfigError::InvalidStoreDomain { domain: domain.to_owned(), source })
}

fn validate_base_url(url: &Url) -> Result<(), ConfigError> {
	if url.cannot_be_a_base() {
		return Err(ConfigError::InvalidBaseUrl { url: url.to_string() });
	}
	if url.scheme() != "https" && !is_loopback(url) {
		return Err(ConfigError::InsecureEndpoint { url: url.to_string() });
	}

	Ok(())
}

fn is_loopback(url: &Url) -> bool {
	match url.host_str() {
		Some("localhost") => true,
		Some(host) => host
			.trim_start_matches('[')
			.trim_end_matches(']')
			.parse::<IpAddr>()
			.is_ok_and(|ip| ip.is_loopback()),
		None => false,
	}
}

fn validate_api_version(version: &str) -> Result<(), ConfigError> {
	let bytes = version.as_bytes();
	let dated = bytes.len() == 7
		&& bytes[4] == b'-'
		&& bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit);

	if dated || version == "unstable" {
		Ok(())
	} else {
		Err(ConfigError::InvalidApiVersion { version: version.to_owned() })
	}
}
