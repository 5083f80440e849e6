//! The signed proxy handler and its outbound steps.

mod customer_update;
mod token_exchange;

// self
use crate::{
	_prelude::*,
	auth::{self, AccessToken},
	config::{AdminAuth, RelayConfig},
	customer::CustomerUpdateRequest,
	http::ReqwestHttpClient,
	obs::{self, Stage, StageOutcome, StageSpan},
	request::InboundRequest,
	response::ProxyResponse,
};

/// Terminal success states of one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
	/// Verified non-update request; nothing was forwarded.
	Acknowledged,
	/// Update accepted by the admin API; carries its payload verbatim.
	Updated(Value),
}
impl From<RelayOutcome> for ProxyResponse {
	fn from(outcome: RelayOutcome) -> Self {
		match outcome {
			RelayOutcome::Acknowledged => ProxyResponse::acknowledged(),
			RelayOutcome::Updated(remote) => ProxyResponse::updated(remote),
		}
	}
}

/// Verifies app-proxy requests and relays customer updates to the admin API.
///
/// The relay holds only the read-only configuration and a pooled HTTP client, so clones are
/// cheap and concurrent invocations share no mutable state. Access tokens obtained through the
/// client-credentials exchange live for a single invocation.
#[derive(Clone)]
pub struct Relay {
	/// Immutable configuration shared by every invocation.
	pub config: Arc<RelayConfig>,
	/// HTTP client wrapper used for every outbound admin call.
	pub http_client: ReqwestHttpClient,
}
impl Relay {
	/// Creates a relay with its own reqwest transport bounded by the configured timeout.
	pub fn new(config: RelayConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::new(config.request_timeout)?;

		Ok(Self::with_http_client(config, http_client))
	}

	/// Creates a relay that reuses the caller-provided transport.
	pub fn with_http_client(
		config: impl Into<Arc<RelayConfig>>,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self { config: config.into(), http_client }
	}

	/// Handles one inbound request and always produces a response.
	pub async fn handle(&self, request: InboundRequest) -> ProxyResponse {
		match self.process(request).await {
			Ok(outcome) => outcome.into(),
			Err(e) => ProxyResponse::from_error(&e, self.config.signature_debug),
		}
	}

	/// Runs verification and, for `POST`, the update flow.
	///
	/// No outbound call happens unless the signature verified.
	pub async fn process(&self, request: InboundRequest) -> Result<RelayOutcome> {
		tracing::debug!(
			method = %request.method,
			host = request.host().unwrap_or_default(),
			params = request.query.len(),
			"Received proxy request."
		);

		self.verify(&request)?;

		if !request.is_update() {
			return Ok(RelayOutcome::Acknowledged);
		}

		let update = CustomerUpdateRequest::from_slice(&request.body)?
			.into_update(self.config.forward_phone)?;

		tracing::info!(customer_id = %update.id, "Updating customer profile.");

		let token = self.admin_token().await?;
		let remote = self.forward_update(&token, &update).await?;

		Ok(RelayOutcome::Updated(remote))
	}

	/// Verifies the inbound signature against the shared secret.
	pub fn verify(&self, request: &InboundRequest) -> Result<()> {
		const STAGE: Stage = Stage::VerifySignature;

		let _span = StageSpan::new(STAGE).entered();

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = auth::verify(
			&request.query,
			&self.config.shared_secret,
			self.config.missing_signature_policy,
		);

		obs::record_stage_outcome(STAGE, StageOutcome::of(&result));

		if let Err(e) = &result {
			tracing::warn!(error = %e, "Rejected proxy request.");
		}

		result.map_err(Error::from)
	}

	/// Resolves the admin token for this invocation: the static one, or a fresh exchange.
	pub async fn admin_token(&self) -> Result<AccessToken> {
		match &self.config.admin_auth {
			AdminAuth::StaticToken(token) => Ok(AccessToken::from(token.clone())),
			AdminAuth::ClientCredentials { client_id, client_secret } =>
				self.acquire_access_token(client_id, client_secret).await,
		}
	}
}
impl Debug for Relay {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Relay")
			.field("admin_base_url", &self.config.admin_base_url.as_str())
			.field("api_version", &self.config.api_version)
			.field("exchanges_token", &self.config.admin_auth.exchanges_token())
			.finish()
	}
}
