//! Client-credentials exchange against the admin token endpoint.
//!
//! The exchange runs once per update that needs it. The returned token is handed straight to
//! the forwarder and dropped with the invocation; nothing is cached.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Secret},
	error::TokenExchangeError,
	flows::Relay,
	obs::{self, Stage, StageOutcome, StageSpan},
};

const GRANT_TYPE: &str = "client_credentials";

#[derive(Serialize)]
struct TokenRequest<'a> {
	client_id: &'a str,
	client_secret: &'a str,
	grant_type: &'static str,
}

impl Relay {
	/// Exchanges client credentials for a short-lived admin access token.
	///
	/// A response without a non-empty `access_token` string fails with
	/// [`TokenExchangeError::MissingAccessToken`], whatever its status.
	pub async fn acquire_access_token(
		&self,
		client_id: &str,
		client_secret: &Secret,
	) -> Result<AccessToken> {
		const STAGE: Stage = Stage::TokenExchange;

		let span = StageSpan::new(STAGE);

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = self.config.token_endpoint()?;
				let body = TokenRequest {
					client_id,
					client_secret: client_secret.expose(),
					grant_type: GRANT_TYPE,
				};
				let request = self.http_client.post(endpoint).json(&body);
				let reply = self.http_client.send_json(request).await?;
				let details = reply.details();
				let token = details
					.get("access_token")
					.and_then(Value::as_str)
					.filter(|token| !token.is_empty())
					.map(AccessToken::new);

				match token {
					Some(token) => Ok(token),
					None => {
						tracing::warn!(
							status = %reply.status,
							"Token endpoint returned no access token."
						);

						Err(TokenExchangeError::MissingAccessToken {
							status: reply.status,
							details,
						}
						.into())
					},
				}
			})
			.await;

		obs::record_stage_outcome(STAGE, StageOutcome::of(&result));

		result
	}
}
