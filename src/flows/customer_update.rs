//! Customer update forwarding.

// crates.io
use reqwest::header::ACCEPT;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	customer::{CustomerPayload, CustomerUpdate},
	flows::Relay,
	obs::{self, Stage, StageOutcome, StageSpan},
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

impl Relay {
	/// Sends `update` to the admin customer resource and returns the remote payload.
	///
	/// Non-success statuses surface as [`Error::UpstreamRejection`] with the remote details;
	/// a success whose body is not JSON is a transport failure.
	pub async fn forward_update(
		&self,
		token: &AccessToken,
		update: &CustomerUpdate,
	) -> Result<Value> {
		const STAGE: Stage = Stage::CustomerUpdate;

		let span = StageSpan::new(STAGE);

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = self.config.customer_endpoint(&update.id)?;
				let request = self
					.http_client
					.put(endpoint)
					.header(ACCESS_TOKEN_HEADER, token.expose())
					.header(ACCEPT, "application/json")
					.json(&CustomerPayload { customer: update });
				let reply = self.http_client.send_json(request).await?;

				if !reply.status.is_success() {
					tracing::warn!(
						status = %reply.status,
						customer_id = %update.id,
						"Admin API rejected the customer update."
					);

					return Err(Error::UpstreamRejection {
						status: reply.status,
						details: reply.details(),
					});
				}

				let remote = reply.json()?;

				tracing::info!(customer_id = %update.id, "Customer update accepted.");

				Ok(remote)
			})
			.await;

		obs::record_stage_outcome(STAGE, StageOutcome::of(&result));

		result
	}
}
