//! Handler responses and the error → response translation.

// self
use crate::{
	_prelude::*,
	auth::SignatureError,
	error::TokenExchangeError,
};

/// Status plus JSON body handed back to the hosting runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyResponse {
	/// HTTP status to answer with.
	pub status: StatusCode,
	/// JSON body to answer with.
	pub body: Value,
}
impl ProxyResponse {
	/// Error label for a missing signature.
	pub const MISSING_SIGNATURE: &'static str = "Missing Signature";
	/// Error label for a signature mismatch.
	pub const INVALID_SIGNATURE: &'static str = "Invalid Signature";
	/// Error label for a malformed inbound body.
	pub const INVALID_BODY: &'static str = "Invalid Request Body";
	/// Error label for a failed token exchange.
	pub const TOKEN_FAILED: &'static str = "Failed to generate Admin Token";
	/// Error label for an update rejected by the admin API.
	pub const UPDATE_FAILED: &'static str = "Shopify Update Failed";

	/// Builds a response from parts.
	pub fn new(status: StatusCode, body: Value) -> Self {
		Self { status, body }
	}

	/// Acknowledgement for verified non-update requests.
	pub fn acknowledged() -> Self {
		Self::new(
			StatusCode::OK,
			serde_json::json!({ "status": "Success", "message": "Proxy signature verified" }),
		)
	}

	/// Successful update; the admin API payload is passed through verbatim.
	pub fn updated(remote: Value) -> Self {
		Self::new(StatusCode::OK, remote)
	}

	/// Translates an error into its response. `signature_debug` adds the received and
	/// calculated digests to invalid-signature bodies.
	pub fn from_error(err: &Error, signature_debug: bool) -> Self {
		let body = match err {
			Error::Authentication(SignatureError::Missing) =>
				serde_json::json!({ "error": Self::MISSING_SIGNATURE }),
			Error::Authentication(SignatureError::Invalid { received, calculated })
				if signature_debug =>
				serde_json::json!({
					"error": Self::INVALID_SIGNATURE,
					"received": received,
					"calculated": calculated
				}),
			Error::Authentication(_) => serde_json::json!({ "error": Self::INVALID_SIGNATURE }),
			Error::Validation(e) =>
				serde_json::json!({ "error": Self::INVALID_BODY, "details": e.to_string() }),
			Error::UpstreamAuth(TokenExchangeError::MissingAccessToken { details, .. }) =>
				serde_json::json!({ "error": Self::TOKEN_FAILED, "details": details }),
			Error::UpstreamRejection { details, .. } =>
				serde_json::json!({ "error": Self::UPDATE_FAILED, "details": details }),
			Error::Transport(e) => serde_json::json!({ "error": e.to_string() }),
			Error::Config(e) => serde_json::json!({ "error": e.to_string() }),
		};

		Self::new(err.status(), body)
	}

	/// Serializes the body for hosts that write raw bytes.
	pub fn body_bytes(&self) -> Vec<u8> {
		self.body.to_string().into_bytes()
	}
}
impl From<Error> for ProxyResponse {
	fn from(err: Error) -> Self {
		Self::from_error(&err, false)
	}
}
