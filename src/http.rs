//! Transport primitives for admin API calls.
//!
//! [`ReqwestHttpClient`] wraps a pooled [`ReqwestClient`] and [`JsonReply`] captures what the
//! relay needs from a response (status plus a JSON-or-text body) so the flows can classify
//! outcomes without holding on to reqwest types.

// std
use std::ops::Deref;
// crates.io
use reqwest::{RequestBuilder, redirect::Policy};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Admin endpoints answer directly, so redirects are never followed; every call is bounded
/// by the configured timeout.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
	client: ReqwestClient,
	timeout: Duration,
}
impl ReqwestHttpClient {
	/// Builds a client with the relay defaults: no redirects and a per-request timeout.
	pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(Policy::none()).timeout(timeout).build()?;

		Ok(Self { client, timeout })
	}

	/// Wraps an existing reqwest [`ReqwestClient`]; `timeout` is still applied per request.
	pub fn with_client(client: ReqwestClient, timeout: Duration) -> Self {
		Self { client, timeout }
	}

	/// Per-request bound applied to every call.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Sends `request` and collects the reply, mapping network failures and timeouts.
	pub async fn send_json(&self, request: RequestBuilder) -> Result<JsonReply, TransportError> {
		let response = request
			.timeout(self.timeout)
			.send()
			.await
			.map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
		let status = response.status();
		let bytes =
			response.bytes().await.map_err(|e| TransportError::from_reqwest(e, self.timeout))?;

		Ok(JsonReply { status, body: bytes.to_vec() })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}

/// Status and raw body of one admin API response.
#[derive(Clone, Debug)]
pub struct JsonReply {
	/// HTTP status returned by the admin API.
	pub status: StatusCode,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl JsonReply {
	/// Strictly decodes the body as JSON.
	pub fn json(&self) -> Result<Value, TransportError> {
		serde_json::from_slice(&self.body).map_err(|source| TransportError::Decode { source })
	}

	/// Decodes the body as JSON, falling back to a JSON string of the raw text (or `null` when
	/// empty). Used for error details, which must never fail to render.
	pub fn details(&self) -> Value {
		if self.body.is_empty() {
			return Value::Null;
		}

		serde_json::from_slice(&self.body)
			.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
	}
}
