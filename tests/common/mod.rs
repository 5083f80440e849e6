//! Shared fixtures for relay integration tests.

#![allow(dead_code)]

// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
// self
use app_proxy_relay::{
	auth::{self, Secret},
	config::{RelayConfig, RelayConfigBuilder},
	flows::Relay,
	http::ReqwestHttpClient,
	reqwest::{Client, Method, redirect::Policy},
	request::{InboundRequest, QueryParams},
	url::Url,
};

pub const SHARED_SECRET: &str = "proxy-shared-secret";
pub const STATIC_TOKEN: &str = "shpat_static_admin";
pub const CLIENT_ID: &str = "relay-client";
pub const CLIENT_SECRET: &str = "relay-client-secret";
pub const CUSTOMER_PATH: &str = "/admin/api/2024-01/customers/12345.json";
pub const TOKEN_PATH: &str = "/admin/oauth/access_token";

/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_http_client(timeout: Duration) -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.redirect(Policy::none())
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client, timeout)
}

pub fn base_url(server: &MockServer) -> Url {
	Url::parse(&server.base_url()).expect("Mock server base URL should parse successfully.")
}

/// Builds a relay pointed at `server`; `configure` picks the admin auth mode and options.
pub fn build_relay(
	server: &MockServer,
	configure: impl FnOnce(RelayConfigBuilder) -> RelayConfigBuilder,
) -> Relay {
	let config = configure(RelayConfig::builder(SHARED_SECRET).admin_base_url(base_url(server)))
		.build()
		.expect("Relay configuration should build successfully.");
	let http_client = test_http_client(config.request_timeout);

	Relay::with_http_client(config, http_client)
}

pub fn static_relay(server: &MockServer) -> Relay {
	build_relay(server, |builder| builder.static_admin_token(STATIC_TOKEN))
}

pub fn exchange_relay(server: &MockServer) -> Relay {
	build_relay(server, |builder| builder.client_credentials(CLIENT_ID, CLIENT_SECRET))
}

/// Storefront parameters signed with [`SHARED_SECRET`].
pub fn signed_query() -> QueryParams {
	let mut params = QueryParams::from_pairs([
		("shop", "relicv1demo.myshopify.com"),
		("logged_in_customer_id", "12345"),
		("path_prefix", "/apps/profile"),
		("timestamp", "1717171717"),
	]);
	let signature = auth::sign(&Secret::new(SHARED_SECRET), &auth::canonicalize(&params))
		.expect("Signing fixture parameters should succeed.");

	params.push(QueryParams::SIGNATURE, signature);

	params
}

pub fn signed_get() -> InboundRequest {
	InboundRequest::new(Method::GET, signed_query())
}

pub fn signed_post(body: serde_json::Value) -> InboundRequest {
	InboundRequest::new(Method::POST, signed_query()).with_body(body.to_string())
}

pub fn ada_body() -> serde_json::Value {
	serde_json::json!({ "customerId": "12345", "firstName": "Ada" })
}
