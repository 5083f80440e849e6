//! Inbound request model handed to the relay by the hosting runtime.
//!
//! The relay never touches a server framework directly. Hosts translate their own request type
//! into [`InboundRequest`]: the method, the decoded query parameters ([`QueryParams`]), the
//! headers, and the raw body bytes.

// crates.io
use reqwest::header::HOST;
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Query parameters in the order they were received.
///
/// Repeated keys are kept as separate pairs; [`QueryParams::get`] and
/// [`QueryParams::grouped`] fold them into a single comma-joined value the same way the
/// storefront proxy does when it signs array parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);
impl QueryParams {
	/// Name of the parameter carrying the request signature.
	pub const SIGNATURE: &'static str = "signature";

	/// Decodes a raw (form-urlencoded) query string; a leading `?` is ignored.
	pub fn parse(raw: &str) -> Self {
		let raw = raw.strip_prefix('?').unwrap_or(raw);

		Self(form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
	}

	/// Builds the parameter list from already-decoded pairs.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}

	/// Appends a pair, keeping received order.
	pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.push((key.into(), value.into()));
	}

	/// Returns the value for `key`, joining repeated occurrences with `,`.
	pub fn get(&self, key: &str) -> Option<String> {
		let values =
			self.0.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str()).collect::<Vec<_>>();

		if values.is_empty() { None } else { Some(values.join(",")) }
	}

	/// Returns the signature parameter, if supplied.
	pub fn signature(&self) -> Option<String> {
		self.get(Self::SIGNATURE)
	}

	/// Groups values by key in ascending byte order, preserving received order per key.
	pub fn grouped(&self) -> BTreeMap<&str, Vec<&str>> {
		let mut grouped = BTreeMap::<&str, Vec<&str>>::new();

		for (key, value) in &self.0 {
			grouped.entry(key.as_str()).or_default().push(value.as_str());
		}

		grouped
	}

	/// Iterates over the raw pairs in received order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of received pairs, repeated keys included.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no parameters were received.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for QueryParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self::from_pairs(iter)
	}
}

/// One inbound app-proxy request.
#[derive(Clone, Debug)]
pub struct InboundRequest {
	/// HTTP method; only `POST` triggers an update.
	pub method: Method,
	/// Decoded query parameters, signature included.
	pub query: QueryParams,
	/// Request headers as received.
	pub headers: HeaderMap,
	/// Raw body bytes (JSON for `POST`).
	pub body: Vec<u8>,
}
impl InboundRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, query: QueryParams) -> Self {
		Self { method, query, headers: HeaderMap::new(), body: Vec::new() }
	}

	/// Replaces the headers.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;

		self
	}

	/// Replaces the raw body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}

	/// Returns the `Host` header when present and valid UTF-8.
	pub fn host(&self) -> Option<&str> {
		self.headers.get(HOST).and_then(|value| value.to_str().ok())
	}

	/// Returns `true` for `POST` requests.
	pub fn is_update(&self) -> bool {
		self.method == Method::POST
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn parse_decodes_and_keeps_order() {
		let params = QueryParams::parse(
			"?shop=demo.myshopify.com&path_prefix=%2Fapps%2Fprofile&timestamp=1317327555&signature=abc",
		);
		let keys = params.iter().map(|(k, _)| k).collect::<Vec<_>>();

		assert_eq!(keys, ["shop", "path_prefix", "timestamp", "signature"]);
		assert_eq!(params.get("path_prefix").as_deref(), Some("/apps/profile"));
		assert_eq!(params.signature().as_deref(), Some("abc"));
	}

	#[test]
	fn repeated_keys_join_with_commas() {
		let params = QueryParams::from_pairs([("ids", "1"), ("shop", "s"), ("ids", "2")]);
		let grouped = params.grouped();

		assert_eq!(params.get("ids").as_deref(), Some("1,2"));
		assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), ["ids", "shop"]);
		assert_eq!(grouped["ids"], ["1", "2"]);
		assert_eq!(params.len(), 3);
	}

	#[test]
	fn host_reads_header() {
		let mut headers = HeaderMap::new();

		headers.insert(HOST, HeaderValue::from_static("relay.example.com"));

		let request =
			InboundRequest::new(Method::GET, QueryParams::default()).with_headers(headers);

		assert_eq!(request.host(), Some("relay.example.com"));
		assert!(!request.is_update());
	}
}
