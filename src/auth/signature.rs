//! App-proxy signature canonicalization and HMAC-SHA256 verification.
//!
//! The storefront proxy signs every forwarded request by sorting the query parameters (minus
//! `signature`) by key, concatenating them as `key=value` with **no separator**, and keying
//! HMAC-SHA256 with the app's shared secret. The digest travels as lowercase hex in the
//! `signature` parameter. This is not a query-string encoding, so [`canonicalize`] must stay
//! byte-for-byte compatible with the caller.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
// self
use crate::{_prelude::*, auth::Secret, request::QueryParams};

type HmacSha256 = Hmac<Sha256>;

/// How a request without a `signature` parameter is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingSignaturePolicy {
	/// Report [`SignatureError::Missing`] (`"Missing Signature"`).
	#[default]
	Distinct,
	/// Fold the missing case into [`SignatureError::Invalid`] (`"Invalid Signature"`).
	TreatAsInvalid,
}

/// Verification failures; both variants reject the request before any side effect.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SignatureError {
	/// The `signature` parameter was absent or empty.
	#[error("Request is missing the signature parameter.")]
	Missing,
	/// The supplied signature does not match the recomputed digest.
	#[error("Request signature does not match.")]
	Invalid {
		/// Signature supplied by the caller (empty when it was missing).
		received: String,
		/// Digest recomputed by the relay (empty when no digest was computed).
		calculated: String,
	},
	/// The shared secret was rejected by the HMAC key schedule.
	#[error("Shared secret cannot key HMAC-SHA256.")]
	UnusableKey,
}

/// Builds the signed string: sorted `key=value` pairs, concatenated, `signature` excluded.
///
/// Repeated keys contribute a single `key=v1,v2` entry.
pub fn canonicalize(params: &QueryParams) -> String {
	params
		.grouped()
		.into_iter()
		.filter(|(key, _)| *key != QueryParams::SIGNATURE)
		.fold(String::new(), |mut buf, (key, values)| {
			buf.push_str(key);
			buf.push('=');
			buf.push_str(&values.join(","));

			buf
		})
}

/// Computes the lowercase hex HMAC-SHA256 of `canonical` keyed with `secret`.
pub fn sign(secret: &Secret, canonical: &str) -> Result<String, SignatureError> {
	let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
		.map_err(|_| SignatureError::UnusableKey)?;

	mac.update(canonical.as_bytes());

	Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies the `signature` parameter of `params` against `secret`.
///
/// A missing or empty signature fails before any digest is computed. The comparison is exact string
/// equality, evaluated in constant time.
pub fn verify(
	params: &QueryParams,
	secret: &Secret,
	policy: MissingSignaturePolicy,
) -> Result<(), SignatureError> {
	let Some(received) = params.signature().filter(|signature| !signature.is_empty()) else {
		return Err(match policy {
			MissingSignaturePolicy::Distinct => SignatureError::Missing,
			MissingSignaturePolicy::TreatAsInvalid =>
				SignatureError::Invalid { received: String::new(), calculated: String::new() },
		});
	};
	let calculated = sign(secret, &canonicalize(params))?;

	tracing::debug!(calculated = %calculated, received = %received, "Recomputed proxy signature.");

	if digests_match(&received, &calculated) {
		Ok(())
	} else {
		Err(SignatureError::Invalid { received, calculated })
	}
}

fn digests_match(received: &str, calculated: &str) -> bool {
	received.len() == calculated.len()
		&& bool::from(received.as_bytes().ct_eq(calculated.as_bytes()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const SECRET: &str = "hush";

	fn storefront_params() -> QueryParams {
		QueryParams::from_pairs([
			("shop", "some-shop.myshopify.com"),
			("logged_in_customer_id", ""),
			("path_prefix", "/apps/awesome_reviews"),
			("timestamp", "1317327555"),
		])
	}

	fn signed(mut params: QueryParams) -> QueryParams {
		let signature = sign(&Secret::new(SECRET), &canonicalize(&params))
			.expect("Signing fixture parameters should succeed.");

		params.push(QueryParams::SIGNATURE, signature);

		params
	}

	#[test]
	fn canonical_string_concatenates_sorted_pairs_without_separator() {
		assert_eq!(
			canonicalize(&storefront_params()),
			"logged_in_customer_id=path_prefix=/apps/awesome_reviewsshop=some-shop.myshopify.comtimestamp=1317327555",
		);
	}

	#[test]
	fn canonical_string_ignores_signature_and_input_order() {
		let forward = signed(storefront_params());
		let mut pairs = forward.iter().collect::<Vec<_>>();

		pairs.reverse();

		let reversed = QueryParams::from_pairs(pairs);

		assert_eq!(canonicalize(&forward), canonicalize(&storefront_params()));
		assert_eq!(canonicalize(&forward), canonicalize(&reversed));
		assert!(verify(&reversed, &Secret::new(SECRET), MissingSignaturePolicy::Distinct).is_ok());
	}

	#[test]
	fn sign_matches_known_vector() {
		// HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog").
		assert_eq!(
			sign(&Secret::new("key"), "The quick brown fox jumps over the lazy dog")
				.expect("Signing the reference vector should succeed."),
			"f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8",
		);
	}

	#[test]
	fn valid_signature_verifies() {
		let params = signed(storefront_params());

		assert_eq!(verify(&params, &Secret::new(SECRET), MissingSignaturePolicy::Distinct), Ok(()));
	}

	#[test]
	fn single_character_mutations_fail() {
		let params = signed(storefront_params());
		let signature = params.signature().expect("Signed fixture should carry a signature.");

		for idx in 0..signature.len() {
			let mut mutated = signature.clone().into_bytes();

			mutated[idx] = if mutated[idx] == b'0' { b'1' } else { b'0' };

			let mut tampered = storefront_params();

			tampered.push(
				QueryParams::SIGNATURE,
				String::from_utf8(mutated).expect("Hex digest should stay UTF-8."),
			);

			assert!(matches!(
				verify(&tampered, &Secret::new(SECRET), MissingSignaturePolicy::Distinct),
				Err(SignatureError::Invalid { .. })
			));
		}
	}

	#[test]
	fn uppercase_hex_is_not_equal() {
		let params = signed(storefront_params());
		let upper = params
			.signature()
			.expect("Signed fixture should carry a signature.")
			.to_uppercase();
		let mut tampered = storefront_params();

		tampered.push(QueryParams::SIGNATURE, upper);

		assert!(verify(&tampered, &Secret::new(SECRET), MissingSignaturePolicy::Distinct).is_err());
	}

	#[test]
	fn tampered_parameter_fails() {
		let mut params = signed(storefront_params());

		params.push("extra", "1");

		assert!(matches!(
			verify(&params, &Secret::new(SECRET), MissingSignaturePolicy::Distinct),
			Err(SignatureError::Invalid { .. })
		));
	}

	#[test]
	fn missing_signature_follows_policy() {
		let params = storefront_params();

		assert_eq!(
			verify(&params, &Secret::new(SECRET), MissingSignaturePolicy::Distinct),
			Err(SignatureError::Missing)
		);
		assert_eq!(
			verify(&params, &Secret::new(SECRET), MissingSignaturePolicy::TreatAsInvalid),
			Err(SignatureError::Invalid { received: String::new(), calculated: String::new() })
		);
	}

	#[test]
	fn empty_signature_counts_as_missing() {
		let params = QueryParams::parse("shop=demo&signature=");

		assert_eq!(params.signature().as_deref(), Some(""));
		assert_eq!(
			verify(&params, &Secret::new(SECRET), MissingSignaturePolicy::Distinct),
			Err(SignatureError::Missing)
		);
		assert_eq!(
			verify(&params, &Secret::new(SECRET), MissingSignaturePolicy::TreatAsInvalid),
			Err(SignatureError::Invalid { received: String::new(), calculated: String::new() })
		);
	}
}
