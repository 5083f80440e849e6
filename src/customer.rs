//! Customer identifiers and update payloads.
//!
//! Storefront themes usually hand over the namespaced resource reference
//! (`gid://shopify/Customer/12345`) while the REST admin API wants the bare id, so every id is
//! passed through [`normalize_customer_id`] before it reaches a URL or payload.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

const CUSTOMER_MARKER: &str = "Customer/";

/// Validation failures for inbound update bodies.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// Body is not JSON or does not match the expected shape.
	#[error("Request body is invalid at `{path}`: {message}")]
	MalformedBody {
		/// JSON path of the offending field (`.` for the root).
		path: String,
		/// Parser message.
		message: String,
	},
	/// A required field was present but empty.
	#[error("The `{field}` field must not be empty.")]
	EmptyField {
		/// Wire name of the field.
		field: &'static str,
	},
}

/// Strips a namespaced-resource prefix, keeping whatever follows the last `Customer/`.
///
/// Inputs without the marker are returned unchanged.
pub fn normalize_customer_id(raw: &str) -> &str {
	match raw.rfind(CUSTOMER_MARKER) {
		Some(idx) => &raw[idx + CUSTOMER_MARKER.len()..],
		None => raw,
	}
}

/// Bare, non-empty customer identifier ready for the admin API.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct CustomerId(String);
impl CustomerId {
	/// Normalizes `raw` and rejects an empty result.
	pub fn parse(raw: &str) -> Result<Self, ValidationError> {
		let id = normalize_customer_id(raw.trim()).trim();

		if id.is_empty() {
			return Err(ValidationError::EmptyField { field: "customerId" });
		}

		Ok(Self(id.to_owned()))
	}
}
impl Deref for CustomerId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for CustomerId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<CustomerId> for String {
	fn from(value: CustomerId) -> Self {
		value.0
	}
}
impl Debug for CustomerId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "CustomerId({})", self.0)
	}
}
impl Display for CustomerId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for CustomerId {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// JSON body posted by the storefront theme.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateRequest {
	/// Bare or namespaced customer id.
	pub customer_id: String,
	/// New first name.
	pub first_name: String,
	/// Optional new phone number.
	#[serde(default)]
	pub phone: Option<String>,
}
impl CustomerUpdateRequest {
	/// Decodes and validates a raw JSON body.
	pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
		let de = &mut serde_json::Deserializer::from_slice(body);
		let request: Self = serde_path_to_error::deserialize(de).map_err(|e| {
			ValidationError::MalformedBody {
				path: e.path().to_string(),
				message: e.inner().to_string(),
			}
		})?;

		if request.first_name.trim().is_empty() {
			return Err(ValidationError::EmptyField { field: "firstName" });
		}

		Ok(request)
	}

	/// Builds the validated update, normalizing the id and applying the phone policy.
	pub fn into_update(self, forward_phone: bool) -> Result<CustomerUpdate, ValidationError> {
		let id = CustomerId::parse(&self.customer_id)?;
		let phone =
			if forward_phone { self.phone.filter(|phone| !phone.trim().is_empty()) } else { None };

		Ok(CustomerUpdate { id, first_name: self.first_name, phone })
	}
}

/// Profile fields forwarded to the admin API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomerUpdate {
	/// Normalized customer id.
	pub id: CustomerId,
	/// New first name.
	pub first_name: String,
	/// New phone number; omitted from the payload when absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
}

/// Outbound envelope: `{ "customer": { "id", "first_name"[, "phone"] } }`.
#[derive(Clone, Debug, Serialize)]
pub struct CustomerPayload<'a> {
	/// Wrapped update.
	pub customer: &'a CustomerUpdate,
}
