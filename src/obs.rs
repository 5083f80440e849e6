//! Stage spans and counters for the relay pipeline.
//!
//! Signature verification, the token exchange and the customer update each run inside an
//! `app_proxy_relay.stage` span. With the `metrics` feature the same call sites bump
//! `app_proxy_relay_stage_total{stage, outcome}`.

mod metrics;
mod span;

pub use metrics::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Pipeline stage of one invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// HMAC check of the inbound query.
	VerifySignature,
	/// Admin token minted from client credentials.
	TokenExchange,
	/// `PUT` of the customer resource.
	CustomerUpdate,
}
impl Stage {
	/// Label used for the `stage` span field and metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::VerifySignature => "verify_signature",
			Self::TokenExchange => "token_exchange",
			Self::CustomerUpdate => "customer_update",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Counter label for a stage entry or its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Recorded on entry.
	Attempt,
	/// The stage returned `Ok`.
	Success,
	/// The stage returned `Err`.
	Failure,
}
impl StageOutcome {
	/// Label used for the `outcome` metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Success => "success",
			Self::Failure => "failure",
		}
	}

	/// Picks [`StageOutcome::Success`] or [`StageOutcome::Failure`] from a stage result.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => Self::Success,
			Err(_) => Self::Failure,
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_snake_case() {
		assert_eq!(Stage::VerifySignature.to_string(), "verify_signature");
		assert_eq!(Stage::TokenExchange.as_str(), "token_exchange");
		assert_eq!(Stage::CustomerUpdate.as_str(), "customer_update");
		assert_eq!(StageOutcome::Attempt.to_string(), "attempt");
	}

	#[test]
	fn outcome_follows_result() {
		assert_eq!(StageOutcome::of::<(), ()>(&Err(())), StageOutcome::Failure);
		assert_eq!(StageOutcome::of::<_, ()>(&Ok(7)), StageOutcome::Success);
	}
}
