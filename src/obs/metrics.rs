// self
use crate::obs::{Stage, StageOutcome};

/// Bumps `app_proxy_relay_stage_total` for `stage` and `outcome`.
///
/// Without the `metrics` feature this compiles to nothing.
pub fn record_stage_outcome(stage: Stage, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	{
		let counter = metrics::counter!(
			"app_proxy_relay_stage_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		);

		counter.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (stage, outcome);
}
