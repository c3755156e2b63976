//! Operation counter behind the `metrics` feature.

// self
use crate::obs::{OpKind, OpOutcome};

/// Bumps `lufthansa_api_op_total` on the installed recorder; a no-op without `metrics`.
pub fn record_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"lufthansa_api_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
