//! Spans and counters around token exchanges, fetches, and cursor navigation.
//!
//! Both outputs compile away unless their feature is on:
//!
//! - `tracing`: each operation runs inside an `info` span `lufthansa_api.op` carrying `op` and
//!   `stage` fields, where `stage` names the entry point (`ensure_valid`, `next`, ..).
//! - `metrics`: the counter `lufthansa_api_op_total{op, outcome}` is bumped once on entry and
//!   once more on completion.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Kind of work being observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Client-credentials token exchange.
	TokenExchange,
	/// Authorized resource fetch.
	Fetch,
	/// Cursor navigation (seed, next, previous, first, last, reload).
	Navigate,
}
impl OpKind {
	/// Label used for the `op` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenExchange => "token_exchange",
			OpKind::Fetch => "fetch",
			OpKind::Navigate => "navigate",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Point in an operation's life at which the counter is bumped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// The operation started.
	Attempt,
	/// The operation returned `Ok`.
	Success,
	/// The operation returned an error.
	Failure,
}
impl OpOutcome {
	/// Label used for the `outcome` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
