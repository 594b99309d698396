//! Optional observability helpers for API calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to run every call inside a span named `mot_history.call`
//!   with `endpoint` and `method` fields, and to emit debug/warn events for limiter waits,
//!   quota refusals, and token failures.
//! - Enable `metrics` to increment the `mot_history_call_total` counter for every
//!   attempt/success/failure, labeled by `endpoint` + `outcome`, and to record limiter waits in
//!   the `mot_history_rate_limit_wait_seconds` histogram labeled by `limiter`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// API endpoints exposed by the client facade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// `GET /registration/{registration}`.
	Registration,
	/// `GET /vin/{vin}`.
	Vin,
	/// `GET /bulk-download`.
	BulkDownload,
	/// `PUT /credentials`.
	Credentials,
}
impl Endpoint {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Registration => "registration",
			Endpoint::Vin => "vin",
			Endpoint::BulkDownload => "bulk_download",
			Endpoint::Credentials => "credentials",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to the dispatcher.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
