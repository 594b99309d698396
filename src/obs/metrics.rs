// self
use crate::{
	_prelude::*,
	error::AuthError,
	obs::{CallOutcome, Endpoint},
	rate_limit::LimiterKind,
};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(endpoint: Endpoint, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"mot_history_call_total",
			"endpoint" => endpoint.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (endpoint, outcome);
	}
}

/// Records a limiter-imposed wait before a call proceeds.
pub fn record_rate_limit_wait(limiter: LimiterKind, wait: Duration) {
	#[cfg(feature = "tracing")]
	tracing::debug!(
		limiter = limiter.as_str(),
		wait_ms = wait.as_millis() as u64,
		"waiting for quota"
	);

	#[cfg(feature = "metrics")]
	{
		metrics::histogram!(
			"mot_history_rate_limit_wait_seconds",
			"limiter" => limiter.as_str()
		)
		.record(wait.as_secs_f64());
	}

	#[cfg(not(any(feature = "tracing", feature = "metrics")))]
	{
		let _ = (limiter, wait);
	}
}

/// Records a permit refused by the active wait policy.
pub fn record_quota_exceeded(limiter: LimiterKind, retry_after: Option<Duration>) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		limiter = limiter.as_str(),
		retry_after_ms = retry_after.map(|wait| wait.as_millis() as u64),
		"quota exhausted"
	);

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (limiter, retry_after);
	}
}

/// Records a caller parked on a bucket that can never refill.
pub fn record_unbounded_wait(limiter: LimiterKind) {
	#[cfg(feature = "tracing")]
	tracing::warn!(limiter = limiter.as_str(), "bucket can never refill; blocking indefinitely");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = limiter;
	}
}

/// Records a failed bearer-token exchange.
pub fn record_token_failure(error: &AuthError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(%error, "bearer token exchange failed");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
