//! Dual token-bucket quota gate consulted before every outbound API call.
//!
//! The upstream API enforces two budgets at once: a short burst/requests-per-second window and
//! a daily quota. [`DualRateLimiter`] keeps one [`TokenBucket`] for each, checks the daily bucket
//! first, and only charges either bucket when both can pay. Refill is lazy and driven by the
//! injected [`Clock`]; nothing runs in the background.

mod bucket;
mod clock;

pub use bucket::*;
pub use clock::*;

// self
use crate::{_prelude::*, config::RateLimitConfig, error::ConfigError, obs};

/// Identifies which bucket produced a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimiterKind {
	/// Long-window daily quota.
	Daily,
	/// Short burst/requests-per-second window.
	ShortWindow,
}
impl LimiterKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LimiterKind::Daily => "daily",
			LimiterKind::ShortWindow => "short_window",
		}
	}
}
impl Display for LimiterKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			LimiterKind::Daily => f.write_str("daily"),
			LimiterKind::ShortWindow => f.write_str("short-window"),
		}
	}
}

/// How [`DualRateLimiter::acquire`] behaves when no token is available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitPolicy {
	/// Sleep until a token becomes available, however long that takes.
	#[default]
	Block,
	/// Fail immediately with [`Error::QuotaExceeded`].
	NonBlocking,
	/// Wait as long as the total wait stays within the given budget; fail otherwise.
	Deadline(Duration),
}

/// Result emitted by [`DualRateLimiter::try_acquire`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// A token was taken from both buckets; the call may proceed.
	Allow,
	/// No token was taken; the call should be delayed.
	Delay(RetryDirective),
}

/// Advises callers when to retry after a [`RateLimitDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Bucket that ran dry.
	pub limiter: LimiterKind,
	/// Time until that bucket holds a token; `None` if it never will.
	pub wait: Option<Duration>,
}
impl RetryDirective {
	/// Creates a new directive for the provided limiter.
	pub fn new(limiter: LimiterKind, wait: Option<Duration>) -> Self {
		Self { limiter, wait }
	}

	fn into_error(self) -> Error {
		Error::QuotaExceeded { limiter: self.limiter, retry_after: self.wait }
	}
}

/// Outcome of a successful [`DualRateLimiter::acquire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permit {
	/// Granted without waiting.
	Immediate,
	/// Granted after waiting for the given duration.
	AfterWait(Duration),
}
impl Permit {
	/// Time spent waiting for the permit.
	pub fn waited(&self) -> Duration {
		match self {
			Self::Immediate => Duration::ZERO,
			Self::AfterWait(waited) => *waited,
		}
	}
}

/// Short-window plus daily token buckets sharing one clock.
pub struct DualRateLimiter {
	daily: Mutex<TokenBucket>,
	short_window: Mutex<TokenBucket>,
	clock: Arc<dyn Clock>,
}
impl DualRateLimiter {
	/// Builds both buckets from `config`, starting full at the clock's current instant.
	pub fn new(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
		config.validate()?;

		let now = clock.now();
		let daily = TokenBucket::new(config.daily_rate(), config.daily_quota as f64, now);
		let short_window =
			TokenBucket::new(config.requests_per_second, f64::from(config.burst), now);

		Ok(Self { daily: Mutex::new(daily), short_window: Mutex::new(short_window), clock })
	}

	/// Clock driving refills and waits.
	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.clock
	}

	/// Takes one token from each bucket if both can pay, without waiting.
	///
	/// The daily bucket is consulted first; a caller held back by either bucket is not charged
	/// by the other.
	pub fn try_acquire(&self) -> RateLimitDecision {
		let now = self.clock.now();
		let mut daily = self.daily.lock();
		let mut short_window = self.short_window.lock();

		daily.refill(now);
		short_window.refill(now);

		if !daily.has_token() {
			return RateLimitDecision::Delay(RetryDirective::new(
				LimiterKind::Daily,
				daily.time_to_token(),
			));
		}
		if !short_window.has_token() {
			return RateLimitDecision::Delay(RetryDirective::new(
				LimiterKind::ShortWindow,
				short_window.time_to_token(),
			));
		}

		daily.consume();
		short_window.consume();

		RateLimitDecision::Allow
	}

	/// Obtains a permit, waiting on the clock as allowed by `policy`.
	///
	/// Under [`WaitPolicy::Block`] a bucket that can never refill suspends the caller forever;
	/// drop the future to cancel.
	pub async fn acquire(&self, policy: WaitPolicy) -> Result<Permit> {
		let started = self.clock.now();

		loop {
			let directive = match self.try_acquire() {
				RateLimitDecision::Allow => {
					let waited = self.clock.now().saturating_duration_since(started);

					return Ok(if waited.is_zero() {
						Permit::Immediate
					} else {
						Permit::AfterWait(waited)
					});
				},
				RateLimitDecision::Delay(directive) => directive,
			};
			let wait = match (policy, directive.wait) {
				(WaitPolicy::Block, Some(wait)) => wait,
				(WaitPolicy::Block, None) => {
					obs::record_unbounded_wait(directive.limiter);

					match std::future::pending::<std::convert::Infallible>().await {}
				},
				(WaitPolicy::Deadline(budget), Some(wait))
					if self
						.clock
						.now()
						.saturating_duration_since(started)
						.saturating_add(wait) <= budget =>
					wait,
				(WaitPolicy::Deadline(_) | WaitPolicy::NonBlocking, _) => {
					obs::record_quota_exceeded(directive.limiter, directive.wait);

					return Err(directive.into_error());
				},
			};

			obs::record_rate_limit_wait(directive.limiter, wait);
			self.clock.sleep(wait).await;
		}
	}

	/// Current daily bucket level, as of the clock's current instant.
	pub fn daily_tokens(&self) -> f64 {
		self.daily.lock().tokens_at(self.clock.now())
	}

	/// Current short-window bucket level, as of the clock's current instant.
	pub fn short_window_tokens(&self) -> f64 {
		self.short_window.lock().tokens_at(self.clock.now())
	}
}
impl Debug for DualRateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DualRateLimiter")
			.field("daily", &*self.daily.lock())
			.field("short_window", &*self.short_window.lock())
			.finish()
	}
}
