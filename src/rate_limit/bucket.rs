//! Lazily refilled token bucket.

// self
use crate::_prelude::*;

// Absorbs floating-point drift so a bucket refilled for exactly `1 / rate` seconds holds a token.
const TOKEN_EPSILON: f64 = 1e-9;

/// Token bucket whose level is recomputed from elapsed time on every access.
///
/// The level always stays within `[0, capacity]`. Buckets start full.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBucket {
	rate: f64,
	capacity: f64,
	tokens: f64,
	last_refill: Instant,
}
impl TokenBucket {
	/// Creates a full bucket refilling at `rate` tokens per second.
	pub fn new(rate: f64, capacity: f64, now: Instant) -> Self {
		let capacity = capacity.max(0.);

		Self { rate: rate.max(0.), capacity, tokens: capacity, last_refill: now }
	}

	/// Replenishment rate in tokens per second.
	pub fn rate(&self) -> f64 {
		self.rate
	}

	/// Maximum number of tokens the bucket can hold.
	pub fn capacity(&self) -> f64 {
		self.capacity
	}

	/// Returns the level the bucket would have at `now` without mutating it.
	pub fn tokens_at(&self, now: Instant) -> f64 {
		let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();

		if elapsed == 0. || self.rate == 0. {
			return self.tokens;
		}

		(self.tokens + elapsed * self.rate).min(self.capacity)
	}

	pub(crate) fn refill(&mut self, now: Instant) {
		self.tokens = self.tokens_at(now);

		if now > self.last_refill {
			self.last_refill = now;
		}
	}

	pub(crate) fn has_token(&self) -> bool {
		self.tokens + TOKEN_EPSILON >= 1.
	}

	pub(crate) fn consume(&mut self) {
		self.tokens = (self.tokens - 1.).max(0.);
	}

	/// Time until one whole token is available; `None` when the bucket can never hold one.
	pub(crate) fn time_to_token(&self) -> Option<Duration> {
		if self.has_token() {
			return Some(Duration::ZERO);
		}
		if self.capacity + TOKEN_EPSILON < 1. || self.rate == 0. {
			return None;
		}

		let nanos = ((1. - self.tokens) / self.rate * 1e9).ceil();

		if !nanos.is_finite() || nanos >= u64::MAX as f64 {
			return None;
		}

		Some(Duration::from_nanos(nanos as u64).max(Duration::from_nanos(1)))
	}
}
