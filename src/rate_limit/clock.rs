//! Monotonic clock sources used by the rate limiter.

// self
use crate::_prelude::*;

/// Boxed future returned by [`Clock::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// Monotonic time source and sleeper consulted by [`DualRateLimiter`](super::DualRateLimiter).
///
/// Token refill is computed from [`Clock::now`] deltas only, so swapping the clock for a
/// [`ManualClock`] makes limiter behavior fully deterministic.
pub trait Clock
where
	Self: 'static + Send + Sync,
{
	/// Returns the current monotonic instant.
	fn now(&self) -> Instant;

	/// Suspends the caller for `duration` as measured by this clock.
	fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}

/// Wall-clock implementation backed by [`Instant::now`] and the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}

	fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
		Box::pin(tokio::time::sleep(duration))
	}
}

/// Hand-driven clock for tests; sleeping advances the clock instead of blocking.
///
/// Clones share the same timeline.
#[derive(Clone, Debug)]
pub struct ManualClock {
	origin: Instant,
	offset: Arc<Mutex<Duration>>,
}
impl ManualClock {
	/// Creates a clock anchored at the current instant.
	pub fn new() -> Self {
		Self { origin: Instant::now(), offset: Default::default() }
	}

	/// Moves the clock forward.
	///
	/// Advances that would push the clock past the largest representable [`Instant`] are
	/// ignored, so [`Clock::now`] never overflows.
	pub fn advance(&self, by: Duration) {
		let mut offset = self.offset.lock();
		let next = offset.saturating_add(by);

		if self.origin.checked_add(next).is_some() {
			*offset = next;
		}
	}

	/// Returns the total time the clock has been advanced since creation.
	pub fn elapsed(&self) -> Duration {
		*self.offset.lock()
	}
}
impl Default for ManualClock {
	fn default() -> Self {
		Self::new()
	}
}
impl Clock for ManualClock {
	fn now(&self) -> Instant {
		self.origin + self.elapsed()
	}

	fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
		self.advance(duration);

		Box::pin(std::future::ready(()))
	}
}
