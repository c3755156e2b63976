//! Token-bucket rate limiter with reservation semantics.
//!
//! A bucket holds at most `capacity` tokens and refills continuously at `capacity` tokens per
//! `period`. [`RateLimiter::wait`] reserves a token immediately (the balance may go negative)
//! and sleeps until the reservation matures, so concurrent waiters are served in reservation
//! order. A wait abandoned through cancellation hands its token back.

// crates.io
use tokio::time::Instant;
// self
use crate::{_prelude::*, error::TransportError};

#[derive(Debug)]
struct Bucket {
	tokens: f64,
	refilled_at: Instant,
}

/// Token bucket granting `capacity` calls per `period`.
#[derive(Debug)]
pub struct RateLimiter {
	capacity: u32,
	period: StdDuration,
	bucket: Mutex<Bucket>,
}
impl RateLimiter {
	/// Creates a full bucket.
	pub fn new(capacity: u32, period: StdDuration) -> Self {
		let capacity = capacity.max(1);

		Self {
			capacity,
			period,
			bucket: Mutex::new(Bucket { tokens: f64::from(capacity), refilled_at: Instant::now() }),
		}
	}

	/// Limiter allowing `limit` calls per second.
	pub fn per_second(limit: u32) -> Self {
		Self::new(limit, StdDuration::from_secs(1))
	}

	/// Limiter allowing `limit` calls per hour.
	pub fn per_hour(limit: u32) -> Self {
		Self::new(limit, StdDuration::from_secs(3_600))
	}

	/// Maximum burst size.
	pub fn capacity(&self) -> u32 {
		self.capacity
	}

	/// Refill period.
	pub fn period(&self) -> StdDuration {
		self.period
	}

	/// Tokens currently available (negative while reservations are outstanding).
	pub fn available(&self) -> f64 {
		let mut bucket = self.bucket.lock();

		self.refill(&mut bucket, Instant::now());

		bucket.tokens
	}

	/// Waits until a token is granted.
	///
	/// Returns [`TransportError::DeadlineExceeded`] without waiting when the grant would land
	/// after the context deadline, and [`TransportError::Canceled`] when the context is canceled
	/// mid-wait. In both cases the reserved token is returned to the bucket.
	pub async fn wait(&self, ctx: &Context) -> Result<()> {
		ctx.check()?;

		let now = Instant::now();
		let delay = self.reserve(now);

		if delay.is_zero() {
			return Ok(());
		}
		if ctx.deadline().is_some_and(|deadline| now + delay > deadline) {
			self.release();

			return Err(TransportError::DeadlineExceeded.into());
		}

		match ctx.run(tokio::time::sleep(delay)).await {
			Ok(()) => Ok(()),
			Err(e) => {
				self.release();

				Err(e)
			},
		}
	}

	fn rate_per_sec(&self) -> f64 {
		f64::from(self.capacity) / self.period.as_secs_f64().max(f64::EPSILON)
	}

	fn refill(&self, bucket: &mut Bucket, now: Instant) {
		let elapsed = now.saturating_duration_since(bucket.refilled_at).as_secs_f64();

		bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec()).min(f64::from(self.capacity));
		bucket.refilled_at = now;
	}

	fn reserve(&self, now: Instant) -> StdDuration {
		let mut bucket = self.bucket.lock();

		self.refill(&mut bucket, now);

		bucket.tokens -= 1.;

		if bucket.tokens >= 0. {
			StdDuration::ZERO
		} else {
			StdDuration::from_secs_f64(-bucket.tokens / self.rate_per_sec())
		}
	}

	/// Returns one token to the bucket, capped at capacity.
	pub(crate) fn release(&self) {
		let mut bucket = self.bucket.lock();

		bucket.tokens = (bucket.tokens + 1.).min(f64::from(self.capacity));
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn burst_is_free_then_waits_for_refill() {
		let limiter = RateLimiter::per_second(2);
		let ctx = Context::new();
		let start = Instant::now();

		limiter.wait(&ctx).await.expect("First token should be granted.");
		limiter.wait(&ctx).await.expect("Second token should be granted.");

		assert_eq!(Instant::now(), start);

		limiter.wait(&ctx).await.expect("Third token should be granted after refill.");

		assert!(Instant::now() - start >= StdDuration::from_millis(500));
	}

	#[tokio::test(start_paused = true)]
	async fn cancellation_returns_the_reservation() {
		let limiter = RateLimiter::per_second(1);
		let ctx = Context::new();

		limiter.wait(&ctx).await.expect("Initial token should be granted.");

		let canceled = ctx.child();
		let canceler = canceled.clone();

		tokio::spawn(async move {
			tokio::time::sleep(StdDuration::from_millis(100)).await;
			canceler.cancel();
		});

		let err = limiter.wait(&canceled).await.expect_err("Canceled wait must fail.");
		let available = limiter.available();

		assert!(err.is_canceled());
		assert!(available > 0. && available < 0.5);
	}

	#[tokio::test(start_paused = true)]
	async fn deadline_shorter_than_delay_fails_fast() {
		let limiter = RateLimiter::per_hour(1);
		let ctx = Context::new();

		limiter.wait(&ctx).await.expect("Initial token should be granted.");

		let short = ctx.with_timeout(StdDuration::from_secs(1));
		let start = Instant::now();
		let err = limiter.wait(&short).await.expect_err("Wait beyond the deadline must fail.");

		assert!(matches!(err, Error::Transport(TransportError::DeadlineExceeded)));
		assert_eq!(Instant::now(), start);
	}
}
