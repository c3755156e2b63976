//! Cancellable, deadline-bearing call context threaded through every network operation.
//!
//! A [`Context`] pairs a [`CancellationToken`] with an optional deadline. Rate-limiter waits,
//! token exchanges, and HTTP calls all run through [`Context::run`], so canceling the token or
//! crossing the deadline aborts whichever stage is in flight. Derived contexts (`child`,
//! `with_timeout`, `with_deadline`) are canceled whenever their parent is.

// crates.io
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
// self
use crate::{_prelude::*, error::TransportError};

/// Cancellation handle plus optional deadline.
#[derive(Clone, Debug, Default)]
pub struct Context {
	token: CancellationToken,
	deadline: Option<Instant>,
}
impl Context {
	/// Creates a root context with no deadline.
	pub fn new() -> Self {
		Self::default()
	}

	/// Derives a context that is canceled with `self` but can also be canceled on its own.
	pub fn child(&self) -> Self {
		Self { token: self.token.child_token(), deadline: self.deadline }
	}

	/// Derives a child context that expires `timeout` from now (or earlier, if the parent's
	/// deadline comes first).
	pub fn with_timeout(&self, timeout: StdDuration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Derives a child context that expires at `deadline` (or earlier, if the parent's deadline
	/// comes first).
	pub fn with_deadline(&self, deadline: Instant) -> Self {
		let deadline = match self.deadline {
			Some(current) if current <= deadline => current,
			_ => deadline,
		};

		Self { token: self.token.child_token(), deadline: Some(deadline) }
	}

	/// Cancels this context and every context derived from it.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	/// Returns `true` once the context has been canceled.
	pub fn is_canceled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Deadline carried by the context, if any.
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Fails fast if the context is already canceled or past its deadline.
	pub fn check(&self) -> Result<()> {
		if self.is_canceled() {
			return Err(TransportError::Canceled.into());
		}
		if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
			return Err(TransportError::DeadlineExceeded.into());
		}

		Ok(())
	}

	/// Drives `fut` to completion unless the context is canceled or its deadline passes first.
	///
	/// Cancellation is polled before the deadline, and both before the future itself.
	pub async fn run<F>(&self, fut: F) -> Result<F::Output>
	where
		F: Future,
	{
		self.check()?;

		let deadline = async {
			match self.deadline {
				Some(at) => tokio::time::sleep_until(at).await,
				None => std::future::pending::<()>().await,
			}
		};

		tokio::select! {
			biased;

			_ = self.token.cancelled() => Err(TransportError::Canceled.into()),
			_ = deadline => Err(TransportError::DeadlineExceeded.into()),
			output = fut => Ok(output),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn run_returns_output_when_not_canceled() {
		let ctx = Context::new();
		let value = ctx.run(async { 7 }).await.expect("Live context should run the future.");

		assert_eq!(value, 7);
	}

	#[tokio::test]
	async fn canceled_parent_cancels_children() {
		let parent = Context::new();
		let child = parent.child();

		parent.cancel();

		assert!(child.is_canceled());

		let err = child.run(async { 1 }).await.expect_err("Canceled context must not run.");

		assert!(matches!(err, Error::Transport(TransportError::Canceled)));
	}

	#[tokio::test(start_paused = true)]
	async fn deadline_interrupts_slow_future() {
		let ctx = Context::new().with_timeout(StdDuration::from_millis(50));
		let err = ctx
			.run(tokio::time::sleep(StdDuration::from_secs(5)))
			.await
			.expect_err("Deadline should interrupt the sleep.");

		assert!(matches!(err, Error::Transport(TransportError::DeadlineExceeded)));
	}

	#[test]
	fn child_deadline_never_extends_parent() {
		let now = Instant::now();
		let parent = Context::new().with_deadline(now + StdDuration::from_secs(1));
		let child = parent.with_deadline(now + StdDuration::from_secs(10));

		assert_eq!(child.deadline(), Some(now + StdDuration::from_secs(1)));
	}
}
