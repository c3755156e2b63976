//! Rate-limited dispatch shared by token exchanges and resource fetches.
//!
//! Every outbound call waits on the per-second limiter, then on the per-hour limiter, and only
//! then reaches the [`HttpClient`]. Token exchanges count against the same ceilings as resource
//! fetches because they travel through the same [`RateLimitedTransport`].

pub mod limiter;

pub use limiter::RateLimiter;

// crates.io
use oauth2::AsyncHttpClient;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	http::{self, HttpClient, HttpClientError, HttpRequest, HttpResponse},
};

/// HTTP dispatcher that gates each call behind an ordered list of [`RateLimiter`]s.
#[derive(Debug)]
pub struct RateLimitedTransport<C>
where
	C: ?Sized + HttpClient,
{
	client: Arc<C>,
	limiters: Vec<RateLimiter>,
}
impl<C> RateLimitedTransport<C>
where
	C: ?Sized + HttpClient,
{
	/// Builds a transport with the per-second and per-hour ceilings from `config`.
	pub fn from_config(client: impl Into<Arc<C>>, config: &ClientConfig) -> Self {
		Self::with_limiters(
			client,
			vec![
				RateLimiter::per_second(config.requests_per_second),
				RateLimiter::per_hour(config.requests_per_hour),
			],
		)
	}

	/// Builds a transport waiting on `limiters` in the given order.
	pub fn with_limiters(client: impl Into<Arc<C>>, limiters: Vec<RateLimiter>) -> Self {
		Self { client: client.into(), limiters }
	}

	/// Limiters consulted by [`send`](Self::send), in wait order.
	pub fn limiters(&self) -> &[RateLimiter] {
		&self.limiters
	}

	/// Underlying HTTP client.
	pub fn client(&self) -> &Arc<C> {
		&self.client
	}

	/// Waits for every limiter in order, then executes `request` under `ctx`.
	///
	/// A limiter wait that is canceled (or would outlive the context deadline) aborts the call
	/// before anything is sent, and the tokens already granted by earlier limiters go back to
	/// their buckets. The client is never invoked under a canceled context.
	pub async fn send(&self, ctx: &Context, request: HttpRequest) -> Result<HttpResponse> {
		for (i, limiter) in self.limiters.iter().enumerate() {
			if let Err(e) = limiter.wait(ctx).await {
				self.limiters[..i].iter().for_each(RateLimiter::release);

				return Err(e);
			}
		}

		ctx.check()?;
		ctx.run(async { self.client.execute(request).await })
			.await?
			.map_err(http::map_http_client_error)
	}

	/// Borrows the transport as an [`AsyncHttpClient`] bound to `ctx`, for the OAuth client.
	pub(crate) fn handle<'a>(&'a self, ctx: &'a Context) -> TransportHandle<'a, C> {
		TransportHandle { transport: self, ctx }
	}
}

/// [`AsyncHttpClient`] adapter routing OAuth requests through a [`RateLimitedTransport`].
///
/// Client errors travel inside [`HttpClientError::Reqwest`] and are unwrapped again by the
/// OAuth facade, so cancellation and deadline failures keep their identity.
pub(crate) struct TransportHandle<'a, C>
where
	C: ?Sized + HttpClient,
{
	transport: &'a RateLimitedTransport<C>,
	ctx: &'a Context,
}
impl<'c, 'a, C> AsyncHttpClient<'c> for TransportHandle<'a, C>
where
	C: ?Sized + HttpClient,
{
	type Error = HttpClientError<Error>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let transport = self.transport;
		let ctx = self.ctx;

		Box::pin(async move {
			transport.send(ctx, request).await.map_err(|e| HttpClientError::Reqwest(Box::new(e)))
		})
	}
}
