//! Cached client-credentials token with a double-checked, single-flight refresh.
//!
//! [`TokenManager::ensure_valid`] reads the cached token under a shared lock and returns it when
//! it has not expired. Otherwise it escalates to the exclusive lock, re-checks (another caller
//! may have refreshed while this one waited), and only then calls the token endpoint. Callers
//! queued behind an in-flight exchange therefore reuse its result instead of issuing their own.
//! A failed exchange leaves nothing cached, so the next call retries.

// crates.io
use async_lock::{RwLockReadGuard, RwLockWriteGuard};
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, TokenMetrics},
	config::ClientConfig,
	http::HttpClient,
	oauth::ClientCredentialsFacade,
	obs::{self, OpKind, OpOutcome, OpSpan},
	transport::RateLimitedTransport,
};

/// Owns the cached [`BearerToken`] for one client.
pub struct TokenManager<C>
where
	C: ?Sized + HttpClient,
{
	transport: Arc<RateLimitedTransport<C>>,
	facade: ClientCredentialsFacade,
	cached: AsyncRwLock<Option<BearerToken>>,
	metrics: TokenMetrics,
}
impl<C> TokenManager<C>
where
	C: ?Sized + HttpClient,
{
	/// Creates an empty manager exchanging `config` credentials through `transport`.
	pub fn new(config: &ClientConfig, transport: Arc<RateLimitedTransport<C>>) -> Result<Self> {
		Ok(Self {
			transport,
			facade: ClientCredentialsFacade::from_config(config)?,
			cached: AsyncRwLock::new(None),
			metrics: TokenMetrics::default(),
		})
	}

	/// Exchange counters.
	pub fn metrics(&self) -> &TokenMetrics {
		&self.metrics
	}

	/// Currently cached token, valid or not.
	pub async fn current(&self) -> Option<BearerToken> {
		self.cached.read().await.clone()
	}

	/// Returns a token that is valid right now, exchanging credentials at most once per expiry.
	pub async fn ensure_valid(&self, ctx: &Context) -> Result<BearerToken> {
		const KIND: OpKind = OpKind::TokenExchange;

		if let Some(token) = self.read().await.as_ref().filter(|token| token.is_valid()) {
			return Ok(token.clone());
		}

		let mut cached = ctx.run(self.lock()).await?;

		if let Some(token) = cached.as_ref().filter(|token| token.is_valid()) {
			return Ok(token.clone());
		}

		let span = OpSpan::new(KIND, "ensure_valid");

		obs::record_outcome(KIND, OpOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span.instrument(self.facade.exchange(&self.transport, ctx)).await;

		match &result {
			Ok(token) => {
				*cached = Some(token.clone());

				self.metrics.record_success();
				obs::record_outcome(KIND, OpOutcome::Success);
			},
			Err(_) => {
				*cached = None;

				self.metrics.record_failure();
				obs::record_outcome(KIND, OpOutcome::Failure);
			},
		}

		result
	}

	/// Drops `rejected` from the cache if it is still the cached token.
	///
	/// Used after the gateway refuses a token; a token refreshed concurrently by another caller
	/// is left alone.
	pub async fn invalidate(&self, rejected: &BearerToken) {
		let mut cached = self.cached.write().await;

		if cached.as_ref().is_some_and(|token| token.access_token == rejected.access_token) {
			*cached = None;
		}
	}

	/// Drops whatever token is cached.
	pub async fn clear(&self) {
		*self.cached.write().await = None;
	}

	/// Read lock future, boxed where it is created so callers' futures stay `Send`.
	fn read(
		&self,
	) -> Pin<Box<dyn Future<Output = RwLockReadGuard<'_, Option<BearerToken>>> + Send + '_>> {
		Box::pin(self.cached.read())
	}

	/// Write lock future, boxed like [`read`](Self::read).
	fn lock(
		&self,
	) -> Pin<Box<dyn Future<Output = RwLockWriteGuard<'_, Option<BearerToken>>> + Send + '_>> {
		Box::pin(self.cached.write())
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + HttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager").field("metrics", &self.metrics).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{
		error::TokenError,
		http::{HttpClientError, HttpFuture, HttpRequest, HttpResponse},
		transport::RateLimiter,
	};

	#[derive(Debug, ThisError)]
	#[error("offline")]
	struct Offline;

	/// Answers every token request with a fixed status and body after a short delay.
	#[derive(Debug)]
	struct TokenEndpoint {
		calls: AtomicUsize,
		status: u16,
		body: String,
	}
	impl TokenEndpoint {
		fn new(status: u16, body: impl Into<String>) -> Self {
			Self { calls: AtomicUsize::new(0), status, body: body.into() }
		}
	}
	impl HttpClient for TokenEndpoint {
		type TransportError = Offline;

		fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Box::pin(async move {
				let body = String::from_utf8_lossy(request.body()).into_owned();

				if !body.contains("grant_type=client_credentials") {
					return Err(HttpClientError::Other("unexpected grant".into()));
				}

				tokio::time::sleep(StdDuration::from_millis(20)).await;

				let mut response = HttpResponse::new(self.body.clone().into_bytes());

				*response.status_mut() = oauth2::http::StatusCode::from_u16(self.status)
					.map_err(|e| HttpClientError::Other(e.to_string()))?;
				response.headers_mut().insert(
					oauth2::http::header::CONTENT_TYPE,
					oauth2::http::HeaderValue::from_static("application/json"),
				);

				Ok(response)
			})
		}
	}

	fn manager(endpoint: Arc<TokenEndpoint>) -> TokenManager<TokenEndpoint> {
		let config = ClientConfig::builder("id", "secret").build().expect("Config should build.");
		let transport = Arc::new(RateLimitedTransport::with_limiters(
			endpoint,
			vec![RateLimiter::per_second(100)],
		));

		TokenManager::new(&config, transport).expect("Manager should build.")
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_exchange() {
		let endpoint = Arc::new(TokenEndpoint::new(
			200,
			r#"{"access_token":"shared","token_type":"bearer","expires_in":3600}"#,
		));
		let manager = manager(endpoint.clone());
		let ctx = Context::new();
		let (a, b, c) = tokio::join!(
			manager.ensure_valid(&ctx),
			manager.ensure_valid(&ctx),
			manager.ensure_valid(&ctx)
		);

		for token in [a, b, c] {
			assert_eq!(token.expect("Every caller should get a token.").access_token.expose(), "shared");
		}

		assert_eq!(endpoint.calls.load(Ordering::SeqCst), 1);
		assert_eq!(manager.metrics().attempts(), 1);
		assert_eq!(manager.metrics().successes(), 1);
	}

	#[tokio::test]
	async fn expired_tokens_trigger_a_new_exchange() {
		let endpoint = Arc::new(TokenEndpoint::new(
			200,
			r#"{"access_token":"short","token_type":"bearer","expires_in":0}"#,
		));
		let manager = manager(endpoint.clone());
		let ctx = Context::new();

		manager.ensure_valid(&ctx).await.expect("First exchange should succeed.");
		manager.ensure_valid(&ctx).await.expect("Second exchange should succeed.");

		assert_eq!(endpoint.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn failed_exchange_caches_nothing() {
		let endpoint = Arc::new(TokenEndpoint::new(
			401,
			r#"{"error":"invalid_client","error_description":"unknown client"}"#,
		));
		let manager = manager(endpoint.clone());
		let ctx = Context::new();
		let err = manager.ensure_valid(&ctx).await.expect_err("Rejected exchange must fail.");

		assert!(matches!(err, Error::Token(TokenError::Rejected { .. })));
		assert!(manager.current().await.is_none());

		manager.ensure_valid(&ctx).await.expect_err("Retry should hit the endpoint again.");

		assert_eq!(endpoint.calls.load(Ordering::SeqCst), 2);
		assert_eq!(manager.metrics().failures(), 2);
	}

	#[tokio::test]
	async fn invalidate_ignores_tokens_that_were_already_replaced() {
		let endpoint = Arc::new(TokenEndpoint::new(
			200,
			r#"{"access_token":"live","token_type":"bearer","expires_in":3600}"#,
		));
		let manager = manager(endpoint);
		let ctx = Context::new();
		let live = manager.ensure_valid(&ctx).await.expect("Exchange should succeed.");
		let stale = BearerToken::new("stale", "bearer", Duration::hours(1), OffsetDateTime::now_utc());

		manager.invalidate(&stale).await;

		assert!(manager.current().await.is_some());

		manager.invalidate(&live).await;

		assert!(manager.current().await.is_none());
	}
}
