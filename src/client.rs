//! Shared API client: token cache, rate-limited transport, and the reference resource builders.
//!
//! [`Api`] is created once per set of credentials and shared behind an [`Arc`]. Construction
//! exchanges credentials eagerly so bad credentials surface immediately. Every request then goes
//! through [`Api::fetch`], which attaches a valid bearer token, waits on the rate limiters,
//! and classifies the response.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::TokenManager,
	config::ClientConfig,
	cursor::{Cursor, PageEnvelope},
	decode::{self, Outcome},
	error::{ConfigError, DecodeError},
	http::HttpClient,
	obs::{self, OpKind, OpOutcome, OpSpan},
	reference::{
		Aircraft, AircraftSummaries, Airline, Airlines, Airport, Airports, Cities, City, Countries,
		Country, LanguageCode, NearestAirports, RefParams, Resource, ResourceCode, params,
	},
	transport::RateLimitedTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Formats accepted from the API, in order of preference.
pub const ACCEPT_FORMATS: &str = "application/json, application/xml, */*";

/// Reqwest-backed client.
#[cfg(feature = "reqwest")]
pub type ReqwestApi = Api<ReqwestHttpClient>;

/// Buffered `200 OK` response.
#[derive(Clone, Debug)]
pub struct Fetched {
	/// HTTP status code.
	pub status: u16,
	/// Declared `Content-Type`, if any.
	pub content_type: Option<String>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}

/// Authenticated, rate-limited client for the reference API.
pub struct Api<C>
where
	C: ?Sized + HttpClient,
{
	config: ClientConfig,
	transport: Arc<RateLimitedTransport<C>>,
	tokens: TokenManager<C>,
}
#[cfg(feature = "reqwest")]
impl Api<ReqwestHttpClient> {
	/// Builds a reqwest transport honoring [`ClientConfig::timeout`] and connects with it.
	pub async fn connect(config: ClientConfig, ctx: &Context) -> Result<Self> {
		let client = ReqwestHttpClient::with_timeout(config.timeout)?;

		Self::with_http_client(config, client, ctx).await
	}
}
impl<C> Api<C>
where
	C: ?Sized + HttpClient,
{
	/// Connects through a caller-supplied HTTP client.
	///
	/// Credentials are exchanged before this returns; a rejected exchange fails construction.
	pub async fn with_http_client(
		config: ClientConfig,
		client: impl Into<Arc<C>>,
		ctx: &Context,
	) -> Result<Self> {
		let transport = Arc::new(RateLimitedTransport::from_config(client, &config));
		let tokens = TokenManager::new(&config, transport.clone())?;

		tokens.ensure_valid(ctx).await?;

		Ok(Self { config, transport, tokens })
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Token cache.
	pub fn tokens(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Rate-limited transport shared by token exchanges and resource calls.
	pub fn transport(&self) -> &Arc<RateLimitedTransport<C>> {
		&self.transport
	}

	/// Resolves a path relative to the API root.
	pub fn resource_url(&self, path: &str) -> Result<Url> {
		let url = Url::parse(&self.config.endpoints.resource(path))
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "resource", source })?;

		Ok(url)
	}

	/// Performs one authenticated `GET` and returns the body of a `200 OK` response.
	///
	/// Any other status is classified into [`Error::Gateway`], [`Error::Api`], or
	/// [`Error::Unknown`]. A gateway rejection also evicts the token that was sent, so the next
	/// call exchanges credentials again; the request itself is not retried.
	pub async fn fetch(&self, ctx: &Context, url: &Url) -> Result<Fetched> {
		const KIND: OpKind = OpKind::Fetch;

		let span = OpSpan::new(KIND, "fetch");

		obs::record_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(self.fetch_inner(ctx, url)).await;

		obs::record_outcome(
			KIND,
			if result.is_ok() { OpOutcome::Success } else { OpOutcome::Failure },
		);

		result
	}

	/// Cursor over resource `R`, seeded with `R::path(suffix)`.
	pub fn cursor<R>(self: &Arc<Self>, suffix: &str) -> Result<Cursor<R, C>>
	where
		R: Resource,
	{
		let seed = self.resource_url(&R::path(suffix))?;

		Ok(Cursor::new(self.clone(), seed))
	}

	/// Fetches `R::path(suffix)` once and returns its first item.
	pub async fn lookup<R>(&self, ctx: &Context, suffix: &str) -> Result<R::Item>
	where
		R: Resource,
	{
		let url = self.resource_url(&R::path(suffix))?;
		let fetched = self.fetch(ctx, &url).await?;
		let page = PageEnvelope::decode::<R>(&fetched.body, fetched.content_type.as_deref())?;

		if page.schema_version != self.config.meta_version {
			return Err(Error::SchemaVersion {
				expected: self.config.meta_version.clone(),
				found: page.schema_version,
			});
		}

		page.items.into_iter().next().ok_or_else(|| DecodeError::EmptyResponse.into())
	}

	/// Cursor over countries.
	pub fn countries(self: &Arc<Self>, params: &RefParams) -> Result<Cursor<Countries, C>> {
		self.cursor(&params.to_url())
	}

	/// Cursor over cities.
	pub fn cities(self: &Arc<Self>, params: &RefParams) -> Result<Cursor<Cities, C>> {
		self.cursor(&params.to_url())
	}

	/// Cursor over airports, optionally restricted to those served by Lufthansa.
	pub fn airports(
		self: &Arc<Self>,
		params: &RefParams,
		lh_operated: bool,
	) -> Result<Cursor<Airports, C>> {
		let mut suffix = params.to_url();

		if lh_operated {
			params::append_query(&mut suffix, "LHoperated", "1");
		}

		self.cursor(&suffix)
	}

	/// Cursor over the airports closest to a coordinate, nearest first.
	pub fn nearest_airports(
		self: &Arc<Self>,
		latitude: f64,
		longitude: f64,
		lang: Option<LanguageCode>,
	) -> Result<Cursor<NearestAirports, C>> {
		self.cursor(&NearestAirports::suffix(latitude, longitude, lang))
	}

	/// Cursor over airlines; `params.lang` is not sent.
	pub fn airlines(self: &Arc<Self>, params: &RefParams) -> Result<Cursor<Airlines, C>> {
		self.cursor(&RefParams { lang: None, ..params.clone() }.to_url())
	}

	/// Cursor over aircraft types; `params.lang` is not sent.
	pub fn aircraft_summaries(
		self: &Arc<Self>,
		params: &RefParams,
	) -> Result<Cursor<AircraftSummaries, C>> {
		self.cursor(&RefParams { lang: None, ..params.clone() }.to_url())
	}

	/// Looks up one country.
	pub async fn country(
		&self,
		ctx: &Context,
		code: ResourceCode,
		lang: Option<LanguageCode>,
	) -> Result<Country> {
		self.lookup::<Countries>(ctx, &single(code, lang)).await
	}

	/// Looks up one city.
	pub async fn city(
		&self,
		ctx: &Context,
		code: ResourceCode,
		lang: Option<LanguageCode>,
	) -> Result<City> {
		self.lookup::<Cities>(ctx, &single(code, lang)).await
	}

	/// Looks up one airport.
	pub async fn airport(
		&self,
		ctx: &Context,
		code: ResourceCode,
		lang: Option<LanguageCode>,
	) -> Result<Airport> {
		self.lookup::<Airports>(ctx, &single(code, lang)).await
	}

	/// Looks up one airline by IATA designator.
	pub async fn airline(&self, ctx: &Context, code: ResourceCode) -> Result<Airline> {
		self.lookup::<Airlines>(ctx, &single(code, None)).await
	}

	/// Looks up one aircraft type by IATA equipment code.
	pub async fn aircraft(&self, ctx: &Context, code: ResourceCode) -> Result<Aircraft> {
		self.lookup::<AircraftSummaries>(ctx, &single(code, None)).await
	}

	async fn fetch_inner(&self, ctx: &Context, url: &Url) -> Result<Fetched> {
		let token = self.tokens.ensure_valid(ctx).await?;
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(ACCEPT, ACCEPT_FORMATS)
			.header(AUTHORIZATION, token.authorization())
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let response = self.transport.send(ctx, request).await?;
		let status = response.status().as_u16();
		let content_type = response
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);
		let body = response.into_body();

		let outcome = decode::classify(status, &body, content_type.as_deref());

		if let Outcome::Gateway(_) = &outcome {
			self.tokens.invalidate(&token).await;
		}

		outcome.into_result()?;

		Ok(Fetched { status, content_type, body })
	}
}
impl<C> Debug for Api<C>
where
	C: ?Sized + HttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Api")
			.field("config", &self.config)
			.field("limiters", &self.transport.limiters())
			.finish_non_exhaustive()
	}
}

fn single(code: ResourceCode, lang: Option<LanguageCode>) -> String {
	RefParams { code: Some(code), lang, ..Default::default() }.to_url()
}
