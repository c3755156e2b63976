//! Client-credentials exchange through the `oauth2` crate.

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	config::ClientConfig,
	error::{ConfigError, TokenError},
	http::{self, HttpClient},
	transport::RateLimitedTransport,
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Posts `grant_type=client_credentials` with the client id and secret in the form body.
pub(crate) struct ClientCredentialsFacade {
	oauth_client: ConfiguredBasicClient,
}
impl ClientCredentialsFacade {
	pub(crate) fn from_config(config: &ClientConfig) -> Result<Self> {
		let token_url = TokenUrl::new(config.endpoints.token.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?;
		let oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret().to_owned()))
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { oauth_client })
	}

	/// Runs one exchange through `transport`, so it counts against the rate limits.
	pub(crate) async fn exchange<C>(
		&self,
		transport: &RateLimitedTransport<C>,
		ctx: &Context,
	) -> Result<BearerToken>
	where
		C: ?Sized + HttpClient,
	{
		let handle = transport.handle(ctx);
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.request_async(&handle)
			.await
			.map_err(map_request_error)?;

		map_token_response(response, OffsetDateTime::now_utc())
	}
}
impl Debug for ClientCredentialsFacade {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ClientCredentialsFacade(..)")
	}
}

fn map_token_response(
	response: BasicTokenResponse,
	issued_at: OffsetDateTime,
) -> Result<BearerToken> {
	let expires_in = response.expires_in().ok_or(TokenError::MissingExpiresIn)?.as_secs();
	let expires_in = i64::try_from(expires_in).map_err(|_| TokenError::ExpiresInOutOfRange)?;
	let token_type: &str = response.token_type().as_ref();

	Ok(BearerToken::new(
		response.access_token().secret().to_owned(),
		token_type,
		Duration::seconds(expires_in),
		issued_at,
	))
}

fn map_request_error(err: BasicRequestTokenError<HttpClientError<Error>>) -> Error {
	match err {
		RequestTokenError::ServerResponse(response) => TokenError::Rejected {
			error: response.error().as_ref().to_owned(),
			description: response.error_description().cloned(),
		}
		.into(),
		RequestTokenError::Request(HttpClientError::Reqwest(inner)) => *inner,
		RequestTokenError::Request(other) => http::map_http_client_error(other),
		RequestTokenError::Parse(source, _body) => TokenError::Parse { source }.into(),
		RequestTokenError::Other(message) => TokenError::Unexpected { message }.into(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::{
		AccessToken, EmptyExtraTokenFields, StandardTokenResponse,
		basic::{BasicErrorResponse, BasicErrorResponseType, BasicTokenType},
	};
	use time::macros;
	// self
	use super::*;
	use crate::error::TransportError;

	fn response(expires_in: Option<u64>) -> BasicTokenResponse {
		let mut response = StandardTokenResponse::new(
			AccessToken::new("issued".into()),
			BasicTokenType::Bearer,
			EmptyExtraTokenFields {},
		);

		response.set_expires_in(expires_in.map(StdDuration::from_secs).as_ref());

		response
	}

	#[test]
	fn token_response_maps_to_bearer_token() {
		let issued_at = macros::datetime!(2025-01-01 00:00 UTC);
		let token = map_token_response(response(Some(3_600)), issued_at)
			.expect("Complete token response should map.");

		assert_eq!(token.access_token.expose(), "issued");
		assert_eq!(token.token_type, "bearer");
		assert_eq!(token.expires_at(), macros::datetime!(2025-01-01 01:00 UTC));
	}

	#[test]
	fn missing_expires_in_is_rejected() {
		let err = map_token_response(response(None), OffsetDateTime::now_utc())
			.expect_err("Token response without expires_in must fail.");

		assert!(matches!(err, Error::Token(TokenError::MissingExpiresIn)));
	}

	#[test]
	fn wrapped_client_errors_are_unwrapped() {
		let err = map_request_error(RequestTokenError::Request(HttpClientError::Reqwest(
			Box::new(Error::from(TransportError::Canceled)),
		)));

		assert!(err.is_canceled());
	}

	#[test]
	fn oauth_error_bodies_become_rejections() {
		let body = BasicErrorResponse::new(
			BasicErrorResponseType::InvalidClient,
			Some("bad secret".into()),
			None,
		);
		let err = map_request_error(RequestTokenError::ServerResponse(body));

		match err {
			Error::Token(TokenError::Rejected { error, description }) => {
				assert_eq!(error, "invalid_client");
				assert_eq!(description.as_deref(), Some("bad secret"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
