//! Async client for the Lufthansa reference-data API: OAuth client-credentials tokens cached
//! behind a single-flight refresh, rate-limited dispatch, XML/JSON decoding, and cursors that
//! walk paged resources through their hypermedia links.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod http;
pub mod obs;
pub mod reference;
pub mod transport;

mod oauth;

#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{Api, ReqwestApi},
		config::ClientConfig,
		http::ReqwestHttpClient,
	};

	/// Client id used by every test fixture.
	pub const TEST_CLIENT_ID: &str = "test-client";
	/// Client secret used by every test fixture.
	pub const TEST_CLIENT_SECRET: &str = "test-secret";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a configuration pointing both the token endpoint and the resource base at
	/// `base` (usually `MockServer::base_url()`), with generous rate limits.
	pub fn test_config(base: &str) -> ClientConfig {
		let base = Url::parse(base).expect("Mock base URL should parse.");
		let token = base.join("/oauth/token").expect("Mock token URL should join.");

		ClientConfig::builder(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
			.base_url(base)
			.token_url(token)
			.requests_per_second(1_000)
			.requests_per_hour(100_000)
			.build()
			.expect("Test configuration should be valid.")
	}

	/// Token endpoint body issuing `access_token` for `expires_in` seconds.
	pub fn token_body(access_token: &str, expires_in: u64) -> String {
		format!(
			"{{\"access_token\":\"{access_token}\",\"token_type\":\"bearer\",\"expires_in\":{expires_in}}}"
		)
	}

	/// Connects a reqwest-backed [`Api`] to the mock server at `base`.
	pub async fn connect_test_api(base: &str) -> Result<Arc<ReqwestApi>> {
		let api =
			Api::with_http_client(test_config(base), test_reqwest_http_client(), &Context::new())
				.await?;

		Ok(Arc::new(api))
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::RwLock as AsyncRwLock;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::{
		context::Context,
		error::{Error, Result},
	};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
