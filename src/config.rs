//! Client configuration: credentials, rate ceilings, endpoints, and the supported meta version.

// self
use crate::{_prelude::*, error::ConfigError};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.lufthansa.com/v1";
/// Meta version the envelope decoding is written against.
pub const DEFAULT_META_VERSION: &str = "1.0.0";
/// Default HTTP timeout applied to the reqwest transport.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(15);

/// Endpoint set used by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// API root; resource paths such as `mds-references/countries` are appended to it.
	pub base: Url,
	/// OAuth token endpoint.
	pub token: Url,
}
impl Endpoints {
	/// Resolves `path` (segments joined by `/`) below the API root.
	pub fn resource(&self, path: &str) -> String {
		format!("{}/{}", self.base.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
	}
}

/// Immutable client configuration.
#[derive(Clone)]
pub struct ClientConfig {
	/// OAuth client identifier.
	pub client_id: String,
	client_secret: String,
	/// Requests allowed per second.
	pub requests_per_second: u32,
	/// Requests allowed per hour.
	pub requests_per_hour: u32,
	/// Endpoint set.
	pub endpoints: Endpoints,
	/// Timeout applied to each HTTP call by the default transport.
	pub timeout: StdDuration,
	/// Meta version every envelope must report.
	pub meta_version: String,
}
impl ClientConfig {
	/// Starts a builder for the given credentials.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> ClientConfigBuilder {
		ClientConfigBuilder::new(client_id, client_secret)
	}

	/// Client secret; callers must avoid logging it.
	pub fn client_secret(&self) -> &str {
		&self.client_secret
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("requests_per_second", &self.requests_per_second)
			.field("requests_per_hour", &self.requests_per_hour)
			.field("endpoints", &self.endpoints)
			.field("timeout", &self.timeout)
			.field("meta_version", &self.meta_version)
			.finish()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	client_id: String,
	client_secret: String,
	requests_per_second: u32,
	requests_per_hour: u32,
	base_url: Option<Url>,
	token_url: Option<Url>,
	timeout: StdDuration,
	meta_version: String,
}
impl ClientConfigBuilder {
	/// Creates a builder with the documented API defaults (5 req/s, 1000 req/h).
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			requests_per_second: 5,
			requests_per_hour: 1_000,
			base_url: None,
			token_url: None,
			timeout: DEFAULT_TIMEOUT,
			meta_version: DEFAULT_META_VERSION.into(),
		}
	}

	/// Sets the per-second ceiling.
	pub fn requests_per_second(mut self, limit: u32) -> Self {
		self.requests_per_second = limit;

		self
	}

	/// Sets the per-hour ceiling.
	pub fn requests_per_hour(mut self, limit: u32) -> Self {
		self.requests_per_hour = limit;

		self
	}

	/// Overrides the API root.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the token endpoint (defaults to `<base>/oauth/token`).
	pub fn token_url(mut self, url: Url) -> Self {
		self.token_url = Some(url);

		self
	}

	/// Overrides the per-call HTTP timeout.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the meta version envelopes must report.
	pub fn meta_version(mut self, version: impl Into<String>) -> Self {
		self.meta_version = version.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let base = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL)
				.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "base", source })?,
		};
		let token = match self.token_url {
			Some(url) => url,
			None => Url::parse(&format!("{}/oauth/token", base.as_str().trim_end_matches('/')))
				.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?,
		};
		let config = ClientConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			requests_per_second: self.requests_per_second,
			requests_per_hour: self.requests_per_hour,
			endpoints: Endpoints { base, token },
			timeout: self.timeout,
			meta_version: self.meta_version,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingCredential { field: "id" });
		}
		if self.client_secret.trim().is_empty() {
			return Err(ConfigError::MissingCredential { field: "secret" });
		}
		if self.requests_per_second == 0 {
			return Err(ConfigError::InvalidRateLimit { limit: "per-second" });
		}
		if self.requests_per_hour == 0 {
			return Err(ConfigError::InvalidRateLimit { limit: "per-hour" });
		}

		validate_endpoint("base", &self.endpoints.base)?;
		validate_endpoint("token", &self.endpoints.token)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	let loopback = match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	};

	match url.scheme() {
		"https" => Ok(()),
		"http" if loopback => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_point_at_the_public_api() {
		let config =
			ClientConfig::builder("id", "secret").build().expect("Default config should build.");

		assert_eq!(config.endpoints.base.as_str(), "https://api.lufthansa.com/v1");
		assert_eq!(config.endpoints.token.as_str(), "https://api.lufthansa.com/v1/oauth/token");
		assert_eq!(config.meta_version, "1.0.0");
		assert_eq!(config.timeout, StdDuration::from_secs(15));
		assert_eq!(
			config.endpoints.resource("mds-references/countries/"),
			"https://api.lufthansa.com/v1/mds-references/countries/"
		);
	}

	#[test]
	fn rejects_zero_limits_and_blank_credentials() {
		let err = ClientConfig::builder("id", "secret")
			.requests_per_hour(0)
			.build()
			.expect_err("Zero hourly limit must be rejected.");

		assert!(matches!(err, ConfigError::InvalidRateLimit { limit: "per-hour" }));

		let err = ClientConfig::builder(" ", "secret")
			.build()
			.expect_err("Blank client id must be rejected.");

		assert!(matches!(err, ConfigError::MissingCredential { field: "id" }));
	}

	#[test]
	fn plain_http_only_allowed_for_loopback() {
		let local = Url::parse("http://127.0.0.1:8080").expect("Loopback URL should parse.");

		ClientConfig::builder("id", "secret")
			.base_url(local)
			.build()
			.expect("Loopback HTTP endpoints should be accepted.");

		let remote = Url::parse("http://example.com").expect("Remote URL should parse.");
		let err = ClientConfig::builder("id", "secret")
			.base_url(remote)
			.build()
			.expect_err("Remote HTTP endpoints must be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "base", .. }));
	}

	#[test]
	fn debug_output_hides_the_secret() {
		let config = ClientConfig::builder("id", "top-secret")
			.build()
			.expect("Config should build for debug test.");
		let rendered = format!("{config:?}");

		assert!(!rendered.contains("top-secret"));
		assert!(rendered.contains("client_secret_set: true"));
	}
}
