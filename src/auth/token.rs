//! Immutable bearer token issued by the client-credentials exchange.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Lifecycle status of a [`BearerToken`] at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// The issued-at instant lies in the future (clock skew).
	Pending,
	/// Token may be presented to the API.
	Active,
	/// `issued_at + expires_in` has been reached.
	Expired,
}

/// Access token plus the metadata needed to decide whether it is still usable.
///
/// A token is valid strictly before `issued_at + expires_in`. Tokens are never mutated; a
/// refresh replaces the cached value wholesale.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Token type reported by the endpoint (normally `bearer`).
	pub token_type: String,
	/// Lifetime reported by the endpoint.
	pub expires_in: Duration,
	/// Instant the exchange completed.
	pub issued_at: OffsetDateTime,
}
impl BearerToken {
	/// Creates a token issued at `issued_at`.
	pub fn new(
		access_token: impl Into<String>,
		token_type: impl Into<String>,
		expires_in: Duration,
		issued_at: OffsetDateTime,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			token_type: token_type.into(),
			expires_in,
			issued_at,
		}
	}

	/// Expiry instant (`issued_at + expires_in`).
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at + self.expires_in
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant < self.issued_at {
			return TokenStatus::Pending;
		}
		if instant >= self.expires_at() {
			return TokenStatus::Expired;
		}

		TokenStatus::Active
	}

	/// Returns `true` when the token has not expired at `instant`.
	///
	/// Pending tokens count as valid; the endpoint's clock is authoritative.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		!matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` when the token has not expired relative to the current clock.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// `Authorization` header value: the capitalized token type followed by the access token.
	pub fn authorization(&self) -> String {
		let mut chars = self.token_type.chars();
		let scheme = match chars.next() {
			Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
			None => String::from("Bearer"),
		};

		format!("{scheme} {}", self.access_token.expose())
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerToken")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}
