//! Query parameters shared by the reference resources.

// self
use crate::reference::{LanguageCode, ResourceCode};

/// Largest page size the API honors.
pub const MAX_LIMIT: u32 = 100;

/// Per-request parameters of a reference resource.
///
/// [`to_url`](Self::to_url) renders the suffix appended to the resource path: the code as a path
/// segment, then `lang`, `limit`, and `offset` as query parameters in that order. Zero limits and
/// offsets are treated as unset, matching the API defaults (20 records from offset 0).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefParams {
	/// Single-record code, rendered as a path segment.
	pub code: Option<ResourceCode>,
	/// Language of the returned names; all languages when unset.
	pub lang: Option<LanguageCode>,
	/// Records per page, clamped to [`MAX_LIMIT`].
	pub limit: Option<u32>,
	/// Records skipped before the first returned one.
	pub offset: Option<u32>,
}
impl RefParams {
	/// Empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Selects a single record.
	pub fn code(mut self, code: ResourceCode) -> Self {
		self.code = Some(code);

		self
	}

	/// Selects the language of returned names.
	pub fn lang(mut self, lang: LanguageCode) -> Self {
		self.lang = Some(lang);

		self
	}

	/// Sets the page size.
	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);

		self
	}

	/// Sets the number of skipped records.
	pub fn offset(mut self, offset: u32) -> Self {
		self.offset = Some(offset);

		self
	}

	/// Renders the path/query suffix.
	pub fn to_url(&self) -> String {
		let mut url = self.code.as_deref().unwrap_or_default().to_owned();

		if let Some(lang) = &self.lang {
			append_query(&mut url, "lang", lang);
		}
		if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
			append_query(&mut url, "limit", &limit.min(MAX_LIMIT).to_string());
		}
		if let Some(offset) = self.offset.filter(|offset| *offset > 0) {
			append_query(&mut url, "offset", &offset.to_string());
		}

		url
	}
}

/// Appends `key=value`, opening the query string with `?` or continuing it with `&`.
pub(crate) fn append_query(url: &mut String, key: &str, value: &str) {
	url.push(if url.contains('?') { '&' } else { '?' });
	url.push_str(key);
	url.push('=');
	url.push_str(value);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn code(value: &str) -> ResourceCode {
		ResourceCode::new(value).expect("Code fixture should be valid.")
	}

	fn lang(value: &str) -> LanguageCode {
		LanguageCode::new(value).expect("Language fixture should be valid.")
	}

	#[test]
	fn suffix_order_and_separators_are_fixed() {
		let cases = [
			(RefParams::new(), ""),
			(RefParams::new().lang(lang("EN")), "?lang=EN"),
			(RefParams::new().code(code("DK")), "DK"),
			(RefParams::new().lang(lang("EN")).code(code("DK")), "DK?lang=EN"),
			(RefParams::new().limit(20), "?limit=20"),
			(RefParams::new().limit(20).offset(1), "?limit=20&offset=1"),
			(RefParams::new().lang(lang("EN")).limit(20).offset(1), "?lang=EN&limit=20&offset=1"),
			(RefParams::new().offset(40), "?offset=40"),
		];

		for (params, expected) in cases {
			assert_eq!(params.to_url(), expected, "Unexpected suffix for {params:?}.");
			assert_eq!(params.to_url(), params.to_url(), "Rendering must be deterministic.");
		}
	}

	#[test]
	fn limit_is_clamped_and_zero_is_unset() {
		assert_eq!(RefParams::new().limit(500).to_url(), "?limit=100");
		assert_eq!(RefParams::new().limit(0).offset(0).to_url(), "");
	}

	#[test]
	fn append_query_picks_the_separator() {
		let mut url = String::from("airports/");

		append_query(&mut url, "LHoperated", "1");

		assert_eq!(url, "airports/?LHoperated=1");

		append_query(&mut url, "lang", "EN");

		assert_eq!(url, "airports/?LHoperated=1&lang=EN");
	}
}
