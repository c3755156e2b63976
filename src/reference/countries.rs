//! Countries by ISO 3166-1 alpha-2 code.

// crates.io
use serde_with::serde_as;
// self
use crate::{
	_prelude::*,
	decode::Text,
	reference::{Names, Resource},
};

/// The `countries` resource.
#[derive(Clone, Copy, Debug)]
pub struct Countries;
impl Resource for Countries {
	type Item = Country;

	const ITEM: &'static str = "Country";
	const LIST: &'static str = "Countries";
	const PATH: &'static str = "countries";
	const ROOT: &'static str = "CountryResource";
}

/// One country.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
	/// ISO 3166-1 alpha-2 code.
	#[serde(rename = "CountryCode")]
	#[serde_as(as = "Text")]
	pub code: String,
	/// Localized names.
	#[serde(rename = "Names", default)]
	pub names: Names,
}
impl Display for Country {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} ({})", self.code, self.names)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn country_decodes_and_displays() {
		let country: Country = serde_json::from_str(
			r#"{"CountryCode":"DK","Names":{"Name":{"@LanguageCode":"EN","$":"Denmark"}}}"#,
		)
		.expect("Country should decode.");

		assert_eq!(country.code, "DK");
		assert_eq!(country.to_string(), "DK (EN: Denmark)");
	}
}
