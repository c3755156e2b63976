//! Cities and the airports serving them.

// crates.io
use serde_with::serde_as;
// self
use crate::{
	_prelude::*,
	decode::{Many, Text},
	reference::{Names, Resource},
};

/// The `cities` resource.
#[derive(Clone, Copy, Debug)]
pub struct Cities;
impl Resource for Cities {
	type Item = City;

	const ITEM: &'static str = "City";
	const LIST: &'static str = "Cities";
	const PATH: &'static str = "cities";
	const ROOT: &'static str = "CityResource";
}

/// One city and the airports serving it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CityWire")]
pub struct City {
	/// IATA city code.
	pub code: String,
	/// ISO 3166-1 alpha-2 country code.
	pub country_code: String,
	/// Localized names.
	pub names: Names,
	/// UTC offset, e.g. `+01:00`.
	pub utc_offset: Option<String>,
	/// IANA time zone identifier.
	pub time_zone_id: Option<String>,
	/// IATA codes of the airports serving the city.
	pub airports: Vec<String>,
}
impl Display for City {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}, {} ({})", self.code, self.country_code, self.names)?;

		if !self.airports.is_empty() {
			write!(f, " airports: {}", self.airports.join(" "))?;
		}

		Ok(())
	}
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct CityWire {
	#[serde(rename = "CityCode")]
	#[serde_as(as = "Text")]
	code: String,
	#[serde(rename = "CountryCode", default)]
	#[serde_as(as = "Text")]
	country_code: String,
	#[serde(rename = "Names", default)]
	names: Names,
	#[serde(rename = "UtcOffset")]
	#[serde_as(as = "Option<Text>")]
	utc_offset: Option<String>,
	#[serde(rename = "TimeZoneId")]
	#[serde_as(as = "Option<Text>")]
	time_zone_id: Option<String>,
	#[serde(rename = "Airports")]
	airports: Option<AirportCodesWire>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct AirportCodesWire {
	#[serde(rename = "AirportCode", default)]
	#[serde_as(as = "Many<Text>")]
	codes: Vec<String>,
}

impl From<CityWire> for City {
	fn from(wire: CityWire) -> Self {
		Self {
			code: wire.code,
			country_code: wire.country_code,
			names: wire.names,
			utc_offset: wire.utc_offset,
			time_zone_id: wire.time_zone_id,
			airports: wire.airports.map(|list| list.codes).unwrap_or_default(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn city_collects_airport_codes() {
		let city: City = serde_json::from_str(
			r#"{"CityCode":"FRA","CountryCode":"DE","Names":{"Name":{"@LanguageCode":"EN","$":"Frankfurt"}},"UtcOffset":"+01:00","TimeZoneId":"Europe/Berlin","Airports":{"AirportCode":["FRA","HHN"]}}"#,
		)
		.expect("City should decode.");

		assert_eq!(city.airports, ["FRA", "HHN"]);
		assert_eq!(city.time_zone_id.as_deref(), Some("Europe/Berlin"));
		assert_eq!(city.to_string(), "FRA, DE (EN: Frankfurt) airports: FRA HHN");

		let single: City = serde_json::from_str(
			r#"{"CityCode":"AAL","CountryCode":"DK","Airports":{"AirportCode":"AAL"}}"#,
		)
		.expect("City with one airport should decode.");

		assert_eq!(single.airports, ["AAL"]);
		assert!(single.utc_offset.is_none());
	}
}
