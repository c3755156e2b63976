//! Aircraft types by IATA equipment code.

// crates.io
use serde_with::serde_as;
// self
use crate::{
	_prelude::*,
	decode::Text,
	reference::{Names, Resource},
};

/// The `aircraft` resource. The API ignores language selection here.
#[derive(Clone, Copy, Debug)]
pub struct AircraftSummaries;
impl Resource for AircraftSummaries {
	type Item = Aircraft;

	const ITEM: &'static str = "AircraftSummary";
	const LIST: &'static str = "AircraftSummaries";
	const PATH: &'static str = "aircraft";
	const ROOT: &'static str = "AircraftResource";
}

/// One aircraft type.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
	/// IATA aircraft type code.
	#[serde(rename = "AircraftCode")]
	#[serde_as(as = "Text")]
	pub code: String,
	/// Localized names.
	#[serde(rename = "Names", default)]
	pub names: Names,
	/// Airline equipment code.
	#[serde(rename = "AirlineEquipCode")]
	#[serde_as(as = "Option<Text>")]
	pub airline_equip_code: Option<String>,
}
impl Display for Aircraft {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} ({})", self.code, self.names)?;

		if let Some(equip) = &self.airline_equip_code {
			write!(f, " equip: {equip}")?;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn numeric_aircraft_codes_decode_as_text() {
		let aircraft: Aircraft = serde_json::from_str(
			r#"{"AircraftCode":320,"Names":{"Name":{"@LanguageCode":"EN","$":"Airbus A320"}},"AirlineEquipCode":"320"}"#,
		)
		.expect("Aircraft should decode.");

		assert_eq!(aircraft.code, "320");
		assert_eq!(aircraft.to_string(), "320 (EN: Airbus A320) equip: 320");
	}
}
