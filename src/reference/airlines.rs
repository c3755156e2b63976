//! Airlines by IATA designator.

// crates.io
use serde_with::serde_as;
// self
use crate::{
	_prelude::*,
	decode::Text,
	reference::{Names, Resource},
};

/// The `airlines` resource. The API ignores language selection here.
#[derive(Clone, Copy, Debug)]
pub struct Airlines;
impl Resource for Airlines {
	type Item = Airline;

	const ITEM: &'static str = "Airline";
	const LIST: &'static str = "Airlines";
	const PATH: &'static str = "airlines";
	const ROOT: &'static str = "AirlineResource";
}

/// One airline.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
	/// IATA airline designator.
	#[serde(rename = "AirlineID")]
	#[serde_as(as = "Text")]
	pub iata: String,
	/// ICAO airline designator, when assigned.
	#[serde(rename = "AirlineID_ICAO")]
	#[serde_as(as = "Option<Text>")]
	pub icao: Option<String>,
	/// Localized names.
	#[serde(rename = "Names", default)]
	pub names: Names,
}
impl Display for Airline {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.iata)?;

		if let Some(icao) = &self.icao {
			write!(f, "/{icao}")?;
		}

		write!(f, " ({})", self.names)
	}
}
