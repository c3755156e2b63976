//! Airports and other served locations, with coordinates and optional search distance.

// crates.io
use serde_with::{DisplayFromStr, PickFirst, serde_as};
// self
use crate::{
	_prelude::*,
	decode::Text,
	reference::{Names, Resource},
};

/// The `airports` resource.
#[derive(Clone, Copy, Debug)]
pub struct Airports;
impl Resource for Airports {
	type Item = Airport;

	const ITEM: &'static str = "Airport";
	const LIST: &'static str = "Airports";
	const PATH: &'static str = "airports";
	const ROOT: &'static str = "AirportResource";
}

/// Geographic position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Position {
	/// Latitude; positive north.
	pub latitude: f64,
	/// Longitude; positive east.
	pub longitude: f64,
}
impl Display for Position {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{:.3},{:.3}", self.latitude, self.longitude)
	}
}

/// Distance from the queried point, reported by nearest-airport searches.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distance {
	/// Magnitude.
	#[serde(rename = "Value")]
	#[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
	pub value: u32,
	/// Unit of measure, e.g. `KM`.
	#[serde(rename = "UOM", default)]
	#[serde_as(as = "Text")]
	pub unit: String,
}
impl Display for Distance {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} {}", self.value, self.unit)
	}
}

/// One airport (or other location such as a rail station).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "AirportWire")]
pub struct Airport {
	/// IATA location code.
	pub code: String,
	/// Coordinates, when published.
	pub position: Option<Position>,
	/// IATA code of the served city.
	pub city_code: String,
	/// ISO 3166-1 alpha-2 country code.
	pub country_code: String,
	/// Location kind, e.g. `Airport` or `RailwayStation`.
	pub location_type: String,
	/// Localized names.
	pub names: Names,
	/// UTC offset, e.g. `+01:00`.
	pub utc_offset: Option<String>,
	/// IANA time zone identifier.
	pub time_zone_id: Option<String>,
	/// Distance from the queried point; set only by nearest-airport searches.
	pub distance: Option<Distance>,
}
impl Display for Airport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(
			f,
			"{} [{}] {}, {} ({})",
			self.code, self.location_type, self.city_code, self.country_code, self.names
		)?;

		if let Some(position) = &self.position {
			write!(f, " @ {position}")?;
		}
		if let Some(distance) = &self.distance {
			write!(f, " {distance} away")?;
		}

		Ok(())
	}
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct AirportWire {
	#[serde(rename = "AirportCode")]
	#[serde_as(as = "Text")]
	code: String,
	#[serde(rename = "Position")]
	position: Option<PositionWire>,
	#[serde(rename = "CityCode", default)]
	#[serde_as(as = "Text")]
	city_code: String,
	#[serde(rename = "CountryCode", default)]
	#[serde_as(as = "Text")]
	country_code: String,
	#[serde(rename = "LocationType", default)]
	#[serde_as(as = "Text")]
	location_type: String,
	#[serde(rename = "Names", default)]
	names: Names,
	#[serde(rename = "UtcOffset")]
	#[serde_as(as = "Option<Text>")]
	utc_offset: Option<String>,
	#[serde(rename = "TimeZoneId")]
	#[serde_as(as = "Option<Text>")]
	time_zone_id: Option<String>,
	#[serde(rename = "Distance")]
	distance: Option<Distance>,
}

#[derive(Debug, Deserialize)]
struct PositionWire {
	#[serde(rename = "Coordinate")]
	coordinate: CoordinateWire,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct CoordinateWire {
	#[serde(rename = "Latitude")]
	#[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
	latitude: f64,
	#[serde(rename = "Longitude")]
	#[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
	longitude: f64,
}

impl From<AirportWire> for Airport {
	fn from(wire: AirportWire) -> Self {
		Self {
			code: wire.code,
			position: wire.position.map(|position| Position {
				latitude: position.coordinate.latitude,
				longitude: position.coordinate.longitude,
			}),
			city_code: wire.city_code,
			country_code: wire.country_code,
			location_type: wire.location_type,
			names: wire.names,
			utc_offset: wire.utc_offset,
			time_zone_id: wire.time_zone_id,
			distance: wire.distance,
		}
	}
}
