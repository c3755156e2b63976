//! Nearest-airport search.

// self
use crate::reference::{Airport, LanguageCode, RefParams, Resource};

/// The `airports/nearest` resource; items carry a [`Distance`](crate::reference::Distance).
#[derive(Clone, Copy, Debug)]
pub struct NearestAirports;
impl NearestAirports {
	/// Renders `<lat>,<long>[?lang=..]` with three decimals per coordinate.
	pub fn suffix(latitude: f64, longitude: f64, lang: Option<LanguageCode>) -> String {
		let query = RefParams { lang, ..Default::default() }.to_url();

		format!("{latitude:.3},{longitude:.3}{query}")
	}
}
impl Resource for NearestAirports {
	type Item = Airport;

	const ITEM: &'static str = "Airport";
	const LIST: &'static str = "Airports";
	const PATH: &'static str = "airports/nearest";
	const ROOT: &'static str = "NearestAirportResource";
}
