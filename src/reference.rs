//! Reference-data resources: request parameters, envelope layout, and typed records.
//!
//! Each resource is a zero-sized marker implementing [`Resource`]. The marker names the path
//! below `mds-references/` and the element names of its envelope
//! (`<Root><List><Item/>..</List><Meta/></Root>`); the cursor uses them to pull items out of a
//! decoded page without knowing anything about the records themselves.

pub mod aircraft;
pub mod airlines;
pub mod airports;
pub mod cities;
pub mod code;
pub mod countries;
pub mod names;
pub mod nearest;
pub mod params;

pub use aircraft::{Aircraft, AircraftSummaries};
pub use airlines::{Airline, Airlines};
pub use airports::{Airport, Airports, Distance, Position};
pub use cities::{Cities, City};
pub use code::{CodeError, LanguageCode, ResourceCode};
pub use countries::{Countries, Country};
pub use names::Names;
pub use nearest::NearestAirports;
pub use params::{MAX_LIMIT, RefParams};

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Path prefix shared by every reference resource.
pub const REFERENCE_PREFIX: &str = "mds-references";

/// A paged reference resource.
pub trait Resource
where
	Self: 'static + Send + Sync,
{
	/// Record type held by each page.
	type Item: 'static + Clone + Debug + Send + Sync + DeserializeOwned;

	/// Path below [`REFERENCE_PREFIX`], without slashes.
	const PATH: &'static str;
	/// Envelope root element.
	const ROOT: &'static str;
	/// Element wrapping the item list.
	const LIST: &'static str;
	/// Element of one item.
	const ITEM: &'static str;

	/// Relative URL of the resource with `suffix` (see [`RefParams::to_url`]) appended.
	fn path(suffix: &str) -> String {
		format!("{REFERENCE_PREFIX}/{}/{suffix}", Self::PATH)
	}
}
