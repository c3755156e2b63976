//! Localized record names.

// crates.io
use serde_with::serde_as;
// self
use crate::{
	_prelude::*,
	decode::{Many, Text},
};

/// Names of one record keyed by upper-case language code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<NamesWire>")]
pub struct Names(BTreeMap<String, String>);
impl Names {
	/// Name in `language` (case-insensitive), if the API returned one.
	pub fn get(&self, language: &str) -> Option<&str> {
		self.0.get(&language.to_ascii_uppercase()).map(String::as_str)
	}

	/// Iterates `(language, name)` pairs in language order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(language, name)| (language.as_str(), name.as_str()))
	}

	/// Number of languages present.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no names were returned.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Display for Names {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for (i, (language, name)) in self.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}

			write!(f, "{language}: {name}")?;
		}

		Ok(())
	}
}
impl<K, V> FromIterator<(K, V)> for Names
where
	K: AsRef<str>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(language, name)| (language.as_ref().to_ascii_uppercase(), name.into()))
				.collect(),
		)
	}
}
impl From<Option<NamesWire>> for Names {
	fn from(wire: Option<NamesWire>) -> Self {
		wire.map(|wire| wire.names)
			.unwrap_or_default()
			.into_iter()
			.map(|name| (name.language, name.value))
			.collect()
	}
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct NamesWire {
	#[serde(rename = "Name", default)]
	#[serde_as(as = "Many<_>")]
	names: Vec<NameWire>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct NameWire {
	#[serde(rename = "@LanguageCode")]
	#[serde_as(as = "Text")]
	language: String,
	#[serde(rename = "$", default)]
	#[serde_as(as = "Text")]
	value: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn single_and_repeated_names_decode() {
		let one: Names = serde_json::from_str(r#"{"Name":{"@LanguageCode":"en","$":"Denmark"}}"#)
			.expect("Single name should decode.");

		assert_eq!(one.get("EN"), Some("Denmark"));

		let many: Names = serde_json::from_str(
			r#"{"Name":[{"@LanguageCode":"EN","$":"Germany"},{"@LanguageCode":"DE","$":"Deutschland"}]}"#,
		)
		.expect("Repeated names should decode.");

		assert_eq!(many.len(), 2);
		assert_eq!(many.to_string(), "DE: Deutschland, EN: Germany");

		let none: Names = serde_json::from_str("null").expect("Empty names should decode.");

		assert!(none.is_empty());
	}
}
