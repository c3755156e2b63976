//! Validated resource codes and language tags.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_code {
	($name:ident, $doc:literal, $kind:literal, $max:literal, $check:path) => {
		#[doc = $doc]
		///
		/// Values are upper-cased on construction.
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new code after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, CodeError> {
				let view = value.as_ref();

				validate_view($kind, $max, $check, view)?;

				Ok(Self(view.to_ascii_uppercase()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = CodeError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = CodeError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

/// Error returned when code validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum CodeError {
	/// The code was empty.
	#[error("{kind} code cannot be empty.")]
	Empty {
		/// Kind of code (resource, language).
		kind: &'static str,
	},
	/// The code contains characters outside the permitted alphabet.
	#[error("{kind} code contains invalid characters.")]
	InvalidCharacter {
		/// Kind of code (resource, language).
		kind: &'static str,
	},
	/// The code exceeded the allowed character count.
	#[error("{kind} code exceeds {max} characters.")]
	TooLong {
		/// Kind of code (resource, language).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_code! {
	ResourceCode,
	"IATA-style code naming one country, city, airport, airline, or aircraft type.",
	"Resource",
	8,
	u8::is_ascii_alphanumeric
}
def_code! {
	LanguageCode,
	"Two-letter ISO 639-1 language tag selecting which names the API returns.",
	"Language",
	2,
	u8::is_ascii_alphabetic
}

fn validate_view(
	kind: &'static str,
	max: usize,
	check: fn(&u8) -> bool,
	view: &str,
) -> Result<(), CodeError> {
	if view.is_empty() {
		return Err(CodeError::Empty { kind });
	}
	if !view.bytes().all(|byte| check(&byte)) {
		return Err(CodeError::InvalidCharacter { kind });
	}
	if view.len() > max {
		return Err(CodeError::TooLong { kind, max });
	}

	Ok(())
}
