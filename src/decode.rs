//! Response decoding and status classification.
//!
//! The API is inconsistent about the formats it serves (and about the `Content-Type` it
//! declares), so bodies are sniffed: a leading `<` means XML, a leading `{` or `[` means JSON.
//! Both formats are normalized into one [`Value`] tree (see [`xml`]) before serde maps them onto
//! typed shapes.
//!
//! Status codes follow a fixed table: `200` succeeds, `401`/`403` are gateway rejections,
//! `400`/`404`/`405` carry a structured processing error, and everything else is unknown.

pub mod xml;

// std
use std::marker::PhantomData;
// crates.io
use serde::{Deserializer, Serializer, de::DeserializeOwned};
use serde_json::Value;
use serde_with::{DeserializeAs, DisplayFromStr, PickFirst, SerializeAs, serde_as};
// self
use crate::{
	_prelude::*,
	error::{ApiError, DecodeError, GatewayError, UnknownError},
};

/// Body formats served by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
	/// JSON document.
	Json,
	/// XML document.
	Xml,
}
impl Format {
	/// Detects the format from the first significant byte of `body`.
	///
	/// A UTF-8 byte-order mark and leading whitespace are skipped.
	pub fn sniff(body: &[u8]) -> Option<Self> {
		let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);

		match body.iter().find(|byte| !byte.is_ascii_whitespace())? {
			b'<' => Some(Self::Xml),
			b'{' | b'[' => Some(Self::Json),
			_ => None,
		}
	}

	/// Maps a `Content-Type` header value onto a format.
	pub fn from_content_type(content_type: &str) -> Option<Self> {
		let essence = content_type.split(';').next().unwrap_or_default().trim();

		if essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json") {
			Some(Self::Json)
		} else if essence.eq_ignore_ascii_case("application/xml")
			|| essence.eq_ignore_ascii_case("text/xml")
			|| essence.ends_with("+xml")
		{
			Some(Self::Xml)
		} else {
			None
		}
	}
}

/// Error classes keyed by HTTP status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// `401`/`403`: credentials rejected by the gateway.
	Gateway,
	/// `400`/`404`/`405`: structured processing error.
	Api,
	/// Any other non-`200` status.
	Unknown,
}
impl ErrorKind {
	/// Classifies `status`; `None` means success.
	pub const fn from_status(status: u16) -> Option<Self> {
		match status {
			200 => None,
			401 | 403 => Some(Self::Gateway),
			400 | 404 | 405 => Some(Self::Api),
			_ => Some(Self::Unknown),
		}
	}
}

/// Closed set of outcomes for one API response.
#[derive(Debug)]
pub enum Outcome<T> {
	/// `200` with a body of the expected shape.
	Success(T),
	/// Gateway rejection.
	Gateway(GatewayError),
	/// Structured processing error.
	Api(ApiError),
	/// Undocumented status.
	Unknown(UnknownError),
	/// `200` whose body could not be decoded.
	Decode(DecodeError),
}
impl<T> Outcome<T> {
	/// Converts the outcome into the crate's [`Result`].
	pub fn into_result(self) -> Result<T> {
		match self {
			Self::Success(value) => Ok(value),
			Self::Gateway(e) => Err(e.into()),
			Self::Api(e) => Err(e.into()),
			Self::Unknown(e) => Err(e.into()),
			Self::Decode(e) => Err(e.into()),
		}
	}

	/// Chains a decoding step onto a successful outcome.
	pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, DecodeError>) -> Outcome<U> {
		match self {
			Self::Success(value) => match f(value) {
				Ok(value) => Outcome::Success(value),
				Err(e) => Outcome::Decode(e),
			},
			Self::Gateway(e) => Outcome::Gateway(e),
			Self::Api(e) => Outcome::Api(e),
			Self::Unknown(e) => Outcome::Unknown(e),
			Self::Decode(e) => Outcome::Decode(e),
		}
	}
}

/// Classifies a response by status, decoding the error body for failures.
///
/// A structured error body that cannot be decoded is reported as [`UnknownError`] with the raw
/// body, so diagnostics are never lost.
pub fn classify(status: u16, body: &[u8], content_type: Option<&str>) -> Outcome<()> {
	let unknown = || UnknownError { status, body: String::from_utf8_lossy(body).into_owned() };

	match ErrorKind::from_status(status) {
		None => Outcome::Success(()),
		Some(ErrorKind::Gateway) => match decode_body::<GatewayBody>(body, content_type) {
			Ok(wire) => Outcome::Gateway(GatewayError { status, message: wire.error }),
			Err(_) => Outcome::Unknown(unknown()),
		},
		Some(ErrorKind::Api) => match decode_body::<ProcessingErrorsBody>(body, content_type) {
			Ok(wire) => match wire.errors.list.into_iter().next() {
				Some(error) => Outcome::Api(error.into_api_error(status)),
				None => Outcome::Unknown(unknown()),
			},
			Err(_) => Outcome::Unknown(unknown()),
		},
		Some(ErrorKind::Unknown) => Outcome::Unknown(unknown()),
	}
}

/// Classifies a response and decodes a successful body into `T`.
pub fn decode_response<T>(status: u16, body: &[u8], content_type: Option<&str>) -> Outcome<T>
where
	T: DeserializeOwned,
{
	classify(status, body, content_type).and_then(|()| decode_body(body, content_type))
}

/// Parses `body` into the normalized value tree.
///
/// The format is sniffed from the body; `content_type` only breaks the tie when sniffing fails.
pub fn to_value(body: &[u8], content_type: Option<&str>) -> Result<Value, DecodeError> {
	let format = Format::sniff(body)
		.or_else(|| content_type.and_then(Format::from_content_type))
		.ok_or(DecodeError::UnsupportedFormat)?;

	match format {
		Format::Xml => xml::to_value(body),
		Format::Json => {
			let mut deserializer = serde_json::Deserializer::from_slice(body);

			serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|source| DecodeError::Json { source })
		},
	}
}

/// Deserializes a normalized value tree into `T`, keeping the failing path.
pub fn from_value<T>(value: Value) -> Result<T, DecodeError>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value).map_err(|source| DecodeError::Json { source })
}

/// Sniffs, normalizes, and deserializes `body` into `T`.
pub fn decode_body<T>(body: &[u8], content_type: Option<&str>) -> Result<T, DecodeError>
where
	T: DeserializeOwned,
{
	from_value(to_value(body, content_type)?)
}

/// `serde_with` adapter reading element text that may arrive as a string, number, boolean,
/// `null` (empty element), or `{ "$": .. }` object.
#[derive(Debug)]
pub struct Text;
impl<'de> DeserializeAs<'de, String> for Text {
	fn deserialize_as<D>(deserializer: D) -> Result<String, D::Error>
	where
		D: Deserializer<'de>,
	{
		fn flatten(value: Value) -> Option<String> {
			match value {
				Value::Null => Some(String::new()),
				Value::String(text) => Some(text),
				Value::Bool(flag) => Some(flag.to_string()),
				Value::Number(number) => Some(number.to_string()),
				Value::Object(mut object) => object.remove("$").and_then(flatten),
				Value::Array(_) => None,
			}
		}

		let value = Value::deserialize(deserializer)?;

		flatten(value).ok_or_else(|| serde::de::Error::custom("expected element text"))
	}
}
impl SerializeAs<String> for Text {
	fn serialize_as<S>(source: &String, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(source)
	}
}

/// `serde_with` adapter for repeated elements: an array yields every entry, `null` yields none,
/// and any other value is a single entry.
///
/// The shape is decided before the entries are decoded, so a struct whose visitor would also
/// accept a sequence never swallows a whole array as one entry.
#[derive(Debug)]
pub struct Many<U>(PhantomData<U>);
impl<'de, T, U> DeserializeAs<'de, Vec<T>> for Many<U>
where
	U: DeserializeAs<'de, T>,
{
	fn deserialize_as<D>(deserializer: D) -> Result<Vec<T>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let entries = match Value::deserialize(deserializer)? {
			Value::Null => Vec::new(),
			Value::Array(entries) => entries,
			entry => vec![entry],
		};

		entries
			.into_iter()
			.map(|entry| U::deserialize_as(entry).map_err(serde::de::Error::custom))
			.collect()
	}
}

#[derive(Debug, Deserialize)]
struct GatewayBody {
	#[serde(rename = "Error")]
	error: String,
}

#[derive(Debug, Deserialize)]
struct ProcessingErrorsBody {
	#[serde(rename = "ProcessingErrors")]
	errors: ProcessingErrorList,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct ProcessingErrorList {
	#[serde(rename = "ProcessingError", default)]
	#[serde_as(as = "Many<_>")]
	list: Vec<ProcessingErrorWire>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct ProcessingErrorWire {
	#[serde(rename = "@RetryIndicator", default)]
	#[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
	retry_indicator: bool,
	#[serde(rename = "Type", default)]
	#[serde_as(as = "Text")]
	kind: String,
	#[serde(rename = "Code", default)]
	#[serde_as(as = "Text")]
	code: String,
	#[serde(rename = "Description", default)]
	#[serde_as(as = "Text")]
	description: String,
	#[serde(rename = "InfoURL", default)]
	#[serde_as(as = "Text")]
	info_url: String,
}
impl ProcessingErrorWire {
	fn into_api_error(self, status: u16) -> ApiError {
		ApiError {
			status,
			retry_indicator: self.retry_indicator,
			kind: self.kind,
			code: self.code,
			description: self.description,
			info_url: self.info_url,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn sniffing_ignores_bom_whitespace_and_headers() {
		assert_eq!(Format::sniff(b"\xEF\xBB\xBF  <a/>"), Some(Format::Xml));
		assert_eq!(Format::sniff(b"\n{\"a\":1}"), Some(Format::Json));
		assert_eq!(Format::sniff(b"[]"), Some(Format::Json));
		assert_eq!(Format::sniff(b"plain text"), None);
		assert_eq!(Format::sniff(b""), None);

		let value = to_value(b"<Error>invalid_token</Error>", Some("application/json"))
			.expect("XML body should decode despite a JSON header.");

		assert_eq!(value, serde_json::json!({ "Error": "invalid_token" }));
	}

	#[test]
	fn unsupported_bodies_are_rejected() {
		let err = to_value(b"Developer Inactive", Some("text/plain"))
			.expect_err("Plain text must not decode.");

		assert!(matches!(err, DecodeError::UnsupportedFormat));
	}

	#[test]
	fn status_table_is_fixed() {
		assert_eq!(ErrorKind::from_status(200), None);
		assert_eq!(ErrorKind::from_status(201), Some(ErrorKind::Unknown));
		assert_eq!(ErrorKind::from_status(401), Some(ErrorKind::Gateway));
		assert_eq!(ErrorKind::from_status(403), Some(ErrorKind::Gateway));

		for status in [400, 404, 405] {
			assert_eq!(ErrorKind::from_status(status), Some(ErrorKind::Api));
		}
		for status in [402, 429, 500, 503] {
			assert_eq!(ErrorKind::from_status(status), Some(ErrorKind::Unknown));
		}
	}

	#[test]
	fn gateway_json_body_becomes_gateway_error() {
		match classify(401, br#"{"Error":"invalid_token"}"#, Some("application/json")) {
			Outcome::Gateway(e) => {
				assert_eq!(e.status, 401);
				assert_eq!(e.message, "invalid_token");
			},
			other => panic!("Unexpected outcome: {other:?}."),
		}
	}

	#[test]
	fn processing_error_xml_becomes_api_error() {
		let body = br#"<?xml version="1.0" encoding="UTF-8"?>
			<ProcessingErrors>
				<ProcessingError RetryIndicator="true">
					<Type>BR</Type>
					<Code>404</Code>
					<Description>Country code XX is unknown.</Description>
					<InfoURL>https://developer.lufthansa.com/docs/read/api_basics/Error_Messages</InfoURL>
				</ProcessingError>
			</ProcessingErrors>"#;

		match classify(404, body, Some("application/xml")) {
			Outcome::Api(e) => {
				assert_eq!(e.status, 404);
				assert!(e.retry_indicator);
				assert_eq!(e.kind, "BR");
				assert_eq!(e.code, "404");
				assert_eq!(e.description, "Country code XX is unknown.");
				assert_eq!(
					e.info_url,
					"https://developer.lufthansa.com/docs/read/api_basics/Error_Messages"
				);
			},
			other => panic!("Unexpected outcome: {other:?}."),
		}
	}

	#[test]
	fn processing_error_json_accepts_native_literals() {
		let body = br#"{"ProcessingErrors":{"ProcessingError":[{"@RetryIndicator":false,"Type":"BR","Code":400,"Description":"Bad limit.","InfoURL":"https://example.com"}]}}"#;

		match classify(400, body, None) {
			Outcome::Api(e) => {
				assert!(!e.retry_indicator);
				assert_eq!(e.code, "400");
			},
			other => panic!("Unexpected outcome: {other:?}."),
		}
	}

	#[test]
	fn undocumented_statuses_keep_the_raw_body() {
		match classify(500, b"<h1>Internal</h1>", None) {
			Outcome::Unknown(e) => {
				assert_eq!(e.status, 500);
				assert_eq!(e.body, "<h1>Internal</h1>");
			},
			other => panic!("Unexpected outcome: {other:?}."),
		}

		assert!(matches!(classify(403, b"<h1>Developer Inactive</h1>", None), Outcome::Unknown(_)));
	}

	#[test]
	fn decode_response_maps_success_and_failures() {
		#[derive(Debug, Deserialize)]
		struct Shape {
			#[serde(rename = "Value")]
			value: String,
		}

		match decode_response::<Shape>(200, br#"{"Value":"x"}"#, None) {
			Outcome::Success(shape) => assert_eq!(shape.value, "x"),
			other => panic!("Unexpected outcome: {other:?}."),
		}

		assert!(matches!(decode_response::<Shape>(200, br#"{"Other":1}"#, None), Outcome::Decode(_)));
		assert!(decode_response::<Shape>(405, b"", None).into_result().is_err());
	}

	#[test]
	fn many_keeps_every_entry_of_an_array() {
		#[serde_as]
		#[derive(Debug, Deserialize)]
		struct Label {
			#[serde(rename = "@Code")]
			#[serde_as(as = "Text")]
			code: String,
			#[serde(rename = "$")]
			#[serde_as(as = "Text")]
			text: String,
		}

		#[serde_as]
		#[derive(Debug, Deserialize)]
		struct Labels {
			#[serde(rename = "Label", default)]
			#[serde_as(as = "Many<_>")]
			labels: Vec<Label>,
		}

		let labels: Labels = serde_json::from_str(
			r#"{"Label":[{"@Code":"EN","$":"Germany"},{"@Code":"DE","$":"Deutschland"}]}"#,
		)
		.expect("Repeated labels should decode.");

		assert_eq!(labels.labels.len(), 2);
		assert_eq!(labels.labels[0].code, "EN");
		assert_eq!(labels.labels[1].text, "Deutschland");

		let labels: Labels = serde_json::from_str(r#"{"Label":{"@Code":"EN","$":"Denmark"}}"#)
			.expect("Single label should decode.");

		assert_eq!(labels.labels.len(), 1);
		assert_eq!(labels.labels[0].text, "Denmark");

		let labels: Labels =
			serde_json::from_str(r#"{"Label":null}"#).expect("Empty label list should decode.");

		assert!(labels.labels.is_empty());
	}
}
