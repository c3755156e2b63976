//! XML to value-tree conversion.
//!
//! The API serves the same documents as XML or JSON. Its JSON rendering maps attributes to
//! `@Name` keys, mixed element text to `$`, and repeated children to arrays. This module builds
//! that same tree from XML, so one set of serde types decodes either format:
//!
//! - an element with neither attributes nor children becomes a string (or null when empty);
//! - otherwise it becomes an object holding `@attr` keys, child elements, and `$` for text;
//! - repeated child names collapse into an array in document order;
//! - the document root is wrapped as `{ RootName: ... }`.

// crates.io
use quick_xml::{Reader, events::Event};
use serde_json::{Map, Value};
// self
use crate::error::DecodeError;

#[derive(Debug, Default)]
struct Element {
	name: String,
	attributes: Vec<(String, String)>,
	children: Vec<(String, Value)>,
	text: String,
}
impl Element {
	fn into_value(self) -> (String, Value) {
		let Self { name, attributes, children, text } = self;

		if attributes.is_empty() && children.is_empty() {
			let value = if text.is_empty() { Value::Null } else { Value::String(text) };

			return (name, value);
		}

		let mut object = Map::new();

		for (key, value) in attributes {
			object.insert(format!("@{key}"), Value::String(value));
		}
		for (key, value) in children {
			match object.get_mut(&key) {
				Some(Value::Array(items)) => items.push(value),
				Some(existing) => {
					let first = existing.take();

					*existing = Value::Array(vec![first, value]);
				},
				None => {
					object.insert(key, value);
				},
			}
		}

		if !text.is_empty() {
			object.insert("$".into(), Value::String(text));
		}

		(name, Value::Object(object))
	}
}

/// Parses an XML document into the API's JSON-shaped value tree.
pub fn to_value(body: &[u8]) -> Result<Value, DecodeError> {
	let text = std::str::from_utf8(body).map_err(|e| xml_error(e.to_string()))?;
	let mut reader = Reader::from_str(text);

	reader.config_mut().trim_text(true);

	let mut stack = Vec::<Element>::new();
	let mut root = None;

	loop {
		match reader.read_event().map_err(|e| xml_error(e.to_string()))? {
			Event::Start(start) => {
				let element = open(&start)?;

				stack.push(element);
			},
			Event::Empty(start) => {
				let element = open(&start)?;

				close(&mut stack, &mut root, element)?;
			},
			Event::End(_) => {
				let element =
					stack.pop().ok_or_else(|| xml_error("unexpected closing tag".into()))?;

				close(&mut stack, &mut root, element)?;
			},
			Event::Text(content) => {
				let content = content.unescape().map_err(|e| xml_error(e.to_string()))?;

				if let Some(element) = stack.last_mut() {
					element.text.push_str(&content);
				}
			},
			Event::CData(content) =>
				if let Some(element) = stack.last_mut() {
					element.text.push_str(&String::from_utf8_lossy(&content));
				},
			Event::Eof => break,
			_ => {},
		}
	}

	if !stack.is_empty() {
		return Err(xml_error("document ended inside an element".into()));
	}

	root.ok_or_else(|| xml_error("document has no root element".into()))
}

fn open(start: &quick_xml::events::BytesStart) -> Result<Element, DecodeError> {
	let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
	let mut attributes = Vec::new();

	for attribute in start.attributes() {
		let attribute = attribute.map_err(|e| xml_error(e.to_string()))?;
		let key = attribute.key;

		if key.as_ref().starts_with(b"xmlns") {
			continue;
		}

		let value = attribute.unescape_value().map_err(|e| xml_error(e.to_string()))?;

		attributes.push((
			String::from_utf8_lossy(key.local_name().as_ref()).into_owned(),
			value.into_owned(),
		));
	}

	Ok(Element { name, attributes, ..Default::default() })
}

fn close(
	stack: &mut [Element],
	root: &mut Option<Value>,
	element: Element,
) -> Result<(), DecodeError> {
	let (name, value) = element.into_value();

	match stack.last_mut() {
		Some(parent) => parent.children.push((name, value)),
		None if root.is_none() => {
			let mut object = Map::new();

			object.insert(name, value);

			*root = Some(Value::Object(object));
		},
		None => return Err(xml_error("document has more than one root element".into())),
	}

	Ok(())
}

fn xml_error(message: String) -> DecodeError {
	DecodeError::Xml { message }
}
