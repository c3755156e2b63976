//! One decoded page: items, links, and the metadata that came with them.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
// self
use crate::{
	_prelude::*,
	cursor::{LinkSet, Relation},
	decode::{self, Many, Text},
	error::DecodeError,
	reference::Resource,
};

/// Items of one page plus its `Meta` block.
#[derive(Clone, Debug, PartialEq)]
pub struct PageEnvelope<T> {
	/// Records in server order.
	pub items: Vec<T>,
	/// Navigation links.
	pub links: LinkSet,
	/// Size of the whole result set.
	pub total_count: u64,
	/// `Meta` version the page was produced with.
	pub schema_version: String,
}
impl<T> PageEnvelope<T> {
	/// Decodes a page of resource `R` from a response body in either format.
	///
	/// Link relations outside [`Relation`] are ignored; the first occurrence of a relation wins.
	pub fn decode<R>(body: &[u8], content_type: Option<&str>) -> Result<Self, DecodeError>
	where
		T: DeserializeOwned,
		R: Resource<Item = T>,
	{
		let mut value = decode::to_value(body, content_type)?;
		let mut resource = match value.get_mut(R::ROOT).map(Value::take) {
			Some(Value::Object(resource)) => resource,
			_ => return Err(DecodeError::UnexpectedRoot { expected: R::ROOT }),
		};
		let meta: MetaWire = match resource.remove("Meta") {
			None | Some(Value::Null) => return Err(DecodeError::MissingMeta),
			Some(meta) => decode::from_value(meta)?,
		};
		let items = match resource
			.remove(R::LIST)
			.and_then(|mut list| list.get_mut(R::ITEM).map(Value::take))
		{
			None | Some(Value::Null) => Vec::new(),
			Some(Value::Array(items)) =>
				items.into_iter().map(decode::from_value).collect::<Result<_, _>>()?,
			Some(item) => vec![decode::from_value(item)?],
		};
		let mut links = LinkSet::new();

		for link in meta.links {
			let Ok(relation) = link.rel.parse::<Relation>() else {
				continue;
			};

			if links.contains(relation) {
				continue;
			}

			let url = Url::parse(&link.href)
				.map_err(|source| DecodeError::InvalidLink { href: link.href.clone(), source })?;

			links.insert(relation, url);
		}

		Ok(Self { items, links, total_count: meta.total_count, schema_version: meta.version })
	}
}
impl<T> Default for PageEnvelope<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
			links: LinkSet::default(),
			total_count: 0,
			schema_version: String::new(),
		}
	}
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct MetaWire {
	#[serde(rename = "@Version", default)]
	#[serde_as(as = "Text")]
	version: String,
	#[serde(rename = "Link", default)]
	#[serde_as(as = "Many<_>")]
	links: Vec<LinkWire>,
	#[serde(rename = "TotalCount", default)]
	#[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
	total_count: u64,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct LinkWire {
	#[serde(rename = "@Rel")]
	#[serde_as(as = "Text")]
	rel: String,
	#[serde(rename = "@Href")]
	#[serde_as(as = "Text")]
	href: String,
}
