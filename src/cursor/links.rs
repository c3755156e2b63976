//! Link relations and the relation-to-URL map carried by every page.

// self
use crate::_prelude::*;

/// Closed vocabulary of link relations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
	/// The page itself.
	#[serde(rename = "self")]
	SelfLink,
	/// First page of the result set.
	First,
	/// Last page of the result set.
	Last,
	/// Following page.
	Next,
	/// Preceding page.
	Previous,
	/// Cross-resource hint.
	Related,
}
impl Relation {
	/// Every relation, in declaration order.
	pub const ALL: [Self; 6] =
		[Self::SelfLink, Self::First, Self::Last, Self::Next, Self::Previous, Self::Related];

	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::SelfLink => "self",
			Self::First => "first",
			Self::Last => "last",
			Self::Next => "next",
			Self::Previous => "previous",
			Self::Related => "related",
		}
	}

	/// The relation pointing the other way: next and previous swap, first and last swap, self
	/// and related map to themselves.
	pub const fn opposite(self) -> Self {
		match self {
			Self::SelfLink => Self::SelfLink,
			Self::First => Self::Last,
			Self::Last => Self::First,
			Self::Next => Self::Previous,
			Self::Previous => Self::Next,
			Self::Related => Self::Related,
		}
	}
}
impl Display for Relation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Relation {
	type Err = UnknownRelation;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|relation| relation.as_str().eq_ignore_ascii_case(s))
			.or_else(|| s.eq_ignore_ascii_case("prev").then_some(Self::Previous))
			.ok_or_else(|| UnknownRelation(s.to_owned()))
	}
}

/// Error returned when a link relation falls outside [`Relation`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown link relation `{0}`.")]
pub struct UnknownRelation(pub String);

/// Relation-to-URL map. An absent relation means that direction is unavailable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkSet(BTreeMap<Relation, Url>);
impl LinkSet {
	/// Empty link set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Target of `relation`, if present.
	pub fn get(&self, relation: Relation) -> Option<&Url> {
		self.0.get(&relation)
	}

	/// Returns `true` when `relation` is present.
	pub fn contains(&self, relation: Relation) -> bool {
		self.0.contains_key(&relation)
	}

	/// Sets the target of `relation`, returning the previous one.
	pub fn insert(&mut self, relation: Relation, url: Url) -> Option<Url> {
		self.0.insert(relation, url)
	}

	/// Removes `relation`.
	pub fn remove(&mut self, relation: Relation) -> Option<Url> {
		self.0.remove(&relation)
	}

	/// Iterates present relations in [`Relation`] order.
	pub fn iter(&self) -> impl Iterator<Item = (Relation, &Url)> {
		self.0.iter().map(|(relation, url)| (*relation, url))
	}

	/// Number of present relations.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no relation is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Link set left behind when navigating `exhausted` finds no target.
	///
	/// Keeps `first` and `last`, and points the opposite direction back at the current page
	/// (its `self` link), so the caller can turn around or restart. When there is no `self`
	/// link (the boundary was already reached), the existing opposite link is kept.
	pub fn at_boundary(&self, exhausted: Relation) -> Self {
		let mut links = Self::new();

		for relation in [Relation::First, Relation::Last] {
			if let Some(url) = self.get(relation) {
				links.insert(relation, url.clone());
			}
		}

		let back = exhausted.opposite();

		if let Some(url) = self.get(Relation::SelfLink).or_else(|| self.get(back)) {
			links.insert(back, url.clone());
		}

		links
	}
}
impl FromIterator<(Relation, Url)> for LinkSet {
	fn from_iter<I: IntoIterator<Item = (Relation, Url)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}
