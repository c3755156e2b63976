//! Bidirectional cursor over a paged reference resource.
//!
//! A [`Cursor`] holds exactly one [`PageEnvelope`] and walks the result set through the page's
//! hypermedia links. It starts empty with a seed URL built from the caller's parameters; the
//! first [`next`](Cursor::next) fetches the seed, every later navigation follows a relation
//! from the current [`LinkSet`].
//!
//! # Phases
//!
//! - [`Phase::Empty`]: nothing fetched yet; only `next` does anything.
//! - [`Phase::Populated`]: the held page came from the last successful fetch.
//! - [`Phase::Exhausted`]: `next`/`previous` found no target. The link set is replaced by one
//!   holding only `first`, `last`, and the opposite direction pointing back at the current page,
//!   and the navigation returns `false` without recording an error.
//!
//! # Concurrency
//!
//! Every navigation holds the state's write lock for its whole fetch, decode, and swap, so
//! readers never observe a half-updated page and navigations on one cursor never overlap.
//! Callers that queue on a fresh cursor's first `next` share the outcome of the seed fetch
//! instead of each advancing a page. A failed navigation leaves the held page untouched and
//! records the error for [`error`](Cursor::error); `false` alone does not distinguish a
//! boundary from a failure.
//!
//! Navigation methods return a [`NavFuture`], which is `Send`, so spawned tasks may share one
//! cursor behind an [`Arc`].
//!
//! # Schema Version
//!
//! A page whose `Meta` version differs from [`ClientConfig::meta_version`] is swapped in, but all
//! of its links count as absent. The navigation that fetched it reports
//! [`Error::SchemaVersion`]; later navigations simply return `false`.
//!
//! [`ClientConfig::meta_version`]: crate::config::ClientConfig::meta_version

pub mod links;
pub mod page;

pub use links::{LinkSet, Relation, UnknownRelation};
pub use page::PageEnvelope;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use async_lock::RwLockWriteGuard;
// self
use crate::{
	_prelude::*,
	client::Api,
	http::HttpClient,
	obs::{self, OpKind, OpOutcome, OpSpan},
	reference::Resource,
};

/// Boxed navigation future; `Send` so navigations can run on spawned tasks.
pub type NavFuture<'a> = Pin<Box<dyn Future<Output = bool> + 'a + Send>>;

/// Position of a cursor in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
	/// No page fetched yet.
	Empty,
	/// Holding the page returned by the last successful fetch.
	Populated,
	/// The given direction ran past the end of the result set.
	Exhausted(Relation),
}

#[derive(Debug)]
struct State<T> {
	seed: Option<Url>,
	seed_outcome: bool,
	page: PageEnvelope<T>,
	phase: Phase,
	error: Option<Arc<Error>>,
	version_reported: bool,
}

/// Stateful iterator over one paged resource.
pub struct Cursor<R, C>
where
	R: Resource,
	C: ?Sized + HttpClient,
{
	api: Arc<Api<C>>,
	state: AsyncRwLock<State<R::Item>>,
	seeds_completed: AtomicU64,
}
impl<R, C> Cursor<R, C>
where
	R: Resource,
	C: ?Sized + HttpClient,
{
	/// Creates an empty cursor whose first [`next`](Self::next) fetches `seed`.
	pub fn new(api: Arc<Api<C>>, seed: Url) -> Self {
		Self {
			api,
			state: AsyncRwLock::new(State {
				seed: Some(seed),
				seed_outcome: false,
				page: PageEnvelope::default(),
				phase: Phase::Empty,
				error: None,
				version_reported: false,
			}),
			seeds_completed: AtomicU64::new(0),
		}
	}

	/// Client used for navigation.
	pub fn api(&self) -> &Arc<Api<C>> {
		&self.api
	}

	/// Fetches the seed on first use, then follows the `next` link.
	pub fn next<'a>(&'a self, ctx: &'a Context) -> NavFuture<'a> {
		self.follow(ctx, Relation::Next)
	}

	/// Follows the `previous` link.
	pub fn previous<'a>(&'a self, ctx: &'a Context) -> NavFuture<'a> {
		self.follow(ctx, Relation::Previous)
	}

	/// Re-fetches the current page through its `self` link.
	pub fn reload<'a>(&'a self, ctx: &'a Context) -> NavFuture<'a> {
		self.follow(ctx, Relation::SelfLink)
	}

	/// Jumps to the first page.
	pub fn first<'a>(&'a self, ctx: &'a Context) -> NavFuture<'a> {
		self.follow(ctx, Relation::First)
	}

	/// Jumps to the last page.
	pub fn last<'a>(&'a self, ctx: &'a Context) -> NavFuture<'a> {
		self.follow(ctx, Relation::Last)
	}

	/// Follows the cross-resource `related` hint.
	pub fn related<'a>(&'a self, ctx: &'a Context) -> NavFuture<'a> {
		self.follow(ctx, Relation::Related)
	}

	/// Follows `relation` and replaces the held page with the target.
	///
	/// Returns `true` only when a page was fetched, decoded, and accepted. An absent `next` or
	/// `previous` moves the cursor to [`Phase::Exhausted`]; any other absent relation leaves the
	/// cursor unchanged.
	pub fn follow<'a>(&'a self, ctx: &'a Context, relation: Relation) -> NavFuture<'a> {
		const KIND: OpKind = OpKind::Navigate;

		Box::pin(async move {
			let observed_seeds = self.seeds_completed.load(Ordering::Acquire);
			let mut state = self.lock().await;
			let span = OpSpan::new(KIND, relation.as_str());

			obs::record_outcome(KIND, OpOutcome::Attempt);

			match span.instrument(self.step(&mut state, ctx, relation, observed_seeds)).await {
				Ok(moved) => {
					obs::record_outcome(KIND, OpOutcome::Success);

					moved
				},
				Err(e) => {
					state.error = Some(Arc::new(e));

					obs::record_outcome(KIND, OpOutcome::Failure);

					false
				},
			}
		})
	}

	/// Returns `true` when the held page has a `self` link and a supported schema version.
	pub async fn has_self(&self) -> bool {
		let state = self.state.read().await;

		self.lookup(&state, Relation::SelfLink).is_some()
	}

	/// Error recorded by the most recent navigation that failed, cleared by one that succeeds.
	pub async fn error(&self) -> Option<Arc<Error>> {
		self.state.read().await.error.clone()
	}

	/// Current lifecycle phase.
	pub async fn phase(&self) -> Phase {
		self.state.read().await.phase
	}

	/// Copy of the held items.
	pub async fn items(&self) -> Vec<R::Item> {
		self.state.read().await.page.items.clone()
	}

	/// Size of the whole result set as reported by the held page.
	pub async fn total_count(&self) -> u64 {
		self.state.read().await.page.total_count
	}

	/// Copy of the held link set.
	pub async fn links(&self) -> LinkSet {
		self.state.read().await.page.links.clone()
	}

	/// Copy of the held page.
	pub async fn snapshot(&self) -> PageEnvelope<R::Item> {
		self.state.read().await.page.clone()
	}

	/// Independent cursor holding a deep copy of the current page.
	///
	/// The copy navigates through `api` when given, otherwise through this cursor's client. It
	/// starts without an error.
	pub async fn copy(&self, api: Option<Arc<Api<C>>>) -> Self {
		let state = self.state.read().await;

		Self {
			api: api.unwrap_or_else(|| self.api.clone()),
			state: AsyncRwLock::new(State {
				seed: state.seed.clone(),
				seed_outcome: state.seed_outcome,
				page: state.page.clone(),
				phase: state.phase,
				error: None,
				version_reported: state.version_reported,
			}),
			seeds_completed: AtomicU64::new(0),
		}
	}

	async fn step(
		&self,
		state: &mut State<R::Item>,
		ctx: &Context,
		relation: Relation,
		observed_seeds: u64,
	) -> Result<bool> {
		if relation == Relation::Next
			&& self.seeds_completed.load(Ordering::Acquire) != observed_seeds
		{
			// A seed fetch finished while this caller waited for the lock.
			return Ok(state.seed_outcome);
		}
		if let Some(seed) = state.seed.clone() {
			if relation != Relation::Next {
				return Ok(false);
			}

			state.seed_outcome = false;

			let fetched = self.fetch_page(ctx, &seed).await;

			self.seeds_completed.fetch_add(1, Ordering::AcqRel);

			let page = fetched?;

			state.seed = None;

			let accepted = self.accept(state, page);

			state.seed_outcome = matches!(accepted, Ok(true));

			return accepted;
		}

		match self.lookup(state, relation).cloned() {
			Some(url) => {
				let page = self.fetch_page(ctx, &url).await?;

				self.accept(state, page)
			},
			None => {
				if matches!(relation, Relation::Next | Relation::Previous)
					&& self.version_matches(&state.page)
				{
					state.page.links = state.page.links.at_boundary(relation);
					state.phase = Phase::Exhausted(relation);
					state.error = None;
				}

				Ok(false)
			},
		}
	}

	/// Write lock future, boxed where it is created so navigation futures stay `Send`.
	fn lock(
		&self,
	) -> Pin<Box<dyn Future<Output = RwLockWriteGuard<'_, State<R::Item>>> + Send + '_>> {
		Box::pin(self.state.write())
	}

	fn accept(&self, state: &mut State<R::Item>, page: PageEnvelope<R::Item>) -> Result<bool> {
		let matches = self.version_matches(&page);
		let found = page.schema_version.clone();

		state.page = page;
		state.phase = Phase::Populated;

		if matches {
			state.error = None;

			return Ok(true);
		}
		if state.version_reported {
			return Ok(false);
		}

		state.version_reported = true;

		Err(Error::SchemaVersion { expected: self.api.config().meta_version.clone(), found })
	}

	fn lookup<'a>(&self, state: &'a State<R::Item>, relation: Relation) -> Option<&'a Url> {
		if !self.version_matches(&state.page) {
			return None;
		}

		state.page.links.get(relation)
	}

	fn version_matches(&self, page: &PageEnvelope<R::Item>) -> bool {
		page.schema_version == self.api.config().meta_version
	}

	async fn fetch_page(&self, ctx: &Context, url: &Url) -> Result<PageEnvelope<R::Item>> {
		let fetched = self.api.fetch(ctx, url).await?;

		Ok(PageEnvelope::decode::<R>(&fetched.body, fetched.content_type.as_deref())?)
	}
}
impl<R, C> Debug for Cursor<R, C>
where
	R: Resource,
	C: ?Sized + HttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Cursor").field("resource", &R::PATH).finish_non_exhaustive()
	}
}
