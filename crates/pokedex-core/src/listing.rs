// ── Listing controller ──
//
// Owns the filter criteria and the accumulated result list for the catalog
// view. The controller never performs I/O: every transition that needs a
// fetch hands back a `PageRequest`, and the caller reports the outcome via
// `complete`. Each request carries a sequence number; only the most recently
// issued request may change state, so a response to superseded criteria is
// dropped instead of clobbering newer results.

use pokedex_api::{DEFAULT_LIMIT, Filters, ListResponse, Pokemon, PokemonType};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::source::CatalogSource;

/// Page sizes offered to the user.
pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

pub const LIST_ERROR: &str = "Failed to load Pokemon list. Please try again later.";
pub const MORE_ERROR: &str = "Failed to load more Pokemon. Please try again later.";
pub const TYPES_ERROR: &str = "Failed to load Pokemon types. Please try again later.";

// ── Phase ────────────────────────────────────────────────────────────

/// What the listing is doing right now.
///
/// A single enum keeps "initial load" and "loading more" mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListingPhase {
    #[default]
    Idle,
    /// Fetching page 1 for new criteria.
    Loading,
    /// Fetching the page after the last one received.
    LoadingMore,
    /// The last fetch failed; holds the user-facing message.
    Error(String),
}

// ── Requests & completions ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First page for new criteria; replaces the list.
    Reset,
    /// The next page; appends to the list.
    Continuation,
}

/// A fetch the caller must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub kind: RequestKind,
    pub filters: Filters,
}

impl PageRequest {
    pub fn page(&self) -> u32 {
        self.filters.page_or_default()
    }
}

/// Outcome of feeding a response back into the controller.
#[derive(Debug)]
pub enum Completion {
    /// Page 1 arrived; the list now holds `count` entries.
    Replaced { count: usize },
    /// A continuation page arrived with `added` entries.
    Appended { added: usize },
    /// The fetch failed; the list is unchanged.
    Failed(CoreError),
    /// The response belongs to a superseded request and was ignored.
    Stale,
}

// ── Controller ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ListingController {
    /// Criteria of the most recent reset. `page` tracks the last page
    /// successfully merged into `entries`.
    filters: Filters,
    entries: Vec<Pokemon>,
    phase: ListingPhase,
    has_more: bool,
    /// Sequence number of the latest issued request.
    seq: u64,
    types: Vec<PokemonType>,
    types_error: Option<String>,
}

impl Default for ListingController {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl ListingController {
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: Filters::first_page().with_limit(page_size),
            entries: Vec::new(),
            phase: ListingPhase::Idle,
            has_more: false,
            seq: 0,
            types: Vec::new(),
            types_error: None,
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn entries(&self) -> &[Pokemon] {
        &self.entries
    }

    pub fn phase(&self) -> &ListingPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListingPhase::Loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.phase == ListingPhase::LoadingMore
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Current error message: a listing failure first, then a taxonomy one.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ListingPhase::Error(message) => Some(message.as_str()),
            _ => self.types_error.as_deref(),
        }
    }

    /// Nothing matched and nothing is loading.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && !self.is_loading()
    }

    /// Every page has been merged and there was at least one entry.
    pub fn reached_end(&self) -> bool {
        !self.has_more && !self.entries.is_empty() && !self.is_busy()
    }

    pub fn types(&self) -> &[PokemonType] {
        &self.types
    }

    pub fn is_type_selected(&self, type_id: u32) -> bool {
        self.filters.types.contains(&type_id)
    }

    fn is_busy(&self) -> bool {
        matches!(self.phase, ListingPhase::Loading | ListingPhase::LoadingMore)
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn issue(&mut self, kind: RequestKind, filters: Filters) -> PageRequest {
        self.seq += 1;
        debug!(seq = self.seq, ?kind, page = filters.page_or_default(), "issuing page request");
        PageRequest {
            seq: self.seq,
            kind,
            filters,
        }
    }

    /// Replace the criteria and start over at page 1.
    ///
    /// Entries stay on screen until the response arrives.
    pub fn apply_filters(&mut self, filters: Filters) -> PageRequest {
        self.apply_filters_from(filters, 1)
    }

    /// Like [`apply_filters`](Self::apply_filters), but the list starts at
    /// `page` instead of page 1.
    pub fn apply_filters_from(&mut self, filters: Filters, page: u32) -> PageRequest {
        self.filters = filters.with_page(page.max(1));
        self.phase = ListingPhase::Loading;
        self.has_more = false;
        self.issue(RequestKind::Reset, self.filters.clone())
    }

    /// Reload page 1 with the current criteria.
    pub fn refresh(&mut self) -> PageRequest {
        self.apply_filters(self.filters.clone())
    }

    /// The scroll sentinel came into view.
    ///
    /// Returns the next page request, or `None` when there is nothing more
    /// to load or a fetch is already outstanding.
    pub fn sentinel_visible(&mut self) -> Option<PageRequest> {
        if !self.has_more || self.is_busy() {
            return None;
        }
        self.phase = ListingPhase::LoadingMore;
        let next_page = self.filters.page_or_default() + 1;
        let filters = self.filters.clone().with_page(next_page);
        Some(self.issue(RequestKind::Continuation, filters))
    }

    /// Feed the outcome of `request` back in.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: Result<ListResponse, CoreError>,
    ) -> Completion {
        if request.seq != self.seq {
            debug!(seq = request.seq, latest = self.seq, "discarding stale page response");
            return Completion::Stale;
        }

        match result {
            Ok(resp) => {
                self.has_more = resp.has_next();
                self.phase = ListingPhase::Idle;
                match request.kind {
                    RequestKind::Reset => {
                        self.entries = resp.results;
                        Completion::Replaced {
                            count: self.entries.len(),
                        }
                    }
                    RequestKind::Continuation => {
                        let added = resp.results.len();
                        self.entries.extend(resp.results);
                        self.filters.page = Some(request.page());
                        Completion::Appended { added }
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, page = request.page(), "page fetch failed");
                let message = match request.kind {
                    RequestKind::Reset => LIST_ERROR,
                    RequestKind::Continuation => MORE_ERROR,
                };
                self.phase = ListingPhase::Error(message.into());
                Completion::Failed(err)
            }
        }
    }

    /// Store the type taxonomy, or remember that it failed.
    pub fn types_loaded(&mut self, result: Result<Vec<PokemonType>, CoreError>) {
        match result {
            Ok(types) => {
                self.types = types;
                self.types_error = None;
            }
            Err(err) => {
                warn!(error = %err, "type taxonomy fetch failed");
                self.types_error = Some(TYPES_ERROR.into());
            }
        }
    }

    // ── Filter editing ───────────────────────────────────────────────

    /// Select or deselect a type id and reload.
    pub fn toggle_type(&mut self, type_id: u32) -> PageRequest {
        let mut filters = self.filters.clone();
        if let Some(pos) = filters.types.iter().position(|id| *id == type_id) {
            filters.types.remove(pos);
        } else {
            filters.types.push(type_id);
        }
        self.apply_filters(filters)
    }

    /// Set the name query and reload. An empty query clears the filter.
    pub fn set_name(&mut self, name: &str) -> PageRequest {
        let mut filters = self.filters.clone();
        filters.name = Some(name.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_owned);
        self.apply_filters(filters)
    }

    pub fn set_limit(&mut self, limit: u32) -> PageRequest {
        let filters = self.filters.clone().with_limit(limit);
        self.apply_filters(filters)
    }

    /// Advance to the next entry of `PAGE_SIZES`, wrapping around.
    pub fn cycle_limit(&mut self) -> PageRequest {
        let current = self.filters.limit_or_default();
        let next = PAGE_SIZES
            .iter()
            .copied()
            .find(|size| *size > current)
            .unwrap_or(PAGE_SIZES[0]);
        self.set_limit(next)
    }

    /// Drop the name and type criteria and restore the default page size.
    pub fn clear_filters(&mut self) -> PageRequest {
        let mut filters = self.filters.clone().with_limit(DEFAULT_LIMIT);
        filters.name = None;
        filters.types.clear();
        filters.type_id = None;
        self.apply_filters(filters)
    }

    /// Any user-editable criterion is set.
    pub fn has_active_filters(&self) -> bool {
        self.filters.name.is_some() || !self.filters.types.is_empty()
    }
}

// ── Async driver ─────────────────────────────────────────────────────

/// Couples a `ListingController` with a `CatalogSource` for callers that
/// fetch inline (the CLI, tests). The TUI drives the controller directly
/// so fetches can run on background tasks.
pub struct Catalog<S> {
    source: S,
    listing: ListingController,
}

impl<S: CatalogSource> Catalog<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            listing: ListingController::new(page_size),
        }
    }

    pub fn listing(&self) -> &ListingController {
        &self.listing
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load page 1 for `filters`.
    pub async fn apply_filters(&mut self, filters: Filters) -> Completion {
        self.apply_filters_from(filters, 1).await
    }

    /// Load `page` for `filters` as the start of a fresh list.
    pub async fn apply_filters_from(&mut self, filters: Filters, page: u32) -> Completion {
        let request = self.listing.apply_filters_from(filters, page);
        self.run(&request).await
    }

    /// Load the next page if the sentinel guard allows it.
    pub async fn load_more(&mut self) -> Option<Completion> {
        let request = self.listing.sentinel_visible()?;
        Some(self.run(&request).await)
    }

    /// Keep loading continuation pages until the listing is exhausted, a
    /// fetch fails, or `max_pages` pages (including page 1) are merged.
    pub async fn load_remaining(&mut self, max_pages: Option<u32>) -> Result<(), CoreError> {
        let mut merged = 1;
        while max_pages.is_none_or(|max| merged < max) {
            match self.load_more().await {
                None => break,
                Some(Completion::Failed(err)) => return Err(err),
                Some(_) => merged += 1,
            }
        }
        Ok(())
    }

    pub async fn load_types(&mut self) {
        let result = self.source.pokemon_types().await;
        self.listing.types_loaded(result);
    }

    async fn run(&mut self, request: &PageRequest) -> Completion {
        let result = self.source.list_pokemon(&request.filters).await;
        self.listing.complete(request, result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pokedex_api::PokemonDetail;
    use pretty_assertions::assert_eq;

    use super::*;

    fn pokemon(id: u32) -> Pokemon {
        Pokemon {
            id,
            name: format!("p{id}"),
            image: String::new(),
            pokedex_id: id,
            types: Vec::new(),
            sprite: None,
            generation: None,
        }
    }

    fn page(ids: std::ops::RangeInclusive<u32>, has_next: bool) -> ListResponse {
        ListResponse {
            count: 151,
            next: has_next.then(|| "next".to_owned()),
            previous: None,
            results: ids.map(pokemon).collect(),
        }
    }

    fn ids(listing: &ListingController) -> Vec<u32> {
        listing.entries().iter().map(|p| p.pokedex_id).collect()
    }

    // ── Controller ──────────────────────────────────────────────────

    #[test]
    fn continuation_appends_after_first_page() {
        let mut listing = ListingController::new(2);
        let first = listing.apply_filters(Filters::default().with_limit(2));
        assert!(listing.is_loading());
        listing.complete(&first, Ok(page(1..=2, true)));

        let second = listing.sentinel_visible().unwrap();
        assert_eq!(second.page(), 2);
        assert_eq!(second.kind, RequestKind::Continuation);
        assert!(listing.is_loading_more());
        listing.complete(&second, Ok(page(3..=4, false)));

        assert_eq!(ids(&listing), vec![1, 2, 3, 4]);
        assert_eq!(listing.filters().page, Some(2));
        assert!(!listing.has_more());
        assert!(listing.reached_end());
    }

    #[test]
    fn second_trigger_while_outstanding_is_ignored() {
        let mut listing = ListingController::default();
        let first = listing.refresh();
        listing.complete(&first, Ok(page(1..=50, true)));

        assert!(listing.sentinel_visible().is_some());
        assert!(listing.sentinel_visible().is_none());
    }

    #[test]
    fn sentinel_is_ignored_during_initial_load() {
        let mut listing = ListingController::default();
        listing.refresh();
        assert!(listing.sentinel_visible().is_none());
    }

    #[test]
    fn sentinel_is_ignored_without_more_pages() {
        let mut listing = ListingController::default();
        let first = listing.refresh();
        listing.complete(&first, Ok(page(1..=3, false)));
        assert!(listing.sentinel_visible().is_none());
    }

    #[test]
    fn failed_reset_keeps_entries_and_sets_message() {
        let mut listing = ListingController::default();
        let first = listing.refresh();
        listing.complete(&first, Ok(page(1..=3, true)));

        let retry = listing.refresh();
        let completion = listing.complete(&retry, Err(CoreError::Timeout));

        assert!(matches!(completion, Completion::Failed(CoreError::Timeout)));
        assert_eq!(ids(&listing), vec![1, 2, 3]);
        assert_eq!(listing.error(), Some(LIST_ERROR));
        assert!(!listing.is_loading());
    }

    #[test]
    fn failed_continuation_uses_its_own_message() {
        let mut listing = ListingController::default();
        let first = listing.refresh();
        listing.complete(&first, Ok(page(1..=3, true)));

        let more = listing.sentinel_visible().unwrap();
        listing.complete(&more, Err(CoreError::Timeout));

        assert_eq!(listing.error(), Some(MORE_ERROR));
        assert_eq!(ids(&listing), vec![1, 2, 3]);
        assert_eq!(listing.filters().page, Some(1));
        // The sentinel may retry the same page.
        assert_eq!(listing.sentinel_visible().unwrap().page(), 2);
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut listing = ListingController::default();
        let stale = listing.apply_filters(Filters::default().with_name("bulb"));
        let fresh = listing.apply_filters(Filters::default().with_name("sala"));

        let completion = listing.complete(&fresh, Ok(page(4..=6, false)));
        assert!(matches!(completion, Completion::Replaced { count: 3 }));

        let completion = listing.complete(&stale, Ok(page(1..=3, false)));
        assert!(matches!(completion, Completion::Stale));
        assert_eq!(ids(&listing), vec![4, 5, 6]);
    }

    #[test]
    fn filter_change_during_continuation_wins() {
        let mut listing = ListingController::default();
        let first = listing.refresh();
        listing.complete(&first, Ok(page(1..=2, true)));

        let more = listing.sentinel_visible().unwrap();
        let reset = listing.toggle_type(10);
        listing.complete(&reset, Ok(page(7..=8, false)));
        listing.complete(&more, Ok(page(3..=4, true)));

        assert_eq!(ids(&listing), vec![7, 8]);
        assert!(!listing.has_more());
    }

    #[test]
    fn reset_replaces_page_one() {
        let mut listing = ListingController::default();
        let first = listing.refresh();
        listing.complete(&first, Ok(page(1..=3, true)));
        let more = listing.sentinel_visible().unwrap();
        listing.complete(&more, Ok(page(4..=6, true)));

        let reset = listing.set_name("pika");
        assert_eq!(reset.page(), 1);
        assert_eq!(reset.filters.name.as_deref(), Some("pika"));
        listing.complete(&reset, Ok(page(25..=25, false)));

        assert_eq!(ids(&listing), vec![25]);
    }

    #[test]
    fn list_may_start_past_page_one() {
        let mut listing = ListingController::default();
        let first = listing.apply_filters_from(Filters::default(), 3);
        assert_eq!(first.page(), 3);
        assert_eq!(first.kind, RequestKind::Reset);
        listing.complete(&first, Ok(page(101..=150, true)));

        assert_eq!(listing.sentinel_visible().unwrap().page(), 4);
    }

    #[test]
    fn empty_result_reports_empty() {
        let mut listing = ListingController::default();
        let first = listing.refresh();
        assert!(!listing.is_empty());
        listing.complete(&first, Ok(page(1..=0, false)));
        assert!(listing.is_empty());
        assert!(!listing.reached_end());
    }

    // ── Filter editing ──────────────────────────────────────────────

    #[test]
    fn toggle_type_adds_then_removes() {
        let mut listing = ListingController::default();
        let on = listing.toggle_type(3);
        assert_eq!(on.filters.types, vec![3]);
        assert!(listing.is_type_selected(3));

        let off = listing.toggle_type(3);
        assert!(off.filters.types.is_empty());
    }

    #[test]
    fn blank_name_clears_the_query() {
        let mut listing = ListingController::default();
        listing.set_name("bulb");
        let request = listing.set_name("   ");
        assert_eq!(request.filters.name, None);
    }

    #[test]
    fn clear_filters_restores_default_limit() {
        let mut listing = ListingController::default();
        listing.set_limit(10);
        listing.toggle_type(4);
        listing.set_name("sala");
        assert!(listing.has_active_filters());

        let request = listing.clear_filters();

        assert_eq!(request.filters.limit, Some(50));
        assert!(request.filters.types.is_empty());
        assert_eq!(request.filters.name, None);
        assert!(!listing.has_active_filters());
    }

    #[test]
    fn cycle_limit_walks_page_sizes() {
        let mut listing = ListingController::default();
        assert_eq!(listing.cycle_limit().filters.limit, Some(100));
        assert_eq!(listing.cycle_limit().filters.limit, Some(10));
        assert_eq!(listing.cycle_limit().filters.limit, Some(20));
    }

    #[test]
    fn types_failure_surfaces_when_listing_is_fine() {
        let mut listing = ListingController::default();
        listing.types_loaded(Err(CoreError::Timeout));
        assert_eq!(listing.error(), Some(TYPES_ERROR));
    }

    // ── Driver ──────────────────────────────────────────────────────

    /// In-memory catalog of `size` entries that counts list calls.
    struct FakeSource {
        size: u32,
        calls: AtomicUsize,
        seen: Mutex<Vec<Filters>>,
        fail_page: Option<u32>,
    }

    impl FakeSource {
        fn new(size: u32) -> Self {
            Self {
                size,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                fail_page: None,
            }
        }
    }

    impl CatalogSource for FakeSource {
        async fn list_pokemon(&self, filters: &Filters) -> Result<ListResponse, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(filters.clone());

            let page = filters.page_or_default();
            if self.fail_page == Some(page) {
                return Err(CoreError::Api {
                    message: "boom".into(),
                    status: Some(500),
                });
            }
            let limit = filters.limit_or_default();
            let start = (page - 1) * limit + 1;
            let end = (page * limit).min(self.size);
            Ok(self::page(start..=end, page * limit < self.size))
        }

        async fn pokemon_detail(&self, _pokedex_id: u32) -> Result<PokemonDetail, CoreError> {
            Err(CoreError::NotFound {
                resource: "Pokemon detail".into(),
            })
        }

        async fn pokemon_types(&self) -> Result<Vec<PokemonType>, CoreError> {
            Ok(vec![PokemonType {
                id: 1,
                name: "Normal".into(),
                image: None,
            }])
        }
    }

    #[tokio::test]
    async fn driver_merges_pages_until_exhausted() {
        let mut catalog = Catalog::new(FakeSource::new(25), 10);
        catalog.apply_filters(Filters::default().with_limit(10)).await;
        catalog.load_remaining(None).await.unwrap();

        assert_eq!(catalog.listing().entries().len(), 25);
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 3);
        assert!(catalog.listing().reached_end());
        assert!(catalog.load_more().await.is_none());
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn driver_respects_page_cap() {
        let mut catalog = Catalog::new(FakeSource::new(151), 50);
        catalog.apply_filters(Filters::default()).await;
        catalog.load_remaining(Some(2)).await.unwrap();

        assert_eq!(catalog.listing().entries().len(), 100);
        assert!(catalog.listing().has_more());
    }

    #[tokio::test]
    async fn driver_surfaces_continuation_failure() {
        let mut source = FakeSource::new(151);
        source.fail_page = Some(2);
        let mut catalog = Catalog::new(source, 50);
        catalog.apply_filters(Filters::default()).await;

        let err = catalog.load_remaining(None).await.unwrap_err();

        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
        assert_eq!(catalog.listing().entries().len(), 50);
        assert_eq!(catalog.listing().error(), Some(MORE_ERROR));
    }

    #[tokio::test]
    async fn driver_sends_the_criteria_it_was_given() {
        let mut catalog = Catalog::new(FakeSource::new(151), 50);
        catalog
            .apply_filters(Filters::default().with_types([10, 12]).with_limit(20))
            .await;
        catalog.load_more().await;

        let seen = catalog.source().seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].page, Some(2));
        assert_eq!(seen[1].types, vec![10, 12]);
        assert_eq!(seen[1].limit, Some(20));
    }

    #[tokio::test]
    async fn driver_loads_types() {
        let mut catalog = Catalog::new(FakeSource::new(1), 50);
        catalog.load_types().await;
        assert_eq!(catalog.listing().types().len(), 1);
    }
}
