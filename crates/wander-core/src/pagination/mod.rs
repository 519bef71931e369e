//! Paginated list synchronization.
//!
//! [`ListSynchronizer`] owns the loaded items, the query they were built
//! against and the page cursor for one listing screen. It does no I/O: every
//! operation that needs data hands back a [`PageRequest`] and the caller
//! reports the result through [`ListSynchronizer::complete`]. The async
//! [`ListingFeed`] wires the two halves to a [`crate::api::ListingTransport`].
//!
//! Invariants:
//! - at most one page request is pending per list; `load_more` while one is
//!   pending, or after the last page, issues nothing.
//! - every request carries a ticket tagged with the query epoch; a completion
//!   whose ticket is not the pending one is discarded, never merged.
//! - `has_more` is `len(response) == page_size`. An exact-multiple final page
//!   therefore costs one extra empty fetch before `has_more` turns false.

mod feed;

pub use feed::ListingFeed;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{Error, Result};
use crate::models::{Catalog, ListingId, ListingItem, ListingQuery, SessionContext};
use crate::payload::{build_payload, ListingPayload};
use crate::state::ListPhase;

/// How appended pages treat ids that are already loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep every occurrence, in server order
    #[default]
    KeepAll,
    /// Drop appended items whose id is already loaded
    KeepFirst,
}

/// Per-list tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub page_size: usize,
    pub duplicates: DuplicatePolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            duplicates: DuplicatePolicy::KeepAll,
        }
    }
}

/// Page bookkeeping for one list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page_number: u32,
    pub page_size: usize,
    pub has_more: bool,
    pub in_flight: bool,
}

impl PageCursor {
    const fn first(page_size: usize) -> Self {
        Self {
            page_number: 1,
            page_size,
            has_more: true,
            in_flight: false,
        }
    }
}

/// Why a request was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    FirstPage,
    NextPage,
    Refresh,
}

/// Identity of one issued page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    epoch: u64,
    page: u32,
    kind: FetchKind,
}

impl PageTicket {
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn kind(&self) -> FetchKind {
        self.kind
    }
}

/// A page request the caller must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub ticket: PageTicket,
    pub payload: ListingPayload,
}

/// Result of applying a completion (or of a guarded no-op)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The guard rejected the call; nothing was requested
    Skipped,
    /// The response was merged; `received` is the raw response length
    Applied { received: usize },
    /// The response belonged to a superseded request and was dropped
    Discarded,
}

/// State machine behind one paginated listing.
#[derive(Debug, Clone)]
pub struct ListSynchronizer {
    catalog: Catalog,
    query: ListingQuery,
    items: Vec<ListingItem>,
    cursor: PageCursor,
    phase: ListPhase,
    epoch: u64,
    pending: Option<PageTicket>,
    last_error: Option<Error>,
    duplicates: DuplicatePolicy,
}

impl ListSynchronizer {
    pub fn new(catalog: Catalog, query: ListingQuery, options: SyncOptions) -> Result<Self> {
        if options.page_size == 0 {
            return Err(Error::validation("page size must be at least 1"));
        }
        query.validate_for(catalog)?;
        Ok(Self {
            catalog,
            query,
            items: Vec::new(),
            cursor: PageCursor::first(options.page_size),
            phase: ListPhase::Idle,
            epoch: 0,
            pending: None,
            last_error: None,
            duplicates: options.duplicates,
        })
    }

    /// Synchronizer mounted with the catalog's default filters for `context`.
    pub fn for_context(
        catalog: Catalog,
        context: &SessionContext,
        options: SyncOptions,
    ) -> Result<Self> {
        Self::new(catalog, ListingQuery::defaults_for(catalog, context), options)
    }

    /// Start the first load. Only valid from `Idle`.
    pub fn mount(&mut self) -> Option<PageRequest> {
        if self.phase != ListPhase::Idle {
            return None;
        }
        Some(self.reset_and_request())
    }

    /// Switch to a new query, resetting the list unless it equals the current one.
    ///
    /// An invalid query is rejected and leaves the list untouched.
    pub fn set_query(&mut self, query: ListingQuery) -> Result<Option<PageRequest>> {
        query.validate_for(self.catalog)?;
        let unchanged = query == self.query;
        if unchanged && !matches!(self.phase, ListPhase::Idle | ListPhase::Error) {
            return Ok(None);
        }
        self.query = query;
        Ok(Some(self.reset_and_request()))
    }

    /// Request the next page, if there is one and nothing is pending.
    ///
    /// After a failed first page this retries page 1.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        match self.phase {
            ListPhase::Error => Some(self.reset_and_request()),
            ListPhase::Ready if self.cursor.has_more && !self.cursor.in_flight => {
                self.cursor.page_number += 1;
                self.phase = ListPhase::LoadingNextPage;
                Some(self.issue(FetchKind::NextPage))
            }
            _ => None,
        }
    }

    /// Re-fetch page 1 with the current query, replacing items on success.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        match self.phase {
            ListPhase::Idle | ListPhase::Error => Some(self.reset_and_request()),
            ListPhase::Ready if !self.cursor.in_flight => {
                self.phase = ListPhase::Refreshing;
                Some(self.issue(FetchKind::Refresh))
            }
            _ => None,
        }
    }

    /// Apply the result of a request issued by this synchronizer.
    ///
    /// Failures of the pending request are recorded, then returned so the
    /// caller can notify the user. Results for any other ticket are dropped.
    pub fn complete(
        &mut self,
        ticket: &PageTicket,
        result: Result<Vec<ListingItem>>,
    ) -> Result<PageOutcome> {
        if self.pending.as_ref() != Some(ticket) {
            tracing::debug!(
                catalog = %self.catalog,
                epoch = ticket.epoch,
                current_epoch = self.epoch,
                page = ticket.page,
                "Discarding stale page response"
            );
            return Ok(PageOutcome::Discarded);
        }
        self.pending = None;
        self.cursor.in_flight = false;

        match result {
            Ok(page) => {
                let received = page.len();
                self.cursor.has_more = received == self.cursor.page_size;
                match ticket.kind {
                    FetchKind::FirstPage | FetchKind::Refresh => {
                        self.items = page;
                        self.cursor.page_number = 1;
                    }
                    FetchKind::NextPage => self.append(page),
                }
                self.phase = ListPhase::Ready;
                self.last_error = None;
                Ok(PageOutcome::Applied { received })
            }
            Err(error) => {
                tracing::warn!(
                    catalog = %self.catalog,
                    page = ticket.page,
                    "Page request failed: {}",
                    error
                );
                self.roll_back(ticket.kind);
                self.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Forget the pending request without a result, e.g. when the caller
    /// stopped waiting for it.
    ///
    /// The list rolls back as it would on failure, so `load_more` and
    /// `refresh` work again. Returns `false` if `ticket` was not pending.
    pub fn abandon(&mut self, ticket: &PageTicket) -> bool {
        if self.pending.as_ref() != Some(ticket) {
            return false;
        }
        tracing::debug!(
            catalog = %self.catalog,
            epoch = ticket.epoch,
            page = ticket.page,
            "Abandoning page request"
        );
        self.pending = None;
        self.cursor.in_flight = false;
        self.roll_back(ticket.kind);
        true
    }

    #[must_use]
    pub const fn catalog(&self) -> Catalog {
        self.catalog
    }

    #[must_use]
    pub const fn query(&self) -> &ListingQuery {
        &self.query
    }

    #[must_use]
    pub fn items(&self) -> &[ListingItem] {
        &self.items
    }

    #[must_use]
    pub const fn cursor(&self) -> PageCursor {
        self.cursor
    }

    #[must_use]
    pub const fn phase(&self) -> ListPhase {
        self.phase
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    fn reset_and_request(&mut self) -> PageRequest {
        self.epoch += 1;
        self.items.clear();
        self.cursor = PageCursor::first(self.cursor.page_size);
        self.phase = ListPhase::LoadingFirstPage;
        self.last_error = None;
        self.issue(FetchKind::FirstPage)
    }

    fn issue(&mut self, kind: FetchKind) -> PageRequest {
        let page = match kind {
            FetchKind::FirstPage | FetchKind::Refresh => 1,
            FetchKind::NextPage => self.cursor.page_number,
        };
        let ticket = PageTicket {
            epoch: self.epoch,
            page,
            kind,
        };
        self.pending = Some(ticket);
        self.cursor.in_flight = true;
        tracing::debug!(
            catalog = %self.catalog,
            epoch = self.epoch,
            page,
            ?kind,
            "Issuing page request"
        );
        PageRequest {
            ticket,
            payload: build_payload(&self.query, page, self.cursor.page_size),
        }
    }

    fn roll_back(&mut self, kind: FetchKind) {
        self.phase = match kind {
            FetchKind::FirstPage => ListPhase::Error,
            FetchKind::NextPage => {
                self.cursor.page_number = self.cursor.page_number.saturating_sub(1).max(1);
                ListPhase::Ready
            }
            FetchKind::Refresh => ListPhase::Ready,
        };
    }

    fn append(&mut self, page: Vec<ListingItem>) {
        match self.duplicates {
            DuplicatePolicy::KeepAll => self.items.extend(page),
            DuplicatePolicy::KeepFirst => {
                let mut seen = self
                    .items
                    .iter()
                    .map(|item| item.id.clone())
                    .collect::<std::collections::HashSet<ListingId>>();
                self.items
                    .extend(page.into_iter().filter(|item| seen.insert(item.id.clone())));
            }
        }
    }
}
