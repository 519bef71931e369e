//! Async driver binding a [`ListSynchronizer`] to a [`ListingTransport`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ListSynchronizer, PageCursor, PageOutcome, PageRequest, PageTicket, SyncOptions};
use crate::api::ListingTransport;
use crate::error::{Error, Result};
use crate::models::{Catalog, ListingItem, ListingQuery, SessionContext};
use crate::search::FilterOverlay;
use crate::state::ListPhase;

/// One listing screen's data source.
///
/// Clones share the same list state. The state lock is only taken between
/// awaits, so a concurrent `load_more` sees the in-flight guard and returns
/// [`PageOutcome::Skipped`] instead of issuing a duplicate. Dropping an
/// operation's future mid-fetch abandons that request and rolls the list
/// back, as a failure would.
pub struct ListingFeed<T> {
    transport: Arc<T>,
    state: Arc<Mutex<ListSynchronizer>>,
    overlay: FilterOverlay,
}

impl<T> Clone for ListingFeed<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            state: Arc::clone(&self.state),
            overlay: self.overlay.clone(),
        }
    }
}

impl<T: ListingTransport> ListingFeed<T> {
    pub fn new(
        transport: Arc<T>,
        catalog: Catalog,
        query: ListingQuery,
        options: SyncOptions,
    ) -> Result<Self> {
        let sync = ListSynchronizer::new(catalog, query, options)?;
        Ok(Self {
            transport,
            state: Arc::new(Mutex::new(sync)),
            overlay: FilterOverlay::for_catalog(catalog),
        })
    }

    /// Feed mounted with the catalog's default filters for `context`.
    pub fn for_context(
        transport: Arc<T>,
        catalog: Catalog,
        context: &SessionContext,
        options: SyncOptions,
    ) -> Result<Self> {
        Self::new(
            transport,
            catalog,
            ListingQuery::defaults_for(catalog, context),
            options,
        )
    }

    pub async fn mount(&self) -> Result<PageOutcome> {
        let request = self.lock().mount();
        self.run(request).await
    }

    pub async fn load_more(&self) -> Result<PageOutcome> {
        let request = self.lock().load_more();
        self.run(request).await
    }

    pub async fn refresh(&self) -> Result<PageOutcome> {
        let request = self.lock().refresh();
        self.run(request).await
    }

    pub async fn set_query(&self, query: ListingQuery) -> Result<PageOutcome> {
        let request = self.lock().set_query(query)?;
        self.run(request).await
    }

    /// Loaded items, unfiltered.
    pub fn items(&self) -> Vec<ListingItem> {
        self.lock().items().to_vec()
    }

    /// Loaded items passed through the catalog's local filter overlay.
    pub fn visible_items(&self, search_text: &str) -> Vec<ListingItem> {
        let state = self.lock();
        self.overlay
            .apply(state.items(), search_text)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn phase(&self) -> ListPhase {
        self.lock().phase()
    }

    pub fn cursor(&self) -> PageCursor {
        self.lock().cursor()
    }

    pub fn query(&self) -> ListingQuery {
        self.lock().query().clone()
    }

    pub fn last_error(&self) -> Option<Error> {
        self.lock().last_error().cloned()
    }

    async fn run(&self, request: Option<PageRequest>) -> Result<PageOutcome> {
        let Some(PageRequest { ticket, payload }) = request else {
            return Ok(PageOutcome::Skipped);
        };
        let guard = PendingFetch {
            state: &self.state,
            ticket: Some(ticket),
        };
        let catalog = self.lock().catalog();

        let result = self.transport.fetch_page(catalog.path(), &payload).await;

        guard.complete(result)
    }

    fn lock(&self) -> MutexGuard<'_, ListSynchronizer> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<ListSynchronizer>) -> MutexGuard<'_, ListSynchronizer> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Abandons its ticket on drop unless the fetch result was handed over.
struct PendingFetch<'a> {
    state: &'a Mutex<ListSynchronizer>,
    ticket: Option<PageTicket>,
}

impl PendingFetch<'_> {
    fn complete(mut self, result: Result<Vec<ListingItem>>) -> Result<PageOutcome> {
        match self.ticket.take() {
            Some(ticket) => lock_state(self.state).complete(&ticket, result),
            None => Ok(PageOutcome::Discarded),
        }
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            lock_state(self.state).abandon(&ticket);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::SortKey;
    use crate::payload::ListingPayload;

    type Scripted = (Duration, Result<Vec<ListingItem>>);

    /// Transport that replays scripted responses after a delay and records
    /// what was asked of it.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: std::sync::Mutex<VecDeque<Scripted>>,
        requests: std::sync::Mutex<Vec<(String, ListingPayload)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedTransport {
        fn with(responses: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                responses: std::sync::Mutex::new(responses.into()),
                ..Self::default()
            })
        }

        fn requests(&self) -> Vec<(String, ListingPayload)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ListingTransport for ScriptedTransport {
        async fn fetch_page(
            &self,
            path: &str,
            payload: &ListingPayload,
        ) -> Result<Vec<ListingItem>> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), payload.clone()));
            let (delay, response) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra request");

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            response
        }
    }

    fn page(prefix: &str, count: usize) -> Vec<ListingItem> {
        (0..count)
            .map(|index| {
                ListingItem::new(format!("{prefix}-{index}").as_str())
                    .with_field("name", format!("{prefix} listing {index}"))
            })
            .collect()
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn feed(transport: &Arc<ScriptedTransport>) -> ListingFeed<ScriptedTransport> {
        ListingFeed::new(
            Arc::clone(transport),
            Catalog::Places,
            ListingQuery::new(SortKey::Rating),
            SyncOptions::default(),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_load_more_issues_a_single_request() {
        let transport = ScriptedTransport::with(vec![
            (ms(1), Ok(page("p1", 10))),
            (ms(50), Ok(page("p2", 10))),
        ]);
        let feed = feed(&transport);
        feed.mount().await.unwrap();

        let (a, b, c) = tokio::join!(feed.load_more(), feed.load_more(), feed.load_more());
        let outcomes = [a.unwrap(), b.unwrap(), c.unwrap()];

        assert_eq!(
            outcomes
                .iter()
                .filter(|outcome| matches!(outcome, PageOutcome::Applied { .. }))
                .count(),
            1
        );
        assert_eq!(
            outcomes
                .iter()
                .filter(|outcome| **outcome == PageOutcome::Skipped)
                .count(),
            2
        );
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(feed.items().len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn second_short_page_ends_pagination() {
        let transport = ScriptedTransport::with(vec![
            (ms(1), Ok(page("p1", 10))),
            (ms(1), Ok(page("p2", 4))),
        ]);
        let feed = feed(&transport);

        feed.mount().await.unwrap();
        assert!(feed.cursor().has_more);

        assert_eq!(
            feed.load_more().await.unwrap(),
            PageOutcome::Applied { received: 4 }
        );
        assert_eq!(feed.items().len(), 14);
        assert!(!feed.cursor().has_more);

        assert_eq!(feed.load_more().await.unwrap(), PageOutcome::Skipped);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.requests()[1].0, "/places/get");
        assert_eq!(transport.requests()[1].1.page(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_old_query_is_discarded() {
        let transport = ScriptedTransport::with(vec![
            (ms(1), Ok(page("old", 10))),
            (ms(100), Ok(page("old-p2", 10))),
            (ms(10), Ok(page("rated", 6))),
        ]);
        let feed = feed(&transport);
        feed.mount().await.unwrap();

        let rated = ListingQuery::new(SortKey::Rating)
            .with_min_rating(Some(4.0))
            .unwrap();
        let change_filter = {
            let feed = feed.clone();
            async move {
                tokio::time::sleep(ms(5)).await;
                feed.set_query(rated).await
            }
        };
        let (stale, fresh) = tokio::join!(feed.load_more(), change_filter);

        assert_eq!(fresh.unwrap(), PageOutcome::Applied { received: 6 });
        assert_eq!(stale.unwrap(), PageOutcome::Discarded);

        let ids = feed
            .items()
            .iter()
            .map(|item| item.id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids.len(), 6);
        assert!(ids.iter().all(|id| id.starts_with("rated-")));
        assert_eq!(
            transport.requests()[2].1.get("minRating"),
            Some(&serde_json::json!(4.0))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_next_page_surfaces_error_and_allows_retry() {
        let transport = ScriptedTransport::with(vec![
            (ms(1), Ok(page("p1", 10))),
            (ms(1), Err(Error::Timeout(Duration::from_secs(10)))),
            (ms(1), Ok(page("p2", 3))),
        ]);
        let feed = feed(&transport);
        feed.mount().await.unwrap();

        let err = feed.load_more().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(feed.cursor().page_number, 1);
        assert_eq!(feed.items().len(), 10);
        assert_eq!(feed.last_error(), Some(err));

        feed.load_more().await.unwrap();
        assert_eq!(transport.requests()[2].1.page(), Some(2));
        assert_eq!(feed.items().len(), 13);
        assert_eq!(feed.last_error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn first_page_failure_then_refresh_recovers() {
        let transport = ScriptedTransport::with(vec![
            (ms(1), Err(Error::server("status false"))),
            (ms(1), Ok(page("p1", 2))),
        ]);
        let feed = feed(&transport);

        assert!(feed.mount().await.is_err());
        assert_eq!(feed.phase(), ListPhase::Error);
        assert!(feed.items().is_empty());

        feed.refresh().await.unwrap();
        assert_eq!(feed.phase(), ListPhase::Ready);
        assert_eq!(feed.items().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn overlay_filters_without_fetching() {
        let transport = ScriptedTransport::with(vec![(ms(1), Ok(page("p1", 10)))]);
        let feed = feed(&transport);
        feed.mount().await.unwrap();

        let visible = feed.visible_items("listing 3");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.to_string(), "p1-3");
        assert_eq!(feed.visible_items("").len(), 10);
        assert_eq!(feed.items().len(), 10);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_query_is_rejected_without_request() {
        let transport = ScriptedTransport::with(vec![(ms(1), Ok(page("p1", 10)))]);
        let feed = feed(&transport);
        feed.mount().await.unwrap();

        let err = feed
            .set_query(ListingQuery::new(SortKey::PriceAsc))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(feed.query().sort_key(), SortKey::Rating);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_load_more_releases_the_list() {
        let transport = ScriptedTransport::with(vec![
            (ms(1), Ok(page("p1", 10))),
            (Duration::from_secs(60), Ok(page("slow", 10))),
            (ms(1), Ok(page("p2", 10))),
        ]);
        let feed = feed(&transport);
        feed.mount().await.unwrap();

        let cancelled = tokio::time::timeout(Duration::from_secs(1), feed.load_more()).await;
        assert!(cancelled.is_err());
        assert_eq!(feed.phase(), ListPhase::Ready);
        assert_eq!(feed.cursor().page_number, 1);
        assert!(!feed.cursor().in_flight);

        assert_eq!(
            feed.load_more().await.unwrap(),
            PageOutcome::Applied { received: 10 }
        );
        assert_eq!(transport.requests()[2].1.page(), Some(2));
        let items = feed.items();
        assert_eq!(items.len(), 20);
        assert!(items[10].id.to_string().starts_with("p2-"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_mount_can_be_refreshed() {
        let transport = ScriptedTransport::with(vec![
            (Duration::from_secs(60), Ok(page("slow", 10))),
            (ms(1), Ok(page("p1", 4))),
        ]);
        let feed = feed(&transport);

        assert!(tokio::time::timeout(ms(100), feed.mount()).await.is_err());
        assert_eq!(feed.phase(), ListPhase::Error);

        assert_eq!(
            feed.refresh().await.unwrap(),
            PageOutcome::Applied { received: 4 }
        );
        assert_eq!(feed.phase(), ListPhase::Ready);
    }
}
