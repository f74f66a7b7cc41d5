//! The browse view's request orchestration.
//!
//! Every filter change is stamped with a sequence number before it is sent.
//! A response is applied only if its number is still the latest issued one,
//! so the visible results always belong to the newest filter the user picked,
//! whatever order the network delivers responses in.

use std::{collections::HashMap, sync::Arc};

use shared::{
    domain::PaginationMeta,
    error::{CatalogError, FailureKind},
    protocol::{CatalogPage, Category, ProductSummary},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::AbortHandle,
};
use tracing::{debug, info, warn};

use crate::{
    filter_state::{FilterCriteria, FilterUpdate},
    history::NavigationHistory,
    pagination::clamp_page,
    query::QueryComposer,
    source::CatalogSource,
    url_codec::{self, NavigationPolicy},
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub navigation_policy: NavigationPolicy,
    /// Abort in-flight requests once a newer one is issued. Only saves work;
    /// stale responses are discarded either way.
    pub cancel_superseded: bool,
    pub page_size: Option<u32>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            navigation_policy: NavigationPolicy::default(),
            cancel_superseded: true,
            page_size: None,
        }
    }
}

/// A dispatched request: its sequence number and the criteria it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub seq: u64,
    pub criteria: Arc<FilterCriteria>,
}

/// One accepted response. Replaced as a whole by the next accepted response.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogResults {
    pub seq: u64,
    pub criteria: Arc<FilterCriteria>,
    pub products: Vec<ProductSummary>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub seq: u64,
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    pub results: Option<Arc<CatalogResults>>,
    /// A request newer than the visible results is still outstanding.
    pub loading: bool,
    /// Failure of the latest request; the previous results stay visible.
    pub error: Option<FetchFailure>,
}

impl CatalogView {
    pub fn products(&self) -> &[ProductSummary] {
        match self.results.as_deref() {
            Some(results) => &results.products,
            None => &[],
        }
    }

    pub fn pagination(&self) -> Option<&PaginationMeta> {
        self.results.as_deref().map(|results| &results.pagination)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Accepted,
    Failed,
    Superseded,
    Detached,
}

#[derive(Debug, Clone)]
pub enum BrowseEvent {
    RequestIssued(RequestEnvelope),
    ResultsAccepted(Arc<CatalogResults>),
    FetchFailed(FetchFailure),
    ResponseDiscarded { seq: u64, outcome: FetchOutcome },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocationWrite {
    Policy,
    Skip,
}

struct BrowseState {
    criteria: Arc<FilterCriteria>,
    next_seq: u64,
    latest_issued: u64,
    latest_accepted: u64,
    results: Option<Arc<CatalogResults>>,
    error: Option<FetchFailure>,
    in_flight: HashMap<u64, AbortHandle>,
    detached: bool,
}

impl BrowseState {
    fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria: Arc::new(criteria),
            next_seq: 0,
            latest_issued: 0,
            latest_accepted: 0,
            results: None,
            error: None,
            in_flight: HashMap::new(),
            detached: false,
        }
    }

    fn view(&self) -> CatalogView {
        let settled = self.latest_accepted == self.latest_issued
            || self
                .error
                .as_ref()
                .is_some_and(|failure| failure.seq == self.latest_issued);
        CatalogView {
            results: self.results.clone(),
            loading: !self.detached && !settled,
            error: self.error.clone(),
        }
    }
}

pub struct CatalogBrowser {
    source: Arc<dyn CatalogSource>,
    history: Arc<dyn NavigationHistory>,
    composer: QueryComposer,
    options: BrowserOptions,
    inner: Mutex<BrowseState>,
    events: broadcast::Sender<BrowseEvent>,
}

impl CatalogBrowser {
    /// Seeds the filters from the history's current location, rewrites that
    /// location to its canonical form and issues the first fetch.
    pub async fn mount(
        source: Arc<dyn CatalogSource>,
        history: Arc<dyn NavigationHistory>,
        options: BrowserOptions,
    ) -> Arc<Self> {
        let location = history.current();
        let criteria = url_codec::decode(&location);
        let canonical = url_codec::encode_preserving(&criteria, &location);
        if canonical != url_codec::strip_question_mark(&location) {
            debug!(from = %location, to = %canonical, "browse: canonicalizing initial location");
            history.replace(&canonical);
        }

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let browser = Arc::new(Self {
            source,
            history,
            composer: QueryComposer::new(options.page_size),
            options,
            inner: Mutex::new(BrowseState::new(criteria)),
            events,
        });
        {
            let mut state = browser.inner.lock().await;
            let envelope = browser.issue(&mut state);
            info!(seq = envelope.seq, query = %canonical, "browse: mounted");
        }
        browser
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BrowseEvent> {
        self.events.subscribe()
    }

    pub async fn criteria(&self) -> Arc<FilterCriteria> {
        Arc::clone(&self.inner.lock().await.criteria)
    }

    pub async fn view(&self) -> CatalogView {
        self.inner.lock().await.view()
    }

    pub async fn latest_accepted(&self) -> u64 {
        self.inner.lock().await.latest_accepted
    }

    pub async fn is_mounted(&self) -> bool {
        !self.inner.lock().await.detached
    }

    /// Applies one filter change. Returns `None` when nothing was issued:
    /// the change left the criteria as they were, or the view is unmounted.
    pub async fn set_filter(self: &Arc<Self>, update: FilterUpdate) -> Option<RequestEnvelope> {
        self.transition(|state| state.criteria.set(update), LocationWrite::Policy)
            .await
    }

    pub async fn set_field(self: &Arc<Self>, field: &str, value: &str) -> Option<RequestEnvelope> {
        self.transition(
            |state| state.criteria.set_field(field, value),
            LocationWrite::Policy,
        )
        .await
    }

    pub async fn clear_filters(self: &Arc<Self>) -> Option<RequestEnvelope> {
        self.transition(|state| state.criteria.clear(), LocationWrite::Policy)
            .await
    }

    /// Page change clamped against the pagination of the visible results.
    pub async fn go_to_page(self: &Arc<Self>, page: i64) -> Option<RequestEnvelope> {
        self.transition(
            |state| {
                let meta = state.results.as_ref().map(|results| results.pagination);
                let target = clamp_page(page, meta.as_ref());
                state.criteria.set(FilterUpdate::Page(i64::from(target)))
            },
            LocationWrite::Policy,
        )
        .await
    }

    pub async fn next_page(self: &Arc<Self>) -> Option<RequestEnvelope> {
        self.transition(
            |state| match state.results.as_ref().map(|results| results.pagination) {
                Some(meta) if meta.has_next() => state
                    .criteria
                    .set(FilterUpdate::Page(i64::from(meta.page()) + 1)),
                _ => FilterCriteria::clone(&state.criteria),
            },
            LocationWrite::Policy,
        )
        .await
    }

    pub async fn prev_page(self: &Arc<Self>) -> Option<RequestEnvelope> {
        self.transition(
            |state| match state.results.as_ref().map(|results| results.pagination) {
                Some(meta) if meta.has_prev() => state
                    .criteria
                    .set(FilterUpdate::Page(i64::from(meta.page()) - 1)),
                _ => FilterCriteria::clone(&state.criteria),
            },
            LocationWrite::Policy,
        )
        .await
    }

    /// Re-reads the history's current location (after back/forward) and
    /// fetches for it without writing history again.
    pub async fn sync_from_location(self: &Arc<Self>) -> Option<RequestEnvelope> {
        let criteria = url_codec::decode(&self.history.current());
        self.transition(|_| criteria, LocationWrite::Skip).await
    }

    /// Re-issues the current criteria under a new sequence number.
    pub async fn retry(self: &Arc<Self>) -> Option<RequestEnvelope> {
        let mut state = self.inner.lock().await;
        if state.detached {
            return None;
        }
        info!(
            failed_seq = ?state.error.as_ref().map(|failure| failure.seq),
            "browse: retrying current filters"
        );
        Some(self.issue(&mut state))
    }

    /// Category list for populating filter inputs. Not used to validate filters.
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.source.list_categories().await
    }

    /// Stops applying responses and aborts everything in flight.
    pub async fn unmount(&self) {
        let mut state = self.inner.lock().await;
        if state.detached {
            return;
        }
        state.detached = true;
        let aborted = state.in_flight.len();
        for (_, handle) in state.in_flight.drain() {
            handle.abort();
        }
        info!(aborted, latest_issued = state.latest_issued, "browse: unmounted");
    }

    async fn transition<F>(self: &Arc<Self>, next: F, write: LocationWrite) -> Option<RequestEnvelope>
    where
        F: FnOnce(&BrowseState) -> FilterCriteria,
    {
        let mut state = self.inner.lock().await;
        if state.detached {
            debug!("browse: ignoring filter change after unmount");
            return None;
        }
        let criteria = next(&*state);
        if criteria == *state.criteria {
            return None;
        }
        state.criteria = Arc::new(criteria);
        if write == LocationWrite::Policy {
            self.write_location(&state.criteria);
        }
        Some(self.issue(&mut state))
    }

    fn write_location(&self, criteria: &FilterCriteria) {
        let current = self.history.current();
        let next = url_codec::encode_preserving(criteria, &current);
        if next == url_codec::strip_question_mark(&current) {
            return;
        }
        self.options
            .navigation_policy
            .apply(self.history.as_ref(), &next);
    }

    /// Stamps the current criteria with the next sequence number and spawns
    /// the fetch. Runs under the state lock; the fetch itself does not.
    fn issue(self: &Arc<Self>, state: &mut BrowseState) -> RequestEnvelope {
        state.next_seq += 1;
        let envelope = RequestEnvelope {
            seq: state.next_seq,
            criteria: Arc::clone(&state.criteria),
        };
        state.latest_issued = envelope.seq;

        if self.options.cancel_superseded {
            for (seq, handle) in state.in_flight.drain() {
                handle.abort();
                debug!(seq, superseded_by = envelope.seq, "browse: cancelled superseded request");
            }
        }

        let query = self.composer.compose(&envelope.criteria);
        let browser = Arc::clone(self);
        let task_envelope = envelope.clone();
        let task = tokio::spawn(async move {
            let result = browser.source.fetch_products(&query).await;
            browser.resolve(&task_envelope, result).await
        });
        state.in_flight.insert(envelope.seq, task.abort_handle());

        debug!(seq = envelope.seq, "browse: request issued");
        let _ = self.events.send(BrowseEvent::RequestIssued(envelope.clone()));
        envelope
    }

    async fn resolve(
        &self,
        envelope: &RequestEnvelope,
        result: Result<CatalogPage, CatalogError>,
    ) -> FetchOutcome {
        let mut state = self.inner.lock().await;
        state.in_flight.remove(&envelope.seq);

        if state.detached {
            debug!(seq = envelope.seq, "browse: dropping response after unmount");
            return self.discard(envelope.seq, FetchOutcome::Detached);
        }
        if envelope.seq != state.latest_issued {
            debug!(
                seq = envelope.seq,
                latest_issued = state.latest_issued,
                "browse: dropping superseded response"
            );
            return self.discard(envelope.seq, FetchOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                let results = Arc::new(CatalogResults {
                    seq: envelope.seq,
                    criteria: Arc::clone(&envelope.criteria),
                    pagination: page.pagination.into(),
                    products: page.data,
                });
                state.latest_accepted = envelope.seq;
                state.results = Some(Arc::clone(&results));
                state.error = None;
                info!(
                    seq = envelope.seq,
                    products = results.products.len(),
                    page = results.pagination.page(),
                    total_pages = results.pagination.total_pages(),
                    "browse: results accepted"
                );
                let _ = self.events.send(BrowseEvent::ResultsAccepted(results));
                FetchOutcome::Accepted
            }
            Err(err) => {
                warn!(
                    seq = envelope.seq,
                    error = %err,
                    "browse: catalog fetch failed; keeping last accepted results"
                );
                let failure = FetchFailure {
                    seq: envelope.seq,
                    kind: err.kind(),
                    message: err.to_string(),
                };
                state.error = Some(failure.clone());
                let _ = self.events.send(BrowseEvent::FetchFailed(failure));
                FetchOutcome::Failed
            }
        }
    }

    fn discard(&self, seq: u64, outcome: FetchOutcome) -> FetchOutcome {
        let _ = self
            .events
            .send(BrowseEvent::ResponseDiscarded { seq, outcome });
        outcome
    }
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
