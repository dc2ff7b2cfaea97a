//! Report feed: fetch, refresh, search, and likes.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use pothole_core::feed::project;
use pothole_core::{FeedFilter, PotholeReport, ReportId, ReportService, ServiceError};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::context::ClientContext;
use crate::likes::{LikeLedger, LikeOutcome, apply_confirmed_like};

/// What caused a fetch. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    Mount,
    Focus,
    Refresh,
    Manual,
}

impl fmt::Display for FetchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mount => "mount",
            Self::Focus => "focus",
            Self::Refresh => "refresh",
            Self::Manual => "manual",
        })
    }
}

#[derive(Debug)]
struct FeedState {
    reports: Vec<PotholeReport>,
    search_query: String,
    filter: FeedFilter,
    /// True until the first fetch settles.
    loading: bool,
    /// Pull-to-refresh calls still in flight.
    refreshing: usize,
    /// Bumped each time the collection is replaced.
    generation: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            reports: Vec::new(),
            search_query: String::new(),
            filter: FeedFilter::default(),
            loading: true,
            refreshing: 0,
            generation: 0,
        }
    }
}

/// Render-ready snapshot of the feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedView {
    pub reports: Vec<PotholeReport>,
    pub search_query: String,
    pub filter: FeedFilter,
    pub loading: bool,
    pub refreshing: bool,
    /// Ids of cards liked since the last load.
    pub liked: Vec<ReportId>,
}

impl FeedView {
    /// Nothing to show and nothing pending.
    pub fn is_empty_state(&self) -> bool {
        self.reports.is_empty() && !self.loading && !self.refreshing
    }
}

/// Owns the fetched collection. Overlapping fetches are not sequenced: the
/// last to resolve replaces the collection.
pub struct FeedController {
    service: Arc<dyn ReportService>,
    state: Mutex<FeedState>,
    likes: LikeLedger,
}

impl FeedController {
    pub fn new(ctx: &ClientContext) -> Self {
        Self {
            service: Arc::clone(&ctx.service),
            state: Mutex::new(FeedState::default()),
            likes: LikeLedger::default(),
        }
    }

    /// First fetch when the screen mounts.
    pub async fn mount(&self) -> Result<usize, ServiceError> {
        self.fetch(FetchTrigger::Mount).await
    }

    /// Re-fetch whenever the screen regains focus.
    pub async fn focus(&self) -> Result<usize, ServiceError> {
        self.fetch(FetchTrigger::Focus).await
    }

    /// Pull-to-refresh.
    pub async fn refresh(&self) -> Result<usize, ServiceError> {
        self.state.lock().refreshing += 1;
        let result = self.fetch(FetchTrigger::Refresh).await;
        let mut state = self.state.lock();
        state.refreshing = state.refreshing.saturating_sub(1);
        result
    }

    /// Load the full collection and replace the held one.
    ///
    /// On error the previous collection stays in place.
    pub async fn fetch_all(&self) -> Result<usize, ServiceError> {
        self.fetch(FetchTrigger::Manual).await
    }

    async fn fetch(&self, trigger: FetchTrigger) -> Result<usize, ServiceError> {
        info!(%trigger, "fetching reports");
        let result = self.service.get_all_reports().await;

        let mut state = self.state.lock();
        state.loading = false;
        match result {
            Ok(reports) => {
                let count = reports.len();
                state.reports = reports;
                state.generation += 1;
                self.likes.reset();
                info!(%trigger, count, generation = state.generation, "feed replaced");
                Ok(count)
            }
            Err(e) => {
                error!(%trigger, error = %e, kept = state.reports.len(), "fetch failed");
                Err(e)
            }
        }
    }

    /// Like a card once. The mark is set before the service is called.
    ///
    /// A confirmation that lands after the collection was reloaded leaves
    /// the reloaded count alone.
    pub async fn like(&self, id: &ReportId) -> LikeOutcome {
        let sent_against = {
            let state = self.state.lock();
            if !self.likes.try_mark(id) {
                return LikeOutcome::AlreadyLiked;
            }
            state.generation
        };
        let confirmed = self.service.like_report(id).await;

        let mut state = self.state.lock();
        self.likes.settle(id);
        if !confirmed {
            warn!(report_id = %id, "like not confirmed");
            return LikeOutcome::Unconfirmed;
        }
        if state.generation != sent_against {
            info!(report_id = %id, "like confirmed after reload; count left as loaded");
            return LikeOutcome::Confirmed(None);
        }
        let likes = apply_confirmed_like(&mut state.reports, id);
        info!(report_id = %id, ?likes, "like confirmed");
        LikeOutcome::Confirmed(likes)
    }

    pub fn is_liked(&self, id: &ReportId) -> bool {
        self.likes.is_liked(id)
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.state.lock().search_query = query.into();
    }

    pub fn search_query(&self) -> String {
        self.state.lock().search_query.clone()
    }

    pub fn set_filter(&self, filter: FeedFilter) {
        self.state.lock().filter = filter;
    }

    pub fn filter(&self) -> FeedFilter {
        self.state.lock().filter
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing > 0
    }

    /// The held collection in server order.
    pub fn reports(&self) -> Vec<PotholeReport> {
        self.state.lock().reports.clone()
    }

    /// Search-filtered view, derived from the held collection on each call.
    pub fn filtered_reports(&self) -> Vec<PotholeReport> {
        let state = self.state.lock();
        project(&state.reports, state.filter, &state.search_query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn view(&self) -> FeedView {
        let reports = self.filtered_reports();
        let state = self.state.lock();
        let liked = state
            .reports
            .iter()
            .filter(|r| self.likes.is_liked(&r.id))
            .map(|r| r.id.clone())
            .collect();
        FeedView {
            reports,
            search_query: state.search_query.clone(),
            filter: state.filter,
            loading: state.loading,
            refreshing: state.refreshing > 0,
            liked,
        }
    }
}
