// SPDX-License-Identifier: MPL-2.0

//! The comment feed: pagination, sort and filter state, and the merge of
//! server pages with this installation's liked/reported ids.
//!
//! State transitions are synchronous and hand back a [`PageRequest`] when the
//! feed needs data. The caller sends it (possibly while other requests are in
//! flight) and passes the [`PageResponse`] to [`CommentFeedController::apply`].
//! Every request carries a sequence number; a response is dropped if a newer
//! request has been issued since. Any query change that alters what the
//! server is asked for issues a new request, so the newest sequence number
//! always answers the current query.

use crate::api::{ApiError, Comment, CommentsApi, SortType, TimeFilter};
use crate::config::PAGE_SIZE;
use crate::error::AppError;
use crate::feed::query::FeedQuery;
use crate::feed::view::CommentViewModel;
use crate::state::LocalState;
use crate::validate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Render state of the feed
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    /// Server order, concatenated across pages since the last reset
    pub items: Vec<CommentViewModel>,
    pub has_reached_end: bool,
    pub query: FeedQuery,
}

/// A page fetch the feed wants performed
#[derive(Debug, Clone)]
pub struct PageRequest {
    seq: u64,
    query: FeedQuery,
    /// End-of-feed flag to restore if the fetch fails
    prior_end: bool,
}

impl PageRequest {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub async fn send(self, api: &dyn CommentsApi) -> PageResponse {
        let result = api.comments_page(&self.query).await;
        PageResponse::new(self, result)
    }
}

/// Outcome of a [`PageRequest`], ready to be applied
#[derive(Debug)]
pub struct PageResponse {
    request: PageRequest,
    result: Result<Vec<Comment>, ApiError>,
}

impl PageResponse {
    pub fn new(request: PageRequest, result: Result<Vec<Comment>, ApiError>) -> Self {
        Self { request, result }
    }
}

/// What applying a response did to the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedUpdate {
    /// Nothing was requested
    Unchanged,
    /// Superseded by a newer request, ignored
    Stale,
    /// Page 1 replaced the feed
    Replaced,
    Appended { added: usize },
    /// The server has no such page
    Exhausted,
}

impl FeedUpdate {
    /// Page-1 loads bring the list back to the top
    pub fn scroll_to_top(self) -> bool {
        matches!(self, FeedUpdate::Replaced)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Reported,
    /// Already reported from this installation; nothing was sent
    AlreadyReported,
}

pub struct CommentFeedController {
    api: Arc<dyn CommentsApi>,
    local: Arc<LocalState>,
    state: FeedState,
    last_seq: u64,
    /// Sequence number of the newest unanswered request
    in_flight: Option<u64>,
    /// Last page merged into `items`, 0 when empty
    loaded_page: u32,
}

impl CommentFeedController {
    pub fn new(api: Arc<dyn CommentsApi>, local: Arc<LocalState>) -> Self {
        Self {
            api,
            local,
            state: FeedState::default(),
            last_seq: 0,
            in_flight: None,
            loaded_page: 0,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn items(&self) -> &[CommentViewModel] {
        &self.state.items
    }

    pub fn query(&self) -> &FeedQuery {
        &self.state.query
    }

    pub fn has_reached_end(&self) -> bool {
        self.state.has_reached_end
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    fn issue(&mut self, prior_end: bool) -> PageRequest {
        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        debug!(seq = self.last_seq, query = ?self.state.query, "issuing page request");

        PageRequest {
            seq: self.last_seq,
            query: self.state.query.clone(),
            prior_end,
        }
    }

    /// Back to an empty page 1 after a sort or filter change
    fn reset(&mut self) -> PageRequest {
        self.state.query.page = 1;
        self.state.has_reached_end = false;
        self.state.items.clear();
        self.loaded_page = 0;
        self.issue(false)
    }

    pub fn set_sort(&mut self, sort: SortType) -> Option<PageRequest> {
        if self.state.query.sort == sort {
            return None;
        }
        self.state.query.sort = sort;
        Some(self.reset())
    }

    /// Under `Latest` the window is remembered for later but fetches nothing
    pub fn set_time_filter(&mut self, time_filter: TimeFilter) -> Option<PageRequest> {
        if self.state.query.time_filter == time_filter {
            return None;
        }
        self.state.query.time_filter = time_filter;
        if self.state.query.sort != SortType::Top {
            return None;
        }
        Some(self.reset())
    }

    /// `None` or a blank name clears the filter
    pub fn set_city_filter(&mut self, city: Option<&str>) -> Option<PageRequest> {
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        if self.state.query.city == city {
            return None;
        }
        self.state.query.city = city;
        Some(self.reset())
    }

    pub fn load_next_page(&mut self) -> Option<PageRequest> {
        if self.state.items.is_empty() || self.state.has_reached_end || self.is_fetching() {
            return None;
        }
        self.state.query.page += 1;
        Some(self.issue(false))
    }

    /// Pull-to-refresh: always re-requests page 1. Items stay visible until
    /// the response replaces them.
    pub fn refresh(&mut self) -> PageRequest {
        let prior_end = self.state.has_reached_end;
        self.state.query.page = 1;
        self.state.has_reached_end = false;
        self.issue(prior_end)
    }

    pub fn apply(&mut self, response: PageResponse) -> Result<FeedUpdate, AppError> {
        let PageResponse { request, result } = response;

        if self.in_flight != Some(request.seq) {
            debug!(seq = request.seq, latest = self.last_seq, "dropping superseded response");
            return Ok(FeedUpdate::Stale);
        }
        self.in_flight = None;

        match result {
            Ok(comments) => Ok(self.merge(request.query.page, comments)),
            Err(ApiError::NotFound) => {
                debug!(page = request.query.page, "no more comments");
                self.state.has_reached_end = true;
                Ok(FeedUpdate::Exhausted)
            }
            Err(e) => {
                warn!(page = request.query.page, "failed to fetch comments: {e}");
                // Back to what is on screen, so the next page is not skipped
                self.state.query.page = self.loaded_page.max(1);
                self.state.has_reached_end = request.prior_end;
                Err(e.into())
            }
        }
    }

    fn merge(&mut self, page: u32, comments: Vec<Comment>) -> FeedUpdate {
        let full_page = comments.len() >= PAGE_SIZE;

        if page == 1 {
            self.state.items.clear();
        }
        let mut seen: HashSet<i64> = self.state.items.iter().map(|item| item.id).collect();
        let before = self.state.items.len();
        self.state.items.extend(
            comments
                .into_iter()
                .filter(|comment| seen.insert(comment.id))
                .map(CommentViewModel::from),
        );
        let added = self.state.items.len() - before;
        self.loaded_page = page;

        if !full_page {
            self.state.has_reached_end = true;
        }
        self.overlay();

        if page == 1 {
            FeedUpdate::Replaced
        } else {
            FeedUpdate::Appended { added }
        }
    }

    /// Re-read both id sets; another controller may have written them
    fn overlay(&mut self) {
        let liked = self.local.liked().snapshot();
        let reported = self.local.reported().snapshot();

        for item in &mut self.state.items {
            item.liked = liked.contains(&item.id);
            item.reported = reported.contains(&item.id);
        }
    }

    /// Send `request` and apply its response
    pub async fn run(&mut self, request: Option<PageRequest>) -> Result<FeedUpdate, AppError> {
        let Some(request) = request else {
            return Ok(FeedUpdate::Unchanged);
        };
        let api = Arc::clone(&self.api);
        let response = request.send(api.as_ref()).await;
        self.apply(response)
    }

    /// Initial load when the feed is first shown
    pub async fn open(&mut self) -> Result<FeedUpdate, AppError> {
        let request = self.refresh();
        self.run(Some(request)).await
    }

    fn item_mut(&mut self, comment_id: i64) -> Option<&mut CommentViewModel> {
        self.state.items.iter_mut().find(|item| item.id == comment_id)
    }

    /// Nothing changes locally until the server confirms the vote
    pub async fn upvote(&mut self, comment_id: i64) -> Result<u32, AppError> {
        let count = self.api.upvote(comment_id).await?;

        if let Some(item) = self.item_mut(comment_id) {
            item.upvotes = count;
            item.liked = true;
        }
        if let Err(e) = self.local.liked().insert(comment_id) {
            warn!(comment_id, "failed to record like: {e}");
        }
        Ok(count)
    }

    pub async fn remove_upvote(&mut self, comment_id: i64) -> Result<u32, AppError> {
        let count = self.api.remove_upvote(comment_id).await?;

        if let Some(item) = self.item_mut(comment_id) {
            item.upvotes = count;
            item.liked = false;
        }
        if let Err(e) = self.local.liked().remove(comment_id) {
            warn!(comment_id, "failed to forget like: {e}");
        }
        Ok(count)
    }

    /// Returns the new comment's id. A failed follow-up refresh is logged,
    /// not reported: the comment itself was created.
    pub async fn submit_comment(&mut self, city: &str, text: &str) -> Result<i64, AppError> {
        validate::comment(city, text)?;

        if let Err(e) = self.local.remember_city(city) {
            warn!("failed to remember city: {e}");
        }

        let comment_id = self.api.submit_comment(city, text).await?;
        info!(comment_id, city, "comment submitted");

        // Authors start out liking their own comment
        if let Err(e) = self.local.liked().insert(comment_id) {
            warn!(comment_id, "failed to record like: {e}");
        }

        let request = self.refresh();
        if let Err(e) = self.run(Some(request)).await {
            warn!("refresh after submitting comment failed: {e}");
        }
        Ok(comment_id)
    }

    pub async fn report_comment(
        &mut self,
        comment_id: i64,
        reason: &str,
    ) -> Result<ReportOutcome, AppError> {
        validate::report_reason(reason)?;

        let shown_reported = self
            .state
            .items
            .iter()
            .any(|item| item.id == comment_id && item.reported);
        let stored_reported = match self.local.reported().contains(comment_id) {
            Ok(reported) => reported,
            Err(e) => {
                warn!(comment_id, "failed to read reported comments: {e}");
                false
            }
        };
        if shown_reported || stored_reported {
            debug!(comment_id, "comment already reported");
            return Ok(ReportOutcome::AlreadyReported);
        }

        self.api.report_comment(comment_id, reason).await?;
        info!(comment_id, "comment reported");

        if let Some(item) = self.item_mut(comment_id) {
            item.reported = true;
        }
        if let Err(e) = self.local.reported().insert(comment_id) {
            warn!(comment_id, "failed to record report: {e}");
        }
        Ok(ReportOutcome::Reported)
    }
}
