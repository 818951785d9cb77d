// SPDX-License-Identifier: MPL-2.0

mod client;
mod types;

pub use client::{ApiError, TransitClient};
pub use types::{
    CityDetails, CitySummary, Comment, RecentComment, RecentWaitTime, SortType, TimeFilter,
    WaitTimeSummary,
};

use crate::feed::FeedQuery;
use async_trait::async_trait;

/// Comment endpoints the feed depends on.
#[async_trait]
pub trait CommentsApi: Send + Sync {
    /// One page of the aggregated feed. A 404 is reported as `ApiError::NotFound`.
    async fn comments_page(&self, query: &FeedQuery) -> Result<Vec<Comment>, ApiError>;

    /// Returns the server's new upvote count
    async fn upvote(&self, comment_id: i64) -> Result<u32, ApiError>;

    /// Returns the server's new upvote count
    async fn remove_upvote(&self, comment_id: i64) -> Result<u32, ApiError>;

    /// Returns the id of the created comment
    async fn submit_comment(&self, city: &str, text: &str) -> Result<i64, ApiError>;

    async fn report_comment(&self, comment_id: i64, reason: &str) -> Result<(), ApiError>;
}

/// City ranking and wait-time endpoints.
#[async_trait]
pub trait CitiesApi: Send + Sync {
    async fn list_cities(&self) -> Result<Vec<String>, ApiError>;

    async fn cities_aggregated(&self, filter: TimeFilter) -> Result<Vec<CitySummary>, ApiError>;

    async fn city_details(&self, city_id: i64) -> Result<CityDetails, ApiError>;

    async fn submit_wait_minutes(&self, city: &str, minutes: u32) -> Result<(), ApiError>;
}
