// SPDX-License-Identifier: MPL-2.0

mod controller;
mod query;
mod view;

pub use controller::{
    CommentFeedController, FeedState, FeedUpdate, PageRequest, PageResponse, ReportOutcome,
};
pub use query::FeedQuery;
pub use view::{CommentViewModel, format_time_ago};
