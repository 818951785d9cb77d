// SPDX-License-Identifier: MPL-2.0

use crate::api::{SortType, TimeFilter};

/// What the feed currently asks the server for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub sort: SortType,
    /// Only sent while `sort` is `Top`
    pub time_filter: TimeFilter,
    pub city: Option<String>,
    /// 1-based page cursor
    pub page: u32,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            sort: SortType::Latest,
            time_filter: TimeFilter::Day,
            city: None,
            page: 1,
        }
    }
}

impl FeedQuery {
    /// Query-string pairs for `/api/comments-aggregated/{sort}/`
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if self.sort == SortType::Top {
            pairs.push(("time_filter", self.time_filter.as_str().to_string()));
        }
        if let Some(city) = &self.city {
            pairs.push(("city_name", city.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}
