// SPDX-License-Identifier: MPL-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment ordering on the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortType {
    #[default]
    Latest,
    Top,
}

impl SortType {
    /// Path segment understood by the backend
    pub fn as_str(self) -> &'static str {
        match self {
            SortType::Latest => "latest",
            SortType::Top => "top",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortType::Latest => "Latest",
            SortType::Top => "Top",
        }
    }
}

/// Aggregation window for city rankings and "top" comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeFilter {
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    /// All windows in display order
    pub const ALL: [TimeFilter; 5] = [
        TimeFilter::Day,
        TimeFilter::Week,
        TimeFilter::Month,
        TimeFilter::Year,
        TimeFilter::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeFilter::Day => "Today",
            TimeFilter::Week => "Week",
            TimeFilter::Month => "Month",
            TimeFilter::Year => "Year",
            TimeFilter::All => "All Time",
        }
    }
}

/// A comment as issued by the server. Immutable apart from `upvotes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub city_name: String,
    pub report_text: String,
    #[serde(with = "timestamp")]
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub upvotes: u32,
}

/// One row of the aggregated city ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub thumbnail_image: Option<String>,
    #[serde(default)]
    pub average_wait_minutes: Option<f64>,
    #[serde(default)]
    pub highest_wait_minutes: Option<f64>,
    #[serde(default)]
    pub top_transit_note: Option<String>,
    #[serde(default)]
    pub top_note_upvotes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityDetails {
    #[serde(default)]
    pub recent_comments: Vec<RecentComment>,
    #[serde(default)]
    pub recent_wait_times: Vec<RecentWaitTime>,
    #[serde(default)]
    pub wait_time_summary: Vec<WaitTimeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentComment {
    pub comment: String,
    #[serde(with = "timestamp")]
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentWaitTime {
    pub wait_time: u32,
    #[serde(with = "timestamp")]
    pub submitted_at: DateTime<Utc>,
}

/// Wait statistics for one aggregation window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitTimeSummary {
    pub time_horizon: String,
    #[serde(default)]
    pub avg_min: Option<f64>,
    #[serde(default)]
    pub highest_min: Option<f64>,
    #[serde(default)]
    pub num_submissions: u32,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// Server timestamps are UTC, with or without an explicit offset.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
