// SPDX-License-Identifier: MPL-2.0

use crate::api::Comment;
use chrono::{DateTime, Datelike, Months, Timelike, Utc};
use serde::Serialize;

/// A comment plus this installation's local overlay, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentViewModel {
    pub id: i64,
    pub city_name: String,
    pub report_text: String,
    pub sent_at: DateTime<Utc>,
    pub upvotes: u32,
    pub liked: bool,
    pub reported: bool,
}

impl From<Comment> for CommentViewModel {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            city_name: comment.city_name,
            report_text: comment.report_text,
            sent_at: comment.sent_at,
            upvotes: comment.upvotes,
            liked: false,
            reported: false,
        }
    }
}

impl CommentViewModel {
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        format_time_ago(self.sent_at, now)
    }
}

fn ago(n: i64, unit: &str) -> String {
    let plural = if n > 1 { "s" } else { "" };
    format!("{n} {unit}{plural} ago")
}

/// Whole calendar months from `earlier` to `later`
fn months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = (later.year() - earlier.year()) as i64 * 12 + later.month() as i64
        - earlier.month() as i64;
    let later_rest = (later.day(), later.num_seconds_from_midnight());
    let earlier_rest = (earlier.day(), earlier.num_seconds_from_midnight());
    if later_rest < earlier_rest {
        months -= 1;
    }
    months
}

/// "Now", "5 minutes ago", "2 weeks ago", ...
///
/// Each bucket is inclusive of its upper bound: exactly one hour old is
/// still "60 minutes ago".
pub fn format_time_ago(sent_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(sent_at).max(chrono::Duration::zero());

    if elapsed <= chrono::Duration::minutes(1) {
        match elapsed.num_seconds() {
            0 => "Now".to_string(),
            secs => ago(secs, "second"),
        }
    } else if elapsed <= chrono::Duration::hours(1) {
        ago(elapsed.num_minutes(), "minute")
    } else if elapsed <= chrono::Duration::hours(24) {
        ago(elapsed.num_hours(), "hour")
    } else if elapsed <= chrono::Duration::days(7) {
        ago(elapsed.num_days(), "day")
    } else if elapsed <= chrono::Duration::days(30) {
        ago(elapsed.num_weeks(), "week")
    } else if now
        .checked_sub_months(Months::new(12))
        .is_some_and(|year_ago| sent_at >= year_ago)
    {
        ago(months_between(sent_at, now).max(1), "month")
    } else {
        ago((months_between(sent_at, now) / 12).max(1), "year")
    }
}
