// SPDX-License-Identifier: MPL-2.0

//! Form checks that run before anything touches the network.
//!
//! Lengths are counted in extended grapheme clusters, so an emoji or an
//! accented letter counts once no matter how it is encoded.

use crate::config::{MAX_COMMENT_CHARS, MAX_WAIT_MINUTES, MIN_REPORT_REASON_CHARS};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Form field a validation message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    City,
    Comment,
    ReportReason,
    WaitMinutes,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide a city.")]
    MissingCity,
    #[error("Please provide a comment.")]
    MissingComment,
    #[error("Please make sure comment is at most {max} characters.")]
    CommentTooLong { len: usize, max: usize },
    #[error("Please provide a report reason.")]
    MissingReportReason,
    #[error("Please make sure report reason has at least {min} characters.")]
    ReportReasonTooShort { len: usize, min: usize },
    #[error("Please provide wait minutes.")]
    MissingWaitMinutes,
    #[error("Please provide wait minutes as a whole number.")]
    InvalidWaitMinutes,
    #[error("Please provide a wait time under 2 days.")]
    WaitTooLong { minutes: u32 },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingCity => Field::City,
            ValidationError::MissingComment | ValidationError::CommentTooLong { .. } => {
                Field::Comment
            }
            ValidationError::MissingReportReason
            | ValidationError::ReportReasonTooShort { .. } => Field::ReportReason,
            ValidationError::MissingWaitMinutes
            | ValidationError::InvalidWaitMinutes
            | ValidationError::WaitTooLong { .. } => Field::WaitMinutes,
        }
    }
}

pub fn char_count(text: &str) -> usize {
    text.graphemes(true).count()
}

fn city(city: &str) -> Result<(), ValidationError> {
    if city.is_empty() {
        return Err(ValidationError::MissingCity);
    }
    Ok(())
}

/// City and comment text for a new comment
pub fn comment(city_name: &str, text: &str) -> Result<(), ValidationError> {
    city(city_name)?;

    if text.is_empty() {
        return Err(ValidationError::MissingComment);
    }
    let len = char_count(text);
    if len > MAX_COMMENT_CHARS {
        return Err(ValidationError::CommentTooLong {
            len,
            max: MAX_COMMENT_CHARS,
        });
    }
    Ok(())
}

pub fn report_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.is_empty() {
        return Err(ValidationError::MissingReportReason);
    }
    let len = char_count(reason);
    if len < MIN_REPORT_REASON_CHARS {
        return Err(ValidationError::ReportReasonTooShort {
            len,
            min: MIN_REPORT_REASON_CHARS,
        });
    }
    Ok(())
}

/// City plus the raw minutes input; returns the parsed minutes
pub fn wait_report(city_name: &str, minutes: &str) -> Result<u32, ValidationError> {
    city(city_name)?;

    let minutes = minutes.trim();
    if minutes.is_empty() {
        return Err(ValidationError::MissingWaitMinutes);
    }
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| ValidationError::InvalidWaitMinutes)?;
    if minutes > MAX_WAIT_MINUTES {
        return Err(ValidationError::WaitTooLong { minutes });
    }
    Ok(minutes)
}
