// SPDX-License-Identifier: MPL-2.0

use crate::api::{CitiesApi, CityDetails, CitySummary, TimeFilter};
use crate::error::AppError;
use crate::state::LocalState;
use crate::validate;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// City ranking by reported wait times over a time window
pub struct CityBoard {
    api: Arc<dyn CitiesApi>,
    local: Arc<LocalState>,
    filter: TimeFilter,
    cities: Vec<CitySummary>,
}

impl CityBoard {
    pub fn new(api: Arc<dyn CitiesApi>, local: Arc<LocalState>) -> Self {
        Self {
            api,
            local,
            filter: TimeFilter::default(),
            cities: Vec::new(),
        }
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    /// Ranking in server order
    pub fn cities(&self) -> &[CitySummary] {
        &self.cities
    }

    /// Returns whether the window changed
    pub fn set_filter(&mut self, filter: TimeFilter) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        true
    }

    /// Switch windows, refetching only when it changed
    pub async fn select_filter(&mut self, filter: TimeFilter) -> Result<bool, AppError> {
        if !self.set_filter(filter) {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let cities = self.api.cities_aggregated(self.filter).await?;
        debug!(filter = self.filter.as_str(), count = cities.len(), "ranking loaded");
        self.cities = cities;
        Ok(())
    }

    /// Returns the accepted minutes. The ranking refresh afterwards is best effort.
    pub async fn submit_wait_time(&mut self, city: &str, minutes: &str) -> Result<u32, AppError> {
        let minutes = validate::wait_report(city, minutes)?;

        if let Err(e) = self.local.remember_city(city) {
            warn!("failed to remember city: {e}");
        }

        self.api.submit_wait_minutes(city, minutes).await?;
        info!(city, minutes, "wait time submitted");

        if let Err(e) = self.refresh().await {
            warn!("refresh after submitting wait time failed: {e}");
        }
        Ok(minutes)
    }

    pub async fn city_details(&self, city_id: i64) -> Result<CityDetails, AppError> {
        Ok(self.api.city_details(city_id).await?)
    }
}

/// "3:05 pm" for today, "Tuesday 11/05, 3:05 pm" otherwise, in `now`'s zone
pub fn format_detail_timestamp<Tz>(timestamp: DateTime<Utc>, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = timestamp.with_timezone(&now.timezone());
    if local.date_naive() == now.date_naive() {
        local.format("%-I:%M %P").to_string()
    } else {
        local.format("%A %m/%d, %-I:%M %P").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::store::SqliteStore;
    use crate::validate::ValidationError;
    use async_trait::async_trait;
    use chrono::FixedOffset;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCities {
        ranking_requests: Mutex<Vec<TimeFilter>>,
        submissions: Mutex<Vec<(String, u32)>>,
    }

    #[async_trait]
    impl CitiesApi for FakeCities {
        async fn list_cities(&self) -> Result<Vec<String>, ApiError> {
            Ok(vec!["Chicago".to_string()])
        }

        async fn cities_aggregated(&self, filter: TimeFilter) -> Result<Vec<CitySummary>, ApiError> {
            self.ranking_requests.lock().unwrap().push(filter);
            Ok(vec![CitySummary {
                id: 1,
                name: format!("Chicago ({})", filter.as_str()),
                thumbnail_image: None,
                average_wait_minutes: Some(12.5),
                highest_wait_minutes: Some(40.0),
                top_transit_note: None,
                top_note_upvotes: None,
            }])
        }

        async fn city_details(&self, city_id: i64) -> Result<CityDetails, ApiError> {
            if city_id != 1 {
                return Err(ApiError::NotFound);
            }
            Ok(CityDetails {
                recent_comments: Vec::new(),
                recent_wait_times: Vec::new(),
                wait_time_summary: Vec::new(),
            })
        }

        async fn submit_wait_minutes(&self, city: &str, minutes: u32) -> Result<(), ApiError> {
            self.submissions
                .lock()
                .unwrap()
                .push((city.to_string(), minutes));
            Ok(())
        }
    }

    fn setup() -> (Arc<FakeCities>, Arc<LocalState>, CityBoard) {
        let api = Arc::new(FakeCities::default());
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let local = Arc::new(LocalState::new(store));
        let board = CityBoard::new(api.clone(), local.clone());
        (api, local, board)
    }

    #[tokio::test]
    async fn test_select_filter_refetches_only_on_change() {
        let (api, _, mut board) = setup();
        assert_eq!(board.filter(), TimeFilter::Day);

        assert!(!board.select_filter(TimeFilter::Day).await.unwrap());
        assert!(board.select_filter(TimeFilter::Month).await.unwrap());

        assert_eq!(*api.ranking_requests.lock().unwrap(), vec![TimeFilter::Month]);
        assert_eq!(board.cities()[0].name, "Chicago (month)");
    }

    #[tokio::test]
    async fn test_wait_time_submission_remembers_city() {
        let (api, local, mut board) = setup();

        assert_eq!(board.submit_wait_time("Chicago", "25").await.unwrap(), 25);
        assert_eq!(
            *api.submissions.lock().unwrap(),
            vec![("Chicago".to_string(), 25)]
        );
        assert_eq!(local.last_city().unwrap().as_deref(), Some("Chicago"));
        assert_eq!(board.cities().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_wait_time_is_not_sent() {
        let (api, local, mut board) = setup();

        let err = board.submit_wait_time("Chicago", "abc").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidWaitMinutes)
        ));
        assert!(api.submissions.lock().unwrap().is_empty());
        assert_eq!(local.last_city().unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_city_details() {
        let (_, _, board) = setup();
        assert!(board.city_details(1).await.is_ok());
        assert!(matches!(
            board.city_details(99).await,
            Err(AppError::Api(ApiError::NotFound))
        ));
    }

    #[test]
    fn test_detail_timestamp_today_shows_time_only() {
        let now = Utc.with_ymd_and_hms(2024, 11, 5, 18, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 11, 5, 15, 5, 0).unwrap();
        assert_eq!(format_detail_timestamp(earlier, now), "3:05 pm");
    }

    #[test]
    fn test_detail_timestamp_other_day_shows_weekday() {
        let now = Utc.with_ymd_and_hms(2024, 11, 7, 9, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 11, 5, 15, 5, 0).unwrap();
        assert_eq!(format_detail_timestamp(earlier, now), "Tuesday 11/05, 3:05 pm");
    }

    #[test]
    fn test_detail_timestamp_uses_viewer_zone() {
        // 02:30 UTC is still the previous evening in Chicago
        let chicago = FixedOffset::west_opt(6 * 3600).unwrap();
        let now = chicago.with_ymd_and_hms(2024, 11, 5, 22, 0, 0).unwrap();
        let sent = Utc.with_ymd_and_hms(2024, 11, 6, 2, 30, 0).unwrap();
        assert_eq!(format_detail_timestamp(sent, now), "8:30 pm");
    }
}
