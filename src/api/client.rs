// SPDX-License-Identifier: MPL-2.0

use crate::api::types::{CityDetails, CitySummary, Comment, TimeFilter};
use crate::api::{CitiesApi, CommentsApi};
use crate::config::{APP_NAME, BackendConfig};
use crate::feed::FeedQuery;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("not found")]
    NotFound,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

#[derive(Deserialize)]
struct CommentsPage {
    results: Vec<Comment>,
}

#[derive(Deserialize)]
struct UpvoteCount {
    num_upvotes: u32,
}

#[derive(Deserialize)]
struct CreatedComment {
    comment_id: i64,
}

/// Plain HTTP/JSON client for the Trash Transit backend. Anonymous: no
/// session, no auth headers.
pub struct TransitClient {
    http: reqwest::Client,
    base: Url,
}

impl TransitClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        // A base without a trailing slash would have its last segment
        // replaced by Url::join.
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("{APP_NAME}/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { http, base })
    }

    pub fn with_base(base_url: &str) -> Result<Self, ApiError> {
        Self::new(&BackendConfig::with_base(base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Map non-2xx statuses onto our error taxonomy
    fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::NOT_FOUND {
            Err(ApiError::NotFound)
        } else {
            warn!(%status, url = %response.url(), "request failed");
            Err(ApiError::Status(status.as_u16()))
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, ?params, "GET");

        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check(response)?
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// POST with an optional JSON body, returning the raw successful response
    async fn post(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");

        let request = self.http.post(url);
        let request = match body {
            Some(body) => request.json(&body),
            None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check(response)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        self.post(path, body)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl CommentsApi for TransitClient {
    async fn comments_page(&self, query: &FeedQuery) -> Result<Vec<Comment>, ApiError> {
        let path = format!("api/comments-aggregated/{}/", query.sort.as_str());
        let page: CommentsPage = self.get_json(&path, &query.query_pairs()).await?;
        Ok(page.results)
    }

    async fn upvote(&self, comment_id: i64) -> Result<u32, ApiError> {
        let path = format!("api/upvote/{comment_id}/");
        let count: UpvoteCount = self.post_json(&path, None).await?;
        Ok(count.num_upvotes)
    }

    async fn remove_upvote(&self, comment_id: i64) -> Result<u32, ApiError> {
        let path = format!("api/remove-upvote/{comment_id}/");
        let count: UpvoteCount = self.post_json(&path, None).await?;
        Ok(count.num_upvotes)
    }

    async fn submit_comment(&self, city: &str, text: &str) -> Result<i64, ApiError> {
        let body = serde_json::json!({ "city": city, "comment": text });
        let created: CreatedComment = self.post_json("api/submit-comment/", Some(body)).await?;
        Ok(created.comment_id)
    }

    async fn report_comment(&self, comment_id: i64, reason: &str) -> Result<(), ApiError> {
        let path = format!("api/report-comment/{comment_id}/");
        let body = serde_json::json!({ "report_reason": reason });
        self.post(&path, Some(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl CitiesApi for TransitClient {
    async fn list_cities(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("api/get-all-cities/", &[]).await
    }

    async fn cities_aggregated(&self, filter: TimeFilter) -> Result<Vec<CitySummary>, ApiError> {
        let path = format!("api/cities-aggregated/{}/", filter.as_str());
        self.get_json(&path, &[]).await
    }

    async fn city_details(&self, city_id: i64) -> Result<CityDetails, ApiError> {
        let path = format!("api/city-details/{city_id}/");
        self.get_json(&path, &[]).await
    }

    async fn submit_wait_minutes(&self, city: &str, minutes: u32) -> Result<(), ApiError> {
        // The backend reads waitMinutes as the raw form string
        let body = serde_json::json!({ "city": city, "waitMinutes": minutes.to_string() });
        self.post("api/submit-wait-minutes/", Some(body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SortType;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn comment_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "city_name": "Chicago",
            "report_text": format!("comment {id}"),
            "sent_at": "2024-11-05T12:00:00Z",
            "upvotes": 1
        })
    }

    fn client_for(server: &MockServer) -> TransitClient {
        TransitClient::with_base(&server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_comments_page_sends_top_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/comments-aggregated/top/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "results": [comment_json(1), comment_json(2)] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let query = FeedQuery {
            sort: SortType::Top,
            time_filter: TimeFilter::Week,
            city: Some("Chicago".to_string()),
            page: 2,
        };
        let comments = client.comments_page(&query).await.unwrap();
        assert_eq!(comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);

        let requests = server.received_requests().await.unwrap();
        let pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("time_filter".to_string(), "week".to_string()),
                ("city_name".to_string(), "Chicago".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_latest_page_has_no_time_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/comments-aggregated/latest/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let comments = client.comments_page(&FeedQuery::default()).await.unwrap();
        assert!(comments.is_empty());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("page=1"));
    }

    #[tokio::test]
    async fn test_not_found_is_distinguished() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.comments_page(&FeedQuery::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upvote/6/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.upvote(6).await.unwrap_err();
        assert!(matches!(err, ApiError::Status(500)));
    }

    #[tokio::test]
    async fn test_upvote_returns_server_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upvote/6/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "num_upvotes": 3 })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/remove-upvote/6/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "num_upvotes": 2 })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.upvote(6).await.unwrap(), 3);
        assert_eq!(client.remove_upvote(6).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_submit_comment_posts_city_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit-comment/"))
            .and(body_json(json!({ "city": "Boston", "comment": "Green line crawl" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "comment_id": 77 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let id = client
            .submit_comment("Boston", "Green line crawl")
            .await
            .unwrap();
        assert_eq!(id, 77);
    }

    #[tokio::test]
    async fn test_report_comment_sends_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/report-comment/12/"))
            .and(body_json(json!({ "report_reason": "spam!" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.report_comment(12, "spam!").await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_minutes_sent_as_form_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit-wait-minutes/"))
            .and(body_json(json!({ "city": "Chicago", "waitMinutes": "25" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.submit_wait_minutes("Chicago", 25).await.unwrap();
    }

    #[tokio::test]
    async fn test_city_endpoints_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/get-all-cities/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Boston", "Chicago"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/cities-aggregated/week/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1,
                "name": "Chicago",
                "thumbnail_image": null,
                "average_wait_minutes": 14.2,
                "highest_wait_minutes": 55,
                "top_note_upvotes": 9,
                "top_transit_note": "Blue line is a myth"
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/city-details/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "recent_comments": [{ "comment": "late", "submitted_at": "2024-11-05T08:00:00" }],
                "recent_wait_times": [{ "wait_time": 12, "submitted_at": "2024-11-05T08:05:00" }],
                "wait_time_summary": [{
                    "time_horizon": "day",
                    "avg_min": 12.0,
                    "highest_min": 12.0,
                    "num_submissions": 1,
                    "rank": 2
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.list_cities().await.unwrap(), vec!["Boston", "Chicago"]);

        let ranking = client.cities_aggregated(TimeFilter::Week).await.unwrap();
        assert_eq!(ranking[0].top_note_upvotes, Some(9));

        let details = client.city_details(1).await.unwrap();
        assert_eq!(details.recent_wait_times[0].wait_time, 12);
        assert_eq!(details.wait_time_summary[0].rank, Some(2));
    }

    #[test]
    fn test_base_path_is_preserved() {
        let client = TransitClient::with_base("http://example.test/transit").unwrap();
        let url = client.endpoint("api/get-all-cities/").unwrap();
        assert_eq!(url.as_str(), "http://example.test/transit/api/get-all-cities/");
    }
}
