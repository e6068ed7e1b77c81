//! Reqwest-backed Naver local search adapter.
//!
//! Owns transport only: query parameters, credential headers, timeout, HTTP
//! error mapping and JSON decoding into domain candidates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::LocalSearchResponseDto;
use crate::domain::ports::{PLACE_SEARCH_LIMIT, PlaceSearch, PlaceSearchError};
use crate::domain::{PlaceCandidate, PlaceQuery};

/// Default Naver local search endpoint.
pub const NAVER_LOCAL_SEARCH_URL: &str = "https://openapi.naver.com/v1/search/local.json";

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

/// Application credentials issued by the provider.
#[derive(Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for NaverCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// [`PlaceSearch`] adapter issuing GET requests against one endpoint.
#[derive(Clone)]
pub struct NaverPlaceSearch {
    client: Client,
    endpoint: Url,
    credentials: NaverCredentials,
}

impl NaverPlaceSearch {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        credentials: NaverCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }
}

#[async_trait]
impl PlaceSearch for NaverPlaceSearch {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceCandidate>, PlaceSearchError> {
        let display = PLACE_SEARCH_LIMIT.to_string();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("query", query.as_str()),
                ("display", display.as_str()),
                ("sort", "random"),
            ])
            .header(CLIENT_ID_HEADER, self.credentials.client_id.as_str())
            .header(CLIENT_SECRET_HEADER, self.credentials.client_secret.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let candidates = parse_candidates(body.as_ref())?;
        debug!(count = candidates.len(), "place search returned candidates");
        Ok(candidates)
    }
}

fn parse_candidates(body: &[u8]) -> Result<Vec<PlaceCandidate>, PlaceSearchError> {
    let decoded: LocalSearchResponseDto = serde_json::from_slice(body).map_err(|error| {
        PlaceSearchError::decode(format!("invalid local search JSON payload: {error}"))
    })?;
    let mut candidates = decoded.into_candidates().map_err(PlaceSearchError::decode)?;
    candidates.truncate(PLACE_SEARCH_LIMIT);
    Ok(candidates)
}

fn map_transport_error(error: reqwest::Error) -> PlaceSearchError {
    if error.is_timeout() {
        PlaceSearchError::transport(format!("request timed out: {error}"))
    } else {
        PlaceSearchError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PlaceSearchError {
    PlaceSearchError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn status_errors_carry_a_compact_preview() {
        let body = br#"{"errorMessage": "Authentication failed",
            "errorCode": "024"}"#;
        let error = map_status_error(StatusCode::UNAUTHORIZED, body);
        assert_eq!(
            error,
            PlaceSearchError::status(
                401_u16,
                r#"{"errorMessage": "Authentication failed", "errorCode": "024"}"#
            )
        );
    }

    #[rstest]
    fn previews_are_truncated() {
        let body = "x".repeat(500);
        assert_eq!(body_preview(body.as_bytes()).chars().count(), 160);
    }

    #[rstest]
    fn malformed_payloads_are_decode_errors() {
        let error = parse_candidates(b"<html>").expect_err("not json");
        assert!(matches!(error, PlaceSearchError::Decode { .. }));
    }

    #[rstest]
    fn credentials_debug_hides_the_secret() {
        let credentials = NaverCredentials {
            client_id: "id".to_owned(),
            client_secret: "hunter2".to_owned(),
        };
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }
}
