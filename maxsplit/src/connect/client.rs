//! Booking API HTTP client.
//!
//! Issues itinerary-search page requests against the booking site's
//! backend-for-frontend and decodes them into [`ItineraryPage`] DTOs.
//! Authentication is a session cookie obtained out of band.

use chrono::NaiveDateTime;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;

use crate::domain::StationCode;

use super::error::ConnectError;
use super::types::ItineraryPage;

/// Default base URL for the booking API.
const DEFAULT_BASE_URL: &str = "https://www.sncf-connect.com/bff/api/v1";

/// Prefix turning a 5-letter station code into a booking-system place id.
const PLACE_ID_PREFIX: &str = "RESARAIL_STA_";

/// Configuration for the booking API client.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Session cookie for the booking site.
    pub cookie: String,

    /// Discount card number attached to the searching passenger.
    pub card_number: String,

    /// Base URL for the API (defaults to production).
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ConnectConfig {
    /// Create a new config with the given session cookie and card number.
    pub fn new(cookie: impl Into<String>, card_number: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            card_number: card_number.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Booking API client.
///
/// One page request per call; pacing between calls is the caller's
/// responsibility (the fetch loop inserts the politeness delay). The
/// client never retries: anti-bot rejections need out-of-band cookie
/// remediation.
#[derive(Debug, Clone)]
pub struct ConnectClient {
    http: reqwest::Client,
    base_url: String,
    card_number: String,
}

impl ConnectClient {
    /// Create a new booking API client.
    pub fn new(config: ConnectConfig) -> Result<Self, ConnectError> {
        let mut headers = HeaderMap::new();

        let cookie = HeaderValue::from_str(&config.cookie).map_err(|_| ConnectError::Api {
            status: 0,
            message: "Invalid cookie format".to_string(),
        })?;
        headers.insert(reqwest::header::COOKIE, cookie);
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            card_number: config.card_number,
        })
    }

    /// Fetch one page of itinerary results.
    ///
    /// `departure` anchors the page: the first page of a day uses the
    /// day's start, later pages use the previous page's last departure.
    pub async fn fetch_next_page(
        &self,
        origin: &StationCode,
        destination: &StationCode,
        departure: NaiveDateTime,
    ) -> Result<ItineraryPage, ConnectError> {
        let url = format!("{}/itineraries", self.base_url);

        let body = json!({
            "schedule": {
                "outward": {
                    "date": format!("{}.000Z", departure.format("%Y-%m-%dT%H:%M:%S")),
                    "arrivalAt": false,
                },
            },
            "mainJourney": {
                "origin": {
                    "id": format!("{PLACE_ID_PREFIX}{origin}"),
                    "geolocation": false,
                },
                "destination": {
                    "id": format!("{PLACE_ID_PREFIX}{destination}"),
                    "geolocation": false,
                },
            },
            "passengers": [
                {
                    "discountCards": [
                        {
                            "code": "TGV_MAX",
                            "number": self.card_number,
                            "label": "MAX JEUNE",
                        },
                    ],
                    "typology": "YOUNG",
                    "withoutSeatAssignment": false,
                },
            ],
            "pets": [],
            "branch": "SHOP",
            "forceDisplayResults": true,
            "directJourney": true,
            "trainExpected": true,
            "wishBike": false,
            "strictMode": false,
        });

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ConnectError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ConnectError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ConnectError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = ConnectConfig::new("cookie=abc", "29090125700000000")
            .with_base_url("http://localhost:8080")
            .with_timeout(30);

        assert_eq!(config.cookie, "cookie=abc");
        assert_eq!(config.card_number, "29090125700000000");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_defaults() {
        let config = ConnectConfig::new("cookie=abc", "29090125700000000");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn client_creation() {
        let config = ConnectConfig::new("cookie=abc", "29090125700000000");
        assert!(ConnectClient::new(config).is_ok());
    }

    #[test]
    fn client_rejects_invalid_cookie() {
        let config = ConnectConfig::new("bad\ncookie", "29090125700000000");
        assert!(ConnectClient::new(config).is_err());
    }
}
