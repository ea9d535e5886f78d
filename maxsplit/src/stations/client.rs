//! External station directory clients.
//!
//! Two directories are involved: the booking site's autocomplete (name to
//! 5-letter booking code) and the rail directory's location search (name
//! to numeric, country-prefixed identifier).

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::domain::StationCode;

use super::error::StationError;

/// Default base URL for the booking site's autocomplete.
const DEFAULT_AUTOCOMPLETE_BASE_URL: &str = "https://www.sncf-connect.com/bff/api/v1";

/// Default base URL for the rail directory location search.
const DEFAULT_LOCATIONS_BASE_URL: &str = "https://v6.db.transport.rest";

/// Place type label the autocomplete uses for train stations.
const STATION_TYPE_LABEL: &str = "Gare";

/// Autocomplete response wrapper.
#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    pub places: Option<Places>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Places {
    pub transport_places: Vec<TransportPlace>,
}

/// One autocomplete match.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportPlace {
    pub label: String,

    #[serde(rename = "type")]
    pub kind: Option<PlaceType>,

    pub codes: Option<Vec<PlaceCode>>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceType {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceCode {
    pub value: String,
}

/// Configuration for the autocomplete client.
#[derive(Debug, Clone)]
pub struct AutocompleteConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AUTOCOMPLETE_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl AutocompleteConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the booking site's station autocomplete.
#[derive(Debug, Clone)]
pub struct AutocompleteClient {
    http: reqwest::Client,
    base_url: String,
}

impl AutocompleteClient {
    /// Create a new autocomplete client.
    pub fn new(config: AutocompleteConfig) -> Result<Self, StationError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("fr-FR,fr;q=0.9"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Look up the booking code for a free-text station name.
    ///
    /// Returns the first match typed as a station, with its canonical
    /// label.
    pub async fn resolve_code(
        &self,
        query: &str,
    ) -> Result<(StationCode, String), StationError> {
        let url = format!("{}/autocomplete", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "searchTerm": query,
                "keepStationsOnly": true,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let response: AutocompleteResponse =
            serde_json::from_str(&body).map_err(|e| StationError::Json {
                message: e.to_string(),
            })?;

        let places = response
            .places
            .map(|p| p.transport_places)
            .unwrap_or_default();

        places
            .iter()
            .find(|place| {
                place
                    .kind
                    .as_ref()
                    .is_some_and(|kind| kind.label == STATION_TYPE_LABEL)
            })
            .and_then(|place| {
                let code = place.codes.as_ref()?.first()?;
                let code = StationCode::parse(&code.value).ok()?;
                Some((code, place.label.clone()))
            })
            .ok_or_else(|| StationError::NotFound(query.to_string()))
    }
}

/// One location match from the rail directory.
#[derive(Debug, Deserialize)]
pub struct Location {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Configuration for the locations client.
#[derive(Debug, Clone)]
pub struct LocationsConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LocationsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LOCATIONS_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl LocationsConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the rail directory's free-text location search.
#[derive(Debug, Clone)]
pub struct LocationsClient {
    http: reqwest::Client,
    base_url: String,
}

impl LocationsClient {
    /// Create a new locations client.
    pub fn new(config: LocationsConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Look up the numeric identifier for a free-text station name.
    ///
    /// The first match wins, mirroring how the directory itself ranks
    /// results.
    pub async fn resolve_identifier(&self, query: &str) -> Result<String, StationError> {
        let url = format!("{}/locations", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("query", query), ("results", "5")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let locations: Vec<Location> =
            serde_json::from_str(&body).map_err(|e| StationError::Json {
                message: e.to_string(),
            })?;

        locations
            .into_iter()
            .find_map(|location| {
                let id = location.id?;
                debug!(
                    query,
                    id,
                    name = location.name.as_deref().unwrap_or("?"),
                    "resolved station identifier"
                );
                Some(id)
            })
            .ok_or_else(|| StationError::NotFound(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_autocomplete_response() {
        let json = r#"{
            "places": {
                "transportPlaces": [
                    {
                        "label": "Lyon (toutes gares)",
                        "type": {"label": "Ville"},
                        "codes": [{"value": "FRLYS"}]
                    },
                    {
                        "label": "Lyon Part Dieu",
                        "type": {"label": "Gare"},
                        "codes": [{"value": "FRLPD"}]
                    }
                ]
            }
        }"#;

        let response: AutocompleteResponse = serde_json::from_str(json).unwrap();
        let places = response.places.unwrap().transport_places;
        assert_eq!(places.len(), 2);
        assert_eq!(places[1].label, "Lyon Part Dieu");
        assert_eq!(places[1].kind.as_ref().unwrap().label, "Gare");
        assert_eq!(places[1].codes.as_ref().unwrap()[0].value, "FRLPD");
    }

    #[test]
    fn deserialize_empty_autocomplete_response() {
        let response: AutocompleteResponse = serde_json::from_str("{}").unwrap();
        assert!(response.places.is_none());
    }

    #[test]
    fn deserialize_locations() {
        let json = r#"[
            {"id": "8796001", "name": "Paris"},
            {"id": "8768600", "name": "Paris Gare de Lyon"}
        ]"#;

        let locations: Vec<Location> = serde_json::from_str(json).unwrap();
        assert_eq!(locations[0].id.as_deref(), Some("8796001"));
        assert_eq!(locations[0].name.as_deref(), Some("Paris"));
    }

    #[test]
    fn config_defaults() {
        assert_eq!(
            AutocompleteConfig::default().base_url,
            DEFAULT_AUTOCOMPLETE_BASE_URL
        );
        assert_eq!(
            LocationsConfig::default().base_url,
            DEFAULT_LOCATIONS_BASE_URL
        );
    }
}
