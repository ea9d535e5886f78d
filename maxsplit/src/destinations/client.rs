//! Direct-destination graph client.
//!
//! Fetches, for a given station identifier, every station reachable by a
//! single direct ride together with that ride's duration.

use serde::Deserialize;

use crate::domain::Station;

use super::error::DestinationError;
use super::intersect::{DirectDestinationSet, Reachable};

/// Default base URL for the direct-destination service.
const DEFAULT_BASE_URL: &str = "https://api.direkt.bahn.guru";

/// One reachable station in the service's response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDestination {
    pub id: String,
    pub name: String,

    /// Direct-ride duration in minutes.
    pub duration: i64,
}

/// Configuration for the direct-destination client.
#[derive(Debug, Clone)]
pub struct DirectDestinationsConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DirectDestinationsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

impl DirectDestinationsConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the direct-destination service.
#[derive(Debug, Clone)]
pub struct DirectDestinationsClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectDestinationsClient {
    /// Create a new direct-destination client.
    pub fn new(config: DirectDestinationsConfig) -> Result<Self, DestinationError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch the direct-destination set for a station.
    ///
    /// The station must carry a resolved identifier. A non-success
    /// response usually means the directory does not know the identifier
    /// (border stations often need their local name, e.g. Ventimiglia
    /// rather than Vintimille).
    pub async fn fetch(
        &self,
        station: &Station,
    ) -> Result<DirectDestinationSet, DestinationError> {
        let identifier = station
            .identifier
            .as_deref()
            .ok_or_else(|| DestinationError::Unresolved(station.name.clone()))?;

        let url = format!("{}/{}", self.base_url, identifier);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DestinationError::UnknownStation {
                name: station.name.clone(),
            });
        }

        let body = response.text().await?;
        let raw: Vec<RawDestination> =
            serde_json::from_str(&body).map_err(|e| DestinationError::Json {
                message: e.to_string(),
            })?;

        Ok(build_set(station.clone(), raw))
    }
}

/// Assemble a destination set from raw response entries.
fn build_set(station: Station, raw: Vec<RawDestination>) -> DirectDestinationSet {
    let destinations = raw
        .into_iter()
        .map(|entry| {
            let reachable = Reachable {
                station: Station::new(entry.name).with_identifier(entry.id.clone()),
                duration_minutes: entry.duration,
            };
            (entry.id, reachable)
        })
        .collect();

    DirectDestinationSet {
        station,
        destinations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_destinations() {
        let json = r#"[
            {"id": "8775843", "name": "Nîmes", "duration": 62,
             "location": {"latitude": 43.832314, "longitude": 4.365831}},
            {"id": "8773002", "name": "Montpellier Saint-Roch", "duration": 45}
        ]"#;

        let raw: Vec<RawDestination> = serde_json::from_str(json).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].id, "8775843");
        assert_eq!(raw[0].duration, 62);
    }

    #[test]
    fn build_set_keys_by_identifier() {
        let raw = vec![
            RawDestination {
                id: "8775843".to_string(),
                name: "Nîmes".to_string(),
                duration: 62,
            },
            RawDestination {
                id: "8773002".to_string(),
                name: "Montpellier Saint-Roch".to_string(),
                duration: 45,
            },
        ];

        let set = build_set(Station::new("Beziers"), raw);
        assert_eq!(set.destinations.len(), 2);
        assert_eq!(set.duration_to("8775843"), Some(62));
        assert!(set.destinations["8773002"].station.is_domestic());
    }

    #[test]
    fn config_defaults() {
        assert_eq!(DirectDestinationsConfig::default().base_url, DEFAULT_BASE_URL);
    }
}
