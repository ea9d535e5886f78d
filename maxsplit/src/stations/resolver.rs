//! Station resolution.
//!
//! Combines the name-normalization table with the two external
//! directories to turn a free-text station name into a fully resolved
//! [`Station`]. The resolver owns its clients and is passed down the
//! call chain explicitly; there is no process-wide directory handle.

use tracing::debug;

use crate::domain::{Station, StationCode};

use super::client::{AutocompleteClient, LocationsClient};
use super::error::StationError;
use super::names::{Normalized, normalize};

/// Resolves station names against the booking-code and identifier
/// directories.
#[derive(Debug, Clone)]
pub struct StationResolver {
    autocomplete: AutocompleteClient,
    locations: LocationsClient,
}

impl StationResolver {
    /// Create a resolver from its two directory clients.
    pub fn new(autocomplete: AutocompleteClient, locations: LocationsClient) -> Self {
        Self {
            autocomplete,
            locations,
        }
    }

    /// Resolve the booking code and canonical label for a station name.
    ///
    /// The normalization table is consulted first; unmatched names go to
    /// the external fuzzy lookup with a rewritten query.
    pub async fn resolve_code(
        &self,
        name: &str,
    ) -> Result<(StationCode, String), StationError> {
        match normalize(name) {
            Normalized::Fixed { code, label } => {
                debug!(name, %code, "station code from normalization table");
                Ok((code, label.to_string()))
            }
            Normalized::Query(query) => {
                let (code, label) = self.autocomplete.resolve_code(&query).await.map_err(
                    |error| match error {
                        // Surface the caller's name, not the rewritten query
                        StationError::NotFound(_) => StationError::NotFound(name.to_string()),
                        other => other,
                    },
                )?;
                debug!(name, %code, label, "station code from autocomplete");
                Ok((code, label))
            }
        }
    }

    /// Resolve the rail directory identifier for a station name.
    pub async fn resolve_identifier(&self, name: &str) -> Result<String, StationError> {
        let identifier = self.locations.resolve_identifier(name).await.map_err(
            |error| match error {
                StationError::NotFound(_) => StationError::NotFound(name.to_string()),
                other => other,
            },
        )?;
        debug!(name, identifier, "station identifier resolved");
        Ok(identifier)
    }

    /// Fully resolve a station: booking code and directory identifier.
    ///
    /// The returned station carries the canonical label as its name.
    pub async fn resolve(&self, name: &str) -> Result<Station, StationError> {
        let (code, label) = self.resolve_code(name).await?;
        let identifier = self.resolve_identifier(name).await?;
        Ok(Station::new(label)
            .with_code(code)
            .with_identifier(identifier))
    }
}
