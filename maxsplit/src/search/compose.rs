//! Two-leg connection search.
//!
//! Walks the candidate via stations for a journey and, for each one,
//! searches both legs and pairs the results into connections. Each
//! candidate costs up to two full day searches against the booking API,
//! so the composer is aggressive about skipping candidates early: foreign
//! stations and unresolvable names cost zero fetches, and the leg
//! expected to have fewer free rides is searched first so a dead end is
//! found after one fetch, not two.

use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, warn};

use crate::destinations::{DirectDestinationSet, Reachable, common_stations};
use crate::domain::{Station, StationCode};
use crate::stations::{StationError, StationResolver};

use super::combine::{JointProposal, combine};
use super::fetch::{DayFetcher, JourneySearch};

/// Source of booking codes and identifiers for via candidates.
///
/// Candidate stations come from the rail directory graph, which knows
/// their names and identifiers but not their booking codes; those have to
/// be looked up before a leg can be searched. A forced via candidate
/// arrives as a bare name and needs both lookups.
pub trait ViaResolver {
    /// Resolve a station name to its booking code and canonical label.
    fn resolve_code(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(StationCode, String), StationError>>;

    /// Resolve a station name to its rail directory identifier.
    fn resolve_identifier(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<String, StationError>>;
}

impl ViaResolver for StationResolver {
    async fn resolve_code(&self, name: &str) -> Result<(StationCode, String), StationError> {
        StationResolver::resolve_code(self, name).await
    }

    async fn resolve_identifier(&self, name: &str) -> Result<String, StationError> {
        StationResolver::resolve_identifier(self, name).await
    }
}

/// Which half of a split journey a leg covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitLeg {
    /// Origin to the via station.
    Outward,

    /// Via station to the destination.
    Onward,
}

impl fmt::Display for SplitLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitLeg::Outward => f.write_str("outward"),
            SplitLeg::Onward => f.write_str("onward"),
        }
    }
}

/// The result of trying one via candidate.
#[derive(Debug, Clone)]
pub enum ViaOutcome {
    /// Both legs had free rides and at least one pair connects.
    Found {
        via: Station,
        itineraries: Vec<JointProposal>,
    },

    /// One leg had no free rides (or its search failed); the other leg
    /// was not searched if this was the first.
    LegNotFound { via: Station, leg: SplitLeg },

    /// Both legs had free rides but no pair connects in time.
    Incompatible { via: Station },
}

impl ViaOutcome {
    /// The via station this outcome is about.
    pub fn via(&self) -> &Station {
        match self {
            ViaOutcome::Found { via, .. }
            | ViaOutcome::LegNotFound { via, .. }
            | ViaOutcome::Incompatible { via } => via,
        }
    }
}

/// All via outcomes for one day's split search.
#[derive(Debug, Clone)]
pub struct SplitSearch {
    pub outcomes: Vec<ViaOutcome>,

    /// Duration high-water mark after every leg search.
    pub max_duration_minutes: i64,
}

/// Searches two-leg connections through candidate via stations.
pub struct ConnectionComposer<'a, S: JourneySearch, R: ViaResolver> {
    fetcher: DayFetcher<'a, S>,
    resolver: &'a R,
}

impl<'a, S: JourneySearch, R: ViaResolver> ConnectionComposer<'a, S, R> {
    pub fn new(fetcher: DayFetcher<'a, S>, resolver: &'a R) -> Self {
        Self { fetcher, resolver }
    }

    /// Search every candidate via station for two-leg connections on
    /// `day`.
    ///
    /// Candidates come from the intersection of the two direct-destination
    /// sets, or from `via_override` alone when the caller forces one.
    /// Failures are per-candidate: an unavailable leg search is reported
    /// as that leg missing, and the walk moves on to the next candidate.
    pub async fn search_splits(
        &self,
        origin: &Station,
        origin_code: &StationCode,
        destination: &Station,
        destination_code: &StationCode,
        departure_set: &DirectDestinationSet,
        arrival_set: &DirectDestinationSet,
        day: NaiveDate,
        via_override: Option<&str>,
        max_duration_minutes: i64,
    ) -> SplitSearch {
        let candidates = match via_override {
            Some(name) => self.forced_candidate(name).await.into_iter().collect(),
            None => common_stations(departure_set, arrival_set),
        };

        let mut outcomes = Vec::new();
        let mut max_duration_minutes = max_duration_minutes;

        for candidate in candidates {
            if self.is_endpoint(&candidate.station, origin, destination) {
                continue;
            }

            // Foreign stations cannot be booked under the discount card
            if !candidate.station.is_domestic() {
                debug!(via = %candidate.station.name, "skipping foreign via candidate");
                continue;
            }

            let via = match self.with_booking_code(candidate.station).await {
                Some(via) => via,
                None => continue,
            };
            let Some(via_code) = via.code else {
                continue;
            };

            let identifier = via.identifier.as_deref().unwrap_or_default();
            let outward_minutes = departure_set.duration_to(identifier).unwrap_or(0);
            let onward_minutes = arrival_set.duration_to(identifier).unwrap_or(0);

            // Search the longer leg first: it is the likelier dead end,
            // and a dead end found on the first leg saves the second
            // leg's fetch entirely.
            let first_leg = if outward_minutes >= onward_minutes {
                SplitLeg::Outward
            } else {
                SplitLeg::Onward
            };
            debug!(
                via = %via.name,
                outward_minutes,
                onward_minutes,
                %first_leg,
                "trying via candidate"
            );

            let (first_pair, second_pair) = match first_leg {
                SplitLeg::Outward => (
                    (origin_code, &via_code),
                    (&via_code, destination_code),
                ),
                SplitLeg::Onward => (
                    (&via_code, destination_code),
                    (origin_code, &via_code),
                ),
            };

            let first = match self
                .fetcher
                .fetch_day(first_pair.0, first_pair.1, day, max_duration_minutes)
                .await
            {
                Ok(result) => result,
                Err(error) => {
                    warn!(via = %via.name, %error, "leg search failed");
                    outcomes.push(ViaOutcome::LegNotFound {
                        via,
                        leg: first_leg,
                    });
                    continue;
                }
            };
            max_duration_minutes = first.max_duration_minutes;

            if first.proposals.is_empty() {
                outcomes.push(ViaOutcome::LegNotFound {
                    via,
                    leg: first_leg,
                });
                continue;
            }

            let second_leg = match first_leg {
                SplitLeg::Outward => SplitLeg::Onward,
                SplitLeg::Onward => SplitLeg::Outward,
            };

            let second = match self
                .fetcher
                .fetch_day(second_pair.0, second_pair.1, day, max_duration_minutes)
                .await
            {
                Ok(result) => result,
                Err(error) => {
                    warn!(via = %via.name, %error, "leg search failed");
                    outcomes.push(ViaOutcome::LegNotFound {
                        via,
                        leg: second_leg,
                    });
                    continue;
                }
            };
            max_duration_minutes = second.max_duration_minutes;

            if second.proposals.is_empty() {
                outcomes.push(ViaOutcome::LegNotFound {
                    via,
                    leg: second_leg,
                });
                continue;
            }

            let (outward, onward) = match first_leg {
                SplitLeg::Outward => (&first.proposals, &second.proposals),
                SplitLeg::Onward => (&second.proposals, &first.proposals),
            };

            let itineraries = combine(outward, onward);
            if itineraries.is_empty() {
                outcomes.push(ViaOutcome::Incompatible { via });
            } else {
                outcomes.push(ViaOutcome::Found { via, itineraries });
            }
        }

        SplitSearch {
            outcomes,
            max_duration_minutes,
        }
    }

    /// Resolve a forced via station to a full candidate.
    ///
    /// Both lookups are required: the booking code for the leg searches
    /// and the identifier for the domestic check and the duration-based
    /// leg ordering, same as any graph candidate.
    async fn forced_candidate(&self, name: &str) -> Option<Reachable> {
        let (code, label) = match self.resolver.resolve_code(name).await {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!(via = name, %error, "cannot resolve forced via station");
                return None;
            }
        };
        let identifier = match self.resolver.resolve_identifier(name).await {
            Ok(identifier) => identifier,
            Err(error) => {
                warn!(via = name, %error, "cannot resolve forced via identifier");
                return None;
            }
        };
        Some(Reachable {
            station: Station::new(label)
                .with_code(code)
                .with_identifier(identifier),
            duration_minutes: 0,
        })
    }

    fn is_endpoint(&self, candidate: &Station, origin: &Station, destination: &Station) -> bool {
        let matches = |endpoint: &Station| {
            (candidate.identifier.is_some() && candidate.identifier == endpoint.identifier)
                || (candidate.code.is_some() && candidate.code == endpoint.code)
        };
        matches(origin) || matches(destination)
    }

    /// Attach a booking code to a graph candidate, looking it up when the
    /// graph did not provide one. Returns `None` when the lookup fails;
    /// the candidate is not worth a leg search without a code.
    async fn with_booking_code(&self, station: Station) -> Option<Station> {
        if station.code.is_some() {
            return Some(station);
        }
        match self.resolver.resolve_code(&station.name).await {
            Ok((code, label)) => {
                let identifier = station.identifier.clone();
                let mut resolved = Station::new(label).with_code(code);
                if let Some(identifier) = identifier {
                    resolved = resolved.with_identifier(identifier);
                }
                Some(resolved)
            }
            Err(error) => {
                warn!(via = %station.name, %error, "cannot resolve via booking code");
                None
            }
        }
    }
}
