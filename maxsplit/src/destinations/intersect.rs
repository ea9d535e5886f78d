//! Direct-destination sets and their intersection.
//!
//! A station's direct-destination set is everything reachable from it by
//! a single ride, each destination tagged with that ride's duration. The
//! intersection of the departure's and the arrival's sets yields the
//! candidate via stations for a manual two-leg split.

use std::collections::HashMap;

use crate::domain::{Station, StationCode};

/// Booking code of the Paris aggregate, used as the hub fallback.
const PARIS_HUB_CODE: &str = "FRPAR";

/// Rail directory identifier of Paris.
const PARIS_HUB_IDENTIFIER: &str = "8796001";

/// A station reachable by one direct ride, tagged with the ride duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Reachable {
    pub station: Station,

    /// Duration of the direct ride, in minutes.
    pub duration_minutes: i64,
}

/// The set of stations reachable from one station by a single direct
/// ride. Built once per search endpoint.
#[derive(Debug, Clone)]
pub struct DirectDestinationSet {
    /// The station the set was fetched for.
    pub station: Station,

    /// Reachable stations, keyed by their directory identifier.
    pub destinations: HashMap<String, Reachable>,
}

impl DirectDestinationSet {
    /// Direct-ride duration to a destination, when the set knows it.
    pub fn duration_to(&self, identifier: &str) -> Option<i64> {
        self.destinations
            .get(identifier)
            .map(|reachable| reachable.duration_minutes)
    }
}

/// The Paris hub as a fallback via candidate.
///
/// Paris is the best-connected station in the network; a manual split
/// through it can work even when the direct-destination lookup misses it.
pub fn paris_hub() -> Reachable {
    let mut station = Station::new("Paris").with_identifier(PARIS_HUB_IDENTIFIER);
    // The table constant is known-valid; fall back to no code rather than
    // panicking if it ever is not.
    if let Ok(code) = StationCode::parse(PARIS_HUB_CODE) {
        station = station.with_code(code);
    }
    Reachable {
        station,
        duration_minutes: 0,
    }
}

/// Stations directly reachable from both endpoints, plus the hub
/// fallback.
///
/// On a shared key the arrival set's record wins. The hub is appended
/// only when it is not already part of the intersection, so it is never
/// searched twice. An empty intersection is a normal outcome: it means
/// "no via candidates from the graph", not a failure.
///
/// Results are ordered by identifier so a search visits candidates
/// deterministically.
pub fn common_stations(
    departure: &DirectDestinationSet,
    arrival: &DirectDestinationSet,
) -> Vec<Reachable> {
    let mut keys: Vec<&String> = departure
        .destinations
        .keys()
        .filter(|key| arrival.destinations.contains_key(*key))
        .collect();
    keys.sort();

    let mut common: Vec<Reachable> = keys
        .into_iter()
        .map(|key| arrival.destinations[key].clone())
        .collect();

    let hub = paris_hub();
    let hub_id = hub.station.identifier.as_deref().unwrap_or_default();
    if !common
        .iter()
        .any(|reachable| reachable.station.identifier.as_deref() == Some(hub_id))
    {
        common.push(hub);
    }

    common
}
