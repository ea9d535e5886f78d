//! Bookable train ride proposals.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

use super::Station;

/// Sentinel seat count meaning "more than the booking UI shows".
///
/// The API stops publishing an exact remaining count above a threshold
/// (around ten); this stands in for "plenty left".
pub const MORE_THAN_THRESHOLD: u32 = 999;

/// Sentinel price the API uses for rides that are sold out under the
/// discount card.
pub const PRICE_UNAVAILABLE: f64 = 99999.0;

/// Short operator name used for night-train rides.
pub const NIGHT_TRAIN_TRANSPORTER: &str = "IC NUIT";

/// A kind of physical space on a train.
///
/// Night trains sell berths alongside ordinary seats; day trains only have
/// seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeatSpace {
    Seats,
    Berths,
}

impl fmt::Display for SeatSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatSpace::Seats => f.write_str("seats"),
            SeatSpace::Berths => f.write_str("berths"),
        }
    }
}

/// Availability metadata for one proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalMetadata {
    /// Operator name, special-cased for the night train ("IC NUIT").
    pub transporter: String,

    /// Train number, e.g. "6214".
    pub vehicle_number: String,

    /// Remaining places per physical space kind. Never empty for a
    /// bookable ride; counts of [`MORE_THAN_THRESHOLD`] mean "more than
    /// the UI threshold".
    pub remaining_seats: BTreeMap<SeatSpace, u32>,

    /// Best price for the ride. Zero means eligible under the discount
    /// card; [`PRICE_UNAVAILABLE`] means sold out.
    pub min_price: f64,
}

/// One bookable train ride between two stations, with its availability.
///
/// Constructed by parsing a single raw search-API record; immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    /// Ride duration in minutes.
    pub duration_minutes: i64,

    /// Departure timestamp.
    pub departure: NaiveDateTime,

    /// Arrival timestamp.
    pub arrival: NaiveDateTime,

    /// Departure station.
    pub origin: Station,

    /// Arrival station.
    pub destination: Station,

    /// Operator, train number, price, and remaining places.
    pub metadata: ProposalMetadata,
}

impl Proposal {
    /// Whether the ride is free under the discount card.
    pub fn is_eligible(&self) -> bool {
        self.metadata.min_price == 0.0
    }

    /// Whether the ride is sold out under the discount card.
    pub fn is_sold_out(&self) -> bool {
        self.metadata.min_price == PRICE_UNAVAILABLE
    }

    /// Maximum remaining count across all physical space kinds.
    ///
    /// Used to pick the scarcer of two legs for display. This is only a
    /// display proxy: the real bookability constraint is each leg
    /// independently having at least one place.
    pub fn remaining_seat_count(&self) -> u32 {
        self.metadata
            .remaining_seats
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Whether the ride offers berths.
    pub fn has_berths(&self) -> bool {
        self.metadata.remaining_seats.contains_key(&SeatSpace::Berths)
    }

    /// Whether the ride is a night train.
    pub fn is_night_train(&self) -> bool {
        self.metadata.transporter == NIGHT_TRAIN_TRANSPORTER
    }
}

/// Remove consecutive duplicate proposals from a day's accumulated results.
///
/// Pagination overlaps: the anchor for each next page is the previous
/// page's last departure, so the same ride can appear at a page boundary.
/// A proposal is dropped when it shares both departure and arrival
/// timestamps with the last *kept* proposal, so a run of three or more
/// duplicates collapses to one.
///
/// Never grows the list; the first element is always kept. Returns the
/// kept proposals and the number dropped.
pub fn remove_duplicates(proposals: Vec<Proposal>) -> (Vec<Proposal>, usize) {
    let mut kept: Vec<Proposal> = Vec::with_capacity(proposals.len());
    let mut removed = 0;

    for proposal in proposals {
        match kept.last() {
            Some(last)
                if last.departure == proposal.departure && last.arrival == proposal.arrival =>
            {
                removed += 1;
            }
            _ => kept.push(proposal),
        }
    }

    (kept, removed)
}
