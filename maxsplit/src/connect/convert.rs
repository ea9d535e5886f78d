//! Conversion from raw booking API records to domain proposals.
//!
//! Every record shape has a dedicated fallible parse; a missing field
//! yields a [`ParseError`] and the record is skipped by the filter rather
//! than aborting the page.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::domain::{
    MORE_THAN_THRESHOLD, NIGHT_TRAIN_TRANSPORTER, Proposal, ProposalMetadata, SeatSpace, Station,
};

use super::types::{RawOffer, RawProposal};

/// Night-train operator description, as published by the API.
const NIGHT_TRAIN_OPERATOR: &str = "INTERCITES DE NUIT";

/// A raw record could not be converted to a [`Proposal`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A field the conversion needs was absent.
    #[error("malformed record: missing field `{0}`")]
    MissingField(&'static str),

    /// A label was present but not in the expected format.
    #[error("malformed record: cannot parse {field} from {value:?}")]
    BadLabel {
        field: &'static str,
        value: String,
    },
}

/// Which non-eligible records the filter keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    /// Keep sold-out rides (price at the unavailable sentinel).
    pub include_unavailable: bool,

    /// Keep rides that cost money.
    pub include_non_eligible: bool,
}

/// Result of filtering one page of raw records.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Proposals that passed the filter, in page order.
    pub proposals: Vec<Proposal>,

    /// Updated duration high-water mark: the longest eligible ride seen so
    /// far across the day, threaded through every page.
    pub max_duration_minutes: i64,

    /// Number of malformed records skipped on this page.
    pub skipped: usize,
}

/// Filter one page of raw records.
///
/// Eligible rides (price zero) always qualify and bump the duration
/// high-water mark; sold-out and paid rides qualify only when the options
/// ask for them. Non-bookable records are skipped silently; malformed
/// records are skipped with a count.
pub fn filter_page(
    raw: &[RawProposal],
    max_duration_minutes: i64,
    options: FilterOptions,
) -> FilterOutcome {
    let mut proposals = Vec::new();
    let mut max_duration_minutes = max_duration_minutes;
    let mut skipped = 0;

    for record in raw {
        if !record.status.as_ref().is_some_and(|s| s.is_bookable) {
            continue;
        }

        let proposal = match parse_proposal(record) {
            Ok(proposal) => proposal,
            Err(error) => {
                debug!(%error, "skipping malformed record");
                skipped += 1;
                continue;
            }
        };

        if proposal.is_eligible() {
            if proposal.duration_minutes > max_duration_minutes {
                max_duration_minutes = proposal.duration_minutes;
            }
            proposals.push(proposal);
        } else if proposal.is_sold_out() {
            if options.include_unavailable {
                proposals.push(proposal);
            }
        } else if options.include_non_eligible {
            proposals.push(proposal);
        }
    }

    FilterOutcome {
        proposals,
        max_duration_minutes,
        skipped,
    }
}

/// Departure timestamp of a raw record, when its travel id carries one.
///
/// The fetch loop anchors each next-page request at the previous page's
/// last departure.
pub fn anchor_timestamp(raw: &RawProposal) -> Option<NaiveDateTime> {
    raw.travel_id
        .as_deref()
        .and_then(|id| departure_timestamp(id).ok())
}

/// Convert one raw record to a [`Proposal`].
pub fn parse_proposal(raw: &RawProposal) -> Result<Proposal, ParseError> {
    let duration_minutes = parse_duration_label(
        raw.duration_label
            .as_deref()
            .ok_or(ParseError::MissingField("durationLabel"))?,
    )?;

    let min_price = parse_price_label(
        raw.best_price_label
            .as_deref()
            .ok_or(ParseError::MissingField("bestPriceLabel"))?,
    )?;

    let departure = departure_timestamp(
        raw.travel_id
            .as_deref()
            .ok_or(ParseError::MissingField("travelId"))?,
    )?;

    let arrival_label = raw
        .arrival
        .as_ref()
        .and_then(|endpoint| endpoint.time_label.as_deref())
        .ok_or(ParseError::MissingField("arrival.timeLabel"))?;
    let arrival = arrival_timestamp(departure, arrival_label)?;

    let origin = raw
        .departure
        .as_ref()
        .and_then(|endpoint| endpoint.origin_station_label.as_deref())
        .map(Station::new)
        .ok_or(ParseError::MissingField("departure.originStationLabel"))?;

    let destination = raw
        .arrival
        .as_ref()
        .and_then(|endpoint| endpoint.destination_station_label.as_deref())
        .map(Station::new)
        .ok_or(ParseError::MissingField("arrival.destinationStationLabel"))?;

    let first_transporter = raw
        .timeline
        .as_ref()
        .and_then(|timeline| timeline.segments.first())
        .and_then(|segment| segment.transporter.as_ref())
        .ok_or(ParseError::MissingField("timeline.segments[0].transporter"))?;

    let description = first_transporter
        .description
        .as_deref()
        .ok_or(ParseError::MissingField("transporter.description"))?;
    let transporter = shorten_operator(description).to_string();

    let vehicle_number = first_transporter
        .number
        .clone()
        .ok_or(ParseError::MissingField("transporter.number"))?;

    let remaining_seats = if transporter == NIGHT_TRAIN_TRANSPORTER {
        // The night train publishes berths and seats as separate offer
        // entries rather than a single count.
        let offers = raw
            .second_comfort_class_offers
            .as_ref()
            .ok_or(ParseError::MissingField("secondComfortClassOffers"))?;
        night_train_spaces(&offers.offers)
    } else {
        let seats = raw
            .best_price_remaining_seats_label
            .as_deref()
            .and_then(leading_integer)
            .unwrap_or(MORE_THAN_THRESHOLD);
        BTreeMap::from([(SeatSpace::Seats, seats)])
    };

    Ok(Proposal {
        duration_minutes,
        departure,
        arrival,
        origin,
        destination,
        metadata: ProposalMetadata {
            transporter,
            vehicle_number,
            remaining_seats,
            min_price,
        },
    })
}

/// Parse a duration label, e.g. "1h32" or "58 min".
fn parse_duration_label(label: &str) -> Result<i64, ParseError> {
    let bad = || ParseError::BadLabel {
        field: "durationLabel",
        value: label.to_string(),
    };

    if let Some((hours, minutes)) = label.split_once('h') {
        let hours: i64 = hours.trim().parse().map_err(|_| bad())?;
        let minutes: i64 = match minutes.trim() {
            "" => 0,
            rest => rest.parse().map_err(|_| bad())?,
        };
        Ok(hours * 60 + minutes)
    } else {
        let minutes = label.split(" min").next().ok_or_else(bad)?;
        minutes.trim().parse().map_err(|_| bad())
    }
}

/// Parse a price label, e.g. "0 €" or "45,50 €" (comma decimals).
fn parse_price_label(label: &str) -> Result<f64, ParseError> {
    label
        .split(" €")
        .next()
        .unwrap_or(label)
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| ParseError::BadLabel {
            field: "bestPriceLabel",
            value: label.to_string(),
        })
}

/// Extract the departure timestamp from the travel-id prefix
/// (`YYYY-MM-DDTHH:MM_...`).
fn departure_timestamp(travel_id: &str) -> Result<NaiveDateTime, ParseError> {
    let prefix = travel_id.split('_').next().unwrap_or(travel_id);
    NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M").map_err(|_| ParseError::BadLabel {
        field: "travelId",
        value: travel_id.to_string(),
    })
}

/// Build the arrival timestamp from the departure date and an "HH:MM"
/// label, rolling over midnight for overnight rides.
fn arrival_timestamp(
    departure: NaiveDateTime,
    time_label: &str,
) -> Result<NaiveDateTime, ParseError> {
    let time = chrono::NaiveTime::parse_from_str(time_label, "%H:%M").map_err(|_| {
        ParseError::BadLabel {
            field: "arrival.timeLabel",
            value: time_label.to_string(),
        }
    })?;

    let mut arrival = departure.date().and_time(time);
    if arrival < departure {
        arrival += Duration::days(1);
    }
    Ok(arrival)
}

/// Shorten an operator description for display.
fn shorten_operator(description: &str) -> &str {
    match description {
        NIGHT_TRAIN_OPERATOR => NIGHT_TRAIN_TRANSPORTER,
        other => other,
    }
}

/// Extract remaining places per physical space from night-train offers.
///
/// Only zero-priced offers count. An offer message of the form
/// "Plus que N ..." carries the exact remaining count; without one the
/// count defaults to the more-than-threshold sentinel.
fn night_train_spaces(offers: &[RawOffer]) -> BTreeMap<SeatSpace, u32> {
    let mut remaining = BTreeMap::new();

    for offer in offers {
        let free = offer
            .price_label
            .as_deref()
            .and_then(|label| parse_price_label(label).ok())
            .is_some_and(|price| price == 0.0);
        if !free {
            continue;
        }

        let space = offer
            .comfort_class
            .as_ref()
            .and_then(|class| class.physical_space_label.as_deref())
            .map(seat_space_from_label)
            .unwrap_or(SeatSpace::Seats);

        let count = offer
            .messages
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|m| m.message.contains("Plus que"))
            .and_then(|m| first_integer(&m.message))
            .unwrap_or(MORE_THAN_THRESHOLD);

        remaining.insert(space, count);
    }

    // A sold-out night train has no zero-priced offer at all.
    if remaining.is_empty() {
        remaining.insert(SeatSpace::Seats, 0);
    }
    remaining
}

/// Map a physical-space label to a [`SeatSpace`].
fn seat_space_from_label(label: &str) -> SeatSpace {
    let lower = label.to_lowercase();
    if lower.contains("couchette") || lower.contains("berth") {
        SeatSpace::Berths
    } else {
        SeatSpace::Seats
    }
}

/// Leading integer of a label, e.g. "9 places à ce prix" -> 9.
fn leading_integer(label: &str) -> Option<u32> {
    label.split_whitespace().next()?.parse().ok()
}

/// First whitespace-delimited integer anywhere in a message.
fn first_integer(message: &str) -> Option<u32> {
    message
        .split_whitespace()
        .find_map(|word| word.parse().ok())
}
