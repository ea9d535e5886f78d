//! Booking API response DTOs.
//!
//! These types map directly to the itinerary-search JSON responses.
//! They use `Option` liberally because the API omits fields rather than
//! sending null values in many cases; the conversion layer decides which
//! absences make a record malformed.

use serde::Deserialize;

/// One page of itinerary search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryPage {
    /// Raw ride records on this page. Absent when the day has no results.
    pub travel_proposals: Option<Vec<RawProposal>>,

    /// Pagination marker. Absent when results are exhausted.
    pub next_pagination: Option<Pagination>,
}

impl ItineraryPage {
    /// Whether requesting the next page would stay within the same
    /// calendar day.
    pub fn has_more_same_day(&self) -> bool {
        self.next_pagination
            .as_ref()
            .is_some_and(|p| p.kind != PaginationKind::NextDay)
    }
}

/// Pagination marker attached to a results page.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(rename = "type")]
    pub kind: PaginationKind,
}

/// What the next page request would return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaginationKind {
    /// More results exist on the same calendar day.
    Next,

    /// The next page would cross into a new day.
    NextDay,

    /// Any marker this client does not know about; treated as a day
    /// boundary so pagination always terminates.
    #[serde(other)]
    Other,
}

/// One raw ride record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProposal {
    /// Travel id, prefixed with the departure timestamp
    /// (`YYYY-MM-DDTHH:MM_...`). Also the pagination anchor.
    pub travel_id: Option<String>,

    /// Ride duration label, e.g. "1h32" or "58 min".
    pub duration_label: Option<String>,

    /// Best price label, e.g. "0 €" or "45,50 €".
    pub best_price_label: Option<String>,

    /// Remaining-seats label for the best price, e.g. "9 places à ce prix".
    /// Absent when more than the UI threshold remain.
    pub best_price_remaining_seats_label: Option<String>,

    /// Bookability status. Records without it are not bookable.
    pub status: Option<RawStatus>,

    /// Departure endpoint (station label + time label).
    pub departure: Option<RawEndpoint>,

    /// Arrival endpoint.
    pub arrival: Option<RawEndpoint>,

    /// Second-class offers; the night train publishes berths and seats as
    /// separate entries here.
    pub second_comfort_class_offers: Option<RawOffers>,

    /// Ride timeline; the first segment carries the operator.
    pub timeline: Option<RawTimeline>,
}

/// Bookability status of a record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatus {
    pub is_bookable: bool,
}

/// Departure or arrival of a ride.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEndpoint {
    /// Localized date label (unused; the travel id carries the date).
    pub date_label: Option<String>,

    /// Time label, "HH:MM".
    pub time_label: Option<String>,

    /// Station label on a departure endpoint.
    pub origin_station_label: Option<String>,

    /// Station label on an arrival endpoint.
    pub destination_station_label: Option<String>,
}

/// Wrapper for second-class offers.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOffers {
    pub offers: Vec<RawOffer>,
}

/// One second-class offer entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOffer {
    /// Price label for this offer, e.g. "0 €".
    pub price_label: Option<String>,

    /// Offer messages; a "Plus que N ..." message carries the exact
    /// remaining count.
    pub messages: Option<Vec<RawMessage>>,

    /// Comfort class, including the physical space (seat or berth).
    pub comfort_class: Option<RawComfortClass>,
}

/// Free-text message attached to an offer.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub message: String,
}

/// Comfort class of an offer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComfortClass {
    /// Physical space label, e.g. "Place assise" or "Couchette".
    pub physical_space_label: Option<String>,
}

/// Ride timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimeline {
    pub segments: Vec<RawSegment>,
}

/// One timeline segment (a single train).
#[derive(Debug, Clone, Deserialize)]
pub struct RawSegment {
    pub transporter: Option<RawTransporter>,
}

/// Operating company and train number for a segment.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransporter {
    /// Operator description, e.g. "TGV INOUI" or "INTERCITES DE NUIT".
    pub description: Option<String>,

    /// Train number.
    pub number: Option<String>,
}
