//! Booking API collaborator.
//!
//! HTTP client, response DTOs, and the conversion/filter layer turning raw
//! itinerary-search records into domain [`Proposal`](crate::domain::Proposal)s.

mod client;
mod convert;
mod error;
mod types;

pub use client::{ConnectClient, ConnectConfig};
pub use convert::{
    FilterOptions, FilterOutcome, ParseError, anchor_timestamp, filter_page, parse_proposal,
};
pub use error::ConnectError;
pub use types::{ItineraryPage, Pagination, PaginationKind, RawProposal};
