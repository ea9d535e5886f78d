//! Domain types for the split-journey search.
//!
//! This module contains the core domain model types that represent
//! validated booking data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod proposal;
mod station;

pub use proposal::{
    MORE_THAN_THRESHOLD, NIGHT_TRAIN_TRANSPORTER, PRICE_UNAVAILABLE, Proposal, ProposalMetadata,
    SeatSpace, remove_duplicates,
};
pub use station::{InvalidStationCode, Station, StationCode};
