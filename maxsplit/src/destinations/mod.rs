//! Direct-destination graph: client and intersection.

mod client;
mod error;
mod intersect;

pub use client::{DirectDestinationsClient, DirectDestinationsConfig, RawDestination};
pub use error::DestinationError;
pub use intersect::{DirectDestinationSet, Reachable, common_stations, paris_hub};
