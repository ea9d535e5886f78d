//! Free-travel-card itinerary search.
//!
//! Searches the booking site for itineraries that are free under the
//! discount card, and when a day has no direct itinerary, tries to split
//! the journey into two connecting legs through the stations both
//! endpoints can reach directly.

pub mod connect;
pub mod destinations;
pub mod domain;
pub mod report;
pub mod search;
pub mod stations;
