//! Day search orchestration: pagination, pacing, leg pairing, and the
//! two-leg connection walk.

mod combine;
mod compose;
mod fetch;
mod options;
mod pacing;

pub use combine::{JointProposal, combine};
pub use compose::{ConnectionComposer, SplitLeg, SplitSearch, ViaOutcome, ViaResolver};
pub use fetch::{DayFetcher, DayProposals, JourneySearch, SearchError};
pub use options::SearchOptions;
pub use pacing::Pacing;
