//! Station resolution against the external directories.

mod client;
mod error;
mod names;
mod resolver;

pub use client::{
    AutocompleteClient, AutocompleteConfig, LocationsClient, LocationsConfig,
};
pub use error::StationError;
pub use names::{Normalized, normalize};
pub use resolver::StationResolver;
