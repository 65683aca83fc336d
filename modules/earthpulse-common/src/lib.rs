//! Domain types, configuration and the shared error type.

pub mod config;
pub mod error;
pub mod satellite;
pub mod types;

pub use config::Config;
pub use error::EarthPulseError;
pub use satellite::*;
pub use types::*;
