//! Shared types for CityPulse

mod error;

pub use error::{PulseError, Result};
