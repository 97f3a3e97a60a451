//! Database schemas for CityPulse
//!
//! Defines MongoDB document structures for the search history.

mod metadata;
mod search_record;

pub use metadata::Metadata;
pub use search_record::{SearchRecordDoc, HISTORY_COLLECTION};
