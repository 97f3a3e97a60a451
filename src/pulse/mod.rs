//! Pulse lookup flow: query types, fan-out coordination, and orchestration

pub mod areas;
pub mod coordinator;
pub mod service;
pub mod types;

pub use areas::{known_areas, KnownArea};
pub use coordinator::FanOutCoordinator;
pub use service::{PulseOutcome, PulseService};
pub use types::{AreaQuery, ArticleResult, LookupBuckets, WeatherReading};
