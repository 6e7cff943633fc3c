pub mod media;
pub mod request;
pub mod season;
pub mod sensor;

pub use media::{MediaSearchResult, MediaType, SearchResults};
pub use request::{IssueCounts, RequestCounts, RequestUpdate};
pub use season::{SeasonMode, UnknownSeasonMode};
pub use sensor::{SensorKind, SensorState};
