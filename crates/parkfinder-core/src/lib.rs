pub mod app_config;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod facets;
pub mod geo;
pub mod results;
pub mod selection;
pub mod session;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, parse_catalog, CatalogFile, CategoryConfig, ParkConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use directory::{normalize_name, Location, LocationDirectory, RankedLocation};
pub use facets::{CategoryFacet, CheckState, FacetCatalog, FacetGroup};
pub use geo::{haversine_miles, Bounds, Coordinate, EARTH_RADIUS_MILES};
pub use results::{
    ActivityPark, ActivityRecord, AggregatorError, AppendOutcome, FetchState, Occurrence,
    PaginationPolicy, ResultsAggregator, ResultsPage,
};
pub use selection::{SearchQuery, SelectionState, SelectionSummary, SubmissionError};
pub use session::{
    ChecklistEntry, Intent, LoadMoreState, PageSession, Presenter, SessionSettings, UiEvent,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
