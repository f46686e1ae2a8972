use std::path::PathBuf;

use crate::geo::Coordinate;
use crate::results::PaginationPolicy;
use crate::session::SessionSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub initial_cursor: u32,
    pub page_size: u32,
    pub default_radius_miles: f64,
    pub region_name: String,
    pub region_center: Coordinate,
    pub manual_search_threshold_miles: f64,
}

impl AppConfig {
    #[must_use]
    pub fn pagination(&self) -> PaginationPolicy {
        PaginationPolicy {
            initial_cursor: self.initial_cursor,
            page_size: self.page_size,
        }
    }

    /// Session tunables derived from this configuration.
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            pagination: self.pagination(),
            default_radius_miles: self.default_radius_miles,
            region_name: self.region_name.clone(),
            region_center: self.region_center,
            manual_search_threshold_miles: self.manual_search_threshold_miles,
        }
    }
}
