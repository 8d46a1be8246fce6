//! Domain types and configuration for the tontti site-analysis service.

mod app_config;
mod config;
mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{BoundingBox, Coordinate, FloodRisk, LookupOutcome, SiteReport, BBOX_DELTA};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
