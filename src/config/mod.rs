pub mod resolve;
pub mod roadmap;

pub use roadmap::{
    FallbackPathConfig, LayoutConfig, RoadmapConfig, RoadmapSettings, StoreConfig,
};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("roadmap not found")]
    RoadmapNotFound,
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("invalid roadmap root: {0}")]
    InvalidRoot(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
