//! Reads exercise and path records from a data directory.
//!
//! One record per file under `exercises/` and `paths/`, in JSON, YAML or TOML.

pub mod loader;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{load_exercises, load_paths, RecordFormat};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unsupported record format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid record pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("failed to read record directory entry: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("{kind} '{slug}' listed in config but no record file found in {dir}")]
    MissingRecord {
        kind: &'static str,
        slug: String,
        dir: PathBuf,
    },
    #[error("duplicate {kind} slug '{slug}'")]
    DuplicateSlug { kind: &'static str, slug: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
