use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::exercise::Exercise;
use crate::core::path::LearningPath;
use crate::store::{Result, StoreError};
use crate::util::parallel::run_in_parallel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Yaml,
    Toml,
}

impl RecordFormat {
    pub const EXTENSIONS: [&'static str; 4] = ["json", "yaml", "yml", "toml"];

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(RecordFormat::Json),
            "yaml" | "yml" => Some(RecordFormat::Yaml),
            "toml" => Some(RecordFormat::Toml),
            _ => None,
        }
    }
}

/// Loads exercises from `dir`, in `slugs` order when given, else in file-name order.
pub fn load_exercises(
    dir: &Path,
    slugs: Option<&[String]>,
    jobs: Option<usize>,
) -> Result<Vec<Exercise>> {
    load_records(dir, slugs, jobs, "exercise", |exercise: &Exercise| {
        exercise.slug.as_str()
    })
}

pub fn load_paths(
    dir: &Path,
    slugs: Option<&[String]>,
    jobs: Option<usize>,
) -> Result<Vec<LearningPath>> {
    load_records(dir, slugs, jobs, "path", |path: &LearningPath| path.slug.as_str())
}

fn load_records<T, F>(
    dir: &Path,
    slugs: Option<&[String]>,
    jobs: Option<usize>,
    kind: &'static str,
    slug_of: F,
) -> Result<Vec<T>>
where
    T: DeserializeOwned + Send,
    F: Fn(&T) -> &str,
{
    let files = match slugs {
        Some(slugs) => listed_files(dir, slugs, kind)?,
        None => discover_files(dir)?,
    };
    debug!(kind, dir = %dir.display(), files = files.len(), "loading records");

    let records = run_in_parallel(files, jobs, |file| parse_record::<T>(&file))
        .into_iter()
        .collect::<Result<Vec<T>>>()?;

    let mut seen = HashSet::new();
    for record in &records {
        let slug = slug_of(record);
        if !seen.insert(slug) {
            return Err(StoreError::DuplicateSlug {
                kind,
                slug: slug.to_string(),
            });
        }
    }

    Ok(records)
}

fn listed_files(dir: &Path, slugs: &[String], kind: &'static str) -> Result<Vec<PathBuf>> {
    slugs
        .iter()
        .map(|slug| {
            RecordFormat::EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{slug}.{ext}")))
                .find(|candidate| candidate.is_file())
                .ok_or_else(|| StoreError::MissingRecord {
                    kind,
                    slug: slug.clone(),
                    dir: dir.to_path_buf(),
                })
        })
        .collect()
}

fn discover_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "record directory missing, loading nothing");
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/*",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() && RecordFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn parse_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = RecordFormat::from_path(path)
        .ok_or_else(|| StoreError::UnsupportedFormat(path.to_path_buf()))?;
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        RecordFormat::Json => serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        }),
        RecordFormat::Yaml => serde_yaml::from_str(&content).map_err(|source| StoreError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        RecordFormat::Toml => toml::from_str(&content).map_err(|source| StoreError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}
