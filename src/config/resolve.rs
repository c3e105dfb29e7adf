use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, RoadmapConfig};

pub const CONFIG_DIR: &str = ".skilltree";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct ResolvedRoadmap {
    pub root: PathBuf,
    pub config_path: PathBuf,
}

pub fn resolve_roadmap(start: impl AsRef<Path>) -> Result<ResolvedRoadmap, ConfigError> {
    resolve_roadmap_with_overrides(start, None, None)
}

pub fn resolve_roadmap_with_overrides(
    start: impl AsRef<Path>,
    root: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<ResolvedRoadmap, ConfigError> {
    if let Some(root) = root {
        return resolve_with_root(root);
    }

    if let Some(config) = config_path {
        return resolve_with_config(config);
    }

    if let Ok(path) = env::var("SKILLTREE_ROOT") {
        return resolve_with_root(PathBuf::from(path));
    }

    if let Ok(path) = env::var("SKILLTREE_CONFIG") {
        return resolve_with_config(PathBuf::from(path));
    }

    find_roadmap_from(start.as_ref())
}

/// Missing config file at an explicit root is not an error: every section has defaults.
pub fn load_roadmap_config(path: &Path) -> Result<RoadmapConfig, ConfigError> {
    if !path.is_file() {
        return Ok(RoadmapConfig::default());
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_with_root(root: PathBuf) -> Result<ResolvedRoadmap, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::InvalidRoot(root));
    }

    let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);
    Ok(ResolvedRoadmap { root, config_path })
}

fn resolve_with_config(config_path: PathBuf) -> Result<ResolvedRoadmap, ConfigError> {
    if !config_path.is_file() {
        return Err(ConfigError::ConfigNotFound(config_path));
    }
    let root = infer_root_from_config(&config_path)
        .ok_or_else(|| ConfigError::InvalidRoot(config_path.clone()))?;

    Ok(ResolvedRoadmap { root, config_path })
}

fn infer_root_from_config(config_path: &Path) -> Option<PathBuf> {
    let parent = config_path.parent()?;
    if parent.file_name()? == CONFIG_DIR {
        return parent.parent().map(|p| p.to_path_buf());
    }

    Some(parent.to_path_buf())
}

fn find_roadmap_from(start: &Path) -> Result<ResolvedRoadmap, ConfigError> {
    for ancestor in start.ancestors() {
        let config_path = ancestor.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.is_file() {
            return Ok(ResolvedRoadmap {
                root: ancestor.to_path_buf(),
                config_path,
            });
        }
    }

    Err(ConfigError::RoadmapNotFound)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::config::resolve::{
        load_roadmap_config, resolve_roadmap_with_overrides, CONFIG_DIR, CONFIG_FILE,
    };
    use crate::config::ConfigError;

    fn unique_temp_dir(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let pid = std::process::id();
        std::env::temp_dir().join(format!("skilltree-{prefix}-{pid}-{nanos}"))
    }

    #[test]
    fn discovers_config_in_ancestor_directory() {
        let root = unique_temp_dir("resolve-ancestor");
        let nested = root.join("data").join("exercises");
        fs::create_dir_all(&nested).expect("create nested dir");
        fs::create_dir_all(root.join(CONFIG_DIR)).expect("create config dir");
        fs::write(
            root.join(CONFIG_DIR).join(CONFIG_FILE),
            "[roadmap]\nname = \"test\"\n",
        )
        .expect("write config");

        let resolved = resolve_roadmap_with_overrides(&nested, None, None).expect("resolve");
        assert_eq!(resolved.root, root);
        assert_eq!(resolved.config_path, root.join(CONFIG_DIR).join(CONFIG_FILE));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn explicit_config_path_infers_root() {
        let root = unique_temp_dir("resolve-config");
        fs::create_dir_all(root.join(CONFIG_DIR)).expect("create config dir");
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);
        fs::write(&config_path, "").expect("write config");

        let resolved =
            resolve_roadmap_with_overrides(std::env::temp_dir(), None, Some(config_path.clone()))
                .expect("resolve");
        assert_eq!(resolved.root, root);
        assert_eq!(resolved.config_path, config_path);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn explicit_root_must_exist() {
        let root = unique_temp_dir("resolve-missing-root");
        let err = resolve_roadmap_with_overrides(std::env::temp_dir(), Some(root), None)
            .expect_err("missing root should fail");
        assert!(matches!(err, ConfigError::InvalidRoot(_)));
    }

    #[test]
    fn missing_config_file_loads_defaults() {
        let root = unique_temp_dir("resolve-defaults");
        let config = load_roadmap_config(&root.join(CONFIG_FILE)).expect("load defaults");
        assert_eq!(config.roadmap.data_dir, "data");
    }

    #[test]
    fn malformed_config_reports_path() {
        let root = unique_temp_dir("resolve-malformed");
        fs::create_dir_all(&root).expect("create root");
        let path = root.join(CONFIG_FILE);
        fs::write(&path, "[roadmap\nname = ").expect("write config");

        let err = load_roadmap_config(&path).expect_err("malformed config");
        match err {
            ConfigError::Toml { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }

        let _ = fs::remove_dir_all(root);
    }
}
