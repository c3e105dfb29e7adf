use std::env;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::resolve::{load_roadmap_config, resolve_roadmap};
use crate::config::RoadmapConfig;
use crate::core::exercise::Exercise;
use crate::core::node::SkillTreeNode;
use crate::core::path::LearningPath;
use crate::error::Result;
use crate::graph::{build_skill_tree, GraphSettings};
use crate::store::{load_exercises, load_paths};

/// A loaded roadmap: configuration, the raw records and the positioned graph built from them.
#[derive(Debug)]
pub struct Roadmap {
    pub root: PathBuf,
    pub config: RoadmapConfig,
    pub settings: GraphSettings,
    pub exercises: Vec<Exercise>,
    pub paths: Vec<LearningPath>,
    pub nodes: Vec<SkillTreeNode>,
}

impl Roadmap {
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        let resolved = resolve_roadmap(start)?;
        Self::load_from(resolved.root, resolved.config_path)
    }

    pub fn load_from(root: PathBuf, config_path: PathBuf) -> Result<Self> {
        let mut config = load_roadmap_config(&config_path)?;
        apply_env_overrides(&mut config);

        let data_dir = root.join(&config.roadmap.data_dir);
        let jobs = config.parallel();
        let paths = load_paths(
            &data_dir.join("paths"),
            config.roadmap.paths.as_deref(),
            jobs,
        )?;
        let exercises = load_exercises(
            &data_dir.join("exercises"),
            config.roadmap.exercises.as_deref(),
            jobs,
        )?;

        Ok(Self::from_records(root, config, exercises, paths))
    }

    pub fn from_records(
        root: PathBuf,
        config: RoadmapConfig,
        exercises: Vec<Exercise>,
        paths: Vec<LearningPath>,
    ) -> Self {
        let settings = config.graph_settings();
        let nodes = build_skill_tree(&exercises, &paths, &settings);
        info!(
            exercises = exercises.len(),
            paths = paths.len(),
            "roadmap loaded"
        );

        Self {
            root,
            config,
            settings,
            exercises,
            paths,
            nodes,
        }
    }

    /// Rebuilds the graph after the record collections changed.
    pub fn rebuild(&mut self) {
        self.nodes = build_skill_tree(&self.exercises, &self.paths, &self.settings);
    }

    pub fn name(&self) -> String {
        if !self.config.roadmap.name.is_empty() {
            return self.config.roadmap.name.clone();
        }
        self.root
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("roadmap")
            .to_string()
    }
}

fn apply_env_overrides(config: &mut RoadmapConfig) {
    if let Ok(data_dir) = env::var("SKILLTREE_DATA_DIR") {
        config.roadmap.data_dir = data_dir;
    }
}
