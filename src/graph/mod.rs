use crate::core::exercise::Exercise;
use crate::core::node::SkillTreeNode;
use crate::core::path::LearningPath;

pub mod builder;
pub mod check;
pub mod layout;
pub mod ops;
pub mod viz;

use layout::LayoutSettings;

/// Reference data the builder falls back on, passed in rather than read from globals.
#[derive(Debug, Clone)]
pub struct GraphSettings {
    pub default_path_slug: String,
    pub fallback_path: LearningPath,
    pub layout: LayoutSettings,
}

impl Default for GraphSettings {
    fn default() -> Self {
        let fallback_path = LearningPath::fundamentals();
        Self {
            default_path_slug: fallback_path.slug.clone(),
            fallback_path,
            layout: LayoutSettings::default(),
        }
    }
}

/// Joins exercises to paths, derives reverse edges and assigns every node a coordinate.
pub fn build_skill_tree(
    exercises: &[Exercise],
    paths: &[LearningPath],
    settings: &GraphSettings,
) -> Vec<SkillTreeNode> {
    let mut nodes = builder::build_nodes(exercises, paths, settings);
    layout::assign_positions(&mut nodes, &settings.layout);
    nodes
}
