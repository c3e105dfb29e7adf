use serde::Serialize;

use crate::core::exercise::{Exercise, Position};
use crate::core::path::LearningPath;

/// One exercise joined with its path, layout coordinate and edges in both directions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillTreeNode {
    pub exercise: Exercise,
    pub path: LearningPath,
    pub position: Position,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

impl SkillTreeNode {
    pub fn slug(&self) -> &str {
        &self.exercise.slug
    }
}
