use serde::Serialize;

use crate::core::exercise::Exercise;
use crate::core::node::SkillTreeNode;
use crate::core::path::LearningPath;
use crate::filter::FilterState;

/// Weight of a node that matches none of the active filters.
pub const BASE_VISIBILITY: f64 = 0.25;

/// Visibility weight in `[BASE_VISIBILITY, 1]`, rising linearly with the share of
/// active filter categories the exercise matches. A missing attribute never matches.
pub fn score(exercise: &Exercise, path: &LearningPath, filter: &FilterState) -> f64 {
    let mut checks: Vec<bool> = Vec::with_capacity(4);

    if !filter.paths.is_empty() {
        checks.push(filter.paths.contains(&path.name));
    }
    if !filter.products.is_empty() {
        checks.push(
            exercise
                .products
                .as_ref()
                .map(|products| products.iter().any(|p| filter.products.contains(p)))
                .unwrap_or(false),
        );
    }
    if !filter.difficulties.is_empty() {
        checks.push(
            exercise
                .difficulty
                .as_ref()
                .map(|difficulty| filter.difficulties.contains(difficulty))
                .unwrap_or(false),
        );
    }
    if !filter.statuses.is_empty() {
        checks.push(filter.statuses.contains(&exercise.status));
    }

    if checks.is_empty() {
        return 1.0;
    }

    let matching = checks.iter().filter(|matched| **matched).count();
    BASE_VISIBILITY + (1.0 - BASE_VISIBILITY) * (matching as f64 / checks.len() as f64)
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibleNode<'a> {
    #[serde(flatten)]
    pub node: &'a SkillTreeNode,
    pub visibility: f64,
}

pub fn apply_visibility<'a>(
    nodes: &'a [SkillTreeNode],
    filter: &FilterState,
) -> Vec<VisibleNode<'a>> {
    nodes
        .iter()
        .map(|node| VisibleNode {
            node,
            visibility: score(&node.exercise, &node.path, filter),
        })
        .collect()
}
