use std::collections::HashMap;

use tracing::{debug, warn};

use crate::core::exercise::{Exercise, Position};
use crate::core::node::SkillTreeNode;
use crate::core::path::LearningPath;
use crate::graph::GraphSettings;

/// Builds unpositioned nodes in input order with `dependents` filled in.
pub fn build_nodes(
    exercises: &[Exercise],
    paths: &[LearningPath],
    settings: &GraphSettings,
) -> Vec<SkillTreeNode> {
    let path_map: HashMap<&str, &LearningPath> =
        paths.iter().map(|path| (path.slug.as_str(), path)).collect();

    let mut nodes: Vec<SkillTreeNode> = exercises
        .iter()
        .map(|exercise| SkillTreeNode {
            exercise: exercise.clone(),
            path: resolve_path(exercise, &path_map, paths, settings),
            position: Position::ORIGIN,
            dependencies: exercise.dependencies.clone().unwrap_or_default(),
            dependents: Vec::new(),
        })
        .collect();

    link_dependents(&mut nodes);
    debug!(nodes = nodes.len(), paths = paths.len(), "built skill tree nodes");
    nodes
}

fn resolve_path(
    exercise: &Exercise,
    path_map: &HashMap<&str, &LearningPath>,
    paths: &[LearningPath],
    settings: &GraphSettings,
) -> LearningPath {
    let slug = exercise
        .path_slug
        .as_deref()
        .unwrap_or(settings.default_path_slug.as_str());
    if let Some(path) = path_map.get(slug) {
        return (*path).clone();
    }

    match paths.first() {
        Some(first) => {
            warn!(
                exercise = %exercise.slug,
                path = slug,
                fallback = %first.slug,
                "unknown path, using first path"
            );
            first.clone()
        }
        None => {
            warn!(
                exercise = %exercise.slug,
                path = slug,
                "no paths loaded, using fallback path"
            );
            settings.fallback_path.clone()
        }
    }
}

fn link_dependents(nodes: &mut [SkillTreeNode]) {
    let mut index: HashMap<String, usize> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        index.entry(node.exercise.slug.clone()).or_insert(idx);
    }

    let mut edges = Vec::new();
    for node in nodes.iter() {
        for dep in &node.dependencies {
            match index.get(dep) {
                Some(&target) => edges.push((target, node.exercise.slug.clone())),
                None => warn!(
                    exercise = %node.exercise.slug,
                    dependency = %dep,
                    "skipping dangling dependency"
                ),
            }
        }
    }

    for (target, dependent) in edges {
        nodes[target].dependents.push(dependent);
    }
}
