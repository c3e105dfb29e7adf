use serde::Serialize;

use crate::core::node::SkillTreeNode;
use crate::graph::ops::{
    find_cycles, missing_dependencies, overlapping_positions, MissingDependency,
};
use crate::graph::GraphSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedPath {
    pub exercise: String,
    pub requested: String,
    pub resolved: String,
}

/// Input anomalies the builder absorbed. None of them stop a build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoadmapReport {
    pub missing: Vec<MissingDependency>,
    pub unresolved_paths: Vec<UnresolvedPath>,
    pub cycles: Vec<Vec<String>>,
    pub overlaps: Vec<Vec<String>>,
}

impl RoadmapReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.unresolved_paths.is_empty()
            && self.cycles.is_empty()
            && self.overlaps.is_empty()
    }
}

pub fn check_roadmap(nodes: &[SkillTreeNode], settings: &GraphSettings) -> RoadmapReport {
    let unresolved_paths = nodes
        .iter()
        .filter_map(|node| {
            let requested = node
                .exercise
                .path_slug
                .as_deref()
                .unwrap_or(settings.default_path_slug.as_str());
            if requested == node.path.slug {
                return None;
            }
            Some(UnresolvedPath {
                exercise: node.slug().to_string(),
                requested: requested.to_string(),
                resolved: node.path.slug.clone(),
            })
        })
        .collect();

    RoadmapReport {
        missing: missing_dependencies(nodes),
        unresolved_paths,
        cycles: find_cycles(nodes),
        overlaps: overlapping_positions(nodes),
    }
}

#[cfg(test)]
mod tests {
    use crate::core::exercise::{Exercise, ExerciseStatus};
    use crate::core::path::LearningPath;
    use crate::graph::check::{check_roadmap, UnresolvedPath};
    use crate::graph::{build_skill_tree, GraphSettings};

    #[test]
    fn clean_roadmap_has_no_findings() {
        let settings = GraphSettings::default();
        let nodes = build_skill_tree(
            &[
                Exercise::new("a", "A", ExerciseStatus::Active),
                Exercise::new("b", "B", ExerciseStatus::Active).with_dependencies(["a"]),
            ],
            &[LearningPath::fundamentals()],
            &settings,
        );
        assert!(check_roadmap(&nodes, &settings).is_clean());
    }

    #[test]
    fn collects_every_kind_of_finding() {
        let settings = GraphSettings::default();
        let nodes = build_skill_tree(
            &[
                Exercise::new("a", "A", ExerciseStatus::Active).with_path("security"),
                Exercise::new("b", "B", ExerciseStatus::Active),
                Exercise::new("c", "C", ExerciseStatus::Active).with_dependencies(["d", "ghost"]),
                Exercise::new("d", "D", ExerciseStatus::Active).with_dependencies(["c"]),
            ],
            &[LearningPath::fundamentals()],
            &settings,
        );

        let report = check_roadmap(&nodes, &settings);
        assert!(!report.is_clean());
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].dependency, "ghost");
        assert_eq!(
            report.unresolved_paths,
            vec![UnresolvedPath {
                exercise: "a".to_string(),
                requested: "security".to_string(),
                resolved: "fundamentals".to_string(),
            }]
        );
        assert_eq!(report.cycles, vec![vec!["c".to_string(), "d".to_string()]]);
        assert_eq!(report.overlaps, vec![vec!["a".to_string(), "b".to_string()]]);
    }
}
