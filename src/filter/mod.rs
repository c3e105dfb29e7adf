use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::exercise::ExerciseStatus;
use crate::core::node::SkillTreeNode;

pub mod visibility;

/// Active filter selection. An empty set means the category is not filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub paths: BTreeSet<String>,
    #[serde(default)]
    pub products: BTreeSet<String>,
    #[serde(default)]
    pub difficulties: BTreeSet<String>,
    #[serde(default)]
    pub statuses: BTreeSet<ExerciseStatus>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.active_categories() == 0
    }

    pub fn active_categories(&self) -> usize {
        [
            self.paths.is_empty(),
            self.products.is_empty(),
            self.difficulties.is_empty(),
            self.statuses.is_empty(),
        ]
        .iter()
        .filter(|empty| !**empty)
        .count()
    }
}

/// Values present in a roadmap, one list per filter category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub paths: BTreeSet<String>,
    pub products: BTreeSet<String>,
    pub difficulties: BTreeSet<String>,
    pub statuses: BTreeSet<ExerciseStatus>,
}

impl FilterOptions {
    pub fn collect(nodes: &[SkillTreeNode]) -> Self {
        let mut options = Self::default();
        for node in nodes {
            options.paths.insert(node.path.name.clone());
            if let Some(products) = node.exercise.products.as_ref() {
                options.products.extend(products.iter().cloned());
            }
            if let Some(difficulty) = node.exercise.difficulty.as_ref() {
                options.difficulties.insert(difficulty.clone());
            }
            options.statuses.insert(node.exercise.status);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use crate::core::exercise::{Exercise, ExerciseStatus};
    use crate::core::path::LearningPath;
    use crate::filter::{FilterOptions, FilterState};
    use crate::graph::{build_skill_tree, GraphSettings};

    #[test]
    fn counts_only_non_empty_categories() {
        let mut filter = FilterState::new();
        assert!(filter.is_empty());

        filter.products.insert("actions".to_string());
        filter.statuses.insert(ExerciseStatus::Active);
        assert_eq!(filter.active_categories(), 2);
        assert!(!filter.is_empty());
    }

    #[test]
    fn deserializes_partial_selection() {
        let filter: FilterState =
            serde_json::from_str(r#"{ "statuses": ["active"] }"#).expect("parse filter");
        assert!(filter.paths.is_empty());
        assert!(filter.statuses.contains(&ExerciseStatus::Active));
    }

    #[test]
    fn collects_distinct_values_from_nodes() {
        let nodes = build_skill_tree(
            &[
                Exercise::new("a", "A", ExerciseStatus::Active)
                    .with_products(["actions", "pages"])
                    .with_difficulty("beginner"),
                Exercise::new("b", "B", ExerciseStatus::Tentative)
                    .with_path("automation")
                    .with_products(["actions"]),
            ],
            &[
                LearningPath::fundamentals(),
                LearningPath::new("automation", "Automation", "", "#8250df"),
            ],
            &GraphSettings::default(),
        );

        let options = FilterOptions::collect(&nodes);
        assert_eq!(
            options.paths.into_iter().collect::<Vec<_>>(),
            vec!["Automation", "Fundamentals"]
        );
        assert_eq!(
            options.products.into_iter().collect::<Vec<_>>(),
            vec!["actions", "pages"]
        );
        assert_eq!(options.difficulties.len(), 1);
        assert_eq!(
            options.statuses.into_iter().collect::<Vec<_>>(),
            vec![ExerciseStatus::Active, ExerciseStatus::Tentative]
        );
    }
}
