use serde::{Deserialize, Serialize};

/// A named learning path grouping exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
}

impl LearningPath {
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: description.into(),
            color: color.into(),
        }
    }

    /// Synthetic path used when neither the exercise's path nor any loaded path resolves.
    pub fn fundamentals() -> Self {
        Self::new("fundamentals", "Fundamentals", "Basic skills", "#0969da")
    }
}
