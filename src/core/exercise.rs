use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStatus {
    Active,
    Scheduled,
    Tentative,
}

impl ExerciseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseStatus::Active => "active",
            ExerciseStatus::Scheduled => "scheduled",
            ExerciseStatus::Tentative => "tentative",
        }
    }
}

impl fmt::Display for ExerciseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "active" => Ok(ExerciseStatus::Active),
            "scheduled" => Ok(ExerciseStatus::Scheduled),
            "tentative" => Ok(ExerciseStatus::Tentative),
            other => Err(format!("unknown exercise status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Ordering key used to pick the anchor dependency.
    pub fn diagonal(&self) -> f64 {
        self.x + self.y
    }
}

/// A single learning exercise as supplied by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub slug: String,
    pub name: String,
    pub status: ExerciseStatus,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_url: Option<String>,
}

impl Exercise {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, status: ExerciseStatus) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            status,
            icon: String::new(),
            description: String::new(),
            path_slug: None,
            dependencies: None,
            position: None,
            products: None,
            difficulty: None,
            repository_url: None,
            issue_url: None,
        }
    }

    pub fn with_path(mut self, path_slug: impl Into<String>) -> Self {
        self.path_slug = Some(path_slug.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = Some(dependencies.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = Some(products.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Exercise, ExerciseStatus, Position};

    #[test]
    fn deserializes_camel_case_record_with_optional_fields_absent() {
        let exercise: Exercise = serde_json::from_str(
            r#"{
                "slug": "introduction-to-github",
                "name": "Introduction to GitHub",
                "status": "active",
                "icon": "mark-github",
                "description": "Get started using GitHub",
                "repositoryUrl": "https://github.com/skills/introduction-to-github"
            }"#,
        )
        .expect("parse exercise");

        assert_eq!(exercise.status, ExerciseStatus::Active);
        assert!(exercise.path_slug.is_none());
        assert!(exercise.dependencies.is_none());
        assert_eq!(
            exercise.repository_url.as_deref(),
            Some("https://github.com/skills/introduction-to-github")
        );
    }

    #[test]
    fn deserializes_path_dependencies_and_position() {
        let exercise: Exercise = serde_json::from_str(
            r#"{
                "slug": "github-pages",
                "name": "GitHub Pages",
                "status": "scheduled",
                "pathSlug": "fundamentals",
                "dependencies": ["introduction-to-github"],
                "position": { "x": 300, "y": 50 },
                "products": ["pages"],
                "difficulty": "beginner"
            }"#,
        )
        .expect("parse exercise");

        assert_eq!(exercise.path_slug.as_deref(), Some("fundamentals"));
        assert_eq!(
            exercise.dependencies,
            Some(vec!["introduction-to-github".to_string()])
        );
        assert_eq!(exercise.position, Some(Position::new(300.0, 50.0)));
        assert_eq!(exercise.difficulty.as_deref(), Some("beginner"));
    }

    #[test]
    fn rejects_unknown_status() {
        let result = serde_json::from_str::<Exercise>(
            r#"{ "slug": "x", "name": "X", "status": "retired" }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Tentative".parse::<ExerciseStatus>(),
            Ok(ExerciseStatus::Tentative)
        );
        assert!("done".parse::<ExerciseStatus>().is_err());
    }
}
