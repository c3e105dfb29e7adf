use serde::Deserialize;

use crate::core::path::LearningPath;
use crate::graph::layout::LayoutSettings;
use crate::graph::GraphSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_path_slug")]
    pub default_path: String,
    #[serde(default)]
    pub exercises: Option<Vec<String>>,
    #[serde(default)]
    pub paths: Option<Vec<String>>,
}

impl Default for RoadmapSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_dir: default_data_dir(),
            default_path: default_path_slug(),
            exercises: None,
            paths: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoadmapConfig {
    #[serde(default)]
    pub roadmap: RoadmapSettings,
    #[serde(default)]
    pub layout: Option<LayoutConfig>,
    #[serde(default)]
    pub fallback_path: Option<FallbackPathConfig>,
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub horizontal_spacing: Option<f64>,
    #[serde(default)]
    pub vertical_spacing: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FallbackPathConfig {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub parallel: Option<usize>,
}

impl RoadmapConfig {
    pub fn graph_settings(&self) -> GraphSettings {
        let defaults = LayoutSettings::default();
        let layout = self.layout.as_ref();
        let layout = LayoutSettings {
            horizontal_spacing: layout
                .and_then(|cfg| cfg.horizontal_spacing)
                .unwrap_or(defaults.horizontal_spacing),
            vertical_spacing: layout
                .and_then(|cfg| cfg.vertical_spacing)
                .unwrap_or(defaults.vertical_spacing),
        };

        let base = LearningPath::fundamentals();
        let fallback_path = match self.fallback_path.as_ref() {
            Some(cfg) => LearningPath {
                slug: cfg.slug.clone().unwrap_or(base.slug),
                name: cfg.name.clone().unwrap_or(base.name),
                description: cfg.description.clone().unwrap_or(base.description),
                color: cfg.color.clone().unwrap_or(base.color),
            },
            None => base,
        };

        GraphSettings {
            default_path_slug: self.roadmap.default_path.clone(),
            fallback_path,
            layout,
        }
    }

    pub fn parallel(&self) -> Option<usize> {
        self.store.as_ref().and_then(|store| store.parallel)
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_path_slug() -> String {
    "fundamentals".to_string()
}

#[cfg(test)]
mod tests {
    use crate::config::RoadmapConfig;

    #[test]
    fn empty_config_uses_defaults() {
        let config: RoadmapConfig = toml::from_str("").expect("parse empty config");
        assert_eq!(config.roadmap.data_dir, "data");
        assert_eq!(config.roadmap.default_path, "fundamentals");

        let settings = config.graph_settings();
        assert_eq!(settings.default_path_slug, "fundamentals");
        assert_eq!(settings.fallback_path.color, "#0969da");
        assert_eq!(settings.layout.horizontal_spacing, 150.0);
        assert_eq!(settings.layout.vertical_spacing, 100.0);
    }

    #[test]
    fn layout_and_fallback_sections_override_defaults() {
        let config: RoadmapConfig = toml::from_str(
            r##"[roadmap]
name = "Skills"
default_path = "collaboration"
exercises = ["intro", "markdown"]

[layout]
horizontal_spacing = 200.0

[fallback_path]
name = "Misc"
color = "#ff0000"

[store]
parallel = 4
"##,
        )
        .expect("parse config");

        let settings = config.graph_settings();
        assert_eq!(settings.default_path_slug, "collaboration");
        assert_eq!(settings.layout.horizontal_spacing, 200.0);
        assert_eq!(settings.layout.vertical_spacing, 100.0);
        assert_eq!(settings.fallback_path.slug, "fundamentals");
        assert_eq!(settings.fallback_path.name, "Misc");
        assert_eq!(settings.fallback_path.color, "#ff0000");
        assert_eq!(config.parallel(), Some(4));
        assert_eq!(
            config.roadmap.exercises,
            Some(vec!["intro".to_string(), "markdown".to_string()])
        );
    }
}
