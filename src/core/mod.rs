pub mod exercise;
pub mod node;
pub mod path;
pub mod roadmap;

pub use exercise::{Exercise, ExerciseStatus, Position};
pub use node::SkillTreeNode;
pub use path::LearningPath;
pub use roadmap::Roadmap;
