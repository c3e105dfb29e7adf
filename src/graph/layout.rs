use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::core::exercise::Position;
use crate::core::node::SkillTreeNode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    /// Distance between a node and the dependency it is anchored to.
    pub horizontal_spacing: f64,
    /// Distance between siblings that share an anchor.
    pub vertical_spacing: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            horizontal_spacing: 150.0,
            vertical_spacing: 100.0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Pending,
    Visiting,
    Placed,
}

struct Frame {
    node: usize,
    cursor: usize,
}

/// Assigns every node a coordinate, placing each node exactly once.
///
/// Explicit coordinates win, dependency-free nodes sit at the origin, and
/// everything else is placed one column right of its anchor dependency and
/// fanned out by its rank in the anchor's `dependents`. Dependencies are
/// resolved depth-first with an explicit stack; a node reached again while
/// still being visited (a cycle) is read with whatever position it holds.
pub fn assign_positions(nodes: &mut [SkillTreeNode], settings: &LayoutSettings) {
    let mut index: HashMap<String, usize> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        index.entry(node.exercise.slug.clone()).or_insert(idx);
    }

    let mut state = vec![VisitState::Pending; nodes.len()];
    for start in 0..nodes.len() {
        if state[start] != VisitState::Pending {
            continue;
        }
        if place_directly(nodes, start) {
            state[start] = VisitState::Placed;
            continue;
        }

        state[start] = VisitState::Visiting;
        let mut stack = vec![Frame {
            node: start,
            cursor: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let current = frame.node;
            if let Some(dep) = nodes[current].dependencies.get(frame.cursor) {
                frame.cursor += 1;
                let Some(&dep_idx) = index.get(dep) else {
                    continue;
                };
                match state[dep_idx] {
                    VisitState::Placed => {}
                    VisitState::Visiting => {
                        warn!(
                            exercise = %nodes[current].exercise.slug,
                            dependency = %nodes[dep_idx].exercise.slug,
                            "dependency cycle, using partial position"
                        );
                    }
                    VisitState::Pending => {
                        if place_directly(nodes, dep_idx) {
                            state[dep_idx] = VisitState::Placed;
                        } else {
                            state[dep_idx] = VisitState::Visiting;
                            stack.push(Frame {
                                node: dep_idx,
                                cursor: 0,
                            });
                        }
                    }
                }
                continue;
            }

            stack.pop();
            let position = anchored_position(nodes, current, &index, settings);
            trace!(
                exercise = %nodes[current].exercise.slug,
                x = position.x,
                y = position.y,
                "placed relative to anchor"
            );
            nodes[current].position = position;
            state[current] = VisitState::Placed;
        }
    }

    debug!(nodes = nodes.len(), "assigned positions");
}

/// Rules that need no dependency information: explicit coordinates, then roots at the origin.
fn place_directly(nodes: &mut [SkillTreeNode], idx: usize) -> bool {
    let node = &mut nodes[idx];
    if let Some(position) = node.exercise.position {
        node.position = position;
        return true;
    }
    if node.dependencies.is_empty() {
        node.position = Position::ORIGIN;
        return true;
    }
    false
}

fn anchored_position(
    nodes: &[SkillTreeNode],
    idx: usize,
    index: &HashMap<String, usize>,
    settings: &LayoutSettings,
) -> Position {
    let node = &nodes[idx];
    let anchor = select_anchor(nodes, node, index);

    let (origin, rank) = match anchor {
        Some(anchor) => {
            let rank = anchor
                .dependents
                .iter()
                .position(|slug| slug == &node.exercise.slug)
                .unwrap_or(0);
            (anchor.position, rank)
        }
        None => (Position::ORIGIN, 0),
    };

    Position {
        x: origin.x + settings.horizontal_spacing,
        y: origin.y + rank as f64 * settings.vertical_spacing,
    }
}

/// The resolvable dependency with the largest `x + y`; the earliest one wins ties.
fn select_anchor<'a>(
    nodes: &'a [SkillTreeNode],
    node: &SkillTreeNode,
    index: &HashMap<String, usize>,
) -> Option<&'a SkillTreeNode> {
    let mut anchor: Option<&SkillTreeNode> = None;
    for dep in &node.dependencies {
        let Some(&dep_idx) = index.get(dep) else {
            continue;
        };
        let candidate = &nodes[dep_idx];
        let better = match anchor {
            Some(current) => candidate.position.diagonal() > current.position.diagonal(),
            None => true,
        };
        if better {
            anchor = Some(candidate);
        }
    }
    anchor
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

pub const CANVAS_PADDING: f64 = 100.0;
pub const MIN_CANVAS_WIDTH: f64 = 1400.0;
pub const MIN_CANVAS_HEIGHT: f64 = 1200.0;

/// Drawing area large enough to hold every node, never smaller than the minimum canvas.
pub fn canvas_bounds(nodes: &[SkillTreeNode]) -> CanvasBounds {
    let max_x = nodes
        .iter()
        .map(|node| node.position.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_y = nodes
        .iter()
        .map(|node| node.position.y)
        .fold(f64::NEG_INFINITY, f64::max);

    CanvasBounds {
        width: (max_x + CANVAS_PADDING).max(MIN_CANVAS_WIDTH),
        height: (max_y + CANVAS_PADDING).max(MIN_CANVAS_HEIGHT),
    }
}
