use std::collections::{HashMap, HashSet};

use crate::core::node::SkillTreeNode;
use crate::graph::ops::{edges, slug_index};

#[derive(Clone, Copy)]
enum Style {
    Tree,
    Flat,
}

struct Frame {
    node: usize,
    children: Vec<usize>,
    cursor: usize,
    prefix_len: usize,
}

pub fn render_tree(nodes: &[SkillTreeNode]) -> String {
    render(nodes, Style::Tree)
}

pub fn render_flat(nodes: &[SkillTreeNode]) -> String {
    render(nodes, Style::Flat)
}

/// Graphviz output pinned to the computed layout; y is negated since DOT grows upward.
pub fn render_dot(nodes: &[SkillTreeNode]) -> String {
    let mut out = String::from("digraph skilltree {\n  node [shape=box];\n");
    for node in nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", pos=\"{},{}!\", color=\"{}\"];\n",
            escape_dot(node.slug()),
            escape_dot(&node.exercise.name),
            node.position.x,
            0.0 - node.position.y,
            escape_dot(&node.path.color)
        ));
    }
    for edge in edges(nodes) {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [color=\"{}\"];\n",
            escape_dot(&edge.from),
            escape_dot(&edge.to),
            escape_dot(&edge.color)
        ));
    }
    out.push_str("}\n");
    out
}

/// Nodes without resolvable dependencies, then nodes only reachable through a cycle.
fn root_order(nodes: &[SkillTreeNode], index: &HashMap<&str, usize>) -> Vec<usize> {
    let mut roots: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            !node
                .dependencies
                .iter()
                .any(|dep| index.contains_key(dep.as_str()))
        })
        .map(|(idx, _)| idx)
        .collect();

    let mut reachable: HashSet<usize> = HashSet::new();
    let mut stack = roots.clone();
    while let Some(idx) = stack.pop() {
        if !reachable.insert(idx) {
            continue;
        }
        stack.extend(children(nodes, idx, index));
    }

    for idx in 0..nodes.len() {
        if reachable.contains(&idx) {
            continue;
        }
        roots.push(idx);
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if !reachable.insert(current) {
                continue;
            }
            stack.extend(children(nodes, current, index));
        }
    }
    roots
}

fn children(nodes: &[SkillTreeNode], idx: usize, index: &HashMap<&str, usize>) -> Vec<usize> {
    nodes[idx]
        .dependents
        .iter()
        .filter_map(|slug| index.get(slug.as_str()).copied())
        .collect()
}

/// Walks dependents depth-first with an explicit stack. Each node is expanded once; later
/// sightings are marked `(see above)` and a node met again on its own branch `(cycle)`.
fn render(nodes: &[SkillTreeNode], style: Style) -> String {
    let index = slug_index(nodes);
    let mut printed = vec![false; nodes.len()];
    let mut on_branch = vec![false; nodes.len()];
    let mut out = String::new();
    let mut prefix = String::new();

    for (pos, root) in root_order(nodes, &index).into_iter().enumerate() {
        if pos > 0 {
            out.push('\n');
        }
        out.push_str(&label(&nodes[root]));
        out.push('\n');
        printed[root] = true;
        on_branch[root] = true;

        prefix.clear();
        if let Style::Flat = style {
            prefix.push_str("  ");
        }
        let mut stack = vec![Frame {
            node: root,
            children: children(nodes, root, &index),
            cursor: 0,
            prefix_len: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&child) = frame.children.get(frame.cursor) else {
                on_branch[frame.node] = false;
                prefix.truncate(frame.prefix_len);
                stack.pop();
                continue;
            };
            frame.cursor += 1;
            let is_last = frame.cursor == frame.children.len();

            out.push_str(&prefix);
            if let Style::Tree = style {
                out.push_str(if is_last { "`-- " } else { "|-- " });
            }
            out.push_str(&label(&nodes[child]));
            if on_branch[child] {
                out.push_str(" (cycle)\n");
                continue;
            }
            if printed[child] {
                out.push_str(" (see above)\n");
                continue;
            }
            out.push('\n');
            printed[child] = true;
            on_branch[child] = true;

            let prefix_len = prefix.len();
            prefix.push_str(match style {
                Style::Tree if is_last => "    ",
                Style::Tree => "|   ",
                Style::Flat => "  ",
            });
            stack.push(Frame {
                node: child,
                children: children(nodes, child, &index),
                cursor: 0,
                prefix_len,
            });
        }
    }
    out
}

fn label(node: &SkillTreeNode) -> String {
    format!(
        "{} [{}] ({}, {})",
        node.slug(),
        node.exercise.status,
        node.position.x,
        node.position.y
    )
}

fn escape_dot(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use crate::core::exercise::{Exercise, ExerciseStatus};
    use crate::graph::viz::{render_dot, render_flat, render_tree};
    use crate::graph::{build_skill_tree, GraphSettings};

    fn exercise(slug: &str, deps: &[&str]) -> Exercise {
        let exercise = Exercise::new(slug, slug, ExerciseStatus::Active);
        if deps.is_empty() {
            exercise
        } else {
            exercise.with_dependencies(deps.iter().copied())
        }
    }

    #[test]
    fn tree_lists_dependents_under_their_prerequisite() {
        let nodes = build_skill_tree(
            &[exercise("a", &[]), exercise("b", &["a"]), exercise("c", &["a"])],
            &[],
            &GraphSettings::default(),
        );
        assert_eq!(
            render_tree(&nodes),
            "a [active] (0, 0)\n|-- b [active] (150, 0)\n`-- c [active] (150, 100)\n"
        );
        assert_eq!(
            render_flat(&nodes),
            "a [active] (0, 0)\n  b [active] (150, 0)\n  c [active] (150, 100)\n"
        );
    }

    #[test]
    fn cycle_members_are_rendered_once_and_marked() {
        let nodes = build_skill_tree(
            &[exercise("x", &["y"]), exercise("y", &["x"])],
            &[],
            &GraphSettings::default(),
        );
        assert_eq!(
            render_tree(&nodes),
            "x [active] (300, 0)\n`-- y [active] (150, 0)\n    `-- x [active] (300, 0) (cycle)\n"
        );
    }

    #[test]
    fn shared_dependent_is_expanded_once() {
        let nodes = build_skill_tree(
            &[
                exercise("root", &[]),
                exercise("left", &["root"]),
                exercise("right", &["root"]),
                exercise("merge", &["left", "right"]),
            ],
            &[],
            &GraphSettings::default(),
        );
        assert_eq!(
            render_tree(&nodes),
            "root [active] (0, 0)\n\
             |-- left [active] (150, 0)\n\
             |   `-- merge [active] (300, 100)\n\
             `-- right [active] (150, 100)\n    \
             `-- merge [active] (300, 100) (see above)\n"
        );
        assert_eq!(
            render_flat(&nodes),
            "root [active] (0, 0)\n  \
             left [active] (150, 0)\n    \
             merge [active] (300, 100)\n  \
             right [active] (150, 100)\n    \
             merge [active] (300, 100) (see above)\n"
        );
    }

    #[test]
    fn ladder_of_shared_prerequisites_renders_linearly() {
        let levels = 18;
        let mut exercises = vec![exercise("l0a", &[]), exercise("l0b", &[])];
        for level in 1..levels {
            let a = format!("l{}a", level - 1);
            let b = format!("l{}b", level - 1);
            for side in ["a", "b"] {
                exercises.push(exercise(
                    &format!("l{level}{side}"),
                    &[a.as_str(), b.as_str()],
                ));
            }
        }
        let nodes = build_skill_tree(&exercises, &[], &GraphSettings::default());

        for output in [render_tree(&nodes), render_flat(&nodes)] {
            let full = output
                .lines()
                .filter(|line| !line.is_empty() && !line.ends_with("(see above)"))
                .count();
            assert_eq!(full, nodes.len());
            assert!(output.lines().count() < 4 * nodes.len());
        }
    }

    #[test]
    fn deep_chain_renders_without_recursion() {
        let depth = 3_000;
        let mut exercises = vec![exercise("n0", &[])];
        for idx in 1..depth {
            let previous = format!("n{}", idx - 1);
            exercises.push(exercise(&format!("n{idx}"), &[previous.as_str()]));
        }
        let nodes = build_skill_tree(&exercises, &[], &GraphSettings::default());

        let handle = std::thread::Builder::new()
            .stack_size(128 * 1024)
            .spawn(move || (render_tree(&nodes), render_flat(&nodes)))
            .expect("spawn render thread");
        let (tree, flat) = handle.join().expect("render on a small stack");

        let last = format!("n{} [active]", depth - 1);
        assert_eq!(tree.lines().count(), depth);
        assert!(tree.lines().last().expect("tree line").contains(&last));
        assert_eq!(flat.lines().count(), depth);
        let flat_last = flat.lines().last().expect("flat line");
        assert!(flat_last.starts_with(&" ".repeat(2 * (depth - 1))));
        assert!(flat_last.contains(&last));
    }

    #[test]
    fn dot_pins_positions_and_escapes_labels() {
        let mut quoted = exercise("b", &["a"]);
        quoted.name = "Say \"hi\"".to_string();
        let nodes = build_skill_tree(
            &[exercise("a", &[]), quoted],
            &[],
            &GraphSettings::default(),
        );
        let dot = render_dot(&nodes);
        assert!(dot.starts_with("digraph skilltree {\n"));
        assert!(dot.contains(
            "\"b\" [label=\"Say \\\"hi\\\"\", pos=\"150,0!\", color=\"#0969da\"];"
        ));
        assert!(dot.contains("\"a\" -> \"b\" [color=\"#0969da\"];"));
    }
}
