use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use anyhow::{anyhow, Result};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::core::node::SkillTreeNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDependency {
    pub from: String,
    pub dependency: String,
}

/// A drawable connection from a prerequisite to the exercise that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub color: String,
}

/// First node index per slug.
pub fn slug_index(nodes: &[SkillTreeNode]) -> HashMap<&str, usize> {
    let mut index = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        index.entry(node.slug()).or_insert(idx);
    }
    index
}

pub fn find_node<'a>(nodes: &'a [SkillTreeNode], slug: &str) -> Option<&'a SkillTreeNode> {
    nodes.iter().find(|node| node.slug() == slug)
}

pub fn edges(nodes: &[SkillTreeNode]) -> Vec<Edge> {
    let index = slug_index(nodes);
    let mut out = Vec::new();
    for node in nodes {
        for dep in &node.dependencies {
            if index.contains_key(dep.as_str()) {
                out.push(Edge {
                    from: dep.clone(),
                    to: node.slug().to_string(),
                    color: node.path.color.clone(),
                });
            }
        }
    }
    out
}

pub fn missing_dependencies(nodes: &[SkillTreeNode]) -> Vec<MissingDependency> {
    let index = slug_index(nodes);
    let mut missing = Vec::new();
    for node in nodes {
        for dep in &node.dependencies {
            if !index.contains_key(dep.as_str()) {
                missing.push(MissingDependency {
                    from: node.slug().to_string(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    missing
}

/// Direct dependencies that resolve to a node.
pub fn dependencies_for(nodes: &[SkillTreeNode], slug: &str) -> Vec<String> {
    let index = slug_index(nodes);
    find_node(nodes, slug)
        .map(|node| {
            node.dependencies
                .iter()
                .filter(|dep| index.contains_key(dep.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

pub fn dependents_of(nodes: &[SkillTreeNode], slug: &str) -> Vec<String> {
    find_node(nodes, slug)
        .map(|node| node.dependents.clone())
        .unwrap_or_default()
}

pub fn transitive_dependencies(nodes: &[SkillTreeNode], slug: &str) -> Vec<String> {
    walk(nodes, slug, |node| node.dependencies.as_slice())
}

pub fn transitive_dependents(nodes: &[SkillTreeNode], slug: &str) -> Vec<String> {
    walk(nodes, slug, |node| node.dependents.as_slice())
}

fn walk<F>(nodes: &[SkillTreeNode], slug: &str, next: F) -> Vec<String>
where
    F: Fn(&SkillTreeNode) -> &[String],
{
    let index = slug_index(nodes);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = Vec::new();
    if let Some(&start) = index.get(slug) {
        stack.extend(next(&nodes[start]).iter().map(String::as_str));
    }
    while let Some(current) = stack.pop() {
        let Some(&idx) = index.get(current) else {
            continue;
        };
        if !seen.insert(current) {
            continue;
        }
        stack.extend(next(&nodes[idx]).iter().map(String::as_str));
    }
    seen.remove(slug);
    let mut out: Vec<String> = seen.into_iter().map(str::to_string).collect();
    out.sort();
    out
}

fn dependency_graph(nodes: &[SkillTreeNode]) -> DiGraph<usize, ()> {
    let index = slug_index(nodes);
    let mut graph = DiGraph::with_capacity(nodes.len(), 0);
    for idx in 0..nodes.len() {
        graph.add_node(idx);
    }
    for (idx, node) in nodes.iter().enumerate() {
        for dep in &node.dependencies {
            if let Some(&target) = index.get(dep.as_str()) {
                graph.add_edge(NodeIndex::new(target), NodeIndex::new(idx), ());
            }
        }
    }
    graph
}

/// Strongly connected groups of exercises, each listed in input order.
pub fn find_cycles(nodes: &[SkillTreeNode]) -> Vec<Vec<String>> {
    let graph = dependency_graph(nodes);
    let mut cycles: Vec<Vec<usize>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .map(|&node| graph.contains_edge(node, node))
                    .unwrap_or(false)
        })
        .map(|component| {
            let mut members: Vec<usize> = component.iter().map(|node| graph[*node]).collect();
            members.sort_unstable();
            members
        })
        .collect();
    cycles.sort();

    cycles
        .into_iter()
        .map(|members| {
            members
                .into_iter()
                .map(|idx| nodes[idx].slug().to_string())
                .collect()
        })
        .collect()
}

/// Prerequisites first; among exercises that are ready, input order decides.
pub fn learning_order(nodes: &[SkillTreeNode]) -> Result<Vec<String>> {
    let graph = dependency_graph(nodes);
    let mut indegree: Vec<usize> = graph
        .node_indices()
        .map(|node| {
            graph
                .neighbors_directed(node, petgraph::Direction::Incoming)
                .count()
        })
        .collect();

    let mut ready: BTreeSet<usize> = indegree
        .iter()
        .enumerate()
        .filter_map(|(idx, &count)| if count == 0 { Some(idx) } else { None })
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(idx) = ready.pop_first() {
        order.push(nodes[idx].slug().to_string());
        for next in graph.neighbors_directed(NodeIndex::new(idx), petgraph::Direction::Outgoing) {
            let count = &mut indegree[next.index()];
            if *count > 0 {
                *count -= 1;
                if *count == 0 {
                    ready.insert(next.index());
                }
            }
        }
    }

    if order.len() != nodes.len() {
        return Err(anyhow!("cycle detected in dependency graph"));
    }

    Ok(order)
}

/// Groups of exercises placed on the same coordinate.
pub fn overlapping_positions(nodes: &[SkillTreeNode]) -> Vec<Vec<String>> {
    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    let mut first_at: HashMap<(u64, u64), usize> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        // adding 0.0 folds -0.0 into 0.0
        let key = (
            (node.position.x + 0.0).to_bits(),
            (node.position.y + 0.0).to_bits(),
        );
        let first = *first_at.entry(key).or_insert(idx);
        groups
            .entry(first)
            .or_default()
            .push(node.slug().to_string());
    }
    groups
        .into_values()
        .filter(|group| group.len() > 1)
        .collect()
}
