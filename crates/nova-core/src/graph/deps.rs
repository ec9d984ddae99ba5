//! Dependency-edge checks backed by a petgraph directed graph.
//!
//! Edges point from a dependency to its dependent, the same direction the
//! connector overlay draws them.

use petgraph::{
    algo::{has_path_connecting, toposort},
    graphmap::DiGraphMap,
};

use crate::models::Milestone;

/// Builds the dependency graph of a milestone list. Edges whose dependency
/// is not in the list are skipped.
pub(crate) fn dependency_graph(milestones: &[Milestone]) -> DiGraphMap<&str, ()> {
    let mut graph = DiGraphMap::new();
    for milestone in milestones {
        graph.add_node(milestone.id.as_str());
    }
    for milestone in milestones {
        for dep in &milestone.dependencies {
            if graph.contains_node(dep.as_str()) {
                graph.add_edge(dep.as_str(), milestone.id.as_str(), ());
            }
        }
    }
    graph
}

/// Returns the ID of a milestone that sits on a dependency cycle, if any.
pub(crate) fn find_cycle(milestones: &[Milestone]) -> Option<String> {
    let graph = dependency_graph(milestones);
    toposort(&graph, None)
        .err()
        .map(|cycle| cycle.node_id().to_string())
}

/// Whether adding the edge `dependency → dependent` would close a cycle.
pub(crate) fn closes_cycle(graph: &DiGraphMap<&str, ()>, dependency: &str, dependent: &str) -> bool {
    dependency == dependent
        || (graph.contains_node(dependency)
            && graph.contains_node(dependent)
            && has_path_connecting(graph, dependent, dependency, None))
}

/// Milestones (in plan order) that list `id` as a dependency.
pub fn dependents<'a>(milestones: &'a [Milestone], id: &str) -> Vec<&'a Milestone> {
    milestones.iter().filter(|m| m.depends_on(id)).collect()
}
