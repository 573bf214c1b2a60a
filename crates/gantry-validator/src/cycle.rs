//! Per-task traversal of the dependency graph for cycles and missing tasks.

use crate::ValidationError;
use crate::graph::{DependencyGraph, TaskVariant};
use gantry_core::Project;
use std::collections::HashSet;
use tracing::debug;

/// The first thing wrong with the dependencies reachable from one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyProblem<'a> {
    /// The traversal came back to a task still being explored.
    Cycle(TaskVariant<'a>),
    /// A dependency names a task that no variant schedules.
    Missing(TaskVariant<'a>),
}

struct Frame<'a> {
    node: TaskVariant<'a>,
    dependencies: Vec<TaskVariant<'a>>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(node: TaskVariant<'a>, graph: &DependencyGraph<'a>) -> Self {
        Self {
            node,
            dependencies: graph.dependencies_of(node),
            next: 0,
        }
    }

    fn next_dependency(&mut self) -> Option<TaskVariant<'a>> {
        let dep = self.dependencies.get(self.next).copied();
        self.next += 1;
        dep
    }
}

/// Walks the graph once per scheduled task.
///
/// Tasks whose whole reachable subgraph was already explored without
/// trouble are remembered and skipped on later walks.
pub struct CycleDetector<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
    clean: HashSet<TaskVariant<'a>>,
}

impl<'g, 'a> CycleDetector<'g, 'a> {
    pub fn new(graph: &'g DependencyGraph<'a>) -> Self {
        Self {
            graph,
            clean: HashSet::new(),
        }
    }

    /// At most one problem per scheduled task, in declaration order.
    pub fn problems(mut self) -> Vec<(TaskVariant<'a>, DependencyProblem<'a>)> {
        let graph = self.graph;
        graph
            .nodes()
            .iter()
            .filter_map(|&root| self.first_problem(root).map(|p| (root, p)))
            .collect()
    }

    fn first_problem(&mut self, root: TaskVariant<'a>) -> Option<DependencyProblem<'a>> {
        if self.clean.contains(&root) {
            return None;
        }

        let mut on_stack = HashSet::from([root]);
        let mut stack = vec![Frame::new(root, self.graph)];

        while let Some(frame) = stack.last_mut() {
            let Some(next) = frame.next_dependency() else {
                let done = frame.node;
                stack.pop();
                on_stack.remove(&done);
                self.clean.insert(done);
                continue;
            };

            if !self.graph.is_scheduled(next) {
                return Some(DependencyProblem::Missing(next));
            }
            if on_stack.contains(&next) {
                return Some(DependencyProblem::Cycle(next));
            }
            if self.clean.contains(&next) {
                continue;
            }

            on_stack.insert(next);
            stack.push(Frame::new(next, self.graph));
        }

        None
    }
}

/// Report cycles and dependencies on unscheduled tasks.
///
/// Every scheduled task gets its own traversal, so one cycle is reported
/// once for each task that reaches it.
pub fn check_dependency_graph(project: &Project) -> Vec<ValidationError> {
    let graph = DependencyGraph::build(project);
    debug!(
        nodes = graph.nodes().len(),
        edges = graph.edge_count(),
        "Built task dependency graph"
    );

    CycleDetector::new(&graph)
        .problems()
        .into_iter()
        .map(|(root, problem)| {
            let detail = match problem {
                DependencyProblem::Cycle(node) => format!(
                    "dependency '{}' in variant '{}' is part of a dependency cycle",
                    node.task, node.variant
                ),
                DependencyProblem::Missing(node) => missing_detail(project, node),
            };
            ValidationError::error(format!(
                "dependency error for '{}' task in variant '{}': {}",
                root.task, root.variant, detail
            ))
        })
        .collect()
}

fn missing_detail(project: &Project, node: TaskVariant<'_>) -> String {
    let reason = if project.task(node.task).is_none() {
        "the task does not exist"
    } else if project.variant(node.variant).is_none() {
        "the variant does not exist"
    } else {
        "the variant does not schedule it"
    };
    format!(
        "dependency '{}' in variant '{}' is not present in the project config: {}",
        node.task, node.variant, reason
    )
}
