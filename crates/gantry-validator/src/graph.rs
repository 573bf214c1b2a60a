//! Task dependency graph over (task, variant) pairs.

use gantry_core::{BuildVariantTask, Project, TaskDependency};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Cycle detected through task '{task}' in variant '{variant}'")]
    CycleDetected { task: String, variant: String },
    #[error("Task '{task}' in variant '{variant}' depends on unscheduled task '{dependency}'")]
    Unscheduled {
        task: String,
        variant: String,
        dependency: String,
    },
}

/// A task as scheduled in one build variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskVariant<'a> {
    pub task: &'a str,
    pub variant: &'a str,
}

impl<'a> TaskVariant<'a> {
    pub fn new(task: &'a str, variant: &'a str) -> Self {
        Self { task, variant }
    }
}

impl std::fmt::Display for TaskVariant<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.task, self.variant)
    }
}

/// Directed graph with an edge from each scheduled task to every task it
/// depends on.
///
/// Dependencies that point at something no variant schedules are kept as
/// nodes without outgoing edges, so traversals can report them.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    graph: DiGraphMap<TaskVariant<'a>, ()>,
    scheduled: Vec<TaskVariant<'a>>,
    scheduled_set: HashSet<TaskVariant<'a>>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph for every task scheduled by the project's variants.
    pub fn build(project: &'a Project) -> Self {
        let mut dag = Self {
            graph: DiGraphMap::new(),
            scheduled: Vec::new(),
            scheduled_set: HashSet::new(),
        };

        // A task listed twice in one variant keeps its first entry.
        let mut entries: Vec<(TaskVariant<'a>, &'a BuildVariantTask)> = Vec::new();
        for variant in &project.buildvariants {
            for task in &variant.tasks {
                let node = TaskVariant::new(&task.name, &variant.name);
                if dag.scheduled_set.insert(node) {
                    dag.scheduled.push(node);
                    dag.graph.add_node(node);
                    entries.push((node, task));
                }
            }
        }

        for (node, entry) in entries {
            let definition = project.task(node.task);
            for dep in entry.effective_depends_on(definition) {
                for target in dag.expand(node, dep) {
                    dag.graph.add_edge(node, target, ());
                }
            }
        }

        dag
    }

    /// Resolve one dependency of `node` into concrete graph targets.
    ///
    /// The all-tasks wildcard names every other task scheduled in the
    /// node's own variant, whatever variant the dependency points at.
    fn expand(&self, node: TaskVariant<'a>, dep: &'a TaskDependency) -> Vec<TaskVariant<'a>> {
        let names: Vec<&'a str> = if dep.is_all_dependencies() {
            self.scheduled
                .iter()
                .filter(|n| n.variant == node.variant && n.task != node.task)
                .map(|n| n.task)
                .collect()
        } else {
            vec![dep.name.as_str()]
        };

        let mut targets = Vec::new();
        for name in names {
            if dep.is_all_variants() {
                targets.extend(
                    self.scheduled
                        .iter()
                        .filter(|n| n.task == name && **n != node)
                        .copied(),
                );
            } else if dep.variant.is_empty() {
                targets.push(TaskVariant::new(name, node.variant));
            } else {
                targets.push(TaskVariant::new(name, dep.variant.as_str()));
            }
        }
        targets
    }

    /// Scheduled tasks in declaration order.
    pub fn nodes(&self) -> &[TaskVariant<'a>] {
        &self.scheduled
    }

    /// Whether some build variant schedules this task.
    pub fn is_scheduled(&self, node: TaskVariant<'a>) -> bool {
        self.scheduled_set.contains(&node)
    }

    /// Direct dependencies of a task, in the order they were added.
    pub fn dependencies_of(&self, node: TaskVariant<'a>) -> Vec<TaskVariant<'a>> {
        if !self.graph.contains_node(node) {
            return vec![];
        }
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect()
    }

    /// Tasks that directly depend on the given task.
    pub fn dependents_of(&self, node: TaskVariant<'a>) -> Vec<TaskVariant<'a>> {
        if !self.graph.contains_node(node) {
            return vec![];
        }
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .collect()
    }

    /// Number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Scheduled tasks ordered so every task comes after its dependencies.
    pub fn execution_order(&self) -> Result<Vec<TaskVariant<'a>>, GraphError> {
        for (from, to, _) in self.graph.all_edges() {
            if !self.is_scheduled(to) {
                return Err(GraphError::Unscheduled {
                    task: from.task.to_string(),
                    variant: from.variant.to_string(),
                    dependency: to.to_string(),
                });
            }
        }

        let mut order = toposort(&self.graph, None).map_err(|cycle| {
            let node = cycle.node_id();
            GraphError::CycleDetected {
                task: node.task.to_string(),
                variant: node.variant.to_string(),
            }
        })?;
        order.reverse();
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::{BuildVariant, BuildVariantTask, ProjectTask};
    use pretty_assertions::assert_eq;

    fn tv<'a>(task: &'a str, variant: &'a str) -> TaskVariant<'a> {
        TaskVariant::new(task, variant)
    }

    fn project() -> Project {
        Project {
            tasks: vec![
                ProjectTask::new("compile"),
                ProjectTask::new("test").depends_on([TaskDependency::new("compile")]),
                ProjectTask::new("lint"),
                ProjectTask::new("package").depends_on([TaskDependency::new("*")]),
            ],
            buildvariants: vec![
                BuildVariant::new("linux")
                    .with_task(BuildVariantTask::new("compile"))
                    .with_task(BuildVariantTask::new("test"))
                    .with_task(BuildVariantTask::new("lint"))
                    .with_task(BuildVariantTask::new("package")),
                BuildVariant::new("windows")
                    .with_task(BuildVariantTask::new("compile"))
                    .with_task(BuildVariantTask::new("test")),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_same_variant_edges() {
        let project = project();
        let graph = DependencyGraph::build(&project);

        assert_eq!(graph.nodes().len(), 6);
        assert_eq!(
            graph.dependencies_of(tv("test", "windows")),
            vec![tv("compile", "windows")]
        );
        assert!(graph.dependencies_of(tv("compile", "linux")).is_empty());
    }

    #[test]
    fn test_all_tasks_wildcard_stays_in_variant() {
        let project = project();
        let graph = DependencyGraph::build(&project);

        let mut deps = graph.dependencies_of(tv("package", "linux"));
        deps.sort();
        assert_eq!(
            deps,
            vec![tv("compile", "linux"), tv("lint", "linux"), tv("test", "linux")]
        );
    }

    #[test]
    fn test_all_variants_wildcard() {
        let mut project = project();
        project.tasks[2] = ProjectTask::new("lint")
            .depends_on([TaskDependency::new("compile").in_variant("*")]);
        let graph = DependencyGraph::build(&project);

        let mut deps = graph.dependencies_of(tv("lint", "linux"));
        deps.sort();
        assert_eq!(deps, vec![tv("compile", "linux"), tv("compile", "windows")]);
    }

    #[test]
    fn test_all_tasks_in_all_variants_skips_own_task() {
        let mut project = project();
        project.tasks[3] = ProjectTask::new("package")
            .depends_on([TaskDependency::new("*").in_variant("*")]);
        project.buildvariants[1].tasks.push(BuildVariantTask::new("package"));
        let graph = DependencyGraph::build(&project);

        let mut deps = graph.dependencies_of(tv("package", "windows"));
        deps.sort();
        assert_eq!(
            deps,
            vec![
                tv("compile", "linux"),
                tv("compile", "windows"),
                tv("test", "linux"),
                tv("test", "windows"),
            ]
        );
        assert!(
            !graph
                .dependencies_of(tv("package", "linux"))
                .contains(&tv("package", "windows"))
        );
        assert!(graph.execution_order().is_ok());
    }

    #[test]
    fn test_all_tasks_wildcard_in_other_variant_uses_own_task_names() {
        let mut project = project();
        project.tasks[3] = ProjectTask::new("package")
            .depends_on([TaskDependency::new("*").in_variant("windows")]);
        let graph = DependencyGraph::build(&project);

        let mut deps = graph.dependencies_of(tv("package", "linux"));
        deps.sort();
        assert_eq!(
            deps,
            vec![tv("compile", "windows"), tv("lint", "windows"), tv("test", "windows")]
        );
        assert!(!graph.is_scheduled(tv("lint", "windows")));
    }

    #[test]
    fn test_all_tasks_wildcard_in_unknown_variant_is_dangling() {
        let mut project = project();
        project.tasks[3] = ProjectTask::new("package")
            .depends_on([TaskDependency::new("*").in_variant("solaris")]);
        let graph = DependencyGraph::build(&project);

        let deps = graph.dependencies_of(tv("package", "linux"));
        assert_eq!(deps.len(), 3);
        assert!(deps.iter().all(|n| n.variant == "solaris" && !graph.is_scheduled(*n)));
    }

    #[test]
    fn test_unknown_task_in_all_variants_adds_no_edges() {
        let mut project = project();
        project.buildvariants[0].tasks[1].depends_on =
            Some(vec![TaskDependency::new("ghost").in_variant("*")]);
        let graph = DependencyGraph::build(&project);

        assert!(graph.dependencies_of(tv("test", "linux")).is_empty());
    }

    #[test]
    fn test_variant_override_replaces_task_dependencies() {
        let mut project = project();
        project.buildvariants[1].tasks[1].depends_on = Some(vec![]);
        let graph = DependencyGraph::build(&project);

        assert!(graph.dependencies_of(tv("test", "windows")).is_empty());
        assert_eq!(
            graph.dependencies_of(tv("test", "linux")),
            vec![tv("compile", "linux")]
        );
    }

    #[test]
    fn test_unscheduled_dependency_is_dangling() {
        let mut project = project();
        project.tasks[2] = ProjectTask::new("lint")
            .depends_on([TaskDependency::new("lint").in_variant("windows")]);
        let graph = DependencyGraph::build(&project);

        let dangling = tv("lint", "windows");
        assert!(!graph.is_scheduled(dangling));
        assert_eq!(graph.dependents_of(dangling), vec![tv("lint", "linux")]);
        assert!(matches!(
            graph.execution_order(),
            Err(GraphError::Unscheduled { .. })
        ));
    }

    #[test]
    fn test_execution_order_puts_dependencies_first() {
        let project = project();
        let graph = DependencyGraph::build(&project);
        let order = graph.execution_order().unwrap();

        let position = |node: TaskVariant| order.iter().position(|n| *n == node).unwrap();
        assert_eq!(order.len(), 6);
        assert!(position(tv("compile", "linux")) < position(tv("test", "linux")));
        assert!(position(tv("test", "linux")) < position(tv("package", "linux")));
        assert!(position(tv("compile", "windows")) < position(tv("test", "windows")));
    }

    #[test]
    fn test_execution_order_rejects_cycles() {
        let mut project = project();
        project.tasks[0] = ProjectTask::new("compile").depends_on([TaskDependency::new("test")]);
        let graph = DependencyGraph::build(&project);

        assert!(matches!(
            graph.execution_order(),
            Err(GraphError::CycleDetected { .. })
        ));
    }
}
