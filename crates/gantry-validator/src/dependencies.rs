//! Static checks on the dependency lists written in the project.

use crate::ValidationError;
use gantry_core::{Project, TaskDependency};
use std::collections::HashSet;

/// Where a dependency list was written.
#[derive(Clone, Copy)]
enum ListOwner<'a> {
    Task(&'a str),
    Override { task: &'a str, variant: &'a str },
}

impl std::fmt::Display for ListOwner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListOwner::Task(task) => write!(f, "task '{}'", task),
            ListOwner::Override { task, variant } => {
                write!(f, "task '{}' in variant '{}'", task, variant)
            }
        }
    }
}

fn dependency_lists(project: &Project) -> impl Iterator<Item = (ListOwner<'_>, &[TaskDependency])> {
    let tasks = project
        .tasks
        .iter()
        .map(|t| (ListOwner::Task(&t.name), t.depends_on.as_slice()));
    let overrides = project.buildvariants.iter().flat_map(|bv| {
        bv.tasks.iter().filter_map(move |t| {
            t.depends_on.as_deref().map(|deps| {
                let owner = ListOwner::Override {
                    task: &t.name,
                    variant: &bv.name,
                };
                (owner, deps)
            })
        })
    });
    tasks.chain(overrides)
}

fn describe(dep: &TaskDependency) -> String {
    if dep.variant.is_empty() {
        format!("'{}'", dep.name)
    } else {
        format!("'{}' in variant '{}'", dep.name, dep.variant)
    }
}

fn duplicates_and_statuses(owner: ListOwner<'_>, deps: &[TaskDependency]) -> Vec<ValidationError> {
    let mut errs = Vec::new();
    let mut seen = HashSet::new();
    for dep in deps {
        if !seen.insert((dep.name.as_str(), dep.variant.as_str())) {
            errs.push(ValidationError::error(format!(
                "{} lists dependency {} more than once",
                owner,
                describe(dep)
            )));
        }
        if !dep.has_valid_status() {
            errs.push(ValidationError::error(format!(
                "{} has dependency {} with invalid status '{}'",
                owner,
                describe(dep),
                dep.status
            )));
        }
    }
    errs
}

/// Check each dependency list for duplicates, bad statuses, unknown task
/// names and tasks depending on themselves.
///
/// Variant names are not checked here; the dependency graph reports
/// dependencies on tasks that no variant schedules. Self-dependencies in
/// variant-level overrides surface as cycles in the graph instead.
pub fn verify_task_dependencies(project: &Project) -> Vec<ValidationError> {
    let mut errs = Vec::new();

    for (owner, deps) in dependency_lists(project) {
        errs.extend(duplicates_and_statuses(owner, deps));

        for dep in deps {
            if dep.is_all_dependencies() {
                continue;
            }
            if project.task(&dep.name).is_none() {
                errs.push(ValidationError::error(format!(
                    "{} depends on non-existent task '{}'",
                    owner, dep.name
                )));
            } else if matches!(owner, ListOwner::Task(task) if dep.name == task)
                && dep.variant.is_empty()
            {
                errs.push(ValidationError::error(format!(
                    "{} cannot depend on itself",
                    owner
                )));
            }
        }
    }

    errs
}

/// A list containing the all-tasks wildcard must contain nothing else.
pub fn check_all_dependencies_spec(project: &Project) -> Vec<ValidationError> {
    dependency_lists(project)
        .filter(|(_, deps)| deps.len() > 1 && deps.iter().any(|d| d.is_all_dependencies()))
        .map(|(owner, _)| {
            ValidationError::error(format!(
                "{} depends on all tasks ('*') and must not list other dependencies",
                owner
            ))
        })
        .collect()
}
