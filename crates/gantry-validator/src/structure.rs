//! Structural checks on names, references and required fields.

use crate::ValidationError;
use gantry_core::project::VALID_COMMAND_TYPES;
use gantry_core::{DistroRegistry, Project};
use std::collections::HashSet;

/// One finding for every name seen before, in declaration order.
fn duplicates<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    names.into_iter().filter(|name| !seen.insert(*name)).collect()
}

pub fn validate_project_task_names(project: &Project) -> Vec<ValidationError> {
    duplicates(project.tasks.iter().map(|t| t.name.as_str()))
        .into_iter()
        .map(|name| ValidationError::error(format!("task '{}' is defined more than once", name)))
        .collect()
}

pub fn validate_bv_names(project: &Project) -> Vec<ValidationError> {
    duplicates(project.buildvariants.iter().map(|bv| bv.name.as_str()))
        .into_iter()
        .map(|name| {
            ValidationError::error(format!("build variant '{}' is defined more than once", name))
        })
        .collect()
}

pub fn validate_bv_task_names(project: &Project) -> Vec<ValidationError> {
    project
        .buildvariants
        .iter()
        .flat_map(|bv| {
            duplicates(bv.tasks.iter().map(|t| t.name.as_str()))
                .into_iter()
                .map(move |name| {
                    ValidationError::error(format!(
                        "task '{}' is listed more than once in build variant '{}'",
                        name, bv.name
                    ))
                })
        })
        .collect()
}

/// Every task a build variant schedules must be defined by the project.
pub fn ensure_referential_integrity(project: &Project) -> Vec<ValidationError> {
    let mut errs = Vec::new();
    for bv in &project.buildvariants {
        for task in &bv.tasks {
            if task.name.is_empty() {
                errs.push(ValidationError::error(format!(
                    "tasks for build variant '{}' must each have a name",
                    bv.name
                )));
            } else if project.task(&task.name).is_none() {
                errs.push(ValidationError::error(format!(
                    "build variant '{}' references non-existent task '{}'",
                    bv.name, task.name
                )));
            }
        }
    }
    errs
}

/// Every distro a build variant or one of its tasks runs on must be known.
pub fn ensure_distros_exist(project: &Project, distros: &dyn DistroRegistry) -> Vec<ValidationError> {
    let mut errs = Vec::new();
    for bv in &project.buildvariants {
        for distro in bv.run_on.iter().filter(|d| !distros.contains(d)) {
            errs.push(ValidationError::error(format!(
                "build variant '{}' references non-existent distro '{}'",
                bv.name, distro
            )));
        }
        for task in &bv.tasks {
            for distro in task.distros.iter().filter(|d| !distros.contains(d)) {
                errs.push(ValidationError::error(format!(
                    "task '{}' in build variant '{}' references non-existent distro '{}'",
                    task.name, bv.name, distro
                )));
            }
        }
    }
    errs
}

pub fn check_task_commands(project: &Project) -> Vec<ValidationError> {
    project
        .tasks
        .iter()
        .filter(|t| t.commands.is_empty())
        .map(|t| ValidationError::error(format!("task '{}' does not contain any commands", t.name)))
        .collect()
}

pub fn ensure_has_necessary_project_fields(project: &Project) -> Vec<ValidationError> {
    let mut errs = Vec::new();
    if project.batchtime < 0 {
        errs.push(ValidationError::error(format!(
            "project '{}' must have a non-negative batchtime, got {}",
            project.identifier, project.batchtime
        )));
    }
    if let Some(command_type) = &project.command_type {
        if !VALID_COMMAND_TYPES.contains(&command_type.as_str()) {
            errs.push(ValidationError::error(format!(
                "project '{}' has invalid command_type '{}', expected one of {:?}",
                project.identifier, command_type, VALID_COMMAND_TYPES
            )));
        }
    }
    errs
}

pub fn ensure_has_necessary_bv_fields(project: &Project) -> Vec<ValidationError> {
    if project.buildvariants.is_empty() {
        return vec![ValidationError::error(format!(
            "project '{}' must specify at least one build variant",
            project.identifier
        ))];
    }

    let mut errs = Vec::new();
    for bv in &project.buildvariants {
        if bv.name.is_empty() {
            errs.push(ValidationError::error(format!(
                "project '{}' has a build variant without a name",
                project.identifier
            )));
        }
        if bv.tasks.is_empty() {
            errs.push(ValidationError::error(format!(
                "build variant '{}' must contain at least one task",
                bv.name
            )));
        }
        if bv.run_on.is_empty() && bv.tasks.iter().any(|t| t.distros.is_empty()) {
            errs.push(ValidationError::error(format!(
                "build variant '{}' must set run_on or give every task its own distros",
                bv.name
            )));
        }
    }
    errs
}

/// Tasks that no build variant schedules never run.
pub fn check_unscheduled_tasks(project: &Project) -> Vec<ValidationError> {
    let scheduled: HashSet<&str> = project
        .buildvariants
        .iter()
        .flat_map(|bv| bv.tasks.iter().map(|t| t.name.as_str()))
        .collect();

    project
        .tasks
        .iter()
        .filter(|t| !scheduled.contains(t.name.as_str()))
        .map(|t| {
            ValidationError::warning(format!(
                "task '{}' is not scheduled by any build variant",
                t.name
            ))
        })
        .collect()
}
