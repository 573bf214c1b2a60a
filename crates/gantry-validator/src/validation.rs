//! The two validation tiers.

use crate::commands::validate_plugin_commands;
use crate::cycle::check_dependency_graph;
use crate::dependencies::{check_all_dependencies_spec, verify_task_dependencies};
use crate::structure::{
    check_task_commands, check_unscheduled_tasks, ensure_distros_exist,
    ensure_has_necessary_bv_fields, ensure_has_necessary_project_fields,
    ensure_referential_integrity, validate_bv_names, validate_bv_task_names,
    validate_project_task_names,
};
use crate::{FindingsExt, Level, ValidationError};
use gantry_core::{CommandCatalog, DistroRegistry, Project};
use tracing::{debug, info};

fn run_check(
    findings: &mut Vec<ValidationError>,
    name: &str,
    check: impl FnOnce() -> Vec<ValidationError>,
) {
    let found = check();
    debug!(check = name, findings = found.len(), "Ran project check");
    findings.extend(found);
}

fn syntax_findings(project: &Project, catalog: &dyn CommandCatalog) -> Vec<ValidationError> {
    let mut findings = Vec::new();
    run_check(&mut findings, "bv_fields", || ensure_has_necessary_bv_fields(project));
    run_check(&mut findings, "dependency_graph", || check_dependency_graph(project));
    run_check(&mut findings, "plugin_commands", || {
        validate_plugin_commands(project, catalog)
    });
    run_check(&mut findings, "project_fields", || {
        ensure_has_necessary_project_fields(project)
    });
    run_check(&mut findings, "task_dependencies", || verify_task_dependencies(project));
    run_check(&mut findings, "bv_names", || validate_bv_names(project));
    run_check(&mut findings, "bv_task_names", || validate_bv_task_names(project));
    run_check(&mut findings, "all_dependencies", || check_all_dependencies_spec(project));
    run_check(&mut findings, "task_names", || validate_project_task_names(project));
    run_check(&mut findings, "task_commands", || check_task_commands(project));
    run_check(&mut findings, "referential_integrity", || {
        ensure_referential_integrity(project)
    });
    run_check(&mut findings, "unscheduled_tasks", || check_unscheduled_tasks(project));
    findings
}

fn summarize(tier: &str, project: &Project, findings: &[ValidationError]) {
    info!(
        tier,
        project = %project.identifier,
        errors = findings.count(Level::Error),
        warnings = findings.count(Level::Warning),
        "Validated project"
    );
}

/// Run every check that needs nothing beyond the document and the command
/// catalog.
pub fn validate_syntax(project: &Project, catalog: &dyn CommandCatalog) -> Vec<ValidationError> {
    let findings = syntax_findings(project, catalog);
    summarize("syntax", project, &findings);
    findings
}

/// Run the syntax checks, then the checks against known distros.
pub fn validate_semantics(
    project: &Project,
    catalog: &dyn CommandCatalog,
    distros: &dyn DistroRegistry,
) -> Vec<ValidationError> {
    let mut findings = syntax_findings(project, catalog);
    run_check(&mut findings, "distros", || ensure_distros_exist(project, distros));
    summarize("semantics", project, &findings);
    findings
}
