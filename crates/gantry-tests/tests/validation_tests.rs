//! End-to-end validation of whole projects.

use gantry_core::{BuildVariantTask, Command, Project};
use gantry_plugins::registry;
use gantry_tests::{
    ProjectFixture, dep, documents, fixture_distros, init_test_logging, shell, task, variant,
};
use gantry_validator::cycle::check_dependency_graph;
use gantry_validator::dependencies::check_all_dependencies_spec;
use gantry_validator::{FindingsExt, Level, ValidationError, validate_semantics, validate_syntax};
use pretty_assertions::assert_eq;
use serde_json::json;

fn syntax(project: &Project) -> Vec<ValidationError> {
    validate_syntax(project, registry())
}

fn messages(findings: &[ValidationError]) -> Vec<&str> {
    findings.iter().map(|f| f.message.as_str()).collect()
}

#[test]
fn test_compile_and_test_is_clean() {
    init_test_logging();
    let project = ProjectFixture::compile_and_test();

    assert_eq!(messages(&syntax(&project)), Vec::<&str>::new());
    assert!(validate_semantics(&project, registry(), &fixture_distros()).is_empty());
}

#[test]
fn test_two_task_cycle_clears_when_an_edge_is_removed() {
    init_test_logging();
    let mut project = ProjectFixture::two_task_cycle();
    let findings = syntax(&project);
    assert!(findings.has_errors());
    assert!(findings.iter().any(|f| f.message.contains("dependency cycle")));

    project.tasks[0].depends_on.clear();
    assert!(syntax(&project).is_empty());

    let mut project = ProjectFixture::two_task_cycle();
    project.tasks[1].depends_on.clear();
    assert!(syntax(&project).is_empty());
}

#[test]
fn test_task_without_commands() {
    let mut project = ProjectFixture::compile_and_test();
    project.tasks[0].commands.clear();

    let findings = syntax(&project);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("does not contain any commands"));

    project.tasks[0].commands.push(Command::direct("shell.track"));
    assert!(syntax(&project).is_empty());
}

#[test]
fn test_unregistered_command() {
    let mut project = ProjectFixture::compile_and_test();
    project.tasks[0].commands = vec![Command::direct("a.b")];
    assert_eq!(syntax(&project).len(), 1);

    project.tasks[0].commands = vec![Command::direct("attach.results").with_params(json!({
        "file_location": "report.json"
    }))];
    assert!(syntax(&project).is_empty());
}

#[test]
fn test_wildcard_must_be_sole_dependency() {
    let mut project = ProjectFixture::compile_and_test();
    project.tasks[1] = task("test", &[dep("*"), dep("compile")]);
    assert_eq!(check_all_dependencies_spec(&project).len(), 1);

    project.tasks[1] = task("test", &[dep("*")]);
    assert!(check_all_dependencies_spec(&project).is_empty());
}

#[test]
fn test_variant_override_replaces_task_dependencies() {
    let mut project = ProjectFixture::two_task_cycle();
    assert!(!check_dependency_graph(&project).is_empty());

    // An explicit empty list removes compile's edge to test on linux.
    project.buildvariants[0].tasks[0].depends_on = Some(vec![]);
    assert!(check_dependency_graph(&project).is_empty());

    // Unset falls back to the task's own list.
    project.buildvariants[0].tasks[0].depends_on = None;
    assert!(!check_dependency_graph(&project).is_empty());

    // A non-empty override replaces rather than merges.
    project.buildvariants[0].tasks[0] =
        BuildVariantTask::new("compile").override_depends_on([dep("lint")]);
    let findings = check_dependency_graph(&project);
    // compile@linux and test@linux, which reaches it.
    assert_eq!(findings.len(), 2);
    assert!(findings.iter().all(|f| f.message.contains("'lint'")));
}

#[test]
fn test_unknown_references() {
    let mut unknown_task = ProjectFixture::compile_and_test();
    unknown_task.tasks[1] = task("test", &[dep("hamSteak")]);
    let findings = check_dependency_graph(&unknown_task);
    assert_eq!(findings.len(), 1);

    let mut unknown_variant = ProjectFixture::compile_and_test();
    unknown_variant.tasks[1] = task("test", &[dep("compile").in_variant("bvNOPE")]);
    let findings = check_dependency_graph(&unknown_variant);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("variant does not exist"));

    let mut unknown_distro = ProjectFixture::compile_and_test();
    unknown_distro.buildvariants[0].run_on = vec!["nowhere".to_string()];
    assert!(syntax(&unknown_distro).is_empty());
    assert_eq!(
        validate_semantics(&unknown_distro, registry(), &fixture_distros()).len(),
        1
    );
}

#[test]
fn test_multi_variant_wildcards() {
    let project = ProjectFixture::multi_variant();
    assert!(syntax(&project).is_empty());

    let mut cyclic = project;
    cyclic.tasks[0] = task("compile", &[dep("publish").in_variant("linux")]);
    let findings = check_dependency_graph(&cyclic);
    // Every scheduled task reaches compile@linux, which reaches the cycle.
    assert_eq!(findings.len(), 6);
}

#[test]
fn test_wildcards_across_variants() {
    let mut push_everywhere = ProjectFixture::compile_and_test();
    push_everywhere.tasks.push(task("push", &[dep("*").in_variant("*")]));
    push_everywhere.buildvariants = vec![
        variant("linux", &["compile", "test", "push"]),
        variant("windows", &["compile", "test", "push"]),
    ];
    assert_eq!(messages(&syntax(&push_everywhere)), Vec::<&str>::new());

    let mut unknown_variant = ProjectFixture::compile_and_test();
    unknown_variant.tasks[1] = task("test", &[dep("*").in_variant("bvNOPE")]);
    let findings = syntax(&unknown_variant);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("variant does not exist"));

    let mut unknown_in_override = ProjectFixture::compile_and_test();
    unknown_in_override.buildvariants[0].tasks[1].depends_on =
        Some(vec![dep("ghost").in_variant("*")]);
    let findings = syntax(&unknown_in_override);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("non-existent task 'ghost'"));
}

#[test]
fn test_validation_is_deterministic() {
    let project = Project::from_yaml_str(documents::BROKEN).unwrap();
    let first = syntax(&project);
    for _ in 0..10 {
        assert_eq!(syntax(&project), first);
    }
}

#[test]
fn test_well_formed_document() {
    init_test_logging();
    let project = Project::from_yaml_str(documents::WELL_FORMED).unwrap();
    let distros: Vec<&str> = documents::WELL_FORMED_DISTROS.to_vec();

    assert_eq!(
        messages(&validate_semantics(&project, registry(), &distros)),
        Vec::<&str>::new()
    );
}

#[test]
fn test_broken_document() {
    let project = Project::from_yaml_str(documents::BROKEN).unwrap();

    let findings = syntax(&project);
    assert_eq!(findings.count(Level::Error), 8, "{:#?}", findings);
    assert_eq!(findings.count(Level::Warning), 0);

    let expected = [
        "dependency error for 'compile' task in variant 'linux'",
        "dependency error for 'test' task in variant 'linux'",
        "function 'outer': cannot reference a function within a function",
        "task 'compile': 'a.b' command",
        "must have a non-negative batchtime",
        "lists dependency 'compile' more than once",
        "task 'test' does not contain any commands",
        "references non-existent task 'ghost'",
    ];
    for (finding, expected) in findings.iter().zip(expected) {
        assert!(
            finding.message.contains(expected),
            "{:?} should contain {:?}",
            finding.message,
            expected
        );
    }

    let semantics = validate_semantics(&project, registry(), &fixture_distros());
    assert_eq!(semantics.len(), 9);
    assert!(semantics[8].message.contains("'nowhere'"));
}

#[test]
fn test_unscheduled_task_is_only_a_warning() {
    let mut project = ProjectFixture::compile_and_test();
    project.tasks.push(task("lint", &[]));
    project.buildvariants.push(variant("windows", &["compile"]));
    project.tasks[2].commands.push(shell("golint ./..."));

    let findings = syntax(&project);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].level, Level::Warning);
    assert!(!findings.has_errors());
}
