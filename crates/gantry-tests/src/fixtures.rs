//! Test fixtures for creating sample projects.

use gantry_core::{BuildVariant, BuildVariantTask, Command, Project, ProjectTask, TaskDependency};
use serde_json::json;

/// Distro every fixture variant runs on.
pub const FIXTURE_DISTRO: &str = "ubuntu2204";

/// A `shell.exec` command with valid parameters.
pub fn shell(script: &str) -> Command {
    Command::direct("shell.exec").with_params(json!({ "script": script }))
}

/// A dependency on a task in the dependent's own variant.
pub fn dep(name: &str) -> TaskDependency {
    TaskDependency::new(name)
}

/// A task with one valid command and the given dependencies.
pub fn task(name: &str, deps: &[TaskDependency]) -> ProjectTask {
    ProjectTask::new(name)
        .depends_on(deps.iter().cloned())
        .with_command(shell(&format!("make {}", name)))
}

/// A variant on [`FIXTURE_DISTRO`] scheduling the given tasks.
pub fn variant(name: &str, tasks: &[&str]) -> BuildVariant {
    tasks.iter().fold(
        BuildVariant::new(name).run_on([FIXTURE_DISTRO]),
        |bv, task| bv.with_task(BuildVariantTask::new(*task)),
    )
}

/// Factory for creating test projects.
pub struct ProjectFixture;

impl ProjectFixture {
    /// An empty project with only an identifier.
    pub fn empty() -> Project {
        Project {
            identifier: "fixture".to_string(),
            ..Default::default()
        }
    }

    /// `compile`, and `test` depending on it, both scheduled on `linux`.
    pub fn compile_and_test() -> Project {
        Project {
            tasks: vec![task("compile", &[]), task("test", &[dep("compile")])],
            buildvariants: vec![variant("linux", &["compile", "test"])],
            ..Self::empty()
        }
    }

    /// `compile` and `test` depending on each other.
    pub fn two_task_cycle() -> Project {
        let mut project = Self::compile_and_test();
        project.tasks[0] = task("compile", &[dep("test")]);
        project
    }

    /// Three tasks scheduled on two variants, with cross-variant and
    /// wildcard dependencies and no cycles.
    pub fn multi_variant() -> Project {
        Project {
            tasks: vec![
                task("compile", &[]),
                task("test", &[dep("compile")]),
                task("package", &[dep("compile").in_variant("*")]),
                task("publish", &[dep("*")]),
            ],
            buildvariants: vec![
                variant("linux", &["compile", "test", "package", "publish"]),
                variant("windows", &["compile", "test"]),
            ],
            ..Self::empty()
        }
    }
}

/// Everything the fixtures need to run semantics-tier validation.
pub fn fixture_distros() -> Vec<String> {
    vec![FIXTURE_DISTRO.to_string()]
}
