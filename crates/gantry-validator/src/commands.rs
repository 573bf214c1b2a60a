//! Checks every command the project declares against the command catalog.

use crate::ValidationError;
use gantry_core::project::VALID_COMMAND_TYPES;
use gantry_core::{Command, CommandCatalog, CommandRef, Project};

/// Where a command was written.
#[derive(Clone, Copy)]
enum Section<'a> {
    Function(&'a str),
    Hook(&'static str),
    Task(&'a str),
}

impl std::fmt::Display for Section<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Function(name) => write!(f, "function '{}'", name),
            Section::Hook(name) => write!(f, "'{}' section", name),
            Section::Task(name) => write!(f, "task '{}'", name),
        }
    }
}

struct CommandChecker<'a> {
    project: &'a Project,
    catalog: &'a dyn CommandCatalog,
}

impl CommandChecker<'_> {
    fn check(&self, section: Section<'_>, cmd: &Command) -> Vec<ValidationError> {
        let mut errs = Vec::new();

        if let Some(problem) = self.first_problem(cmd) {
            errs.push(ValidationError::error(format!(
                "{}: {}: {}",
                section,
                cmd.label(),
                problem
            )));
        }

        if let Some(command_type) = &cmd.command_type {
            if !VALID_COMMAND_TYPES.contains(&command_type.as_str()) {
                errs.push(ValidationError::error(format!(
                    "{}: {} has invalid type '{}', expected one of {:?}",
                    section,
                    cmd.label(),
                    command_type,
                    VALID_COMMAND_TYPES
                )));
            }
        }

        errs
    }

    /// The first reason this command could not run, if any.
    ///
    /// A function reference only needs to name a defined function; the
    /// body is checked once, where the function is declared.
    fn first_problem(&self, cmd: &Command) -> Option<String> {
        match cmd.resolve() {
            None => Some("must set either 'func' or 'command'".to_string()),
            Some(CommandRef::Direct { name, params }) => self
                .catalog
                .check_params(name, params)
                .err()
                .map(|e| e.to_string()),
            Some(CommandRef::Function(func)) if !self.project.functions.contains_key(func) => {
                Some(format!("function '{}' is not defined", func))
            }
            Some(CommandRef::Function(_)) => None,
        }
    }
}

/// Validate function bodies, the `pre`/`post`/`timeout` hooks and every
/// task's commands, in that order.
pub fn validate_plugin_commands(project: &Project, catalog: &dyn CommandCatalog) -> Vec<ValidationError> {
    let checker = CommandChecker { project, catalog };
    let mut errs = Vec::new();

    for (name, body) in &project.functions {
        let section = Section::Function(name);
        for cmd in body.commands() {
            if let Some(CommandRef::Function(nested)) = cmd.resolve() {
                errs.push(ValidationError::error(format!(
                    "{}: cannot reference a function within a function ('{}')",
                    section, nested
                )));
            }
            errs.extend(checker.check(section, cmd));
        }
    }

    for (hook, set) in project.hooks() {
        for cmd in set.commands() {
            errs.extend(checker.check(Section::Hook(hook), cmd));
        }
    }

    for task in &project.tasks {
        for cmd in &task.commands {
            errs.extend(checker.check(Section::Task(&task.name), cmd));
        }
    }

    errs
}
