//! Project document types.
//!
//! These types represent the user-authored project YAML configuration.
//! Field values that the validator must judge (status tokens, command types,
//! batch intervals) are kept as written so that a bad value becomes a
//! validation finding instead of a parse failure.

use crate::command::{Command, CommandSet};
use crate::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Task name wildcard: depend on every other task in the variant.
pub const ALL_DEPENDENCIES: &str = "*";
/// Variant name wildcard: depend on the task in every variant that has it.
pub const ALL_VARIANTS: &str = "*";

/// Dependency status satisfied by a successful upstream task (the default).
pub const TASK_SUCCEEDED: &str = "success";
/// Dependency status satisfied by a failed upstream task.
pub const TASK_FAILED: &str = "failed";
/// Dependency status satisfied by any upstream outcome.
pub const ALL_STATUSES: &str = "*";

/// Recognized dependency status tokens. An empty status means success.
pub const VALID_DEPENDENCY_STATUSES: &[&str] = &[TASK_SUCCEEDED, TASK_FAILED, ALL_STATUSES];

/// Recognized command execution modes, for projects and single commands.
pub const VALID_COMMAND_TYPES: &[&str] = &["setup", "system", "test"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub stepback: bool,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub repokind: String,
    /// Minutes between batched activations. Negative values are a finding.
    #[serde(default)]
    pub batchtime: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<CommandSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<CommandSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<CommandSet>,
    #[serde(default)]
    pub functions: BTreeMap<String, CommandSet>,
    #[serde(default)]
    pub tasks: Vec<ProjectTask>,
    #[serde(default)]
    pub buildvariants: Vec<BuildVariant>,
}

impl Project {
    /// Parse a project from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a project from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ProjectNotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Look up a project task by name.
    pub fn task(&self, name: &str) -> Option<&ProjectTask> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Look up a build variant by name.
    pub fn variant(&self, name: &str) -> Option<&BuildVariant> {
        self.buildvariants.iter().find(|bv| bv.name == name)
    }

    /// The project-wide hook sections that are set, labelled by section name.
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, &CommandSet)> {
        [
            ("pre", self.pre.as_ref()),
            ("post", self.post.as_ref()),
            ("timeout", self.timeout.as_ref()),
        ]
        .into_iter()
        .filter_map(|(section, set)| set.map(|s| (section, s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectTask {
    pub name: String,
    #[serde(default)]
    pub depends_on: Vec<TaskDependency>,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl ProjectTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn depends_on(mut self, deps: impl IntoIterator<Item = TaskDependency>) -> Self {
        self.depends_on = deps.into_iter().collect();
        self
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

/// A reference from one task to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskDependency {
    /// Concrete task name, or [`ALL_DEPENDENCIES`].
    pub name: String,
    /// Empty for the dependent's own variant, a variant name, or [`ALL_VARIANTS`].
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub variant: String,
    /// Empty for success, otherwise one of [`VALID_DEPENDENCY_STATUSES`].
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

impl TaskDependency {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn in_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn is_all_dependencies(&self) -> bool {
        self.name == ALL_DEPENDENCIES
    }

    pub fn is_all_variants(&self) -> bool {
        self.variant == ALL_VARIANTS
    }

    pub fn has_valid_status(&self) -> bool {
        self.status.is_empty() || VALID_DEPENDENCY_STATUSES.contains(&self.status.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BuildVariant {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub run_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batchtime: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expansions: BTreeMap<String, String>,
    #[serde(default)]
    pub tasks: Vec<BuildVariantTask>,
}

impl BuildVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn run_on(mut self, distros: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.run_on = distros.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_task(mut self, task: BuildVariantTask) -> Self {
        self.tasks.push(task);
        self
    }
}

/// A task scheduled within a build variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BuildVariantTask {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distros: Vec<String>,
    /// Variant-level dependency override.
    ///
    /// `None` inherits the project task's list. `Some(vec![])` clears all
    /// dependencies for this variant. `Some(list)` replaces the project
    /// task's list outright; the two are never merged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<TaskDependency>>,
}

impl BuildVariantTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn on_distros(mut self, distros: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.distros = distros.into_iter().map(Into::into).collect();
        self
    }

    pub fn override_depends_on(mut self, deps: impl IntoIterator<Item = TaskDependency>) -> Self {
        self.depends_on = Some(deps.into_iter().collect());
        self
    }

    /// The dependency list that applies to this task in this variant.
    pub fn effective_depends_on<'a>(&'a self, task: Option<&'a ProjectTask>) -> &'a [TaskDependency] {
        match &self.depends_on {
            Some(deps) => deps,
            None => task.map(|t| t.depends_on.as_slice()).unwrap_or_default(),
        }
    }
}
