//! Command catalog for Gantry CI.
//!
//! Every command a project may reference is registered here under a
//! two-part `plugin.command` name together with the schema its parameters
//! must satisfy. The validator only sees this crate through
//! [`gantry_core::CommandCatalog`].

pub mod manifest;
pub mod registry;

pub mod archive;
pub mod attach;
pub mod expansions;
pub mod git;
pub mod gotest;
pub mod s3;
pub mod shell;

pub use manifest::{CommandManifest, ParamKind, ParamSpec, StringFormat};
pub use registry::{CommandRegistry, registry};

use gantry_core::{ParamError, Params};
use std::sync::Arc;

/// A command that agents know how to run.
pub trait PluginCommand: Send + Sync {
    /// The command's name and parameter schema.
    fn manifest(&self) -> &CommandManifest;

    /// Get the two-part command name.
    fn name(&self) -> &str {
        &self.manifest().name
    }

    /// Check caller-supplied parameters. The default walks the manifest
    /// schema; commands with rules spanning several parameters override it.
    fn validate(&self, params: &Params) -> Result<(), ParamError> {
        self.manifest().check(params)
    }
}

/// A command whose parameters are fully described by its manifest.
#[derive(Debug, Clone)]
pub struct SchemaCommand {
    manifest: CommandManifest,
}

impl SchemaCommand {
    pub fn new(manifest: CommandManifest) -> Self {
        Self { manifest }
    }
}

impl PluginCommand for SchemaCommand {
    fn manifest(&self) -> &CommandManifest {
        &self.manifest
    }
}

/// All commands shipped with Gantry.
pub fn builtin_commands() -> Vec<Arc<dyn PluginCommand>> {
    let mut commands = Vec::new();
    commands.extend(archive::commands());
    commands.extend(attach::commands());
    commands.extend(expansions::commands());
    commands.extend(git::commands());
    commands.extend(gotest::commands());
    commands.extend(s3::commands());
    commands.extend(shell::commands());
    commands
}

/// Split a command name into its plugin and command parts.
pub fn split_name(name: &str) -> Option<(&str, &str)> {
    let (plugin, command) = name.split_once('.')?;
    if plugin.is_empty() || command.is_empty() || command.contains('.') {
        return None;
    }
    Some((plugin, command))
}
