//! Process-wide registry of executable commands.

use crate::manifest::CommandManifest;
use crate::{PluginCommand, builtin_commands, split_name};
use dashmap::DashMap;
use gantry_core::{CommandCatalog, ParamError, Params};
use std::sync::{Arc, LazyLock};
use tracing::debug;

static BUILTIN: LazyLock<CommandRegistry> = LazyLock::new(CommandRegistry::builtin);

/// The shared registry holding every built-in command.
pub fn registry() -> &'static CommandRegistry {
    &BUILTIN
}

/// Mapping from two-part command name to its implementation.
#[derive(Default)]
pub struct CommandRegistry {
    commands: DashMap<String, Arc<dyn PluginCommand>>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding all built-in commands.
    pub fn builtin() -> Self {
        let registry = Self::new();
        for command in builtin_commands() {
            registry.register(command);
        }
        registry
    }

    /// Register a command, returning any command it replaced.
    pub fn register(&self, command: Arc<dyn PluginCommand>) -> Option<Arc<dyn PluginCommand>> {
        let name = command.name().to_string();
        debug!(command = %name, "Registering command");
        self.commands.insert(name, command)
    }

    /// Get a command by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PluginCommand>> {
        self.commands.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// List all command names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Manifests of all commands, sorted by name.
    pub fn manifests(&self) -> Vec<CommandManifest> {
        let mut manifests: Vec<CommandManifest> = self
            .commands
            .iter()
            .map(|e| e.value().manifest().clone())
            .collect();
        manifests.sort_by(|a, b| a.name.cmp(&b.name));
        manifests
    }

    /// Get the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandCatalog for CommandRegistry {
    fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    fn check_params(&self, name: &str, params: &Params) -> Result<(), ParamError> {
        if split_name(name).is_none() {
            return Err(ParamError::MalformedName(name.to_string()));
        }
        let command = self
            .get(name)
            .ok_or_else(|| ParamError::UnknownCommand(name.to_string()))?;
        command.validate(params)
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
