//! Command declarations and their resolution.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters passed to a catalog command.
pub type Params = HashMap<String, serde_json::Value>;

/// A single entry in a task, function body, or hook section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Command {
    /// Name of a project function to run in place of this entry.
    #[serde(rename = "func", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Two-part catalog command name, e.g. `archive.targz_pack`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: Params,
    /// Execution mode for this command, overriding the project's.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// What a [`Command`] refers to once resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandRef<'a> {
    /// Run the body of the named project function.
    Function(&'a str),
    /// Run a catalog command with the given parameters.
    Direct { name: &'a str, params: &'a Params },
}

impl Command {
    /// A direct catalog command with no parameters.
    pub fn direct(name: impl Into<String>) -> Self {
        Self {
            command: Some(name.into()),
            ..Default::default()
        }
    }

    /// A call to a project function.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            function: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = params {
            self.params = map.into_iter().collect();
        }
        self
    }

    /// Resolve this entry to what it runs. A function reference takes
    /// precedence over a command name; an entry with neither resolves to
    /// `None`.
    pub fn resolve(&self) -> Option<CommandRef<'_>> {
        if let Some(func) = self.function.as_deref().filter(|f| !f.is_empty()) {
            return Some(CommandRef::Function(func));
        }
        self.command
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|name| CommandRef::Direct {
                name,
                params: &self.params,
            })
    }

    /// Human-readable label used in validation messages.
    pub fn label(&self) -> String {
        match self.resolve() {
            Some(CommandRef::Function(name)) => format!("'{}' function", name),
            Some(CommandRef::Direct { name, .. }) => format!("'{}' command", name),
            None => "unnamed command".to_string(),
        }
    }
}

/// Either one command or a list of them, as written in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CommandSet {
    Multi(Vec<Command>),
    Single(Command),
}

impl CommandSet {
    pub fn commands(&self) -> &[Command] {
        match self {
            CommandSet::Single(cmd) => std::slice::from_ref(cmd),
            CommandSet::Multi(cmds) => cmds,
        }
    }
}

impl From<Vec<Command>> for CommandSet {
    fn from(cmds: Vec<Command>) -> Self {
        CommandSet::Multi(cmds)
    }
}

impl From<Command> for CommandSet {
    fn from(cmd: Command) -> Self {
        CommandSet::Single(cmd)
    }
}
