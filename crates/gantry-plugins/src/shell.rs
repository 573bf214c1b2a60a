//! `shell.*` commands: run scripts and manage spawned processes.

use crate::manifest::{CommandManifest, ParamKind, ParamSpec};
use crate::{PluginCommand, SchemaCommand};
use std::sync::Arc;

pub fn commands() -> Vec<Arc<dyn PluginCommand>> {
    let exec = CommandManifest::new("shell.exec")
        .describe("Run a shell script in the task's working directory")
        .param(ParamSpec::required("script", ParamKind::string()))
        .param(ParamSpec::optional("working_dir", ParamKind::string()))
        .param(ParamSpec::optional("shell", ParamKind::string()))
        .param(ParamSpec::optional("background", ParamKind::Bool))
        .param(ParamSpec::optional("silent", ParamKind::Bool))
        .param(ParamSpec::optional("continue_on_err", ParamKind::Bool))
        .param(ParamSpec::optional("system_log", ParamKind::Bool));

    let track = CommandManifest::new("shell.track")
        .describe("Record processes spawned by the task for later cleanup");

    let cleanup = CommandManifest::new("shell.cleanup")
        .describe("Kill processes recorded by shell.track");

    vec![
        Arc::new(SchemaCommand::new(exec)),
        Arc::new(SchemaCommand::new(track)),
        Arc::new(SchemaCommand::new(cleanup)),
    ]
}
