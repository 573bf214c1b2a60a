//! `git.*` commands: fetch sources and apply patches.

use crate::manifest::{CommandManifest, ParamKind, ParamSpec};
use crate::{PluginCommand, SchemaCommand};
use std::sync::Arc;

pub fn commands() -> Vec<Arc<dyn PluginCommand>> {
    let get_project = CommandManifest::new("git.get_project")
        .describe("Clone the project at the revision under test")
        .param(ParamSpec::required("directory", ParamKind::string()))
        .param(ParamSpec::optional("revisions", ParamKind::object(vec![])));

    let apply_patch = CommandManifest::new("git.apply_patch")
        .describe("Apply a patch build's changes to the cloned project")
        .param(ParamSpec::required("directory", ParamKind::string()));

    vec![
        Arc::new(SchemaCommand::new(get_project)),
        Arc::new(SchemaCommand::new(apply_patch)),
    ]
}
