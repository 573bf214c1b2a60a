//! `expansions.update`: change expansion values for later commands.

use crate::manifest::{CommandManifest, ParamKind, ParamSpec};
use crate::{PluginCommand, SchemaCommand};
use std::sync::Arc;

pub fn commands() -> Vec<Arc<dyn PluginCommand>> {
    let update = ParamKind::object(vec![
        ParamSpec::required("key", ParamKind::string()),
        ParamSpec::optional("value", ParamKind::string()),
        ParamSpec::optional("concat", ParamKind::string()),
    ]);

    let manifest = CommandManifest::new("expansions.update")
        .describe("Set or append to expansions, inline or from a YAML file")
        .param(ParamSpec::optional("updates", ParamKind::list_of(update)))
        .param(ParamSpec::optional("file", ParamKind::string()));

    vec![Arc::new(SchemaCommand::new(manifest))]
}
