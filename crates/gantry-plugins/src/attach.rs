//! `attach.*` commands: attach test results to the task.

use crate::manifest::{CommandManifest, ParamKind, ParamSpec};
use crate::{PluginCommand, SchemaCommand};
use std::sync::Arc;

pub fn commands() -> Vec<Arc<dyn PluginCommand>> {
    let results = CommandManifest::new("attach.results")
        .describe("Attach a JSON results file")
        .param(ParamSpec::required("file_location", ParamKind::string()));

    let xunit = CommandManifest::new("attach.xunit_results")
        .describe("Attach an XUnit XML results file")
        .param(ParamSpec::required("file", ParamKind::string()));

    vec![
        Arc::new(SchemaCommand::new(results)),
        Arc::new(SchemaCommand::new(xunit)),
    ]
}
