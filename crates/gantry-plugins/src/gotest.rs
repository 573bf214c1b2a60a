//! `gotest.run`: run Go test suites and parse their output.

use crate::manifest::{CommandManifest, ParamKind, ParamSpec};
use crate::{PluginCommand, SchemaCommand};
use std::sync::Arc;

pub fn commands() -> Vec<Arc<dyn PluginCommand>> {
    let test = ParamKind::object(vec![
        ParamSpec::required("dir", ParamKind::string()),
        ParamSpec::optional("args", ParamKind::string()),
    ]);

    let run = CommandManifest::new("gotest.run")
        .describe("Run Go tests in one or more directories")
        .param(ParamSpec::required("working_dir", ParamKind::string()))
        .param(ParamSpec::required("tests", ParamKind::list_of(test)));

    vec![Arc::new(SchemaCommand::new(run))]
}
