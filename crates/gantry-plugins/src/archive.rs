//! `archive.*` commands: pack and unpack tarballs.

use crate::manifest::{CommandManifest, ParamKind, ParamSpec};
use crate::{PluginCommand, SchemaCommand};
use std::sync::Arc;

pub fn commands() -> Vec<Arc<dyn PluginCommand>> {
    let pack = CommandManifest::new("archive.targz_pack")
        .describe("Create a gzipped tarball from files matching include patterns")
        .param(ParamSpec::required("target", ParamKind::string()))
        .param(ParamSpec::required("source_dir", ParamKind::string()))
        .param(ParamSpec::required("include", ParamKind::StringList))
        .param(ParamSpec::optional("exclude_files", ParamKind::StringList));

    let extract = CommandManifest::new("archive.targz_extract")
        .describe("Extract a gzipped tarball")
        .param(ParamSpec::required("path", ParamKind::string()))
        .param(ParamSpec::required("destination", ParamKind::string()))
        .param(ParamSpec::optional("exclude_files", ParamKind::StringList));

    vec![
        Arc::new(SchemaCommand::new(pack)),
        Arc::new(SchemaCommand::new(extract)),
    ]
}
