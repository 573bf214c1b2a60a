//! `s3.*` and `s3Copy.copy` commands: move files to and from S3.

use crate::manifest::{CommandManifest, ParamKind, ParamSpec, StringFormat};
use crate::{PluginCommand, SchemaCommand};
use gantry_core::{ParamError, Params};
use std::sync::Arc;

fn credentials(manifest: CommandManifest) -> CommandManifest {
    manifest
        .param(ParamSpec::required("aws_key", ParamKind::string()))
        .param(ParamSpec::required("aws_secret", ParamKind::string()))
}

fn bucket() -> ParamKind {
    ParamKind::formatted(StringFormat::S3Bucket)
}

pub fn commands() -> Vec<Arc<dyn PluginCommand>> {
    let put = credentials(CommandManifest::new("s3.put"))
        .describe("Upload a local file to S3")
        .param(ParamSpec::required("local_file", ParamKind::string()))
        .param(ParamSpec::required("remote_file", ParamKind::string()))
        .param(ParamSpec::required("bucket", bucket()))
        .param(ParamSpec::required("content_type", ParamKind::string()))
        .param(ParamSpec::required(
            "permissions",
            ParamKind::formatted(StringFormat::S3Permissions),
        ))
        .param(ParamSpec::optional("display_name", ParamKind::string()))
        .param(ParamSpec::optional("optional", ParamKind::Bool))
        .param(ParamSpec::optional("build_variants", ParamKind::StringList));

    let location = ParamKind::object(vec![
        ParamSpec::required("bucket", bucket()),
        ParamSpec::required("path", ParamKind::string()),
    ]);
    let copy_file = ParamKind::object(vec![
        ParamSpec::required("source", location.clone()),
        ParamSpec::required("destination", location),
        ParamSpec::optional("build_variants", ParamKind::StringList),
        ParamSpec::optional("optional", ParamKind::Bool),
    ]);
    let copy = credentials(CommandManifest::new("s3Copy.copy"))
        .describe("Copy files between S3 locations")
        .param(ParamSpec::required("s3_copy_files", ParamKind::list_of(copy_file)));

    vec![
        Arc::new(SchemaCommand::new(put)),
        Arc::new(S3Get::new()),
        Arc::new(SchemaCommand::new(copy)),
    ]
}

/// `s3.get` downloads to a file or extracts into a directory, never both.
pub struct S3Get {
    manifest: CommandManifest,
}

impl S3Get {
    pub fn new() -> Self {
        let manifest = credentials(CommandManifest::new("s3.get"))
            .describe("Download a file from S3, optionally extracting it")
            .param(ParamSpec::required("remote_file", ParamKind::string()))
            .param(ParamSpec::required("bucket", bucket()))
            .param(ParamSpec::optional("local_file", ParamKind::string()))
            .param(ParamSpec::optional("extract_to", ParamKind::string()))
            .param(ParamSpec::optional("build_variants", ParamKind::StringList));
        Self { manifest }
    }
}

impl Default for S3Get {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginCommand for S3Get {
    fn manifest(&self) -> &CommandManifest {
        &self.manifest
    }

    fn validate(&self, params: &Params) -> Result<(), ParamError> {
        self.manifest.check(params)?;

        let is_set = |key: &str| {
            params
                .get(key)
                .and_then(|v| v.as_str())
                .is_some_and(|s| !s.is_empty())
        };
        match (is_set("local_file"), is_set("extract_to")) {
            (true, false) | (false, true) => Ok(()),
            (true, true) => Err(ParamError::Invalid {
                path: "local_file".to_string(),
                message: "cannot be set together with 'extract_to'".to_string(),
            }),
            (false, false) => Err(ParamError::Missing("local_file".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CommandRegistry;
    use gantry_core::CommandCatalog;
    use serde_json::{Value, json};

    fn params(value: Value) -> Params {
        serde_json::from_value(value).unwrap()
    }

    fn copy_params(destination_bucket: &str) -> Params {
        params(json!({
            "aws_key": "key",
            "aws_secret": "sec",
            "s3_copy_files": [{
                "source": {"bucket": "long3nough", "path": "fghij"},
                "destination": {"bucket": destination_bucket, "path": "fghij"}
            }]
        }))
    }

    #[test]
    fn test_copy_rejects_invalid_bucket() {
        let registry = CommandRegistry::builtin();
        assert!(matches!(
            registry.check_params("s3Copy.copy", &copy_params("..long-but-invalid")),
            Err(ParamError::Invalid { .. })
        ));
        assert!(registry.check_params("s3Copy.copy", &copy_params("abcde")).is_ok());
        assert!(
            registry
                .check_params("s3Copy.copy", &copy_params("${..longButInvalid}"))
                .is_ok()
        );
    }

    #[test]
    fn test_get_needs_exactly_one_destination() {
        let get = S3Get::new();
        let base = json!({
            "aws_key": "key",
            "aws_secret": "sec",
            "remote_file": "artifacts/app.tgz",
            "bucket": "mciuploads"
        });

        assert_eq!(
            get.validate(&params(base.clone())),
            Err(ParamError::Missing("local_file".to_string()))
        );

        let mut both = base.clone();
        both["local_file"] = json!("app.tgz");
        both["extract_to"] = json!("app");
        assert!(matches!(
            get.validate(&params(both)),
            Err(ParamError::Invalid { .. })
        ));

        let mut one = base;
        one["extract_to"] = json!("app");
        assert!(get.validate(&params(one)).is_ok());
    }

    #[test]
    fn test_put_checks_permissions() {
        let registry = CommandRegistry::builtin();
        let mut put = json!({
            "aws_key": "key",
            "aws_secret": "sec",
            "local_file": "app.tgz",
            "remote_file": "builds/app.tgz",
            "bucket": "mciuploads",
            "content_type": "application/x-gzip",
            "permissions": "public-read"
        });
        assert!(registry.check_params("s3.put", &params(put.clone())).is_ok());

        put["permissions"] = json!("everyone");
        assert!(matches!(
            registry.check_params("s3.put", &params(put)),
            Err(ParamError::Invalid { .. })
        ));
    }
}
