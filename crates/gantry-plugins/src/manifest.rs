//! Command manifests and parameter schemas.

use gantry_core::expansion::is_expandable;
use gantry_core::{ParamError, Params};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Manifest describing a command and the parameters it accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandManifest {
    /// Two-part command name (e.g., "archive.targz_pack").
    pub name: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// Accepted parameters. Anything not listed is ignored.
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

/// A single named parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
}

/// The shape a parameter value must have.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamKind {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<StringFormat>,
    },
    Bool,
    Integer,
    StringList,
    Object {
        fields: Vec<ParamSpec>,
    },
    List {
        items: Box<ParamKind>,
    },
}

/// Content rules for string parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    /// An S3 bucket name.
    S3Bucket,
    /// A canned S3 access control list.
    S3Permissions,
}

const S3_PERMISSIONS: &[&str] = &[
    "private",
    "public-read",
    "public-read-write",
    "authenticated-read",
    "bucket-owner-read",
    "bucket-owner-full-control",
];

impl CommandManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            params: vec![],
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Check parameters against this manifest, stopping at the first problem.
    pub fn check(&self, params: &Params) -> Result<(), ParamError> {
        check_fields(&self.params, |name| params.get(name), "")
    }
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }
}

impl ParamKind {
    pub fn string() -> Self {
        ParamKind::String { format: None }
    }

    pub fn formatted(format: StringFormat) -> Self {
        ParamKind::String {
            format: Some(format),
        }
    }

    pub fn object(fields: Vec<ParamSpec>) -> Self {
        ParamKind::Object { fields }
    }

    pub fn list_of(items: ParamKind) -> Self {
        ParamKind::List {
            items: Box::new(items),
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            ParamKind::String { .. } => "a string",
            ParamKind::Bool => "a boolean",
            ParamKind::Integer => "an integer",
            ParamKind::StringList => "a list of strings",
            ParamKind::Object { .. } => "a map",
            ParamKind::List { .. } => "a list",
        }
    }

    /// Check one value. Strings containing expansion placeholders pass
    /// without format checks, and may stand in for scalars.
    fn check(&self, value: &Value, path: &str) -> Result<(), ParamError> {
        let wrong_type = || ParamError::WrongType {
            path: path.to_string(),
            expected: self.expected(),
        };

        match (self, value) {
            (ParamKind::String { format }, Value::String(s)) => match format {
                Some(format) if !is_expandable(s) => {
                    format.check(s).map_err(|message| ParamError::Invalid {
                        path: path.to_string(),
                        message,
                    })
                }
                _ => Ok(()),
            },
            (ParamKind::Bool, Value::Bool(_)) => Ok(()),
            (ParamKind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(()),
            (ParamKind::Bool | ParamKind::Integer, Value::String(s)) if is_expandable(s) => Ok(()),
            (ParamKind::StringList, Value::Array(items)) => {
                if items.iter().all(Value::is_string) {
                    Ok(())
                } else {
                    Err(wrong_type())
                }
            }
            (ParamKind::StringList, Value::String(s)) if is_expandable(s) => Ok(()),
            (ParamKind::Object { fields }, Value::Object(map)) => {
                check_fields(fields, |name| map.get(name), path)
            }
            (ParamKind::List { items }, Value::Array(values)) => values
                .iter()
                .enumerate()
                .try_for_each(|(i, v)| items.check(v, &format!("{}[{}]", path, i))),
            _ => Err(wrong_type()),
        }
    }
}

impl StringFormat {
    fn check(&self, value: &str) -> Result<(), String> {
        match self {
            StringFormat::S3Bucket => validate_s3_bucket_name(value),
            StringFormat::S3Permissions => {
                if S3_PERMISSIONS.contains(&value) {
                    Ok(())
                } else {
                    Err(format!("'{}' is not a valid S3 permission", value))
                }
            }
        }
    }
}

fn check_fields<'a, F>(fields: &[ParamSpec], get: F, prefix: &str) -> Result<(), ParamError>
where
    F: Fn(&str) -> Option<&'a Value>,
{
    for spec in fields {
        let path = if prefix.is_empty() {
            spec.name.clone()
        } else {
            format!("{}.{}", prefix, spec.name)
        };

        let value = match get(&spec.name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(v) => Some(v),
        };

        match value {
            None if spec.required => return Err(ParamError::Missing(path)),
            None => continue,
            Some(Value::Array(items)) if spec.required && items.is_empty() => {
                return Err(ParamError::Invalid {
                    path,
                    message: "must not be empty".to_string(),
                });
            }
            Some(v) => spec.kind.check(v, &path)?,
        }
    }
    Ok(())
}

/// Check a bucket name against S3's naming rules.
pub fn validate_s3_bucket_name(bucket: &str) -> Result<(), String> {
    if bucket.len() < 3 {
        return Err("bucket name must be at least 3 characters".to_string());
    }
    if bucket.len() > 63 {
        return Err("bucket name must be no more than 63 characters".to_string());
    }
    if bucket.starts_with(['.', '-']) {
        return Err("bucket name must not start with '.' or '-'".to_string());
    }
    if bucket.ends_with(['.', '-']) {
        return Err("bucket name must not end with '.' or '-'".to_string());
    }
    if bucket.contains("..") {
        return Err("bucket name must not contain '..'".to_string());
    }
    if !bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
    {
        return Err(
            "bucket name may only contain lowercase letters, numbers, '.' and '-'".to_string(),
        );
    }
    let parts: Vec<&str> = bucket.split('.').collect();
    if parts.len() == 4 && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        return Err("bucket name must not be formatted as an IP address".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        serde_json::from_value(value).unwrap()
    }

    fn copy_manifest() -> CommandManifest {
        let location = ParamKind::object(vec![
            ParamSpec::required("bucket", ParamKind::formatted(StringFormat::S3Bucket)),
            ParamSpec::required("path", ParamKind::string()),
        ]);
        CommandManifest::new("s3Copy.copy").param(ParamSpec::required(
            "files",
            ParamKind::list_of(ParamKind::object(vec![
                ParamSpec::required("source", location.clone()),
                ParamSpec::required("destination", location),
            ])),
        ))
    }

    #[test]
    fn test_missing_required_param() {
        let manifest = CommandManifest::new("git.get_project")
            .param(ParamSpec::required("directory", ParamKind::string()));
        assert_eq!(
            manifest.check(&params(json!({}))),
            Err(ParamError::Missing("directory".to_string()))
        );
        assert_eq!(
            manifest.check(&params(json!({"directory": ""}))),
            Err(ParamError::Missing("directory".to_string()))
        );
        assert!(manifest.check(&params(json!({"directory": "src", "extra": 1}))).is_ok());
    }

    #[test]
    fn test_nested_paths_in_errors() {
        let bad = params(json!({
            "files": [
                {"source": {"bucket": "abcde", "path": "a"}, "destination": {"bucket": "abcde", "path": "b"}},
                {"source": {"bucket": "abcde", "path": "a"}, "destination": {"bucket": "..nope", "path": "b"}}
            ]
        }));
        match copy_manifest().check(&bad) {
            Err(ParamError::Invalid { path, .. }) => assert_eq!(path, "files[1].destination.bucket"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_expandable_values_skip_format_checks() {
        let ok = params(json!({
            "files": [
                {"source": {"bucket": "abcde", "path": "a"}, "destination": {"bucket": "${..nope}", "path": "b"}}
            ]
        }));
        assert!(copy_manifest().check(&ok).is_ok());
    }

    #[test]
    fn test_wrong_types() {
        let manifest = CommandManifest::new("shell.exec")
            .param(ParamSpec::required("script", ParamKind::string()))
            .param(ParamSpec::optional("background", ParamKind::Bool))
            .param(ParamSpec::optional("include", ParamKind::StringList));

        assert!(matches!(
            manifest.check(&params(json!({"script": ["a"]}))),
            Err(ParamError::WrongType { expected: "a string", .. })
        ));
        assert!(matches!(
            manifest.check(&params(json!({"script": "make", "background": "yes"}))),
            Err(ParamError::WrongType { expected: "a boolean", .. })
        ));
        assert!(manifest.check(&params(json!({"script": "make", "background": "${bg}"}))).is_ok());
        assert!(matches!(
            manifest.check(&params(json!({"script": "make", "include": [1]}))),
            Err(ParamError::WrongType { expected: "a list of strings", .. })
        ));
    }

    #[test]
    fn test_required_list_must_not_be_empty() {
        let result = copy_manifest().check(&params(json!({"files": []})));
        assert!(matches!(result, Err(ParamError::Invalid { .. })));
    }

    #[test]
    fn test_s3_bucket_names() {
        for good in ["abcde", "long3nough", "my.bucket-1", "abc"] {
            assert!(validate_s3_bucket_name(good).is_ok(), "{}", good);
        }
        for bad in [
            "ab",
            "..long-but-invalid",
            "-abc",
            "abc.",
            "a..b",
            "Upper",
            "under_score",
            "192.168.1.1",
        ] {
            assert!(validate_s3_bucket_name(bad).is_err(), "{}", bad);
        }
        assert!(validate_s3_bucket_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_manifest_serializes_kinds() {
        let json = serde_json::to_value(copy_manifest()).unwrap();
        assert_eq!(json["params"][0]["kind"]["type"], "list");
    }
}
