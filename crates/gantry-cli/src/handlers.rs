//! Command handlers.

use crate::config::{CliConfig, OutputFormat};
use anyhow::{Context, Result, anyhow};
use console::style;
use gantry_core::Project;
use gantry_plugins::{ParamKind, registry};
use gantry_validator::{
    DependencyGraph, FindingsExt, Level, ValidationError, validate_semantics, validate_syntax,
};
use std::path::Path;

/// Options for `gantry validate`, after merging flags with the config file.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub syntax_only: bool,
    pub distros: Vec<String>,
    pub strict: bool,
    pub format: OutputFormat,
}

async fn load_project(path: &str) -> Result<Project> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path))?;
    Project::from_yaml_str(&content).with_context(|| format!("failed to parse {}", path))
}

/// Write a starter project file.
pub async fn init(path: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{} {} already exists", style("!").yellow(), path);
        return Ok(());
    }

    let template = r#"identifier: my-project
functions:
  fetch source:
    - command: git.get_project
      params:
        directory: src

tasks:
  - name: compile
    commands:
      - func: fetch source
      - command: shell.exec
        params:
          working_dir: src
          script: make build

  - name: test
    depends_on:
      - name: compile
    commands:
      - func: fetch source
      - command: shell.exec
        params:
          working_dir: src
          script: make test

buildvariants:
  - name: linux
    display_name: Linux
    run_on:
      - ubuntu2204
    tasks:
      - name: compile
      - name: test
"#;

    tokio::fs::write(path, template).await?;
    println!("{} Created {}", style("✓").green(), path);
    Ok(())
}

/// Validate a project file. Returns whether it passed.
pub async fn validate(path: &str, options: &ValidateOptions) -> Result<bool> {
    let project = load_project(path).await?;

    let findings = if options.syntax_only {
        validate_syntax(&project, registry())
    } else {
        if options.distros.is_empty() {
            eprintln!(
                "{} No distros configured; every run_on distro will be reported. \
                 Use --distros or `gantry config set distros`.",
                style("!").yellow()
            );
        }
        validate_semantics(&project, registry(), &options.distros)
    };

    match options.format {
        OutputFormat::Table => print_findings(path, &findings),
        format => println!("{}", render_findings(&findings, format)?),
    }

    let failed = findings.has_errors() || (options.strict && findings.count(Level::Warning) > 0);
    Ok(!failed)
}

fn print_findings(path: &str, findings: &[ValidationError]) {
    for finding in findings {
        let marker = match finding.level {
            Level::Error => style("✗").red(),
            Level::Warning => style("!").yellow(),
        };
        println!("  {} {}", marker, finding.message);
    }

    let errors = findings.count(Level::Error);
    let warnings = findings.count(Level::Warning);
    if errors == 0 {
        println!(
            "{} {} is valid ({} warnings)",
            style("✓").green(),
            path,
            warnings
        );
    } else {
        println!(
            "{} {} has {} errors and {} warnings",
            style("✗").red(),
            path,
            errors,
            warnings
        );
    }
}

/// Serialize findings for machine consumption.
pub fn render_findings(findings: &[ValidationError], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(findings)?,
        OutputFormat::Yaml => serde_yaml::to_string(findings)?,
        OutputFormat::Table => findings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Print the dependency graph, or an execution order.
pub async fn graph(path: &str, order: bool) -> Result<()> {
    let project = load_project(path).await?;
    let graph = DependencyGraph::build(&project);

    if order {
        for (i, node) in graph.execution_order()?.iter().enumerate() {
            println!("{:>3}. {} {}", i + 1, node.task, style(node.variant).dim());
        }
        return Ok(());
    }

    for &node in graph.nodes() {
        println!("{} {}", style(node.task).bold(), style(node.variant).dim());
        for dep in graph.dependencies_of(node) {
            if graph.is_scheduled(dep) {
                println!("  -> {} {}", dep.task, style(dep.variant).dim());
            } else {
                println!(
                    "  -> {} {} {}",
                    dep.task,
                    style(dep.variant).dim(),
                    style("(not scheduled)").red()
                );
            }
        }
    }
    Ok(())
}

/// List registered commands, or show one command's parameters.
pub fn list_commands(name: Option<&str>) -> Result<()> {
    let Some(name) = name else {
        for manifest in registry().manifests() {
            println!(
                "{:<24} {}",
                style(&manifest.name).bold(),
                manifest.description.as_deref().unwrap_or("")
            );
        }
        return Ok(());
    };

    let command = registry()
        .get(name)
        .ok_or_else(|| anyhow!("no command named '{}' is registered", name))?;
    let manifest = command.manifest();
    println!("{}", style(&manifest.name).bold());
    if let Some(description) = &manifest.description {
        println!("  {}", description);
    }
    for spec in &manifest.params {
        let required = if spec.required { "required" } else { "optional" };
        println!(
            "  {:<20} {:<14} {}",
            spec.name,
            describe_kind(&spec.kind),
            style(required).dim()
        );
    }
    Ok(())
}

fn describe_kind(kind: &ParamKind) -> String {
    match kind {
        ParamKind::String { format: None } => "string".to_string(),
        ParamKind::String { format: Some(f) } => format!("string ({:?})", f),
        ParamKind::Bool => "bool".to_string(),
        ParamKind::Integer => "integer".to_string(),
        ParamKind::StringList => "[string]".to_string(),
        ParamKind::Object { .. } => "map".to_string(),
        ParamKind::List { items } => format!("[{}]", describe_kind(items)),
    }
}

/// Print the JSON schema of a project document.
pub fn schema() -> Result<()> {
    let schema = schemars::schema_for!(Project);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Show configuration.
pub fn show_config(config: &CliConfig) -> Result<()> {
    println!("Configuration:");
    println!("  Path: {}", CliConfig::config_path()?.display());
    println!("  Distros: {}", config.distros.join(", "));
    println!("  Output format: {:?}", config.output_format);
    println!("  Strict: {}", config.strict);
    Ok(())
}

/// Set a configuration value.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = CliConfig::load()?;
    config.set(key, value)?;
    config.save()?;
    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_json() {
        let findings = vec![ValidationError::error("task 'compile' does not contain any commands")];
        let json: serde_json::Value =
            serde_json::from_str(&render_findings(&findings, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json[0]["level"], "error");
        assert_eq!(json[0]["message"], "task 'compile' does not contain any commands");
    }

    #[test]
    fn test_render_yaml_round_trips() {
        let findings = vec![ValidationError::warning("task 'lint' is not scheduled")];
        let yaml = render_findings(&findings, OutputFormat::Yaml).unwrap();
        let parsed: Vec<ValidationError> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, findings);
    }

    #[test]
    fn test_describe_nested_kinds() {
        assert_eq!(
            describe_kind(&ParamKind::list_of(ParamKind::StringList)),
            "[[string]]"
        );
    }

    #[tokio::test]
    async fn test_validate_starter_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gantry.yml");
        let path = path.to_str().unwrap();

        init(path).await.unwrap();
        let options = ValidateOptions {
            syntax_only: false,
            distros: vec!["ubuntu2204".to_string()],
            strict: true,
            format: OutputFormat::Json,
        };
        assert!(validate(path, &options).await.unwrap());

        let no_distros = ValidateOptions {
            distros: vec![],
            ..options
        };
        assert!(!validate(path, &no_distros).await.unwrap());
    }
}
