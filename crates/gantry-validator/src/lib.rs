//! Project configuration validation for Gantry CI.
//!
//! Validation is a pure function from a project document (plus read-only
//! collaborators) to an ordered list of findings:
//!
//! 1. **Syntax**: structural checks, the task dependency graph and its
//!    cycles, and command/parameter checks against the command catalog.
//! 2. **Semantics**: everything in syntax, plus checks that need to know
//!    which distros exist.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gantry_validator::{validate_semantics, FindingsExt};
//!
//! let findings = validate_semantics(&project, gantry_plugins::registry(), &distros);
//! if findings.has_errors() {
//!     // refuse to activate the project
//! }
//! ```

pub mod commands;
pub mod cycle;
pub mod dependencies;
pub mod graph;
pub mod structure;
pub mod validation;

pub use graph::{DependencyGraph, GraphError, TaskVariant};
pub use validation::{validate_semantics, validate_syntax};

use serde::{Deserialize, Serialize};

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Blocks saving or activating the project.
    #[default]
    Error,
    Warning,
}

/// A single problem found in a project document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    #[serde(default)]
    pub level: Level,
}

impl ValidationError {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Error,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Warning,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            Level::Error => write!(f, "ERROR: {}", self.message),
            Level::Warning => write!(f, "WARNING: {}", self.message),
        }
    }
}

/// Convenience queries over a list of findings.
pub trait FindingsExt {
    /// Number of findings at the given level.
    fn count(&self, level: Level) -> usize;

    /// Whether any finding blocks activation.
    fn has_errors(&self) -> bool {
        self.count(Level::Error) > 0
    }
}

impl FindingsExt for [ValidationError] {
    fn count(&self, level: Level) -> usize {
        self.iter().filter(|e| e.level == level).count()
    }
}
