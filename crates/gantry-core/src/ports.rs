//! Port traits (hexagonal architecture).
//!
//! These traits define the read-only interfaces between the validator and
//! the collaborators that supply environment knowledge. Both are queried
//! synchronously and never mutated by validation.

use crate::command::Params;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Source of known execution-environment (distro) identifiers.
pub trait DistroRegistry: Send + Sync {
    /// Does a distro with this ID exist?
    fn contains(&self, id: &str) -> bool;
}

impl DistroRegistry for HashSet<String> {
    fn contains(&self, id: &str) -> bool {
        HashSet::contains(self, id)
    }
}

impl DistroRegistry for BTreeSet<String> {
    fn contains(&self, id: &str) -> bool {
        BTreeSet::contains(self, id)
    }
}

impl DistroRegistry for Vec<String> {
    fn contains(&self, id: &str) -> bool {
        self.iter().any(|d| d == id)
    }
}

impl DistroRegistry for Vec<&str> {
    fn contains(&self, id: &str) -> bool {
        self.iter().any(|d| *d == id)
    }
}

/// Why a command's parameters were rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("no command named '{0}' is registered")]
    UnknownCommand(String),

    #[error("'{0}' is not a valid command name, expected 'plugin.command'")]
    MalformedName(String),

    #[error("missing required parameter '{0}'")]
    Missing(String),

    #[error("parameter '{path}' must be {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("parameter '{path}' is invalid: {message}")]
    Invalid { path: String, message: String },
}

/// Registry of executable command names and their parameter schemas.
pub trait CommandCatalog: Send + Sync {
    /// Is a command with this two-part name registered?
    fn contains(&self, name: &str) -> bool;

    /// Check `params` against the named command's schema, returning the
    /// first problem found. Unknown names fail with
    /// [`ParamError::UnknownCommand`] or [`ParamError::MalformedName`].
    fn check_params(&self, name: &str, params: &Params) -> Result<(), ParamError>;
}
