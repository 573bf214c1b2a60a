//! Gantry CI Core
//!
//! Project document model, command references, and the port traits through
//! which the validator talks to its collaborators (the distro registry and
//! the command catalog). This crate has minimal dependencies and defines the
//! shared vocabulary used across all other crates.

pub mod command;
pub mod error;
pub mod expansion;
pub mod ports;
pub mod project;

pub use command::{Command, CommandRef, CommandSet, Params};
pub use error::{Error, Result};
pub use ports::{CommandCatalog, DistroRegistry, ParamError};
pub use project::{BuildVariant, BuildVariantTask, Project, ProjectTask, TaskDependency};
