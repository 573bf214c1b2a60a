//! CLI command definitions.

use crate::config::OutputFormat;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter project file
    Init {
        /// Path of the project file to create
        #[arg(default_value = "gantry.yml")]
        path: String,
    },

    /// Validate a project file
    Validate {
        /// Path to the project file
        #[arg(default_value = "gantry.yml")]
        path: String,

        /// Skip checks that need the list of known distros
        #[arg(long)]
        syntax_only: bool,

        /// Known distro IDs, overriding the configured list
        #[arg(long, value_delimiter = ',')]
        distros: Vec<String>,

        /// Fail on warnings too
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show the task dependency graph
    Graph {
        /// Path to the project file
        #[arg(default_value = "gantry.yml")]
        path: String,

        /// Print tasks in an order that satisfies every dependency
        #[arg(long)]
        order: bool,
    },

    /// List registered commands, or show one command's parameters
    Commands {
        /// Command name, e.g. s3.put
        name: Option<String>,
    },

    /// Print the JSON schema of the project file
    Schema,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Key
        key: String,

        /// Value
        value: String,
    },
}
