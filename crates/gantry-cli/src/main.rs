//! Gantry CLI entrypoint.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod handlers;

use commands::{Commands, ConfigCommands};
use config::CliConfig;
use handlers::ValidateOptions;

#[derive(Parser)]
#[command(name = "gantry")]
#[command(author, version, about = "Gantry CI project configuration tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable CLI config");
        CliConfig::default()
    });

    match cli.command {
        Commands::Init { path } => handlers::init(&path).await?,
        Commands::Validate {
            path,
            syntax_only,
            distros,
            strict,
            format,
        } => {
            let options = ValidateOptions {
                syntax_only,
                distros: if distros.is_empty() {
                    config.distros.clone()
                } else {
                    distros
                },
                strict: strict || config.strict,
                format: format.unwrap_or(config.output_format),
            };
            if !handlers::validate(&path, &options).await? {
                std::process::exit(1);
            }
        }
        Commands::Graph { path, order } => handlers::graph(&path, order).await?,
        Commands::Commands { name } => handlers::list_commands(name.as_deref())?,
        Commands::Schema => handlers::schema()?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => handlers::show_config(&config)?,
            ConfigCommands::Set { key, value } => handlers::set_config(&key, &value)?,
        },
    }

    Ok(())
}
