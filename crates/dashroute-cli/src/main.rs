mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dashroute")]
#[command(version, about = "Inspect the dashboard route table", long_about = None)]
struct Cli {
    /// Route table configuration file
    #[arg(short, long, global = true, default_value = "dashroute.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes in matching order
    Routes,

    /// Resolve a URL to its route, view and props
    Resolve {
        /// URL to resolve, e.g. /bot-detail/123?tab=stats
        url: String,

        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate the URL of a named route
    Url {
        /// Route name
        name: String,

        /// Parameters as key=value; repeat a key for repeatable parameters
        params: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Routes => {
            commands::routes::execute(&cli.config)?;
        }
        Commands::Resolve { url, json } => {
            commands::resolve::execute(&cli.config, &url, json)?;
        }
        Commands::Url { name, params } => {
            commands::url::execute(&cli.config, &name, &params)?;
        }
    }

    Ok(())
}
