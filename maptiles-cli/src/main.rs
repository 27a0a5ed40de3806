//! MapTiles CLI - inspect tile sources and format tile URLs.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::common::{load_registry, resolve_source_name, TileArgs};
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "maptiles", version, about = "Map tile source registry")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List registered tile sources
    List {
        /// Include built-in overlays and WMS layers outside the registry
        #[arg(long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show details of one tile source (registered or built-in)
    Show {
        /// Tile source name (exact, case-sensitive)
        name: String,
    },

    /// Print the request URL for a tile
    Url {
        /// Tile source name (defaults to the configured source)
        #[arg(short, long)]
        source: Option<String>,

        /// Skip zoom range validation
        #[arg(long)]
        unchecked: bool,

        #[command(flatten)]
        tile: TileArgs,
    },

    /// Download a tile to a file
    Fetch {
        /// Tile source name (defaults to the configured source)
        #[arg(short, long)]
        source: Option<String>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// User agent (defaults to the configured one)
        #[arg(long)]
        user_agent: Option<String>,

        #[command(flatten)]
        tile: TileArgs,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    maptiles::logging::init(maptiles::logging::level_for_verbosity(cli.verbose));

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    // Config commands must work even when the config file is broken.
    if let Commands::Config(command) = command {
        return commands::config::run(command);
    }

    let (config, registry) = load_registry();
    match command {
        Commands::List { all, json } => {
            commands::sources::run_list(&registry, &config.map.tile_source, all, json)
        }
        Commands::Show { name } => commands::sources::run_show(&registry, &name),
        Commands::Url {
            source,
            unchecked,
            tile,
        } => {
            let name = resolve_source_name(source, &config);
            commands::url::run(&registry, &name, &tile, unchecked)
        }
        Commands::Fetch {
            source,
            output,
            user_agent,
            tile,
        } => {
            let name = resolve_source_name(source, &config);
            commands::fetch::run(&config, &registry, &name, &tile, &output, user_agent)
        }
        Commands::Config(command) => commands::config::run(command),
    }
}
