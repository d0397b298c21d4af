use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tilepath_cli::commands::neighbors::handle_neighbors_command;
use tilepath_cli::commands::route::{handle_route_command, RouteCommandArgs};
use tilepath_cli::output::{LogFormat, OutputFormat, StrategyArg};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tile scene pathfinding utilities")]
struct Cli {
    /// Format for diagnostic log lines written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route between two tiles of a scene.
    Route {
        /// Scene file (JSON).
        #[arg(long)]
        scene: PathBuf,
        /// Starting tile name or index.
        #[arg(long = "from")]
        from: String,
        /// Destination tile name or index.
        #[arg(long = "to")]
        to: String,
        /// Search strategy; defaults to the scene configuration.
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the tiles reachable in one step from a tile.
    Neighbors {
        /// Scene file (JSON).
        #[arg(long)]
        scene: PathBuf,
        /// Tile name or index.
        #[arg(long)]
        node: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Route {
            scene,
            from,
            to,
            strategy,
            format,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                strategy: strategy.map(Into::into),
                format,
            };
            handle_route_command(&scene, &args)
        }
        Command::Neighbors {
            scene,
            node,
            format,
        } => handle_neighbors_command(&scene, &node, format),
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
}
