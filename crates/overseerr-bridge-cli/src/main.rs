use clap::{ArgAction, Parser, Subcommand};
use commands::{config, request, search, sensors, serve};
use media_request_config::PathManager;
use media_request_models::{RequestUpdate, SeasonMode};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod server;

#[derive(Parser)]
#[command(name = "overseerr-bridge")]
#[command(about = "Request and search movies and TV shows through Overseerr")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server for service calls and Overseerr webhooks
    #[command(long_about = "Serve the named actions on /api/services/{action}, the sensor states on /api/sensors and the Overseerr webhook on /api/webhook/{id}. Sensors are refreshed on startup, on every webhook and on the configured interval.")]
    Serve {
        /// Address to listen on (overrides server.bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Skip the sensor refresh on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_refresh: bool,

        /// Write logs to a daily-rotated file in the log directory instead of stderr
        #[arg(long, action = ArgAction::SetTrue)]
        log_to_file: bool,
    },
    /// Search the Overseerr catalog
    Search {
        /// Which catalog to search
        #[arg(value_enum)]
        catalog: search::Catalog,

        /// Title to search for
        name: String,
    },
    /// Request a movie or TV show
    Request {
        #[command(subcommand)]
        kind: RequestCommands,
    },
    /// Change the status of an existing request
    UpdateRequest {
        /// Overseerr request id
        request_id: String,

        /// New status, e.g. approve or decline
        new_status: String,
    },
    /// Fetch and print all sensor values once
    Sensors,
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum RequestCommands {
    /// Request a movie by TMDB id, or by name (first search hit)
    Movie {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        media_id: Option<String>,
    },
    /// Request a TV show by TMDB id, or by name (first search hit)
    Tv {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        media_id: Option<String>,

        /// Season(s) to request: first, latest or all
        #[arg(long, default_value = "latest")]
        season: SeasonMode,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the api key and password)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a configuration template
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,

        /// Overseerr api key (prompted when omitted on a terminal)
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve { log_to_file: true, .. } => Some(PathManager::default().server_log_file()),
        _ => None,
    };
    let initialized = match &log_file {
        Some(path) => logging::init_logging_to_file(cli.verbose, cli.quiet, path),
        None => logging::init_logging(cli.verbose, cli.quiet),
    };
    initialized.map_err(|e| color_eyre::eyre::eyre!("Failed to initialize logging: {}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve {
            bind,
            no_startup_refresh,
            ..
        } => {
            let options = serve::ServeOptions { bind, no_startup_refresh };
            serve::run_serve(options, config_path, &output).await
        }
        Commands::Search { catalog, name } => search::run_search(catalog, &name, config_path, &output).await,
        Commands::Request { kind } => match kind {
            RequestCommands::Movie { name, media_id } => {
                request::run_request_movie(name, media_id, config_path, &output).await
            }
            RequestCommands::Tv { name, media_id, season } => {
                request::run_request_tv(name, media_id, season, config_path, &output).await
            }
        },
        Commands::UpdateRequest { request_id, new_status } => {
            let update = RequestUpdate { request_id, new_status };
            request::run_update_request(update, config_path, &output).await
        }
        Commands::Sensors => sensors::run_sensors(config_path, &output).await,
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show { full } => config::run_show(full, config_path, &output).await,
            ConfigCommands::Init {
                force,
                api_key,
                host,
                port,
            } => {
                let options = config::InitOptions {
                    force,
                    api_key,
                    host,
                    port,
                };
                config::run_init(options, config_path, &output).await
            }
        },
    };

    if let Err(e) = &result {
        if !output.is_human() {
            output.error(format!("{:#}", e));
        }
    }
    result
}
