mod utils;
mod commands;
mod elasticsearch;
mod naming;
mod report;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use utils::*;
use commands::explain::{ExplainArgs, handle_explain_command};
use commands::ls::{LsArgs, handle_ls_command};
use commands::plan::{PlanArgs, handle_plan_command};

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.dsmerge/config.toml)
    #[arg(long, value_name = "path", global = true)]
    config: Option<PathBuf>,

    /// Elastic Cloud ID of the deployment
    #[arg(long, value_name = "cloud_id", global = true)]
    cloud_id: Option<String>,

    /// Elasticsearch URL, when not using a Cloud ID
    #[arg(long, value_name = "url", global = true)]
    url: Option<String>,

    /// API key used to authenticate
    #[arg(long, value_name = "api_key", global = true)]
    api_key: Option<String>,

    /// Log requests and debug details
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the commands consolidating the partial indices of a data stream
    Plan(PlanArgs),

    /// List the partial backing indices of a data stream
    Ls(LsArgs),

    /// Show the lifecycle_date_millis of an index
    Explain(ExplainArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), DsmError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // A missing .env file is fine, the environment may already be set
    let _ = dotenvy::dotenv();

    let config_file = match &cli.config {
        Some(path) => path.clone(),
        None => dirs::home_dir()
            .ok_or(DsmError::ConfigError("Could not determine home directory".to_string()))?
            .join(".dsmerge")
            .join("config.toml"),
    };
    let config = load_config(&config_file)?;

    let overrides = Overrides {
        cloud_id: cli.cloud_id.clone(),
        url: cli.url.clone(),
        api_key: cli.api_key.clone(),
    };
    let settings = Settings::resolve(&overrides, |key| std::env::var(key).ok(), config.as_ref());

    match &cli.command {
        Commands::Plan(args) => handle_plan_command(settings, args),
        Commands::Ls(args) => handle_ls_command(settings?, args),
        Commands::Explain(args) => handle_explain_command(settings?, args),
    }
}
