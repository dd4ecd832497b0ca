use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::run::RunArgs;

#[derive(Parser, Debug)]
#[command(
    name = "kvs-retention",
    version,
    about = "Standardize Kinesis Video Stream data retention"
)]
struct Cli {
    /// YAML configuration file. Defaults to ./kvs-retention.yaml when present.
    #[arg(long, short, global = true, env = "KVS_RETENTION_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "kvs_runtime=debug").
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Converge every stream in the identifiers file to the target retention.
    Run(RunArgs),

    /// Print the effective configuration as YAML.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::config::load(cli.config.as_deref())?;

    match cli.cmd {
        Command::Run(args) => {
            let config = args.apply(config)?;
            let status = commands::run::execute(config).await?;
            Ok(ExitCode::from(status))
        }
        Command::Config => {
            commands::config::show(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
