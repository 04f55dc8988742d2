use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use xmode_core::{LogLevel, XmodeConfig};
use xmode_fs::Permissions;

mod commands;
mod logging;

use commands::eval::EvalArgs;
use commands::get::GetArgs;
use commands::set::SetArgs;

/// Environment variable naming the configuration file when --config is absent
const CONFIG_ENV: &str = "XMODE_CONFIG";

/// xmode: read and change file modes the same way on every platform
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Configuration file (TOML); defaults to $XMODE_CONFIG
    #[clap(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warning or error
    #[clap(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the mode of one or more paths
    Set(SetArgs),

    /// Print the mode of one or more paths
    Get(GetArgs),

    /// Apply a symbolic expression to a mode without touching the filesystem
    Eval(EvalArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
    let mut config = XmodeConfig::load(config_path.as_deref())
        .context("failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    logging::init(config.log_level)?;

    match cli.command {
        Commands::Set(args) => commands::set::execute(&args, &Permissions::detect(&config)),
        Commands::Get(args) => commands::get::execute(&args, &Permissions::detect(&config)),
        Commands::Eval(args) => commands::eval::execute(&args),
    }
}
