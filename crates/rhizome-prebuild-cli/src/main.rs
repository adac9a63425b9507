mod commands;

use clap::{Parser, Subcommand};
use rhizome_prebuild_core::UserConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

#[derive(Parser)]
#[command(name = "prebuild")]
#[command(about = "Run a package's code generation tools before it is compiled")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the tools declared in prebuild.toml
    Build {
        /// Package root containing prebuild.toml
        #[arg(short, long, default_value = ".")]
        package: PathBuf,
    },

    /// Validate declared tools and their options without running them
    ///
    /// Like `build`, an unregistered tool type ends the check and does not
    /// fail it.
    Check {
        /// Package root containing prebuild.toml
        #[arg(short, long, default_value = ".")]
        package: PathBuf,
    },

    /// List available tools
    Tools,
}

fn init_logging(level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = UserConfig::load();
    if let Err(e) = init_logging(&config.log.level) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    match cli.command {
        Command::Build { package } => commands::build::run(&package, &config),
        Command::Check { package } => commands::check::run(&package),
        Command::Tools => commands::tools::list(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_logging_init_reports_an_error() {
        let _ = init_logging("debug");
        assert!(init_logging("debug").is_err());
    }
}
