//! Trainconf CLI entry point.

use clap::Parser;

use trainconf::cli::{Cli, Commands};
use trainconf::infrastructure::logging::{LogConfig, LoggerImpl};

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: cli.log_level.clone(),
        format: cli.log_format,
    };
    if let Err(err) = LoggerImpl::init(&log_config) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let result = match cli.command {
        Commands::Load(args) => trainconf::cli::commands::load::execute(args, cli.json),
        Commands::Keys(args) => trainconf::cli::commands::keys::execute(args, cli.json),
    };

    if let Err(err) = result {
        trainconf::cli::handle_error(err, cli.json);
    }
}
