use std::path::PathBuf;

use clap::Parser;
use daylist::cli::commands::Cli;
use daylist::cli::handlers;
use daylist::io::config_io;
use daylist::logging;

fn main() {
    let cli = Cli::parse();

    let config = config_io::read_config().unwrap_or_else(|e| {
        eprintln!("warning: {} (using defaults)", e);
        Default::default()
    });
    let override_dir = cli.data_dir.as_ref().map(PathBuf::from);
    let data_dir = config_io::resolve_data_dir(&config, override_dir.as_deref());
    logging::init(&data_dir);

    let result = match cli.command {
        // No subcommand → launch TUI
        None => daylist::tui::run(&config, &data_dir),
        Some(_) => handlers::dispatch(cli, &config, &data_dir),
    };
    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
