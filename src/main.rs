mod cli;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// Log filter, e.g. `UNION_GEN_LOG=debug`.
const LOG_ENV: &str = "UNION_GEN_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
