use clap::Parser;
use orbit::cli::commands::Cli;
use orbit::cli::handlers;
use orbit::io::{config_store, logging};

fn main() {
    let cli = Cli::parse();

    // Logging is best effort; a read-only config dir must not block the CLI
    let _ = logging::init(&config_store::config_dir());

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
