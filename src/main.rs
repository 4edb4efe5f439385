use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

use snapkeep::cli::{run_with, Cli};

fn init_logger() {
    // RUST_LOG wins, otherwise info.
    // Example: RUST_LOG=debug snapkeep list --all
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    let cli = Cli::parse();
    // --json failures are already on stdout
    let json = cli.cmd.json();
    if let Err(e) = run_with(cli) {
        if !json {
            error!("{:#}", e);
        }
        std::process::exit(1);
    }
}
