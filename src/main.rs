use clap::Parser;
use td::cli::commands::Cli;
use td::cli::handlers;
use td::io::paths;

fn main() {
    let cli = Cli::parse();
    let data_dir = paths::data_dir(cli.data_dir.as_deref());
    let config = handlers::setup(&data_dir);

    // No subcommand launches the TUI
    if let Err(e) = handlers::dispatch(cli, &data_dir, &config) {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
