use clap::Parser;
use meshdash::ui::cli::{cli, cli_commands};

fn main() {
    let args = cli_commands::Args::parse();
    if let Err(e) = cli::run_cli(args) {
        eprintln!("CLI error: {e:#}");
        std::process::exit(1);
    }
}
