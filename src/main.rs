use clap::Parser;
use stockshift::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    stockshift::logging::init();
    run(Cli::parse())
}
