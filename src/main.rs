use clap::Parser;
use finforecast::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
