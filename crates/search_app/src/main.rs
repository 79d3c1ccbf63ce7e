mod app;
mod cli;
mod config;
mod effects;
mod input;
mod render;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::CliArgs::parse();
    search_logging::initialize(args.log.into(), args.log_level(), &args.log_file);
    app::run(args)
}
