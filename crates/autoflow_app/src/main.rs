use anyhow::{Context, Result};
use autoflow_app::cli::Cli;
use clap::Parser;
use log::LevelFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    autoflow_logging::initialize(cli.log.into(), level);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let output = runtime.block_on(autoflow_app::run(cli))?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
