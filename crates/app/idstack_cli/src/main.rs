// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::io::Write;

use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod commands;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();
    let region = args.region.as_deref();
    let mut out = std::io::stdout().lock();

    match &args.command {
        Commands::Validate { config } => commands::validate(&mut out, config, region)?,
        Commands::Synth { config, format } => commands::synth(&mut out, config, region, *format)?,
        Commands::Outputs { config } => commands::outputs(&mut out, config, region)?,
        Commands::Plan {
            previous,
            next,
            acknowledge_disruptive,
        } => commands::plan(&mut out, previous, next, region, *acknowledge_disruptive)?,
        Commands::Remove {
            config,
            resource,
            cascade,
        } => commands::remove(&mut out, config, region, resource, *cascade)?,
        Commands::Teardown { config } => commands::teardown(&mut out, config, region)?,
        Commands::Version => {
            writeln!(
                out,
                "{} {} (core {})",
                env!("CARGO_BIN_NAME"),
                env!("CARGO_PKG_VERSION"),
                idstack_core::version()
            )?;
        }
    }

    out.flush()?;
    Ok(())
}
