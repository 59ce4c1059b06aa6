mod args;
mod energy;

use clap::Parser;
use log::{info, warn};
use snafu::ErrorCompat;
use std::error::Error;

use crate::args::Args;
use crate::energy::config_reader::resolve_settings;
use crate::energy::io_csv::RecordCache;
use crate::energy::{run_dashboard, EnergyResult};

fn run(args: &Args) -> EnergyResult<()> {
    let settings = resolve_settings(args)?;
    let mut cache = RecordCache::new();
    run_dashboard(&settings, &mut cache)?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    info!("args: {:?}", args);

    if let Err(e) = run(&args) {
        warn!("Error occurred {:?}", e);
        eprintln!("An error occurred: {}", e);
        let mut cause = e.source();
        while let Some(c) = cause {
            eprintln!("  caused by: {}", c);
            cause = c.source();
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
