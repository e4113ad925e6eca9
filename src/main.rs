use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sched_sim::{
    Algorithm, Workload,
    sim::{self, SyntheticParams, driver::DEFAULT_QUANTUM, render, synthetic},
};

/// Simulate single-CPU scheduling policies over a workload and report the
/// resulting timeline and metrics.
#[derive(Debug, Parser)]
#[command(name = "sched_sim", version)]
struct Opts {
    /// JSON workload document. Without one, a synthetic workload is generated.
    #[clap(short, long)]
    workload: Option<PathBuf>,

    /// Scheduling policy; overrides the document.
    #[clap(short, long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Round-robin quantum; overrides the document.
    #[clap(short, long)]
    quantum: Option<u64>,

    /// Context-switch cost in time units; overrides the document.
    #[clap(short, long)]
    overhead: Option<u64>,

    /// Run every policy over the same workload and print a comparison.
    #[clap(long)]
    compare: bool,

    /// Print the report as JSON instead of text.
    #[clap(long)]
    json: bool,

    /// Arrival window of the synthetic workload, in time units.
    #[clap(long, default_value = "20")]
    ticks: u64,

    /// Seed of the synthetic workload.
    #[clap(long, default_value = "0")]
    seed: u64,

    /// Enable verbose output. Specify multiple times to increase verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_workload(opts: &Opts) -> Result<Workload> {
    let mut workload = match &opts.workload {
        Some(path) => Workload::from_path(path)
            .with_context(|| format!("Failed to load workload {}", path.display()))?,
        None => {
            let params = SyntheticParams {
                ticks: opts.ticks,
                seed: opts.seed,
                ..Default::default()
            };
            info!(
                "Generating synthetic workload (ticks={}, seed={})",
                params.ticks, params.seed
            );
            synthetic::workload(&params, Algorithm::Fifo, Some(DEFAULT_QUANTUM), 0)
        }
    };

    if let Some(algorithm) = opts.algorithm {
        workload.algorithm = algorithm;
    }
    if opts.quantum.is_some() {
        workload.quantum = opts.quantum;
    }
    if let Some(overhead) = opts.overhead {
        workload.overhead = overhead;
    }

    if !opts.compare {
        workload.validate().context("Invalid workload")?;
    }
    Ok(workload)
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Warn,
        1 => simplelog::LevelFilter::Info,
        2 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Off)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let workload = load_workload(&opts)?;

    if opts.compare {
        // Each policy is checked on its own; only the missing quantum is filled in
        workload
            .with_algorithm(Algorithm::Fifo)
            .validate()
            .context("Invalid workload")?;
        let reports = sim::compare(&workload);
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            for report in &reports {
                println!("{}", render::report(report));
            }
            print!("{}", render::comparison(&reports));
        }
        return Ok(());
    }

    let report = sim::run(&workload);
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::report(&report));
    }
    Ok(())
}
