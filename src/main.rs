//! ParaNut SoC Model CLI.
//!
//! Builds the SoC from a TOML configuration, attaches the harness models (bus
//! slave, interrupt consumer), applies an optional stimulus script, and runs
//! the clock.
//!
//! # Usage
//!
//! ```text
//! paranut-soc --config configs/default.toml --stimulus irq.toml --trace
//! ```
//!
//! Tick 0 always holds reset. Stimulus events apply before the settle phase
//! of the tick they name.

use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::process;

use paranut_soc::common::error::{SimError, SocError};
use paranut_soc::config::Config;
use paranut_soc::sim::loader::Stimulus;
use paranut_soc::sim::trace::{JsonLinesSink, TraceSink};
use paranut_soc::soc::SocBuilder;

/// Command-line arguments for the SoC model.
#[derive(Parser, Debug)]
#[command(author, version, about = "ParaNut SoC interrupt and interconnect model")]
struct Args {
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,

    #[arg(short, long)]
    stimulus: Option<String>,

    #[arg(short, long)]
    ticks: Option<u64>,

    /// Print every signal and register after each tick.
    #[arg(long)]
    trace: bool,

    /// Write one JSON snapshot per tick to this file.
    #[arg(long)]
    trace_json: Option<String>,

    /// Ticks the interrupt consumer waits before acknowledging.
    #[arg(long, default_value_t = 1)]
    service_delay: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("\n[!] FATAL: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SocError> {
    let config = Config::load(&args.config)?;
    let stimulus = match &args.stimulus {
        Some(path) => Stimulus::load(path)?,
        None => Stimulus::default(),
    };

    let ticks = args
        .ticks
        .or(stimulus.ticks)
        .unwrap_or(config.general.max_ticks);
    let verbose = args.trace || config.general.trace || cfg!(feature = "always-trace");

    println!("Global Configuration");
    println!("--------------------");
    println!("SoC:");
    println!("  Cores:              {}", config.soc.cores);
    println!("  Interrupt Lines:    {}", config.soc.ex_int_lines);
    println!("  IR Id Width:        {}", config.soc.ir_id_width);
    println!("  Bus Width:          {}", config.soc.busif_width);
    println!("Memory:");
    println!("  Latency:            {}", config.memory.latency);
    println!("Run:");
    println!("  Ticks:              {}", ticks);
    println!("  Stimulus Events:    {}", stimulus.events.len());
    println!("--------------------");

    let mut soc = SocBuilder::new(&config)?
        .with_memory()
        .with_irq_consumer(true, args.service_delay)
        .build()?;

    let mut json = match &args.trace_json {
        Some(path) => {
            let file = File::create(path).map_err(|e| SimError::Trace(format!("{}: {}", path, e)))?;
            Some(JsonLinesSink::new(BufWriter::new(file)))
        }
        None => None,
    };

    for tick in 0..ticks {
        soc.set_reset(tick == 0)?;
        for event in stimulus.events_at(tick) {
            soc.drive(&event.signal, event.value)?;
        }

        if verbose || json.is_some() {
            let sink = json.as_mut().map(|s| s as &mut dyn TraceSink);
            soc.trace(sink, verbose)?;
        }

        soc.tick()?;
    }

    if let Some(consumer) = soc.irq_consumer() {
        let served: Vec<String> = consumer
            .served()
            .iter()
            .map(|id| id.index().to_string())
            .collect();
        println!("\n[*] Interrupts served: [{}]", served.join(", "));
    }
    soc.stats().print();
    Ok(())
}
