use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::time::Instant;
use clap::Parser;
use csimlib::config::{CacheConfig, Representation};
use csimlib::io::get_reader;
use csimlib::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("LRU cache simulator for valgrind memory traces"))]
struct Args {
    /// Number of set index bits (2^s sets)
    #[arg(short = 's', allow_negative_numbers = true)]
    set_index_bits: Option<i64>,

    /// Associativity, lines per set
    #[arg(short = 'E', allow_negative_numbers = true)]
    associativity: Option<i64>,

    /// Number of block offset bits (2^b byte blocks)
    #[arg(short = 'b', allow_negative_numbers = true)]
    block_offset_bits: Option<i64>,

    /// Trace file to replay
    #[arg(short, long)]
    trace: String,

    /// JSON cache configuration, -s, -E and -b override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Set representation, overrides the configuration file
    #[arg(short, long, value_enum)]
    representation: Option<Representation>,

    /// Print each record followed by its outcomes
    #[arg(short, long)]
    verbose: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Also write "<hits> <misses> <evictions>" to this file
    #[arg(long)]
    results_file: Option<String>,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

/// Builds the configuration from the optional file, then applies any command line overrides
fn resolve_config(args: &Args) -> Result<CacheConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let config_file = File::open(path).map_err(|e| format!("Couldn't open the config file at path {path}: {e}"))?;
            serde_json::from_reader(BufReader::new(config_file)).map_err(|e| format!("Couldn't parse the config file: {e}"))?
        }
        None => CacheConfig::new(
            args.set_index_bits.ok_or("Missing the number of set index bits (-s)")?,
            args.associativity.ok_or("Missing the associativity (-E)")?,
            args.block_offset_bits.ok_or("Missing the number of block offset bits (-b)")?,
        ),
    };
    if let Some(s) = args.set_index_bits {
        config.set_index_bits = s;
    }
    if let Some(e) = args.associativity {
        config.associativity = e;
    }
    if let Some(b) = args.block_offset_bits {
        config.block_offset_bits = b;
    }
    if let Some(representation) = args.representation {
        config.representation = representation;
    }
    Ok(config)
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    let config = resolve_config(&args)?;
    let mut simulator = Simulator::new(&config).map_err(|e| format!("Invalid cache configuration: {e}"))?;
    let trace_file = File::open(&args.trace).map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let trace_reader = get_reader(trace_file)?;
    let result = if args.verbose {
        let mut out = BufWriter::new(io::stdout().lock());
        let result = *simulator.simulate_verbose(trace_reader, &mut out)?;
        out.flush().map_err(|e| format!("Couldn't write the verbose output: {e}"))?;
        result
    } else {
        *simulator.simulate(trace_reader)?
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    } else {
        println!("{result}");
    }
    if let Some(path) = &args.results_file {
        fs::write(path, result.to_results_line()).map_err(|e| format!("Couldn't write the results file at path {path}: {e}"))?;
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        println!("Records applied: {}", simulator.get_records_applied());
        if let Some(line) = simulator.get_stopped_at() {
            println!("Trace ended early at malformed line {line}");
        }
        let (occupied, vacant) = simulator.get_line_occupancy();
        println!("Occupied cache lines: {occupied}, vacant cache lines: {vacant}");
    }
    Ok(())
}
