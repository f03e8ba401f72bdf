//! seqsynth - Random FASTA Sequence Generator
//!
//! Generates a random nucleotide sequence, embeds a marker at a random
//! offset, prints its composition and writes it as a FASTA record.
//!
//! ## Usage
//!
//! ```bash
//! seqsynth 100 --id Seq1 --description "Random test sequence" --marker NM
//! seqsynth 500 --id Seq1 --policy overwrite --seed 42 -o -   # FASTA to stdout
//! seqsynth 80 --id batch --count 5 -o out/ --stats-json stats.json
//! ```
//!
//! ## Logging
//!
//! Diagnostics go to stderr; set `SEQSYNTH_LOG` (e.g. `seqsynth=debug`) or
//! pass `-v` to see more.

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use seqsynth::chart::{print_chart, print_charts};
use seqsynth::config::{ConfigOverrides, GeneratorConfig};
use seqsynth::logging::init_logging;
use seqsynth::marker::InsertionPolicy;
use seqsynth::pipeline::{
    generate_batch, DirectorySink, GeneratedRecord, GenerationRequest, RecordSink, WriterSink,
};
use seqsynth::report::{stats_json, StatsReport};
use seqsynth::synth::{Alphabet, SynthError};

fn parse_alphabet(symbols: &str) -> Result<Alphabet, SynthError> {
    Alphabet::new(symbols)
}

/// seqsynth - Generate random nucleotide sequences as FASTA
///
/// Writes <ID>.fasta (with the id made filesystem-safe) into the output
/// directory, or the record itself to stdout with "-o -".
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of nucleotides to generate
    #[arg(allow_negative_numbers = true)]
    length: i64,

    /// Sequence identifier written in the FASTA header
    #[arg(short = 'i', long = "id")]
    id: String,

    /// Free-text description written after the identifier
    #[arg(short = 'd', long = "description", default_value = "")]
    description: String,

    /// Marker token to embed at a random offset (e.g. your name)
    #[arg(short = 'm', long = "marker")]
    marker: Option<String>,

    /// Symbols per FASTA body line, 0 for a single line (default: 70)
    #[arg(short = 'w', long = "line-width", allow_negative_numbers = true)]
    line_width: Option<i64>,

    /// How the marker is placed (default: splice)
    #[arg(short = 'p', long = "policy", value_enum)]
    policy: Option<InsertionPolicy>,

    /// Symbols to draw from (default: ACGT)
    #[arg(short = 'a', long = "alphabet", value_parser = parse_alphabet)]
    alphabet: Option<Alphabet>,

    /// Seed for reproducible output
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Number of sequences to generate; ids get a _<n> suffix when > 1
    #[arg(short = 'n', long = "count", default_value_t = 1)]
    count: usize,

    /// Output directory, or "-" for stdout
    #[arg(short = 'o', long = "output", default_value = ".")]
    output: String,

    /// TOML configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Also write the statistics as JSON to this file
    #[arg(long = "stats-json")]
    stats_json: Option<PathBuf>,

    /// Draw a bar chart of the composition
    #[arg(long = "chart")]
    chart: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Builds one request per sequence to generate.
fn build_requests(args: &Args) -> Vec<GenerationRequest> {
    if args.count == 1 {
        return vec![GenerationRequest::new(
            args.length,
            args.id.clone(),
            args.description.clone(),
        )];
    }
    (1..=args.count)
        .map(|i| {
            GenerationRequest::new(
                args.length,
                format!("{}_{}", args.id, i),
                args.description.clone(),
            )
        })
        .collect()
}

/// Writes the statistics of all records as a JSON array.
fn write_stats_json(path: &Path, generated: &[GeneratedRecord]) -> Result<()> {
    let json = stats_json(generated)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "wrote statistics");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.count == 0 {
        anyhow::bail!("Count must be at least 1");
    }

    let overrides = ConfigOverrides {
        alphabet: args.alphabet.clone(),
        marker: args.marker.clone(),
        line_width: args.line_width,
        policy: args.policy,
    };
    let config = GeneratorConfig::load(args.config.as_deref(), &overrides)?;
    debug!(?config, "resolved configuration");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let requests = build_requests(&args);
    let generated = generate_batch(&config, &requests, &mut rng)?;

    let to_stdout = args.output == "-";
    let mut sink: Box<dyn RecordSink> = if to_stdout {
        Box::new(WriterSink::new(io::stdout().lock(), "<stdout>"))
    } else {
        fs::create_dir_all(&args.output)
            .with_context(|| format!("Failed to create output directory {}", args.output))?;
        Box::new(DirectorySink::new(&args.output))
    };

    for record in &generated {
        let destination = sink.write(record)?;
        let report = StatsReport::new(record);

        if to_stdout {
            eprint!("{}", report);
        } else {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "\nSequence {} saved to {}", record.record.id, destination)?;
            write!(stdout, "{}", report)?;
            stdout.flush()?;
        }
    }
    drop(sink);

    if let Some(path) = &args.stats_json {
        write_stats_json(path, &generated)?;
    }

    // Charts run after every file is written; a failed chart is only logged.
    if args.chart {
        if to_stdout {
            warn!("chart skipped: stdout carries the FASTA output");
        } else {
            let drawn = print_charts(&generated, print_chart);
            debug!(drawn, total = generated.len(), "drew charts");
        }
    }

    if !to_stdout {
        eprintln!("Wrote {} sequence(s) to {}", generated.len(), args.output);
    }

    Ok(())
}
