//! # seqsynth - Random FASTA Sequence Generator
//!
//! Generates random nucleotide sequences, embeds a marker token at a random
//! offset, reports nucleotide composition without the marker and writes the
//! result as a line-wrapped FASTA record.
//!
//! ## Architecture
//!
//! Each stage consumes the previous stage's value:
//! - `synth`: uniform random sequences over an alphabet
//! - `marker`: marker insertion (splice or overwrite policy)
//! - `composition`: nucleotide counts, %GC and dinucleotide frequencies
//! - `fasta`: FASTA record rendering and parsing
//! - `sanitize`: filesystem-safe names from record identifiers
//! - `pipeline`: orchestration of the stages and record sinks
//!
//! Supporting modules:
//! - `model`: sequences, marker spans and records
//! - `config`: the immutable generator configuration
//! - `report`: text and JSON statistics reports
//! - `chart`: terminal bar chart of the composition
//! - `logging`: tracing setup

pub mod chart;
pub mod composition;
pub mod config;
pub mod fasta;
pub mod logging;
pub mod marker;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod synth;
