//! Generation pipeline.
//!
//! This module composes the stages in order:
//! - synthesis of a random sequence
//! - marker insertion (when a marker is configured)
//! - composition analysis, matched to the insertion policy
//! - record construction and FASTA rendering
//!
//! Writing is delegated to a [`RecordSink`]. The record text is fully
//! rendered before any sink is called, so a failing run writes nothing.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::composition::{CompositionAnalyzer, CompositionStats};
use crate::config::GeneratorConfig;
use crate::fasta::{self, FastaError};
use crate::marker::{self, InsertionPolicy, MarkerError};
use crate::model::{MarkerSpan, SequenceRecord};
use crate::sanitize::file_name_for;
use crate::synth::{self, SynthError};

/// Errors that can occur during a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Sequence identifier must not be blank")]
    BlankId,

    #[error(transparent)]
    Synth(#[from] SynthError),

    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error(transparent)]
    Fasta(#[from] FastaError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// What to generate in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Requested sequence length; negative values are rejected
    pub length: i64,
    /// Record identifier, used verbatim in the header
    pub id: String,
    /// Free-text description for the header
    pub description: String,
}

impl GenerationRequest {
    pub fn new(length: i64, id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            length,
            id: id.into(),
            description: description.into(),
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRecord {
    /// The record as written, marker included
    pub record: SequenceRecord,
    /// Where the marker sits in the record body
    pub marker_span: Option<MarkerSpan>,
    /// Length of the synthesized sequence before insertion
    pub original_length: usize,
    /// Composition of the synthesized symbols, marker excluded
    pub stats: CompositionStats,
    /// Rendered FASTA text
    pub fasta: String,
    /// Filesystem-safe file name for the record
    pub file_name: String,
}

/// Runs the full pipeline for one request.
pub fn generate<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    request: &GenerationRequest,
    rng: &mut R,
) -> PipelineResult<GeneratedRecord> {
    if request.id.trim().is_empty() {
        return Err(PipelineError::BlankId);
    }

    let plain = synth::synthesize(request.length, &config.alphabet, rng)?;
    debug!(id = %request.id, length = plain.len(), "synthesized sequence");

    let analyzer = CompositionAnalyzer::for_policy(config.policy);
    let (body, marker_span, stats) = match config.marker() {
        Some(token) => {
            let (marked, span) = marker::insert(config.policy, &plain, token, rng)?;
            debug!(id = %request.id, policy = %config.policy, span = %span, "inserted marker");
            let stats = match config.policy {
                InsertionPolicy::Splice => analyzer.analyze(&plain, None),
                InsertionPolicy::Overwrite => analyzer.analyze(&marked, Some(span)),
            };
            (marked, Some(span), stats)
        }
        None => {
            let stats = analyzer.analyze(&plain, None);
            (plain.clone(), None, stats)
        }
    };

    let record = SequenceRecord::new(request.id.clone(), request.description.clone(), body);
    let fasta = fasta::format_record(&record, config.line_width)?;
    let file_name = file_name_for(&request.id, &config.extension);

    Ok(GeneratedRecord {
        record,
        marker_span,
        original_length: plain.len(),
        stats,
        fasta,
        file_name,
    })
}

/// Runs the pipeline for several requests over one random source.
///
/// The source is advanced from one request to the next, so sibling
/// sequences never repeat each other's draws. Stops at the first failure.
pub fn generate_batch<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    requests: &[GenerationRequest],
    rng: &mut R,
) -> PipelineResult<Vec<GeneratedRecord>> {
    requests
        .iter()
        .map(|request| generate(config, request, &mut *rng))
        .collect()
}

/// Destination for rendered records.
pub trait RecordSink {
    /// Writes one record, returning a description of where it went.
    fn write(&mut self, generated: &GeneratedRecord) -> PipelineResult<String>;
}

/// Writes each record to `<dir>/<file name>`, replacing existing files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path a record would be written to.
    pub fn path_for(&self, generated: &GeneratedRecord) -> PathBuf {
        self.dir.join(&generated.file_name)
    }
}

impl RecordSink for DirectorySink {
    fn write(&mut self, generated: &GeneratedRecord) -> PipelineResult<String> {
        let path = self.path_for(generated);
        fs::write(&path, generated.fasta.as_bytes()).map_err(|source| PipelineError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), length = generated.record.len(), "wrote record");
        Ok(path.display().to_string())
    }
}

/// Writes records one after another to any writer (e.g. stdout).
pub struct WriterSink<W: Write> {
    writer: W,
    label: String,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, label: impl Into<String>) -> Self {
        Self {
            writer,
            label: label.into(),
        }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for WriterSink<W> {
    fn write(&mut self, generated: &GeneratedRecord) -> PipelineResult<String> {
        self.writer
            .write_all(generated.fasta.as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|source| PipelineError::Write {
                path: self.label.clone(),
                source,
            })?;
        Ok(self.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::LengthBasis;
    use crate::fasta::parse_fasta_str;
    use crate::model::Sequence;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn config(marker: Option<&str>, policy: InsertionPolicy) -> GeneratorConfig {
        GeneratorConfig {
            marker: marker.map(str::to_string),
            policy,
            line_width: 10,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_splice_run() {
        let mut rng = StdRng::seed_from_u64(1);
        let request = GenerationRequest::new(40, "Seq 1", "random test");
        let out = generate(&config(Some("NAME"), InsertionPolicy::Splice), &request, &mut rng).unwrap();

        let span = out.marker_span.unwrap();
        assert_eq!(out.original_length, 40);
        assert_eq!(out.record.len(), 44);
        assert_eq!(out.record.body.slice(span.range()), "NAME");
        assert_eq!(out.stats.sequence_length, 40);
        assert_eq!(out.stats.evaluated_length, 40);
        assert_eq!(out.stats.recognized(), 40);
        assert_eq!(out.file_name, "Seq_1.fasta");
        assert!(out.fasta.starts_with(">Seq 1 random test\n"));
    }

    #[test]
    fn test_splice_stats_match_unmarked_sequence() {
        let mut rng = StdRng::seed_from_u64(2);
        let request = GenerationRequest::new(30, "s", "");
        let out = generate(&config(Some("GGGG"), InsertionPolicy::Splice), &request, &mut rng).unwrap();

        let span = out.marker_span.unwrap();
        let mut unmarked = out.record.body.slice(0..span.start).to_string();
        unmarked.push_str(out.record.body.slice(span.end..out.record.len()));
        let expected =
            CompositionAnalyzer::new(LengthBasis::AllPositions).analyze(&Sequence::new(unmarked), None);
        assert_eq!(out.stats, expected);
    }

    #[test]
    fn test_overwrite_run() {
        let mut rng = StdRng::seed_from_u64(3);
        let request = GenerationRequest::new(40, "s", "d");
        let out = generate(&config(Some("NAME"), InsertionPolicy::Overwrite), &request, &mut rng).unwrap();

        let span = out.marker_span.unwrap();
        assert_eq!(out.record.len(), 40);
        assert_eq!(out.record.body.slice(span.range()), "NAME");
        assert_eq!(out.stats.sequence_length, 40);
        assert_eq!(out.stats.evaluated_length, 36);
        assert_eq!(out.stats.recognized(), 36);
    }

    #[test]
    fn test_no_marker() {
        let mut rng = StdRng::seed_from_u64(4);
        let request = GenerationRequest::new(25, "s", "d");
        let out = generate(&config(None, InsertionPolicy::Overwrite), &request, &mut rng).unwrap();
        assert!(out.marker_span.is_none());
        assert_eq!(out.record.len(), 25);
        assert_eq!(out.stats.evaluated_length, 25);
    }

    #[test]
    fn test_zero_length_without_marker() {
        let mut rng = StdRng::seed_from_u64(5);
        let request = GenerationRequest::new(0, "empty", "");
        let out = generate(&config(None, InsertionPolicy::Splice), &request, &mut rng).unwrap();
        assert!(out.record.is_empty());
        assert_eq!(out.stats.evaluated_length, 0);
        assert!(out.stats.dinucleotides.is_empty());
        assert_eq!(out.fasta, ">empty \n");
    }

    #[test]
    fn test_errors_propagate() {
        let mut rng = StdRng::seed_from_u64(6);
        let cfg = config(Some("LONGMARKER"), InsertionPolicy::Splice);

        let result = generate(&cfg, &GenerationRequest::new(-1, "s", ""), &mut rng);
        assert!(matches!(result, Err(PipelineError::Synth(SynthError::InvalidLength(-1)))));

        let result = generate(&cfg, &GenerationRequest::new(4, "s", ""), &mut rng);
        assert!(matches!(
            result,
            Err(PipelineError::Marker(MarkerError::MarkerTooLong { .. }))
        ));

        let result = generate(&cfg, &GenerationRequest::new(40, "   ", ""), &mut rng);
        assert!(matches!(result, Err(PipelineError::BlankId)));

        let bad_width = GeneratorConfig {
            line_width: -2,
            ..GeneratorConfig::default()
        };
        let result = generate(&bad_width, &GenerationRequest::new(4, "s", ""), &mut rng);
        assert!(matches!(
            result,
            Err(PipelineError::Fasta(FastaError::InvalidWidth(-2)))
        ));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let cfg = config(Some("NM"), InsertionPolicy::Overwrite);
        let request = GenerationRequest::new(50, "s", "d");
        let a = generate(&cfg, &request, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = generate(&cfg, &request, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_advances_shared_source() {
        let cfg = config(None, InsertionPolicy::Splice);
        let requests: Vec<_> = (1..=3)
            .map(|i| GenerationRequest::new(60, format!("s{}", i), ""))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);
        let batch = generate_batch(&cfg, &requests, &mut rng).unwrap();

        assert_eq!(batch.len(), 3);
        assert_ne!(batch[0].record.body, batch[1].record.body);
        assert_ne!(batch[1].record.body, batch[2].record.body);

        let mut fresh = StdRng::seed_from_u64(7);
        let first = generate(&cfg, &requests[0], &mut fresh).unwrap();
        assert_eq!(first.record.body, batch[0].record.body);
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let out = generate(
            &config(Some("NM"), InsertionPolicy::Splice),
            &GenerationRequest::new(23, "my:seq", "desc"),
            &mut rng,
        )
        .unwrap();

        let mut sink = DirectorySink::new(dir.path());
        sink.write(&out).unwrap();

        let path = dir.path().join("my_seq.fasta");
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, out.fasta);

        let records = parse_fasta_str(&content).unwrap();
        assert_eq!(records[0].id, "my:seq");
        assert_eq!(records[0].body, out.record.body);
    }

    #[test]
    fn test_directory_sink_missing_dir() {
        let mut rng = StdRng::seed_from_u64(9);
        let out = generate(
            &config(None, InsertionPolicy::Splice),
            &GenerationRequest::new(5, "s", ""),
            &mut rng,
        )
        .unwrap();
        let mut sink = DirectorySink::new("/nonexistent/seqsynth/out");
        assert!(matches!(sink.write(&out), Err(PipelineError::Write { .. })));
    }

    #[test]
    fn test_writer_sink() {
        let mut rng = StdRng::seed_from_u64(10);
        let out = generate(
            &config(None, InsertionPolicy::Splice),
            &GenerationRequest::new(12, "s", "d"),
            &mut rng,
        )
        .unwrap();
        let mut sink = WriterSink::new(Vec::new(), "<buffer>");
        assert_eq!(sink.write(&out).unwrap(), "<buffer>");
        assert_eq!(sink.into_inner(), out.fasta.into_bytes());
    }
}
