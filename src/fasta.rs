//! FASTA record writer and reader.
//!
//! Records are written as a header line followed by the body wrapped into
//! fixed-width lines:
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! ACGTAC
//! ```
//!
//! The header is the plain join of id, one space and the description, so an
//! empty description still leaves the trailing space. A line width of `0`
//! writes the body on a single line.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;

use crate::model::{Sequence, SequenceRecord};

/// Default body line width.
pub const DEFAULT_LINE_WIDTH: i64 = 70;

/// Errors that can occur while writing or parsing FASTA.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read or write FASTA: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid line width: {0} (use 0 for no wrapping)")]
    InvalidWidth(i64),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Resolves a line width: `Ok(None)` means no wrapping.
pub fn resolve_line_width(line_width: i64) -> FastaResult<Option<usize>> {
    match line_width {
        0 => Ok(None),
        w if w < 0 => Err(FastaError::InvalidWidth(w)),
        w => usize::try_from(w)
            .map(Some)
            .map_err(|_| FastaError::InvalidWidth(w)),
    }
}

/// Writes a record to `writer`.
///
/// # Arguments
///
/// * `writer` - Destination for the record text
/// * `record` - The record to write
/// * `line_width` - Symbols per body line, or `0` for a single line
pub fn write_record<W: Write>(
    writer: &mut W,
    record: &SequenceRecord,
    line_width: i64,
) -> FastaResult<()> {
    let width = resolve_line_width(line_width)?;

    writeln!(writer, ">{} {}", record.id, record.description)?;
    match width {
        None => {
            writer.write_all(record.body.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Some(width) => {
            for line in record.body.as_bytes().chunks(width) {
                writer.write_all(line)?;
                writer.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}

/// Renders a record to a string.
///
/// # Examples
///
/// ```
/// use seqsynth::fasta::format_record;
/// use seqsynth::model::{Sequence, SequenceRecord};
///
/// let record = SequenceRecord::new("Seq1", "test", Sequence::new("ACGTACGTAC"));
/// let text = format_record(&record, 4).unwrap();
/// assert_eq!(text, ">Seq1 test\nACGT\nACGT\nAC\n");
/// ```
pub fn format_record(record: &SequenceRecord, line_width: i64) -> FastaResult<String> {
    let mut buffer = Vec::with_capacity(record.len() + record.id.len() + 64);
    write_record(&mut buffer, record, line_width)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Splits a header (without '>') into identifier and description.
fn split_header(header: &str) -> (&str, &str) {
    match header.split_once(char::is_whitespace) {
        Some((id, description)) => (id, description.trim()),
        None => (header, ""),
    }
}

/// Parses a FASTA file into records.
pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<Vec<SequenceRecord>> {
    let file = File::open(path)?;
    parse_fasta(BufReader::new(file))
}

/// Parses FASTA content from a reader.
///
/// This function handles both single-line and multi-line sequences.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<Vec<SequenceRecord>> {
    let mut records = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut current_seq: Vec<u8> = Vec::new();
    let mut line_number = 0;

    for line_result in reader.lines() {
        line_number += 1;
        let line = line_result?;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some((id, description)) = current.take() {
                records.push(SequenceRecord::new(
                    id,
                    description,
                    Sequence::from_bytes(std::mem::take(&mut current_seq)),
                ));
            }

            let (id, description) = split_header(header);
            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    line_number
                )));
            }

            current = Some((id.to_string(), description.to_string()));
        } else {
            if current.is_none() {
                return Err(FastaError::SequenceWithoutHeader(line_number));
            }

            // Append sequence data (removing any whitespace)
            current_seq.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }
    }

    // Don't forget the last record
    if let Some((id, description)) = current {
        records.push(SequenceRecord::new(
            id,
            description,
            Sequence::from_bytes(current_seq),
        ));
    }

    if records.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    Ok(records)
}

/// Parses FASTA content from a string.
pub fn parse_fasta_str(content: &str) -> FastaResult<Vec<SequenceRecord>> {
    parse_fasta(content.as_bytes())
}
