//! Marker insertion.
//!
//! A marker is a short ASCII token written into a generated sequence at a
//! random offset. Two insertion policies exist and are kept apart:
//!
//! - **Splice**: the marker is inserted between two symbols, so the result is
//!   `len(marker)` symbols longer. Offsets range over `[0, len(sequence)]`.
//! - **Overwrite**: the marker replaces `len(marker)` symbols, so the result
//!   keeps its length. Offsets range over `[0, len(sequence) - len(marker)]`.
//!
//! The policy also decides how composition is computed downstream, see
//! [`crate::composition::CompositionAnalyzer::for_policy`].

use std::fmt;

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{MarkerSpan, Sequence};

/// Errors that can occur during marker insertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("Marker must not be empty")]
    EmptyMarker,

    #[error("Marker '{0}' contains non-ASCII characters")]
    NonAsciiMarker(String),

    #[error("Sequence contains non-ASCII symbols; markers can only be placed in ASCII sequences")]
    NonAsciiSequence,

    #[error("Marker of length {marker_len} does not fit in a sequence of length {sequence_len}")]
    MarkerTooLong {
        marker_len: usize,
        sequence_len: usize,
    },

    #[error("Insertion offset {offset} is outside the valid range 0..={max}")]
    OffsetOutOfRange { offset: usize, max: usize },
}

/// Result type for marker operations.
pub type MarkerResult<T> = Result<T, MarkerError>;

/// How a marker is placed into a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InsertionPolicy {
    /// Insert between symbols, lengthening the sequence
    #[default]
    Splice,
    /// Replace symbols, preserving the sequence length
    Overwrite,
}

impl fmt::Display for InsertionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertionPolicy::Splice => write!(f, "splice"),
            InsertionPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Checks a marker against a sequence, returning the marker length.
fn validate(sequence: &Sequence, marker: &str) -> MarkerResult<usize> {
    if marker.is_empty() {
        return Err(MarkerError::EmptyMarker);
    }
    if !marker.is_ascii() {
        return Err(MarkerError::NonAsciiMarker(marker.to_string()));
    }
    if !sequence.as_str().is_ascii() {
        return Err(MarkerError::NonAsciiSequence);
    }
    if marker.len() > sequence.len() {
        return Err(MarkerError::MarkerTooLong {
            marker_len: marker.len(),
            sequence_len: sequence.len(),
        });
    }
    Ok(marker.len())
}

/// Inserts `marker` before position `offset`, lengthening the sequence.
pub fn splice_at(
    sequence: &Sequence,
    marker: &str,
    offset: usize,
) -> MarkerResult<(Sequence, MarkerSpan)> {
    let marker_len = validate(sequence, marker)?;
    let max = sequence.len();
    if offset > max {
        return Err(MarkerError::OffsetOutOfRange { offset, max });
    }

    let mut data = String::with_capacity(sequence.len() + marker_len);
    data.push_str(sequence.slice(0..offset));
    data.push_str(marker);
    data.push_str(sequence.slice(offset..sequence.len()));

    Ok((Sequence::new(data), MarkerSpan::at(offset, marker_len)))
}

/// Writes `marker` over the symbols starting at `offset`, preserving length.
pub fn overwrite_at(
    sequence: &Sequence,
    marker: &str,
    offset: usize,
) -> MarkerResult<(Sequence, MarkerSpan)> {
    let marker_len = validate(sequence, marker)?;
    let max = sequence.len() - marker_len;
    if offset > max {
        return Err(MarkerError::OffsetOutOfRange { offset, max });
    }

    let mut data = String::with_capacity(sequence.len());
    data.push_str(sequence.slice(0..offset));
    data.push_str(marker);
    data.push_str(sequence.slice(offset + marker_len..sequence.len()));

    Ok((Sequence::new(data), MarkerSpan::at(offset, marker_len)))
}

/// Splices `marker` in at a uniformly random offset in `[0, len(sequence)]`.
pub fn splice<R: Rng + ?Sized>(
    sequence: &Sequence,
    marker: &str,
    rng: &mut R,
) -> MarkerResult<(Sequence, MarkerSpan)> {
    validate(sequence, marker)?;
    let offset = rng.random_range(0..=sequence.len());
    splice_at(sequence, marker, offset)
}

/// Overwrites with `marker` at a uniformly random offset in
/// `[0, len(sequence) - len(marker)]`.
pub fn overwrite<R: Rng + ?Sized>(
    sequence: &Sequence,
    marker: &str,
    rng: &mut R,
) -> MarkerResult<(Sequence, MarkerSpan)> {
    let marker_len = validate(sequence, marker)?;
    let offset = rng.random_range(0..=sequence.len() - marker_len);
    overwrite_at(sequence, marker, offset)
}

/// Inserts `marker` according to `policy`.
///
/// Returns the mutated sequence and the span the marker occupies in it.
pub fn insert<R: Rng + ?Sized>(
    policy: InsertionPolicy,
    sequence: &Sequence,
    marker: &str,
    rng: &mut R,
) -> MarkerResult<(Sequence, MarkerSpan)> {
    match policy {
        InsertionPolicy::Splice => splice(sequence, marker, rng),
        InsertionPolicy::Overwrite => overwrite(sequence, marker, rng),
    }
}
