//! Data model for the generator pipeline.
//!
//! This module contains the values passed between pipeline stages:
//! - `Sequence`: a string of symbols produced by synthesis or marker insertion
//! - `MarkerSpan`: the half-open range occupied by an inserted marker
//! - `SequenceRecord`: the id/description/body triple that gets serialized
//!
//! All of them are immutable once built; each stage consumes the previous
//! stage's value and produces a new one.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// An ordered string of sequence symbols.
///
/// Positions are byte offsets. Generated sequences and markers are ASCII, so a
/// byte offset is also a symbol offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    data: String,
}

impl Sequence {
    /// Creates a new sequence.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Creates a sequence from raw bytes, replacing invalid UTF-8.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        match String::from_utf8(data) {
            Ok(data) => Self { data },
            Err(e) => Self {
                data: String::from_utf8_lossy(e.as_bytes()).into_owned(),
            },
        }
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the sequence as a string slice.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Returns the sequence as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Gets a slice of the sequence data, clamped to the sequence bounds.
    ///
    /// Offsets are bytes. A range that splits a multi-byte character yields
    /// an empty slice, so callers that cut sequences apart must only do so
    /// on ASCII data.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = range.start.min(self.data.len());
        let end = range.end.min(self.data.len()).max(start);
        self.data.get(start..end).unwrap_or("")
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

impl From<String> for Sequence {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&str> for Sequence {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}

/// Half-open index range `[start, end)` occupied by an inserted marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerSpan {
    pub start: usize,
    pub end: usize,
}

impl MarkerSpan {
    /// Creates a span. `end` is raised to `start` if it lies before it.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Creates the span covering `len` positions from `start`.
    pub fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers no positions.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Checks if a position lies inside the span.
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Returns the span as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the span clamped to a sequence of length `len`.
    pub fn clamp_to(&self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

impl fmt::Display for MarkerSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A single sequence record with its identifier, description and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// The record identifier (written after '>')
    pub id: String,
    /// Free-text description following the identifier
    pub description: String,
    /// The sequence body
    pub body: Sequence,
}

impl SequenceRecord {
    /// Creates a new record.
    pub fn new(id: impl Into<String>, description: impl Into<String>, body: Sequence) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            body,
        }
    }

    /// Returns the length of the record body.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true if the record body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the header line content (without '>' and line terminator).
    pub fn header(&self) -> String {
        format!("{} {}", self.id, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_creation() {
        let seq = Sequence::new("ACGT");
        assert_eq!(seq.as_str(), "ACGT");
        assert_eq!(seq.len(), 4);
        assert!(!seq.is_empty());
        assert!(Sequence::default().is_empty());
    }

    #[test]
    fn test_sequence_slice_is_clamped() {
        let seq = Sequence::new("ACGTAC");
        assert_eq!(seq.slice(1..3), "CG");
        assert_eq!(seq.slice(4..100), "AC");
        assert_eq!(seq.slice(10..20), "");
    }

    #[test]
    fn test_sequence_from_bytes() {
        let seq = Sequence::from_bytes(b"GATTACA".to_vec());
        assert_eq!(seq.as_str(), "GATTACA");
    }

    #[test]
    fn test_span_basics() {
        let span = MarkerSpan::at(1, 2);
        assert_eq!(span, MarkerSpan::new(1, 3));
        assert_eq!(span.len(), 2);
        assert!(span.contains(1));
        assert!(span.contains(2));
        assert!(!span.contains(3));
        assert!(!span.contains(0));
        assert_eq!(span.to_string(), "[1, 3)");
    }

    #[test]
    fn test_span_clamp() {
        let span = MarkerSpan::new(3, 10).clamp_to(5);
        assert_eq!(span, MarkerSpan::new(3, 5));
        let span = MarkerSpan::new(8, 10).clamp_to(5);
        assert!(span.is_empty());
    }

    #[test]
    fn test_record_header_keeps_plain_join() {
        let record = SequenceRecord::new("Seq1", "", Sequence::new("ACGT"));
        assert_eq!(record.header(), "Seq1 ");
        assert_eq!(record.len(), 4);
    }
}
