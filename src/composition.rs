//! Nucleotide composition statistics.
//!
//! Counts the four nucleotides over a sequence, optionally skipping an
//! excluded span (the marker), and derives percentages, GC content and the
//! dinucleotide frequency table.
//!
//! ## Length basis
//!
//! Percentages are relative to an *evaluated length* whose meaning depends
//! on the insertion policy in use:
//!
//! - [`LengthBasis::AllPositions`]: every position outside the exclusion
//!   counts, recognized or not (used with splice insertion, where the
//!   analyzed sequence is the marker-free original).
//! - [`LengthBasis::RecognizedOnly`]: only A/C/G/T outside the exclusion
//!   count (used with overwrite insertion, where the marker sits inside the
//!   analyzed sequence).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::marker::InsertionPolicy;
use crate::model::{MarkerSpan, Sequence};

/// Nucleotides tracked by the analyzer, in report order.
pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Which positions make up the denominator of percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBasis {
    #[default]
    AllPositions,
    RecognizedOnly,
}

/// Count and percentage of a single nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NucleotideShare {
    pub count: usize,
    pub percent: f64,
}

/// Composition statistics of one sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositionStats {
    /// Length of the analyzed sequence, exclusion included
    pub sequence_length: usize,
    /// Number of positions percentages are relative to
    pub evaluated_length: usize,
    pub a: NucleotideShare,
    pub c: NucleotideShare,
    pub g: NucleotideShare,
    pub t: NucleotideShare,
    /// (G + C) / evaluated length × 100
    pub gc_percent: f64,
    /// Overlapping 2-mers over the full sequence
    pub dinucleotides: BTreeMap<String, usize>,
}

impl CompositionStats {
    /// Returns the share of a nucleotide, or `None` for other symbols.
    pub fn share(&self, symbol: u8) -> Option<&NucleotideShare> {
        match symbol {
            b'A' => Some(&self.a),
            b'C' => Some(&self.c),
            b'G' => Some(&self.g),
            b'T' => Some(&self.t),
            _ => None,
        }
    }

    /// Returns the shares in `A, C, G, T` order.
    pub fn shares(&self) -> [(char, &NucleotideShare); 4] {
        [('A', &self.a), ('C', &self.c), ('G', &self.g), ('T', &self.t)]
    }

    /// Total number of recognized nucleotides.
    pub fn recognized(&self) -> usize {
        self.a.count + self.c.count + self.g.count + self.t.count
    }

    /// GC/AT ratio: (G + C) / (A + T), 0.0 when there is no A or T.
    pub fn gc_at_ratio(&self) -> f64 {
        let at = self.a.count + self.t.count;
        if at == 0 {
            return 0.0;
        }
        (self.g.count + self.c.count) as f64 / at as f64
    }
}

/// Percentage of `count` in `total`, 0.0 when `total` is zero.
fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Counts overlapping 2-mers over the whole sequence.
///
/// Empty when the sequence has fewer than two symbols.
pub fn dinucleotide_frequencies(sequence: &Sequence) -> BTreeMap<String, usize> {
    let mut table = BTreeMap::new();
    for pair in sequence.as_bytes().windows(2) {
        *table
            .entry(String::from_utf8_lossy(pair).into_owned())
            .or_insert(0) += 1;
    }
    table
}

/// Computes composition statistics under a fixed length basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositionAnalyzer {
    basis: LengthBasis,
}

impl CompositionAnalyzer {
    /// Creates an analyzer with the given length basis.
    pub fn new(basis: LengthBasis) -> Self {
        Self { basis }
    }

    /// Returns the analyzer matching an insertion policy.
    pub fn for_policy(policy: InsertionPolicy) -> Self {
        match policy {
            InsertionPolicy::Splice => Self::new(LengthBasis::AllPositions),
            InsertionPolicy::Overwrite => Self::new(LengthBasis::RecognizedOnly),
        }
    }

    /// Returns the length basis in use.
    pub fn basis(&self) -> LengthBasis {
        self.basis
    }

    /// Analyzes `sequence`, skipping the positions in `exclusion`.
    ///
    /// Exclusions reaching past the end of the sequence are clamped. The
    /// dinucleotide table always covers the full sequence.
    pub fn analyze(&self, sequence: &Sequence, exclusion: Option<MarkerSpan>) -> CompositionStats {
        let sequence_length = sequence.len();
        let exclusion = exclusion.map(|span| span.clamp_to(sequence_length));
        let mut counts = [0usize; 4];
        let mut positions = 0usize;

        for (pos, symbol) in sequence.as_bytes().iter().enumerate() {
            if exclusion.is_some_and(|span| span.contains(pos)) {
                continue;
            }
            positions += 1;
            if let Some(idx) = NUCLEOTIDES.iter().position(|n| n == symbol) {
                counts[idx] += 1;
            }
        }

        let evaluated_length = match self.basis {
            LengthBasis::AllPositions => positions,
            LengthBasis::RecognizedOnly => counts.iter().sum(),
        };

        let share = |idx: usize| NucleotideShare {
            count: counts[idx],
            percent: percent(counts[idx], evaluated_length),
        };

        CompositionStats {
            sequence_length,
            evaluated_length,
            a: share(0),
            c: share(1),
            g: share(2),
            t: share(3),
            gc_percent: percent(counts[1] + counts[2], evaluated_length),
            dinucleotides: dinucleotide_frequencies(sequence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_positions() -> CompositionAnalyzer {
        CompositionAnalyzer::new(LengthBasis::AllPositions)
    }

    fn recognized_only() -> CompositionAnalyzer {
        CompositionAnalyzer::new(LengthBasis::RecognizedOnly)
    }

    #[test]
    fn test_all_a_sequence() {
        let stats = all_positions().analyze(&Sequence::new("AAAAAAAA"), None);
        assert_eq!(stats.a.count, 8);
        assert_eq!(stats.a.percent, 100.0);
        assert_eq!(stats.c.percent, 0.0);
        assert_eq!(stats.g.percent, 0.0);
        assert_eq!(stats.t.percent, 0.0);
        assert_eq!(stats.gc_percent, 0.0);
        assert_eq!(stats.gc_at_ratio(), 0.0);
        assert_eq!(stats.dinucleotides.get("AA"), Some(&7));
    }

    #[test]
    fn test_empty_sequence() {
        for analyzer in [all_positions(), recognized_only()] {
            let stats = analyzer.analyze(&Sequence::default(), None);
            assert_eq!(stats.evaluated_length, 0);
            for (_, share) in stats.shares() {
                assert_eq!(share.count, 0);
                assert_eq!(share.percent, 0.0);
            }
            assert_eq!(stats.gc_percent, 0.0);
            assert!(stats.dinucleotides.is_empty());
        }
    }

    #[test]
    fn test_single_symbol_has_no_dinucleotides() {
        let stats = all_positions().analyze(&Sequence::new("G"), None);
        assert_eq!(stats.g.percent, 100.0);
        assert_eq!(stats.gc_percent, 100.0);
        assert!(stats.dinucleotides.is_empty());
    }

    #[test]
    fn test_mixed_sequence() {
        let stats = all_positions().analyze(&Sequence::new("ACGTACGG"), None);
        assert_eq!(stats.evaluated_length, 8);
        assert_eq!(stats.a.count, 2);
        assert_eq!(stats.c.count, 2);
        assert_eq!(stats.g.count, 3);
        assert_eq!(stats.t.count, 1);
        assert_eq!(stats.a.percent, 25.0);
        assert_eq!(stats.g.percent, 37.5);
        assert_eq!(stats.gc_percent, 62.5);
        assert!((stats.gc_at_ratio() - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.dinucleotides.get("AC"), Some(&2));
        assert_eq!(stats.dinucleotides.get("CG"), Some(&2));
        assert_eq!(stats.dinucleotides.get("GT"), Some(&1));
        assert_eq!(stats.dinucleotides.get("TA"), Some(&1));
        assert_eq!(stats.dinucleotides.get("GG"), Some(&1));
        assert_eq!(stats.dinucleotides.values().sum::<usize>(), 7);
    }

    #[test]
    fn test_exclusion_with_recognized_only() {
        let stats = recognized_only().analyze(&Sequence::new("ANMT"), Some(MarkerSpan::new(1, 3)));
        assert_eq!(stats.evaluated_length, 2);
        assert_eq!(stats.a.count, 1);
        assert_eq!(stats.t.count, 1);
        assert_eq!(stats.a.percent, 50.0);
        assert_eq!(stats.t.percent, 50.0);
        assert_eq!(stats.c.percent, 0.0);
        assert_eq!(stats.g.percent, 0.0);
        assert_eq!(stats.gc_percent, 0.0);
    }

    #[test]
    fn test_dinucleotides_include_marker_region() {
        let stats = recognized_only().analyze(&Sequence::new("ANMT"), Some(MarkerSpan::new(1, 3)));
        let keys: Vec<&str> = stats.dinucleotides.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["AN", "MT", "NM"]);
    }

    #[test]
    fn test_unrecognized_symbols_by_basis() {
        let seq = Sequence::new("ACNN");

        let stats = all_positions().analyze(&seq, None);
        assert_eq!(stats.evaluated_length, 4);
        assert_eq!(stats.a.percent, 25.0);
        assert_eq!(stats.gc_percent, 25.0);

        let stats = recognized_only().analyze(&seq, None);
        assert_eq!(stats.evaluated_length, 2);
        assert_eq!(stats.a.percent, 50.0);
        assert_eq!(stats.gc_percent, 50.0);
    }

    #[test]
    fn test_lowercase_is_not_recognized() {
        let stats = all_positions().analyze(&Sequence::new("acgt"), None);
        assert_eq!(stats.recognized(), 0);
        assert_eq!(stats.evaluated_length, 4);
        assert_eq!(stats.gc_percent, 0.0);
    }

    #[test]
    fn test_exclusion_with_all_positions() {
        let stats = all_positions().analyze(&Sequence::new("GGXXCC"), Some(MarkerSpan::new(2, 4)));
        assert_eq!(stats.evaluated_length, 4);
        assert_eq!(stats.gc_percent, 100.0);
    }

    #[test]
    fn test_exclusion_covering_everything() {
        let stats = all_positions().analyze(&Sequence::new("ACGT"), Some(MarkerSpan::new(0, 4)));
        assert_eq!(stats.evaluated_length, 0);
        assert_eq!(stats.a.percent, 0.0);
        assert_eq!(stats.gc_percent, 0.0);
        assert_eq!(stats.dinucleotides.len(), 3);
    }

    #[test]
    fn test_exclusion_past_end_is_clamped() {
        let stats = all_positions().analyze(&Sequence::new("ACGT"), Some(MarkerSpan::new(2, 10)));
        assert_eq!(stats.evaluated_length, 2);
        assert_eq!(stats.a.count, 1);
        assert_eq!(stats.c.count, 1);
    }

    #[test]
    fn test_counts_never_exceed_evaluated_length() {
        let seq = Sequence::new("ACGTNNACGT-");
        for analyzer in [all_positions(), recognized_only()] {
            let stats = analyzer.analyze(&seq, Some(MarkerSpan::new(4, 6)));
            assert!(stats.recognized() <= stats.evaluated_length);
        }
    }

    #[test]
    fn test_gc_at_ratio_without_at() {
        let stats = all_positions().analyze(&Sequence::new("GCGC"), None);
        assert_eq!(stats.gc_at_ratio(), 0.0);
        assert_eq!(stats.gc_percent, 100.0);
    }

    #[test]
    fn test_analyzer_for_policy() {
        assert_eq!(
            CompositionAnalyzer::for_policy(InsertionPolicy::Splice).basis(),
            LengthBasis::AllPositions
        );
        assert_eq!(
            CompositionAnalyzer::for_policy(InsertionPolicy::Overwrite).basis(),
            LengthBasis::RecognizedOnly
        );
    }

    #[test]
    fn test_share_lookup() {
        let stats = all_positions().analyze(&Sequence::new("ACGT"), None);
        assert_eq!(stats.share(b'C').map(|s| s.count), Some(1));
        assert!(stats.share(b'N').is_none());
    }
}
