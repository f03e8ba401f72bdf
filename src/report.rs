//! Human-readable and JSON statistics reports.
//!
//! The text layout lists the original length, each nucleotide as percent
//! and count, %GC, the GC/AT ratio and the dinucleotide table in
//! alphabetical order.

use std::fmt;

use serde::Serialize;

use crate::composition::CompositionStats;
use crate::model::MarkerSpan;
use crate::pipeline::GeneratedRecord;

/// Column at which report text is wrapped.
pub const REPORT_WIDTH: usize = 72;

const DESCRIPTION_LABEL: &str = "  Description: ";

/// Statistics of one generated record, ready for display or export.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport<'a> {
    pub id: &'a str,
    pub description: &'a str,
    pub original_length: usize,
    pub marker_span: Option<MarkerSpan>,
    pub stats: &'a CompositionStats,
}

impl<'a> StatsReport<'a> {
    /// Builds the report for a pipeline result.
    pub fn new(generated: &'a GeneratedRecord) -> Self {
        Self {
            id: &generated.record.id,
            description: &generated.record.description,
            original_length: generated.original_length,
            marker_span: generated.marker_span,
            stats: &generated.stats,
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Title used for the composition chart.
    pub fn chart_title(&self) -> String {
        format!(
            "Nucleotide composition: {} | original length {} bp, %GC {:.1}%",
            self.id, self.original_length, self.stats.gc_percent
        )
    }
}

/// Serializes the reports of a batch as a pretty-printed JSON array.
///
/// The output is an array even for a single record.
pub fn stats_json(generated: &[GeneratedRecord]) -> serde_json::Result<String> {
    let reports: Vec<StatsReport> = generated.iter().map(StatsReport::new).collect();
    serde_json::to_string_pretty(&reports)
}

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.marker_span.is_some() {
            writeln!(f, "Sequence statistics for {} (marker excluded):", self.id)?;
        } else {
            writeln!(f, "Sequence statistics for {}:", self.id)?;
        }
        if !self.description.is_empty() {
            let indent = " ".repeat(DESCRIPTION_LABEL.len());
            let options = textwrap::Options::new(REPORT_WIDTH)
                .initial_indent(DESCRIPTION_LABEL)
                .subsequent_indent(&indent);
            writeln!(f, "{}", textwrap::fill(self.description, options))?;
        }
        writeln!(f, "  Original length: {}", self.original_length)?;
        if let Some(span) = self.marker_span {
            writeln!(f, "  Marker span: {}", span)?;
        }
        for (symbol, share) in self.stats.shares() {
            writeln!(f, "  {}: {:.1}% ({})", symbol, share.percent, share.count)?;
        }
        writeln!(f, "  %GC: {:.1}%", self.stats.gc_percent)?;
        writeln!(f, "  GC/AT ratio: {:.2}", self.stats.gc_at_ratio())?;

        if self.stats.dinucleotides.is_empty() {
            writeln!(f, "  (no dinucleotides to show - sequence too short)")?;
        } else {
            writeln!(f, "  Dinucleotide frequencies:")?;
            for (pair, count) in &self.stats.dinucleotides {
                writeln!(f, "    {}: {}", pair, count)?;
            }
        }
        Ok(())
    }
}
