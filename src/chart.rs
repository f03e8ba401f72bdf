//! Composition bar chart.
//!
//! Draws the four nucleotide percentages as a ratatui bar chart. The chart
//! can be rendered into any frame area (tests use a `TestBackend`) or printed
//! inline below the current terminal line with [`print_chart`].
//!
//! Charts are optional output: [`print_charts`] logs a failed chart and moves
//! on to the next record.

use std::io;

use anyhow::Result;
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame, Terminal, TerminalOptions, Viewport,
};

use tracing::warn;

use crate::composition::CompositionStats;
use crate::pipeline::GeneratedRecord;
use crate::report::StatsReport;

/// Terminal rows used by the inline chart.
pub const CHART_HEIGHT: u16 = 14;
/// Width of a single bar.
const BAR_WIDTH: u16 = 9;
/// Gap between bars.
const BAR_GAP: u16 = 3;
/// Bars hold percentages in tenths so one decimal survives the `u64` values.
const SCALE: f64 = 10.0;

/// Bar color for a nucleotide.
pub fn nucleotide_color(c: char) -> Color {
    match c.to_ascii_uppercase() {
        'A' => Color::Red,
        'C' => Color::Green,
        'G' => Color::Yellow,
        'T' => Color::Blue,
        _ => Color::DarkGray,
    }
}

/// Builds the bar chart widget for `stats`.
pub fn composition_chart<'a>(stats: &CompositionStats, title: &'a str) -> BarChart<'a> {
    let bars: Vec<Bar> = stats
        .shares()
        .iter()
        .map(|(symbol, share)| {
            let color = nucleotide_color(*symbol);
            Bar::default()
                .value((share.percent * SCALE).round() as u64)
                .label(Line::from(symbol.to_string()))
                .text_value(format!("{:.1}%", share.percent))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .max((100.0 * SCALE) as u64)
}

/// Renders the chart into `area`.
pub fn draw_chart(frame: &mut Frame, area: Rect, stats: &CompositionStats, title: &str) {
    frame.render_widget(composition_chart(stats, title), area);
}

/// Prints the chart inline on stdout, below the cursor.
pub fn print_chart(stats: &CompositionStats, title: &str) -> Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(CHART_HEIGHT),
        },
    )?;

    terminal.draw(|frame| {
        let area = frame.area();
        draw_chart(frame, area, stats, title);
    })?;
    println!();

    Ok(())
}

/// Draws one chart per record with `draw`, returning how many were drawn.
///
/// Records of length 0 have nothing to plot and are skipped. A failing chart
/// is logged and does not stop the remaining ones.
pub fn print_charts<F>(records: &[GeneratedRecord], mut draw: F) -> usize
where
    F: FnMut(&CompositionStats, &str) -> Result<()>,
{
    let mut drawn = 0;
    for record in records {
        if record.original_length == 0 {
            warn!(id = %record.record.id, "chart skipped: sequence has length 0");
            continue;
        }
        let title = StatsReport::new(record).chart_title();
        match draw(&record.stats, &title) {
            Ok(()) => drawn += 1,
            Err(e) => warn!(id = %record.record.id, error = %e, "chart skipped"),
        }
    }
    drawn
}
