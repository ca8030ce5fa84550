//! Preview plot of the selected sound's offline render

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Points plotted per preview; longer renders are decimated by peak.
const PREVIEW_POINTS: usize = 512;

/// Collapse `samples` into at most `points` (x, y) pairs, keeping the
/// largest-magnitude sample of each bucket so short tones stay visible.
pub fn envelope_points(samples: &[f32], points: usize) -> Vec<(f64, f64)> {
    if samples.is_empty() || points == 0 {
        return Vec::new();
    }

    let bucket = samples.len().div_ceil(points);
    let buckets = samples.len().div_ceil(bucket);
    samples
        .chunks(bucket)
        .enumerate()
        .map(|(i, chunk)| {
            let peak = chunk
                .iter()
                .copied()
                .fold(0.0f32, |acc, s| if s.abs() > acc.abs() { s } else { acc });
            (i as f64 / buckets as f64, f64::from(peak))
        })
        .collect()
}

/// Render the waveform preview
pub fn render_waveform(frame: &mut Frame, area: Rect, title: &str, samples: &[f32]) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL);

    let data = envelope_points(samples, PREVIEW_POINTS);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-0.5, 0.5])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
