//! Status bar widget - last play result, selection details, and preview stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use clockly_tones::SoundDefinition;

/// Outcome of the most recent play request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LastPlay {
    Idle,
    Played(String),
    Unknown(String),
}

/// Level statistics of a rendered preview
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    last: &LastPlay,
    selected: Option<&SoundDefinition>,
    stats: &AudioStats,
) {
    let block = Block::default().title(" clockly ").borders(Borders::ALL);

    let (symbol, text, color) = match last {
        LastPlay::Idle => ("■", "Ready".to_string(), Color::DarkGray),
        LastPlay::Played(name) => ("▶", format!("Played {name}"), Color::Green),
        LastPlay::Unknown(name) => ("✗", format!("Unknown sound {name}"), Color::Yellow),
    };

    let mut spans = vec![Span::styled(
        format!(" {symbol} {text}  "),
        Style::default().fg(color),
    )];

    if let Some(sound) = selected {
        spans.push(Span::styled(
            format!(
                "{}: {} tones, {} ms  ",
                sound.name(),
                sound.tone_count(),
                sound.duration().as_millis()
            ),
            Style::default().fg(Color::White),
        ));
    }

    spans.push(Span::styled(
        format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
        Style::default().fg(Color::Magenta),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
