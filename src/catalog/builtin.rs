//! The preloaded alert library.
//!
//! Frequencies are in Hz, durations in milliseconds. Musical sounds are tuned
//! to equal temperament around A4 = 440 Hz (C5 = 523.25, E5 = 659.25, ...).

use super::{Catalog, CatalogMetadata, Segment};

const fn t(frequency_hz: f32, duration_ms: f32) -> Segment {
    Segment::tone(frequency_hz, duration_ms)
}

const fn r(duration_ms: f32) -> Segment {
    Segment::rest(duration_ms)
}

// Classic
const BELL: &[Segment] = &[t(800.0, 100.0), t(1200.0, 100.0), t(800.0, 200.0)];
const BEEP: &[Segment] = &[t(1000.0, 100.0), r(100.0), t(1000.0, 100.0), r(100.0), t(1000.0, 200.0)];
const CHIME: &[Segment] = &[t(523.25, 200.0), t(659.25, 200.0), t(783.99, 300.0)];
const ALARM: &[Segment] = &[t(800.0, 150.0), t(900.0, 150.0), t(800.0, 150.0), t(900.0, 300.0)];
const NOTIFICATION: &[Segment] = &[t(1320.0, 100.0), t(1760.0, 200.0)];

// Fun
const POP: &[Segment] = &[t(800.0, 50.0), t(400.0, 150.0)];
const PING: &[Segment] = &[t(1046.50, 80.0), t(1318.51, 150.0)];
const DIGITAL: &[Segment] = &[t(1200.0, 80.0), t(800.0, 80.0), t(1200.0, 80.0), t(800.0, 200.0)];
const DING: &[Segment] = &[t(659.25, 150.0), t(783.99, 150.0), t(987.77, 300.0)];
const ALERT: &[Segment] = &[t(880.0, 100.0), t(660.0, 100.0), t(880.0, 100.0), t(660.0, 200.0)];

// Musical
const RETRO: &[Segment] = &[t(440.0, 100.0), t(494.88, 100.0), t(523.25, 100.0), t(587.33, 300.0)];
const SYNTH: &[Segment] = &[t(523.25, 120.0), t(659.25, 120.0), t(783.99, 120.0), t(987.77, 240.0)];
const TWINKLE: &[Segment] = &[
    t(392.0, 100.0),
    t(392.0, 100.0),
    t(392.0, 100.0),
    t(294.0, 100.0),
    t(330.0, 100.0),
    t(349.0, 200.0),
];
const WHISTLE: &[Segment] = &[t(1046.50, 150.0), t(1318.51, 150.0), t(1567.98, 300.0)];

// Nature
const THUNDER: &[Segment] = &[t(100.0, 200.0), t(150.0, 200.0), t(120.0, 400.0)];

// Modern
const SPARKLE: &[Segment] = &[t(1500.0, 80.0), t(1000.0, 80.0), t(1500.0, 80.0), t(1000.0, 160.0)];
const CASCADE: &[Segment] = &[t(1046.50, 100.0), t(932.33, 100.0), t(830.61, 100.0), t(739.99, 200.0)];
const BOING: &[Segment] = &[t(200.0, 80.0), t(400.0, 100.0), t(600.0, 200.0)];
const SWOOSH: &[Segment] = &[t(300.0, 50.0), t(600.0, 50.0), t(400.0, 50.0), t(200.0, 150.0)];
const TICK: &[Segment] = &[t(2000.0, 50.0), r(50.0), t(2000.0, 100.0)];

const SOUNDS: &[(&str, &[Segment])] = &[
    ("Bell", BELL),
    ("Beep", BEEP),
    ("Chime", CHIME),
    ("Alarm", ALARM),
    ("Notification", NOTIFICATION),
    ("Pop", POP),
    ("Ping", PING),
    ("Digital", DIGITAL),
    ("Ding", DING),
    ("Alert", ALERT),
    ("Retro", RETRO),
    ("Synth", SYNTH),
    ("Twinkle", TWINKLE),
    ("Whistle", WHISTLE),
    ("Thunder", THUNDER),
    ("Sparkle", SPARKLE),
    ("Cascade", CASCADE),
    ("Boing", BOING),
    ("Swoosh", SWOOSH),
    ("Tick", TICK),
];

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Classic", &["Bell", "Beep", "Chime", "Alarm", "Notification"]),
    ("Fun", &["Pop", "Ping", "Digital", "Ding", "Alert"]),
    ("Musical", &["Retro", "Synth", "Twinkle", "Whistle"]),
    ("Nature", &["Thunder"]),
    ("Modern", &["Sparkle", "Cascade", "Boing", "Swoosh", "Tick"]),
];

pub fn builtin_metadata() -> CatalogMetadata {
    CatalogMetadata {
        kind: "Procedurally Generated".into(),
        method: "Oscillator synthesis (sine waves, exponential decay)".into(),
        license: "CC0 Public Domain (generated content)".into(),
        description: format!("{} unique tones synthesized at playback time", SOUNDS.len()),
        attribution_required: false,
    }
}

pub(super) fn builtin_catalog() -> Catalog {
    let builder = SOUNDS
        .iter()
        .fold(Catalog::builder(), |b, &(name, segments)| b.sound(name, segments));

    let builder = CATEGORIES
        .iter()
        .fold(builder, |b, &(name, sounds)| b.category(name, sounds.iter().copied()));

    match builder.metadata(builtin_metadata()).build() {
        Ok(catalog) => catalog,
        // fixed tables, checked by builds_twenty_sounds
        Err(err) => unreachable!("built-in catalog is invalid: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_twenty_sounds() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), 20);
        assert_eq!(catalog.names().next(), Some("Bell"));
        assert_eq!(catalog.names().last(), Some("Tick"));
    }

    #[test]
    fn bell_matches_reference_timeline() {
        let catalog = builtin_catalog();
        let bell = catalog.get("Bell").unwrap();
        assert_eq!(
            bell.segments(),
            &[
                Segment::tone(800.0, 100.0),
                Segment::tone(1200.0, 100.0),
                Segment::tone(800.0, 200.0),
            ]
        );
    }

    #[test]
    fn every_sound_is_categorized_once() {
        let catalog = builtin_catalog();
        let categorized: usize = catalog.categories().iter().map(|c| c.sounds.len()).sum();
        assert_eq!(categorized, catalog.len());
        for name in catalog.names() {
            assert!(catalog.category_of(name).is_some(), "{name} has no category");
        }
    }

    #[test]
    fn metadata_counts_sounds() {
        let catalog = builtin_catalog();
        assert!(catalog.metadata().description.starts_with("20 "));
        assert!(!catalog.metadata().attribution_required);
    }
}
