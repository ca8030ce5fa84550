use std::sync::Arc;

use clockly_tones::{
    backend::{OfflineHost, RecordingHost},
    schedule_segments, AudioHost, Catalog, Segment, SegmentError, SequenceError, ToneSequencer,
};

const EPS: f64 = 1e-9;

fn sequencer(host: &RecordingHost) -> ToneSequencer<RecordingHost> {
    ToneSequencer::new(Arc::new(Catalog::builtin()), host.clone())
}

#[test]
fn every_listed_sound_plays() {
    let host = RecordingHost::new();
    let seq = sequencer(&host);
    let names = seq.list_sounds();

    for name in &names {
        assert_eq!(names.iter().filter(|n| *n == name).count(), 1);
        assert!(seq.play_sound(name), "{name} should resolve");
    }
    assert_eq!(host.session_count(), names.len());
}

#[test]
fn unknown_name_is_rejected_without_scheduling() {
    let host = RecordingHost::new();
    let seq = sequencer(&host);
    let before = seq.list_sounds().into_iter().map(String::from).collect::<Vec<_>>();

    assert!(!seq.play_sound("DoesNotExist"));
    assert!(!seq.play_sound(""));
    assert!(!seq.play_sound("bell"));

    assert_eq!(host.session_count(), 0);
    assert_eq!(seq.list_sounds(), before);
}

#[test]
fn catalog_segments_are_well_formed() {
    let catalog = Catalog::builtin();
    for sound in catalog.sounds() {
        assert!(!sound.segments().is_empty());
        for segment in sound.segments() {
            assert!(segment.duration_ms > 0.0, "{}", sound.name());
            assert!(segment.frequency_hz >= 0.0, "{}", sound.name());
        }
    }
}

#[test]
fn bell_is_scheduled_relative_to_invocation() {
    let host = RecordingHost::starting_at(12.5);
    let seq = sequencer(&host);
    assert!(seq.play_sound("Bell"));

    let tones = host.tones();
    let offsets: Vec<f64> = tones.iter().map(|t| t.start - 12.5).collect();
    assert_eq!(offsets.len(), 3);
    for (offset, expected) in offsets.iter().zip([0.0, 0.1, 0.2]) {
        assert!((offset - expected).abs() < EPS, "{offset} != {expected}");
    }

    let last_stop = tones.iter().map(|t| t.stop).fold(f64::MIN, f64::max);
    assert!((last_stop - 12.9).abs() < EPS);

    let frequencies: Vec<f32> = tones.iter().map(|t| t.frequency_hz).collect();
    assert_eq!(frequencies, vec![800.0, 1200.0, 800.0]);
    assert!(tones.iter().all(|t| t.peak_gain == 0.3 && t.floor_gain == 0.01));
}

#[test]
fn rests_only_move_the_cursor() {
    let host = RecordingHost::starting_at(1.0);
    let mut ctx = host.open_context().unwrap();
    let segments = [
        Segment::tone(1000.0, 100.0),
        Segment::rest(150.0),
        Segment::tone(1000.0, 100.0),
    ];

    let span = schedule_segments(&mut ctx, &segments, &Default::default()).unwrap();
    let tones = host.tones();

    assert_eq!(span.tones, 2);
    assert_eq!(tones.len(), 2);
    assert!((tones[1].start - 1.25).abs() < EPS);
    assert!((span.end - 1.35).abs() < EPS);
}

#[test]
fn overlapping_calls_get_independent_sessions() {
    let host = RecordingHost::new();
    let seq = sequencer(&host);

    seq.play_sound("Chime");
    host.advance(0.05);
    seq.play_sound("Chime");

    let sessions = host.sessions();
    assert_eq!(sessions.len(), 2);
    assert!((sessions[1][0].start - sessions[0][0].start - 0.05).abs() < EPS);
}

#[test]
fn unavailable_backend_still_reports_lookup_success() {
    let host = RecordingHost::unavailable();
    let seq = ToneSequencer::new(Arc::new(Catalog::builtin()), host.clone());

    assert!(seq.play_sound("Bell"));
    assert!(host.tones().is_empty());
}

#[test]
fn backend_rejection_abandons_the_render() {
    let host = RecordingHost::new().failing_after(2);
    let seq = sequencer(&host);

    assert!(seq.play_sound("Alarm"));
    assert_eq!(host.tones().len(), 2);
}

#[test]
fn negative_rest_never_reaches_the_host() {
    let host = RecordingHost::new();
    let seq = sequencer(&host);
    let segments = [
        Segment::tone(440.0, 100.0),
        Segment::rest(-500.0),
        Segment::tone(440.0, 100.0),
    ];

    let err = seq.try_render_sequence(&segments).unwrap_err();
    assert!(matches!(
        err,
        SequenceError::InvalidSegment {
            index: 1,
            source: SegmentError::Duration(_)
        }
    ));

    seq.render_sequence(&segments);
    assert_eq!(host.session_count(), 0);
    assert!(host.tones().is_empty());
}

#[test]
fn oversized_segment_is_rejected_before_rendering() {
    let host = OfflineHost::new(8_000.0);
    let seq = ToneSequencer::new(Arc::new(Catalog::builtin()), host.clone());

    let err = seq
        .try_render_sequence(&[Segment::tone(440.0, f32::MAX)])
        .unwrap_err();
    assert!(matches!(
        err,
        SequenceError::InvalidSegment {
            index: 0,
            source: SegmentError::TooLong(_)
        }
    ));
    assert!(host.take_renders().is_empty());
}
