//! Full-session integration tests
//!
//! Drives a RuleExecutor with a simulated playback deck whose seek
//! capability feeds back into its own clock, so seek rules produce the
//! same discontinuous sample sequences a real player would deliver.

use playcue_core::{EngineEvent, PlaybackControl, RuleExecutor, Track};
use uuid::Uuid;

/// Simulated playback deck: applies seeks to its own position so the
/// sample stream observed by the executor contains real discontinuities.
#[derive(Debug)]
struct SimulatedDeck {
    position: u32,
    volume: u8,
    seeks: Vec<u32>,
    volumes: Vec<u8>,
    seeked_this_tick: bool,
}

impl SimulatedDeck {
    fn new() -> Self {
        Self {
            position: 0,
            volume: 50,
            seeks: Vec::new(),
            volumes: Vec::new(),
            seeked_this_tick: false,
        }
    }
}

impl PlaybackControl for SimulatedDeck {
    fn seek(&mut self, target_secs: u32) {
        self.position = target_secs;
        self.seeked_this_tick = true;
        self.seeks.push(target_secs);
    }

    fn set_volume(&mut self, level: u8) {
        self.volume = level;
        self.volumes.push(level);
    }
}

fn track(rules: &str, duration_secs: u32) -> Track {
    Track {
        track_id: Uuid::new_v4(),
        duration_secs,
        rules: Some(rules.to_string()),
    }
}

/// Play a session from second 0 until the position passes the track end.
///
/// After a tick where a seek fired, the next sample is the seek target
/// itself (playback resumes there); otherwise the clock advances one
/// second per tick.
fn play_session(executor: &mut RuleExecutor<SimulatedDeck>, duration: u32) {
    let mut ticks = 0;
    // Backward seeks replay earlier sections; cap the session length so a
    // pathological rule file cannot loop forever
    let max_ticks = duration as usize * 4 + 16;

    loop {
        let position = executor.control().position;
        if position > duration {
            break;
        }

        executor.control_mut().seeked_this_tick = false;
        executor.on_elapsed(position);

        if !executor.control().seeked_this_tick {
            executor.control_mut().position += 1;
        }

        ticks += 1;
        assert!(ticks < max_ticks, "session did not terminate");
    }
}

#[test]
fn test_session_with_backward_seek_replays_cleanly() {
    let rules = "at 0:10 volume 80\nat 0:15 volume 30\nat 0:20 goto 0:05";
    let mut executor = RuleExecutor::new(SimulatedDeck::new());
    executor.track_changed(Some(track(rules, 60)), 0);

    play_session(&mut executor, 60);

    // First pass fires both volume rules, then the seek jumps back to 5.
    // The replayed section finds the volume entries already retired, and
    // the seek entry itself was removed when it fired, so the second pass
    // runs straight to the end.
    assert_eq!(executor.control().volumes, vec![80, 30]);
    assert_eq!(executor.control().seeks, vec![5]);
    assert_eq!(executor.armed_count(), 0);
    assert_eq!(executor.control().volume, 30);
}

#[test]
fn test_session_goto_next_ends_track() {
    let rules = "at 0:05 goto next";
    let mut executor = RuleExecutor::new(SimulatedDeck::new());
    executor.track_changed(Some(track(rules, 100)), 0);

    play_session(&mut executor, 100);

    assert_eq!(executor.control().seeks, vec![100]);
    assert_eq!(executor.control().position, 101);
}

#[test]
fn test_session_replaying_track_rearms_everything() {
    let rules = "at 0:03 volume 70";
    let t = track(rules, 10);
    let mut executor = RuleExecutor::new(SimulatedDeck::new());

    executor.track_changed(Some(t.clone()), 0);
    play_session(&mut executor, 10);
    assert_eq!(executor.control().volumes, vec![70]);

    // Same track selected again: a fresh session compiles a fresh table
    executor.control_mut().position = 0;
    executor.track_changed(Some(t), 0);
    play_session(&mut executor, 10);
    assert_eq!(executor.control().volumes, vec![70, 70]);
}

#[test]
fn test_session_from_validated_text_matches_raw_text() {
    let raw = "at 0:04 volume 25\ngarbage line\nat 0:08 seek +90";
    let cleaned = playcue_core::validate_rules(Some(raw), 20);
    assert_eq!(cleaned, "at 0:04 volume 25\nat 0:08 seek +90\n");

    let mut executor = RuleExecutor::new(SimulatedDeck::new());
    executor.track_changed(Some(track(&cleaned, 20)), 0);
    play_session(&mut executor, 20);

    // seek +90 from trigger 8 resolves to 98, clamped to duration 20
    assert_eq!(executor.control().volumes, vec![25]);
    assert_eq!(executor.control().seeks, vec![20]);
}

#[test]
fn test_session_duplicate_trigger_fires_later_line_once() {
    let rules = "at 0:05 volume 10\nat 0:05 volume 90";
    let mut executor = RuleExecutor::new(SimulatedDeck::new());
    executor.track_changed(Some(track(rules, 10)), 0);

    play_session(&mut executor, 10);

    assert_eq!(executor.control().volumes, vec![90]);
}

#[test]
fn test_session_event_stream_matches_fired_rules() {
    let rules = "at 0:02 volume 40\nat 0:04 goto next";
    let mut executor = RuleExecutor::new(SimulatedDeck::new());
    let mut events = executor.subscribe_events();

    let t = track(rules, 30);
    let track_id = t.track_id;
    executor.track_changed(Some(t), 0);
    play_session(&mut executor, 30);

    let mut compiled = 0;
    let mut fired = Vec::new();
    while let Ok(event) = events.try_recv() {
        match event {
            EngineEvent::TableCompiled {
                track_id: id,
                rule_count,
                ..
            } => {
                assert_eq!(id, track_id);
                assert_eq!(rule_count, 2);
                compiled += 1;
            }
            EngineEvent::RuleFired { trigger, .. } => fired.push(trigger),
        }
    }

    assert_eq!(compiled, 1);
    assert_eq!(fired, vec![2, 4]);
}
