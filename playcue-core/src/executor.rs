//! Rule executor state machine
//!
//! Owns one playback session's execution state: the compiled rule table
//! for the active track and the previous elapsed-time sample. All
//! transitions are synchronous reactions to two host signals, "track
//! changed" and "elapsed sample"; the executor has no internal timer and
//! performs no blocking work.
//!
//! Host ordering contract: the track-change signal for a track must be
//! fully processed before any elapsed sample for that track arrives,
//! otherwise samples are matched against a stale or empty table.
//!
//! Each rule fires at most once per track-playback-session, with two
//! deliberate exceptions around seek rules (see `on_elapsed`) that
//! preserve the observable behavior of the original clock/seek race
//! workarounds.

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::events::EngineEvent;
use crate::rule::{Effect, Track};
use crate::ruleset::RuleTable;

/// Playback capabilities consumed from the host playback subsystem.
///
/// The executor clamps before invoking: `seek` targets are within
/// `[0, duration]` and `set_volume` levels within `[0, 100]`.
pub trait PlaybackControl {
    /// Jump playback to an absolute offset in seconds.
    fn seek(&mut self, target_secs: u32);

    /// Set output volume (0-100).
    fn set_volume(&mut self, level: u8);
}

/// Per-session rule executor.
///
/// One instance per active playback session; hosts running simultaneous
/// sessions (e.g. crossfade) instantiate one executor each, with isolated
/// table and previous-sample state.
pub struct RuleExecutor<C: PlaybackControl> {
    /// Injected playback capabilities
    control: C,

    /// When false, samples are recorded but no effects are applied
    enabled: bool,

    /// Active track; retained so a manual reset can recompile
    track: Option<Track>,

    /// Live rule table (entries removed as rules fire)
    table: RuleTable,

    /// Previous elapsed-time sample, for discontinuity detection
    prev_elapsed: u32,

    /// Event broadcaster for engine observers
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<C: PlaybackControl> RuleExecutor<C> {
    /// Create an idle executor (no active track) with execution enabled.
    pub fn new(control: C) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            control,
            enabled: true,
            track: None,
            table: RuleTable::new(),
            prev_elapsed: 0,
            event_tx,
        }
    }

    /// Subscribe to engine events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Enable or disable rule execution.
    ///
    /// Effective immediately on the next sample: a disabled executor still
    /// records samples (keeping discontinuity detection current) but
    /// applies no effects and leaves all entries armed.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether rule execution is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Currently active track, if any.
    pub fn active_track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    /// Number of rules still armed for the current session.
    pub fn armed_count(&self) -> usize {
        self.table.len()
    }

    /// Check whether a rule is still armed at `trigger` for the active
    /// track.
    pub fn is_armed(&self, trigger: u32) -> bool {
        match &self.track {
            Some(track) => self.table.contains(track.track_id, trigger),
            None => false,
        }
    }

    /// Borrow the injected playback control.
    pub fn control(&self) -> &C {
        &self.control
    }

    /// Mutably borrow the injected playback control.
    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }

    /// Track change: rebuild execution state for the new track.
    ///
    /// Recompiles the table from the track's rule text (always, even when
    /// the identity matches the previous track, so replaying a track
    /// re-arms every rule) and resets the previous-sample field to the new
    /// track's current elapsed value. `None` transitions to idle with an
    /// empty table.
    pub fn track_changed(&mut self, track: Option<Track>, elapsed: u32) {
        self.table = match &track {
            Some(track) => RuleTable::compile(track),
            None => RuleTable::new(),
        };

        if let Some(track) = &track {
            self.broadcast(EngineEvent::TableCompiled {
                track_id: track.track_id,
                rule_count: self.table.len(),
                timestamp: Utc::now(),
            });
        }

        self.track = track;
        self.prev_elapsed = elapsed;
    }

    /// Manual reset: recompile the table for the currently active track.
    ///
    /// Fully re-arms the session (e.g. user replays from zero) without
    /// changing track identity. The previous-sample field is left as-is so
    /// discontinuity detection spans the reset.
    pub fn reset(&mut self) {
        if let Some(track) = &self.track {
            self.table = RuleTable::compile(track);
            self.broadcast(EngineEvent::TableCompiled {
                track_id: track.track_id,
                rule_count: self.table.len(),
                timestamp: Utc::now(),
            });
        }
    }

    /// Elapsed-time sample from the playback clock.
    ///
    /// Looks up the rule armed at `(track, elapsed)` and applies its
    /// clamped effect. Retirement policy:
    /// - A volume rule is removed unconditionally after firing.
    /// - A seek rule whose clamped target equals the triggering sample is
    ///   a degenerate no-op and stays armed.
    /// - A firing seek rule is removed only when this sample differs from
    ///   the previous one, i.e. it arrived through a discontinuity rather
    ///   than a repeated sample at the same offset. Both seek quirks
    ///   mirror the upstream clock/seek race workaround.
    ///
    /// The sample is recorded as "previous elapsed" on every call,
    /// regardless of the branch taken.
    pub fn on_elapsed(&mut self, elapsed: u32) {
        let (track_id, duration) = match &self.track {
            Some(track) => (track.track_id, track.duration_secs),
            None => {
                self.prev_elapsed = elapsed;
                return;
            }
        };

        if !self.enabled || self.table.is_empty() {
            self.prev_elapsed = elapsed;
            return;
        }

        if let Some(rule) = self.table.get(track_id, elapsed).copied() {
            match rule.effect {
                Effect::Seek { target } => {
                    let value = target.clamp(0, duration as i64) as u32;

                    if value != elapsed {
                        debug!(
                            "Rule fired at {}: seek {} -> {}",
                            rule.trigger, elapsed, value
                        );
                        self.control.seek(value);

                        if self.prev_elapsed != elapsed {
                            self.table.remove(track_id, elapsed);
                        }

                        self.broadcast(EngineEvent::RuleFired {
                            track_id,
                            trigger: rule.trigger,
                            effect: rule.effect,
                            timestamp: Utc::now(),
                        });
                    }
                    // value == elapsed: nothing to do, entry stays armed
                }

                Effect::Volume { level } => {
                    let value = level.clamp(0, 100) as u8;

                    debug!("Rule fired at {}: volume {}", rule.trigger, value);
                    self.control.set_volume(value);
                    self.table.remove(track_id, elapsed);

                    self.broadcast(EngineEvent::RuleFired {
                        track_id,
                        trigger: rule.trigger,
                        effect: rule.effect,
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        self.prev_elapsed = elapsed;
    }

    /// Broadcast an event, ignoring send errors (no receivers is OK).
    fn broadcast(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
